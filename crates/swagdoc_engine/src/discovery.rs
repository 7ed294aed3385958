/* 📖 # Why extract in parallel but merge sequentially?

Reading and parsing a source location is independent of every other location, so the
files are split into one contiguous chunk per available core and each chunk runs on its
own scoped thread. Merging is order-sensitive (first registration wins,
operations are appended), so all threads are joined before anything is merged, and the
merge walks the locations in configuration order. The registry therefore ends up the
same on every run, no matter which file finished reading first.

Failures stay scoped: a location that cannot be read, transpiled or parsed is reported
in the DiscoveryReport and contributes nothing, while the other locations are merged.
Only after the last merge is the registry marked ready.
*/

use std::thread;

use tracing::{info, instrument, warn};

use swagdoc_base::{FilePath, PalHandle, ResultExt, SwagdocError, SwagdocResult};

use crate::declaration::Declaration;
use crate::extractor::extract;
use crate::merger::merge;
use crate::scanner::scan_sources;
use crate::store::RegistryHandle;
use crate::tags::filter_swagger_tags;

/// Summary of a discovery run.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// Source files in the order they were merged.
    pub files: Vec<FilePath>,
    /// Number of files whose declarations were merged.
    pub merged: usize,
    /// Operations dropped because no resource was declared for them.
    pub dropped_operations: usize,
    /// Per-location failures; these locations contributed nothing.
    pub errors: Vec<DiscoveryError>,
}

impl DiscoveryReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A failure scoped to one source location.
#[derive(Debug)]
pub struct DiscoveryError {
    /// The configured location or expanded file that failed.
    pub location: String,
    pub error: Box<SwagdocError>,
}

/// Extract the declarations of one source file.
pub fn extract_declarations(pal: &PalHandle, path: &FilePath) -> SwagdocResult<Vec<Declaration>> {
    let mut declarations = Vec::new();
    for fragment in extract(pal, path)? {
        let Some(documents) = filter_swagger_tags(&fragment)? else {
            continue;
        };
        let location = fragment.location();
        for document in documents {
            declarations.push(Declaration::classify(document, &location)?);
        }
    }
    Ok(declarations)
}

fn worker_count() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Extract every file on at most `workers` scoped threads, each taking a contiguous
/// chunk. Results come back in the order of `files`.
fn extract_all(
    pal: &PalHandle,
    files: &[FilePath],
    workers: usize,
) -> Vec<SwagdocResult<Vec<Declaration>>> {
    if files.is_empty() {
        return Vec::new();
    }
    let chunk_size = files.len().div_ceil(workers.max(1));
    thread::scope(|scope| {
        let handles: Vec<_> = files
            .chunks(chunk_size)
            .map(|chunk| {
                let handle = scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|path| extract_declarations(pal, path))
                        .collect::<Vec<_>>()
                });
                (chunk.len(), handle)
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|(len, handle)| {
                handle.join().unwrap_or_else(|_| {
                    (0..len)
                        .map(|_| Err(swagdoc_base::err!("extraction thread panicked")))
                        .collect()
                })
            })
            .collect()
    })
}

/// Scan, extract and merge every source location into `registry`, then mark it ready.
#[instrument(skip_all, fields(location_count = sources.len()))]
pub fn discover(
    pal: &PalHandle,
    sources: &[String],
    registry: &RegistryHandle,
) -> SwagdocResult<DiscoveryReport> {
    let scan = scan_sources(pal, sources)?;
    let mut report = DiscoveryReport {
        files: scan.files,
        errors: scan
            .errors
            .into_iter()
            .map(|e| DiscoveryError {
                location: e.location,
                error: e.error,
            })
            .collect(),
        ..DiscoveryReport::default()
    };

    let extracted = extract_all(pal, &report.files, worker_count());

    for (path, result) in report.files.iter().zip(extracted) {
        let outcome = result.and_then(|declarations| {
            registry
                .write(|store| merge(store, path, declarations))
                .with_context(|| format!("merging {}", path))
        });
        match outcome {
            Ok(outcome) => {
                report.merged += 1;
                report.dropped_operations += outcome.dropped_operations;
            }
            Err(error) => {
                warn!(location = %path, error = %error, "skipping source location");
                report.errors.push(DiscoveryError {
                    location: path.to_string(),
                    error,
                });
            }
        }
    }

    registry.mark_ready();
    info!(
        files = report.files.len(),
        merged = report.merged,
        resources = registry.len()?,
        errors = report.errors.len(),
        "discovery complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryRegistry;
    use swagdoc_base::MockPal;
    use swagdoc_base::error::ErrorKind;

    const LOGIN_JS: &str = r#"
/**
 * @swagger
 * resourcePath: /login
 * description: All about API
 */

/**
 * @swagger
 * path: /login
 * operations:
 *   -  httpMethod: POST
 *      nickname: login
 */
exports.login = function (req, res) {};
"#;

    fn setup(files: &[(&str, &str)]) -> (PalHandle, RegistryHandle) {
        let mock = MockPal::new();
        for (path, content) in files {
            mock.add_file(FilePath::from(*path), content.as_bytes().to_vec());
        }
        (
            PalHandle::new(mock),
            RegistryHandle::new(InMemoryRegistry::new()),
        )
    }

    fn sources(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_declarations() {
        let (pal, _) = setup(&[("api.js", LOGIN_JS)]);
        let declarations = extract_declarations(&pal, &FilePath::from("api.js")).unwrap();
        assert_eq!(declarations.len(), 2);
        assert!(matches!(declarations[0], Declaration::Resource(_)));
        assert!(matches!(declarations[1], Declaration::Operation(_)));
    }

    #[test]
    fn test_discover_marks_ready() {
        let (pal, registry) = setup(&[("api.js", LOGIN_JS)]);
        assert!(!registry.is_ready());

        let report = discover(&pal, &sources(&["api.js"]), &registry).unwrap();

        assert!(registry.is_ready());
        assert!(!report.has_errors());
        assert_eq!(report.merged, 1);
        assert_eq!(registry.get("/login").unwrap().unwrap().apis.len(), 1);
    }

    #[test]
    fn test_failures_are_scoped_to_location() {
        let (pal, registry) = setup(&[
            ("api.js", LOGIN_JS),
            ("bad.yml", "resourcePath: [\n"),
            ("notes.txt", "hello"),
        ]);

        let report = discover(
            &pal,
            &sources(&["bad.yml", "notes.txt", "missing.js", "api.js"]),
            &registry,
        )
        .unwrap();

        assert_eq!(report.merged, 1);
        let failed: Vec<&str> = report.errors.iter().map(|e| e.location.as_str()).collect();
        assert_eq!(failed, vec!["bad.yml", "notes.txt", "missing.js"]);
        assert!(matches!(
            report.errors[1].error.kind(),
            ErrorKind::UnsupportedFormat { .. }
        ));
        assert!(registry.contains("/login").unwrap());
        assert!(registry.is_ready());
    }

    #[test]
    fn test_malformed_payload_aborts_only_its_location() {
        let (pal, registry) = setup(&[
            (
                "broken.js",
                "/**\n * @swagger\n * resourcePath: /broken\n * ---\n * - not a mapping\n */",
            ),
            ("api.js", LOGIN_JS),
        ]);
        let report = discover(&pal, &sources(&["broken.js", "api.js"]), &registry).unwrap();

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].error.to_string().contains("malformed payload"));
        assert!(!registry.contains("/broken").unwrap());
        assert!(registry.contains("/login").unwrap());
    }

    #[test]
    fn test_extract_all_keeps_file_order_with_few_workers() {
        let names: Vec<String> = (0..7).map(|i| format!("r{}.js", i)).collect();
        let texts: Vec<String> = (0..7)
            .map(|i| format!("/**\n * @swagger\n * resourcePath: /r{}\n */", i))
            .collect();
        let files: Vec<(&str, &str)> = names
            .iter()
            .zip(&texts)
            .map(|(n, t)| (n.as_str(), t.as_str()))
            .collect();
        let (pal, registry) = setup(&files);
        let paths: Vec<FilePath> = names.iter().map(|n| FilePath::from(n.as_str())).collect();

        let results = extract_all(&pal, &paths, 2);
        assert_eq!(results.len(), 7);
        for (i, result) in results.into_iter().enumerate() {
            let declarations = result.unwrap();
            let Declaration::Resource(header) = &declarations[0] else {
                panic!("expected a resource declaration");
            };
            assert_eq!(header.resource_path, format!("/r{}", i));
        }
        assert!(extract_all(&pal, &[], 4).is_empty());

        let report = discover(&pal, &names, &registry).unwrap();
        assert_eq!(report.merged, 7);
        let order: Vec<String> = registry
            .summaries()
            .unwrap()
            .into_iter()
            .map(|s| s.resource_path)
            .collect();
        let expected: Vec<String> = (0..7).map(|i| format!("/r{}", i)).collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_merge_order_follows_configuration() {
        let first = "/**\n * @swagger\n * resourcePath: /shared\n * description: first\n */";
        let second = "/**\n * @swagger\n * resourcePath: /shared\n * description: second\n */";
        let (pal, registry) = setup(&[("b.js", first), ("a.js", second)]);

        discover(&pal, &sources(&["b.js", "a.js"]), &registry).unwrap();

        let summaries = registry.summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].description.as_deref(), Some("first"));
    }
}
