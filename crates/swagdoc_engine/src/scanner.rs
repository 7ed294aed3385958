/* 📖 # Why expand source locations before extraction?

Configured sources are an ordered list of plain paths and glob patterns. Expanding
them up front turns the list into concrete files in a deterministic order (globs are
sorted), which is the order the merger later applies them in. A plain path is passed
through untouched: whether it exists is discovered when it is read, where the failure
is scoped to that one location. Errors while walking a glob are collected alongside
the results, so one bad pattern doesn't stop the others.
*/

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use swagdoc_base::{FilePath, PalHandle, SwagdocError, SwagdocResult};

/// Files found for the configured sources, plus per-location errors.
#[derive(Debug)]
pub struct ScanResult {
    /// Files in merge order, without duplicates.
    pub files: Vec<FilePath>,
    pub errors: Vec<ScanError>,
}

/// Error encountered while expanding one source location.
#[derive(Debug)]
pub struct ScanError {
    /// The configured location that failed.
    pub location: String,
    pub error: Box<SwagdocError>,
}

/// True if `location` contains glob metacharacters.
pub fn is_glob(location: &str) -> bool {
    location.contains(['*', '?', '[', '{'])
}

/// Expand source locations into files, preserving configuration order.
///
/// # Examples
/// ```
/// use swagdoc_base::{FilePath, MockPal, PalHandle};
/// use swagdoc_engine::scanner::scan_sources;
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("routes/b.js"), vec![]);
/// mock.add_file(FilePath::from("routes/a.js"), vec![]);
/// let pal = PalHandle::new(mock);
///
/// let sources = vec!["api.yml".to_string(), "routes/*.js".to_string()];
/// let result = scan_sources(&pal, &sources).unwrap();
/// assert_eq!(
///     result.files,
///     vec![FilePath::from("api.yml"), FilePath::from("routes/a.js"), FilePath::from("routes/b.js")]
/// );
/// ```
#[instrument(skip(pal, sources), fields(location_count = sources.len()))]
pub fn scan_sources(pal: &PalHandle, sources: &[String]) -> SwagdocResult<ScanResult> {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for location in sources {
        let expanded = if is_glob(location) {
            match expand_glob(pal, location) {
                Ok(matches) => {
                    if matches.is_empty() {
                        warn!(location = %location, "source pattern matched no files");
                    }
                    matches
                }
                Err(error) => {
                    warn!(location = %location, error = %error, "failed to expand source pattern");
                    errors.push(ScanError {
                        location: location.clone(),
                        error,
                    });
                    continue;
                }
            }
        } else {
            vec![FilePath::from(location.as_str())]
        };

        for file in expanded {
            if seen.insert(file.clone()) {
                files.push(file);
            } else {
                debug!(%file, "skipping source listed more than once");
            }
        }
    }

    debug!(
        files_found = files.len(),
        errors_count = errors.len(),
        "source scan complete"
    );
    Ok(ScanResult { files, errors })
}

fn expand_glob(pal: &PalHandle, pattern: &str) -> SwagdocResult<Vec<FilePath>> {
    let globs = vec![pattern.to_string()];
    let mut matches = pal
        .walk_directory(&FilePath::from(""), &globs)?
        .collect::<SwagdocResult<Vec<_>>>()?;
    matches.sort();
    Ok(matches)
}
