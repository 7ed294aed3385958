use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::Cursor;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use globset::{GlobBuilder, GlobSetBuilder};

use crate::SwagdocError;
use crate::SwagdocResult;
use crate::error::ErrorKind;

use super::FilePath;
use super::http::{HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why keep MockPal storage in ordered maps?

MockPal is an in-memory filesystem for unit tests: no I/O, no side effects, and easy
injection of broken files. Files live in a BTreeMap so that walking a "directory"
yields paths in a stable order, which keeps discovery tests deterministic.
*/

/// In-memory PAL implementation for testing.
///
/// # Examples
///
/// ```
/// use swagdoc_base::{MockPal, Pal, FilePath};
///
/// let mock = MockPal::new();
/// mock.add_file(FilePath::from("api.yml"), b"resourcePath: /x".to_vec());
/// let content = mock.read_file_to_string(&FilePath::from("api.yml")).unwrap();
/// assert_eq!(content, "resourcePath: /x");
/// ```
#[derive(Debug, Clone)]
pub struct MockPal {
    files: Arc<Mutex<BTreeMap<FilePath, Vec<u8>>>>,
    directories: Arc<Mutex<BTreeSet<FilePath>>>,
    http_servers: Arc<Mutex<HashMap<u16, Arc<dyn HttpService>>>>,
    next_port: Arc<AtomicU16>,
}

impl MockPal {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            directories: Arc::new(Mutex::new(BTreeSet::new())),
            http_servers: Arc::new(Mutex::new(HashMap::new())),
            next_port: Arc::new(AtomicU16::new(10000)),
        }
    }

    /// Add a file to the mock storage.
    pub fn add_file(&self, path: FilePath, content: Vec<u8>) {
        self.files.lock().unwrap().insert(path, content);
    }

    /// Add a directory to the mock storage.
    pub fn add_directory(&self, path: FilePath) {
        self.directories.lock().unwrap().insert(path);
    }

    /// Simulate an HTTP request to a running server.
    ///
    /// Looks up the service registered for `port` and invokes it directly.
    pub fn simulate_request(&self, port: u16, request: HttpRequest) -> SwagdocResult<HttpResponse> {
        let service = self
            .http_servers
            .lock()
            .unwrap()
            .get(&port)
            .cloned()
            .ok_or_else(|| crate::err!("No HTTP server registered on port {}", port))?;
        service.handle_request(request)
    }

    /// Get the number of registered HTTP servers.
    pub fn http_server_count(&self) -> usize {
        self.http_servers.lock().unwrap().len()
    }
}

impl Default for MockPal {
    fn default() -> Self {
        Self::new()
    }
}

impl Pal for MockPal {
    fn file_exists(&self, path: &FilePath) -> SwagdocResult<bool> {
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    fn is_directory(&self, path: &FilePath) -> SwagdocResult<bool> {
        if self.directories.lock().unwrap().contains(path) {
            return Ok(true);
        }
        // A directory exists implicitly when some file lives below it.
        let prefix = format!("{}/", path.as_str().trim_end_matches('/'));
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .any(|file| file.as_str().starts_with(&prefix)))
    }

    fn read_file(&self, path: &FilePath) -> SwagdocResult<Box<dyn ReadSeek + 'static>> {
        let content = self
            .files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                Box::new(SwagdocError::new(ErrorKind::FileError {
                    path: path.as_path().to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("File not found: {}", path),
                    ),
                }))
            })?;
        Ok(Box::new(Cursor::new(content)))
    }

    /// Matches the globs against every stored file; the directory argument is ignored.
    fn walk_directory(
        &self,
        _path: &FilePath,
        globs: &[String],
    ) -> SwagdocResult<Box<dyn Iterator<Item = SwagdocResult<FilePath>> + '_>> {
        let mut builder = GlobSetBuilder::new();
        for glob in globs {
            let compiled = GlobBuilder::new(glob)
                .build()
                .map_err(|e| crate::err!("Invalid glob pattern '{}': {}", glob, e))?;
            builder.add(compiled);
        }
        let glob_set = builder
            .build()
            .map_err(|e| crate::err!("Failed to build glob set: {}", e))?;

        let matching: Vec<FilePath> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter(|path| glob_set.is_match(path.as_path()))
            .cloned()
            .collect();
        Ok(Box::new(matching.into_iter().map(Ok)))
    }

    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> SwagdocResult<HttpServerHandle> {
        let port = match config.port {
            Some(p) => p,
            None => self.next_port.fetch_add(1, Ordering::SeqCst),
        };
        self.http_servers
            .lock()
            .unwrap()
            .insert(port, Arc::from(service));
        Ok(HttpServerHandle::new(port))
    }
}
