use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::{debug, error, info, instrument, warn};
use walkdir::WalkDir;

use crate::{SwagdocError, SwagdocResult, error::ErrorKind};

use super::FilePath;
use super::http::{
    HttpMethod, HttpRequest, HttpResponse, HttpServerConfig, HttpServerHandle, HttpService,
    HttpStatusCode,
};
use super::traits::{Pal, ReadSeek};

/* 📖 # Why use std::fs and threads instead of async?

Discovery reads a handful of source files once at start-up and the service answers a
few read-only routes. Blocking std::fs calls and tiny_http's thread-per-request model
are sufficient and keep the codebase free of an async runtime.
*/

/// Concrete PAL implementation using the real filesystem and tiny_http.
///
/// All file paths are resolved relative to a configured base directory.
#[derive(Debug)]
pub struct RealPal {
    base_dir: PathBuf,
}

impl RealPal {
    /// Create a new RealPal with the given base directory.
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve a FilePath to an absolute filesystem path.
    fn resolve_path(&self, path: &FilePath) -> PathBuf {
        self.base_dir.join(path.as_path())
    }

    fn file_error(path: PathBuf, source: std::io::Error) -> Box<SwagdocError> {
        Box::new(SwagdocError::new(ErrorKind::FileError { path, source }))
    }

    /// Build a GlobSet from the given glob patterns.
    #[instrument(skip(self))]
    fn build_glob_set(&self, globs: &[String]) -> SwagdocResult<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for (idx, glob) in globs.iter().enumerate() {
            let compiled = GlobBuilder::new(glob).build().map_err(|e| {
                debug!(index = idx, pattern = %glob, error = %e, "failed to compile glob pattern");
                crate::err!("Invalid glob pattern '{}': {}", glob, e)
            })?;
            builder.add(compiled);
        }
        builder
            .build()
            .map_err(|e| crate::err!("Failed to build glob set: {}", e))
    }
}

impl Pal for RealPal {
    #[instrument(skip(self), fields(path = %path))]
    fn file_exists(&self, path: &FilePath) -> SwagdocResult<bool> {
        let resolved = self.resolve_path(path);
        let exists = resolved.is_file();
        debug!(exists, resolved = %resolved.display(), "checked file existence");
        Ok(exists)
    }

    #[instrument(skip(self), fields(path = %path))]
    fn is_directory(&self, path: &FilePath) -> SwagdocResult<bool> {
        Ok(self.resolve_path(path).is_dir())
    }

    #[instrument(skip(self), fields(path = %path))]
    fn read_file(&self, path: &FilePath) -> SwagdocResult<Box<dyn ReadSeek + 'static>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "opening file for reading");
        let file = fs::File::open(&resolved).map_err(|e| {
            debug!(error = %e, "failed to open file");
            Self::file_error(resolved, e)
        })?;
        Ok(Box::new(file))
    }

    #[instrument(skip(self), fields(path = %path, globs = ?globs))]
    fn walk_directory(
        &self,
        path: &FilePath,
        globs: &[String],
    ) -> SwagdocResult<Box<dyn Iterator<Item = SwagdocResult<FilePath>> + '_>> {
        let resolved = self.resolve_path(path);
        debug!(resolved = %resolved.display(), "starting directory walk");

        if !resolved.is_dir() {
            return Err(Self::file_error(
                resolved,
                std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            ));
        }

        let glob_set = self.build_glob_set(globs)?;
        let base_path = path.clone();
        let iter = WalkDir::new(&resolved)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(e) => {
                    if !e.file_type().is_file() {
                        return None;
                    }
                    let relative = e.path().strip_prefix(&resolved).ok()?;
                    if !glob_set.is_match(relative) {
                        return None;
                    }
                    let relative = relative.to_string_lossy().replace('\\', "/");
                    Some(Ok(base_path.join(relative)))
                }
                Err(e) => {
                    debug!(error = %e, "error walking directory");
                    Some(Err(Self::file_error(
                        e.path()
                            .map(|p| p.to_path_buf())
                            .unwrap_or_else(|| PathBuf::from("unknown")),
                        std::io::Error::other(e.to_string()),
                    )))
                }
            });

        Ok(Box::new(iter))
    }

    #[instrument(skip(self, service), fields(address = %config.address()))]
    fn start_http_server(
        &self,
        service: Box<dyn HttpService>,
        config: HttpServerConfig,
    ) -> SwagdocResult<HttpServerHandle> {
        let server = tiny_http::Server::http(config.address())
            .map_err(|e| crate::err!("Failed to bind {}: {}", config.address(), e))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| crate::err!("Server is not listening on an IP address"))?;
        info!(host = %config.host, port, "HTTP server listening");

        let handle = HttpServerHandle::new(port);
        let shutdown = handle.clone();
        let service: Arc<dyn HttpService> = Arc::from(service);
        let server_name = config.server_name;

        std::thread::spawn(move || {
            while !shutdown.is_shutdown() {
                let request = match server.recv_timeout(Duration::from_millis(200)) {
                    Ok(Some(request)) => request,
                    Ok(None) => continue,
                    Err(e) => {
                        error!(error = %e, "failed to receive request");
                        continue;
                    }
                };
                let service = Arc::clone(&service);
                let server_name = server_name.clone();
                std::thread::spawn(move || serve_request(request, service.as_ref(), &server_name));
            }
            debug!("HTTP server stopped");
        });

        Ok(handle)
    }
}

/// Translate one tiny_http request through the service and send the answer.
fn serve_request(mut request: tiny_http::Request, service: &dyn HttpService, server_name: &str) {
    let Some(method) = HttpMethod::parse(request.method().as_str()) else {
        let response = tiny_http::Response::empty(HttpStatusCode::MethodNotAllowed.as_u16());
        let _ = request.respond(response);
        return;
    };

    let mut body = Vec::new();
    if let Err(e) = request.as_reader().read_to_end(&mut body) {
        warn!(error = %e, "failed to read request body");
    }
    let mut http_request = HttpRequest::new(method.clone(), request.url()).with_body(body);
    for header in request.headers() {
        http_request = http_request.with_header(header.field.as_str().as_str(), header.value.as_str());
    }

    let response = match service.handle_request(http_request) {
        Ok(response) => response,
        Err(e) => {
            error!(url = %request.url(), error = %e, "service failed to handle request");
            HttpResponse::text(e.to_string()).with_status(HttpStatusCode::NetworkConnectTimeoutError)
        }
    };
    debug!(method = %method, url = %request.url(), status = response.status().as_u16(), "request served");

    let status = response.status().as_u16();
    let mut headers = vec![("Server".to_string(), server_name.to_string())];
    headers.extend(
        response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string())),
    );
    let mut tiny_response =
        tiny_http::Response::from_data(response.into_body().into_bytes()).with_status_code(status);
    for (key, value) in headers {
        match tiny_http::Header::from_bytes(key.as_bytes(), value.as_bytes()) {
            Ok(header) => tiny_response.add_header(header),
            Err(()) => warn!(header = %key, "dropping invalid response header"),
        }
    }
    if let Err(e) = request.respond(tiny_response) {
        warn!(error = %e, "failed to send response");
    }
}
