/* 📖 # Why one service for documentation JSON and browser assets?

The browser and the JSON it loads are served from the same origin, so a single
HttpService owns all routing: the index, single resources, the consolidated view and
the static browser directory. Requests only ever read, so the service holds a
DocumentBuilder (which snapshots the registry) and a PAL handle for assets.

Expected outcomes are plain responses: an unknown resource is a 404 with a JSON body,
a non-GET request is a 405. Only unexpected failures are returned as errors, which the
PAL turns into HTTP 599.
*/

use percent_encoding::percent_decode_str;
use serde::Serialize;
use tracing::{debug, info, warn};

use swagdoc_base::pal::http::{HttpMethod, HttpRequest, HttpResponse, HttpService, HttpStatusCode};
use swagdoc_base::{FilePath, PalHandle, SwagdocError, SwagdocResult};

use crate::builder::DocumentBuilder;

/// HTTP service exposing the aggregated documentation.
///
/// Routes, all GET only:
/// - `{browser_url}` redirects to `{browser_url}/`
/// - `{browser_url}/...` serves files from the browser directory
/// - `{full_json_path}` serves the index
/// - `{full_json_path}/{single_page_path}` serves the consolidated view
/// - `{full_json_path}/{name}` serves the resource `/{name}`
#[derive(Debug, Clone)]
pub struct DocService {
    pal: PalHandle,
    builder: DocumentBuilder,
    browser_dir: FilePath,
}

impl DocService {
    pub fn new(pal: PalHandle, builder: DocumentBuilder, browser_dir: FilePath) -> Self {
        Self {
            pal,
            builder,
            browser_dir,
        }
    }

    fn json_response<T: Serialize>(data: &T) -> SwagdocResult<HttpResponse> {
        serde_json::to_string(data)
            .map(HttpResponse::json)
            .map_err(|e| swagdoc_base::err!("JSON serialization error: {}", e))
    }

    fn route(&self, path: &str) -> SwagdocResult<HttpResponse> {
        let descriptor = self.builder.descriptor();
        let json_path = descriptor.full_json_path.as_str();

        if path == json_path || path.strip_prefix(json_path) == Some("/") {
            return Self::json_response(&self.builder.build_index()?);
        }
        if let Some(raw_name) = path
            .strip_prefix(json_path)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            let Ok(name) = percent_decode_str(raw_name).decode_utf8() else {
                return Ok(HttpResponse::new(HttpStatusCode::BadRequest));
            };
            if descriptor.single_page_path.as_deref() == Some(&*name) {
                return Self::json_response(&self.builder.build_consolidated()?);
            }
            return match self.builder.build_resource(&name)? {
                Some(resource) => Self::json_response(&resource),
                None => Err(Box::new(SwagdocError::not_found(format!("/{}", name)))),
            };
        }

        let browser_url = descriptor.browser_url.as_str();
        if !browser_url.is_empty() && path == browser_url {
            return Ok(HttpResponse::redirect(format!("{}/", browser_url)));
        }
        if let Some(asset) = path
            .strip_prefix(browser_url)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            return self.serve_asset(asset);
        }

        Ok(HttpResponse::not_found())
    }

    /// Serve a file from the browser directory.
    fn serve_asset(&self, raw_path: &str) -> SwagdocResult<HttpResponse> {
        let Ok(decoded) = percent_decode_str(raw_path).decode_utf8() else {
            return Ok(HttpResponse::new(HttpStatusCode::BadRequest));
        };
        let mut relative = decoded.trim_start_matches('/').to_string();
        if relative.is_empty() || relative.ends_with('/') {
            relative.push_str("index.html");
        }
        let relative = FilePath::from(relative);
        if relative.escapes_base() {
            warn!(path = %relative, "rejected asset path outside the browser directory");
            return Ok(HttpResponse::not_found());
        }

        let file = self.browser_dir.join(relative.as_str());
        if !self.pal.file_exists(&file)? {
            debug!(%file, "asset not found");
            return Ok(HttpResponse::not_found());
        }
        let content = self.pal.read_file_to_bytes(&file)?;
        Ok(HttpResponse::ok()
            .with_content_type(guess_content_type(relative.as_str()))
            .with_body(content))
    }
}

/// Guess the MIME type based on file extension.
pub fn guess_content_type(path: &str) -> &'static str {
    let path_lower = path.to_lowercase();
    let extension = path_lower.rsplit_once('.').map_or("", |(_, ext)| ext);
    match extension {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "map" => "application/json",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

impl HttpService for DocService {
    fn handle_request(&self, request: HttpRequest) -> SwagdocResult<HttpResponse> {
        if request.method() != &HttpMethod::Get {
            return Ok(HttpResponse::text("Only GET is supported")
                .with_status(HttpStatusCode::MethodNotAllowed)
                .with_header("Allow", "GET"));
        }
        if !self.builder.registry().is_ready() {
            return Ok(HttpResponse::text("Documentation is still being collected")
                .with_status(HttpStatusCode::ServiceUnavailable)
                .with_header("Retry-After", "1"));
        }

        let path = request.path();
        match self.route(path) {
            Err(error) if error.is_not_found() => {
                info!(path, "unknown resource requested");
                let body = serde_json::json!({ "error": error.to_string() });
                Ok(HttpResponse::json(body.to_string()).with_status(HttpStatusCode::NotFound))
            }
            result => result,
        }
    }
}
