/* 📖 # Why is the configuration a TOML file?

swagdoc runs as a standalone process, so the options a host application would pass in
code live in `swagdoc.toml` instead. Optional keys carry their defaults through serde;
required keys stay `Option` so that `validate()` can report every missing key as a
Configuration error rather than a generic deserialization failure.
*/

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use swagdoc_base::{FilePath, PalHandle, ResultExt, SwagdocError, SwagdocResult};

/// Configuration for a swagdoc documentation service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Public base URL (or path) of the documented API. Required.
    pub base_path: Option<String>,
    #[serde(default = "default_version")]
    pub api_version: String,
    #[serde(default = "default_version")]
    pub swagger_version: String,
    /// URL prefix under which the documentation browser is served.
    #[serde(default = "default_browser_url")]
    pub browser_url: String,
    /// URL prefix of the JSON description, relative to `base_path`.
    #[serde(default = "default_json_url")]
    pub json_url: String,
    /// Directory holding the static browser assets. Required.
    pub browser_dir: Option<String>,
    /// Resource name that serves the consolidated single-page view.
    #[serde(default)]
    pub single_page_path: Option<String>,
    /// Overrides the JSON path derived from `base_path` and `json_url`.
    #[serde(default)]
    pub full_json_path: Option<String>,
    /// Free-form block copied into the index output.
    #[serde(default)]
    pub info: Option<serde_json::Value>,
    /// Source locations (paths or globs), merged in this order.
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Listener settings for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

fn default_browser_url() -> String {
    "/swagger".to_string()
}

fn default_json_url() -> String {
    "/api-docs.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Parse a configuration from TOML text without validating it.
    pub fn from_toml(text: &str) -> SwagdocResult<Self> {
        toml::from_str(text).map_err(|e| Box::new(SwagdocError::configuration(e.to_string())))
    }

    /// Check that every required option is present and usable.
    pub fn validate(&self) -> SwagdocResult<()> {
        self.base_path()?;
        self.browser_dir()?;
        if self.sources.is_empty() {
            return Err(Box::new(SwagdocError::configuration(
                "'sources' must list at least one source location",
            )));
        }
        if !self.browser_url.starts_with('/') {
            return Err(Box::new(SwagdocError::configuration(format!(
                "'browser_url' must start with '/', got '{}'",
                self.browser_url
            ))));
        }
        self.full_json_path()?;
        Ok(())
    }

    pub fn base_path(&self) -> SwagdocResult<&str> {
        required(&self.base_path, "base_path")
    }

    pub fn browser_dir(&self) -> SwagdocResult<&str> {
        required(&self.browser_dir, "browser_dir")
    }

    /// The request path under which the index JSON is served.
    ///
    /// Derived from the path component of `base_path` joined with `json_url`, unless
    /// `full_json_path` overrides it.
    pub fn full_json_path(&self) -> SwagdocResult<String> {
        if let Some(path) = &self.full_json_path {
            return Ok(normalize_path(path));
        }
        let joined = format!(
            "{}/{}",
            self.base_path()?.trim_end_matches('/'),
            self.json_url.trim_start_matches('/')
        );
        let path = match Url::parse(&joined) {
            Ok(url) if url.has_host() => url.path().to_string(),
            // Not an absolute URL, treat the whole base as a path.
            _ => joined,
        };
        Ok(normalize_path(&path))
    }
}

fn required<'a>(value: &'a Option<String>, key: &str) -> SwagdocResult<&'a str> {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Box::new(SwagdocError::configuration(format!(
            "missing required option '{}'",
            key
        )))),
    }
}

/// Ensure a leading slash, collapse repeated slashes and drop a trailing one.
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Load and validate the configuration file at `path`.
#[instrument(skip(pal))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> SwagdocResult<Config> {
    let text = pal
        .read_file_to_string(path)
        .with_context(|| format!("reading configuration {}", path))?;
    let config = Config::from_toml(&text).with_context(|| format!("parsing {}", path))?;
    config.validate().with_context(|| format!("validating {}", path))?;
    let browser_dir = FilePath::from(config.browser_dir()?);
    if !pal.is_directory(&browser_dir)? {
        warn!(%browser_dir, "browser directory does not exist, assets will answer 404");
    }
    debug!(sources = config.sources.len(), "configuration loaded");
    Ok(config)
}
