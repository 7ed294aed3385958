/* 📖 # Why dispatch extraction on the file suffix?

A source location is either code with documentation comments, CoffeeScript whose block
comments must be rewritten first, or a standalone YAML declaration. The suffix is the
only signal available before reading the file, so `SourceFormat::from_path` decides the
strategy up front and unknown suffixes fail before any I/O happens.

Every strategy ends in the same shape, a list of fragments, so the tag filter and the
merger never need to know where a fragment came from.
*/

use serde_json::Value;
use tracing::{debug, instrument};

use swagdoc_base::error::ErrorKind;
use swagdoc_base::{FilePath, PalHandle, SwagdocError, SwagdocResult};

use crate::comment_parser::{BlockStyle, CommentParser};
use crate::model::{Annotation, Fragment};
use crate::tags::SWAGGER_TAG;
use crate::transpile::transpile_coffee;

/// Extraction strategy for a source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// JavaScript-family source scanned for `/** */` blocks.
    Script,
    /// CoffeeScript, transpiled before scanning.
    Coffee,
    /// Standalone YAML declaration.
    Yaml,
}

impl SourceFormat {
    /// Pick the strategy for `path` by its suffix.
    pub fn from_path(path: &FilePath) -> SwagdocResult<Self> {
        let extension = path.extension().unwrap_or_default();
        match extension {
            "js" | "ts" | "jsx" | "tsx" | "mjs" | "cjs" => Ok(Self::Script),
            "coffee" => Ok(Self::Coffee),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(Box::new(SwagdocError::new(ErrorKind::UnsupportedFormat {
                path: path.to_string(),
                extension: extension.to_string(),
            }))),
        }
    }
}

/// Read `path` and return the fragments it contains.
#[instrument(skip(pal))]
pub fn extract(pal: &PalHandle, path: &FilePath) -> SwagdocResult<Vec<Fragment>> {
    let format = SourceFormat::from_path(path)?;
    let text = pal.read_file_to_string(path)?;

    let fragments = match format {
        SourceFormat::Script => CommentParser::new().parse(path, &text),
        SourceFormat::Coffee => {
            let transpiled = transpile_coffee(path, &text)?;
            let fragments =
                CommentParser::with_style(BlockStyle::AnyComment).parse(path, &transpiled);
            if fragments.is_empty() {
                return Err(Box::new(SwagdocError::parse(
                    path.to_string(),
                    "no comment block found after transpiling",
                )));
            }
            fragments
        }
        SourceFormat::Yaml => vec![load_yaml(path, text)?],
    };

    debug!(fragments = fragments.len(), ?format, "extracted source location");
    Ok(fragments)
}

/// Wrap a YAML declaration file as a single fragment with one swagger annotation.
fn load_yaml(path: &FilePath, text: String) -> SwagdocResult<Fragment> {
    let document: Value = serde_yaml::from_str(&text)
        .map_err(|e| Box::new(SwagdocError::parse(path.to_string(), e.to_string())))?;
    match document.get("resourcePath") {
        Some(Value::String(_)) => {}
        Some(_) => {
            return Err(Box::new(SwagdocError::parse(
                path.to_string(),
                "malformed payload: 'resourcePath' must be a string",
            )));
        }
        None => {
            return Err(Box::new(SwagdocError::parse(
                path.to_string(),
                "a declaration file must be a mapping with a 'resourcePath'",
            )));
        }
    }

    let mut fragment = Fragment::new(path.clone(), 1);
    fragment
        .annotations
        .push(Annotation::new(SWAGGER_TAG, text));
    Ok(fragment)
}
