use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use swagdoc_base::{SwagdocError, SwagdocResult};

use crate::model::Fragment;

/// Title of the annotation that carries API declarations.
pub const SWAGGER_TAG: &str = "swagger";

/// Parse the body of the fragment's first `swagger` annotation.
///
/// The body may hold several `---`-separated YAML documents; empty documents are
/// skipped. Returns `None` when the fragment has no `swagger` annotation. Later
/// `swagger` annotations in the same fragment are ignored.
pub fn filter_swagger_tags(fragment: &Fragment) -> SwagdocResult<Option<Vec<Value>>> {
    let Some(annotation) = fragment.annotation(SWAGGER_TAG) else {
        return Ok(None);
    };

    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(&annotation.body) {
        let value = Value::deserialize(document).map_err(|e| {
            Box::new(SwagdocError::parse(
                fragment.source.to_string(),
                format!("invalid YAML in block at line {}: {}", fragment.line, e),
            ))
        })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    debug!(
        location = %fragment.location(),
        documents = documents.len(),
        "parsed swagger annotation"
    );
    Ok(Some(documents))
}
