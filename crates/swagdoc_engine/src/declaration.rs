/* 📖 # Why classify YAML documents into a Declaration enum?

A swagger annotation can hold three kinds of documents: a resource header, a block of
model schemas, or an operation. Classifying them once into a tagged enum means the
merger matches on variants instead of probing JSON keys, and malformed payloads are
rejected here, before anything touches the registry.
*/

use serde_json::{Map, Value};

use swagdoc_base::{SwagdocError, SwagdocResult};

use crate::model::Models;

/// Header declaring (or re-opening) a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceDeclaration {
    pub resource_path: String,
    pub description: Option<String>,
    /// Operations declared inline, as in standalone YAML files.
    pub apis: Vec<Value>,
    /// Models declared inline.
    pub models: Models,
}

/// One classified swagger document.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Resource(ResourceDeclaration),
    Models(Models),
    Operation(Value),
}

impl Declaration {
    /// Classify a parsed document.
    ///
    /// A `resourcePath` key makes a resource declaration, otherwise a `models` key makes
    /// a models declaration, otherwise the mapping is an operation. `source` names the
    /// location in error messages.
    pub fn classify(value: Value, source: &str) -> SwagdocResult<Declaration> {
        let Value::Object(mut map) = value else {
            return Err(malformed(source, "expected a mapping"));
        };

        if let Some(path) = map.remove("resourcePath") {
            let Value::String(resource_path) = path else {
                return Err(malformed(source, "'resourcePath' must be a string"));
            };
            let description = match map.remove("description") {
                None | Some(Value::Null) => None,
                Some(Value::String(description)) => Some(description),
                Some(_) => return Err(malformed(source, "'description' must be a string")),
            };
            let apis = match map.remove("apis") {
                None | Some(Value::Null) => Vec::new(),
                Some(Value::Array(apis)) => apis,
                Some(_) => return Err(malformed(source, "'apis' must be a sequence")),
            };
            let models = match map.remove("models") {
                None | Some(Value::Null) => Models::new(),
                Some(Value::Object(models)) => into_models(models),
                Some(_) => return Err(malformed(source, "'models' must be a mapping")),
            };
            return Ok(Declaration::Resource(ResourceDeclaration {
                resource_path,
                description,
                apis,
                models,
            }));
        }

        if let Some(models) = map.get("models") {
            let Value::Object(models) = models else {
                return Err(malformed(source, "'models' must be a mapping"));
            };
            return Ok(Declaration::Models(into_models(models.clone())));
        }

        Ok(Declaration::Operation(Value::Object(map)))
    }
}

fn into_models(map: Map<String, Value>) -> Models {
    map.into_iter().collect()
}

fn malformed(source: &str, detail: &str) -> Box<SwagdocError> {
    Box::new(SwagdocError::parse(
        source,
        format!("malformed payload: {}", detail),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use swagdoc_base::error::ErrorKind;

    fn classify(value: Value) -> SwagdocResult<Declaration> {
        Declaration::classify(value, "api.js:1")
    }

    #[test]
    fn test_resource_declaration() {
        let declaration = classify(json!({
            "resourcePath": "/login",
            "description": "All about API"
        }))
        .unwrap();
        assert_eq!(
            declaration,
            Declaration::Resource(ResourceDeclaration {
                resource_path: "/login".to_string(),
                description: Some("All about API".to_string()),
                apis: vec![],
                models: Models::new(),
            })
        );
    }

    #[test]
    fn test_resource_declaration_with_inline_content() {
        let declaration = classify(json!({
            "resourcePath": "/pets",
            "apis": [{"path": "/pets"}],
            "models": {"Pet": {"id": "Pet"}, "Tag": {"id": "Tag"}}
        }))
        .unwrap();
        let Declaration::Resource(resource) = declaration else {
            panic!("expected a resource declaration");
        };
        assert_eq!(resource.description, None);
        assert_eq!(resource.apis, vec![json!({"path": "/pets"})]);
        assert_eq!(
            resource.models.keys().collect::<Vec<_>>(),
            vec!["Pet", "Tag"]
        );
    }

    #[test]
    fn test_models_declaration() {
        let declaration = classify(json!({"models": {"User": {"id": "User"}}})).unwrap();
        let Declaration::Models(models) = declaration else {
            panic!("expected a models declaration");
        };
        assert_eq!(models["User"], json!({"id": "User"}));
    }

    #[test]
    fn test_operation_declaration() {
        let operation = json!({"path": "/login", "operations": [{"httpMethod": "POST"}]});
        assert_eq!(
            classify(operation.clone()).unwrap(),
            Declaration::Operation(operation)
        );
    }

    #[test]
    fn test_malformed_payloads() {
        for value in [
            json!("just a string"),
            json!([1, 2]),
            json!({"resourcePath": 42}),
            json!({"resourcePath": "/x", "apis": "nope"}),
            json!({"models": ["User"]}),
        ] {
            let err = classify(value).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::Parse { .. }));
            assert!(err.to_string().contains("malformed payload"));
        }
    }
}
