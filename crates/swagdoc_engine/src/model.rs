/* 📖 # Why are operations and models opaque JSON values?

swagdoc aggregates API descriptions, it does not validate them. Operations and model
schemas are carried through as `serde_json::Value` exactly as they were written, so any
Swagger 1.x construct survives the round trip from comment block to HTTP response.
Only the keys swagdoc itself routes on (`resourcePath`, `description`, `apis`,
`models`) are typed.
*/

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use swagdoc_base::FilePath;

/// Model schemas keyed by model name, in declaration order.
pub type Models = IndexMap<String, Value>;

/// One `@title body` pair of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub title: String,
    pub body: String,
}

impl Annotation {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A parsed unit from a comment block or a declarative file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// File the fragment was found in.
    pub source: FilePath,
    /// 1-indexed line where the fragment starts.
    pub line: usize,
    /// Free text before the first annotation.
    pub description: String,
    pub annotations: Vec<Annotation>,
}

impl Fragment {
    pub fn new(source: FilePath, line: usize) -> Self {
        Self {
            source,
            line,
            description: String::new(),
            annotations: Vec::new(),
        }
    }

    /// The first annotation with exactly the given title.
    pub fn annotation(&self, title: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.title == title)
    }

    /// `path:line`, used in log and error messages.
    pub fn location(&self) -> String {
        format!("{}:{}", self.source, self.line)
    }
}

/// Index entry for a registered resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSummary {
    #[serde(rename = "resourcePath")]
    pub resource_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A named group of operations and models, identified by its resource path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Resource {
    pub resource_path: String,
    pub description: Option<String>,
    pub apis: Vec<Value>,
    pub models: Models,
}

impl Resource {
    pub fn new(resource_path: impl Into<String>, description: Option<String>) -> Self {
        Self {
            resource_path: resource_path.into(),
            description,
            ..Self::default()
        }
    }

    pub fn summary(&self) -> ResourceSummary {
        ResourceSummary {
            resource_path: self.resource_path.clone(),
            description: self.description.clone(),
        }
    }
}
