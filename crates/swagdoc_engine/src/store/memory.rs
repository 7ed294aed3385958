/* 📖 # Why IndexMap for the in-memory registry?

Both the resource map and the summary index must iterate in insertion order: the
index lists resources in the order they were first declared and the consolidated view
concatenates operations in registry order. IndexMap gives that order together with
keyed lookup, and `insert` on an existing key replaces the value in place, which is
exactly the commit semantics the merger needs.
*/

use indexmap::IndexMap;

use swagdoc_base::SwagdocResult;

use crate::model::{Resource, ResourceSummary};
use crate::store::traits::ResourceStore;

/// A registry that keeps all resources in memory for the lifetime of the process.
///
/// # Example
///
/// ```
/// use swagdoc_engine::model::Resource;
/// use swagdoc_engine::store::{InMemoryRegistry, ResourceStore};
///
/// let mut registry = InMemoryRegistry::new();
/// registry.commit(Resource::new("/login", None)).unwrap();
///
/// assert!(registry.contains("/login").unwrap());
/// assert_eq!(registry.len().unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    resources: IndexMap<String, Resource>,
    summaries: IndexMap<String, ResourceSummary>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceStore for InMemoryRegistry {
    fn get(&self, resource_path: &str) -> SwagdocResult<Option<Resource>> {
        Ok(self.resources.get(resource_path).cloned())
    }

    fn contains(&self, resource_path: &str) -> SwagdocResult<bool> {
        Ok(self.resources.contains_key(resource_path))
    }

    fn commit(&mut self, resource: Resource) -> SwagdocResult<()> {
        self.resources
            .insert(resource.resource_path.clone(), resource);
        Ok(())
    }

    fn register_summary(&mut self, summary: ResourceSummary) -> SwagdocResult<bool> {
        if self.summaries.contains_key(&summary.resource_path) {
            return Ok(false);
        }
        self.summaries
            .insert(summary.resource_path.clone(), summary);
        Ok(true)
    }

    fn summaries(&self) -> SwagdocResult<Vec<ResourceSummary>> {
        Ok(self.summaries.values().cloned().collect())
    }

    fn list(&self) -> SwagdocResult<Vec<Resource>> {
        Ok(self.resources.values().cloned().collect())
    }

    fn len(&self) -> SwagdocResult<usize> {
        Ok(self.resources.len())
    }
}
