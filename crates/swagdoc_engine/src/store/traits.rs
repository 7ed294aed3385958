/* 📖 # Why a ResourceStore trait behind a RegistryHandle?

Discovery writes the registry once; every HTTP request thread reads it afterwards. The
trait keeps the merge logic independent of how resources are kept, and RegistryHandle
wraps the store in `Arc<RwLock<..>>` so discovery and the service share one explicitly
owned registry. A merge of one source location takes a single write lock, so readers
never see a half-merged location.

The handle also carries the readiness flag: the service refuses to answer until
discovery has finished merging every location.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use swagdoc_base::SwagdocResult;

use crate::model::{Resource, ResourceSummary};

/// Keyed storage of resources plus the ordered summary index.
pub trait ResourceStore: Send + Sync + 'static {
    /// Retrieve a copy of the resource registered under `resource_path`.
    fn get(&self, resource_path: &str) -> SwagdocResult<Option<Resource>>;

    fn contains(&self, resource_path: &str) -> SwagdocResult<bool>;

    /// Insert or replace the resource under its path.
    ///
    /// Replacing keeps the resource's original position in iteration order.
    fn commit(&mut self, resource: Resource) -> SwagdocResult<()>;

    /// Add an index entry unless one exists for the same path.
    ///
    /// Returns true if the entry was added; the first registration wins.
    fn register_summary(&mut self, summary: ResourceSummary) -> SwagdocResult<bool>;

    /// Index entries in registration order.
    fn summaries(&self) -> SwagdocResult<Vec<ResourceSummary>>;

    /// All resources in insertion order.
    fn list(&self) -> SwagdocResult<Vec<Resource>>;

    fn len(&self) -> SwagdocResult<usize>;

    fn is_empty(&self) -> SwagdocResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// A thread-safe, cheaply cloneable handle to the resource registry.
#[derive(Clone)]
pub struct RegistryHandle {
    store: Arc<RwLock<dyn ResourceStore>>,
    ready: Arc<AtomicBool>,
}

impl RegistryHandle {
    pub fn new<S: ResourceStore>(store: S) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn write<R>(&self, f: impl FnOnce(&mut dyn ResourceStore) -> R) -> R {
        let mut guard = self.store.write();
        f(&mut *guard)
    }

    /// Run `f` with shared access to the store.
    pub fn read<R>(&self, f: impl FnOnce(&dyn ResourceStore) -> R) -> R {
        let guard = self.store.read();
        f(&*guard)
    }

    pub fn get(&self, resource_path: &str) -> SwagdocResult<Option<Resource>> {
        self.store.read().get(resource_path)
    }

    pub fn contains(&self, resource_path: &str) -> SwagdocResult<bool> {
        self.store.read().contains(resource_path)
    }

    pub fn summaries(&self) -> SwagdocResult<Vec<ResourceSummary>> {
        self.store.read().summaries()
    }

    pub fn list(&self) -> SwagdocResult<Vec<Resource>> {
        self.store.read().list()
    }

    pub fn len(&self) -> SwagdocResult<usize> {
        self.store.read().len()
    }

    pub fn is_empty(&self) -> SwagdocResult<bool> {
        self.store.read().is_empty()
    }

    /// Signal that discovery has completed.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryHandle")
            .field("ready", &self.is_ready())
            .finish()
    }
}
