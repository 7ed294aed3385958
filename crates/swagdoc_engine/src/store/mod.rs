pub mod memory;
pub mod traits;

pub use memory::InMemoryRegistry;
pub use traits::{RegistryHandle, ResourceStore};
