/* 📖 # Why have swagdoc_base as a core library?
swagdoc_base provides the foundational error handling, tracing setup and the platform
abstraction layer used across all crates.
This ensures consistency in error handling and prevents circular dependencies between crates.
*/

pub mod error;
mod error_tests;
pub mod pal;
pub mod tracing;

// Re-export commonly used types for convenience
pub use error::{ResultExt, SwagdocError, SwagdocResult};
pub use pal::{FilePath, MockPal, Pal, PalHandle, RealPal};
