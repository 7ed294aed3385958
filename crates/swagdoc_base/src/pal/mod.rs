/* 📖 # What is the Platform Abstraction Layer?

The PAL provides a trait-based abstraction over filesystem access and HTTP serving,
enabling testable code. Source discovery reads files through it, the documentation
service serves browser assets through it, and the CLI starts the HTTP listener with it.

Code depends on the Pal trait, not on RealPal or MockPal.
*/

mod file_path;
pub mod http;
pub mod mock;
pub mod real_pal;
mod traits;

pub use file_path::FilePath;
pub use mock::MockPal;
pub use real_pal::RealPal;
pub use traits::{Pal, PalHandle, ReadSeek};
