/* 📖 # How the engine fits together

Sources are expanded by the scanner, turned into fragments by the extractor (with the
comment parser and the CoffeeScript transpiler), filtered down to swagger documents,
classified into declarations and merged into the registry by discovery. The builder
and the api service then serve read-only views of that registry.
*/

pub mod api;
pub mod builder;
pub mod comment_parser;
pub mod config;
pub mod declaration;
pub mod discovery;
pub mod extractor;
pub mod merger;
pub mod model;
pub mod scanner;
pub mod store;
pub mod tags;
pub mod transpile;

pub use api::DocService;
pub use builder::{ApiDescriptor, DocumentBuilder};
pub use comment_parser::CommentParser;
pub use config::{Config, ServerConfig, load_config};
pub use declaration::{Declaration, ResourceDeclaration};
pub use discovery::{DiscoveryError, DiscoveryReport, discover};
pub use extractor::{SourceFormat, extract};
pub use model::{Annotation, Fragment, Resource, ResourceSummary};
pub use scanner::{ScanError, ScanResult, scan_sources};
pub use store::{InMemoryRegistry, RegistryHandle, ResourceStore};
