/* 📖 # Why does the CLI start the server before discovery?

The only argument is the path of the configuration file (default `swagdoc.toml`,
resolved against the current directory). The listener comes up first so clients get a
503 with `Retry-After` while sources are still being merged, instead of a refused
connection. Once discovery has populated the registry the same service starts answering
with documentation.

Exit codes:
- 0: Server shut down
- 1: Configuration could not be loaded, or the listener could not be started

Source locations that fail to scan or parse are reported and skipped; they never stop
the server.
*/

use std::env;
use std::process;

use swagdoc_base::pal::http::HttpServerConfig;
use swagdoc_base::tracing::init_tracing;
use swagdoc_base::{FilePath, Pal, PalHandle, RealPal};
use swagdoc_engine::{
    ApiDescriptor, DocService, DocumentBuilder, InMemoryRegistry, RegistryHandle, discover,
    load_config,
};
use tracing::info;

const DEFAULT_CONFIG: &str = "swagdoc.toml";

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn main() {
    if let Err(e) = init_tracing() {
        fail(e);
    }

    let config_arg = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG.to_string());

    let current_dir = env::current_dir()
        .unwrap_or_else(|e| fail(format!("Failed to get current directory: {}", e)));
    let pal = PalHandle::new(RealPal::new(current_dir));

    let config = load_config(&pal, &FilePath::from(config_arg.as_str()))
        .unwrap_or_else(|e| fail(format!("Failed to load config from {}: {}", config_arg, e)));

    let registry = RegistryHandle::new(InMemoryRegistry::new());
    let descriptor = ApiDescriptor::from_config(&config).unwrap_or_else(|e| fail(e));
    let browser_dir = config.browser_dir().unwrap_or_else(|e| fail(e));
    let builder = DocumentBuilder::new(descriptor, registry.clone());
    let service = DocService::new(pal.clone(), builder, FilePath::from(browser_dir));

    let server_config = HttpServerConfig::new(config.server.host.clone()).with_port(config.server.port);
    let address = server_config.address();
    let handle = pal
        .start_http_server(Box::new(service), server_config)
        .unwrap_or_else(|e| fail(format!("Failed to start server on {}: {}", address, e)));
    info!(%address, browser = %config.browser_url, "listening");

    match discover(&pal, &config.sources, &registry) {
        Ok(report) => {
            if report.has_errors() {
                eprintln!("\nWarnings during discovery:");
                for error in &report.errors {
                    eprintln!("  - {}: {}", error.location, error.error);
                }
            }
            println!(
                "Merged {}/{} source files into {} resources",
                report.merged,
                report.files.len(),
                registry.len().unwrap_or(0)
            );
            if report.dropped_operations > 0 {
                println!(
                    "Dropped {} operations declared without a resourcePath",
                    report.dropped_operations
                );
            }
        }
        Err(e) => {
            eprintln!("Error: Discovery failed: {}", e);
            registry.mark_ready();
        }
    }

    println!("Serving documentation at http://{}{}", address, config.browser_url);
    handle.wait();
}
