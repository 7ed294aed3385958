/* 📖 # Why an api module in swagdoc_engine?

The api module exposes the engine over HTTP. Its service implements the HttpService
trait from swagdoc_base, so the same routing runs under RealPal in production and is
exercised through MockPal::simulate_request in tests.
*/

mod service;

pub use service::{DocService, guess_content_type};
