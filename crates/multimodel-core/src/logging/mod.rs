//! Logging abstractions
//!
//! Components take an `Arc<dyn Logger>` so embedders choose where messages
//! go; the server wires in `TracingLogger`, tests use `NoOpLogger`.

mod traits;
mod noop;
mod tracing_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
