//! Silent logger

use std::sync::Arc;

use super::traits::{Logger, SharedLogger};

/// Discards every message.
///
/// The default for library embedders that bring their own `tracing`
/// subscriber, and for unit tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpLogger;

impl NoOpLogger {
    pub fn new() -> Self {
        Self
    }

    /// Shared handle, ready to hand to the credential store, adapters
    /// and orchestrator.
    pub fn shared() -> SharedLogger {
        Arc::new(Self)
    }
}

impl Logger for NoOpLogger {
    fn debug(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_noop_logger_accepts_messages() {
        let logger = NoOpLogger::shared();
        let clone = Arc::clone(&logger);

        logger.info("resolved openai credential from environment");
        clone.warn("vault lookup failed for google");
        clone.error("leg failed");

        assert_eq!(Arc::strong_count(&logger), 2);
    }
}
