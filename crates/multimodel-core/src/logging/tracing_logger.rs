//! Logger backed by `tracing`

use super::traits::Logger;

/// A logger that forwards to the `tracing` macros
///
/// Events are emitted under the `multimodel` target with a `component`
/// field, so a subscriber filter like `multimodel=debug` selects them.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    component: &'static str,
}

impl Default for TracingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl TracingLogger {
    pub fn new() -> Self {
        Self { component: "core" }
    }

    /// Tag every event with a component name
    pub fn with_component(component: &'static str) -> Self {
        Self { component }
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "multimodel", component = self.component, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "multimodel", component = self.component, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "multimodel", component = self.component, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "multimodel", component = self.component, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_without_subscriber() {
        let logger = TracingLogger::with_component("test");
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
