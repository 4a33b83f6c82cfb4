// hub-log: the injectable logger facade described in spec.md §6/§4.L
// ("setLogger(logger): install a facade forwarding error/warn/info/debug/trace").
//
// Embedders that never call `Hub::set_logger` get `TracingLogger`, which
// forwards to the `tracing` macros at the matching level. A custom `Logger`
// lets an embedder route hub diagnostics into its own sink without pulling
// `tracing` into its own dependency tree.

use std::sync::Arc;

pub trait Logger: Send + Sync {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn trace(&self, message: &str);
}

/// Default logger: forwards every call to the corresponding `tracing` macro.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }
    fn debug(&self, message: &str) {
        tracing::debug!("{message}");
    }
    fn trace(&self, message: &str) {
        tracing::trace!("{message}");
    }
}

/// Discards everything. Useful for tests that don't want log noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn error(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn info(&self, _message: &str) {}
    fn debug(&self, _message: &str) {}
    fn trace(&self, _message: &str) {}
}

#[must_use]
pub fn default_logger() -> Arc<dyn Logger> {
    Arc::new(TracingLogger)
}
