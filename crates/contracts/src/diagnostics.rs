//! Diagnostics sink for non-fatal configuration problems

use tracing::warn;

/// Receives warnings raised while saving configuration
pub trait DiagnosticsSink {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn warn(&self, message: &str) {
        warn!(target: "committer::diagnostics", "{message}");
    }
}
