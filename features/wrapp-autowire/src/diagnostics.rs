use crate::errors::WireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Warning,
    Error,
}

/// Receives the errors the wirer swallows instead of propagating
///
/// Any `Fn(Severity, &WireError)` closure is a sink.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, severity: Severity, error: &WireError);
}

impl<F> DiagnosticSink for F
where
    F: Fn(Severity, &WireError) + Send + Sync,
{
    fn report(&self, severity: Severity, error: &WireError) {
        self(severity, error)
    }
}

/// Default sink, forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, severity: Severity, error: &WireError) {
        match severity {
            Severity::Warning => tracing::warn!("{error}"),
            Severity::Error => tracing::error!("{error}"),
        }
    }
}
