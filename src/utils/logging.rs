use anyhow::Error;
use tracing::span::Span;

/// Logs an error inside of a span, so that it carries the span's fields
/// (e.g. the repository that was being swept).
pub trait LogError {
    fn log_error(&self, error: Error);
}

impl LogError for Span {
    fn log_error(&self, error: Error) {
        self.in_scope(|| {
            tracing::error!("Error: {error:?}");
        });
    }
}
