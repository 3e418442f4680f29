use crate::failure::FailedRecord;
use crate::Error;
use serde_json::Value;
use tracing::{error, info, warn};

/// Pluggable sink for publisher events.
///
/// Informational only, never state-machine critical; every method has a
/// no-op default so implementors pick the events they care about.
pub trait PublishObserver: Send + Sync {
    /// A batch was accepted in full.
    fn batch_succeeded(&self, _stream: &str, _count: usize) {}

    /// A batch came back with per-record failures. `failed` holds the
    /// rejected records paired with their reported error messages.
    fn batch_failed(&self, _stream: &str, _failed: &[FailedRecord]) {}

    /// A message could not be encoded and was dropped from the batch.
    fn codec_error(&self, _message: &Value, _error: &Error) {}
}

/// Default observer: forwards events to `tracing`.
#[derive(Debug, Default)]
pub struct LogObserver;

impl PublishObserver for LogObserver {
    fn batch_succeeded(&self, stream: &str, count: usize) {
        info!(stream, count, "batch sent successfully");
    }

    fn batch_failed(&self, stream: &str, failed: &[FailedRecord]) {
        warn!(stream, failures = failed.len(), "batch sent with failures");
    }

    fn codec_error(&self, message: &Value, error: &Error) {
        error!(%error, %message, "failed to encode message");
    }
}
