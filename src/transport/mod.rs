pub mod kinesis;

pub use kinesis::KinesisTransport;

use crate::record::Record;
use async_trait::async_trait;
use thiserror::Error;

/// Acknowledgement of a single-record submission.
#[derive(Debug, Clone)]
pub struct Ack {
    /// Sequence number assigned by the stream service.
    pub sequence_number: String,
    /// Shard the record was routed to.
    pub shard_id: String,
}

/// Per-record outcome within a batch response, positionally aligned with
/// the submitted batch.
#[derive(Debug, Clone)]
pub struct RecordOutcome {
    pub succeeded: bool,
    pub error_message: Option<String>,
}

impl RecordOutcome {
    pub fn success() -> Self {
        Self {
            succeeded: true,
            error_message: None,
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            error_message: Some(error_message.into()),
        }
    }
}

/// Batch-level response from the stream service.
///
/// `outcomes` is positionally aligned 1:1 with the batch that produced
/// it; the dispatcher depends on this invariant.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub outcomes: Vec<RecordOutcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<RecordOutcome>) -> Self {
        Self { outcomes }
    }

    /// A result marking every record of a `len`-record batch as accepted.
    pub fn all_succeeded(len: usize) -> Self {
        Self {
            outcomes: vec![RecordOutcome::success(); len],
        }
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded).count()
    }
}

/// A service-level or network-level submission failure.
///
/// Not the partial-failure case: a transport error means the whole call
/// failed and none of the per-record outcomes are known.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

/// Physical transport to the stream service.
///
/// The publishing core is implementable against any transport exposing
/// these two shapes, independent of one provider's request/response
/// schema. Calls run to completion or raise a [`TransportError`]; there
/// is no cancellation at this layer.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Submits a single record, returning the service acknowledgement.
    async fn submit_one(&self, record: &Record) -> std::result::Result<Ack, TransportError>;

    /// Submits an ordered batch of records, returning per-record
    /// outcomes positionally aligned with `records`.
    async fn submit_batch(
        &self,
        records: &[Record],
    ) -> std::result::Result<BatchResult, TransportError>;
}
