//! Bookkeeping for records rejected within otherwise-successful batches.

use crate::codec::Codec;
use crate::record::Record;
use crate::Result;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A record rejected by the stream service, paired with the reported
/// error and the batch it was submitted in.
#[derive(Debug, Clone)]
pub struct FailedRecord {
    /// The record exactly as submitted; resubmitting it must not
    /// re-encode.
    pub record: Record,
    /// Error message reported by the service for this record.
    pub error_message: String,
    /// Opaque sequence number of the originating batch.
    pub batch_id: u64,
    /// When the failure was recorded.
    pub occurred_at: DateTime<Utc>,
}

impl FailedRecord {
    pub fn new(record: Record, error_message: impl Into<String>, batch_id: u64) -> Self {
        Self {
            record,
            error_message: error_message.into(),
            batch_id,
            occurred_at: Utc::now(),
        }
    }
}

/// Flat collection of failed records, ordered by time of occurrence.
///
/// Failures from every batch are pooled into one list; the `batch_id`
/// on each entry preserves the originating batch for callers that need
/// to group them.
#[derive(Debug, Default)]
pub struct FailureStore {
    failures: Vec<FailedRecord>,
}

impl FailureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, failed: FailedRecord) {
        self.failures.push(failed);
    }

    pub fn extend(&mut self, failed: impl IntoIterator<Item = FailedRecord>) {
        self.failures.extend(failed);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Full detail of every stored failure, oldest first.
    pub fn failures(&self) -> &[FailedRecord] {
        &self.failures
    }

    /// The stored records alone, still in their encoded wire form.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.failures.iter().map(|f| &f.record)
    }

    /// Decodes every stored record's payload back to application form.
    ///
    /// The first payload that fails to decode fails the whole call; no
    /// partial result is returned.
    pub fn decode_all(&self, codec: &dyn Codec) -> Result<Vec<Value>> {
        self.failures
            .iter()
            .map(|f| codec.decode(&f.record.data))
            .collect()
    }

    /// Removes and returns every stored failure, oldest first.
    pub fn drain(&mut self) -> Vec<FailedRecord> {
        std::mem::take(&mut self.failures)
    }
}
