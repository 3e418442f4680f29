//! Batch submission and partial-failure reconciliation.
//!
//! The dispatcher hands batches to the transport and maps each
//! batch-level response back onto the records that produced it. The
//! mapping is strictly positional: outcome `i` belongs to record `i` of
//! the submitted batch, never re-derived by content matching (records
//! may be structurally identical).

use crate::failure::FailedRecord;
use crate::observe::PublishObserver;
use crate::record::Record;
use crate::transport::{BatchResult, RecordOutcome, StreamTransport, TransportError};
use crate::{Error, Result};
use std::sync::Arc;
use tracing::debug;

/// How batches reach the transport. Chosen once at construction from the
/// configured batch size; a batch size of 1 degenerates to single-record
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchMode {
    Single,
    Batched,
}

/// Submits batches and reconciles per-record failures against the
/// originating records.
pub struct Dispatcher<T: StreamTransport> {
    transport: T,
    stream_name: String,
    mode: DispatchMode,
    observer: Arc<dyn PublishObserver>,
    batch_seq: u64,
}

impl<T: StreamTransport> Dispatcher<T> {
    pub fn new(
        transport: T,
        stream_name: String,
        batch_size: usize,
        observer: Arc<dyn PublishObserver>,
    ) -> Self {
        let mode = if batch_size == 1 {
            DispatchMode::Single
        } else {
            DispatchMode::Batched
        };

        Self {
            transport,
            stream_name,
            mode,
            observer,
            batch_seq: 0,
        }
    }

    /// Number of batches submitted so far; also the id assigned to the
    /// most recent batch.
    pub fn batches_submitted(&self) -> u64 {
        self.batch_seq
    }

    /// Submits one non-empty batch and returns the records the service
    /// rejected, in their original relative order.
    ///
    /// A transport-level failure propagates as [`Error::Transport`]
    /// carrying the whole batch; it is never swallowed or auto-retried
    /// here. Records in a fully-accepted batch are simply dropped.
    pub async fn dispatch(&mut self, batch: Vec<Record>) -> Result<Vec<FailedRecord>> {
        debug_assert!(!batch.is_empty(), "buffer never produces empty batches");

        self.batch_seq += 1;
        let batch_id = self.batch_seq;
        debug!(
            stream = %self.stream_name,
            batch_id,
            records = batch.len(),
            "submitting batch"
        );

        let result = match self.mode {
            DispatchMode::Single => self.submit_singles(&batch).await,
            DispatchMode::Batched => self.transport.submit_batch(&batch).await,
        };

        let result = match result {
            Ok(result) => result,
            Err(source) => {
                return Err(Error::Transport {
                    source,
                    records: batch,
                })
            }
        };

        if result.outcomes.len() != batch.len() {
            return Err(Error::Protocol(format!(
                "transport returned {} outcomes for a batch of {}",
                result.outcomes.len(),
                batch.len()
            )));
        }

        let submitted = batch.len();
        let failed: Vec<FailedRecord> = batch
            .into_iter()
            .zip(&result.outcomes)
            .filter(|(_, outcome)| !outcome.succeeded)
            .map(|(record, outcome)| {
                let message = outcome
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "record rejected".to_string());
                FailedRecord::new(record, message, batch_id)
            })
            .collect();

        if failed.is_empty() {
            self.observer.batch_succeeded(&self.stream_name, submitted);
        } else {
            self.observer.batch_failed(&self.stream_name, &failed);
        }

        Ok(failed)
    }

    /// Single mode: each record of the batch goes through `submit_one`.
    /// The first service error aborts the call; with batch size 1 the
    /// batch holds exactly one record, so nothing is ever half-submitted.
    async fn submit_singles(
        &self,
        batch: &[Record],
    ) -> std::result::Result<BatchResult, TransportError> {
        let mut outcomes = Vec::with_capacity(batch.len());
        for record in batch {
            let ack = self.transport.submit_one(record).await?;
            debug!(
                stream = %self.stream_name,
                sequence_number = %ack.sequence_number,
                shard_id = %ack.shard_id,
                "record acknowledged"
            );
            outcomes.push(RecordOutcome::success());
        }
        Ok(BatchResult::new(outcomes))
    }
}
