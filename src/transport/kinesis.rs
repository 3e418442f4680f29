use crate::record::Record;
use crate::transport::{Ack, BatchResult, RecordOutcome, StreamTransport, TransportError};
use async_trait::async_trait;
use aws_sdk_kinesis::error::DisplayErrorContext;
use aws_sdk_kinesis::primitives::Blob;
use aws_sdk_kinesis::types::PutRecordsRequestEntry;
use aws_sdk_kinesis::Client;
use tracing::debug;

/// AWS Kinesis implementation of [`StreamTransport`].
///
/// `submit_one` maps to `PutRecord`, `submit_batch` to `PutRecords`.
pub struct KinesisTransport {
    client: Client,
    stream_name: String,
}

impl KinesisTransport {
    pub fn new(client: Client, stream_name: impl Into<String>) -> Self {
        Self {
            client,
            stream_name: stream_name.into(),
        }
    }

    /// Builds a transport from the default AWS configuration chain
    /// (environment, profile, instance metadata).
    pub async fn connect(stream_name: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), stream_name)
    }

    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }
}

#[async_trait]
impl StreamTransport for KinesisTransport {
    async fn submit_one(&self, record: &Record) -> Result<Ack, TransportError> {
        let response = self
            .client
            .put_record()
            .stream_name(&self.stream_name)
            .partition_key(&record.partition_key)
            .data(Blob::new(record.data.to_vec()))
            .send()
            .await
            .map_err(|e| {
                let message = format!(
                    "PutRecord to {} failed: {}",
                    self.stream_name,
                    DisplayErrorContext(&e)
                );
                TransportError::with_source(message, e)
            })?;

        debug!(
            stream = %self.stream_name,
            sequence_number = %response.sequence_number(),
            shard_id = %response.shard_id(),
            "record accepted"
        );

        Ok(Ack {
            sequence_number: response.sequence_number().to_string(),
            shard_id: response.shard_id().to_string(),
        })
    }

    async fn submit_batch(&self, records: &[Record]) -> Result<BatchResult, TransportError> {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let entry = PutRecordsRequestEntry::builder()
                .data(Blob::new(record.data.to_vec()))
                .partition_key(&record.partition_key)
                .build()
                .map_err(|e| TransportError::with_source("invalid PutRecords entry", e))?;
            entries.push(entry);
        }

        let response = self
            .client
            .put_records()
            .stream_name(&self.stream_name)
            .set_records(Some(entries))
            .send()
            .await
            .map_err(|e| {
                let message = format!(
                    "PutRecords to {} failed: {}",
                    self.stream_name,
                    DisplayErrorContext(&e)
                );
                TransportError::with_source(message, e)
            })?;

        let outcomes = response
            .records()
            .iter()
            .map(|entry| match entry.error_code() {
                None => RecordOutcome::success(),
                Some(code) => RecordOutcome::failure(match entry.error_message() {
                    Some(message) => format!("{code}: {message}"),
                    None => code.to_string(),
                }),
            })
            .collect();

        Ok(BatchResult::new(outcomes))
    }
}
