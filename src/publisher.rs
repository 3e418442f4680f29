//! The publishing facade: accepts messages, batches them, and tracks
//! partial failures for later inspection or retry.

use crate::buffer::BatchBuffer;
use crate::codec::Codec;
use crate::config::PublisherConfig;
use crate::dispatch::Dispatcher;
use crate::failure::{FailedRecord, FailureStore};
use crate::observe::{LogObserver, PublishObserver};
use crate::record::RecordBuilder;
use crate::transport::StreamTransport;
use crate::{Error, Result};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Client-side publisher for a partitioned append-only stream.
///
/// Sequential by design: methods take `&mut self` and are expected to be
/// called from a single logical owner. A `publish` that triggers a flush
/// awaits that batch's response before returning.
///
/// # Example
///
/// ```rust,no_run
/// use stream_courier::{KinesisTransport, Publisher, PublisherConfig};
/// use serde_json::json;
///
/// # async fn example() -> stream_courier::Result<()> {
/// let mut config = PublisherConfig::new("events");
/// config.batch_size = 100;
///
/// let transport = KinesisTransport::connect("events").await;
/// let mut publisher = Publisher::builder(config, transport).build()?;
///
/// publisher.publish(&json!({"id": 1, "kind": "signup"})).await?;
/// publisher.flush().await?;
///
/// if !publisher.failed().is_empty() {
///     publisher.retry().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct Publisher<T: StreamTransport> {
    config: PublisherConfig,
    builder: RecordBuilder,
    buffer: BatchBuffer,
    dispatcher: Dispatcher<T>,
    failures: FailureStore,
    codec: Option<Arc<dyn Codec>>,
    observer: Arc<dyn PublishObserver>,
}

impl<T: StreamTransport> Publisher<T> {
    /// Starts building a publisher over `transport`.
    pub fn builder(config: PublisherConfig, transport: T) -> PublisherBuilder<T> {
        PublisherBuilder {
            config,
            transport,
            codec: None,
            observer: None,
        }
    }

    /// Builds a publisher with no codec and the default log observer.
    pub fn new(config: PublisherConfig, transport: T) -> Result<Self> {
        Self::builder(config, transport).build()
    }

    /// Accepts one message: encodes it, appends the record to the
    /// buffer, and — with auto-flush on — flushes once the buffer
    /// reaches the batch size.
    ///
    /// An encode failure drops only this message: the error is reported
    /// to the observer and returned, and the buffer is untouched.
    pub async fn publish(&mut self, message: &Value) -> Result<()> {
        let record = match self.builder.build(message) {
            Ok(record) => record,
            Err(err) => {
                self.observer.codec_error(message, &err);
                return Err(err);
            }
        };

        self.buffer.push(record);

        if self.config.auto_flush && self.buffer.len() >= self.config.batch_size {
            self.flush().await?;
        }

        Ok(())
    }

    /// Submits everything buffered, slicing into batches of at most
    /// `batch_size`, in order. A no-op on an empty buffer: the transport
    /// is not invoked.
    ///
    /// On a transport-level error the failed batch travels inside the
    /// error; batches not yet handed to the transport are returned to
    /// the buffer so no record is silently dropped.
    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let mut batches = VecDeque::from(self.buffer.drain_batches());
        while let Some(batch) = batches.pop_front() {
            match self.dispatcher.dispatch(batch).await {
                Ok(failed) => self.failures.extend(failed),
                Err(err) => {
                    for batch in batches.drain(..) {
                        for record in batch {
                            self.buffer.push(record);
                        }
                    }
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    /// Moves every stored failed record back into the buffer — as-is,
    /// already encoded, never re-encoded — and flushes immediately.
    /// Records that fail again repopulate the store.
    ///
    /// A no-op on an empty store: the transport is not invoked. Retry is
    /// caller-invoked only; the publisher never schedules one itself.
    pub async fn retry(&mut self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }

        for failed in self.failures.drain() {
            self.buffer.push(failed.record);
        }
        self.flush().await
    }

    /// Number of records buffered and not yet submitted.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Records rejected within submitted batches, oldest first, each
    /// paired with its reported error message.
    pub fn failed(&self) -> &[FailedRecord] {
        self.failures.failures()
    }

    /// Decodes every failed record's payload back to application form.
    ///
    /// Requires a configured codec; the first payload that fails to
    /// decode fails the whole call.
    pub fn failed_messages(&self) -> Result<Vec<Value>> {
        let codec = self.codec.as_deref().ok_or_else(|| {
            Error::Config("no codec configured for decoding failed records".to_string())
        })?;
        self.failures.decode_all(codec)
    }

    /// Number of batches handed to the transport so far.
    pub fn batches_submitted(&self) -> u64 {
        self.dispatcher.batches_submitted()
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }
}

/// Builder for [`Publisher`], collecting the optional collaborators.
pub struct PublisherBuilder<T: StreamTransport> {
    config: PublisherConfig,
    transport: T,
    codec: Option<Arc<dyn Codec>>,
    observer: Option<Arc<dyn PublishObserver>>,
}

impl<T: StreamTransport> PublisherBuilder<T> {
    /// Encode messages with `codec` before buffering, and decode failed
    /// records with it on the way back out.
    pub fn codec(mut self, codec: impl Codec + 'static) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Replace the default log observer.
    pub fn observer(mut self, observer: impl PublishObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Validates the configuration and assembles the publisher.
    pub fn build(self) -> Result<Publisher<T>> {
        self.config.validate()?;

        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(LogObserver));
        let builder = RecordBuilder::new(
            self.config.partition_key_field.clone(),
            self.codec.clone(),
        );
        let dispatcher = Dispatcher::new(
            self.transport,
            self.config.stream_name.clone(),
            self.config.batch_size,
            Arc::clone(&observer),
        );

        Ok(Publisher {
            buffer: BatchBuffer::new(self.config.batch_size),
            builder,
            dispatcher,
            failures: FailureStore::new(),
            codec: self.codec,
            observer,
            config: self.config,
        })
    }
}
