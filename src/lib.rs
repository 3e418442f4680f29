//! Client-side batching publisher for partitioned append-only streams.
//!
//! Messages are encoded (optionally through an Avro codec), grouped into
//! size-bounded batches, submitted to the stream service, and any record
//! the service rejects is kept for inspection or retry.

pub mod buffer;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod failure;
pub mod observe;
pub mod publisher;
pub mod record;
pub mod transport;

pub use codec::{AvroCodec, Codec};
pub use config::PublisherConfig;
pub use error::{Error, Result};
pub use failure::FailedRecord;
pub use observe::{LogObserver, PublishObserver};
pub use publisher::Publisher;
pub use record::Record;
pub use transport::{
    Ack, BatchResult, KinesisTransport, RecordOutcome, StreamTransport, TransportError,
};
