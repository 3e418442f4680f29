//! Error types and result handling for stream-courier.
//!
//! This module defines the main error type [`Error`] and a convenience
//! [`Result`] type alias used throughout the crate.
//!
//! # Example
//!
//! ```rust
//! use stream_courier::{Error, Result};
//!
//! fn validate_batch_size(size: usize) -> Result<()> {
//!     if size == 0 {
//!         return Err(Error::Config("batch_size must be at least 1".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! match validate_batch_size(0) {
//!     Ok(()) => println!("valid"),
//!     Err(Error::Config(msg)) => eprintln!("Configuration error: {}", msg),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::record::Record;
use crate::transport::TransportError;
use thiserror::Error;

/// The main error type for stream-courier operations.
///
/// This enum represents all possible errors that can occur while
/// publishing, from configuration issues to runtime failures. Partial
/// batch failures are deliberately NOT represented here: they are a
/// normal outcome captured in the failure store, never raised.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error, typically an invalid batch size or a missing
    /// collaborator (e.g. decoding failed records without a codec).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Schema codec error during encode or decode.
    ///
    /// Recoverable per-message: an encode failure drops that single
    /// message and never aborts the batch buffer.
    #[error("Codec error: {context}")]
    Codec {
        /// What was being encoded or decoded when the codec failed.
        context: String,
        /// The underlying codec failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A whole-batch submission to the stream service failed outright.
    ///
    /// Carries the records of the batch so the caller can inspect or
    /// resubmit them. This is not the partial-failure case; it is never
    /// auto-retried inside the crate.
    #[error("Transport error ({} records returned to caller): {source}", .records.len())]
    Transport {
        /// The underlying transport failure.
        #[source]
        source: TransportError,
        /// The records of the batch that could not be submitted.
        records: Vec<Record>,
    },

    /// The transport returned a response that does not line up with the
    /// submitted batch (outcome count mismatch).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON serialization error when rendering a message payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Builds an [`Error::Codec`] from a context string and any underlying
    /// error.
    pub(crate) fn codec(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Codec {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// A convenient Result type alias for stream-courier operations.
///
/// This is equivalent to `std::result::Result<T, stream_courier::Error>`.
pub type Result<T> = std::result::Result<T, Error>;
