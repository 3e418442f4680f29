pub mod avro;

pub use avro::AvroCodec;

use crate::Result;
use bytes::Bytes;
use serde_json::Value;

/// Schema codec collaborator: serializes structured messages to and from
/// a compact binary form.
///
/// Implementations are assumed stateless or internally thread-safe.
pub trait Codec: Send + Sync {
    /// Encodes a message into its binary wire form.
    fn encode(&self, message: &Value) -> Result<Bytes>;

    /// Decodes a binary payload back into a message.
    fn decode(&self, data: &[u8]) -> Result<Value>;
}
