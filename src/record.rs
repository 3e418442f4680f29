use crate::codec::Codec;
use crate::Result;
use bytes::Bytes;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

/// A wire record ready for submission: an encoded payload plus the
/// partition key routing it to a shard.
///
/// Created once per message and never mutated afterwards. The payload is
/// the codec's binary encoding when a codec is configured, otherwise the
/// compact JSON rendering of the message.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub data: Bytes,
    pub partition_key: String,
}

/// Turns application messages into wire [`Record`]s.
pub struct RecordBuilder {
    partition_key_field: Option<String>,
    codec: Option<Arc<dyn Codec>>,
}

impl RecordBuilder {
    pub fn new(partition_key_field: Option<String>, codec: Option<Arc<dyn Codec>>) -> Self {
        Self {
            partition_key_field,
            codec,
        }
    }

    /// Builds a record from `message`.
    ///
    /// Fails with [`Error::Codec`](crate::Error::Codec) if a codec is
    /// configured and the message does not conform to its schema. On
    /// success the record always carries a non-empty partition key.
    pub fn build(&self, message: &Value) -> Result<Record> {
        let data = match &self.codec {
            Some(codec) => codec.encode(message)?,
            None => Bytes::from(serde_json::to_vec(message)?),
        };

        Ok(Record {
            data,
            partition_key: self.partition_key(message),
        })
    }

    fn partition_key(&self, message: &Value) -> String {
        if let Some(field) = &self.partition_key_field {
            match message.get(field) {
                Some(value) if !value.is_null() => return derived_key(value),
                _ => {
                    warn!(
                        "partition key field '{}' missing from message, using random key",
                        field
                    );
                }
            }
        }
        random_key()
    }
}

/// Stable hash of a field value, rendered as lowercase hex.
///
/// Equal field values always produce equal keys, across processes and
/// releases, so related messages land on the same shard.
fn derived_key(value: &Value) -> String {
    let rendered = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    blake3::hash(rendered.as_bytes()).to_hex().to_string()
}

fn random_key() -> String {
    Uuid::new_v4().simple().to_string()
}
