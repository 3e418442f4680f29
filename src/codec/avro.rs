//! Avro binary codec.
//!
//! Encodes JSON messages against a named Avro schema and decodes them
//! back. Schema retrieval (e.g. fetching a schema definition by name from
//! a registry) is external; the codec is constructed from a
//! schema-definition JSON string the caller already holds.

use crate::codec::Codec;
use crate::{Error, Result};
use apache_avro::{from_avro_datum, to_avro_datum, Schema};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use serde_json::Value;

/// Codec for Avro binary encoding against a single named schema.
pub struct AvroCodec {
    schema: Schema,
    schema_name: String,
}

impl AvroCodec {
    /// Parses `schema_json` (an Avro schema definition) and builds a
    /// codec for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Codec`] if the schema definition does not parse.
    pub fn new(schema_json: &str) -> Result<Self> {
        let schema = Schema::parse_str(schema_json).map_err(|e| {
            Error::codec(
                format!("failed to parse schema definition: \"{schema_json}\""),
                e,
            )
        })?;

        let schema_name = match &schema {
            Schema::Record(record) => record.name.name.clone(),
            _ => "schema".to_string(),
        };

        Ok(Self {
            schema,
            schema_name,
        })
    }

    /// The unqualified name of the record schema, used in log and error
    /// context.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Encodes a message and armors the result in standard base64.
    pub fn encode_base64(&self, message: &Value) -> Result<String> {
        Ok(BASE64.encode(self.encode(message)?))
    }

    /// Decodes a base64-armored payload produced by [`encode_base64`].
    ///
    /// [`encode_base64`]: AvroCodec::encode_base64
    pub fn decode_base64(&self, encoded: &str) -> Result<Value> {
        let raw = BASE64.decode(encoded).map_err(|e| {
            Error::codec(
                format!("payload is not valid base64 for {} schema", self.schema_name),
                e,
            )
        })?;
        self.decode(&raw)
    }
}

impl Codec for AvroCodec {
    fn encode(&self, message: &Value) -> Result<Bytes> {
        let datum = apache_avro::to_value(message)
            .and_then(|value| value.resolve(&self.schema))
            .map_err(|e| {
                Error::codec(
                    format!(
                        "error encoding data {} using {} schema",
                        message, self.schema_name
                    ),
                    e,
                )
            })?;

        let encoded = to_avro_datum(&self.schema, datum).map_err(|e| {
            Error::codec(
                format!("error encoding data using {} schema", self.schema_name),
                e,
            )
        })?;

        Ok(Bytes::from(encoded))
    }

    fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut reader = data;
        let datum = from_avro_datum(&self.schema, &mut reader, None).map_err(|e| {
            Error::codec(
                format!("error decoding data using {} schema", self.schema_name),
                e,
            )
        })?;

        datum.try_into().map_err(|e: apache_avro::Error| {
            Error::codec(
                format!(
                    "decoded {} datum has no JSON representation",
                    self.schema_name
                ),
                e,
            )
        })
    }
}
