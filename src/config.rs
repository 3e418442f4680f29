use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Caller-supplied configuration for a [`Publisher`](crate::Publisher).
///
/// The codec and observer are runtime collaborators and are supplied to
/// the publisher builder instead of being carried here.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublisherConfig {
    /// Name of the target stream, used for submission and log context.
    pub stream_name: String,
    /// Maximum number of records per submitted batch. A batch size of 1
    /// degenerates to single-record submission.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Whether an append automatically flushes once the buffer reaches
    /// `batch_size`.
    #[serde(default = "default_auto_flush")]
    pub auto_flush: bool,
    /// Message field whose value deterministically derives the partition
    /// key. When unset, every record gets a random key.
    #[serde(default)]
    pub partition_key_field: Option<String>,
}

impl PublisherConfig {
    /// Creates a configuration for `stream_name` with the defaults:
    /// batch size 1, auto-flush on, random partition keys.
    pub fn new(stream_name: impl Into<String>) -> Self {
        Self {
            stream_name: stream_name.into(),
            batch_size: default_batch_size(),
            auto_flush: default_auto_flush(),
            partition_key_field: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.stream_name.is_empty() {
            return Err(Error::Config("stream_name must not be empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn default_batch_size() -> usize {
    1
}

fn default_auto_flush() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PublisherConfig::new("events");
        assert_eq!(config.stream_name, "events");
        assert_eq!(config.batch_size, 1);
        assert!(config.auto_flush);
        assert!(config.partition_key_field.is_none());
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let config: PublisherConfig =
            serde_json::from_str(r#"{"stream_name": "events"}"#).unwrap();
        assert_eq!(config.batch_size, 1);
        assert!(config.auto_flush);
        assert!(config.partition_key_field.is_none());
    }

    #[test]
    fn test_deserialize_overrides() {
        let config: PublisherConfig = serde_json::from_str(
            r#"{
                "stream_name": "events",
                "batch_size": 500,
                "auto_flush": false,
                "partition_key_field": "id"
            }"#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 500);
        assert!(!config.auto_flush);
        assert_eq!(config.partition_key_field.as_deref(), Some("id"));
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut config = PublisherConfig::new("events");
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_stream_name() {
        let config = PublisherConfig::new("");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
