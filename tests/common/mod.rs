use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use stream_courier::{Ack, BatchResult, Record, StreamTransport, TransportError};

/// Initialize tracing once for the whole test binary. Controlled by
/// `RUST_LOG`, silent by default.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Avro schema shared by the integration tests.
pub const EVENT_SCHEMA: &str = r#"{
    "type": "record",
    "name": "Event",
    "fields": [
        {"name": "id", "type": "string"},
        {"name": "value", "type": "long"}
    ]
}"#;

#[derive(Default)]
struct Inner {
    batches: Vec<Vec<Record>>,
    singles: Vec<Record>,
    scripted: VecDeque<BatchResult>,
    fail_next: Option<String>,
}

/// In-memory transport for driving the publisher in tests.
///
/// Batch submissions default to all-accepted; `script_result` queues a
/// response for the next call, `fail_next` makes the next call (single
/// or batch) raise a transport error. Clones share state, so keep one
/// clone as an inspection handle after handing the transport to the
/// publisher.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_result(&self, result: BatchResult) {
        self.inner.lock().unwrap().scripted.push_back(result);
    }

    pub fn fail_next(&self, message: &str) {
        self.inner.lock().unwrap().fail_next = Some(message.to_string());
    }

    /// Every batch submitted so far, in submission order.
    pub fn batches(&self) -> Vec<Vec<Record>> {
        self.inner.lock().unwrap().batches.clone()
    }

    /// Every record submitted through the single-record path.
    pub fn singles(&self) -> Vec<Record> {
        self.inner.lock().unwrap().singles.clone()
    }

    pub fn batch_calls(&self) -> usize {
        self.inner.lock().unwrap().batches.len()
    }

    pub fn single_calls(&self) -> usize {
        self.inner.lock().unwrap().singles.len()
    }

    pub fn total_calls(&self) -> usize {
        self.batch_calls() + self.single_calls()
    }
}

#[async_trait]
impl StreamTransport for MockTransport {
    async fn submit_one(&self, record: &Record) -> Result<Ack, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = inner.fail_next.take() {
            return Err(TransportError::new(message));
        }
        inner.singles.push(record.clone());
        Ok(Ack {
            sequence_number: format!("seq-{}", inner.singles.len()),
            shard_id: "shard-0".to_string(),
        })
    }

    async fn submit_batch(&self, records: &[Record]) -> Result<BatchResult, TransportError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(message) = inner.fail_next.take() {
            return Err(TransportError::new(message));
        }
        inner.batches.push(records.to_vec());
        match inner.scripted.pop_front() {
            Some(result) => Ok(result),
            None => Ok(BatchResult::all_succeeded(records.len())),
        }
    }
}
