use crate::record::Record;

/// Accumulates records between flushes and slices them into batches.
///
/// Appends are O(1); slicing happens only when the buffer is drained.
#[derive(Debug)]
pub struct BatchBuffer {
    records: Vec<Record>,
    batch_size: usize,
}

impl BatchBuffer {
    pub fn new(batch_size: usize) -> Self {
        Self {
            records: Vec::new(),
            batch_size,
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Empties the buffer into consecutive batches of exactly
    /// `batch_size` records, in order; the final batch may be shorter.
    ///
    /// An empty buffer yields no batches, so callers never submit an
    /// empty batch to the transport.
    pub fn drain_batches(&mut self) -> Vec<Vec<Record>> {
        if self.records.is_empty() {
            return Vec::new();
        }

        let mut remaining = std::mem::take(&mut self.records);
        let mut batches = Vec::with_capacity(remaining.len().div_ceil(self.batch_size));

        while remaining.len() > self.batch_size {
            let tail = remaining.split_off(self.batch_size);
            batches.push(std::mem::replace(&mut remaining, tail));
        }
        batches.push(remaining);

        batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn record(payload: &str) -> Record {
        Record {
            data: Bytes::from(payload.as_bytes().to_vec()),
            partition_key: "pk".to_string(),
        }
    }

    fn payloads(batch: &[Record]) -> Vec<String> {
        batch
            .iter()
            .map(|r| String::from_utf8(r.data.to_vec()).unwrap())
            .collect()
    }

    #[test]
    fn test_empty_buffer_yields_no_batches() {
        let mut buffer = BatchBuffer::new(3);
        assert!(buffer.drain_batches().is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_exact_multiple_slices_evenly() {
        let mut buffer = BatchBuffer::new(3);
        for i in 1..=6 {
            buffer.push(record(&i.to_string()));
        }

        let batches = buffer.drain_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(payloads(&batches[0]), ["1", "2", "3"]);
        assert_eq!(payloads(&batches[1]), ["4", "5", "6"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_final_batch_may_be_shorter() {
        let mut buffer = BatchBuffer::new(3);
        for i in 1..=5 {
            buffer.push(record(&i.to_string()));
        }

        let batches = buffer.drain_batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(payloads(&batches[0]), ["1", "2", "3"]);
        assert_eq!(payloads(&batches[1]), ["4", "5"]);
    }

    #[test]
    fn test_single_undersized_batch() {
        let mut buffer = BatchBuffer::new(10);
        buffer.push(record("only"));

        let batches = buffer.drain_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(payloads(&batches[0]), ["only"]);
    }

    #[test]
    fn test_batch_size_one() {
        let mut buffer = BatchBuffer::new(1);
        for i in 1..=3 {
            buffer.push(record(&i.to_string()));
        }

        let batches = buffer.drain_batches();
        assert_eq!(batches.len(), 3);
        for (i, batch) in batches.iter().enumerate() {
            assert_eq!(payloads(batch), [(i + 1).to_string()]);
        }
    }

    #[test]
    fn test_push_after_drain_starts_fresh() {
        let mut buffer = BatchBuffer::new(2);
        buffer.push(record("a"));
        buffer.push(record("b"));
        buffer.drain_batches();

        buffer.push(record("c"));
        assert_eq!(buffer.len(), 1);

        let batches = buffer.drain_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(payloads(&batches[0]), ["c"]);
    }
}
