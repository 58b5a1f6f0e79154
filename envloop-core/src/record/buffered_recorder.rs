use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written record in memory. Mainly used for inspecting the output
/// of [`EnvironmentLoop`](crate::EnvironmentLoop) in tests and short runs.
#[derive(Debug, Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::default() }
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the records written so far.
    pub fn records(&self) -> &[Record] {
        &self.buf
    }

    /// Consumes the recorder and returns the records.
    pub fn into_records(self) -> Vec<Record> {
        self.buf
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
