use super::{Record, Recorder};

/// A recorder that ignores any record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRecorder {}

impl NullRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self {}
    }
}

impl Recorder for NullRecorder {
    /// Discard the given record.
    fn write(&mut self, _record: Record) {}
}
