use super::{Record, Recorder};

/// Forwards every record to each of the inner recorders.
#[derive(Default)]
pub struct Dispatcher<'a> {
    recorders: Vec<Box<dyn Recorder + 'a>>,
}

impl<'a> Dispatcher<'a> {
    /// Constructs a dispatcher over the given recorders.
    pub fn new(recorders: Vec<Box<dyn Recorder + 'a>>) -> Self {
        Self { recorders }
    }

    /// Adds a recorder.
    pub fn push(&mut self, recorder: Box<dyn Recorder + 'a>) {
        self.recorders.push(recorder);
    }

    /// Returns the number of inner recorders.
    pub fn len(&self) -> usize {
        self.recorders.len()
    }

    /// Returns `true` if there is no inner recorder.
    pub fn is_empty(&self) -> bool {
        self.recorders.is_empty()
    }
}

impl Recorder for Dispatcher<'_> {
    fn write(&mut self, record: Record) {
        if let Some((last, rest)) = self.recorders.split_last_mut() {
            for recorder in rest {
                recorder.write(record.clone());
            }
            last.write(record);
        }
    }
}
