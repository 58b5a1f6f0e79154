//! Writes records of [`EnvironmentLoop`](envloop_core::EnvironmentLoop) to TensorBoard.
use envloop_core::record::{Record, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Write records to TFRecord.
///
/// Numeric values, [`RecordValue::Scalar`] and [`RecordValue::Count`], are written
/// as scalars. The value of the step key, `steps` by default, is used as the x-axis.
///
/// Events are written by a background thread of [`SummaryWriter`], which is joined
/// when the recorder is dropped. The event file is complete only after that.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    step_key: String,
    ignore_unsupported_value: bool,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            step_key: "steps".to_string(),
            ignore_unsupported_value: true,
        }
    }

    /// Construct a [`TensorboardRecorder`] with checking unsupported record value.
    ///
    /// Unsupported values are reported with a warning instead of being silently skipped.
    pub fn new_with_check_unsupported_value<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            ignore_unsupported_value: false,
            ..Self::new(logdir)
        }
    }

    /// Sets the key of the value used as the x-axis, e.g., `episodes`.
    pub fn step_key(mut self, step_key: impl Into<String>) -> Self {
        self.step_key = step_key.into();
        self
    }

    fn step(&self, record: &Record) -> Option<usize> {
        match record.get(&self.step_key) {
            Some(RecordValue::Count(v)) => Some(*v as usize),
            Some(RecordValue::Scalar(v)) if *v >= 0.0 => Some(*v as usize),
            _ => None,
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Write a given [Record] into a TFRecord.
    ///
    /// Records without a numeric value for the step key are skipped.
    fn write(&mut self, record: Record) {
        let step = match self.step(&record) {
            Some(step) => step,
            None => {
                warn!("Record without step key {:?} is skipped", &self.step_key);
                return;
            }
        };

        for k in record.sorted_keys() {
            if *k == self.step_key {
                continue;
            }
            match record.get(k) {
                Some(RecordValue::Scalar(v)) => self.writer.add_scalar(k, *v, step),
                Some(RecordValue::Count(v)) => self.writer.add_scalar(k, *v as f32, step),
                Some(RecordValue::DateTime(_)) => {} // discard value
                Some(v) => {
                    if !self.ignore_unsupported_value {
                        warn!("Unsupported value: {:?}", (k, v));
                    }
                }
                None => {}
            }
        }
        self.writer.flush();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_write_creates_event_file() -> Result<()> {
        let dir = TempDir::new("tensorboard_recorder")?;
        let mut recorder = TensorboardRecorder::new(dir.path());
        recorder.write(Record::from_slice(&[
            ("steps", RecordValue::Count(10)),
            ("episode_return", RecordValue::Scalar(1.0)),
        ]));
        // Skipped, no step key
        recorder.write(Record::from_scalar("episode_return", 2.0));
        drop(recorder);

        let mut event_files = vec![];
        for entry in fs::read_dir(dir.path())? {
            let entry = entry?;
            if entry
                .file_name()
                .to_string_lossy()
                .starts_with("events.out.tfevents")
            {
                event_files.push(entry.metadata()?.len());
            }
        }
        assert_eq!(event_files.len(), 1);
        assert!(event_files[0] > 0);
        Ok(())
    }
}
