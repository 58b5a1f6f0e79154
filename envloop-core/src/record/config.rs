//! Configuration of recorders.
use super::{CsvRecorder, Dispatcher, Recorder, TerminalRecorder, TimeFilter};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
    time::Duration,
};

/// Configuration of the recorder built with [`make_recorder`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RecorderConfig {
    /// Label of the records, used as the prefix of printed lines and the CSV file name.
    pub label: String,

    /// Minimum interval in seconds between two records being written.
    /// `0.0` writes every record.
    pub time_delta: f64,

    /// Directory where a CSV file is written. No CSV file if `None`.
    pub csv_dir: Option<String>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            label: crate::DEFAULT_LABEL.to_string(),
            time_delta: 0.0,
            csv_dir: None,
        }
    }
}

impl RecorderConfig {
    /// Sets the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the minimum interval between records in seconds.
    pub fn time_delta(mut self, time_delta: f64) -> Self {
        self.time_delta = time_delta;
        self
    }

    /// Sets the directory of the CSV file.
    pub fn csv_dir(mut self, csv_dir: impl Into<String>) -> Self {
        self.csv_dir = Some(csv_dir.into());
        self
    }

    /// Constructs [`RecorderConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RecorderConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Builds a recorder from a configuration.
///
/// Records are printed with [`TerminalRecorder`] and, if `csv_dir` is given,
/// appended to a CSV file with [`CsvRecorder`]. Both are throttled by a
/// [`TimeFilter`] with the configured `time_delta`.
///
/// A negative or NaN `time_delta` writes every record. An infinite one, or one
/// too large for a [`Duration`], is an error.
pub fn make_recorder(config: &RecorderConfig) -> Result<Box<dyn Recorder>> {
    let mut dispatcher = Dispatcher::default();
    dispatcher.push(Box::new(TerminalRecorder::new(&config.label)));
    if let Some(dir) = &config.csv_dir {
        dispatcher.push(Box::new(CsvRecorder::new(dir, &config.label)?));
    }

    let time_delta = Duration::try_from_secs_f64(config.time_delta.max(0.0))
        .with_context(|| format!("Invalid time_delta: {}", config.time_delta))?;
    Ok(Box::new(TimeFilter::new(dispatcher, time_delta)))
}

/// Builds the recorder used when none is given to
/// [`EnvironmentLoop`](crate::EnvironmentLoop).
///
/// It prints every record with [`TerminalRecorder`] under `label`.
pub fn make_default_recorder(label: &str) -> Box<dyn Recorder> {
    Box::new(TerminalRecorder::new(label))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::{Record, RecordValue};
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_serde_recorder_config() -> Result<()> {
        let config = RecorderConfig::default()
            .label("eval_loop")
            .time_delta(1.0)
            .csv_dir("some/directory");

        let dir = TempDir::new("recorder_config")?;
        let path = dir.path().join("recorder_config.yaml");
        config.save(&path)?;
        let config_ = RecorderConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_make_recorder_with_csv() -> Result<()> {
        let dir = TempDir::new("make_recorder")?;
        let csv_dir = dir.path().to_str().unwrap().to_string();
        let config = RecorderConfig::default().label("actor").csv_dir(csv_dir);

        let mut recorder = make_recorder(&config)?;
        recorder.write(Record::from_slice(&[("steps", RecordValue::Count(5))]));
        recorder.write(Record::from_slice(&[("steps", RecordValue::Count(8))]));

        let content = fs::read_to_string(dir.path().join("actor.csv"))?;
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["steps", "5", "8"]);
        Ok(())
    }

    #[test]
    fn test_make_recorder_rejects_unbounded_time_delta() {
        for time_delta in [f64::INFINITY, 1e30] {
            let config = RecorderConfig::default().time_delta(time_delta);
            assert!(make_recorder(&config).is_err(), "time_delta = {}", time_delta);
        }
    }

    #[test]
    fn test_make_recorder_clamps_negative_time_delta() -> Result<()> {
        let mut recorder = make_recorder(&RecorderConfig::default().time_delta(-1.0))?;
        recorder.write(Record::from_slice(&[("steps", RecordValue::Count(1))]));

        let config = RecorderConfig::default().time_delta(f64::NAN);
        assert!(make_recorder(&config).is_ok());
        Ok(())
    }

    #[test]
    fn test_load_rejected_time_delta() -> Result<()> {
        let dir = TempDir::new("recorder_config")?;
        let path = dir.path().join("recorder_config.yaml");
        fs::write(&path, "label: actor\ntime_delta: 1.0e30\ncsv_dir: ~\n")?;

        let config = RecorderConfig::load(&path)?;
        assert!(make_recorder(&config).is_err());
        Ok(())
    }
}
