use super::{Record, Recorder};
use anyhow::Result;
use log::{debug, warn};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

/// Appends records to a CSV file.
///
/// The columns are fixed by the first record written, in ascending key order.
/// Fields of later records that are not among these columns are dropped and
/// missing fields are left empty.
pub struct CsvRecorder {
    path: PathBuf,
    writer: csv::Writer<File>,
    columns: Option<Vec<String>>,
}

impl CsvRecorder {
    /// Creates `<dir>/<label>.csv`, creating `dir` if needed.
    ///
    /// An existing file with the same name is truncated.
    pub fn new(dir: impl AsRef<Path>, label: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", label));
        let writer = csv::Writer::from_path(&path)?;
        debug!("Writing records to {:?}", &path);
        Ok(Self {
            path,
            writer,
            columns: None,
        })
    }

    /// Path of the CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_row(&mut self, record: &Record) -> Result<()> {
        if self.columns.is_none() {
            let columns: Vec<String> = record.sorted_keys().into_iter().cloned().collect();
            self.writer.write_record(&columns)?;
            self.columns = Some(columns);
        }

        if let Some(columns) = &self.columns {
            for k in record.keys() {
                if !columns.contains(k) {
                    debug!("Field {:?} is not a column of {:?}, dropped", k, &self.path);
                }
            }
            let row = columns
                .iter()
                .map(|k| record.get(k).map(|v| v.to_string()).unwrap_or_default());
            self.writer.write_record(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl Recorder for CsvRecorder {
    fn write(&mut self, record: Record) {
        if let Err(e) = self.write_row(&record) {
            warn!("Failed to write a record to {:?}: {}", &self.path, e);
        }
    }
}
