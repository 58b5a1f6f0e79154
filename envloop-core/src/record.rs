//! Types and traits for recording per-episode measurements.
//!
//! # Core Components
//!
//! * [`Record`] - A container of key-value pairs
//! * [`RecordValue`] - Types of values that can be stored in a [`Record`]
//! * [`Recorder`] - Writes a [`Record`] to some destination
//! * [`TerminalRecorder`] - Prints records through the [`log`] facade
//! * [`CsvRecorder`] - Appends records to a CSV file
//! * [`Dispatcher`] - Forwards records to several recorders
//! * [`TimeFilter`] - Throttles the records forwarded to another recorder
//! * [`BufferedRecorder`] - Keeps records in memory
//! * [`NullRecorder`] - Discards records
//!
//! # Basic Usage
//!
//! ```rust
//! use envloop_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("episode_length", RecordValue::Count(200));
//! record.insert("episode_return", RecordValue::Scalar(-1.5));
//!
//! assert_eq!(record.get_count("episode_length").unwrap(), 200);
//! ```
//!
//! The recorder used by [`EnvironmentLoop`](crate::EnvironmentLoop) when none is
//! given is created with [`make_default_recorder`]. [`make_recorder`] builds
//! one from a [`RecorderConfig`].
mod base;
mod buffered_recorder;
mod config;
mod csv_recorder;
mod dispatcher;
mod null_recorder;
mod recorder;
mod terminal_recorder;
mod time_filter;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use config::{make_default_recorder, make_recorder, RecorderConfig};
pub use csv_recorder::CsvRecorder;
pub use dispatcher::Dispatcher;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
pub use terminal_recorder::TerminalRecorder;
pub use time_filter::TimeFilter;
