//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum LoopError {
    /// Invalid combination of arguments.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A timestep out of place in an episode.
    #[error("Invalid timestep: {0}")]
    InvalidTimeStep(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
