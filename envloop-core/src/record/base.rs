//! Base implementation of records.
use crate::{error::LoopError, Counts};
use chrono::prelude::{DateTime, Local};
use std::{
    collections::{
        hash_map::{IntoIter, Iter, Keys},
        HashMap,
    },
    fmt,
};

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A floating-point value, e.g., an episode return.
    Scalar(f32),

    /// A non-negative integer, e.g., an episode length or a counter total.
    Count(u64),

    /// A timestamp with local timezone.
    DateTime(DateTime<Local>),

    /// A text value.
    String(String),
}

impl RecordValue {
    /// Returns the value as `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v as f64),
            Self::Count(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => write!(f, "{:.3}", v),
            Self::Count(v) => write!(f, "{}", v),
            Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Self::String(v) => write!(f, "{}", v),
        }
    }
}

/// A container for storing key-value pairs of various data types.
///
/// ```rust
/// use envloop_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("episode_return", 0.5);
/// record.insert("episode_length", RecordValue::Count(10));
///
/// assert_eq!(record.get_scalar("episode_return").unwrap(), 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Creates a record of [`RecordValue::Count`]s from counter totals.
    pub fn from_counts(counts: &Counts) -> Self {
        Self(
            counts
                .iter()
                .map(|(k, v)| (k.clone(), RecordValue::Count(*v)))
                .collect(),
        )
    }

    /// Returns an iterator over the keys in the record.
    pub fn keys(&self) -> Keys<String, RecordValue> {
        self.0.keys()
    }

    /// Returns the keys in ascending order.
    pub fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<_> = self.0.keys().collect();
        keys.sort();
        keys
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Returns an iterator over the key-value pairs in the record.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Returns an iterator that consumes the record.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value from `record` wins.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    ///
    /// If both records contain the same key, the value from `record` wins.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, LoopError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(LoopError::RecordValueTypeError("Scalar".to_string())),
            None => Err(LoopError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a count from the record.
    pub fn get_count(&self, k: &str) -> Result<u64, LoopError> {
        match self.0.get(k) {
            Some(RecordValue::Count(v)) => Ok(*v),
            Some(_) => Err(LoopError::RecordValueTypeError("Count".to_string())),
            None => Err(LoopError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a string value from the record.
    pub fn get_string(&self, k: &str) -> Result<String, LoopError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(LoopError::RecordValueTypeError("String".to_string())),
            None => Err(LoopError::RecordKeyError(k.to_string())),
        }
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
