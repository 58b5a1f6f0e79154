use super::{Record, Recorder};
use log::trace;
use std::time::{Duration, Instant};

/// Forwards a record only if `time_delta` has elapsed since the last forwarded one.
///
/// The first record is always forwarded. A zero `time_delta` forwards everything.
pub struct TimeFilter<R: Recorder> {
    inner: R,
    time_delta: Duration,
    last_write: Option<Instant>,
}

impl<R: Recorder> TimeFilter<R> {
    /// Wraps `inner`.
    pub fn new(inner: R, time_delta: Duration) -> Self {
        Self {
            inner,
            time_delta,
            last_write: None,
        }
    }

    /// Returns a reference to the inner recorder.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Consumes the filter and returns the inner recorder.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Recorder> Recorder for TimeFilter<R> {
    fn write(&mut self, record: Record) {
        let now = Instant::now();
        let pass = match self.last_write {
            None => true,
            Some(t) => now.duration_since(t) >= self.time_delta,
        };
        if pass {
            self.last_write = Some(now);
            self.inner.write(record);
        } else {
            trace!("Record dropped by the time filter");
        }
    }
}
