//! Monotonic invention id generation
//!
//! Ids are derived from the creation wall-clock time in milliseconds and
//! forced strictly increasing, so two runs started within the same
//! millisecond still get distinct ids. Uniqueness is only required within
//! one session; imported records keep whatever ids they arrived with.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Generator of unique, creation-time-derived invention ids
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Produce the next id and its associated creation timestamp.
    ///
    /// The returned timestamp is the value the id was derived from, so the
    /// two never disagree even when the clock collides or steps backwards.
    pub fn next(&self) -> (String, i64) {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return (candidate.to_string(), candidate),
                Err(observed) => current = observed,
            }
        }
    }
}
