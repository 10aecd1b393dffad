//! Time source for record timestamps.
//!
//! Production stores use [`SystemClock`]. [`ManualClock`] advances by a fixed
//! step on every reading, which gives tests strictly increasing timestamps
//! without sleeping.

use crate::model::Timestamp;
use chrono::Utc;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering};

pub trait Clock: Send + Sync + Debug {
    /// Current time in milliseconds since the Unix epoch.
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }
}

#[derive(Debug)]
pub struct ManualClock {
    next: AtomicI64,
    step: i64,
}

impl ManualClock {
    /// A clock whose first reading is `start`, advancing by `step` per reading.
    pub fn new(start: Timestamp, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
            step,
        }
    }

    /// Jump the next reading to `at`.
    pub fn set(&self, at: Timestamp) {
        self.next.store(at, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}
