//! Live-reload hub
//!
//! Holds the latest `{ seq, changed }` notice. HTTP clients long-poll it with
//! the last sequence number they saw.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use serde::Serialize;

use crate::domain::ports::ReloadNotifier;

/// What a polling client receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReloadNotice {
    pub seq: u64,
    pub changed: Vec<String>,
}

#[derive(Default)]
pub struct ReloadHub {
    latest: Mutex<ReloadNotice>,
    signal: Condvar,
}

impl ReloadHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self) -> ReloadNotice {
        self.latest.lock().clone()
    }

    /// Latest notice once its `seq` exceeds `since`, or the current one after
    /// `timeout`.
    pub fn wait_since(&self, since: u64, timeout: Duration) -> ReloadNotice {
        let deadline = Instant::now() + timeout;
        let mut latest = self.latest.lock();
        while latest.seq <= since {
            if self.signal.wait_until(&mut latest, deadline).timed_out() {
                break;
            }
        }
        latest.clone()
    }
}

impl ReloadNotifier for ReloadHub {
    fn notify(&self, seq: u64, changed: &[String]) {
        {
            let mut latest = self.latest.lock();
            if seq <= latest.seq {
                return;
            }
            *latest = ReloadNotice {
                seq,
                changed: changed.to_vec(),
            };
        }
        self.signal.notify_all();
    }
}
