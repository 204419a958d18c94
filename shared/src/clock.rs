//
// Copyright (c) Dell Inc., or its subsidiaries. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//

use crate::Timestamp;
use std::convert::TryFrom;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall clock time. Writers stamp events with it and the in-memory service uses it
/// for ingestion times, so tests can pin both to a fixed instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;

    /// Current time truncated to millisecond resolution.
    fn now_millis(&self) -> Timestamp {
        let millis = self
            .now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Timestamp(millis)
    }
}

#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

#[derive(Debug)]
pub struct MockClock {
    millis: AtomicI64,
}

impl Clock for MockClock {
    fn now(&self) -> SystemTime {
        let millis = self.millis.load(Ordering::SeqCst);
        if millis >= 0 {
            UNIX_EPOCH + Duration::from_millis(millis as u64)
        } else {
            UNIX_EPOCH - Duration::from_millis(millis.unsigned_abs())
        }
    }
}

impl MockClock {
    pub fn with_millis(millis: i64) -> Self {
        MockClock {
            millis: AtomicI64::new(millis),
        }
    }

    pub fn with_time(time: SystemTime) -> Self {
        let clock = MockClock::with_millis(0);
        clock.set_time(time);
        clock
    }

    pub fn advance(&self, duration: Duration) {
        let delta = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    pub fn set_time(&self, time: SystemTime) {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_millis()).unwrap_or(i64::MAX),
            Err(e) => -i64::try_from(e.duration().as_millis()).unwrap_or(i64::MAX),
        };
        self.millis.store(millis, Ordering::SeqCst);
    }
}
