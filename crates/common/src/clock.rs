//! Clock and timing utilities for the gesture stream.
//!
//! Two clocks matter to the stream engine:
//! - the engine epoch, against which classifier timestamps are measured
//! - the session start, recorded on every start and read on stop
//!
//! Both are a [`SessionClock`]. [`TimestampSequencer`] turns raw clock
//! readings into the strictly increasing timestamps that video-mode
//! classifiers require.

use std::time::{Duration, Instant};

/// A monotonic clock anchored to a fixed epoch.
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the clock was started.
    epoch: Instant,

    /// Wall-clock time at epoch (RFC 3339 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since the epoch.
    pub fn elapsed_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Seconds elapsed since the epoch.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at the epoch.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Produces strictly increasing millisecond timestamps from clock readings.
///
/// Two iterations can land in the same millisecond; the classifier rejects
/// a repeated timestamp in video mode, so a repeat is bumped by one.
#[derive(Debug, Default)]
pub struct TimestampSequencer {
    last_ms: Option<u64>,
}

impl TimestampSequencer {
    pub fn new() -> Self {
        Self { last_ms: None }
    }

    /// Return a timestamp `>= reading_ms` that is strictly greater than
    /// every value returned before.
    pub fn next(&mut self, reading_ms: u64) -> u64 {
        let stamp = match self.last_ms {
            Some(last) if reading_ms <= last => last + 1,
            _ => reading_ms,
        };
        self.last_ms = Some(stamp);
        stamp
    }

    /// Last timestamp handed out.
    pub fn last(&self) -> Option<u64> {
        self.last_ms
    }
}

/// Interval between display refreshes for the given rate.
pub fn refresh_interval(refresh_hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / refresh_hz.max(1) as u64)
}
