use instant::Instant;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Point on the capture clock, in milliseconds
///
/// Hosts pass the clock into capture calls (`tick(now)`, `stop_recording(now)`),
/// so replays and tests can use synthetic times. [`Timestamp::now`] reads a
/// monotonic clock that also works on wasm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn now() -> Self {
        static ANCHOR: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let anchor = ANCHOR.get_or_init(Instant::now);
        Timestamp::from_duration(Instant::now().duration_since(*anchor))
    }

    pub fn from_millis(millis: u64) -> Self {
        Timestamp(millis)
    }

    fn from_duration(duration: Duration) -> Self {
        Timestamp(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time since `earlier`; zero when `earlier` lies in the future
    pub fn duration_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }

    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Whether `deadline` has been reached
    pub fn has_reached(&self, deadline: Timestamp) -> bool {
        *self >= deadline
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    /// Saturates at the end of the clock
    fn add(self, rhs: Duration) -> Timestamp {
        let rhs = u64::try_from(rhs.as_millis()).unwrap_or(u64::MAX);
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, rhs: Timestamp) -> Duration {
        self.duration_since(rhs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}s", self.0 / 1000, self.0 % 1000)
    }
}
