//! Virtual playback time.
//!
//! # Design
//!
//! Playback is driven by a virtual clock measured in milliseconds.  The host
//! (a render loop, a test, the demo binary) tells the controller how much
//! time has elapsed and the controller fires whatever timers fell due, in
//! order.  Using an integer millisecond counter keeps timer ordering exact and
//! makes every run replayable: the same sequence of `advance` calls always
//! produces the same sequence of steps and arrivals.

use std::fmt;

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute point on the virtual clock, in milliseconds since the clock
/// was created.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    /// Return the time `ms` milliseconds after `self`.
    #[inline]
    pub fn offset(self, ms: u64) -> SimTime {
        SimTime(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed from `earlier` to `self` (0 if `earlier` is later).
    #[inline]
    pub fn since(self, earlier: SimTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: u64) -> SimTime {
        self.offset(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t+{}ms", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Monotonic virtual clock.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    now: SimTime,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Move the clock forward to `t`.  Moving backwards is ignored.
    #[inline]
    pub fn advance_to(&mut self, t: SimTime) {
        if t > self.now {
            self.now = t;
        }
    }
}

// ── PlaybackConfig ────────────────────────────────────────────────────────────

/// Playback timing and randomness configuration.
///
/// Typically deserialized by the host application and passed to the
/// controller builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackConfig {
    /// Interval between playback steps at 1× execution speed.  Default: 1000.
    pub base_step_interval_ms: u64,

    /// Interval between dynamic arrivals at 1× arrival rate.  Default: 3000.
    pub base_arrival_interval_ms: u64,

    /// Execution-speed multiplier, clamped to
    /// [`PlaybackConfig::EXECUTION_SPEED_RANGE`].  Higher is faster.
    pub execution_speed: f64,

    /// Arrival-rate multiplier, clamped to
    /// [`PlaybackConfig::ARRIVAL_RATE_RANGE`].  Higher is more frequent.
    pub arrival_rate: f64,

    /// Start with dynamic arrivals enabled.
    pub dynamic_mode: bool,

    /// Master RNG seed.  The same seed always produces identical queues and
    /// arrivals.
    pub seed: u64,
}

impl PlaybackConfig {
    pub const EXECUTION_SPEED_RANGE: (f64, f64) = (0.5, 3.0);
    pub const ARRIVAL_RATE_RANGE:    (f64, f64) = (0.5, 5.0);

    /// Effective playback-step interval for the current speed.
    #[inline]
    pub fn step_interval_ms(&self) -> u64 {
        scaled_interval(self.base_step_interval_ms, self.execution_speed)
    }

    /// Effective arrival interval for the current rate.
    #[inline]
    pub fn arrival_interval_ms(&self) -> u64 {
        scaled_interval(self.base_arrival_interval_ms, self.arrival_rate)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            base_step_interval_ms:    1_000,
            base_arrival_interval_ms: 3_000,
            execution_speed:          1.0,
            arrival_rate:             1.0,
            dynamic_mode:             false,
            seed:                     42,
        }
    }
}

/// `round(base / multiplier)`, never below 1 ms.  A non-positive or
/// non-finite multiplier leaves the base interval unchanged.
fn scaled_interval(base_ms: u64, multiplier: f64) -> u64 {
    if !multiplier.is_finite() || multiplier <= 0.0 {
        return base_ms.max(1);
    }
    ((base_ms as f64 / multiplier).round() as u64).max(1)
}
