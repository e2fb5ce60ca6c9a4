//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  The external driver
//! supplies the real duration of one tick as a [`TickLength`] (value + unit);
//! the bridge converts it to a [`Duration`] for its completion wait, and the
//! engine uses it as the motion integration step.
//!
//! [`TickCounter`] is the shared, thread-safe view of "how many steps have
//! completed": the stepping thread bumps it after each step and any thread
//! may read it for reporting.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    #[inline]
    pub fn next(self) -> Tick {
        self.offset(1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TickCounter ───────────────────────────────────────────────────────────────

/// Count of completed simulation steps.
///
/// Written only by whichever thread runs the step loop, after a step has
/// finished (successfully or not); read by any thread.
#[derive(Debug, Default)]
pub struct TickCounter(AtomicU64);

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed step and return the new tick.
    #[inline]
    pub fn increment(&self) -> Tick {
        Tick(self.0.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Number of completed steps so far.
    #[inline]
    pub fn get(&self) -> Tick {
        Tick(self.0.load(Ordering::Acquire))
    }
}

// ── TickLength ────────────────────────────────────────────────────────────────

/// Unit in which the external driver expresses the tick length.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    #[default]
    Milliseconds,
    Seconds,
    Minutes,
}

/// Real duration of one simulation tick, as supplied by the external driver.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct TickLength {
    pub value: u64,
    #[serde(default)]
    pub unit:  TimeUnit,
}

impl TickLength {
    pub const fn new(value: u64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub const fn millis(value: u64) -> Self {
        Self::new(value, TimeUnit::Milliseconds)
    }

    /// The tick length as a `Duration` (saturating on overflow).
    pub fn as_duration(self) -> Duration {
        match self.unit {
            TimeUnit::Nanoseconds  => Duration::from_nanos(self.value),
            TimeUnit::Microseconds => Duration::from_micros(self.value),
            TimeUnit::Milliseconds => Duration::from_millis(self.value),
            TimeUnit::Seconds      => Duration::from_secs(self.value),
            TimeUnit::Minutes      => Duration::from_secs(self.value.saturating_mul(60)),
        }
    }

    /// Tick length in seconds, the motion integration step.
    #[inline]
    pub fn as_secs_f32(self) -> f32 {
        self.as_duration().as_secs_f32()
    }
}

impl Default for TickLength {
    /// 100 ms, ten steps per simulated second.
    fn default() -> Self {
        Self::millis(100)
    }
}

impl fmt::Display for TickLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_duration())
    }
}
