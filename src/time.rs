//! Time abstraction traits and the rolling wake schedule.
//!
//! Components never sleep themselves. They read "now" from a [`TimeSource`],
//! do whatever work is due, and hand back the duration until they next need
//! servicing. [`WakeSchedule`] keeps those wake times anchored to an absolute
//! accumulator so that late servicing never pushes the schedule forward.

/// Trait for abstracting time sources.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Trait abstraction for duration types.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Trait abstraction for instant types.
///
/// Instants must be ordered so a schedule can tell whether its wake time has
/// passed.
pub trait TimeInstant: Copy + PartialOrd {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Calculates duration since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;

    /// Adds duration to instant, returns None on overflow.
    fn checked_add(self, duration: Self::Duration) -> Option<Self>;
}

/// Absolute wake-time accumulator with delay-until semantics.
///
/// Every [`advance`](WakeSchedule::advance) moves the wake time forward from
/// the previous wake time, not from "now", so cumulative drift does not
/// compound across iterations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WakeSchedule<I: TimeInstant> {
    next: I,
}

impl<I: TimeInstant> WakeSchedule<I> {
    /// Creates a schedule whose first wake time is `start`.
    pub fn new(start: I) -> Self {
        Self { next: start }
    }

    /// Returns the next wake time.
    pub fn next_wake(&self) -> I {
        self.next
    }

    /// Returns true once `now` has reached the wake time.
    pub fn is_due(&self, now: I) -> bool {
        now >= self.next
    }

    /// Moves the wake time forward by `period` and returns the new wake time.
    ///
    /// On instant overflow the wake time is left unchanged, which makes the
    /// schedule immediately due instead of panicking.
    pub fn advance(&mut self, period: I::Duration) -> I {
        if let Some(next) = self.next.checked_add(period) {
            self.next = next;
        }
        self.next
    }

    /// Duration from `now` until the wake time, or ZERO if already due.
    pub fn remaining(&self, now: I) -> I::Duration {
        if self.is_due(now) {
            I::Duration::ZERO
        } else {
            self.next.duration_since(now)
        }
    }
}
