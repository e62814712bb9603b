//! Timing configuration for the debouncer and the state machine.
//!
//! Defaults follow the reference board: a 2 s settle delay, 25 ms input
//! polling, and a 5 s hold window split into fifty 100 ms ticks.

use crate::state::IndicatorState;
use crate::time::TimeDuration;

/// Default settle delay before a raw state flip is accepted.
pub const DEFAULT_SETTLE_MS: u64 = 2_000;
/// Default input poll interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 25;
/// Default upper bound for retrying a refused send.
pub const DEFAULT_SEND_TIMEOUT_MS: u64 = 1_000;
/// Default length of one hold-window polling tick.
pub const DEFAULT_HOLD_TICK_MS: u64 = 100;
/// Default number of ticks in a hold window.
pub const DEFAULT_HOLD_TICKS: u16 = 50;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Input poll interval is zero.
    ZeroPollInterval,

    /// Hold tick length is zero.
    ZeroHoldTick,

    /// Hold window has no ticks.
    ZeroHoldTicks,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroPollInterval => write!(f, "input poll interval must be non-zero"),
            ConfigError::ZeroHoldTick => write!(f, "hold tick length must be non-zero"),
            ConfigError::ZeroHoldTicks => {
                write!(f, "hold window must contain at least one tick")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Debouncer timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceConfig<D: TimeDuration> {
    /// Delay between seeing a raw flip and confirming it.
    pub settle: D,
    /// Delay between input samples.
    pub poll_interval: D,
    /// How long a refused send is retried before the producer halts.
    pub send_timeout: D,
}

impl<D: TimeDuration> DebounceConfig<D> {
    /// Checks that the debouncer always makes forward progress.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval == D::ZERO {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

impl<D: TimeDuration> Default for DebounceConfig<D> {
    fn default() -> Self {
        Self {
            settle: D::from_millis(DEFAULT_SETTLE_MS),
            poll_interval: D::from_millis(DEFAULT_POLL_INTERVAL_MS),
            send_timeout: D::from_millis(DEFAULT_SEND_TIMEOUT_MS),
        }
    }
}

/// Hold window timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldConfig<D: TimeDuration> {
    /// Length of one polling tick.
    pub tick: D,
    /// Ticks per hold window.
    pub ticks: u16,
}

impl<D: TimeDuration> HoldConfig<D> {
    /// Total hold window length, saturating at `u64::MAX` milliseconds.
    pub fn window(&self) -> D {
        D::from_millis(self.tick.as_millis().saturating_mul(u64::from(self.ticks)))
    }

    /// Checks that the hold window is finite and non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick == D::ZERO {
            return Err(ConfigError::ZeroHoldTick);
        }
        if self.ticks == 0 {
            return Err(ConfigError::ZeroHoldTicks);
        }
        Ok(())
    }
}

impl<D: TimeDuration> Default for HoldConfig<D> {
    fn default() -> Self {
        Self {
            tick: D::from_millis(DEFAULT_HOLD_TICK_MS),
            ticks: DEFAULT_HOLD_TICKS,
        }
    }
}

/// Complete system configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SystemConfig<D: TimeDuration> {
    /// Debouncer timing.
    pub debounce: DebounceConfig<D>,
    /// Hold window timing.
    pub hold: HoldConfig<D>,
    /// State applied to the driver before the first cycle.
    pub initial_state: IndicatorState,
}

impl<D: TimeDuration> SystemConfig<D> {
    /// Validates both halves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.debounce.validate()?;
        self.hold.validate()
    }
}

impl<D: TimeDuration> Default for SystemConfig<D> {
    fn default() -> Self {
        Self {
            debounce: DebounceConfig::default(),
            hold: HoldConfig::default(),
            initial_state: IndicatorState::Off,
        }
    }
}
