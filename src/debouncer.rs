//! Input debouncer: the producer task.
//!
//! Provides [`Debouncer`], which samples an [`InputSource`], confirms a raw
//! flip after a settle delay, classifies confirmed presses and publishes them
//! through an [`EventSender`]. It is serviced like every other component:
//! call [`Debouncer::service`] and sleep for the duration it returns.
//!
//! A refused send is retried every poll interval until the configured send
//! timeout; past that the debouncer halts for good, because dropping a press
//! would desynchronize the indicator from what the user did.

use defmt_or_log as log;

use crate::channel::{ChannelError, EventSender};
use crate::config::{ConfigError, DebounceConfig};
use crate::diagnostics::{NoReport, Status, StatusReporter};
use crate::event::{Event, RawInput};
use crate::time::{TimeInstant, TimeSource, WakeSchedule};

/// Source of raw input samples.
pub trait InputSource {
    /// Returns the instantaneous state of both channels.
    fn sample(&mut self) -> RawInput;
}

impl<F: FnMut() -> RawInput> InputSource for F {
    fn sample(&mut self) -> RawInput {
        self()
    }
}

/// Receives each classified press, e.g. to redraw a touch panel.
pub trait DisplayFeedback {
    /// Called once per confirmed press, before the event is sent.
    fn show_event(&mut self, event: Event);
}

/// Feedback that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl DisplayFeedback for NoFeedback {
    fn show_event(&mut self, _event: Event) {}
}

/// Errors that stop the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebounceError {
    /// The channel stayed full for the whole send timeout.
    ///
    /// Carries the event that could not be delivered. Indicates the channel
    /// is undersized or the consumer is starved.
    ChannelOverflow(Event),
}

impl core::fmt::Display for DebounceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DebounceError::ChannelOverflow(event) => {
                write!(f, "event channel overflow while sending {}", event)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DebounceError {}

/// What the debouncer will do when next serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DebouncePhase {
    /// Comparing samples against the stable state.
    Sampling,
    /// Waiting out the settle delay before confirming a flip.
    Settling,
    /// Retrying a send the channel refused.
    Sending,
    /// Stopped after a channel overflow.
    Halted,
}

#[derive(Debug, Clone, Copy)]
enum Phase<I> {
    Sampling,
    Settling,
    Sending { event: Event, deadline: I },
    Halted(Event),
}

/// Last stable combined level plus the level awaiting confirmation.
#[derive(Debug, Clone, Copy, Default)]
struct DebounceLatch {
    stable: bool,
    pending: bool,
}

/// Debounces two input channels into press events.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and reporter references
/// * `I` - Time instant type
/// * `S` - Raw input source
/// * `T` - Time source implementation type
/// * `R` - Status reporter, shared with the consumer task
/// * `F` - Display feedback for classified presses
pub struct Debouncer<'t, I, S, T, R = NoReport, F = NoFeedback>
where
    I: TimeInstant,
    S: InputSource,
    T: TimeSource<I>,
    R: StatusReporter,
    F: DisplayFeedback,
{
    source: S,
    feedback: F,
    time_source: &'t T,
    reporter: &'t R,
    config: DebounceConfig<I::Duration>,
    latch: DebounceLatch,
    phase: Phase<I>,
    schedule: WakeSchedule<I>,
}

impl<'t, I, S, T> Debouncer<'t, I, S, T>
where
    I: TimeInstant,
    S: InputSource,
    T: TimeSource<I>,
{
    /// Creates a debouncer that treats both channels as released.
    ///
    /// The first sample is due immediately.
    pub fn new(
        source: S,
        time_source: &'t T,
        config: DebounceConfig<I::Duration>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            feedback: NoFeedback,
            time_source,
            reporter: &NoReport,
            config,
            latch: DebounceLatch::default(),
            phase: Phase::Sampling,
            schedule: WakeSchedule::new(time_source.now()),
        })
    }
}

impl<'t, I, S, T, R, F> Debouncer<'t, I, S, T, R, F>
where
    I: TimeInstant,
    S: InputSource,
    T: TimeSource<I>,
    R: StatusReporter,
    F: DisplayFeedback,
{
    /// Routes status messages to `reporter`.
    pub fn with_reporter<R2: StatusReporter>(
        self,
        reporter: &'t R2,
    ) -> Debouncer<'t, I, S, T, R2, F> {
        Debouncer {
            source: self.source,
            feedback: self.feedback,
            time_source: self.time_source,
            reporter,
            config: self.config,
            latch: self.latch,
            phase: self.phase,
            schedule: self.schedule,
        }
    }

    /// Sends classified presses to `feedback`.
    pub fn with_feedback<F2: DisplayFeedback>(self, feedback: F2) -> Debouncer<'t, I, S, T, R, F2> {
        Debouncer {
            source: self.source,
            feedback,
            time_source: self.time_source,
            reporter: self.reporter,
            config: self.config,
            latch: self.latch,
            phase: self.phase,
            schedule: self.schedule,
        }
    }

    /// Runs the step that is due, if any.
    ///
    /// # Returns
    /// * `Ok(delay)` - Service again after `delay`; ZERO means another step is already due
    /// * `Err(ChannelOverflow)` - The producer is halted; every later call returns the same error
    pub fn service<X: EventSender>(&mut self, tx: &mut X) -> Result<I::Duration, DebounceError> {
        let now = self.time_source.now();

        // A halted debouncer reports its error whether or not a step is due.
        if self.is_halted() || self.schedule.is_due(now) {
            self.step(now, tx)?;
        }

        Ok(self.schedule.remaining(now))
    }

    fn step<X: EventSender>(&mut self, now: I, tx: &mut X) -> Result<(), DebounceError> {
        match self.phase {
            Phase::Sampling => {
                let pressed = self.source.sample().any_pressed();
                if pressed != self.latch.stable {
                    log::debug!("input level changed to {}, settling", pressed);
                    self.latch.pending = pressed;
                    self.phase = Phase::Settling;
                    self.schedule.advance(self.config.settle);
                    return Ok(());
                }
            }
            Phase::Settling => {
                let raw = self.source.sample();
                self.phase = Phase::Sampling;

                if raw.any_pressed() == self.latch.pending {
                    self.latch.stable = self.latch.pending;
                    // A confirmed release classifies to None.
                    if let Some(event) = raw.classify() {
                        self.publish(event, now, tx)?;
                    }
                } else {
                    log::debug!("input bounced back, flip rejected");
                }
            }
            Phase::Sending { event, deadline } => {
                self.phase = Phase::Sampling;
                self.try_deliver(event, deadline, now, tx)?;
            }
            Phase::Halted(event) => return Err(DebounceError::ChannelOverflow(event)),
        }

        self.schedule.advance(self.config.poll_interval);
        Ok(())
    }

    fn publish<X: EventSender>(&mut self, event: Event, now: I, tx: &mut X) -> Result<(), DebounceError> {
        log::info!("{:?} pressed", event);
        self.reporter.report(Status::Pressed(event));
        self.feedback.show_event(event);

        let deadline = now.checked_add(self.config.send_timeout).unwrap_or(now);
        self.try_deliver(event, deadline, now, tx)
    }

    fn try_deliver<X: EventSender>(
        &mut self,
        event: Event,
        deadline: I,
        now: I,
        tx: &mut X,
    ) -> Result<(), DebounceError> {
        match tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(ChannelError::Full(event)) if now >= deadline => {
                log::error!("event channel full past send timeout, halting input");
                self.phase = Phase::Halted(event);
                self.reporter.report(Status::QueueFull(event));
                Err(DebounceError::ChannelOverflow(event))
            }
            Err(ChannelError::Full(event)) => {
                log::warn!("event channel full, retrying {:?}", event);
                self.phase = Phase::Sending { event, deadline };
                Ok(())
            }
        }
    }

    /// Returns the current phase.
    pub fn phase(&self) -> DebouncePhase {
        match self.phase {
            Phase::Sampling => DebouncePhase::Sampling,
            Phase::Settling => DebouncePhase::Settling,
            Phase::Sending { .. } => DebouncePhase::Sending,
            Phase::Halted(_) => DebouncePhase::Halted,
        }
    }

    /// Returns true once a channel overflow stopped the debouncer.
    pub fn is_halted(&self) -> bool {
        matches!(self.phase, Phase::Halted(_))
    }

    /// Last confirmed combined level (true = pressed).
    pub fn stable_pressed(&self) -> bool {
        self.latch.stable
    }

    /// When the debouncer next needs servicing.
    pub fn next_wake(&self) -> I {
        self.schedule.next_wake()
    }

    /// Returns a reference to the feedback sink.
    pub fn feedback(&self) -> &F {
        &self.feedback
    }
}
