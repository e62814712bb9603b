//! Indicator state machine: the consumer task.
//!
//! Provides [`IndicatorMachine`], which owns the current [`IndicatorState`] and
//! the [`IndicatorDriver`]. Each cycle takes at most one event, looks up the
//! next state, shows it, then holds it for a window of polling ticks. The
//! channel is polled on every tick. A preempting event ends the hold early
//! and becomes the input of the next cycle. Any other event is discarded:
//! for those the table's event column equals its timeout column, so the hold
//! ends in the state aging would have produced anyway.

use defmt_or_log as log;

use crate::channel::EventReceiver;
use crate::config::{ConfigError, HoldConfig};
use crate::diagnostics::{NoReport, Status, StatusReporter};
use crate::driver::IndicatorDriver;
use crate::event::Event;
use crate::state::IndicatorState;
use crate::time::{TimeDuration, TimeInstant, TimeSource, WakeSchedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Top of the loop: take an event and transition.
    Cycle,
    /// Showing the current state; `ticks_left` polling ticks remain.
    Holding { ticks_left: u16 },
}

/// Drives an indicator through the transition table with timed auto-advance.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and reporter references
/// * `I` - Time instant type
/// * `D` - Indicator driver, owned by the machine
/// * `T` - Time source implementation type
/// * `R` - Status reporter, shared with the producer task
pub struct IndicatorMachine<'t, I, D, T, R = NoReport>
where
    I: TimeInstant,
    D: IndicatorDriver,
    T: TimeSource<I>,
    R: StatusReporter,
{
    driver: D,
    time_source: &'t T,
    reporter: &'t R,
    config: HoldConfig<I::Duration>,
    state: IndicatorState,
    /// A preempting event already taken off the channel, consumed by the next cycle.
    available: Option<Event>,
    phase: Phase,
    schedule: WakeSchedule<I>,
    transitions: u32,
    ignored: u32,
}

impl<'t, I, D, T> IndicatorMachine<'t, I, D, T>
where
    I: TimeInstant,
    D: IndicatorDriver,
    T: TimeSource<I>,
{
    /// Creates a machine and immediately shows `initial` on the driver.
    ///
    /// The initial state gets a full hold window like any other state, so it
    /// ages forward only after a whole window without events.
    pub fn new(
        driver: D,
        time_source: &'t T,
        config: HoldConfig<I::Duration>,
        initial: IndicatorState,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut schedule = WakeSchedule::new(time_source.now());
        schedule.advance(config.tick);

        let mut machine = Self {
            driver,
            time_source,
            reporter: &NoReport,
            config,
            state: initial,
            available: None,
            phase: Phase::Holding {
                ticks_left: config.ticks,
            },
            schedule,
            transitions: 0,
            ignored: 0,
        };
        machine.driver.show(initial);
        Ok(machine)
    }
}

impl<'t, I, D, T, R> IndicatorMachine<'t, I, D, T, R>
where
    I: TimeInstant,
    D: IndicatorDriver,
    T: TimeSource<I>,
    R: StatusReporter,
{
    /// Routes status messages to `reporter` and announces the initial state.
    pub fn with_reporter<R2: StatusReporter>(
        self,
        reporter: &'t R2,
    ) -> IndicatorMachine<'t, I, D, T, R2> {
        reporter.report(Status::Started {
            state: self.state,
            hold_ms: self.config.window().as_millis(),
        });
        IndicatorMachine {
            driver: self.driver,
            time_source: self.time_source,
            reporter,
            config: self.config,
            state: self.state,
            available: self.available,
            phase: self.phase,
            schedule: self.schedule,
            transitions: self.transitions,
            ignored: self.ignored,
        }
    }

    /// Runs everything that is due at the current time.
    ///
    /// A due cycle transitions and starts a hold window; each due tick polls
    /// the channel once. A preemption runs the next cycle within the same call.
    ///
    /// # Returns
    /// Duration until the next hold tick.
    pub fn service<X: EventReceiver>(&mut self, rx: &mut X) -> I::Duration {
        let now = self.time_source.now();

        loop {
            match self.phase {
                Phase::Cycle => {
                    let event = self.await_event(rx);
                    self.transition(event);
                    self.phase = Phase::Holding {
                        ticks_left: self.config.ticks,
                    };
                    self.schedule.advance(self.config.tick);
                }
                Phase::Holding { ticks_left } => {
                    if !self.schedule.is_due(now) {
                        return self.schedule.remaining(now);
                    }

                    if self.poll_preemption(rx) {
                        self.phase = Phase::Cycle;
                        continue;
                    }

                    let ticks_left = ticks_left.saturating_sub(1);
                    if ticks_left == 0 {
                        self.phase = Phase::Cycle;
                    } else {
                        self.phase = Phase::Holding { ticks_left };
                        self.schedule.advance(self.config.tick);
                    }
                }
            }
        }
    }

    /// Takes at most one event: the preempting one first, otherwise one channel poll.
    fn await_event<X: EventReceiver>(&mut self, rx: &mut X) -> Option<Event> {
        self.available.take().or_else(|| rx.try_receive())
    }

    fn transition(&mut self, event: Option<Event>) {
        let next = self.state.next(event);
        log::debug!("{:?} --{:?}--> {:?}", self.state, event, next);
        self.state = next;
        self.driver.show(next);
        self.transitions = self.transitions.wrapping_add(1);
    }

    /// Polls the channel once during a hold tick.
    ///
    /// Returns true if the hold must end now; the preempting event is kept
    /// for the next cycle. Anything else is dropped and polling continues on
    /// the next tick.
    fn poll_preemption<X: EventReceiver>(&mut self, rx: &mut X) -> bool {
        let Some(event) = rx.try_receive() else {
            return false;
        };

        match self.state.preempted_by(event) {
            Some(target) => {
                log::debug!("{:?} preempts hold, heading to {:?}", event, target);
                self.available = Some(event);
                true
            }
            None => {
                log::debug!("{:?} ignored while holding {:?}", event, self.state);
                self.ignored = self.ignored.wrapping_add(1);
                false
            }
        }
    }

    /// Returns the state currently shown.
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Returns true while a hold window is in progress.
    pub fn is_holding(&self) -> bool {
        matches!(self.phase, Phase::Holding { .. })
    }

    /// Number of transitions taken since creation (wrapping).
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Number of events dropped mid-hold because they could not preempt (wrapping).
    pub fn ignored_events(&self) -> u32 {
        self.ignored
    }

    /// When the machine next needs servicing.
    pub fn next_wake(&self) -> I {
        self.schedule.next_wake()
    }

    /// Returns a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Releases the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}
