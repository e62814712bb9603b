//! Cooperative scheduler for the producer and consumer tasks.
//!
//! [`IndicatorSystem`] owns the event channel, the debouncer and the state
//! machine, and services both in turn from a single loop. On targets with a
//! real executor, the two components can instead run in their own tasks
//! around a [`SharedEventChannel`](crate::channel::SharedEventChannel).

use defmt_or_log as log;

use crate::channel::{EVENT_QUEUE_CAPACITY, EventChannel};
use crate::config::{ConfigError, SystemConfig};
use crate::debouncer::{DebounceError, Debouncer, DisplayFeedback, InputSource, NoFeedback};
use crate::diagnostics::StatusReporter;
use crate::driver::IndicatorDriver;
use crate::machine::IndicatorMachine;
use crate::state::IndicatorState;
use crate::time::{TimeDuration, TimeInstant, TimeSource};

/// The complete two-task indicator controller.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and reporter references
/// * `I` - Time instant type
/// * `S` - Raw input source
/// * `D` - Indicator driver
/// * `T` - Time source implementation type
/// * `R` - Status reporter shared by both tasks
/// * `F` - Display feedback for classified presses
pub struct IndicatorSystem<'t, I, S, D, T, R, F = NoFeedback>
where
    I: TimeInstant,
    S: InputSource,
    D: IndicatorDriver,
    T: TimeSource<I>,
    R: StatusReporter,
    F: DisplayFeedback,
{
    channel: EventChannel<EVENT_QUEUE_CAPACITY>,
    debouncer: Debouncer<'t, I, S, T, R, F>,
    machine: IndicatorMachine<'t, I, D, T, R>,
    producer_error: Option<DebounceError>,
}

impl<'t, I, S, D, T, R> IndicatorSystem<'t, I, S, D, T, R>
where
    I: TimeInstant,
    S: InputSource,
    D: IndicatorDriver,
    T: TimeSource<I>,
    R: StatusReporter,
{
    /// Builds the system in startup order: channel first, then the state
    /// machine (which shows the initial state), then the debouncer.
    pub fn new(
        source: S,
        driver: D,
        time_source: &'t T,
        reporter: &'t R,
        config: SystemConfig<I::Duration>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let channel = EventChannel::new();
        let machine = IndicatorMachine::new(driver, time_source, config.hold, config.initial_state)?
            .with_reporter(reporter);
        let debouncer = Debouncer::new(source, time_source, config.debounce)?.with_reporter(reporter);

        log::info!("indicator system ready");
        Ok(Self {
            channel,
            debouncer,
            machine,
            producer_error: None,
        })
    }
}

impl<'t, I, S, D, T, R, F> IndicatorSystem<'t, I, S, D, T, R, F>
where
    I: TimeInstant,
    S: InputSource,
    D: IndicatorDriver,
    T: TimeSource<I>,
    R: StatusReporter,
    F: DisplayFeedback,
{
    /// Sends classified presses to `feedback`.
    pub fn with_feedback<F2: DisplayFeedback>(self, feedback: F2) -> IndicatorSystem<'t, I, S, D, T, R, F2> {
        IndicatorSystem {
            channel: self.channel,
            debouncer: self.debouncer.with_feedback(feedback),
            machine: self.machine,
            producer_error: self.producer_error,
        }
    }

    /// Services the producer, then the consumer.
    ///
    /// After the producer halts it is no longer serviced; the state machine
    /// keeps running on whatever is already queued.
    ///
    /// # Returns
    /// * `Ok(delay)` - Time until either task next needs servicing
    /// * `Err(ChannelOverflow)` - Returned once, on the poll where the producer halted
    pub fn poll(&mut self) -> Result<I::Duration, DebounceError> {
        let mut halted = None;
        let producer_delay = match self.producer_error {
            Some(_) => None,
            None => match self.debouncer.service(&mut self.channel) {
                Ok(delay) => Some(delay),
                Err(err) => {
                    log::error!("input task halted");
                    self.producer_error = Some(err);
                    halted = Some(err);
                    None
                }
            },
        };

        let consumer_delay = self.machine.service(&mut self.channel);

        if let Some(err) = halted {
            return Err(err);
        }

        Ok(match producer_delay {
            Some(delay) if delay.as_millis() < consumer_delay.as_millis() => delay,
            _ => consumer_delay,
        })
    }

    /// Earliest time either running task needs servicing.
    pub fn next_wake(&self) -> I {
        let consumer = self.machine.next_wake();
        if self.producer_error.is_some() {
            return consumer;
        }
        let producer = self.debouncer.next_wake();
        if producer < consumer { producer } else { consumer }
    }

    /// State currently shown by the indicator.
    pub fn state(&self) -> IndicatorState {
        self.machine.state()
    }

    /// Number of events waiting in the channel.
    pub fn queued_events(&self) -> usize {
        self.channel.len()
    }

    /// The error that halted the producer, if any.
    pub fn producer_error(&self) -> Option<DebounceError> {
        self.producer_error
    }

    /// Returns a reference to the debouncer.
    pub fn debouncer(&self) -> &Debouncer<'t, I, S, T, R, F> {
        &self.debouncer
    }

    /// Returns a reference to the state machine.
    pub fn machine(&self) -> &IndicatorMachine<'t, I, D, T, R> {
        &self.machine
    }
}
