//! Shared test infrastructure for indicator-fsm integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use heapless::{String, Vec};
use indicator_fsm::diagnostics::LINE_CAPACITY;
use indicator_fsm::{
    DebounceError, Debouncer, DiagnosticSink, DisplayFeedback, Event, EventReceiver, EventSender,
    IndicatorDriver, IndicatorMachine, IndicatorState, IndicatorSystem, InputSource,
    StatusReporter, TimeDuration, TimeInstant, TimeSource,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    /// Jump to `time`; never moves backwards
    pub fn set_time(&self, time: TestInstant) {
        if time > self.current_time.get() {
            self.current_time.set(time);
        }
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Mock Driver, Sink and Feedback
// ============================================================================

/// Driver that records every state it was asked to show
pub struct RecordingDriver {
    history: Vec<IndicatorState, 128>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[IndicatorState] {
        &self.history
    }

    pub fn last(&self) -> Option<IndicatorState> {
        self.history.last().copied()
    }

    fn record(&mut self, state: IndicatorState) {
        let _ = self.history.push(state);
    }
}

impl IndicatorDriver for RecordingDriver {
    fn all_off(&mut self) {
        self.record(IndicatorState::Off);
    }

    fn set_color_a(&mut self) {
        self.record(IndicatorState::ColorA);
    }

    fn set_color_b(&mut self) {
        self.record(IndicatorState::ColorB);
    }

    fn set_color_c(&mut self) {
        self.record(IndicatorState::ColorC);
    }
}

/// Diagnostic sink that keeps every line
pub struct LineLog {
    lines: Vec<String<LINE_CAPACITY>, 32>,
}

impl LineLog {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn lines(&self) -> &[String<LINE_CAPACITY>] {
        &self.lines
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|line| line.contains(needle))
    }
}

impl DiagnosticSink for LineLog {
    fn write_line(&mut self, line: &str) {
        let mut owned = String::new();
        let _ = owned.push_str(line);
        let _ = self.lines.push(owned);
    }
}

/// Feedback that remembers every classified press
pub struct RecordingFeedback {
    events: Vec<Event, 32>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}

impl DisplayFeedback for RecordingFeedback {
    fn show_event(&mut self, event: Event) {
        let _ = self.events.push(event);
    }
}

// ============================================================================
// Schedulers
// ============================================================================

/// Services the machine at each of its wake times up to and including `end_ms`
pub fn run_machine_until<D, R, X>(
    machine: &mut IndicatorMachine<'_, TestInstant, D, MockTimeSource, R>,
    rx: &mut X,
    timer: &MockTimeSource,
    end_ms: u64,
) where
    D: IndicatorDriver,
    R: StatusReporter,
    X: EventReceiver,
{
    loop {
        let wake = machine.next_wake();
        if wake.0 > end_ms {
            break;
        }
        timer.set_time(wake);
        machine.service(rx);
    }
    timer.set_time(TestInstant(end_ms));
}

/// Services the debouncer at each of its wake times up to and including `end_ms`
pub fn run_debouncer_until<S, R, F, X>(
    debouncer: &mut Debouncer<'_, TestInstant, S, MockTimeSource, R, F>,
    tx: &mut X,
    timer: &MockTimeSource,
    end_ms: u64,
) -> Result<(), DebounceError>
where
    S: InputSource,
    R: StatusReporter,
    F: DisplayFeedback,
    X: EventSender,
{
    loop {
        let wake = debouncer.next_wake();
        if wake.0 > end_ms {
            break;
        }
        timer.set_time(wake);
        debouncer.service(tx)?;
    }
    timer.set_time(TestInstant(end_ms));
    Ok(())
}

/// Services the whole system at each wake time up to and including `end_ms`
pub fn run_system_until<S, D, R, F>(
    system: &mut IndicatorSystem<'_, TestInstant, S, D, MockTimeSource, R, F>,
    timer: &MockTimeSource,
    end_ms: u64,
) -> Result<(), DebounceError>
where
    S: InputSource,
    D: IndicatorDriver,
    R: StatusReporter,
    F: DisplayFeedback,
{
    loop {
        let wake = system.next_wake();
        if wake.0 > end_ms {
            break;
        }
        timer.set_time(wake);
        system.poll()?;
    }
    timer.set_time(TestInstant(end_ms));
    Ok(())
}
