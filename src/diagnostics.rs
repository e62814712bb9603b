//! Human-readable status reporting over a shared, mutex-guarded text sink.
//!
//! Both tasks report through a [`StatusReporter`]. [`DiagnosticPort`]
//! formats each [`Status`] into a fixed-size line and hands it to a
//! [`DiagnosticSink`] (a UART, RTT channel, test buffer) while holding a
//! blocking mutex, so lines from the two tasks never interleave.

use core::cell::RefCell;
use core::fmt::Write;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

use crate::event::Event;
use crate::state::IndicatorState;

/// Longest diagnostic line; longer output is truncated.
pub const LINE_CAPACITY: usize = 64;

/// A status message emitted by one of the tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// The state machine applied its initial state.
    Started {
        /// Initial indicator state.
        state: IndicatorState,
        /// Hold window length in milliseconds.
        hold_ms: u64,
    },
    /// The debouncer confirmed a press.
    Pressed(Event),
    /// The event channel stayed full past the send timeout; input is halted.
    QueueFull(Event),
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Status::Started { state, hold_ms } => {
                write!(f, "indicator started {}, hold {} ms", state, hold_ms)
            }
            Status::Pressed(event) => write!(f, "{} button pressed", event),
            Status::QueueFull(event) => {
                write!(f, "queue full, dropped {} and halted input", event)
            }
        }
    }
}

/// Receives status messages.
pub trait StatusReporter {
    /// Emits one status message. Must not fail.
    fn report(&self, status: Status);
}

/// Reporter that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReport;

impl StatusReporter for NoReport {
    fn report(&self, _status: Status) {}
}

/// Line-oriented text output.
pub trait DiagnosticSink {
    /// Writes one complete line, without a trailing newline.
    fn write_line(&mut self, line: &str);
}

/// A [`DiagnosticSink`] shared between tasks behind a blocking mutex.
pub struct DiagnosticPort<M: RawMutex, W: DiagnosticSink> {
    sink: Mutex<M, RefCell<W>>,
}

impl<M: RawMutex, W: DiagnosticSink> DiagnosticPort<M, W> {
    /// Wraps a sink. Usable in a `static` when the sink has a const constructor.
    pub const fn new(sink: W) -> Self {
        Self {
            sink: Mutex::new(RefCell::new(sink)),
        }
    }

    /// Runs `f` with exclusive access to the sink.
    pub fn with_sink<U>(&self, f: impl FnOnce(&mut W) -> U) -> U {
        self.sink.lock(|sink| f(&mut sink.borrow_mut()))
    }

    /// Writes a raw line under the lock.
    pub fn write_line(&self, line: &str) {
        self.with_sink(|sink| sink.write_line(line));
    }
}

impl<M: RawMutex, W: DiagnosticSink> StatusReporter for DiagnosticPort<M, W> {
    fn report(&self, status: Status) {
        let mut line: String<LINE_CAPACITY> = String::new();
        // Overflow leaves a truncated line, still worth emitting.
        let _ = write!(line, "{}", status);
        self.write_line(&line);
    }
}
