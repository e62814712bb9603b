#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Event`**: A debounced press on channel A or channel B
//! - **`Debouncer`**: Producer task; samples an `InputSource`, confirms flips after a settle delay, publishes events
//! - **`EventChannel`**: Bounded FIFO (capacity 5) between the tasks; `SharedEventChannel` for separate executors
//! - **`IndicatorMachine`**: Consumer task; transition table, hold windows, preemption
//! - **`IndicatorState`**: `Off`, `ColorA`, `ColorB`, `ColorC`
//! - **`IndicatorDriver`**: Trait to implement for your indicator hardware (`RgbIndicator`, `DiscreteIndicator` provided)
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`StatusReporter`**: Human-readable status over a mutex-guarded `DiagnosticPort`
//! - **`IndicatorSystem`**: Wires both tasks to one channel and services them cooperatively
//!
//! Components never sleep. Each `service` call does the work that is due and
//! returns how long to wait before the next call.

pub use palette::Srgb;

pub mod time;
pub mod event;
pub mod state;
pub mod channel;
pub mod colors;
pub mod driver;
pub mod config;
pub mod diagnostics;
pub mod debouncer;
pub mod machine;
pub mod system;

pub use channel::{ChannelError, EVENT_QUEUE_CAPACITY, EventChannel, EventReceiver, EventSender, SharedEventChannel};
pub use colors::IndicatorPalette;
pub use config::{ConfigError, DebounceConfig, HoldConfig, SystemConfig};
pub use debouncer::{DebounceError, DebouncePhase, Debouncer, DisplayFeedback, InputSource, NoFeedback};
pub use diagnostics::{DiagnosticPort, DiagnosticSink, NoReport, Status, StatusReporter};
pub use driver::{DiscreteIndicator, IndicatorDriver, RgbIndicator, RgbLed};
pub use event::{Event, RawInput};
pub use machine::IndicatorMachine;
pub use state::{IndicatorState, TRANSITION_TABLE};
pub use system::IndicatorSystem;
pub use time::{TimeDuration, TimeInstant, TimeSource, WakeSchedule};
