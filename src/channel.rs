//! Bounded FIFO event channel between the debouncer and the state machine.
//!
//! [`EventChannel`] is the plain fixed-capacity queue. [`SharedEventChannel`]
//! wraps it in a blocking mutex so a producer task and a consumer task can
//! each hold a shared reference to the same queue.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::Deque;

use crate::event::Event;

/// Number of events the channel holds before a send is refused.
pub const EVENT_QUEUE_CAPACITY: usize = 5;

/// Errors returned by channel operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// The queue is full; the event was not enqueued.
    Full(Event),
}

impl core::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ChannelError::Full(event) => {
                write!(f, "event channel full, could not enqueue {}", event)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {}

/// Producer side of an event channel.
pub trait EventSender {
    /// Enqueues an event without blocking.
    ///
    /// Returns [`ChannelError::Full`] carrying the event back if there is no room.
    /// Never overwrites queued events.
    fn try_send(&mut self, event: Event) -> Result<(), ChannelError>;
}

/// Consumer side of an event channel.
pub trait EventReceiver {
    /// Dequeues the oldest event, or `None` if the channel is empty.
    ///
    /// An empty channel is a normal outcome, not an error.
    fn try_receive(&mut self) -> Option<Event>;
}

/// Fixed-capacity FIFO of events.
#[derive(Debug)]
pub struct EventChannel<const N: usize = EVENT_QUEUE_CAPACITY> {
    queue: Deque<Event, N>,
}

impl<const N: usize> EventChannel<N> {
    /// Creates an empty channel.
    pub const fn new() -> Self {
        Self {
            queue: Deque::new(),
        }
    }

    /// Number of unread events.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns true if the next send would be refused.
    pub fn is_full(&self) -> bool {
        self.queue.is_full()
    }

    /// Maximum number of unread events.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventSender for EventChannel<N> {
    fn try_send(&mut self, event: Event) -> Result<(), ChannelError> {
        self.queue.push_back(event).map_err(ChannelError::Full)
    }
}

impl<const N: usize> EventReceiver for EventChannel<N> {
    fn try_receive(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }
}

/// An [`EventChannel`] behind a blocking mutex, shareable between two tasks.
///
/// Use `CriticalSectionRawMutex` when producer and consumer may run in
/// different interrupt priorities, `NoopRawMutex` when both live in one
/// executor.
pub struct SharedEventChannel<M: RawMutex, const N: usize = EVENT_QUEUE_CAPACITY> {
    inner: Mutex<M, RefCell<EventChannel<N>>>,
}

impl<M: RawMutex, const N: usize> SharedEventChannel<M, N> {
    /// Creates an empty shared channel. Usable in a `static`.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(EventChannel::new())),
        }
    }

    /// Number of unread events.
    pub fn len(&self) -> usize {
        self.inner.lock(|channel| channel.borrow().len())
    }

    /// Returns true if no events are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<M: RawMutex, const N: usize> Default for SharedEventChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const N: usize> EventSender for &SharedEventChannel<M, N> {
    fn try_send(&mut self, event: Event) -> Result<(), ChannelError> {
        self.inner
            .lock(|channel| channel.borrow_mut().try_send(event))
    }
}

impl<M: RawMutex, const N: usize> EventReceiver for &SharedEventChannel<M, N> {
    fn try_receive(&mut self) -> Option<Event> {
        self.inner.lock(|channel| channel.borrow_mut().try_receive())
    }
}
