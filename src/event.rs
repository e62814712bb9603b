//! Button events and raw input samples.

/// A debounced button press, published by the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Channel A (left button) was pressed.
    ChannelA,
    /// Channel B (right button) was pressed.
    ChannelB,
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Event::ChannelA => write!(f, "channel A"),
            Event::ChannelB => write!(f, "channel B"),
        }
    }
}

/// Instantaneous state of the two logical input channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawInput {
    /// Channel A is asserted.
    pub channel_a: bool,
    /// Channel B is asserted.
    pub channel_b: bool,
}

impl RawInput {
    /// Neither channel asserted.
    pub const RELEASED: RawInput = RawInput::new(false, false);

    /// Creates a sample from both channel levels.
    pub const fn new(channel_a: bool, channel_b: bool) -> Self {
        Self {
            channel_a,
            channel_b,
        }
    }

    /// Combined "pressed" level: true if any channel is asserted.
    pub fn any_pressed(&self) -> bool {
        self.channel_a || self.channel_b
    }

    /// Classifies the sample as a press event.
    ///
    /// Channel A wins when both channels are asserted. Returns `None` when no
    /// channel is asserted (a release).
    pub fn classify(&self) -> Option<Event> {
        if self.channel_a {
            Some(Event::ChannelA)
        } else if self.channel_b {
            Some(Event::ChannelB)
        } else {
            None
        }
    }
}
