//! Indicator states and the transition table.
//!
//! All per-state policy lives in [`TRANSITION_TABLE`]. The preemption rule is
//! derived from it, so a preempted hold always lands in the same state the
//! next cycle would have computed for that event.

use crate::event::Event;

use self::IndicatorState::{ColorA, ColorB, ColorC, Off};

/// The color currently shown by the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    /// All colors off.
    #[default]
    Off,
    /// First color of the cycle.
    ColorA,
    /// Second color of the cycle.
    ColorB,
    /// Third color of the cycle.
    ColorC,
}

impl core::fmt::Display for IndicatorState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            IndicatorState::Off => "off",
            IndicatorState::ColorA => "color A",
            IndicatorState::ColorB => "color B",
            IndicatorState::ColorC => "color C",
        };
        f.write_str(name)
    }
}

/// Column of the transition table for an optional event.
///
/// `None` means a full hold window passed with no event.
const fn column(event: Option<Event>) -> usize {
    match event {
        Some(Event::ChannelA) => 0,
        Some(Event::ChannelB) => 1,
        None => 2,
    }
}

/// Next state, indexed by `[current state][trigger]`.
///
/// Columns: channel A, channel B, timeout. Channel A steps back toward the
/// start, channel B advances, timeout ages forward one notch (Off is stable).
pub const TRANSITION_TABLE: [[IndicatorState; 3]; 4] = [
    /* Off    */ [ColorA, Off, Off],
    /* ColorA */ [Off, ColorB, ColorB],
    /* ColorB */ [Off, ColorC, ColorA],
    /* ColorC */ [Off, ColorA, ColorA],
];

impl IndicatorState {
    /// All states, in table order.
    pub const ALL: [IndicatorState; 4] = [Off, ColorA, ColorB, ColorC];

    const fn row(self) -> usize {
        match self {
            Off => 0,
            ColorA => 1,
            ColorB => 2,
            ColorC => 3,
        }
    }

    /// Looks up the next state. `None` is the timeout-aging column.
    pub fn next(self, event: Option<Event>) -> IndicatorState {
        TRANSITION_TABLE[self.row()][column(event)]
    }

    /// Returns the state an event preempts a hold window into, if it does.
    ///
    /// Channel A preempts every state. Channel B preempts only ColorB.
    /// Any other event waits for the hold window to finish.
    pub fn preempted_by(self, event: Event) -> Option<IndicatorState> {
        match (self, event) {
            (_, Event::ChannelA) | (ColorB, Event::ChannelB) => Some(self.next(Some(event))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_matches_documented_transitions() {
        assert_eq!(Off.next(Some(Event::ChannelA)), ColorA);
        assert_eq!(Off.next(Some(Event::ChannelB)), Off);
        assert_eq!(Off.next(None), Off);

        assert_eq!(ColorA.next(Some(Event::ChannelA)), Off);
        assert_eq!(ColorA.next(Some(Event::ChannelB)), ColorB);
        assert_eq!(ColorA.next(None), ColorB);

        assert_eq!(ColorB.next(Some(Event::ChannelA)), Off);
        assert_eq!(ColorB.next(Some(Event::ChannelB)), ColorC);
        assert_eq!(ColorB.next(None), ColorA);

        assert_eq!(ColorC.next(Some(Event::ChannelA)), Off);
        assert_eq!(ColorC.next(Some(Event::ChannelB)), ColorA);
        assert_eq!(ColorC.next(None), ColorA);
    }

    #[test]
    fn channel_a_reaches_off_within_one_transition() {
        for state in IndicatorState::ALL {
            let first = state.next(Some(Event::ChannelA));
            let reached_off = first == Off || first.next(Some(Event::ChannelA)) == Off;
            assert!(reached_off, "{:?} did not reach Off", state);
        }
    }

    #[test]
    fn off_is_fixed_under_channel_b_and_timeout() {
        assert_eq!(Off.next(Some(Event::ChannelB)), Off);
        assert_eq!(Off.next(None), Off);
    }

    #[test]
    fn channel_b_never_turns_indicator_off_from_a_color() {
        for state in [ColorA, ColorB, ColorC] {
            assert_ne!(state.next(Some(Event::ChannelB)), Off);
        }
    }

    #[test]
    fn timeout_from_color_c_wraps_to_color_a() {
        assert_eq!(ColorC.next(None), ColorA);
    }

    #[test]
    fn preemption_agrees_with_table() {
        for state in IndicatorState::ALL {
            for event in [Event::ChannelA, Event::ChannelB] {
                if let Some(target) = state.preempted_by(event) {
                    assert_eq!(target, state.next(Some(event)));
                }
            }
        }
        assert_eq!(ColorA.preempted_by(Event::ChannelB), None);
        assert_eq!(ColorC.preempted_by(Event::ChannelB), None);
        assert_eq!(Off.preempted_by(Event::ChannelB), None);
        assert_eq!(ColorB.preempted_by(Event::ChannelB), Some(ColorC));
        assert_eq!(Off.preempted_by(Event::ChannelA), Some(ColorA));
    }
}
