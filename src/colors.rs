//! Color constants and the state-to-color palette.
//!
//! Colors are `palette::Srgb` (0.0-1.0 per channel) so they can be handed
//! straight to an [`RgbLed`](crate::driver::RgbLed).

use palette::Srgb;

use crate::state::IndicatorState;

/// All channels off.
pub const OFF: Srgb = Srgb::new(0.0, 0.0, 0.0);
/// Pure red.
pub const RED: Srgb = Srgb::new(1.0, 0.0, 0.0);
/// Pure green.
pub const GREEN: Srgb = Srgb::new(0.0, 1.0, 0.0);
/// Red and green at full level.
pub const YELLOW: Srgb = Srgb::new(1.0, 1.0, 0.0);

/// Maps each lit indicator state to a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPalette {
    /// Shown for [`IndicatorState::ColorA`].
    pub color_a: Srgb,
    /// Shown for [`IndicatorState::ColorB`].
    pub color_b: Srgb,
    /// Shown for [`IndicatorState::ColorC`].
    pub color_c: Srgb,
}

impl IndicatorPalette {
    /// Creates a palette from three colors.
    pub const fn new(color_a: Srgb, color_b: Srgb, color_c: Srgb) -> Self {
        Self {
            color_a,
            color_b,
            color_c,
        }
    }

    /// Color for a state; Off maps to [`OFF`].
    pub fn color_for(&self, state: IndicatorState) -> Srgb {
        match state {
            IndicatorState::Off => OFF,
            IndicatorState::ColorA => self.color_a,
            IndicatorState::ColorB => self.color_b,
            IndicatorState::ColorC => self.color_c,
        }
    }
}

/// Red, green, yellow.
impl Default for IndicatorPalette {
    fn default() -> Self {
        Self::new(RED, GREEN, YELLOW)
    }
}
