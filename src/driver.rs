//! Indicator driver abstraction and two hardware-backed implementations.
//!
//! The state machine only ever talks to an [`IndicatorDriver`]. The driver
//! owns its hardware handle, so no other component touches LED outputs.

use embedded_hal::digital::OutputPin;
use palette::Srgb;

use crate::colors::IndicatorPalette;
use crate::state::IndicatorState;

/// Sink for the four visual states.
///
/// Every operation is idempotent and mutually exclusive: turning one color on
/// implies the other two are off. Operations cannot fail; implementations
/// handle hardware errors internally.
pub trait IndicatorDriver {
    /// Turns every color off.
    fn all_off(&mut self);

    /// Shows only color A.
    fn set_color_a(&mut self);

    /// Shows only color B.
    fn set_color_b(&mut self);

    /// Shows only color C.
    fn set_color_c(&mut self);

    /// Dispatches a state to the matching operation.
    fn show(&mut self, state: IndicatorState) {
        match state {
            IndicatorState::Off => self.all_off(),
            IndicatorState::ColorA => self.set_color_a(),
            IndicatorState::ColorB => self.set_color_b(),
            IndicatorState::ColorC => self.set_color_c(),
        }
    }
}

/// Trait for abstracting RGB LED hardware.
///
/// Implement this for your LED hardware (GPIO, PWM, SPI, etc.) to drive it
/// through [`RgbIndicator`].
pub trait RgbLed {
    /// Sets the LED to the specified RGB color.
    ///
    /// Color components are in the range 0.0-1.0. Implementations convert
    /// these to their hardware's native format. This method cannot fail.
    fn set_color(&mut self, color: Srgb);
}

/// Drives a single RGB LED, one palette color per state.
pub struct RgbIndicator<L: RgbLed> {
    led: L,
    palette: IndicatorPalette,
}

impl<L: RgbLed> RgbIndicator<L> {
    /// Wraps an LED with the default palette.
    pub fn new(led: L) -> Self {
        Self::with_palette(led, IndicatorPalette::default())
    }

    /// Wraps an LED with a custom palette.
    pub fn with_palette(led: L, palette: IndicatorPalette) -> Self {
        Self { led, palette }
    }

    /// Returns the palette in use.
    pub fn palette(&self) -> &IndicatorPalette {
        &self.palette
    }

    /// Returns a reference to the LED.
    pub fn led(&self) -> &L {
        &self.led
    }

    /// Releases the LED.
    pub fn into_inner(self) -> L {
        self.led
    }

    fn apply(&mut self, state: IndicatorState) {
        let color = self.palette.color_for(state);
        self.led.set_color(color);
    }
}

impl<L: RgbLed> IndicatorDriver for RgbIndicator<L> {
    fn all_off(&mut self) {
        self.apply(IndicatorState::Off);
    }

    fn set_color_a(&mut self) {
        self.apply(IndicatorState::ColorA);
    }

    fn set_color_b(&mut self) {
        self.apply(IndicatorState::ColorB);
    }

    fn set_color_c(&mut self) {
        self.apply(IndicatorState::ColorC);
    }
}

/// Drives three single-color LEDs on separate output pins.
///
/// Pin write errors are ignored: the indicator is best-effort and the next
/// transition rewrites all three outputs anyway.
pub struct DiscreteIndicator<A, B, C> {
    color_a: A,
    color_b: B,
    color_c: C,
}

impl<A: OutputPin, B: OutputPin, C: OutputPin> DiscreteIndicator<A, B, C> {
    /// Takes ownership of the three pins and turns them all off.
    pub fn new(color_a: A, color_b: B, color_c: C) -> Self {
        let mut indicator = Self {
            color_a,
            color_b,
            color_c,
        };
        indicator.all_off();
        indicator
    }

    /// Releases the pins.
    pub fn release(self) -> (A, B, C) {
        (self.color_a, self.color_b, self.color_c)
    }

    fn write(&mut self, a: bool, b: bool, c: bool) {
        // Switch off before on so two colors are never lit together.
        if !a {
            let _ = self.color_a.set_low();
        }
        if !b {
            let _ = self.color_b.set_low();
        }
        if !c {
            let _ = self.color_c.set_low();
        }
        if a {
            let _ = self.color_a.set_high();
        }
        if b {
            let _ = self.color_b.set_high();
        }
        if c {
            let _ = self.color_c.set_high();
        }
    }
}

impl<A: OutputPin, B: OutputPin, C: OutputPin> IndicatorDriver for DiscreteIndicator<A, B, C> {
    fn all_off(&mut self) {
        self.write(false, false, false);
    }

    fn set_color_a(&mut self) {
        self.write(true, false, false);
    }

    fn set_color_b(&mut self) {
        self.write(false, true, false);
    }

    fn set_color_c(&mut self) {
        self.write(false, false, true);
    }
}
