//! Pin-control state selection.
//!
//! Some lines are not driven as plain GPIOs but switched between named
//! pin-control states ("active" / "sleep") that the board configuration
//! maps to mux, bias and drive settings. [`PinctrlHandle`] is that seam.
//! Boards without a pin controller use [`GpioPinctrl`], which maps the two
//! states onto a push-pull output.

use embedded_hal::digital::OutputPin;

use crate::gpio::{drive, PinState};

/// Named pin-control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinctrlState {
    /// Line is in its operating configuration.
    Active,
    /// Line is parked in its low-power configuration.
    Sleep,
}

impl PinctrlState {
    /// `Active` when `enable` is set, `Sleep` otherwise.
    #[must_use]
    pub const fn from_enable(enable: bool) -> Self {
        if enable {
            Self::Active
        } else {
            Self::Sleep
        }
    }

    /// Device-tree `pinctrl-names` entry for this state.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Active => "default",
            Self::Sleep => "sleep",
        }
    }
}

/// A line whose configuration is switched by state name.
pub trait PinctrlHandle {
    /// Error type
    type Error: core::fmt::Debug;

    /// Apply `state` to the line.
    fn select_state(&mut self, state: PinctrlState) -> Result<(), Self::Error>;
}

/// [`PinctrlHandle`] backed by a plain output pin.
///
/// `Active` drives the pin high, `Sleep` drives it low.
pub struct GpioPinctrl<P> {
    pin: P,
    current: Option<PinctrlState>,
}

impl<P: OutputPin> GpioPinctrl<P> {
    /// Wrap `pin`. The pin is not touched until the first `select_state`.
    pub fn new(pin: P) -> Self {
        Self { pin, current: None }
    }

    /// Last successfully applied state.
    pub fn current(&self) -> Option<PinctrlState> {
        self.current
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> PinctrlHandle for GpioPinctrl<P> {
    type Error = P::Error;

    fn select_state(&mut self, state: PinctrlState) -> Result<(), Self::Error> {
        let level = match state {
            PinctrlState::Active => PinState::High,
            PinctrlState::Sleep => PinState::Low,
        };
        drive(&mut self.pin, level)?;
        self.current = Some(state);
        Ok(())
    }
}
