//! GPIO line helpers
//!
//! Drivers own their control lines as `embedded_hal::digital::OutputPin`s.
//! This module adds the logic-level value type used in logs and the
//! device-tree line number wrapper.

use embedded_hal::digital::OutputPin;

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Drive `pin` to `state`.
pub fn drive<P: OutputPin>(pin: &mut P, state: PinState) -> Result<(), P::Error> {
    match state {
        PinState::High => pin.set_high(),
        PinState::Low => pin.set_low(),
    }
}

/// GPIO line number as found in a device-tree `*-gpio` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct GpioLine(pub u32);
