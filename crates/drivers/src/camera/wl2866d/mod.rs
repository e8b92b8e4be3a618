//! WL2866D camera power IC (Will Semiconductor)
//!
//! Four LDO outputs feeding the camera sensors: two digital core rails
//! (DVDD1/DVDD2) and two analog rails (AVDD1/AVDD2). The chip sits on I2C
//! with 8-bit registers and is held in a known state by a chip-enable GPIO
//! that the driver drives low at probe.
//!
//! # Rails
//!
//! | Rail  | Enable bit | Voltage reg | Default |
//! |-------|------------|-------------|---------|
//! | DVDD1 | 0          | 0x03        | 1.20 V  |
//! | DVDD2 | 1          | 0x04        | 1.05 V  |
//! | AVDD1 | 2          | 0x05        | 2.80 V  |
//! | AVDD2 | 3          | 0x06        | 2.80 V  |
//!
//! Sensor drivers call [`Wl2866d::power_control`] from their power-up and
//! power-down sequences. [`RegDump`] exposes the text register interface
//! used by host tooling.

mod config;
mod driver;
pub mod regdump;
pub mod registers;

pub use config::{RegValue, Wl2866dConfig};
pub use driver::{RailRequest, Wl2866d, DVDD1_LOW_CORE_UV, PROBE_ATTEMPTS};
pub use regdump::{RegDump, Whence};
pub use registers::{Rail, RailKind};
