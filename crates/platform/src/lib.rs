//! Hardware abstraction layer for the board's discrete peripheral drivers
//!
//! This crate provides the seams the drivers crate is written against, so
//! every register sequence can be developed and tested without hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Sibling subsystems (sound core, camera sensor drivers)
//!         ↓
//! drivers crate (FS1599 amp, speaker PA reset, WL2866D power IC)
//!         ↓
//! Platform HAL (this crate - register map, pin control, device tree)
//!         ↓
//! embedded-hal / embedded-hal-async bus implementations
//! ```
//!
//! # Modules
//!
//! - [`regmap`] - 8-bit address / 16-bit value register maps and bitfields
//! - [`pinctrl`] - Named pin-control states ("active" / "sleep")
//! - [`gpio`] - GPIO line helpers
//! - [`devicetree`] - Probe-time property lookup
//! - [`error`] - errno-style [`DriverError`]
//! - [`config`] - Compatible strings, property names and bus addresses
//! - `mocks` - Host mocks (`std` feature)
//!
//! # Features
//!
//! - `std`: Enable host mocks (for testing)
//! - `serde`: serde derives on configuration value types
//! - `defmt`: Enable defmt::Format derives
//!
//! # Example
//!
//! ```no_run
//! use platform::regmap::{Bitfield, RegisterMap};
//!
//! async fn example<R: RegisterMap>(map: &mut R) {
//!     map.write_bitfield(Bitfield::new(0x0F3F), 0).await.ok();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors: callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod config;
pub mod devicetree;
pub mod error;
pub mod gpio;
pub mod mocks;
pub mod pinctrl;
pub mod regmap;

pub use devicetree::{DeviceNode, Phandle, Property};
pub use error::DriverError;
pub use gpio::{GpioLine, PinState};
pub use pinctrl::{GpioPinctrl, PinctrlHandle, PinctrlState};
pub use regmap::{Bitfield, I2cRegmap, RegisterMap};
