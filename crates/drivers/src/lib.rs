//! Discrete peripheral drivers
//!
//! HAL-agnostic async drivers for the parts the sound and camera stacks
//! depend on but do not own.
//!
//! # Architecture
//!
//! ```text
//! Sound core / camera sensor drivers
//!         ↓
//! This crate (FS1599, speaker PA reset, WL2866D)
//!         ↓
//! platform crate (RegisterMap, PinctrlHandle, DeviceNode)
//!         ↓
//! embedded-hal / embedded-hal-async bus and pin implementations
//! ```
//!
//! # Features
//!
//! - `hardware` - embassy timer, critical-section mutex aliases, defmt logging
//! - `defmt` - defmt logging and `defmt::Format` derives
//! - `tracing` - tracing logging (host tooling)
//! - `std` - host mocks from the platform crate
//! - `serde` - serde derives on driver configuration
//!
//! # Examples
//!
//! ```no_run
//! use drivers::camera::{Rail, Wl2866d};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//!
//! async fn sensor_power_up<I, P>(pmic: &Wl2866d<NoopRawMutex, I, P>)
//! where
//!     I: embedded_hal_async::i2c::I2c,
//!     P: embedded_hal::digital::OutputPin,
//! {
//!     for rail in [Rail::Dvdd1, Rail::Avdd1] {
//!         pmic.power_on(rail).await.ok();
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Critical correctness: deny these
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
// unsafe fn body is not implicitly unsafe block
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)] // common in Rust crates; not a real issue
#![allow(clippy::missing_errors_doc)] // errno-style errors are documented on DriverError
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::new_without_default)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

// must come first so the log macros are visible in every module
#[macro_use]
mod fmt;

pub mod audio;
pub mod camera;

#[cfg(feature = "hardware")]
pub mod board;

pub use audio::{AmpDriver, Fs1599, MockAmp, Scene, SpeakerPaReset};
pub use camera::{Rail, RailRequest, Wl2866d, Wl2866dConfig};
pub use platform::DriverError;
