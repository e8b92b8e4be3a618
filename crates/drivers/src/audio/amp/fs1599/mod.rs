//! FS1599 smart speaker amplifier (Fourier Semiconductor)
//!
//! Mono class-D amplifier with an on-chip boost. It is configured entirely
//! through 16-bit registers behind an I2C register map; there is no DSP, so
//! tuning consists of per-scene register tables.
//!
//! # Power sequence
//!
//! ```text
//! reg_init:  soft reset → unlock (0x0091) → common table → scene table → lock
//! start_up:  unlock (0xCA91) → ANACTRL hold → PWRCTRL up → SYSCTRL amp on
//!            → 10 ms → ANACTRL release → lock
//! shut_down: SYSCTRL off → 20 ms → PWRCTRL power down
//! ```
//!
//! The soft reset is NACKed by the chip; completion is detected by polling
//! CHIPINI, retried [`I2C_RETRY`] times with 15 ms between attempts.

mod config;
mod driver;
pub mod registers;

pub use config::AmpConfig;
pub use driver::{AmpState, AmpStatus, DeviceId, Fs1599, I2C_RETRY};
