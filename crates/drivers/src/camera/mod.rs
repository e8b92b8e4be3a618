//! Camera subsystem: sensor power supply
//!
//! - `wl2866d/` - WL2866D four-rail camera power IC

pub mod wl2866d;

pub use wl2866d::{Rail, RailRequest, Wl2866d, Wl2866dConfig};
