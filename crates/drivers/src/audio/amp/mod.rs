//! Speaker amplifier driver abstractions
//!
//! - `fs1599` - FS1599 smart amplifier over a 16-bit register map
//! - `mock` - In-process mock for host tests (always available)

pub mod fs1599;
pub mod mock;

pub use fs1599::Fs1599;
pub use mock::MockAmp;

/// Speaker amplifier driver trait.
///
/// The sound core drives an amplifier through four calls: load the register
/// tables once after power-up, then start up / mute / shut down around each
/// playback stream.
pub trait AmpDriver {
    /// Error type returned by amplifier operations.
    type Error: core::fmt::Debug;

    /// Reset the chip and write the common and current scene tables.
    async fn reg_init(&mut self) -> Result<(), Self::Error>;

    /// Power the amplifier stage up.
    async fn start_up(&mut self) -> Result<(), Self::Error>;

    /// Mute (`true`) or unmute (`false`) the output.
    async fn set_mute(&mut self, mute: bool) -> Result<(), Self::Error>;

    /// Power the amplifier stage down.
    async fn shut_down(&mut self) -> Result<(), Self::Error>;

    /// Returns `true` between a `start_up` and the next `shut_down`.
    fn is_enabled(&self) -> bool;
}
