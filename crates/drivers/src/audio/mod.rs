//! Audio subsystem: speaker amplifier and PA reset control
//!
//! Vertically sliced: one sub-directory per hardware component.
//!
//! # Structure
//!
//! - `amp/` - Speaker amplifier (`Fs1599` hardware, `MockAmp` for tests)
//! - `scene` - Per-use-case register tables loaded into the amplifier
//! - `pa_reset` - External speaker PA reset line (`SpeakerPaReset`)
//!
//! # Dependency Injection
//!
//! The sound core targets the [`amp::AmpDriver`] trait. Concrete types are
//! injected at the call site:
//!
//! ```rust,ignore
//! async fn speaker_on<A: AmpDriver>(amp: &mut A) { amp.start_up().await.ok(); }
//!
//! // Hardware:
//! speaker_on(&mut Fs1599::new(I2cRegmap::new(i2c, 0x34), Delay, config));
//! // Tests:
//! speaker_on(&mut MockAmp::new());
//! ```

pub mod amp;
pub mod pa_reset;
pub mod scene;

pub use amp::{AmpDriver, Fs1599, MockAmp};
pub use pa_reset::SpeakerPaReset;
pub use scene::{RegEntry, Scene, SceneMask, SceneTables};
