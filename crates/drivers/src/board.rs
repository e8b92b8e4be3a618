//! Hardware wiring of the drivers
//!
//! Type aliases with the interrupt-safe mutex and the embassy timer, plus
//! helpers that place driver instances in `'static` storage so they can be
//! shared between tasks.
//!
//! ```rust,ignore
//! static AMP: StaticCell<SharedSpeakerAmp<I2c0>> = StaticCell::new();
//! static PA_RESET: PaReset<GpioPinctrl<Output<'static>>> = PaReset::new();
//! static CAMERA_PMIC: CameraPmic<I2c1, Output<'static>> = CameraPmic::new();
//!
//! let amp = share_speaker_amp(&AMP, i2c0, AmpConfig::default());
//! PA_RESET.probe(&pa_node, |_| Ok(GpioPinctrl::new(pa_pin))).await?;
//! CAMERA_PMIC.probe(i2c1, I2cAddresses::WL2866D_PMIC, en_pin, pmic_config).await?;
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Delay;
use embedded_hal_async::i2c::I2c;
use platform::config::I2cAddresses;
use platform::I2cRegmap;
use static_cell::StaticCell;

use crate::audio::amp::fs1599::AmpConfig;
use crate::audio::{Fs1599, SpeakerPaReset};
use crate::camera::Wl2866d;

/// FS1599 on its board address, timed by the embassy timer.
pub type SpeakerAmp<I> = Fs1599<I2cRegmap<I>, Delay>;

/// [`SpeakerAmp`] shared between the sound-core tasks.
pub type SharedSpeakerAmp<I> = Mutex<CriticalSectionRawMutex, SpeakerAmp<I>>;

/// Speaker PA reset controller for a `static`.
pub type PaReset<P> = SpeakerPaReset<CriticalSectionRawMutex, P>;

/// Camera power IC for a `static`.
pub type CameraPmic<I, P> = Wl2866d<CriticalSectionRawMutex, I, P>;

/// Build the speaker amplifier on `i2c` at [`I2cAddresses::FS1599_AMP`].
pub fn speaker_amp<I: I2c>(i2c: I, config: AmpConfig) -> SpeakerAmp<I> {
    Fs1599::new(I2cRegmap::new(i2c, I2cAddresses::FS1599_AMP), Delay, config)
}

/// Build the speaker amplifier into `cell` and return the shared handle.
///
/// # Panics
/// If `cell` was already initialised.
pub fn share_speaker_amp<I: I2c>(
    cell: &'static StaticCell<SharedSpeakerAmp<I>>,
    i2c: I,
    config: AmpConfig,
) -> &'static SharedSpeakerAmp<I> {
    cell.init(Mutex::new(speaker_amp(i2c, config)))
}
