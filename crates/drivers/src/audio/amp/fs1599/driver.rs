//! FS1599 bring-up and stream control

use embedded_hal_async::delay::DelayNs;
use platform::{DriverError, RegisterMap};

use super::config::AmpConfig;
use super::registers::{
    ACCKEY, ACCKEY_LOCK, ACCKEY_STARTUP, ACCKEY_TABLE, ANACTRL, ANACTRL_NORMAL, ANACTRL_STARTUP,
    ANASTAT, CHIPINI, CHIPINI_DONE, DEVID, DIGSTAT, LNMMODE, PWRCTRL, PWRCTRL_POWER_DOWN,
    PWRCTRL_POWER_UP, PWRCTRL_RESET, REVID, STATUS, SYSCTRL, SYSCTRL_AMP_OFF, SYSCTRL_AMP_ON,
};
use crate::audio::amp::AmpDriver;
use crate::audio::scene::Scene;

/// Soft-reset attempts before giving up.
pub const I2C_RETRY: usize = 5;

const RESET_SETTLE_MS: u32 = 15;
const STARTUP_SETTLE_MS: u32 = 10;
const SHUTDOWN_SETTLE_MS: u32 = 20;

/// Identification registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId {
    /// DEVID contents.
    pub devid: u16,
    /// REVID contents.
    pub revid: u16,
}

/// Status registers, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmpStatus {
    /// STATUS contents.
    pub status: u16,
    /// ANASTAT contents.
    pub anastat: u16,
    /// DIGSTAT contents.
    pub digstat: u16,
}

/// Driver state flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AmpState {
    /// Last `reg_init` succeeded.
    pub initialized: bool,
    /// Amplifier stage powered.
    pub amp_on: bool,
    /// Scene whose table is loaded. Cleared by mute.
    pub cur_scene: Option<Scene>,
    /// Outcome of the last `start_up`.
    pub last_error: Option<DriverError>,
}

/// FS1599 smart amplifier.
///
/// Generic over the register map so the same sequences run against
/// [`platform::I2cRegmap`] on the board and a mock map in tests.
pub struct Fs1599<R, D> {
    regmap: R,
    delay: D,
    config: AmpConfig,
    state: AmpState,
}

fn keep_first(first: &mut Option<DriverError>, result: Result<(), DriverError>) {
    if let Err(e) = result {
        if first.is_none() {
            *first = Some(e);
        }
    }
}

impl<R: RegisterMap, D: DelayNs> Fs1599<R, D> {
    /// Wrap a register map. Nothing is written until [`Fs1599::reg_init`].
    pub fn new(regmap: R, delay: D, config: AmpConfig) -> Self {
        Self {
            regmap,
            delay,
            config,
            state: AmpState::default(),
        }
    }

    /// Soft-reset the chip and wait for its internal init to finish.
    ///
    /// # Errors
    /// [`DriverError::Timeout`] if CHIPINI never reports completion within
    /// [`I2C_RETRY`] attempts.
    pub async fn i2c_reset(&mut self) -> Result<(), DriverError> {
        for attempt in 0..I2C_RETRY {
            // the chip NACKs the reset write and the read right after it
            let _ = self.regmap.write(PWRCTRL, PWRCTRL_RESET).await;
            let _ = self.regmap.read(PWRCTRL).await;
            self.delay.delay_ms(RESET_SETTLE_MS).await;

            let released = self.regmap.write(PWRCTRL, PWRCTRL_POWER_DOWN).await;
            let chipini = self.regmap.read(CHIPINI).await;
            match (released, chipini) {
                (Ok(()), Ok(v)) if CHIPINI_DONE.contains(&v) => {
                    debug!("fs1599: reset done after {} attempt(s)", attempt.wrapping_add(1));
                    return Ok(());
                }
                (Ok(()), Ok(v)) => {
                    trace!("fs1599: CHIPINI {:#x} on attempt {}", v, attempt);
                }
                (Err(e), _) | (_, Err(e)) => {
                    warn!("fs1599: reset attempt {} failed: {}", attempt, e.errno());
                }
            }
        }
        error!("fs1599: reset retry timeout");
        Err(DriverError::Timeout)
    }

    /// Write every table registered for `scene`. A scene without tables is a no-op.
    ///
    /// Stops at the first failing write.
    pub async fn write_scene(&mut self, scene: Scene) -> Result<(), DriverError> {
        let mut written = 0usize;
        for entry in self.config.tables.entries_for(scene) {
            self.regmap.write(entry.reg, entry.value).await.map_err(|e| {
                error!(
                    "fs1599: {} table write {:#x}={:#x} failed",
                    scene.name(),
                    entry.reg,
                    entry.value
                );
                e
            })?;
            written = written.wrapping_add(1);
        }
        trace!("fs1599: {} table, {} writes", scene.name(), written);
        Ok(())
    }

    /// Reset the chip and load the common and next-scene tables.
    ///
    /// Every step after the reset runs even if an earlier one failed, so the
    /// access key always ends up locked. The first error is returned.
    pub async fn reg_init(&mut self) -> Result<(), DriverError> {
        let next = self.config.next_scene;
        let mut first = None;

        keep_first(&mut first, self.i2c_reset().await);
        keep_first(&mut first, self.regmap.write(ACCKEY, ACCKEY_TABLE).await);
        keep_first(&mut first, self.write_scene(Scene::Common).await);
        if next != Scene::Common {
            keep_first(&mut first, self.write_scene(next).await);
        }
        keep_first(&mut first, self.regmap.write(ACCKEY, ACCKEY_LOCK).await);

        if let Some(e) = first {
            error!("fs1599: init fail: {}", e.errno());
            self.state.initialized = false;
            return Err(e);
        }
        info!("fs1599: initialised, scene {}", next.name());
        self.state.cur_scene = Some(next);
        self.state.initialized = true;
        Ok(())
    }

    /// Power the amplifier stage up.
    ///
    /// The whole sequence runs regardless of failures; the amplifier is then
    /// considered on and the first error, if any, is kept in
    /// [`AmpState::last_error`] as well as returned.
    pub async fn start_up(&mut self) -> Result<(), DriverError> {
        let mut first = None;
        keep_first(&mut first, self.regmap.write(ACCKEY, ACCKEY_STARTUP).await);
        keep_first(&mut first, self.regmap.write(ANACTRL, ANACTRL_STARTUP).await);
        keep_first(&mut first, self.regmap.write(PWRCTRL, PWRCTRL_POWER_UP).await);
        keep_first(&mut first, self.regmap.write(SYSCTRL, SYSCTRL_AMP_ON).await);
        self.delay.delay_ms(STARTUP_SETTLE_MS).await;
        keep_first(&mut first, self.regmap.write(ANACTRL, ANACTRL_NORMAL).await);
        keep_first(&mut first, self.regmap.write(ACCKEY, ACCKEY_LOCK).await);

        self.state.amp_on = true;
        self.state.last_error = first;
        match first {
            Some(e) => {
                warn!("fs1599: start-up finished with error {}", e.errno());
                Err(e)
            }
            None => {
                debug!("fs1599: amp on");
                Ok(())
            }
        }
    }

    /// Mute the output by leaving low-noise mode. Unmuting is a no-op; the
    /// next `reg_init` restores the scene.
    pub async fn set_mute(&mut self, mute: bool) -> Result<(), DriverError> {
        if !mute {
            return Ok(());
        }
        self.regmap.write_bitfield(LNMMODE, 0).await?;
        self.state.cur_scene = None;
        debug!("fs1599: muted");
        Ok(())
    }

    /// Power the amplifier stage down.
    pub async fn shut_down(&mut self) -> Result<(), DriverError> {
        let mut first = None;
        keep_first(&mut first, self.regmap.write(SYSCTRL, SYSCTRL_AMP_OFF).await);
        self.delay.delay_ms(SHUTDOWN_SETTLE_MS).await;
        keep_first(&mut first, self.regmap.write(PWRCTRL, PWRCTRL_POWER_DOWN).await);
        self.state.amp_on = false;
        debug!("fs1599: amp off");
        first.map_or(Ok(()), Err)
    }

    /// Read DEVID and REVID.
    pub async fn read_device_id(&mut self) -> Result<DeviceId, DriverError> {
        let devid = self.regmap.read(DEVID).await?;
        let revid = self.regmap.read(REVID).await?;
        Ok(DeviceId { devid, revid })
    }

    /// Read the status registers.
    pub async fn read_status(&mut self) -> Result<AmpStatus, DriverError> {
        Ok(AmpStatus {
            status: self.regmap.read(STATUS).await?,
            anastat: self.regmap.read(ANASTAT).await?,
            digstat: self.regmap.read(DIGSTAT).await?,
        })
    }

    /// Choose the scene the next `reg_init` loads.
    pub fn set_next_scene(&mut self, scene: Scene) {
        self.config.next_scene = scene;
    }

    /// Current state flags.
    pub fn state(&self) -> AmpState {
        self.state
    }

    /// Active configuration.
    pub fn config(&self) -> &AmpConfig {
        &self.config
    }

    /// Underlying register map.
    pub fn regmap(&self) -> &R {
        &self.regmap
    }

    /// Underlying register map, mutably.
    pub fn regmap_mut(&mut self) -> &mut R {
        &mut self.regmap
    }

    /// Give back the register map and delay.
    pub fn release(self) -> (R, D) {
        (self.regmap, self.delay)
    }
}

impl<R: RegisterMap, D: DelayNs> AmpDriver for Fs1599<R, D> {
    type Error = DriverError;

    async fn reg_init(&mut self) -> Result<(), Self::Error> {
        Fs1599::reg_init(self).await
    }

    async fn start_up(&mut self) -> Result<(), Self::Error> {
        Fs1599::start_up(self).await
    }

    async fn set_mute(&mut self, mute: bool) -> Result<(), Self::Error> {
        Fs1599::set_mute(self, mute).await
    }

    async fn shut_down(&mut self) -> Result<(), Self::Error> {
        Fs1599::shut_down(self).await
    }

    fn is_enabled(&self) -> bool {
        self.state.amp_on
    }
}
