//! WL2866D probe and rail control

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::i2c::I2c;
use platform::gpio::{drive, PinState};
use platform::DriverError;

use super::config::Wl2866dConfig;
use super::registers::{Rail, DEFAULTS, DISCHARGE, DISCHARGE_ENABLE, ENABLE};

/// Bring-up attempts made by [`Wl2866d::probe`].
pub const PROBE_ATTEMPTS: usize = 4;

/// What to do with a rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RailRequest {
    /// Switch the rail off.
    Off,
    /// Switch the rail on at its default voltage.
    On,
    /// Switch the rail on at a specific voltage.
    OnAt {
        /// Target voltage, rounded up to the next regulator step.
        millivolts: u32,
    },
}

/// Raw power-on value that asks for DVDD1 at 1.05 V instead of its default.
pub const DVDD1_LOW_CORE_UV: u32 = 1_050_000;

impl RailRequest {
    /// Decode the integer `is_power_on` argument used by camera sensor
    /// drivers. `0` is off and any other value is on at the rail's default
    /// voltage, except [`DVDD1_LOW_CORE_UV`] on [`Rail::Dvdd1`], which
    /// selects 1.05 V.
    #[must_use]
    pub const fn from_raw(rail: Rail, is_power_on: u32) -> Self {
        match (rail, is_power_on) {
            (_, 0) => Self::Off,
            (Rail::Dvdd1, DVDD1_LOW_CORE_UV) => Self::OnAt {
                millivolts: 1050,
            },
            _ => Self::On,
        }
    }

    /// Whether the rail ends up enabled.
    #[must_use]
    pub const fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// Device state owned by the mutex.
pub(super) struct Inner<I, P> {
    i2c: I,
    addr: u8,
    en: P,
    config: Wl2866dConfig,
    pub(super) chip_id: u8,
    pub(super) on: bool,
    /// Register-dump cursor.
    pub(super) offset: u8,
}

impl<I: I2c, P: OutputPin> Inner<I, P> {
    pub(super) async fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), DriverError> {
        self.i2c.write(self.addr, &[reg, val]).await.map_err(|e| {
            error!("wl2866d: write reg error: reg={:#x}, val={:#x}", reg, val);
            DriverError::from_bus(&e)
        })
    }

    pub(super) async fn read_reg(&mut self, reg: u8) -> Result<u8, DriverError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(|e| {
                error!("wl2866d: read reg error: reg={:#x}", reg);
                DriverError::from_bus(&e)
            })?;
        let [val] = buf;
        trace!("wl2866d: read {:#x}@{:#x}", val, reg);
        Ok(val)
    }

    /// Enable line low, defaults, ID check, init table.
    async fn bring_up(&mut self) -> Result<(), DriverError> {
        drive(&mut self.en, PinState::Low).map_err(|_| {
            error!("wl2866d: en pin request failed");
            DriverError::Io
        })?;
        debug!("wl2866d: en_gpio set low");

        for (reg, &val) in (0u8..).zip(DEFAULTS.iter()) {
            self.write_reg(reg, val).await.map_err(|_| {
                error!("wl2866d: init register {:#x}={:#x} failed", reg, val);
                DriverError::Io
            })?;
        }

        let id_reg = self.config.id_reg;
        let chip_id = self.read_reg(id_reg).await.map_err(|_| {
            error!("wl2866d: is not found, id read failed");
            DriverError::NoDevice
        })?;
        if !self.config.id_matches(chip_id) {
            error!("wl2866d: is not found, id {:#x}", chip_id);
            return Err(DriverError::NoDevice);
        }
        self.chip_id = chip_id;
        info!("wl2866d: is found {:#x}", chip_id);

        let inits = self.config.inits.clone();
        for init in &inits {
            self.write_reg(init.reg, init.val).await.map_err(|_| {
                error!("wl2866d: update {:#x} failed", init.reg);
                DriverError::NoDevice
            })?;
        }
        debug!("wl2866d: init done, {} writes", inits.len());
        Ok(())
    }

    async fn power_control(&mut self, rail: Rail, request: RailRequest) -> Result<(), DriverError> {
        let target = match request {
            RailRequest::OnAt { millivolts } => rail.kind().encode_mv(millivolts).map_err(|e| {
                error!("wl2866d: {} cannot be set to {} mV", rail.name(), millivolts);
                e
            })?,
            RailRequest::On | RailRequest::Off => rail.default_code(),
        };

        let mut enable = self.read_reg(ENABLE).await.map_err(|e| {
            error!("wl2866d: read power out control reg failed");
            e
        })?;
        debug!("wl2866d pwr_ctrl: {}", rail.name());

        // discharge disabled outputs to avoid leakage into the sensor
        if self.write_reg(DISCHARGE, DISCHARGE_ENABLE).await.is_err() {
            warn!("wl2866d: set discharge enable failed");
        }

        if request.is_on() {
            let reg = rail.voltage_reg();
            let current = self.read_reg(reg).await;
            if current == Ok(target) {
                trace!("wl2866d: voltage is right, no need write reg");
            } else {
                self.write_reg(reg, target).await.map_err(|e| {
                    error!("wl2866d: set voltage fail {}", rail.name());
                    e
                })?;
            }
            enable |= rail.bit();
            debug!("wl2866d pwr_ctrl: power on, set reg {:#x}", enable);
        } else {
            enable &= !rail.bit();
            debug!("wl2866d pwr_ctrl: power off, set reg {:#x}", enable);
        }

        self.write_reg(ENABLE, enable).await.map_err(|e| {
            error!("wl2866d: set {} enable failed", rail.name());
            e
        })
    }
}

/// WL2866D four-rail camera power IC.
///
/// Lives in a `static` and is shared by reference between camera sensor
/// drivers; every entry point runs under the internal mutex.
pub struct Wl2866d<M: RawMutex, I, P> {
    pub(super) inner: Mutex<M, Option<Inner<I, P>>>,
}

impl<M: RawMutex, I: I2c, P: OutputPin> Default for Wl2866d<M, I, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, I: I2c, P: OutputPin> Wl2866d<M, I, P> {
    /// Unprobed device.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Take ownership of the bus and enable line and bring the chip up.
    ///
    /// Bring-up is attempted up to [`PROBE_ATTEMPTS`] times. On success all
    /// four rails are switched off and the device accepts
    /// [`Wl2866d::power_control`]. On failure the bus and pin stay owned by
    /// the device (see [`Wl2866d::release`]) but every entry point refuses
    /// to run.
    pub async fn probe(
        &self,
        i2c: I,
        addr: u8,
        en: P,
        config: Wl2866dConfig,
    ) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        let inner = guard.insert(Inner {
            i2c,
            addr,
            en,
            config,
            chip_id: 0,
            on: false,
            offset: 0,
        });

        let mut result = Err(DriverError::NoDevice);
        for attempt in 1..=PROBE_ATTEMPTS {
            result = inner.bring_up().await;
            match result {
                Ok(()) => break,
                Err(e) => warn!(
                    "wl2866d: probe attempt {}/{} failed: {}",
                    attempt,
                    PROBE_ATTEMPTS,
                    e.errno()
                ),
            }
        }
        result?;

        inner.on = true;
        for rail in Rail::ALL {
            if inner.power_control(rail, RailRequest::Off).await.is_err() {
                warn!("wl2866d: could not switch {} off", rail.name());
            }
        }
        info!("wl2866d: probe succeeded");
        Ok(())
    }

    /// Switch one rail on or off.
    ///
    /// # Errors
    /// - [`DriverError::NotPermitted`] if probe did not complete.
    /// - [`DriverError::OutOfRange`] if a requested voltage is not programmable.
    /// - Bus errors from the enable or voltage register access.
    pub async fn power_control(&self, rail: Rail, request: RailRequest) -> Result<(), DriverError> {
        let mut guard = self.inner.lock().await;
        let inner = guard
            .as_mut()
            .filter(|i| i.on)
            .ok_or_else(|| {
                error!("wl2866d: probe failed, power control not available");
                DriverError::NotPermitted
            })?;
        inner.power_control(rail, request).await
    }

    /// [`Wl2866d::power_control`] with the integer arguments sensor drivers
    /// pass: rail index 0..=3 and the raw power-on value
    /// (see [`RailRequest::from_raw`]).
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] for a rail index above 3, otherwise
    /// as [`Wl2866d::power_control`].
    pub async fn power_control_raw(&self, rail: u32, is_power_on: u32) -> Result<(), DriverError> {
        let rail = Rail::try_from(rail).map_err(|e| {
            error!("wl2866d: rail {} > AVDD2, para err", rail);
            e
        })?;
        self.power_control(rail, RailRequest::from_raw(rail, is_power_on))
            .await
    }

    /// Switch a rail on at its default voltage.
    pub async fn power_on(&self, rail: Rail) -> Result<(), DriverError> {
        self.power_control(rail, RailRequest::On).await
    }

    /// Switch a rail off.
    pub async fn power_off(&self, rail: Rail) -> Result<(), DriverError> {
        self.power_control(rail, RailRequest::Off).await
    }

    /// Whether `rail`'s enable bit is set.
    pub async fn rail_enabled(&self, rail: Rail) -> Result<bool, DriverError> {
        let mut guard = self.inner.lock().await;
        let inner = guard
            .as_mut()
            .filter(|i| i.on)
            .ok_or(DriverError::NotPermitted)?;
        Ok(inner.read_reg(ENABLE).await? & rail.bit() != 0)
    }

    /// Chip ID read at probe, `None` before a successful probe.
    pub async fn chip_id(&self) -> Option<u8> {
        self.inner
            .lock()
            .await
            .as_ref()
            .filter(|i| i.on)
            .map(|i| i.chip_id)
    }

    /// Whether the device accepts requests.
    pub async fn is_on(&self) -> bool {
        self.inner.lock().await.as_ref().is_some_and(|i| i.on)
    }

    /// Stop accepting requests. Rails keep their current state.
    pub async fn remove(&self) {
        if let Some(inner) = self.inner.lock().await.as_mut() {
            inner.on = false;
        }
        info!("wl2866d: deregistered");
    }

    /// Drop the device state and give back the bus and enable pin.
    pub async fn release(&self) -> Option<(I, P)> {
        self.inner.lock().await.take().map(|i| (i.i2c, i.en))
    }
}
