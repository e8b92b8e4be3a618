//! Speaker PA reset line
//!
//! The external speaker power amplifier has its reset line on a pin-control
//! node referenced by the `audio-reset-pin` phandle. The sound core gates
//! the PA by calling [`SpeakerPaReset::set`]; the line is switched to its
//! "active" state to enable the PA and to "sleep" to disable it.
//!
//! Boards without the phandle still probe; `set` is then a no-op.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use platform::config::{props, DRIVER_VERSION, PA_RESET_COMPATIBLE};
use platform::{DeviceNode, DriverError, Phandle, PinctrlHandle, PinctrlState};

/// Probed device: the resolved reset line, if the board has one.
struct PaResetDevice<P> {
    reset_pin: Option<P>,
}

/// Speaker PA reset controller.
///
/// Lives in a `static` and is shared by reference; every call runs under
/// the internal mutex.
pub struct SpeakerPaReset<M: RawMutex, P> {
    dev: Mutex<M, Option<PaResetDevice<P>>>,
}

impl<M: RawMutex, P: PinctrlHandle> Default for SpeakerPaReset<M, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, P: PinctrlHandle> SpeakerPaReset<M, P> {
    /// Unprobed controller.
    pub const fn new() -> Self {
        Self {
            dev: Mutex::new(None),
        }
    }

    /// Probe from a device-tree node.
    ///
    /// `resolve` turns the `audio-reset-pin` phandle into a pin-control
    /// handle; it is not called when the property is absent.
    ///
    /// # Errors
    /// [`DriverError::NoDevice`] if `node` is not a PA reset node, or
    /// whatever `resolve` returns.
    pub async fn probe<F>(&self, node: &DeviceNode<'_>, resolve: F) -> Result<(), DriverError>
    where
        F: FnOnce(Phandle) -> Result<P, DriverError>,
    {
        debug!("lct_pinctrl version: {}", DRIVER_VERSION);
        if !node.is_compatible(PA_RESET_COMPATIBLE) {
            return Err(DriverError::NoDevice);
        }
        let reset_pin = match node.parse_phandle(props::AUDIO_RESET_PIN, 0) {
            Some(phandle) => Some(resolve(phandle).map_err(|e| {
                error!("lct_pinctrl: cannot resolve {}: {}", props::AUDIO_RESET_PIN, e.errno());
                e
            })?),
            None => {
                debug!(
                    "lct_pinctrl: property {} not detected in node {}",
                    props::AUDIO_RESET_PIN,
                    node.name()
                );
                None
            }
        };
        self.probe_with(reset_pin).await;
        Ok(())
    }

    /// Probe with an already resolved line (`None` for boards without one).
    pub async fn probe_with(&self, reset_pin: Option<P>) {
        *self.dev.lock().await = Some(PaResetDevice { reset_pin });
    }

    /// Enable or disable the external speaker PA.
    ///
    /// # Errors
    /// - [`DriverError::InvalidArgument`] if the controller is not probed.
    /// - [`DriverError::Io`] if the pin state cannot be applied.
    pub async fn set(&self, enable: bool) -> Result<(), DriverError> {
        debug!(
            "{} external speaker PA",
            if enable { "Enable" } else { "Disable" }
        );
        let mut guard = self.dev.lock().await;
        let dev = guard.as_mut().ok_or(DriverError::InvalidArgument)?;
        let Some(pin) = dev.reset_pin.as_mut() else {
            return Ok(());
        };
        let state = PinctrlState::from_enable(enable);
        pin.select_state(state).map_err(|_| {
            error!("lct_pinctrl: select {} state failed", state.name());
            DriverError::Io
        })?;
        trace!("lct_pinctrl: on={}", enable);
        Ok(())
    }

    /// Whether `probe` has completed and `remove` has not been called since.
    pub async fn is_probed(&self) -> bool {
        self.dev.lock().await.is_some()
    }

    /// Tear down. Subsequent `set` calls fail until the next probe.
    ///
    /// Returns the reset line, if one was resolved.
    pub async fn remove(&self) -> Option<P> {
        self.dev.lock().await.take().and_then(|d| d.reset_pin)
    }
}
