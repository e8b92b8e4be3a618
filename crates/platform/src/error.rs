//! Driver error type with errno mapping.
//!
//! Every driver operation in this workspace returns [`DriverError`]. The
//! variants mirror the negative errno codes a kernel-side caller expects, so
//! [`DriverError::errno`] can hand the value straight back to a C ABI shim.

use thiserror_no_std::Error;

/// Error returned by driver operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Bus transfer failed (NACK, arbitration loss, overrun, …).
    #[error("register bus I/O error")]
    Io,
    /// Bad argument or missing configuration property.
    #[error("invalid argument")]
    InvalidArgument,
    /// Hardware did not reach the expected state within the retry budget.
    #[error("timed out waiting for device")]
    Timeout,
    /// Device absent, wrong chip ID, or bring-up failed.
    #[error("no such device")]
    NoDevice,
    /// Request exceeds a fixed buffer or register range.
    #[error("value out of range")]
    OutOfRange,
    /// Driver was never probed successfully.
    #[error("operation not permitted")]
    NotPermitted,
}

impl DriverError {
    /// Negative errno code for this error.
    #[must_use]
    pub const fn errno(self) -> i32 {
        match self {
            Self::NotPermitted => -1,
            Self::Io => -5,
            Self::NoDevice => -19,
            Self::InvalidArgument => -22,
            Self::OutOfRange => -34,
            Self::Timeout => -110,
        }
    }

    /// Map a negative errno code back to a [`DriverError`].
    ///
    /// Returns `None` for codes this crate never produces.
    #[must_use]
    pub const fn from_errno(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::NotPermitted),
            -5 => Some(Self::Io),
            -19 => Some(Self::NoDevice),
            -22 => Some(Self::InvalidArgument),
            -34 => Some(Self::OutOfRange),
            -110 => Some(Self::Timeout),
            _ => None,
        }
    }

    /// Collapse a bus error into [`DriverError::Io`].
    ///
    /// errno has no finer granularity than EIO, so callers log `kind()`
    /// before converting.
    pub fn from_bus<E: embedded_hal::i2c::Error>(_err: &E) -> Self {
        Self::Io
    }
}

/// Shorthand result alias used across driver crates.
pub type Result<T> = core::result::Result<T, DriverError>;
