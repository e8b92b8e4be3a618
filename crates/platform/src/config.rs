//! Board configuration constants
//!
//! Compatible strings, device-tree property names and bus addresses shared
//! by the drivers crate and host tooling. Reference these constants rather
//! than hardcoding strings at probe sites.
//!
//! # I2C Bus Assignments
//!
//! | Device   | Function              | Address |
//! |----------|-----------------------|---------|
//! | FS1599   | Speaker smart amp     | 0x34    |
//! | WL2866D  | Camera power IC (4ch) | 0x28    |

/// Compatible string of the speaker PA reset pin-control node.
pub const PA_RESET_COMPATIBLE: &str = "longcheer,lct_pinctrl";

/// Compatible string of the camera power IC node.
pub const WL2866D_COMPATIBLE: &str = "ovti,wl2866d-i2c";

/// Device-tree property names.
pub mod props {
    /// Phandle of the speaker PA reset pin-control node.
    pub const AUDIO_RESET_PIN: &str = "audio-reset-pin";
    /// Chip-enable GPIO of the camera power IC.
    pub const EN_GPIO: &str = "en-gpio";
    /// Register holding the chip ID.
    pub const ID_REG: &str = "id_reg";
    /// Accepted chip ID.
    pub const ID_VAL: &str = "id_val";
    /// Alternate accepted chip ID (second silicon revision).
    pub const ID_VAL1: &str = "id_val1";
    /// Number of (register, value) pairs in `inits`.
    pub const INIT_NUM: &str = "init_num";
    /// Flat (register, value) init table.
    pub const INITS: &str = "inits";
}

/// 7-bit I2C addresses.
pub struct I2cAddresses;

impl I2cAddresses {
    /// FS1599 speaker amplifier (ADDR pins strapped low).
    pub const FS1599_AMP: u8 = 0x34;

    /// WL2866D camera power IC (hardware-fixed).
    ///
    /// Wire address: 0x50 (write) / 0x51 (read).
    pub const WL2866D_PMIC: u8 = 0x28;
}

/// Driver version string reported at probe.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");
