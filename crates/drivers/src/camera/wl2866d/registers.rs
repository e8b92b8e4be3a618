//! WL2866D register map and rail encoding
//!
//! Registers are 8-bit wide at 8-bit addresses. Each of the four LDO outputs
//! has a voltage register and one bit in the enable register.

use platform::DriverError;

/// Output discharge control.
pub const DISCHARGE: u8 = 0x02;
/// Output enable bits, one per rail.
pub const ENABLE: u8 = 0x0E;

/// DISCHARGE value that pulls disabled outputs to ground.
pub const DISCHARGE_ENABLE: u8 = 0x8F;

/// Values written to registers 0x00..=0x0F at probe.
pub const DEFAULTS: [u8; 16] = [
    0x00, 0x00, 0x8F, 0x64, 0x4B, 0x80, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Maximum (register, value) pairs in the device-tree init table.
pub const MAX_CONFIG_NUM: usize = 16;

/// Which LDO family a rail belongs to; sets its voltage step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RailKind {
    /// Digital supply: 600 mV + 6 mV per code.
    Dvdd,
    /// Analog supply: 1200 mV + 12.5 mV per code.
    Avdd,
}

impl RailKind {
    /// Lowest and highest programmable voltage in millivolts.
    #[must_use]
    pub const fn range_mv(self) -> (u32, u32) {
        match self {
            Self::Dvdd => (600, 1800),
            Self::Avdd => (1200, 4300),
        }
    }

    /// Voltage register code for `millivolts`, rounded up to the next step.
    ///
    /// # Errors
    /// [`DriverError::OutOfRange`] outside [`RailKind::range_mv`].
    pub fn encode_mv(self, millivolts: u32) -> Result<u8, DriverError> {
        let (min, max) = self.range_mv();
        if millivolts < min || millivolts > max {
            return Err(DriverError::OutOfRange);
        }
        let above = millivolts.saturating_sub(min);
        // step in tenths of a millivolt so the 12.5 mV step stays integral
        let (num, step) = match self {
            Self::Dvdd => (above, 6),
            Self::Avdd => (above.saturating_mul(10), 125),
        };
        let code = num.div_ceil(step);
        u8::try_from(code).map_err(|_| DriverError::OutOfRange)
    }

    /// Output voltage of `code` in microvolts.
    #[must_use]
    pub fn decode_uv(self, code: u8) -> u32 {
        let code = u32::from(code);
        match self {
            Self::Dvdd => code.saturating_mul(6_000).saturating_add(600_000),
            Self::Avdd => code.saturating_mul(12_500).saturating_add(1_200_000),
        }
    }
}

/// One switchable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rail {
    /// Sensor core supply 1.
    Dvdd1 = 0,
    /// Sensor core supply 2.
    Dvdd2 = 1,
    /// Sensor analog supply 1.
    Avdd1 = 2,
    /// Sensor analog supply 2.
    Avdd2 = 3,
}

impl Rail {
    /// All rails in enable-bit order.
    pub const ALL: [Self; 4] = [Self::Dvdd1, Self::Dvdd2, Self::Avdd1, Self::Avdd2];

    /// Bit in [`ENABLE`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Dvdd1 => 0x01,
            Self::Dvdd2 => 0x02,
            Self::Avdd1 => 0x04,
            Self::Avdd2 => 0x08,
        }
    }

    /// Voltage register.
    #[must_use]
    pub const fn voltage_reg(self) -> u8 {
        match self {
            Self::Dvdd1 => 0x03,
            Self::Dvdd2 => 0x04,
            Self::Avdd1 => 0x05,
            Self::Avdd2 => 0x06,
        }
    }

    /// LDO family.
    #[must_use]
    pub const fn kind(self) -> RailKind {
        match self {
            Self::Dvdd1 | Self::Dvdd2 => RailKind::Dvdd,
            Self::Avdd1 | Self::Avdd2 => RailKind::Avdd,
        }
    }

    /// Nominal voltage applied on power-on.
    #[must_use]
    pub const fn default_mv(self) -> u32 {
        match self {
            Self::Dvdd1 => 1200,
            Self::Dvdd2 => 1050,
            Self::Avdd1 | Self::Avdd2 => 2800,
        }
    }

    /// Register code of [`Rail::default_mv`].
    #[must_use]
    pub const fn default_code(self) -> u8 {
        match self {
            Self::Dvdd1 => 0x64,
            Self::Dvdd2 => 0x4B,
            Self::Avdd1 | Self::Avdd2 => 0x80,
        }
    }

    /// Name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dvdd1 => "WL2866D_DVDD1",
            Self::Dvdd2 => "WL2866D_DVDD2",
            Self::Avdd1 => "WL2866D_AVDD1",
            Self::Avdd2 => "WL2866D_AVDD2",
        }
    }
}

impl TryFrom<u32> for Rail {
    type Error = DriverError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Dvdd1),
            1 => Ok(Self::Dvdd2),
            2 => Ok(Self::Avdd1),
            3 => Ok(Self::Avdd2),
            _ => Err(DriverError::InvalidArgument),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_codes_encode_default_voltages() {
        for rail in Rail::ALL {
            assert_eq!(
                rail.kind().encode_mv(rail.default_mv()).unwrap(),
                rail.default_code(),
                "{}",
                rail.name()
            );
            assert_eq!(
                DEFAULTS[usize::from(rail.voltage_reg())],
                rail.default_code()
            );
        }
    }

    #[test]
    fn defaults_enable_discharge_and_leave_rails_off() {
        assert_eq!(DEFAULTS[usize::from(DISCHARGE)], DISCHARGE_ENABLE);
        assert_eq!(DEFAULTS[usize::from(ENABLE)], 0);
    }

    #[test]
    fn encode_rounds_up_between_steps() {
        assert_eq!(RailKind::Dvdd.encode_mv(601).unwrap(), 1);
        assert_eq!(RailKind::Dvdd.encode_mv(606).unwrap(), 1);
        assert_eq!(RailKind::Avdd.encode_mv(1201).unwrap(), 1);
        assert_eq!(RailKind::Avdd.encode_mv(1213).unwrap(), 2);
    }

    #[test]
    fn encode_rejects_out_of_range() {
        assert_eq!(RailKind::Dvdd.encode_mv(599), Err(DriverError::OutOfRange));
        assert_eq!(RailKind::Dvdd.encode_mv(1801), Err(DriverError::OutOfRange));
        assert_eq!(RailKind::Avdd.encode_mv(1199), Err(DriverError::OutOfRange));
        assert_eq!(RailKind::Avdd.encode_mv(4301), Err(DriverError::OutOfRange));
    }

    #[test]
    fn rail_index_conversion() {
        assert_eq!(Rail::try_from(2).unwrap(), Rail::Avdd1);
        assert_eq!(Rail::try_from(4), Err(DriverError::InvalidArgument));
        let bits: u8 = Rail::ALL.iter().fold(0, |acc, r| acc | r.bit());
        assert_eq!(bits, 0x0F);
    }

    proptest! {
        #[test]
        fn encoded_voltage_is_never_below_request(mv in 600u32..=1800) {
            let code = RailKind::Dvdd.encode_mv(mv).unwrap();
            let uv = RailKind::Dvdd.decode_uv(code);
            prop_assert!(uv >= mv * 1000);
            prop_assert!(uv < mv * 1000 + 6_000);
        }

        #[test]
        fn avdd_encoding_is_within_one_step(mv in 1200u32..=4300) {
            let code = RailKind::Avdd.encode_mv(mv).unwrap();
            let uv = RailKind::Avdd.decode_uv(code);
            prop_assert!(uv >= mv * 1000);
            prop_assert!(uv < mv * 1000 + 12_500);
        }
    }
}
