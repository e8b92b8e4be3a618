//! WL2866D probe configuration

use heapless::Vec;
use platform::config::{props, WL2866D_COMPATIBLE};
use platform::{DeviceNode, DriverError, GpioLine};

use super::registers::MAX_CONFIG_NUM;

/// One (register, value) pair of the init table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegValue {
    /// Register address.
    pub reg: u8,
    /// Value.
    pub val: u8,
}

/// Everything probe needs from the device tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Wl2866dConfig {
    /// Chip-enable line (`en-gpio`).
    pub en_gpio: GpioLine,
    /// Register holding the chip ID.
    pub id_reg: u8,
    /// Accepted chip ID.
    pub id_val: u8,
    /// Alternate accepted chip ID.
    pub id_val1: u8,
    /// Board-specific register writes applied after the ID check.
    pub inits: Vec<RegValue, MAX_CONFIG_NUM>,
}

fn cell_u8(value: u32, what: &str) -> Result<u8, DriverError> {
    u8::try_from(value).map_err(|_| {
        error!("wl2866d: {} {:#x} does not fit a register", what, value);
        DriverError::InvalidArgument
    })
}

impl Wl2866dConfig {
    /// Read the configuration from a `ovti,wl2866d-i2c` node.
    ///
    /// # Errors
    /// - [`DriverError::NoDevice`] if the node has another compatible string.
    /// - [`DriverError::InvalidArgument`] if a property is missing, too short,
    ///   out of range, or `init_num` exceeds the init table capacity.
    pub fn from_node(node: &DeviceNode<'_>) -> Result<Self, DriverError> {
        if !node.is_compatible(WL2866D_COMPATIBLE) {
            return Err(DriverError::NoDevice);
        }
        let en_gpio = node.named_gpio(props::EN_GPIO).map_err(|e| {
            error!("wl2866d: no en pin available");
            e
        })?;

        let read = |name: &str| {
            node.read_u32(name)
                .map_err(|e| {
                    error!("wl2866d: {} missing or invalid", name);
                    e
                })
                .and_then(|v| cell_u8(v, name))
        };
        let id_reg = read(props::ID_REG)?;
        let id_val = read(props::ID_VAL)?;
        let id_val1 = read(props::ID_VAL1)?;

        let init_num = node.read_u32(props::INIT_NUM).map_err(|e| {
            error!("wl2866d: init_num missing or invalid");
            e
        })?;
        let init_num = usize::try_from(init_num)
            .ok()
            .filter(|&n| n <= MAX_CONFIG_NUM)
            .ok_or(DriverError::InvalidArgument)?;

        let mut cells = [0u32; MAX_CONFIG_NUM * 2];
        let wanted = cells
            .get_mut(..init_num.saturating_mul(2))
            .ok_or(DriverError::InvalidArgument)?;
        node.read_u32_array(props::INITS, wanted).map_err(|e| {
            error!("wl2866d: inits missing or invalid");
            e
        })?;

        let mut inits = Vec::new();
        for pair in wanted.chunks_exact(2) {
            if let &[reg, val] = pair {
                let entry = RegValue {
                    reg: cell_u8(reg, "init reg")?,
                    val: cell_u8(val, "init val")?,
                };
                inits
                    .push(entry)
                    .map_err(|_| DriverError::InvalidArgument)?;
            }
        }

        Ok(Self {
            en_gpio,
            id_reg,
            id_val,
            id_val1,
            inits,
        })
    }

    /// Whether `chip_id` is one of the accepted IDs.
    pub fn id_matches(&self, chip_id: u8) -> bool {
        chip_id == self.id_val || chip_id == self.id_val1
    }
}
