//! Device-tree node view used at probe time.
//!
//! Drivers never parse a flattened device tree themselves. Board code (or a
//! test) hands them a [`DeviceNode`]: a name, a `compatible` string and a
//! static table of properties whose values are lists of 32-bit cells, the
//! same shape `of_property_read_u32_array` sees.
//!
//! ```
//! use platform::devicetree::{DeviceNode, Property};
//!
//! static PROPS: [Property<'static>; 2] = [
//!     Property::new("id_reg", &[0x00]),
//!     Property::new("en-gpio", &[1, 54, 0]),
//! ];
//! let node = DeviceNode::new("wl2866d@28", "ovti,wl2866d-i2c", &PROPS);
//! assert_eq!(node.read_u32("id_reg"), Ok(0));
//! assert_eq!(node.named_gpio("en-gpio").map(|l| l.0), Ok(54));
//! ```

use crate::error::DriverError;
use crate::gpio::GpioLine;

/// Reference to another node.
pub type Phandle = u32;

/// A single property: a name and its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property<'a> {
    name: &'a str,
    cells: &'a [u32],
}

impl<'a> Property<'a> {
    /// Creates a property with the given cells.
    pub const fn new(name: &'a str, cells: &'a [u32]) -> Self {
        Self { name, cells }
    }

    /// Creates an empty (boolean) property.
    pub const fn flag(name: &'a str) -> Self {
        Self { name, cells: &[] }
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the raw cells.
    #[must_use]
    pub fn cells(&self) -> &'a [u32] {
        self.cells
    }

    /// Interprets the property as a single `u32`.
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        self.cells.first().copied()
    }
}

/// A device node with its properties.
#[derive(Debug, Clone, Copy)]
pub struct DeviceNode<'a> {
    name: &'a str,
    compatible: &'a str,
    properties: &'a [Property<'a>],
}

impl<'a> DeviceNode<'a> {
    /// Creates a node view.
    pub const fn new(name: &'a str, compatible: &'a str, properties: &'a [Property<'a>]) -> Self {
        Self {
            name,
            compatible,
            properties,
        }
    }

    /// Returns the node name (e.g. `"wl2866d@28"`).
    #[must_use]
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Returns the `compatible` string.
    #[must_use]
    pub fn compatible(&self) -> &'a str {
        self.compatible
    }

    /// Returns `true` if the node matches `compatible`.
    #[must_use]
    pub fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible == compatible
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<Property<'a>> {
        self.properties.iter().find(|p| p.name() == name).copied()
    }

    /// Returns `true` if the property exists (with or without a value).
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Reads a single-cell property.
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if the property is missing or empty.
    pub fn read_u32(&self, name: &str) -> Result<u32, DriverError> {
        self.property(name)
            .and_then(|p| p.as_u32())
            .ok_or(DriverError::InvalidArgument)
    }

    /// Fills `out` from the first `out.len()` cells of a property.
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if the property is missing or holds
    /// fewer cells than requested.
    pub fn read_u32_array(&self, name: &str, out: &mut [u32]) -> Result<(), DriverError> {
        let cells = self
            .property(name)
            .map(|p| p.cells())
            .ok_or(DriverError::InvalidArgument)?;
        let src = cells.get(..out.len()).ok_or(DriverError::InvalidArgument)?;
        out.copy_from_slice(src);
        Ok(())
    }

    /// Returns the `index`-th phandle of a phandle-list property.
    #[must_use]
    pub fn parse_phandle(&self, name: &str, index: usize) -> Option<Phandle> {
        self.property(name)?.cells().get(index).copied()
    }

    /// Returns the line number of a `<&controller line flags>` GPIO property.
    ///
    /// # Errors
    /// [`DriverError::InvalidArgument`] if the property is missing or too short.
    pub fn named_gpio(&self, name: &str) -> Result<GpioLine, DriverError> {
        self.property(name)
            .and_then(|p| p.cells().get(1).copied())
            .map(GpioLine)
            .ok_or(DriverError::InvalidArgument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PROPS: [Property<'static>; 4] = [
        Property::new("init_num", &[2]),
        Property::new("inits", &[0x03, 0x64, 0x04, 0x4B]),
        Property::new("audio-reset-pin", &[0x8c]),
        Property::flag("status-okay"),
    ];

    fn node() -> DeviceNode<'static> {
        DeviceNode::new("node", "vendor,chip", &PROPS)
    }

    #[test]
    fn read_u32_reports_missing_as_invalid_argument() {
        assert_eq!(node().read_u32("init_num"), Ok(2));
        assert_eq!(node().read_u32("id_reg"), Err(DriverError::InvalidArgument));
        assert_eq!(node().read_u32("status-okay"), Err(DriverError::InvalidArgument));
    }

    #[test]
    fn read_u32_array_requires_enough_cells() {
        let mut two = [0u32; 2];
        assert!(node().read_u32_array("inits", &mut two).is_ok());
        assert_eq!(two, [0x03, 0x64]);

        let mut six = [0u32; 6];
        assert_eq!(
            node().read_u32_array("inits", &mut six),
            Err(DriverError::InvalidArgument)
        );
    }

    #[test]
    fn phandle_lookup() {
        assert_eq!(node().parse_phandle("audio-reset-pin", 0), Some(0x8c));
        assert_eq!(node().parse_phandle("audio-reset-pin", 1), None);
        assert_eq!(node().parse_phandle("missing", 0), None);
    }

    #[test]
    fn compatible_match() {
        assert!(node().is_compatible("vendor,chip"));
        assert!(!node().is_compatible("vendor,other"));
        assert!(node().has_property("status-okay"));
    }
}
