//! Device-tree lookups as the drivers' probe functions use them.
//! Property tables mirror the board nodes for the camera power IC and the
//! speaker PA reset pin.

use platform::config::{props, PA_RESET_COMPATIBLE, WL2866D_COMPATIBLE};
use platform::{DeviceNode, DriverError, Property};

static PMIC_PROPS: [Property<'static>; 6] = [
    Property::new(props::EN_GPIO, &[0x1c, 54, 0]),
    Property::new(props::ID_REG, &[0x00]),
    Property::new(props::ID_VAL, &[0x00]),
    Property::new(props::ID_VAL1, &[0x01]),
    Property::new(props::INIT_NUM, &[1]),
    Property::new(props::INITS, &[0x0E, 0x00]),
];

static PA_PROPS: [Property<'static>; 1] = [Property::new(props::AUDIO_RESET_PIN, &[0x8c])];

static EMPTY_PROPS: [Property<'static>; 2] =
    [Property::flag("status-okay"), Property::new(props::EN_GPIO, &[0x1c])];

fn pmic() -> DeviceNode<'static> {
    DeviceNode::new("wl2866d@28", WL2866D_COMPATIBLE, &PMIC_PROPS)
}

#[test]
fn compatible_matches_exactly() {
    assert!(pmic().is_compatible(WL2866D_COMPATIBLE));
    assert!(!pmic().is_compatible(PA_RESET_COMPATIBLE));
    assert!(!pmic().is_compatible("ovti,wl2866d"));
}

#[test]
fn single_cell_properties() {
    let node = pmic();
    assert_eq!(node.read_u32(props::ID_VAL1), Ok(0x01));
    assert_eq!(node.read_u32(props::INIT_NUM), Ok(1));
    assert_eq!(node.read_u32("missing"), Err(DriverError::InvalidArgument));
}

#[test]
fn array_read_requires_enough_cells() {
    let node = pmic();
    let mut two = [0u32; 2];
    assert_eq!(node.read_u32_array(props::INITS, &mut two), Ok(()));
    assert_eq!(two, [0x0E, 0x00]);

    let mut four = [0u32; 4];
    assert_eq!(
        node.read_u32_array(props::INITS, &mut four),
        Err(DriverError::InvalidArgument)
    );
}

#[test]
fn gpio_line_is_second_cell() {
    assert_eq!(pmic().named_gpio(props::EN_GPIO).map(|l| l.0), Ok(54));
}

#[test]
fn short_gpio_property_is_rejected() {
    let node = DeviceNode::new("broken", WL2866D_COMPATIBLE, &EMPTY_PROPS);
    assert_eq!(
        node.named_gpio(props::EN_GPIO),
        Err(DriverError::InvalidArgument)
    );
    assert!(node.has_property("status-okay"));
    assert_eq!(node.read_u32("status-okay"), Err(DriverError::InvalidArgument));
}

#[test]
fn pa_reset_phandle_lookup() {
    let node = DeviceNode::new("lct_pinctrl", PA_RESET_COMPATIBLE, &PA_PROPS);
    assert_eq!(node.parse_phandle(props::AUDIO_RESET_PIN, 0), Some(0x8c));
    assert_eq!(node.parse_phandle(props::AUDIO_RESET_PIN, 1), None);
    assert_eq!(pmic().parse_phandle(props::AUDIO_RESET_PIN, 0), None);
}
