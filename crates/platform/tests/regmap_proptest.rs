//! Property-based tests for bitfield descriptors.
//! Verifies invariants hold for ALL descriptors, not just the ones the drivers use.

use platform::Bitfield;

proptest::proptest! {
    /// The register address is the low byte of the descriptor.
    #[test]
    fn reg_is_low_byte(packed in 0u16..=u16::MAX) {
        let field = Bitfield::new(packed);
        assert_eq!(u16::from(field.reg()), packed & 0x00FF);
        assert_eq!(field.packed(), packed);
    }

    /// A placed value never leaks outside the field mask.
    #[test]
    fn place_stays_inside_mask(packed in 0u16..=u16::MAX, value in 0u16..=u16::MAX) {
        let field = Bitfield::new(packed);
        assert_eq!(field.place(value) & !field.mask(), 0);
    }

    /// Extract undoes place for values that fit the visible part of the field.
    #[test]
    fn extract_inverts_place(packed in 0u16..=u16::MAX, value in 0u16..=u16::MAX) {
        let field = Bitfield::new(packed);
        let fitting = value & (field.mask() >> field.pos());
        assert_eq!(field.extract(field.place(fitting)), fitting);
    }

    /// Extract ignores every bit outside the field.
    #[test]
    fn extract_ignores_neighbours(packed in 0u16..=u16::MAX, raw in 0u16..=u16::MAX) {
        let field = Bitfield::new(packed);
        assert_eq!(field.extract(raw), field.extract(raw & field.mask()));
    }

    /// Width and position stay within a 16-bit register.
    #[test]
    fn geometry_is_bounded(packed in 0u16..=u16::MAX) {
        let field = Bitfield::new(packed);
        assert!((1..=16).contains(&field.width()));
        assert!(field.pos() < 16);
    }
}

#[test]
fn top_bit_field() {
    let field = Bitfield::new(0x0F3F);
    assert_eq!(field.reg(), 0x3F);
    assert_eq!(field.width(), 1);
    assert_eq!(field.pos(), 15);
    assert_eq!(field.mask(), 0x8000);
    assert_eq!(field.place(1), 0x8000);
    assert_eq!(field.extract(0x8003), 1);
    assert_eq!(field.extract(0x7FFF), 0);
}

#[test]
fn whole_register_field() {
    let field = Bitfield::new(0xF03F);
    assert_eq!(field.reg(), 0x3F);
    assert_eq!(field.width(), 16);
    assert_eq!(field.mask(), 0xFFFF);
    assert_eq!(field.place(0x1234), 0x1234);
}

#[test]
fn single_bit_field() {
    let field = Bitfield::new(0x0711);
    assert_eq!(field.reg(), 0x11);
    assert_eq!(field.width(), 1);
    assert_eq!(field.mask(), 0x0080);
    assert_eq!(field.place(1), 0x0080);
    assert_eq!(field.extract(0x00C0), 1);
}

#[test]
fn field_running_off_the_top_is_truncated() {
    // 4 bits at position 14: only bits 14 and 15 exist
    let field = Bitfield::new(0x3E00);
    assert_eq!(field.mask(), 0xC000);
}
