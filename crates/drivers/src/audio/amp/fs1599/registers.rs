//! FS1599 register map
//!
//! Register addresses are 8-bit; every register holds a 16-bit value.
//! Bitfields use the packed `0xLPRR` descriptor of [`platform::Bitfield`].

use platform::Bitfield;

/// Status flags.
pub const STATUS: u8 = 0x00;
/// Device ID.
pub const DEVID: u8 = 0x01;
/// Silicon revision.
pub const REVID: u8 = 0x02;
/// Analog status.
pub const ANASTAT: u8 = 0x03;
/// Digital status.
pub const DIGSTAT: u8 = 0x04;
/// Chip initialisation state (reads 0x0003 once the internal init finished).
pub const CHIPINI: u8 = 0x0E;
/// Power control.
pub const PWRCTRL: u8 = 0x10;
/// System control.
pub const SYSCTRL: u8 = 0x11;
/// Gain control.
pub const GAINCTRL: u8 = 0x18;
/// Access key: unlocks protected registers while a key is written.
pub const ACCKEY: u8 = 0x1F;
/// Low-noise mode control.
pub const LNMCTRL: u8 = 0x3F;
/// Boost gain control.
pub const BSGCTRL: u8 = 0xBC;
/// Analog control.
pub const ANACTRL: u8 = 0xC0;

/// PWRCTRL.PWDN: power down.
pub const PWDN: Bitfield = Bitfield::new(0x0010);
/// PWRCTRL.I2CR: I2C soft reset.
pub const I2CR: Bitfield = Bitfield::new(0x0110);
/// SYSCTRL.CPEN: charge pump enable.
pub const CPEN: Bitfield = Bitfield::new(0x0611);
/// SYSCTRL.AMPEN: amplifier enable.
pub const AMPEN: Bitfield = Bitfield::new(0x0711);
/// LNMCTRL.LNMMODE: low-noise mode enable, bit 15 of LNMCTRL.
pub const LNMMODE: Bitfield = Bitfield::new(0x0F3F);

/// PWRCTRL value that triggers a soft reset. The chip NACKs this write.
pub const PWRCTRL_RESET: u16 = 0x0002;
/// PWRCTRL value: powered down, out of reset.
pub const PWRCTRL_POWER_DOWN: u16 = 0x0001;
/// PWRCTRL value: powered up.
pub const PWRCTRL_POWER_UP: u16 = 0x0000;

/// CHIPINI readbacks that mean "init finished" (either byte order).
pub const CHIPINI_DONE: [u16; 2] = [0x0003, 0x0300];

/// ACCKEY unlocking the register table area.
pub const ACCKEY_TABLE: u16 = 0x0091;
/// ACCKEY unlocking analog control during start-up.
pub const ACCKEY_STARTUP: u16 = 0xCA91;
/// ACCKEY value that locks protected registers again.
pub const ACCKEY_LOCK: u16 = 0x0000;

/// ANACTRL value held while the amplifier powers up.
pub const ANACTRL_STARTUP: u16 = 0x0010;
/// ANACTRL value in normal operation.
pub const ANACTRL_NORMAL: u16 = 0x0000;

/// SYSCTRL value enabling charge pump and amplifier.
pub const SYSCTRL_AMP_ON: u16 = 0x00C0;
/// SYSCTRL value with everything off.
pub const SYSCTRL_AMP_OFF: u16 = 0x0000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysctrl_amp_on_sets_cpen_and_ampen() {
        assert_eq!(SYSCTRL_AMP_ON, CPEN.mask() | AMPEN.mask());
        assert_eq!(CPEN.reg(), SYSCTRL);
        assert_eq!(AMPEN.reg(), SYSCTRL);
    }

    #[test]
    fn pwrctrl_fields_live_in_pwrctrl() {
        assert_eq!(PWDN.reg(), PWRCTRL);
        assert_eq!(I2CR.reg(), PWRCTRL);
        assert_eq!(PWRCTRL_RESET, I2CR.mask());
        assert_eq!(PWRCTRL_POWER_DOWN, PWDN.mask());
    }

    #[test]
    fn lnmmode_is_top_bit_of_lnmctrl() {
        assert_eq!(LNMMODE.reg(), LNMCTRL);
        assert_eq!(LNMMODE.pos(), 15);
        assert_eq!(LNMMODE.width(), 1);
        assert_eq!(LNMMODE.mask(), 0x8000);
    }
}
