//! 16-bit register map abstraction.
//!
//! Smart amplifiers such as the FS1599 expose 8-bit register addresses that
//! hold 16-bit big-endian values. Drivers talk to a [`RegisterMap`] instead of
//! the raw I2C bus so the bring-up sequences can be tested against
//! [`crate::mocks::MockRegmap`] without touching a bus.
//!
//! # Wire format ([`I2cRegmap`])
//!
//! ```text
//! write: S addr+W | reg | value[15:8] | value[7:0] | P
//! read:  S addr+W | reg | Sr addr+R | value[15:8] | value[7:0] | P
//! ```

use embedded_hal_async::i2c::I2c;

use crate::error::DriverError;

/// Register-map access for 8-bit address / 16-bit value devices.
pub trait RegisterMap {
    /// Write a full 16-bit register.
    async fn write(&mut self, reg: u8, value: u16) -> Result<(), DriverError>;

    /// Read a full 16-bit register.
    async fn read(&mut self, reg: u8) -> Result<u16, DriverError>;

    /// Read-modify-write the bits selected by `mask`.
    ///
    /// The write is skipped when the register already holds the new value.
    async fn update_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<(), DriverError> {
        let old = self.read(reg).await?;
        let new = (old & !mask) | (value & mask);
        if new == old {
            return Ok(());
        }
        self.write(reg, new).await
    }

    /// Write `value` into the bitfield described by `field`.
    async fn write_bitfield(&mut self, field: Bitfield, value: u16) -> Result<(), DriverError> {
        self.update_bits(field.reg(), field.mask(), field.place(value))
            .await
    }

    /// Read the bitfield described by `field`, right-aligned.
    async fn read_bitfield(&mut self, field: Bitfield) -> Result<u16, DriverError> {
        let raw = self.read(field.reg()).await?;
        Ok(field.extract(raw))
    }
}

/// Packed bitfield descriptor `0xLPRR`.
///
/// | Nibble/byte | Meaning                      |
/// |-------------|------------------------------|
/// | `L` (15:12) | field width minus one        |
/// | `P` (11:8)  | LSB position inside register |
/// | `RR` (7:0)  | register address             |
///
/// `0x0F3F` is bit 15 of register `0x3F` (mask `0x8000`); `0x0110` is bit 1
/// of `0x10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct Bitfield(u16);

impl Bitfield {
    /// Wrap a packed descriptor.
    #[must_use]
    pub const fn new(packed: u16) -> Self {
        Self(packed)
    }

    /// Register address.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // masked to 8 bits
    pub const fn reg(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// LSB position inside the register (0–15).
    #[must_use]
    pub const fn pos(self) -> u32 {
        ((self.0 >> 8) & 0x0F) as u32
    }

    /// Width in bits (1–16).
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)] // 0..=15 + 1 cannot overflow
    pub const fn width(self) -> u32 {
        ((self.0 >> 12) & 0x0F) as u32 + 1
    }

    /// Mask of the field, shifted into register position.
    ///
    /// Bits that would fall beyond bit 15 are dropped.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // keep low 16 bits
    pub const fn mask(self) -> u16 {
        let unshifted: u32 = match 1u32.checked_shl(self.width()) {
            Some(v) => v.wrapping_sub(1),
            None => u32::MAX,
        };
        (unshifted << self.pos()) as u16
    }

    /// Shift a right-aligned value into field position (excess bits masked off).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn place(self, value: u16) -> u16 {
        (((value as u32) << self.pos()) as u16) & self.mask()
    }

    /// Extract the field from a raw register value, right-aligned.
    #[must_use]
    pub const fn extract(self, raw: u16) -> u16 {
        (raw & self.mask()) >> self.pos()
    }

    /// Raw packed descriptor.
    #[must_use]
    pub const fn packed(self) -> u16 {
        self.0
    }
}

/// [`RegisterMap`] over an async I2C bus with big-endian 16-bit values.
pub struct I2cRegmap<I> {
    i2c: I,
    addr: u8,
}

impl<I: I2c> I2cRegmap<I> {
    /// Bind a register map to the 7-bit device `addr` on `i2c`.
    pub fn new(i2c: I, addr: u8) -> Self {
        Self { i2c, addr }
    }

    /// 7-bit device address.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> RegisterMap for I2cRegmap<I> {
    async fn write(&mut self, reg: u8, value: u16) -> Result<(), DriverError> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.addr, &[reg, hi, lo])
            .await
            .map_err(|e| DriverError::from_bus(&e))
    }

    async fn read(&mut self, reg: u8) -> Result<u16, DriverError> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(|e| DriverError::from_bus(&e))?;
        Ok(u16::from_be_bytes(buf))
    }
}
