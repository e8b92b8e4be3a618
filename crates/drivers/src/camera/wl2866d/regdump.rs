//! Register-dump interface
//!
//! Text protocol of the `wl2866d` character device, used for bring-up and
//! field debugging:
//!
//! ```text
//! read:  "03 64 04 4B 05 80 "      one "AA VV " record per register
//! write: "0E 0F\n02 8F"            "AA VV" records, one separator byte each
//! ```
//!
//! Reads start at a cursor moved with [`RegDump::seek`] and never advance
//! it. All digits are uppercase on output; either case is accepted on input.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::i2c::I2c;
use heapless::Vec;
use platform::DriverError;
use thiserror_no_std::Error;

use super::driver::Wl2866d;

/// Bytes in one output record, `"AA VV "`.
pub const RECORD_LEN: usize = 6;
/// Most registers one read may cover.
pub const IO_REG_LIMIT: usize = 20;
/// Most bytes one write may carry.
pub const IO_BUFFER_LIMIT: usize = 128;

const MAX_WRITE_RECORDS: usize = IO_BUFFER_LIMIT.div_ceil(RECORD_LEN);
const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Malformed write record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HexError {
    /// A byte that should be a hex digit is not.
    #[error("invalid hex digit at byte {0}")]
    BadDigit(usize),
    /// The byte between address and value is not a space.
    #[error("missing space at byte {0}")]
    MissingSpace(usize),
    /// A record ends before its value digits.
    #[error("truncated record at byte {0}")]
    Truncated(usize),
}

impl From<HexError> for DriverError {
    fn from(_: HexError) -> Self {
        DriverError::InvalidArgument
    }
}

fn hex_digit(nibble: u8) -> u8 {
    HEX.get(usize::from(nibble & 0x0F)).copied().unwrap_or(b'0')
}

fn hex_value(ch: u8, at: usize) -> Result<u8, HexError> {
    match ch {
        b'0'..=b'9' => Ok(ch.wrapping_sub(b'0')),
        b'a'..=b'f' => Ok(ch.wrapping_sub(b'a').wrapping_add(10)),
        b'A'..=b'F' => Ok(ch.wrapping_sub(b'A').wrapping_add(10)),
        _ => Err(HexError::BadDigit(at)),
    }
}

fn hex_byte(buf: &[u8], at: usize) -> Result<u8, HexError> {
    let hi = buf.get(at).ok_or(HexError::Truncated(at))?;
    let lo_at = at.wrapping_add(1);
    let lo = buf.get(lo_at).ok_or(HexError::Truncated(lo_at))?;
    Ok(hex_value(*hi, at)?.wrapping_shl(4) | hex_value(*lo, lo_at)?)
}

/// Format one register as `"AA VV "`.
#[must_use]
pub fn encode_record(reg: u8, val: u8) -> [u8; RECORD_LEN] {
    [
        hex_digit(reg.wrapping_shr(4)),
        hex_digit(reg),
        b' ',
        hex_digit(val.wrapping_shr(4)),
        hex_digit(val),
        b' ',
    ]
}

/// Iterator over the `(register, value)` records of a write buffer.
pub struct Records<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Iterator for Records<'_> {
    type Item = Result<(u8, u8), HexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let at = self.pos;
        if at >= self.buf.len() {
            return None;
        }
        self.pos = at.saturating_add(RECORD_LEN);
        // stop after the first error
        let parsed = parse_record(self.buf, at);
        if parsed.is_err() {
            self.pos = self.buf.len();
        }
        Some(parsed)
    }
}

fn parse_record(buf: &[u8], at: usize) -> Result<(u8, u8), HexError> {
    let reg = hex_byte(buf, at)?;
    let space = at.saturating_add(2);
    match buf.get(space) {
        Some(b' ') => {}
        Some(_) => return Err(HexError::MissingSpace(space)),
        None => return Err(HexError::Truncated(space)),
    }
    let val = hex_byte(buf, space.saturating_add(1))?;
    Ok((reg, val))
}

/// Parse a write buffer into `(register, value)` records.
///
/// Records are five bytes (`"AA VV"`) plus one separator byte, which the
/// last record may omit.
#[must_use]
pub fn decode(buf: &[u8]) -> Records<'_> {
    Records { buf, pos: 0 }
}

/// Where a seek offset is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Whence {
    /// From the start (resets the cursor).
    Set,
    /// Relative to the cursor.
    Current,
    /// From the end (resets the cursor).
    End,
}

/// Open register-dump session on a probed [`Wl2866d`].
pub struct RegDump<'a, M: RawMutex, I, P> {
    dev: &'a Wl2866d<M, I, P>,
}

impl<'a, M: RawMutex, I: I2c, P: OutputPin> RegDump<'a, M, I, P> {
    /// Open a session and reset the register cursor.
    ///
    /// # Errors
    /// [`DriverError::NoDevice`] if the device is not probed.
    pub async fn open(dev: &'a Wl2866d<M, I, P>) -> Result<Self, DriverError> {
        let mut guard = dev.inner.lock().await;
        let inner = guard.as_mut().filter(|i| i.on).ok_or_else(|| {
            error!("wl2866d: open failed");
            DriverError::NoDevice
        })?;
        inner.offset = 0;
        Ok(Self { dev })
    }

    /// Move the register cursor and return its new value.
    ///
    /// [`Whence::Current`] adds `offset` (wrapping within the 8-bit register
    /// space); any other origin resets the cursor to 0.
    ///
    /// # Errors
    /// [`DriverError::NoDevice`] once the device has been removed.
    pub async fn seek(&mut self, offset: i64, whence: Whence) -> Result<u8, DriverError> {
        let mut guard = self.dev.inner.lock().await;
        let inner = guard.as_mut().filter(|i| i.on).ok_or(DriverError::NoDevice)?;
        inner.offset = match whence {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Whence::Current => inner.offset.wrapping_add(offset as u8),
            Whence::Set | Whence::End => 0,
        };
        debug!("wl2866d: update read pos to {:#x}", inner.offset);
        Ok(inner.offset)
    }

    /// Read `count` registers from the cursor into `buf` as text.
    ///
    /// Returns the number of bytes written to `buf` (`count * 6`).
    ///
    /// # Errors
    /// - [`DriverError::OutOfRange`] if `count` exceeds [`IO_REG_LIMIT`] or
    ///   `buf` cannot hold the output.
    /// - Bus errors from the register reads.
    pub async fn read(&mut self, count: usize, buf: &mut [u8]) -> Result<usize, DriverError> {
        if count > IO_REG_LIMIT {
            error!("wl2866d: read count {} > {}", count, IO_REG_LIMIT);
            return Err(DriverError::OutOfRange);
        }
        let needed = count.saturating_mul(RECORD_LEN);
        let out = buf.get_mut(..needed).ok_or(DriverError::OutOfRange)?;

        let mut guard = self.dev.inner.lock().await;
        let inner = guard.as_mut().filter(|i| i.on).ok_or(DriverError::NoDevice)?;
        let mut reg = inner.offset;
        for chunk in out.chunks_exact_mut(RECORD_LEN) {
            let val = inner.read_reg(reg).await.map_err(|e| {
                error!("wl2866d: read {:#x} failed {}", reg, e.errno());
                e
            })?;
            chunk.copy_from_slice(&encode_record(reg, val));
            trace!("wl2866d: read REG[{:#x} {:#x}]", reg, val);
            reg = reg.wrapping_add(1);
        }
        Ok(needed)
    }

    /// Parse `buf` as `"AA VV"` records and write each register.
    ///
    /// The whole buffer is parsed before anything is written. Returns the
    /// number of bytes consumed.
    ///
    /// # Errors
    /// - [`DriverError::OutOfRange`] if `buf` exceeds [`IO_BUFFER_LIMIT`].
    /// - [`DriverError::InvalidArgument`] if a record is malformed.
    /// - [`DriverError::NoDevice`] if a register write fails.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize, DriverError> {
        if buf.len() > IO_BUFFER_LIMIT {
            error!("wl2866d: write size {} > {}", buf.len(), IO_BUFFER_LIMIT);
            return Err(DriverError::OutOfRange);
        }
        let mut records: Vec<(u8, u8), MAX_WRITE_RECORDS> = Vec::new();
        for record in decode(buf) {
            let record = record.map_err(|e| {
                error!("wl2866d: bad record: {}", e);
                DriverError::from(e)
            })?;
            records.push(record).map_err(|_| DriverError::OutOfRange)?;
        }

        let mut guard = self.dev.inner.lock().await;
        let inner = guard.as_mut().filter(|i| i.on).ok_or(DriverError::NoDevice)?;
        for &(reg, val) in &records {
            inner.write_reg(reg, val).await.map_err(|_| {
                error!("wl2866d: write failed");
                DriverError::NoDevice
            })?;
            trace!("wl2866d: write REG[{:#x} {:#x}]", reg, val);
        }
        Ok(buf.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::camera::wl2866d::config::Wl2866dConfig;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use platform::mocks::{MockOutputPin, MockRegisterFile};
    use platform::GpioLine;
    use proptest::prelude::*;

    type Pmic = Wl2866d<NoopRawMutex, MockRegisterFile, MockOutputPin>;

    fn config() -> Wl2866dConfig {
        Wl2866dConfig {
            en_gpio: GpioLine(54),
            id_reg: 0x00,
            id_val: 0x00,
            id_val1: 0x00,
            inits: heapless::Vec::new(),
        }
    }

    async fn probed() -> (Pmic, MockRegisterFile) {
        let pmic = Pmic::new();
        let bus = MockRegisterFile::new(0x28);
        pmic.probe(bus.clone(), 0x28, MockOutputPin::new(), config())
            .await
            .unwrap();
        bus.clear_log();
        (pmic, bus)
    }

    #[test]
    fn record_is_uppercase_with_trailing_space() {
        assert_eq!(&encode_record(0x0E, 0xAB), b"0E AB ");
    }

    #[test]
    fn decode_accepts_any_separator_and_missing_last() {
        let got: std::vec::Vec<_> = decode(b"03 64\n0e 0f").collect();
        assert_eq!(got, vec![Ok((0x03, 0x64)), Ok((0x0E, 0x0F))]);
    }

    #[test]
    fn decode_reports_errors_and_stops() {
        let got: std::vec::Vec<_> = decode(b"0G 00 01 02").collect();
        assert_eq!(got, vec![Err(HexError::BadDigit(1))]);
        let got: std::vec::Vec<_> = decode(b"01-02").collect();
        assert_eq!(got, vec![Err(HexError::MissingSpace(2))]);
        let got: std::vec::Vec<_> = decode(b"01 0").collect();
        assert_eq!(got, vec![Err(HexError::Truncated(4))]);
    }

    #[tokio::test]
    async fn open_requires_probed_device() {
        let pmic = Pmic::new();
        assert!(matches!(
            RegDump::open(&pmic).await,
            Err(DriverError::NoDevice)
        ));
    }

    #[tokio::test]
    async fn read_dumps_from_cursor_without_advancing() {
        let (pmic, _) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        assert_eq!(dump.seek(3, Whence::Current).await.unwrap(), 3);

        let mut buf = [0u8; 64];
        let n = dump.read(3, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"03 64 04 4B 05 80 ");

        let n = dump.read(1, &mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"03 64 ");
    }

    #[tokio::test]
    async fn seek_wraps_and_resets() {
        let (pmic, _) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        assert_eq!(dump.seek(0xFF, Whence::Current).await.unwrap(), 0xFF);
        assert_eq!(dump.seek(2, Whence::Current).await.unwrap(), 0x01);
        assert_eq!(dump.seek(-1, Whence::Current).await.unwrap(), 0x00);
        dump.seek(9, Whence::Current).await.unwrap();
        assert_eq!(dump.seek(5, Whence::Set).await.unwrap(), 0);
        dump.seek(7, Whence::Current).await.unwrap();
        assert_eq!(dump.seek(-3, Whence::End).await.unwrap(), 0);

        let mut buf = [0u8; 6];
        dump.read(1, &mut buf).await.unwrap();
        assert_eq!(&buf, b"00 00 ");
    }

    #[tokio::test]
    async fn session_stops_working_after_remove() {
        let (pmic, bus) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        pmic.remove().await;

        assert_eq!(dump.write(b"0E 0F ").await, Err(DriverError::NoDevice));
        let mut buf = [0u8; 6];
        assert_eq!(dump.read(1, &mut buf).await, Err(DriverError::NoDevice));
        assert_eq!(
            dump.seek(1, Whence::Current).await,
            Err(DriverError::NoDevice)
        );
        assert!(bus.writes().is_empty());
        assert!(bus.reads().is_empty());
        assert_eq!(bus.get(0x0E), 0x00);
    }

    #[tokio::test]
    async fn read_limits() {
        let (pmic, _) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        let mut buf = [0u8; 256];
        assert_eq!(
            dump.read(IO_REG_LIMIT + 1, &mut buf).await,
            Err(DriverError::OutOfRange)
        );
        let mut small = [0u8; 5];
        assert_eq!(dump.read(1, &mut small).await, Err(DriverError::OutOfRange));
        assert_eq!(dump.read(IO_REG_LIMIT, &mut buf).await.unwrap(), 120);
    }

    #[tokio::test]
    async fn read_failure_propagates() {
        let (pmic, bus) = probed().await;
        bus.fail_reads_of(0x01);
        let mut dump = RegDump::open(&pmic).await.unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(dump.read(4, &mut buf).await, Err(DriverError::Io));
    }

    #[tokio::test]
    async fn write_applies_every_record() {
        let (pmic, bus) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        assert_eq!(dump.write(b"0E 0F 02 00\n").await.unwrap(), 12);
        assert_eq!(bus.writes(), vec![(0x0E, 0x0F), (0x02, 0x00)]);
    }

    #[tokio::test]
    async fn malformed_write_touches_nothing() {
        let (pmic, bus) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        assert_eq!(
            dump.write(b"0E 0F zz 00").await,
            Err(DriverError::InvalidArgument)
        );
        assert!(bus.writes().is_empty());
    }

    #[tokio::test]
    async fn write_limits_and_bus_failure() {
        let (pmic, bus) = probed().await;
        let mut dump = RegDump::open(&pmic).await.unwrap();
        let big = [b' '; IO_BUFFER_LIMIT + 1];
        assert_eq!(dump.write(&big).await, Err(DriverError::OutOfRange));

        bus.fail_writes_to(0x0E);
        assert_eq!(dump.write(b"0E 01").await, Err(DriverError::NoDevice));
    }

    proptest! {
        #[test]
        fn encoded_records_decode_back(pairs in proptest::collection::vec(any::<(u8, u8)>(), 0..21)) {
            let mut text = std::vec::Vec::new();
            for &(r, v) in &pairs {
                text.extend_from_slice(&encode_record(r, v));
            }
            let back: std::vec::Vec<_> = decode(&text).map(Result::unwrap).collect();
            prop_assert_eq!(back, pairs);
        }

        #[test]
        fn decode_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..IO_BUFFER_LIMIT)) {
            let _ = decode(&bytes).count();
        }
    }
}
