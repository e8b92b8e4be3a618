//! Mock implementations for testing
//!
//! Host-side stand-ins for every bus and line the drivers touch. All of them
//! record what happened so tests can assert on exact register sequences.
//!
//! Mocks that a driver takes ownership of ([`MockRegisterFile`],
//! [`MockPinctrl`], [`MockOutputPin`]) are cheap `Clone` handles onto shared
//! state: keep one clone in the test, hand the other to the driver.

#![cfg(any(test, feature = "std"))]

extern crate std;

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::vec::Vec;

use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::error::DriverError;
use crate::pinctrl::{PinctrlHandle, PinctrlState};
use crate::regmap::RegisterMap;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // a panicking test poisons the lock; keep going so the real failure is reported
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ── MockRegmap ──────────────────────────────────────────────────────────────

/// One access recorded by [`MockRegmap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegOp {
    /// `write(reg, value)` (recorded even when it failed)
    Write(u8, u16),
    /// `read(reg)`
    Read(u8),
}

/// In-memory 16-bit register map.
///
/// Reads return the last written value unless a scripted reply is queued for
/// that register with [`MockRegmap::script_reads`].
#[derive(Debug, Default)]
pub struct MockRegmap {
    regs: BTreeMap<u8, u16>,
    scripted: BTreeMap<u8, VecDeque<u16>>,
    failing_writes: Vec<(u8, Option<u16>)>,
    failing_reads: Vec<u8>,
    log: Vec<RegOp>,
}

impl MockRegmap {
    /// Empty map; every register reads 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a register value.
    pub fn set(&mut self, reg: u8, value: u16) {
        self.regs.insert(reg, value);
    }

    /// Current value of a register.
    pub fn get(&self, reg: u8) -> u16 {
        self.regs.get(&reg).copied().unwrap_or(0)
    }

    /// Queue replies for the next reads of `reg`.
    pub fn script_reads(&mut self, reg: u8, values: &[u16]) {
        self.scripted
            .entry(reg)
            .or_default()
            .extend(values.iter().copied());
    }

    /// Make every write to `reg` fail with [`DriverError::Io`].
    pub fn fail_writes_to(&mut self, reg: u8) {
        self.failing_writes.push((reg, None));
    }

    /// Make writes of exactly `value` to `reg` fail (e.g. a reset that NACKs).
    pub fn fail_write_of(&mut self, reg: u8, value: u16) {
        self.failing_writes.push((reg, Some(value)));
    }

    /// Make every read of `reg` fail with [`DriverError::Io`].
    pub fn fail_reads_of(&mut self, reg: u8) {
        self.failing_reads.push(reg);
    }

    /// Clear all injected failures.
    pub fn heal(&mut self) {
        self.failing_writes.clear();
        self.failing_reads.clear();
    }

    /// Every access so far, in order.
    pub fn log(&self) -> &[RegOp] {
        &self.log
    }

    /// Only the writes, in order.
    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.log
            .iter()
            .filter_map(|op| match *op {
                RegOp::Write(reg, value) => Some((reg, value)),
                RegOp::Read(_) => None,
            })
            .collect()
    }

    /// Forget the access log (register contents are kept).
    pub fn clear_log(&mut self) {
        self.log.clear();
    }
}

impl RegisterMap for MockRegmap {
    async fn write(&mut self, reg: u8, value: u16) -> Result<(), DriverError> {
        self.log.push(RegOp::Write(reg, value));
        let fails = self
            .failing_writes
            .iter()
            .any(|&(r, v)| r == reg && v.map_or(true, |v| v == value));
        if fails {
            return Err(DriverError::Io);
        }
        self.regs.insert(reg, value);
        Ok(())
    }

    async fn read(&mut self, reg: u8) -> Result<u16, DriverError> {
        self.log.push(RegOp::Read(reg));
        if self.failing_reads.contains(&reg) {
            return Err(DriverError::Io);
        }
        if let Some(v) = self.scripted.get_mut(&reg).and_then(VecDeque::pop_front) {
            return Ok(v);
        }
        Ok(self.get(reg))
    }
}

// ── MockRegisterFile ────────────────────────────────────────────────────────

#[derive(Debug)]
struct RegisterFileState {
    address: u8,
    regs: [u8; 256],
    pointer: u8,
    present: bool,
    failing_writes: Vec<u8>,
    failing_reads: Vec<u8>,
    writes: Vec<(u8, u8)>,
    reads: Vec<u8>,
}

/// 8-bit register file behind an async I2C bus.
///
/// Models the usual auto-increment protocol: the first written byte sets the
/// register pointer, following bytes are stored at successive addresses, and
/// reads return bytes from the pointer onwards.
#[derive(Debug, Clone)]
pub struct MockRegisterFile {
    state: Arc<Mutex<RegisterFileState>>,
}

impl MockRegisterFile {
    /// Device answering at 7-bit `address`, all registers zero.
    pub fn new(address: u8) -> Self {
        Self {
            state: Arc::new(Mutex::new(RegisterFileState {
                address,
                regs: [0; 256],
                pointer: 0,
                present: true,
                failing_writes: Vec::new(),
                failing_reads: Vec::new(),
                writes: Vec::new(),
                reads: Vec::new(),
            })),
        }
    }

    /// Preload a register.
    pub fn set(&self, reg: u8, value: u8) {
        if let Some(slot) = lock(&self.state).regs.get_mut(usize::from(reg)) {
            *slot = value;
        }
    }

    /// Current register contents.
    pub fn get(&self, reg: u8) -> u8 {
        lock(&self.state)
            .regs
            .get(usize::from(reg))
            .copied()
            .unwrap_or(0)
    }

    /// Unplug the device: every transfer is NACKed on the address phase.
    pub fn set_present(&self, present: bool) {
        lock(&self.state).present = present;
    }

    /// NACK data writes to `reg`.
    pub fn fail_writes_to(&self, reg: u8) {
        lock(&self.state).failing_writes.push(reg);
    }

    /// Fail reads of `reg`.
    pub fn fail_reads_of(&self, reg: u8) {
        lock(&self.state).failing_reads.push(reg);
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        let mut s = lock(&self.state);
        s.failing_writes.clear();
        s.failing_reads.clear();
    }

    /// Every successful (register, value) write, in order.
    pub fn writes(&self) -> Vec<(u8, u8)> {
        lock(&self.state).writes.clone()
    }

    /// Every register read, in order.
    pub fn reads(&self) -> Vec<u8> {
        lock(&self.state).reads.clone()
    }

    /// Forget recorded writes and reads.
    pub fn clear_log(&self) {
        let mut s = lock(&self.state);
        s.writes.clear();
        s.reads.clear();
    }
}

impl ErrorType for MockRegisterFile {
    type Error = ErrorKind;
}

impl I2c for MockRegisterFile {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut s = lock(&self.state);
        if !s.present || address != s.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    let Some((&reg, payload)) = data.split_first() else {
                        continue;
                    };
                    s.pointer = reg;
                    for &byte in payload {
                        let reg = s.pointer;
                        if s.failing_writes.contains(&reg) {
                            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                        }
                        if let Some(slot) = s.regs.get_mut(usize::from(reg)) {
                            *slot = byte;
                        }
                        s.writes.push((reg, byte));
                        s.pointer = reg.wrapping_add(1);
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        let reg = s.pointer;
                        if s.failing_reads.contains(&reg) {
                            return Err(ErrorKind::Other);
                        }
                        *byte = s.regs.get(usize::from(reg)).copied().unwrap_or(0);
                        s.reads.push(reg);
                        s.pointer = reg.wrapping_add(1);
                    }
                }
            }
        }
        Ok(())
    }
}

// ── MockDelay ───────────────────────────────────────────────────────────────

/// Delay that returns immediately and records every requested wait.
#[derive(Debug, Default, Clone)]
pub struct MockDelay {
    waits_ns: Vec<u64>,
}

impl MockDelay {
    /// No waits recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded waits, in whole milliseconds.
    pub fn waits_ms(&self) -> Vec<u64> {
        self.waits_ns.iter().map(|ns| ns / 1_000_000).collect()
    }

    /// Sum of all waits in milliseconds.
    pub fn total_ms(&self) -> u64 {
        self.waits_ns.iter().sum::<u64>() / 1_000_000
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.waits_ns.push(u64::from(us).saturating_mul(1_000));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms).saturating_mul(1_000_000));
    }
}

// ── MockPinctrl ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PinctrlLog {
    selected: Vec<PinctrlState>,
    failing: bool,
}

/// Pin-control handle recording every selected state.
#[derive(Debug, Default, Clone)]
pub struct MockPinctrl {
    log: Arc<Mutex<PinctrlLog>>,
}

impl MockPinctrl {
    /// Fresh handle with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// States selected so far, in order.
    pub fn selected(&self) -> Vec<PinctrlState> {
        lock(&self.log).selected.clone()
    }

    /// Last selected state.
    pub fn current(&self) -> Option<PinctrlState> {
        lock(&self.log).selected.last().copied()
    }

    /// Make subsequent selections fail.
    pub fn set_failing(&self, failing: bool) {
        lock(&self.log).failing = failing;
    }
}

impl PinctrlHandle for MockPinctrl {
    type Error = DriverError;

    fn select_state(&mut self, state: PinctrlState) -> Result<(), Self::Error> {
        let mut log = lock(&self.log);
        if log.failing {
            return Err(DriverError::Io);
        }
        log.selected.push(state);
        Ok(())
    }
}

// ── MockOutputPin ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct PinLog {
    levels: Vec<bool>,
    failing: bool,
}

/// Output pin recording every level it was driven to.
#[derive(Debug, Default, Clone)]
pub struct MockOutputPin {
    log: Arc<Mutex<PinLog>>,
}

impl MockOutputPin {
    /// Fresh pin, never driven.
    pub fn new() -> Self {
        Self::default()
    }

    /// Levels driven so far (`true` = high).
    pub fn levels(&self) -> Vec<bool> {
        lock(&self.log).levels.clone()
    }

    /// Last driven level, `None` if never driven.
    pub fn is_high(&self) -> Option<bool> {
        lock(&self.log).levels.last().copied()
    }

    /// Make subsequent writes fail.
    pub fn set_failing(&self, failing: bool) {
        lock(&self.log).failing = failing;
    }

    fn push(&mut self, high: bool) -> Result<(), embedded_hal::digital::ErrorKind> {
        let mut log = lock(&self.log);
        if log.failing {
            return Err(embedded_hal::digital::ErrorKind::Other);
        }
        log.levels.push(high);
        Ok(())
    }
}

impl embedded_hal::digital::ErrorType for MockOutputPin {
    type Error = embedded_hal::digital::ErrorKind;
}

impl embedded_hal::digital::OutputPin for MockOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.push(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.push(true)
    }
}
