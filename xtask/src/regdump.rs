//! xtask regdump / regwrite: host side of the WL2866D register-dump node.
//!
//! `regdump` decodes what `cat` on the node printed; `regwrite` builds the
//! record string the node expects and writes it in a single call.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use drivers::camera::wl2866d::regdump::{decode, encode_record, IO_BUFFER_LIMIT};
use drivers::camera::wl2866d::registers::ENABLE;
use drivers::camera::Rail;

/// Entry point for `xtask regdump`.
pub fn dump(file: Option<&Path>, rails: bool) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let regs = parse_dump(&raw)?;
    for (reg, val) in &regs {
        println!("  {:#04x}  {:#04x}  {:08b}", reg, val, val);
    }
    tracing::debug!("decoded {} registers", regs.len());

    if rails {
        println!();
        for line in rail_report(&regs) {
            println!("  {line}");
        }
    }
    Ok(())
}

/// Entry point for `xtask regwrite`.
pub fn write(node: &Path, pairs: &[String]) -> Result<()> {
    let payload = encode_pairs(pairs)?;

    if node.as_os_str() == "-" {
        println!("{}", String::from_utf8_lossy(&payload));
        return Ok(());
    }

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .open(node)
        .with_context(|| format!("Failed to open {}", node.display()))?;
    // the node parses one write() as a whole; never split the payload
    let written = file
        .write(&payload)
        .with_context(|| format!("Write to {} failed", node.display()))?;
    if written != payload.len() {
        bail!("short write: {written} of {} bytes", payload.len());
    }

    println!(
        "{}",
        format!("  ✓ {} register(s) written to {}", pairs.len(), node.display()).green()
    );
    Ok(())
}

/// Decode a dump into register → value, last record wins.
pub(crate) fn parse_dump(raw: &[u8]) -> Result<BTreeMap<u8, u8>> {
    let text = std::str::from_utf8(raw).context("dump is not ASCII text")?;
    let mut regs = BTreeMap::new();
    for record in decode(text.trim_end().as_bytes()) {
        let (reg, val) = record.map_err(|e| anyhow::anyhow!("malformed dump: {e}"))?;
        regs.insert(reg, val);
    }
    Ok(regs)
}

/// Parse `AA=VV` pairs and encode them as one write payload.
pub(crate) fn encode_pairs(pairs: &[String]) -> Result<Vec<u8>> {
    let mut payload = Vec::with_capacity(pairs.len().saturating_mul(6));
    for pair in pairs {
        let (reg, val) = parse_pair(pair)?;
        payload.extend_from_slice(&encode_record(reg, val));
    }
    if payload.len() > IO_BUFFER_LIMIT {
        bail!(
            "{} bytes exceed the {IO_BUFFER_LIMIT}-byte write limit; split the pairs",
            payload.len()
        );
    }
    Ok(payload)
}

fn parse_pair(pair: &str) -> Result<(u8, u8)> {
    let (reg, val) = pair
        .split_once('=')
        .with_context(|| format!("expected AA=VV, got {pair:?}"))?;
    let parse = |s: &str| {
        u8::from_str_radix(s.trim_start_matches("0x"), 16)
            .with_context(|| format!("{s:?} is not a hex byte"))
    };
    Ok((parse(reg)?, parse(val)?))
}

#[allow(clippy::arithmetic_side_effects)] // constant divisors
fn rail_report(regs: &BTreeMap<u8, u8>) -> Vec<String> {
    let enable = regs.get(&ENABLE).copied();
    Rail::ALL
        .iter()
        .map(|&rail| {
            let state = match enable {
                Some(e) if e & rail.bit() != 0 => "on".green().to_string(),
                Some(_) => "off".dimmed().to_string(),
                None => "?".yellow().to_string(),
            };
            let voltage = regs.get(&rail.voltage_reg()).map_or_else(
                || "not in dump".to_string(),
                |&code| {
                    let uv = rail.kind().decode_uv(code);
                    format!("{}.{:03} V", uv / 1_000_000, (uv / 1_000) % 1_000)
                },
            );
            format!("{:<14} {:<4} {}", rail.name(), state, voltage)
        })
        .collect()
}
