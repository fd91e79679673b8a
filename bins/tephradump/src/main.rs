//! Dump the records of an EEPROM image, oldest first.
//!
//! Usage: `tephradump [config.toml]`. The config names the image file and
//! the log geometry it was written with; a missing config file falls back
//! to defaults so a captured image can be inspected with zero setup.
//!
//! The image is mapped read-only: a readout tool must not be able to touch
//! the media, and [`MmapNvRead`] makes that a compile-time property.

use anyhow::Context;
use tephra_config::TephraConfig;
use tephra_core::{LogConfig, RingLog};
use tephra_nvmem::MmapNvRead;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tephra.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        TephraConfig::load(&config_path)
            .with_context(|| format!("loading config from {config_path}"))?
    } else {
        TephraConfig::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let geometry = LogConfig::new(config.record_count, config.record_size, config.base_address)
        .context("invalid log geometry in config")?;

    let mem = MmapNvRead::open(&config.image_path)
        .with_context(|| format!("opening image {}", config.image_path))?;
    anyhow::ensure!(
        mem.len() >= (geometry.base_address() + geometry.region_len()) as usize,
        "image {} is {} bytes, log region needs {}",
        config.image_path,
        mem.len(),
        geometry.base_address() + geometry.region_len(),
    );

    let mut log = RingLog::new(geometry, mem);
    log.init().context("recovering log state from image")?;

    info!(
        image = %config.image_path,
        record_count = geometry.record_count(),
        record_size = geometry.record_size(),
        base_address = geometry.base_address(),
        write_slot = log.write_slot(),
        readable = log.len(),
        "recovered ring log"
    );

    // Uniform flags recover as empty, which covers both truly erased media
    // and a power cycle that landed exactly on a ring wrap. The slot contents
    // may still be interesting, so dump them anyway but mark each line.
    let unverified = log.is_empty();
    if unverified {
        warn!("log recovered as fresh/empty; slot contents below are unverified");
    }

    let mut record = vec![0u8; geometry.record_size() as usize];
    log.read_first(&mut record);
    let mut index = 0u32;
    println!("{}", record_line(index, &record, unverified));
    while log.read_next(&mut record) {
        index += 1;
        println!("{}", record_line(index, &record, unverified));
    }

    info!(records = index + 1, "dump complete");
    Ok(())
}

fn record_line(index: u32, bytes: &[u8], unverified: bool) -> String {
    let suffix = if unverified { "  (unverified)" } else { "" };
    format!("{index:>4}  {}{suffix}", hex(bytes))
}

fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_spaces_bytes() {
        assert_eq!(hex(&[0x00, 0x7F, 0xAB]), "00 7f ab");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn committed_records_print_without_a_marker() {
        assert_eq!(record_line(3, &[0x01, 0x02], false), "   3  01 02");
    }

    #[test]
    fn empty_recovery_marks_slots_unverified() {
        assert_eq!(
            record_line(0, &[0xDE, 0xAD], true),
            "   0  de ad  (unverified)"
        );
    }
}
