//! Shared helpers for the tephra benches.

use tephra_core::{LogConfig, RingLog};
use tephra_nvmem::RamNvMem;

/// Fresh zero-latency log over RAM, initialized and ready to append.
pub fn fresh_ram_log(record_count: u8, record_size: u8) -> RingLog<RamNvMem> {
    let cfg = LogConfig::new(record_count, record_size, 0).expect("valid geometry");
    let mem = RamNvMem::new(cfg.region_len() as usize);
    let mut log = RingLog::new(cfg, mem);
    log.init().expect("fresh media recovers");
    log
}

/// Starts an append and pumps it until the driver reports terminated.
pub fn append_to_completion(log: &mut RingLog<RamNvMem>, record: &[u8]) {
    assert!(log.pump_write(Some(record)));
    while !log.pump_write(None) {}
}

/// Deterministic record payload for a given sequence number.
pub fn make_record(record_size: u8, seq: u32) -> Vec<u8> {
    (0..record_size)
        .map(|i| (seq as u8).wrapping_add(i))
        .collect()
}

/// Per-process temp path for a benchmark's image file.
pub fn temp_image_path(label: &str) -> String {
    let pid = std::process::id();
    format!("/tmp/tephra_bench_{label}_{pid}")
}

/// Log whose ring has wrapped at least once, so recovery sees a generation
/// boundary in the middle of the ring.
pub fn wrapped_ram_log(record_count: u8, record_size: u8) -> RingLog<RamNvMem> {
    let mut log = fresh_ram_log(record_count, record_size);
    let appends = record_count as u32 + record_count as u32 / 2;
    for seq in 0..appends {
        let record = make_record(record_size, seq);
        append_to_completion(&mut log, &record);
    }
    log
}
