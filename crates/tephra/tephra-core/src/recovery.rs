//! Initialize-time recovery: reconstruct the oldest/newest boundary from
//! generation-flag bits alone.
//!
//! Every record written since the last full wrap of the ring carries the same
//! flag value, and the flag flips exactly when the write position wraps to
//! slot 0. So at rest the ring holds a run of newer-generation flags followed
//! by a run of the previous generation, and the single transition between
//! them *is* the write target. A linear scan of `record_count` flag bits
//! recovers everything; no counters or headers are persisted.
//!
//! Fault model: at most one write was in flight when power was lost, so at
//! most one flag byte can be torn and the scan sees at most one transition.
//! Seeing more than one means the media is corrupt beyond what this design
//! guarantees, and is reported instead of guessed at.

use crate::layout::{FLAG_MASK, LogConfig};
use crate::ring::next_slot;
use tephra_nvmem::NvRead;
use thiserror::Error;
use tracing::debug;

/// Media state outside the guaranteed fault model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecoveryError {
    /// The flag scan found several generation transitions where the design
    /// allows at most one. The log cannot tell which boundary is real.
    #[error("inconsistent log: found {transitions} generation-flag transitions, expected at most one")]
    InconsistentLog { transitions: usize },
}

/// State reconstructed by the flag scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecoveredState {
    pub write_slot: u8,
    pub current_flag: u8,
    pub read_slot: u8,
    /// Records known to hold committed data. Full capacity when a boundary
    /// was found; zero for uniform (fresh or just-wrapped) media.
    pub readable: u8,
}

/// Scans the ring's flag bits and reconstructs runtime state.
///
/// O(`record_count`) byte reads, run once at initialize time. Tolerates
/// all-erased media (uniform flags, any polarity): that is the fresh case,
/// where the first write is stamped with the opposite flag value so it
/// becomes the transition point for the next recovery.
pub(crate) fn scan_flags<M: NvRead>(
    cfg: &LogConfig,
    mem: &M,
) -> Result<RecoveredState, RecoveryError> {
    let first = mem.read_byte(cfg.flag_addr(0)) & FLAG_MASK;

    let mut boundary = None;
    let mut transitions = 0usize;
    let mut prev = first;
    for slot in 1..cfg.record_count() {
        let flag = mem.read_byte(cfg.flag_addr(slot)) & FLAG_MASK;
        if flag != prev {
            transitions += 1;
            if boundary.is_none() {
                boundary = Some(slot);
            }
            prev = flag;
        }
    }

    let state = match (transitions, boundary) {
        // Uniform flags: never wrapped, or erased. Slot 0 is the write
        // target and the next write starts a distinguishable generation.
        (0, None) => RecoveredState {
            write_slot: 0,
            current_flag: first ^ FLAG_MASK,
            read_slot: 1,
            readable: 0,
        },
        // One boundary: the differing slot is the write target, and slot 0's
        // flag is the newer generation a completed write there continues.
        (1, Some(write_slot)) => RecoveredState {
            write_slot,
            current_flag: first,
            read_slot: next_slot(write_slot, cfg.record_count()),
            readable: cfg.capacity(),
        },
        (transitions, _) => return Err(RecoveryError::InconsistentLog { transitions }),
    };

    debug!(
        write_slot = state.write_slot,
        read_slot = state.read_slot,
        current_flag = state.current_flag,
        readable = state.readable,
        "recovered ring log state"
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tephra_nvmem::RamNvMem;

    fn cfg() -> LogConfig {
        LogConfig::new(4, 3, 0).unwrap()
    }

    fn set_flag(mem: &mut RamNvMem, cfg: &LogConfig, slot: u8, set: bool) {
        let addr = cfg.flag_addr(slot) as usize;
        if set {
            mem.bytes_mut()[addr] |= FLAG_MASK;
        } else {
            mem.bytes_mut()[addr] &= !FLAG_MASK;
        }
    }

    #[test]
    fn uniform_zero_flags_recover_as_fresh() {
        let cfg = cfg();
        let mem = RamNvMem::new(cfg.region_len() as usize);
        let state = scan_flags(&cfg, &mem).unwrap();
        assert_eq!(state.write_slot, 0);
        assert_eq!(state.read_slot, 1);
        assert_eq!(state.current_flag, FLAG_MASK);
        assert_eq!(state.readable, 0);
    }

    #[test]
    fn uniform_set_flags_recover_as_fresh_with_opposite_generation() {
        let cfg = cfg();
        let mut mem = RamNvMem::new(cfg.region_len() as usize);
        for slot in 0..cfg.record_count() {
            set_flag(&mut mem, &cfg, slot, true);
        }
        let state = scan_flags(&cfg, &mem).unwrap();
        assert_eq!(state.write_slot, 0);
        assert_eq!(state.current_flag, 0);
        assert_eq!(state.readable, 0);
    }

    #[test]
    fn boundary_marks_the_write_target() {
        let cfg = cfg();
        // Slots 0,1 carry the newer generation; 2,3 the older one.
        let mut mem = RamNvMem::new(cfg.region_len() as usize);
        set_flag(&mut mem, &cfg, 0, true);
        set_flag(&mut mem, &cfg, 1, true);

        let state = scan_flags(&cfg, &mem).unwrap();
        assert_eq!(state.write_slot, 2);
        assert_eq!(state.current_flag, FLAG_MASK);
        assert_eq!(state.read_slot, 3);
        assert_eq!(state.readable, cfg.capacity());
    }

    #[test]
    fn boundary_at_last_slot_wraps_read_slot_to_zero() {
        let cfg = cfg();
        let mut mem = RamNvMem::new(cfg.region_len() as usize);
        set_flag(&mut mem, &cfg, 0, true);
        set_flag(&mut mem, &cfg, 1, true);
        set_flag(&mut mem, &cfg, 2, true);

        let state = scan_flags(&cfg, &mem).unwrap();
        assert_eq!(state.write_slot, 3);
        assert_eq!(state.read_slot, 0);
    }

    #[test]
    fn multiple_transitions_are_inconsistent() {
        let cfg = cfg();
        // Pattern 1,0,1,0 holds three linear transitions.
        let mut mem = RamNvMem::new(cfg.region_len() as usize);
        set_flag(&mut mem, &cfg, 0, true);
        set_flag(&mut mem, &cfg, 2, true);

        assert_eq!(
            scan_flags(&cfg, &mem),
            Err(RecoveryError::InconsistentLog { transitions: 3 })
        );
    }

    #[test]
    fn scan_reads_flag_bits_only() {
        let cfg = cfg();
        // Payload bytes full of 0xFF must not disturb the scan; only bit 7
        // of each slot's last byte counts.
        let mut mem = RamNvMem::new(cfg.region_len() as usize);
        for b in mem.bytes_mut().iter_mut() {
            *b = 0x7F;
        }
        set_flag(&mut mem, &cfg, 0, true);

        let state = scan_flags(&cfg, &mem).unwrap();
        assert_eq!(state.write_slot, 1);
        assert_eq!(state.current_flag, FLAG_MASK);
    }
}
