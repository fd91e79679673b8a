//! On-media layout of a record ring.
//!
//! The log occupies `record_count × record_size` contiguous bytes starting
//! at `base_address`. This layout is bit-exact and must be preserved for
//! media compatibility with images written by other builds.
//!
//! ```text
//! base_address
//! │
//! ├────────────── slot 0 ──────────────┬────── slot 1 ──────┬─ ...
//! │ payload[0] .. payload[size-2] │ F7 │                    │
//! └───────────────────────────────┴────┴────────────────────┴─ ...
//!                                   ▲
//!                                   └─ last byte: bit 7 = generation flag,
//!                                      bits 6..0 = payload
//! ```
//!
//! Consequence of the packed flag: bit 7 of the caller's last payload byte
//! is overwritten by the flag on write and masked off on read. Callers must
//! treat that bit as unavailable.

use thiserror::Error;

/// Most significant bit of a slot's last byte: the generation flag.
pub const FLAG_MASK: u8 = 0x80;

/// Smallest legal value for both `record_count` and `record_size`.
///
/// A one-slot ring has no readable records (the write target is excluded),
/// and a one-byte record is all flag byte.
pub const RING_PARAM_MIN: u8 = 2;

/// Rejected log geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("record_count {0} out of range 2..=255")]
    RecordCount(u8),

    #[error("record_size {0} out of range 2..=255")]
    RecordSize(u8),
}

/// Geometry of one log instance: slot count, slot size and the base address
/// of its region within the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LogConfig {
    record_count: u8,
    record_size: u8,
    base_address: u32,
}

impl LogConfig {
    /// Validates and builds a log geometry.
    ///
    /// Both `record_count` and `record_size` must be in `2..=255`; anything
    /// else is a construction-time contract violation and is rejected here
    /// rather than surfacing as undefined addressing at runtime.
    pub fn new(record_count: u8, record_size: u8, base_address: u32) -> Result<Self, ConfigError> {
        if record_count < RING_PARAM_MIN {
            return Err(ConfigError::RecordCount(record_count));
        }
        if record_size < RING_PARAM_MIN {
            return Err(ConfigError::RecordSize(record_size));
        }

        Ok(Self {
            record_count,
            record_size,
            base_address,
        })
    }

    /// Number of physical slots in the ring.
    #[inline(always)]
    pub fn record_count(&self) -> u8 {
        self.record_count
    }

    /// Bytes per slot, including the flag byte.
    #[inline(always)]
    pub fn record_size(&self) -> u8 {
        self.record_size
    }

    /// Start of the region within the device.
    #[inline(always)]
    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    /// Usable record capacity: one slot is permanently excluded from reads
    /// to guard against partial writes.
    #[inline(always)]
    pub fn capacity(&self) -> u8 {
        self.record_count - 1
    }

    /// Total bytes the ring occupies on the device.
    #[inline(always)]
    pub fn region_len(&self) -> u32 {
        self.record_count as u32 * self.record_size as u32
    }

    /// Address of the first byte of `slot`.
    #[inline(always)]
    pub fn slot_addr(&self, slot: u8) -> u32 {
        debug_assert!(slot < self.record_count);
        self.base_address + slot as u32 * self.record_size as u32
    }

    /// Address of `slot`'s last byte, the one carrying the generation flag.
    #[inline(always)]
    pub fn flag_addr(&self, slot: u8) -> u32 {
        self.slot_addr(slot) + self.record_size as u32 - 1
    }
}
