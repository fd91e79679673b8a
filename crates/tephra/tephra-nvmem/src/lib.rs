//! Byte-addressable non-volatile memory abstraction for the tephra ring log.
//!
//! EEPROM-class parts share a narrow access model: reads are synchronous and
//! always succeed, writes go one byte at a time and complete asynchronously,
//! and completion is observed by polling a busy flag rather than waiting.
//! [`NvRead`] and [`NvMem`] capture exactly that model so the log core can
//! run unchanged over real hardware glue, an in-memory simulator
//! ([`RamNvMem`]) or a memory-mapped image file ([`MmapNvMem`],
//! [`MmapNvRead`]).
//!
//! The read side stands alone: recovery and cursor traversal never issue a
//! write, so readout tooling over a captured image or a write-protected
//! part implements [`NvRead`] only and the type system keeps appends out.

mod mmap_dev;
mod ram;

pub use mmap_dev::{MmapNvMem, MmapNvRead};
pub use ram::RamNvMem;

/// Synchronous byte reads from a non-volatile memory region.
///
/// Addresses are absolute within the device. Implementations may panic on
/// out-of-range addresses; the log core only produces addresses inside the
/// region described by its configuration.
pub trait NvRead {
    /// Reads one byte. Synchronous; always succeeds.
    fn read_byte(&self, addr: u32) -> u8;
}

/// Full read/write access to a non-volatile memory region.
///
/// # Write Model
///
/// [`write_byte`](NvMem::write_byte) is fire-and-forget: it issues the write
/// and returns immediately. At most one byte write may be in flight at a
/// time; callers must observe [`is_idle`](NvMem::is_idle) return `true`
/// before issuing the next write. Issuing a write while busy is a contract
/// violation and implementations are free to drop or delay it.
pub trait NvMem: NvRead {
    /// Issues an asynchronous single-byte write and returns immediately.
    /// Completion is observed later via [`is_idle`](NvMem::is_idle).
    fn write_byte(&mut self, addr: u32, value: u8);

    /// Returns `true` if no issued write is still in progress.
    ///
    /// Non-blocking. Takes `&mut self` so simulators can advance their
    /// notion of time on each poll.
    fn is_idle(&mut self) -> bool;
}
