//! In-memory EEPROM simulator.
//!
//! Backs the log core's tests and benches. The interesting part is the busy
//! window: a real EEPROM cell takes milliseconds to program, during which the
//! part reports busy. [`RamNvMem`] models that as a fixed number of
//! [`is_idle`](crate::NvMem::is_idle) polls after each issued write, so a
//! test can count exactly how many pump calls a record costs.
//!
//! Issued bytes land in the backing store immediately. That matches the
//! crash model the log is built for: once a byte write has been issued to
//! the part, an uncontrolled reset does not take it back.

use crate::{NvMem, NvRead};

/// RAM-backed [`NvMem`] with a poll-counted busy window per write.
pub struct RamNvMem {
    bytes: Vec<u8>,
    /// Number of `is_idle` polls that report busy after each write.
    busy_polls: u32,
    /// Polls remaining before the in-flight write is considered complete.
    remaining: u32,
}

impl RamNvMem {
    /// Creates a zero-filled device of `len` bytes that completes writes
    /// instantly (`is_idle` never reports busy).
    pub fn new(len: usize) -> Self {
        Self::with_write_latency(len, 0)
    }

    /// Creates a zero-filled device of `len` bytes where each issued write
    /// holds `is_idle` false for the next `busy_polls` polls.
    pub fn with_write_latency(len: usize, busy_polls: u32) -> Self {
        Self {
            bytes: vec![0u8; len],
            busy_polls,
            remaining: 0,
        }
    }

    /// Builds a device over pre-existing contents, e.g. a captured image.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            busy_polls: 0,
            remaining: 0,
        }
    }

    /// Raw contents, for inspection in tests.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw contents, writable. Lets tests stage arbitrary media states
    /// (erased patterns, corrupted flags) without going through the log.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl NvRead for RamNvMem {
    fn read_byte(&self, addr: u32) -> u8 {
        self.bytes[addr as usize]
    }
}

impl NvMem for RamNvMem {
    fn write_byte(&mut self, addr: u32, value: u8) {
        self.bytes[addr as usize] = value;
        self.remaining = self.busy_polls;
    }

    fn is_idle(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_latency_is_always_idle() {
        let mut mem = RamNvMem::new(16);
        assert!(mem.is_idle());
        mem.write_byte(3, 0xAB);
        assert!(mem.is_idle());
        assert_eq!(mem.read_byte(3), 0xAB);
    }

    #[test]
    fn busy_window_counts_polls() {
        let mut mem = RamNvMem::with_write_latency(16, 2);
        assert!(mem.is_idle());

        mem.write_byte(0, 0x11);
        // The byte has landed even though the part is still busy.
        assert_eq!(mem.read_byte(0), 0x11);
        assert!(!mem.is_idle());
        assert!(!mem.is_idle());
        assert!(mem.is_idle());

        // A fresh write re-arms the window.
        mem.write_byte(1, 0x22);
        assert!(!mem.is_idle());
        assert!(!mem.is_idle());
        assert!(mem.is_idle());
    }

    #[test]
    fn from_bytes_preserves_contents() {
        let mem = RamNvMem::from_bytes(vec![9, 8, 7]);
        assert_eq!(mem.bytes(), &[9, 8, 7]);
        assert_eq!(mem.read_byte(2), 7);
    }
}
