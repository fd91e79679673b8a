//! The log instance: owned runtime state plus cursor traversal.
//!
//! One [`RingLog`] value per log, generic over the device it addresses.
//! Multiple logs over one device are independent values with disjoint
//! regions; nothing is shared behind the scenes.
//!
//! The read cursor is separate from the write position. Traversal operations
//! mutate only the cursor; the write driver mutates only the write position
//! and generation flag, except that completing an append whose new write
//! target is the cursor's slot pushes the cursor forward one step (the
//! cursor must never rest on the excluded slot).

use crate::layout::{FLAG_MASK, LogConfig};
use crate::recovery::{RecoveryError, scan_flags};
use crate::ring::{next_slot, prev_slot};
use crate::writer::WriteState;
use tephra_nvmem::NvRead;

/// A power-failure-resilient ring log over a non-volatile device.
///
/// [`init`](RingLog::init) must be called once before any other operation;
/// until then the runtime state does not reflect the media.
pub struct RingLog<M: NvRead> {
    pub(crate) cfg: LogConfig,
    pub(crate) mem: M,
    /// Slot that receives the next append. Also the oldest record, the one
    /// about to be overwritten, and the one excluded from reads.
    pub(crate) write_slot: u8,
    /// Generation flag value stamped on the next completed record.
    pub(crate) current_flag: u8,
    /// Cursor: the "current record" for traversal.
    pub(crate) read_slot: u8,
    /// Records known to hold committed data (see [`RingLog::len`]).
    pub(crate) readable: u8,
    /// Resumable progress of the in-flight append, if any.
    pub(crate) writer: WriteState,
}

impl<M: NvRead> RingLog<M> {
    /// Builds a log over `mem` with the given (already validated) geometry.
    /// The instance is not usable until [`init`](RingLog::init) has run.
    pub fn new(cfg: LogConfig, mem: M) -> Self {
        Self {
            cfg,
            mem,
            write_slot: 0,
            current_flag: FLAG_MASK,
            read_slot: 1,
            readable: 0,
            writer: WriteState::Idle,
        }
    }

    /// Recovers `write_slot`, `current_flag` and the cursor from on-media
    /// flag bits. Run once before any other operation; running it again
    /// against unchanged media reproduces the same state.
    ///
    /// Any append that was in flight in a previous life is abandoned: its
    /// slot is the recovered write target and stays excluded from reads
    /// until a later append advances past it.
    pub fn init(&mut self) -> Result<(), RecoveryError> {
        let state = scan_flags(&self.cfg, &self.mem)?;
        self.write_slot = state.write_slot;
        self.current_flag = state.current_flag;
        self.read_slot = state.read_slot;
        self.readable = state.readable;
        self.writer = WriteState::Idle;
        Ok(())
    }

    /// Moves the cursor to the oldest valid record and reads it into `dst`.
    pub fn read_first(&mut self, dst: &mut [u8]) {
        self.read_slot = next_slot(self.write_slot, self.cfg.record_count());
        self.read_record(self.read_slot, dst);
    }

    /// Moves the cursor to the newest record and reads it into `dst`.
    pub fn read_last(&mut self, dst: &mut [u8]) {
        self.read_slot = prev_slot(self.write_slot, self.cfg.record_count());
        self.read_record(self.read_slot, dst);
    }

    /// Steps the cursor forward and reads the record it lands on.
    ///
    /// Returns `false` without moving the cursor or touching `dst` when the
    /// cursor is already on the newest record (the next step would land on
    /// the excluded write target).
    pub fn read_next(&mut self, dst: &mut [u8]) -> bool {
        let candidate = next_slot(self.read_slot, self.cfg.record_count());
        if candidate == self.write_slot {
            return false;
        }
        self.read_slot = candidate;
        self.read_record(candidate, dst);
        true
    }

    /// Steps the cursor backward and reads the record it lands on.
    ///
    /// Returns `false` without moving the cursor or touching `dst` when the
    /// cursor is already on the oldest record.
    pub fn read_prev(&mut self, dst: &mut [u8]) -> bool {
        let candidate = prev_slot(self.read_slot, self.cfg.record_count());
        if candidate == self.write_slot {
            return false;
        }
        self.read_slot = candidate;
        self.read_record(candidate, dst);
        true
    }

    /// Re-reads the record under the cursor without moving it. Valid at any
    /// time after [`init`](RingLog::init).
    pub fn read_current(&mut self, dst: &mut [u8]) {
        self.read_record(self.read_slot, dst);
    }

    /// Records known to hold committed data.
    ///
    /// Full capacity once a generation boundary exists on media; zero right
    /// after a fresh-media init, growing per completed append. A power cycle
    /// landing exactly on a ring wrap leaves uniform flags, which recover as
    /// fresh: in that one case this is a lower bound, and the cursor API
    /// still reaches the records.
    pub fn len(&self) -> u8 {
        self.readable
    }

    pub fn is_empty(&self) -> bool {
        self.readable == 0
    }

    /// Usable record capacity, `record_count - 1`.
    pub fn capacity(&self) -> u8 {
        self.cfg.capacity()
    }

    /// This log's geometry.
    pub fn config(&self) -> &LogConfig {
        &self.cfg
    }

    /// Current write target (the excluded slot).
    pub fn write_slot(&self) -> u8 {
        self.write_slot
    }

    /// Current cursor position.
    pub fn read_slot(&self) -> u8 {
        self.read_slot
    }

    /// Generation flag the next completed record will carry (`0` or
    /// [`FLAG_MASK`]).
    pub fn current_flag(&self) -> u8 {
        self.current_flag
    }

    /// Borrows the underlying device.
    pub fn mem(&self) -> &M {
        &self.mem
    }

    /// Consumes the log and returns the device, e.g. to rebuild a fresh
    /// instance over the same bytes.
    pub fn into_inner(self) -> M {
        self.mem
    }

    /// Copies `record_size` bytes of `slot` into `dst`, clearing the flag
    /// bit out of the last byte.
    fn read_record(&self, slot: u8, dst: &mut [u8]) {
        let size = self.cfg.record_size() as usize;
        assert!(
            dst.len() >= size,
            "destination buffer holds {} bytes, record_size is {size}",
            dst.len()
        );

        let base = self.cfg.slot_addr(slot);
        for (i, byte) in dst.iter_mut().take(size).enumerate() {
            *byte = self.mem.read_byte(base + i as u32);
        }
        dst[size - 1] &= !FLAG_MASK;
    }
}
