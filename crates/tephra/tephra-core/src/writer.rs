//! The non-blocking, resumable write driver.
//!
//! One append is decomposed into one device byte-write per
//! [`pump_write`](RingLog::pump_write) call, paced by the device's busy
//! flag. The driver's only resumable state is the staged copy of the record
//! and a byte offset; everything else it touches lives on the log instance.
//!
//! Commit protocol: payload bytes land first, in address order. The last
//! byte of the slot is written only at the very end, carrying the current
//! generation flag in bit 7. Until that byte lands the slot's old flag value
//! keeps the recovery scan's transition point (and therefore the excluded
//! slot) unchanged, which is what makes a torn append invisible: readers can
//! never reach the slot, and a reboot recovers the same write target.

use crate::layout::FLAG_MASK;
use crate::log::RingLog;
use crate::ring::next_slot;
use tephra_nvmem::NvMem;
use tracing::trace;

/// Largest legal `record_size`; the staging buffer is sized for it so the
/// driver never allocates.
pub(crate) const RECORD_SIZE_MAX: usize = 255;

/// Resumable progress of the in-flight append.
pub(crate) enum WriteState {
    Idle,
    /// Payload byte 0 has been issued; `staged[offset]` is the next byte to
    /// write. Only the first `record_size` bytes of `staged` are meaningful.
    Staging {
        offset: u8,
        staged: [u8; RECORD_SIZE_MAX],
    },
}

impl<M: NvMem> RingLog<M> {
    /// Drives the append state machine by at most one device byte-write.
    ///
    /// Call with `Some(record)` (at least `record_size` bytes) while the
    /// driver is idle to start an append: payload byte 0 is issued
    /// immediately and the call returns `true` ("started"). Then call with
    /// `None` repeatedly — each call writes one staged byte once the device
    /// is idle and returns `false` ("in progress"), until a call finds the
    /// driver idle again and returns `true` ("terminated").
    ///
    /// The final byte written is the commit: the record's last payload byte
    /// with bit 7 replaced by the generation flag. Within the same call the
    /// write position advances (flipping the flag on wrap) and a cursor left
    /// on the new write target is pushed one record forward.
    ///
    /// Passing `Some` while an append is in flight is undefined by contract;
    /// here it pumps exactly like `None` and the new source is ignored. The
    /// caller-facing rule stands: poll with `None` until `true` before
    /// starting the next append. There is no way to abandon a started
    /// append; see the crate docs for the recovery behaviour of torn writes.
    pub fn pump_write(&mut self, source: Option<&[u8]>) -> bool {
        if !self.mem.is_idle() {
            return false;
        }

        match self.writer {
            WriteState::Staging { .. } => {
                self.step_write();
                false
            }
            WriteState::Idle => match source {
                None => true,
                Some(record) => {
                    self.start_write(record);
                    true
                }
            },
        }
    }

    /// Stages `record` and issues its first payload byte.
    fn start_write(&mut self, record: &[u8]) {
        let size = self.cfg.record_size() as usize;
        assert!(
            record.len() >= size,
            "source buffer holds {} bytes, record_size is {size}",
            record.len()
        );

        let mut staged = [0u8; RECORD_SIZE_MAX];
        staged[..size].copy_from_slice(&record[..size]);

        self.mem
            .write_byte(self.cfg.slot_addr(self.write_slot), staged[0]);
        self.writer = WriteState::Staging { offset: 1, staged };
    }

    /// Writes the next staged byte; the last byte doubles as the commit.
    fn step_write(&mut self) {
        let (offset, byte) = match &self.writer {
            WriteState::Staging { offset, staged } => (*offset, staged[*offset as usize]),
            WriteState::Idle => return,
        };

        let last = self.cfg.record_size() - 1;
        if offset < last {
            self.mem
                .write_byte(self.cfg.slot_addr(self.write_slot) + offset as u32, byte);
            if let WriteState::Staging { offset, .. } = &mut self.writer {
                *offset += 1;
            }
            return;
        }

        // Commit: flag bit over the payload's low seven bits. Fire-and-forget,
        // so the logical advance below happens in this same call.
        self.mem.write_byte(
            self.cfg.flag_addr(self.write_slot),
            self.current_flag | (byte & !FLAG_MASK),
        );

        let advanced = next_slot(self.write_slot, self.cfg.record_count());
        if advanced == 0 {
            // Wrap event: subsequent records belong to a new generation.
            self.current_flag ^= FLAG_MASK;
        }
        if self.read_slot == advanced {
            // The cursor was resting on the slot that just became the write
            // target; keep it out of the excluded slot.
            self.read_slot = next_slot(self.read_slot, self.cfg.record_count());
        }
        self.write_slot = advanced;
        if self.readable < self.cfg.capacity() {
            self.readable += 1;
        }
        self.writer = WriteState::Idle;

        trace!(
            write_slot = self.write_slot,
            current_flag = self.current_flag,
            "append committed"
        );
    }
}
