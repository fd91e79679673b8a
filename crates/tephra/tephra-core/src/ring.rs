//! Ring index arithmetic.
//!
//! Slots are indexed `0..record_count` and advance modulo the count. The
//! step from slot `record_count - 1` back to `0` is the wrap event: it is
//! exactly when the generation flag must flip for subsequently written
//! records, which is the single rule that lets recovery reconstruct state
//! from flag bits alone. Callers detect the wrap as `next_slot(..) == 0`;
//! keeping the step and the wrap test separate is deliberate.

/// Next slot in ring order: `(slot + 1) mod record_count`.
#[inline(always)]
pub fn next_slot(slot: u8, record_count: u8) -> u8 {
    debug_assert!(slot < record_count);
    if slot + 1 == record_count { 0 } else { slot + 1 }
}

/// Previous slot in ring order: `(slot + record_count - 1) mod record_count`.
#[inline(always)]
pub fn prev_slot(slot: u8, record_count: u8) -> u8 {
    debug_assert!(slot < record_count);
    if slot == 0 { record_count - 1 } else { slot - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_steps_and_wraps() {
        assert_eq!(next_slot(0, 4), 1);
        assert_eq!(next_slot(2, 4), 3);
        assert_eq!(next_slot(3, 4), 0);
        assert_eq!(next_slot(254, 255), 0);
    }

    #[test]
    fn prev_steps_and_wraps() {
        assert_eq!(prev_slot(3, 4), 2);
        assert_eq!(prev_slot(1, 4), 0);
        assert_eq!(prev_slot(0, 4), 3);
        assert_eq!(prev_slot(0, 255), 254);
    }

    #[test]
    fn next_and_prev_are_inverses() {
        for count in [2u8, 3, 4, 7, 255] {
            for slot in 0..count {
                assert_eq!(prev_slot(next_slot(slot, count), count), slot);
                assert_eq!(next_slot(prev_slot(slot, count), count), slot);
            }
        }
    }
}
