//! Power-failure-resilient ring log over byte-addressable non-volatile memory.
//!
//! A log is a ring of fixed-size records. The most significant bit of the
//! last byte of every record carries a generation flag; the single transition
//! point between flag values is all the information needed to relocate the
//! oldest/newest boundary after an uncontrolled reset. One slot (the write
//! target) is never exposed to readers, so a record torn by power loss can
//! never be observed.
//!
//! Appends are cooperative: [`RingLog::pump_write`] issues at most one byte
//! write per call and is paced by the device's own busy flag, never blocking.

mod layout;
mod log;
mod recovery;
mod ring;
mod writer;

pub use layout::{ConfigError, FLAG_MASK, LogConfig};
pub use log::RingLog;
pub use recovery::RecoveryError;
pub use ring::{next_slot, prev_slot};
