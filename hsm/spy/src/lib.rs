#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # HSM Spy
//!
//! Software tracing for the HSM runtime, modelled on QP/Spy.
//!
//! Records are filtered twice (a global filter by record type, a local
//! filter by machine spy id), framed with HDLC byte stuffing and a checksum,
//! and kept in a fixed ring buffer behind a `critical_section::Mutex`. The
//! host drains the buffer with [`read`] or [`get_byte`] and decodes it with
//! [`frame::frames`].
//!
//! A record's [`Payload`] is built by the caller and committed with
//! [`record`] in a single critical section, so machines tracing from
//! different threads or interrupt levels never mix their fields.
//!
//! ```rust,no_run
//! use hsm_spy::{filters, Payload, SpyRecord};
//!
//! hsm_spy::init();
//! hsm_spy::global_filter_mask(filters::SM);
//!
//! let mut payload = Payload::new();
//! payload.u8(1).u16(2).u16(3); // spy id, source state, target state
//! hsm_spy::record(SpyRecord::SmTran, 1, payload.as_bytes());
//! ```

mod buffer;
pub mod frame;
mod records;

pub use buffer::{hdlc, Payload, SpyBuffer, MAX_PAYLOAD};
pub use records::{filters, SpyRecord};

use core::cell::RefCell;
use critical_section::Mutex;

/// Capacity of the global trace buffer in bytes
pub const BUFFER_SIZE: usize = 1024;

static SPY_BUF: Mutex<RefCell<SpyBuffer<BUFFER_SIZE>>> =
    Mutex::new(RefCell::new(SpyBuffer::new()));

/// Reset the tracing system
pub fn init() {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).init();
    });
}

/// Enable or disable one record type
pub fn global_filter(record: SpyRecord, enable: bool) {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).set_global_filter(record, enable);
    });
}

/// Set global filter mask directly
pub fn global_filter_mask(mask: u128) {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).set_global_filter_mask(mask);
    });
}

/// Enable or disable one machine spy id
pub fn local_filter(spy_id: u8, enable: bool) {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).set_local_filter(spy_id, enable);
    });
}

/// Set local filter mask directly
pub fn local_filter_mask(mask: u128) {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).set_local_filter_mask(mask);
    });
}

/// Filter and commit one complete record.
/// Returns true if the record passed the filters.
pub fn record(record: SpyRecord, spy_id: u8, payload: &[u8]) -> bool {
    critical_section::with(|cs| SPY_BUF.borrow_ref_mut(cs).record(record, spy_id, payload))
}

/// Read trace data from buffer.
/// Returns the number of bytes read.
pub fn read(buf: &mut [u8]) -> usize {
    critical_section::with(|cs| SPY_BUF.borrow_ref_mut(cs).read(buf))
}

/// Pop one byte of trace output
pub fn get_byte() -> Option<u8> {
    critical_section::with(|cs| SPY_BUF.borrow_ref_mut(cs).get_byte())
}

/// Number of bytes waiting in the trace buffer
pub fn available() -> usize {
    critical_section::with(|cs| SPY_BUF.borrow_ref(cs).available())
}

/// Number of frames dropped because the buffer was full
pub fn dropped() -> u32 {
    critical_section::with(|cs| SPY_BUF.borrow_ref(cs).dropped())
}

/// Describe the target to the host (non-maskable)
pub fn target_info(target_name: &str) {
    critical_section::with(|cs| {
        SPY_BUF.borrow_ref_mut(cs).target_info(VERSION, target_name);
    });
}

/// Name a machine spy id
pub fn obj_dict(spy_id: u8, name: &str) {
    let mut payload = Payload::new();
    payload.u8(spy_id).str(name);
    record(SpyRecord::ObjDict, spy_id, payload.as_bytes());
}

/// Name a state id of the machine with `spy_id`
pub fn state_dict(spy_id: u8, state: u16, name: &str) {
    let mut payload = Payload::new();
    payload.u8(spy_id).u16(state).str(name);
    record(SpyRecord::StateDict, spy_id, payload.as_bytes());
}

/// Name an event id of the machine with `spy_id`
pub fn event_dict(spy_id: u8, event: u16, name: &str) {
    let mut payload = Payload::new();
    payload.u8(spy_id).u16(event).str(name);
    record(SpyRecord::EventDict, spy_id, payload.as_bytes());
}

/// Runtime version reported in target info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
