//! Trace output of the engine.
//!
//! Compiles to nothing unless the `spy` feature is enabled.

/// Engine trace points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trace {
    Entry,
    Exit,
    Init,
    InitTran,
    Tran,
    Ignored,
    Dispatch,
    Unhandled,
}

#[cfg(feature = "spy")]
impl Trace {
    fn record(self) -> hsm_spy::SpyRecord {
        use hsm_spy::SpyRecord;
        match self {
            Trace::Entry => SpyRecord::SmStateEntry,
            Trace::Exit => SpyRecord::SmStateExit,
            Trace::Init => SpyRecord::SmStateInit,
            Trace::InitTran => SpyRecord::SmInitTran,
            Trace::Tran => SpyRecord::SmTran,
            Trace::Ignored => SpyRecord::SmIgnored,
            Trace::Dispatch => SpyRecord::SmDispatch,
            Trace::Unhandled => SpyRecord::SmUnhandled,
        }
    }
}

/// Emit one record: spy id followed by the raw ids in `fields`
#[cfg(feature = "spy")]
pub(crate) fn emit(trace: Trace, spy_id: u8, fields: &[u16]) {
    let mut payload = hsm_spy::Payload::new();
    payload.u8(spy_id);
    for &field in fields {
        payload.u16(field);
    }
    hsm_spy::record(trace.record(), spy_id, payload.as_bytes());
}

#[cfg(not(feature = "spy"))]
#[inline(always)]
pub(crate) fn emit(_trace: Trace, _spy_id: u8, _fields: &[u16]) {}
