//! Spy record types
//!
//! Numbering follows the QP/Spy state machine group so that existing host
//! tooling can read the stream. Only the records the HSM engine produces are
//! declared.

/// Predefined record types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpyRecord {
    /// Session marker (not maskable)
    Empty = 0,

    // [1-9] State machine records
    /// A state's entry action ran
    SmStateEntry = 1,
    /// A state's exit action ran
    SmStateExit = 2,
    /// Initial transition inside a composite state was taken
    SmStateInit = 3,
    /// `start` finished the initial entry chain
    SmInitTran = 4,
    /// A transition finished
    SmTran = 6,
    /// An event reached the root without being handled
    SmIgnored = 7,
    /// An event is being dispatched
    SmDispatch = 8,
    /// A state declined an event
    SmUnhandled = 9,

    // [54-58] Dictionaries (not maskable)
    /// Machine spy id to name
    ObjDict = 54,
    /// State id to name
    StateDict = 55,
    /// Event id to name
    EventDict = 56,

    /// Target description (not maskable)
    TargetInfo = 64,
}

impl SpyRecord {
    /// Records that bypass the global filter
    pub const fn is_non_maskable(self) -> bool {
        matches!(
            self,
            SpyRecord::Empty
                | SpyRecord::ObjDict
                | SpyRecord::StateDict
                | SpyRecord::EventDict
                | SpyRecord::TargetInfo
        )
    }

    /// Decode a raw record type
    pub const fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => SpyRecord::Empty,
            1 => SpyRecord::SmStateEntry,
            2 => SpyRecord::SmStateExit,
            3 => SpyRecord::SmStateInit,
            4 => SpyRecord::SmInitTran,
            6 => SpyRecord::SmTran,
            7 => SpyRecord::SmIgnored,
            8 => SpyRecord::SmDispatch,
            9 => SpyRecord::SmUnhandled,
            54 => SpyRecord::ObjDict,
            55 => SpyRecord::StateDict,
            56 => SpyRecord::EventDict,
            64 => SpyRecord::TargetInfo,
            _ => return None,
        })
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SpyRecord {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "SpyRecord({})", *self as u8);
    }
}

/// Global filter masks
pub mod filters {
    /// Nothing enabled
    pub const NONE: u128 = 0;

    /// Everything enabled
    pub const ALL: u128 = u128::MAX;

    /// State machine group (records 1-9)
    pub const SM: u128 = 0x0000_0000_0000_0000_0000_0000_0000_03FE;

    /// Entry, exit and transition records only
    pub const SM_TRANSITIONS: u128 = (1 << 1) | (1 << 2) | (1 << 3) | (1 << 4) | (1 << 6);
}
