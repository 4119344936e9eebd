#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

//! # HSM Core
//!
//! Contract types shared by every generated hierarchical state machine.
//! A concrete machine is a fixed, build-time hierarchy: its states and
//! events are closed enumerations, and its behavior is a [`StateChart`]
//! implementation. The dispatch engine that runs a chart lives in
//! `hsm-engine`; nothing in this crate allocates or keeps global state.

use core::fmt;

pub mod ids;
pub mod states;

pub use ids::*;
pub use states::*;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout the runtime
pub type HsmResult<T> = Result<T, HsmError>;

/// Structural problems found in a chart before it is started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartDefect {
    /// The root state does not use id 0
    RootNotZero,
    /// The `do` event does not use id 0
    DoNotZero,
    /// The root state declares a parent
    RootHasParent,
    /// A non-root state has no parent
    Orphan(u16),
    /// The parent chain of a state loops or is deeper than supported
    TooDeep(u16),
    /// `initial(state)` names a state that is not a direct child
    ForeignInitial(u16),
    /// More states declare history than can be tracked
    TooManyHistoryStates,
}

impl fmt::Display for ChartDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartDefect::RootNotZero => write!(f, "root state must have id 0"),
            ChartDefect::DoNotZero => write!(f, "do event must have id 0"),
            ChartDefect::RootHasParent => write!(f, "root state must not have a parent"),
            ChartDefect::Orphan(id) => write!(f, "state {} has no parent", id),
            ChartDefect::TooDeep(id) => write!(f, "state {} is nested too deeply or cyclic", id),
            ChartDefect::ForeignInitial(id) => {
                write!(f, "initial target of state {} is not its child", id)
            }
            ChartDefect::TooManyHistoryStates => write!(f, "too many history states"),
        }
    }
}

/// Error types for state machine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsmError {
    /// `dispatch_event` called before `start`
    NotStarted,
    /// `start` called more than once
    AlreadyStarted,
    /// The active configuration exceeded the fixed depth capacity
    DepthExceeded,
    /// No room left to record shallow history
    HistoryOverflow,
    /// The chart failed validation
    InvalidChart(ChartDefect),
}

impl fmt::Display for HsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HsmError::NotStarted => write!(f, "State machine not started"),
            HsmError::AlreadyStarted => write!(f, "State machine already started"),
            HsmError::DepthExceeded => write!(f, "State nesting depth exceeded"),
            HsmError::HistoryOverflow => write!(f, "History storage exhausted"),
            HsmError::InvalidChart(defect) => write!(f, "Invalid chart: {}", defect),
        }
    }
}

impl From<ChartDefect> for HsmError {
    fn from(defect: ChartDefect) -> Self {
        HsmError::InvalidChart(defect)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HsmError {}

#[cfg(feature = "defmt")]
impl defmt::Format for ChartDefect {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ChartDefect::RootNotZero => defmt::write!(fmt, "RootNotZero"),
            ChartDefect::DoNotZero => defmt::write!(fmt, "DoNotZero"),
            ChartDefect::RootHasParent => defmt::write!(fmt, "RootHasParent"),
            ChartDefect::Orphan(id) => defmt::write!(fmt, "Orphan({})", id),
            ChartDefect::TooDeep(id) => defmt::write!(fmt, "TooDeep({})", id),
            ChartDefect::ForeignInitial(id) => defmt::write!(fmt, "ForeignInitial({})", id),
            ChartDefect::TooManyHistoryStates => defmt::write!(fmt, "TooManyHistoryStates"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for HsmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            HsmError::NotStarted => defmt::write!(fmt, "NotStarted"),
            HsmError::AlreadyStarted => defmt::write!(fmt, "AlreadyStarted"),
            HsmError::DepthExceeded => defmt::write!(fmt, "DepthExceeded"),
            HsmError::HistoryOverflow => defmt::write!(fmt, "HistoryOverflow"),
            HsmError::InvalidChart(defect) => defmt::write!(fmt, "InvalidChart({})", defect),
        }
    }
}
