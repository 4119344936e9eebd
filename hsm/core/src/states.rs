//! State handler results and the chart contract

use core::fmt;

use crate::{EventId, StateId};

/// Action executed while a transition is in flight, between the exit chain
/// and the entry chain
pub type TransitionAction<V> = fn(&mut V);

/// Result of invoking one state's handler for an event
pub enum StateReturn<S, V> {
    /// Event was handled in this state
    Handled,
    /// Event was not handled, try the parent state
    Super,
    /// Transition to a new state
    Transition(S),
    /// Transition to a new state, running an action between exit and entry
    TransitionWith(S, TransitionAction<V>),
    /// Transition to the history vertex of a composite state
    TransitionHistory(S),
}

impl<S: Copy, V> StateReturn<S, V> {
    pub const HANDLED: Self = StateReturn::Handled;
    pub const SUPER: Self = StateReturn::Super;

    /// Check if the event was consumed at this level
    pub fn is_handled(&self) -> bool {
        !matches!(self, StateReturn::Super)
    }

    /// Check if this is a transition
    pub fn is_transition(&self) -> bool {
        matches!(
            self,
            StateReturn::Transition(_)
                | StateReturn::TransitionWith(..)
                | StateReturn::TransitionHistory(_)
        )
    }

    /// Transition target, if any. For a history transition this is the
    /// composite state owning the history vertex.
    pub fn target(&self) -> Option<S> {
        match self {
            StateReturn::Transition(target)
            | StateReturn::TransitionWith(target, _)
            | StateReturn::TransitionHistory(target) => Some(*target),
            _ => None,
        }
    }
}

// Manual impls: `V` is only used behind a fn pointer and need not be Clone/Debug.
impl<S: Copy, V> Clone for StateReturn<S, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Copy, V> Copy for StateReturn<S, V> {}

impl<S: fmt::Debug, V> fmt::Debug for StateReturn<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateReturn::Handled => write!(f, "Handled"),
            StateReturn::Super => write!(f, "Super"),
            StateReturn::Transition(target) => f.debug_tuple("Transition").field(target).finish(),
            StateReturn::TransitionWith(target, _) => {
                f.debug_tuple("TransitionWith").field(target).finish()
            }
            StateReturn::TransitionHistory(target) => {
                f.debug_tuple("TransitionHistory").field(target).finish()
            }
        }
    }
}

impl<S: PartialEq, V> PartialEq for StateReturn<S, V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (StateReturn::Handled, StateReturn::Handled) => true,
            (StateReturn::Super, StateReturn::Super) => true,
            (StateReturn::Transition(a), StateReturn::Transition(b)) => a == b,
            (StateReturn::TransitionWith(a, fa), StateReturn::TransitionWith(b, fb)) => {
                a == b && (*fa as usize) == (*fb as usize)
            }
            (StateReturn::TransitionHistory(a), StateReturn::TransitionHistory(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(feature = "defmt")]
impl<S, V> defmt::Format for StateReturn<S, V> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StateReturn::Handled => defmt::write!(fmt, "Handled"),
            StateReturn::Super => defmt::write!(fmt, "Super"),
            StateReturn::Transition(_) => defmt::write!(fmt, "Transition"),
            StateReturn::TransitionWith(..) => defmt::write!(fmt, "TransitionWith"),
            StateReturn::TransitionHistory(_) => defmt::write!(fmt, "TransitionHistory"),
        }
    }
}

/// Create a transition return value
pub const fn transition<S, V>(target: S) -> StateReturn<S, V> {
    StateReturn::Transition(target)
}

/// Create a transition return value carrying a transition action
pub const fn transition_with<S, V>(target: S, action: TransitionAction<V>) -> StateReturn<S, V> {
    StateReturn::TransitionWith(target, action)
}

/// Create a transition to the history vertex of `composite`.
///
/// The machine re-enters the tracked state entered most recently inside
/// `composite`, or follows its initial transition when nothing was tracked
/// yet. A plain [`transition`] to `composite` always takes the initial
/// transition.
pub const fn transition_history<S, V>(composite: S) -> StateReturn<S, V> {
    StateReturn::TransitionHistory(composite)
}

/// History vertex of a composite state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum History {
    /// No history vertex
    #[default]
    None,
    /// Shallow history vertex: tracks the direct children, plus the children
    /// of nested composites that continue history
    Shallow,
}

/// A generated state machine: a fixed hierarchy plus its handler tables.
///
/// All functions are associated functions because the hierarchy is known at
/// build time; per-instance data lives in [`StateChart::Vars`], which the
/// engine hands to every action untouched.
pub trait StateChart {
    type State: StateId;
    type Event: EventId;
    /// User variables: inputs, outputs, timers, counters
    type Vars;

    /// Parent of `state`, `None` only for the root
    fn parent(state: Self::State) -> Option<Self::State>;

    /// Target of the initial transition inside a composite state
    fn initial(_state: Self::State) -> Option<Self::State> {
        None
    }

    fn history(_state: Self::State) -> History {
        History::None
    }

    /// Check if the children of `state` are also tracked by the history
    /// vertices of its ancestors (a history-continue vertex inside `state`)
    fn history_continue(_state: Self::State) -> bool {
        false
    }

    /// Entry action
    fn entry(_state: Self::State, _vars: &mut Self::Vars) {}

    /// Exit action
    fn exit(_state: Self::State, _vars: &mut Self::Vars) {}

    /// Event handler of `state` for `event`.
    ///
    /// Returning [`StateReturn::Super`] declines the event so that the parent
    /// gets a chance at it; an empty handler slot behaves the same way.
    fn handle(
        _state: Self::State,
        _event: Self::Event,
        _vars: &mut Self::Vars,
    ) -> StateReturn<Self::State, Self::Vars> {
        StateReturn::Super
    }
}
