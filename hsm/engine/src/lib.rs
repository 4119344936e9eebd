#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # HSM Engine
//!
//! Dispatch engine for hierarchical state machines described by a
//! [`StateChart`]. Provides:
//! - Entry and exit actions, run root-to-leaf and leaf-to-root
//! - Event bubbling from the active leaf towards the root
//! - External transitions with least-common-ancestor exit/entry chains
//! - Initial transitions, and shallow history vertices with history
//!   continuation into nested composites
//! - The recurring `do` event, whose propagation ends at the first transition
//!
//! The engine never allocates: the active configuration and history records
//! live inline in the [`Machine`], so an instance can sit in a `static` or on
//! the stack. Dispatch is run-to-completion. Handlers receive the user
//! variables only, never the machine, so a reentrant dispatch cannot be
//! expressed.

use core::fmt;

use hsm_core::{
    HsmError, HsmResult, History, StateChart, StateId, StateReturn, TransitionAction,
};

pub mod config;
mod hsm;
mod spy;
mod transition;

pub use config::{MachineConfig, MachineConfigBuilder};
pub use hsm_core;

use crate::hsm::{ancestry, StatePath};
use crate::spy::{emit, Trace};
use crate::transition::TransitionPath;

#[cfg(test)]
mod tests;

/// Maximum nesting depth for hierarchical states, root included
pub const MAX_STATE_DEPTH: usize = 8;

/// Maximum number of states declaring history
pub const MAX_HISTORY_STATES: usize = 8;

/// What a single `dispatch_event` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome<S> {
    /// `state` consumed the event without a transition
    Handled { state: S },
    /// `source` took a transition to `target`; `leaf` is the new active leaf.
    /// For a history transition `target` is the restored state.
    Transitioned { source: S, target: S, leaf: S },
    /// Every state on the active chain declined the event
    Ignored,
}

impl<S> DispatchOutcome<S> {
    pub fn is_transition(&self) -> bool {
        matches!(self, DispatchOutcome::Transitioned { .. })
    }
}

#[cfg(feature = "defmt")]
impl<S: StateId> defmt::Format for DispatchOutcome<S> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            DispatchOutcome::Handled { state } => {
                defmt::write!(fmt, "Handled({=str})", state.name())
            }
            DispatchOutcome::Transitioned { source, leaf, .. } => {
                defmt::write!(fmt, "Transitioned({=str} -> {=str})", source.name(), leaf.name())
            }
            DispatchOutcome::Ignored => defmt::write!(fmt, "Ignored"),
        }
    }
}

/// A running instance of chart `C`
pub struct Machine<C: StateChart> {
    /// Active leaf state; the root until started
    state_id: C::State,
    /// Active configuration, leaf first
    active: StatePath<C::State>,
    /// Most recently entered tracked state of each history vertex
    history: heapless::LinearMap<C::State, C::State, MAX_HISTORY_STATES>,
    started: bool,
    config: MachineConfig,
    /// User variables. The engine never reads or writes them.
    pub vars: C::Vars,
}

impl<C: StateChart> Machine<C> {
    /// Construct a machine. No state action runs until [`Machine::start`].
    pub const fn new(vars: C::Vars) -> Self {
        Self::with_config(vars, MachineConfig::DEFAULT)
    }

    /// Construct a machine with an explicit configuration
    pub const fn with_config(vars: C::Vars, config: MachineConfig) -> Self {
        Self {
            state_id: <C::State as StateId>::ROOT,
            active: heapless::Vec::new(),
            history: heapless::LinearMap::new(),
            started: false,
            config,
            vars,
        }
    }

    /// Start the machine: validate the chart, then enter the root and every
    /// initial state below it down to a leaf.
    pub fn start(&mut self) -> HsmResult<()> {
        if self.started {
            return Err(HsmError::AlreadyStarted);
        }
        hsm::validate::<C>()?;

        let root = <C::State as StateId>::ROOT;
        self.enter_state(root)?;
        let leaf = self.drill_down(root)?;
        self.refresh(leaf)?;
        self.started = true;

        log::debug!("[{}] started in {}", self.config.name, leaf.name());
        emit(Trace::InitTran, self.config.spy_id, &[leaf.raw()]);
        Ok(())
    }

    /// Dispatch one event to completion.
    ///
    /// The active leaf gets the event first. A state that declines passes it
    /// to its parent; the first state that handles it, or transitions, ends
    /// the walk. No further handler runs after a transition, which for the
    /// `do` event means ancestors skip their per-tick work on that call.
    pub fn dispatch_event(&mut self, event: C::Event) -> HsmResult<DispatchOutcome<C::State>> {
        use hsm_core::EventId;

        if !self.started {
            return Err(HsmError::NotStarted);
        }
        emit(Trace::Dispatch, self.config.spy_id, &[event.raw(), self.state_id.raw()]);

        // The chain only changes through a transition, and a transition ends the walk.
        for i in 0..self.active.len() {
            let state = self.active[i];
            match C::handle(state, event, &mut self.vars) {
                StateReturn::Handled => {
                    log::trace!("[{}] {} handled {}", self.config.name, state.name(), event.name());
                    return Ok(DispatchOutcome::Handled { state });
                }
                StateReturn::Super => {
                    emit(Trace::Unhandled, self.config.spy_id, &[event.raw(), state.raw()]);
                }
                StateReturn::Transition(target) => {
                    return self.transition(event, state, target, None);
                }
                StateReturn::TransitionWith(target, action) => {
                    return self.transition(event, state, target, Some(action));
                }
                StateReturn::TransitionHistory(composite) => {
                    let target = self.history_target(composite);
                    return self.transition(event, state, target, None);
                }
            }
        }

        // An unconsumed `do` is the normal case on most ticks
        if event.is_do() {
            log::trace!("[{}] {} ignored in {}", self.config.name, event.name(), self.state_id.name());
        } else {
            log::debug!("[{}] {} ignored in {}", self.config.name, event.name(), self.state_id.name());
        }
        emit(Trace::Ignored, self.config.spy_id, &[event.raw(), self.state_id.raw()]);
        Ok(DispatchOutcome::Ignored)
    }

    /// Active leaf state
    pub fn state_id(&self) -> C::State {
        self.state_id
    }

    /// Display name of the active leaf state
    pub fn state_name(&self) -> &'static str {
        self.state_id.name()
    }

    /// Display name of a raw state id of this chart
    pub fn state_id_to_string(raw: usize) -> &'static str {
        hsm_core::state_id_to_string::<C::State>(raw)
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Check if `state` is the active leaf or one of its ancestors
    pub fn is_in(&self, state: C::State) -> bool {
        self.active.contains(&state)
    }

    /// Active configuration, leaf first. Empty until started.
    pub fn active_states(&self) -> &[C::State] {
        &self.active
    }

    /// State tracked by the history vertex of `composite`
    pub fn history_of(&self, composite: C::State) -> Option<C::State> {
        self.history.get(&composite).copied()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn vars(&self) -> &C::Vars {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut C::Vars {
        &mut self.vars
    }

    /// Emit the spy dictionaries naming this machine, its states and events
    #[cfg(feature = "spy")]
    pub fn emit_dictionaries(&self) {
        use hsm_core::EventId;

        let spy_id = self.config.spy_id;
        hsm_spy::obj_dict(spy_id, self.config.name);
        for state in (0..<C::State as StateId>::COUNT).filter_map(<C::State as StateId>::from_index) {
            hsm_spy::state_dict(spy_id, state.raw(), state.name());
        }
        for event in (0..<C::Event as EventId>::COUNT).filter_map(<C::Event as EventId>::from_index) {
            hsm_spy::event_dict(spy_id, event.raw(), event.name());
        }
    }

    fn transition(
        &mut self,
        event: C::Event,
        source: C::State,
        target: C::State,
        action: Option<TransitionAction<C::Vars>>,
    ) -> HsmResult<DispatchOutcome<C::State>> {
        use hsm_core::EventId;

        let path = TransitionPath::compute::<C>(&self.active, source, target)?;

        for &state in path.exit.iter() {
            self.exit_state(state);
        }
        if let Some(action) = action {
            action(&mut self.vars);
        }
        for &state in path.entry.iter() {
            self.enter_state(state)?;
        }
        let leaf = self.drill_down(target)?;
        self.refresh(leaf)?;

        log::debug!(
            "[{}] {}: {} -> {}",
            self.config.name,
            event.name(),
            source.name(),
            leaf.name()
        );
        emit(Trace::Tran, self.config.spy_id, &[event.raw(), source.raw(), leaf.raw()]);
        Ok(DispatchOutcome::Transitioned { source, target, leaf })
    }

    /// Resolve a transition to the history vertex of `composite`: the tracked
    /// state, else the initial child, else `composite` itself
    fn history_target(&self, composite: C::State) -> C::State {
        self.history_of(composite)
            .or_else(|| C::initial(composite))
            .unwrap_or(composite)
    }

    /// Follow initial transitions from `state` down to a leaf
    fn drill_down(&mut self, mut state: C::State) -> HsmResult<C::State> {
        for _ in 0..MAX_STATE_DEPTH {
            let Some(child) = C::initial(state) else {
                return Ok(state);
            };
            emit(Trace::Init, self.config.spy_id, &[state.raw(), child.raw()]);
            self.enter_state(child)?;
            state = child;
        }
        Err(HsmError::DepthExceeded)
    }

    fn enter_state(&mut self, state: C::State) -> HsmResult<()> {
        self.track_history(state)?;
        log::trace!("[{}] ENTRY {}", self.config.name, state.name());
        C::entry(state, &mut self.vars);
        emit(Trace::Entry, self.config.spy_id, &[state.raw()]);
        Ok(())
    }

    /// Record `state` in the history vertex of its parent and, through
    /// history-continue composites, in those of further ancestors
    fn track_history(&mut self, state: C::State) -> HsmResult<()> {
        let mut tracker = C::parent(state);
        while let Some(composite) = tracker {
            if C::history(composite) == History::Shallow {
                self.history
                    .insert(composite, state)
                    .map_err(|_| HsmError::HistoryOverflow)?;
            }
            if !C::history_continue(composite) {
                break;
            }
            tracker = C::parent(composite);
        }
        Ok(())
    }

    fn exit_state(&mut self, state: C::State) {
        log::trace!("[{}] EXIT {}", self.config.name, state.name());
        C::exit(state, &mut self.vars);
        emit(Trace::Exit, self.config.spy_id, &[state.raw()]);
    }

    /// Refresh the active-leaf snapshot after the leaf changed
    fn refresh(&mut self, leaf: C::State) -> HsmResult<()> {
        self.active = ancestry::<C>(leaf)?;
        self.state_id = leaf;
        Ok(())
    }
}

impl<C: StateChart> fmt::Debug for Machine<C>
where
    C::Vars: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("name", &self.config.name)
            .field("state_id", &self.state_id)
            .field("started", &self.started)
            .field("active", &self.active.as_slice())
            .field("vars", &self.vars)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl<C: StateChart> defmt::Format for Machine<C> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Machine({=str} in {=str})", self.config.name, self.state_id.name());
    }
}
