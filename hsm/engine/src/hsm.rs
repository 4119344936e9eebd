//! Hierarchy queries and chart validation

use hsm_core::{ChartDefect, EventId, HsmError, HsmResult, History, StateChart, StateId};

use crate::{MAX_HISTORY_STATES, MAX_STATE_DEPTH};

/// A chain of states, bounded by the supported nesting depth
pub(crate) type StatePath<S> = heapless::Vec<S, MAX_STATE_DEPTH>;

/// Path from `state` up to the root, `state` first
pub(crate) fn ancestry<C: StateChart>(state: C::State) -> HsmResult<StatePath<C::State>> {
    let mut path = StatePath::new();
    let mut current = Some(state);
    while let Some(s) = current {
        path.push(s).map_err(|_| HsmError::DepthExceeded)?;
        current = C::parent(s);
    }
    Ok(path)
}

/// Check if `ancestor` is a strict ancestor of `state`
pub(crate) fn is_ancestor<C: StateChart>(ancestor: C::State, state: C::State) -> bool {
    let mut current = C::parent(state);
    let mut hops = 0;
    while let Some(s) = current {
        if s == ancestor {
            return true;
        }
        hops += 1;
        if hops >= MAX_STATE_DEPTH {
            break;
        }
        current = C::parent(s);
    }
    false
}

/// Lowest state that is `a` or an ancestor of `a`, and `b` or an ancestor of `b`
pub(crate) fn least_common_ancestor<C: StateChart>(
    a: C::State,
    b: C::State,
) -> HsmResult<Option<C::State>> {
    let path_a = ancestry::<C>(a)?;
    let path_b = ancestry::<C>(b)?;
    Ok(path_a.iter().copied().find(|s| path_b.contains(s)))
}

/// Check the structural invariants the engine relies on.
///
/// Run once by `start`; after it passes, every ancestor chain fits in a
/// [`StatePath`] and drill-down through `initial` always descends.
pub(crate) fn validate<C: StateChart>() -> Result<(), ChartDefect> {
    let root = <C::State as StateId>::ROOT;
    if root.index() != 0 {
        return Err(ChartDefect::RootNotZero);
    }
    if <C::Event as EventId>::DO.index() != 0 {
        return Err(ChartDefect::DoNotZero);
    }
    if C::parent(root).is_some() {
        return Err(ChartDefect::RootHasParent);
    }

    let mut history_states = 0;
    for state in (0..<C::State as StateId>::COUNT).filter_map(<C::State as StateId>::from_index) {
        let mut current = state;
        let mut depth = 1;
        while current != root {
            current = C::parent(current).ok_or(ChartDefect::Orphan(state.raw()))?;
            depth += 1;
            if depth > MAX_STATE_DEPTH {
                return Err(ChartDefect::TooDeep(state.raw()));
            }
        }

        if let Some(child) = C::initial(state) {
            if C::parent(child) != Some(state) {
                return Err(ChartDefect::ForeignInitial(state.raw()));
            }
        }

        if C::history(state) != History::None {
            history_states += 1;
        }
    }

    if history_states > MAX_HISTORY_STATES {
        return Err(ChartDefect::TooManyHistoryStates);
    }

    Ok(())
}
