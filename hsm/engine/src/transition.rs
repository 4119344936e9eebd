//! State transition path computation

use hsm_core::{HsmError, HsmResult, StateChart};

use crate::hsm::{ancestry, is_ancestor, least_common_ancestor, StatePath};

/// Exit and entry chains of one external transition
#[derive(Debug)]
pub(crate) struct TransitionPath<S> {
    /// States to exit (from innermost to outermost)
    pub exit: StatePath<S>,
    /// States to enter (from outermost to innermost), ending at the target
    pub entry: StatePath<S>,
}

impl<S: Copy + Eq> TransitionPath<S> {
    /// Compute the path for a transition taken by `source` while `active`
    /// (leaf first) is the active configuration.
    ///
    /// The boundary state stays active. It is the parent of `source` for a
    /// self-transition, the parent of `target` when `target` encloses
    /// `source`, and the least common ancestor otherwise. `None` means the
    /// root itself is exited and re-entered.
    pub fn compute<C: StateChart<State = S>>(active: &[S], source: S, target: S) -> HsmResult<Self> {
        let boundary = if source == target {
            C::parent(source)
        } else if is_ancestor::<C>(target, source) {
            C::parent(target)
        } else {
            least_common_ancestor::<C>(source, target)?
        };

        let mut exit = StatePath::new();
        for &state in active {
            if Some(state) == boundary {
                break;
            }
            exit.push(state).map_err(|_| HsmError::DepthExceeded)?;
        }

        let mut entry = StatePath::new();
        for state in ancestry::<C>(target)? {
            if Some(state) == boundary {
                break;
            }
            entry.push(state).map_err(|_| HsmError::DepthExceeded)?;
        }
        entry.reverse();

        Ok(Self { exit, entry })
    }
}
