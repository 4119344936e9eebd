//! Handler result tests for hsm-core

use hsm_core::{transition, transition_history, transition_with, History, StateReturn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum S {
    A,
    B,
}

struct Vars {
    hits: u32,
}

fn bump(vars: &mut Vars) {
    vars.hits += 1;
}

#[test]
fn test_handled_and_super() {
    let handled: StateReturn<S, Vars> = StateReturn::HANDLED;
    let declined: StateReturn<S, Vars> = StateReturn::SUPER;

    assert!(handled.is_handled());
    assert!(!handled.is_transition());
    assert!(!declined.is_handled());
    assert_eq!(declined.target(), None);
}

#[test]
fn test_transition_helpers() {
    let plain: StateReturn<S, Vars> = transition(S::B);
    assert!(plain.is_transition());
    assert!(plain.is_handled());
    assert_eq!(plain.target(), Some(S::B));

    let action: fn(&mut Vars) = bump;
    let with_action: StateReturn<S, Vars> = transition_with(S::A, action);
    assert_eq!(with_action.target(), Some(S::A));
    assert_eq!(with_action, transition_with(S::A, action));
    assert_ne!(with_action, transition(S::A));

    if let StateReturn::TransitionWith(_, action) = with_action {
        let mut vars = Vars { hits: 0 };
        action(&mut vars);
        assert_eq!(vars.hits, 1);
    } else {
        panic!("expected a transition with action");
    }
}

#[test]
fn test_history_transition_is_distinct() {
    let resume: StateReturn<S, Vars> = transition_history(S::A);
    assert!(resume.is_transition());
    assert_eq!(resume.target(), Some(S::A));
    assert_ne!(resume, transition(S::A));
    assert_eq!(format!("{:?}", resume), "TransitionHistory(A)");
}

#[test]
fn test_debug_output() {
    let r: StateReturn<S, Vars> = transition(S::A);
    assert_eq!(format!("{:?}", r), "Transition(A)");
}

#[test]
fn test_history_default() {
    assert_eq!(History::default(), History::None);
}
