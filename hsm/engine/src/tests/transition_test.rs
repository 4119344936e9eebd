//! Transition path tests

use super::{Node, Tree};
use crate::hsm::ancestry;
use crate::transition::TransitionPath;

fn path(leaf: Node, source: Node, target: Node) -> (Vec<Node>, Vec<Node>) {
    let active = ancestry::<Tree>(leaf).unwrap();
    let path = TransitionPath::compute::<Tree>(&active, source, target).unwrap();
    (path.exit.to_vec(), path.entry.to_vec())
}

#[test]
fn test_sibling_leaves() {
    let (exit, entry) = path(Node::A1, Node::A1, Node::A2);
    assert_eq!(exit, vec![Node::A1]);
    assert_eq!(entry, vec![Node::A2]);
}

#[test]
fn test_across_subtrees() {
    let (exit, entry) = path(Node::A2a, Node::A2a, Node::B);
    assert_eq!(exit, vec![Node::A2a, Node::A2, Node::A]);
    assert_eq!(entry, vec![Node::B]);

    let (exit, entry) = path(Node::B, Node::B, Node::A2a);
    assert_eq!(exit, vec![Node::B]);
    assert_eq!(entry, vec![Node::A, Node::A2, Node::A2a]);
}

#[test]
fn test_self_transition_exits_and_enters() {
    let (exit, entry) = path(Node::A1, Node::A1, Node::A1);
    assert_eq!(exit, vec![Node::A1]);
    assert_eq!(entry, vec![Node::A1]);
}

#[test]
fn test_composite_self_transition_from_ancestor_handler() {
    // A handles the event while A2a is active and targets itself
    let (exit, entry) = path(Node::A2a, Node::A, Node::A);
    assert_eq!(exit, vec![Node::A2a, Node::A2, Node::A]);
    assert_eq!(entry, vec![Node::A]);
}

#[test]
fn test_target_encloses_source() {
    let (exit, entry) = path(Node::A2a, Node::A2a, Node::A);
    assert_eq!(exit, vec![Node::A2a, Node::A2, Node::A]);
    assert_eq!(entry, vec![Node::A]);
}

#[test]
fn test_target_inside_source() {
    // A handles while A1 is active, targets its own descendant A2a
    let (exit, entry) = path(Node::A1, Node::A, Node::A2a);
    assert_eq!(exit, vec![Node::A1]);
    assert_eq!(entry, vec![Node::A2, Node::A2a]);
}

#[test]
fn test_root_self_transition() {
    let (exit, entry) = path(Node::A1, Node::Root, Node::Root);
    assert_eq!(exit, vec![Node::A1, Node::A, Node::Root]);
    assert_eq!(entry, vec![Node::Root]);
}
