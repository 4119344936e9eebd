//! Unit tests for hsm-engine internals

mod transition_test;

use hsm_core::{define_events, define_states, StateChart};

define_states! {
    pub(crate) enum Node {
        Root => "ROOT",
        A => "A",
        A1 => "A1",
        A2 => "A2",
        A2a => "A2a",
        B => "B",
    }
}

define_events! {
    pub(crate) enum Tick {
        Do => "DO",
    }
}

/// ROOT { A { A1, A2 { A2a } }, B }
pub(crate) struct Tree;

impl StateChart for Tree {
    type State = Node;
    type Event = Tick;
    type Vars = ();

    fn parent(state: Node) -> Option<Node> {
        match state {
            Node::Root => None,
            Node::A | Node::B => Some(Node::Root),
            Node::A1 | Node::A2 => Some(Node::A),
            Node::A2a => Some(Node::A2),
        }
    }

    fn initial(state: Node) -> Option<Node> {
        match state {
            Node::Root => Some(Node::A),
            Node::A => Some(Node::A1),
            Node::A2 => Some(Node::A2a),
            _ => None,
        }
    }
}
