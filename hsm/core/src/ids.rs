//! State and event identifiers
//!
//! Every machine declares two closed enumerations: its states (id 0 is the
//! root) and its events (id 0 is the recurring `do` event). The traits below
//! are what the engine needs from them; the `define_*` macros generate both
//! the enum and the trait impl from a name table.

use core::fmt;
use core::hash::Hash;

/// Name returned for ids outside the declared set
pub const UNKNOWN_NAME: &str = "?";

/// Identifier of a state in a fixed hierarchy
pub trait StateId: Copy + Eq + Hash + fmt::Debug + 'static {
    /// The root state, always id 0
    const ROOT: Self;
    /// Number of declared states
    const COUNT: usize;

    /// Raw id of this state
    fn index(self) -> usize;

    /// Look up a state by raw id
    fn from_index(index: usize) -> Option<Self>;

    /// Fixed display name
    fn name(self) -> &'static str;

    /// Raw id narrowed for trace records
    fn raw(self) -> u16 {
        self.index() as u16
    }
}

/// Identifier of an event kind
pub trait EventId: Copy + Eq + Hash + fmt::Debug + 'static {
    /// The recurring `do` event, always id 0
    const DO: Self;
    /// Number of declared events
    const COUNT: usize;

    fn index(self) -> usize;

    fn from_index(index: usize) -> Option<Self>;

    fn name(self) -> &'static str;

    fn raw(self) -> u16 {
        self.index() as u16
    }

    /// Check if this is the `do` event
    fn is_do(self) -> bool {
        self == Self::DO
    }
}

/// Convert a raw state id to its display name.
///
/// Never fails: ids outside the declared set map to [`UNKNOWN_NAME`].
pub fn state_id_to_string<S: StateId>(raw: usize) -> &'static str {
    S::from_index(raw).map_or(UNKNOWN_NAME, S::name)
}

/// Convert a raw event id to its display name
pub fn event_id_to_string<E: EventId>(raw: usize) -> &'static str {
    E::from_index(raw).map_or(UNKNOWN_NAME, E::name)
}

/// Declare a state enumeration.
///
/// The first variant becomes the root (id 0); the rest are numbered in
/// declaration order.
///
/// ```
/// hsm_core::define_states! {
///     pub enum LampState {
///         Root => "ROOT",
///         Off => "OFF",
///         On => "ON",
///     }
/// }
///
/// use hsm_core::StateId;
/// assert_eq!(LampState::On.index(), 2);
/// assert_eq!(LampState::On.name(), "ON");
/// ```
#[macro_export]
macro_rules! define_states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $root:ident => $root_name:literal
            $(, $variant:ident => $variant_name:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        $vis enum $name {
            $root,
            $($variant,)*
        }

        impl $name {
            /// Every declared state, indexed by id
            pub const ALL: &'static [$name] = &[$name::$root, $($name::$variant,)*];
        }

        impl $crate::StateId for $name {
            const ROOT: Self = $name::$root;
            const COUNT: usize = $name::ALL.len();

            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                $name::ALL.get(index).copied()
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$root => $root_name,
                    $($name::$variant => $variant_name,)*
                }
            }
        }
    };
}

/// Declare an event enumeration. The first variant is the `do` event (id 0).
#[macro_export]
macro_rules! define_events {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $do_event:ident => $do_name:literal
            $(, $variant:ident => $variant_name:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        $vis enum $name {
            $do_event,
            $($variant,)*
        }

        impl $name {
            /// Every declared event, indexed by id
            pub const ALL: &'static [$name] = &[$name::$do_event, $($name::$variant,)*];
        }

        impl $crate::EventId for $name {
            const DO: Self = $name::$do_event;
            const COUNT: usize = $name::ALL.len();

            fn index(self) -> usize {
                self as usize
            }

            fn from_index(index: usize) -> Option<Self> {
                $name::ALL.get(index).copied()
            }

            fn name(self) -> &'static str {
                match self {
                    $name::$do_event => $do_name,
                    $($name::$variant => $variant_name,)*
                }
            }
        }
    };
}
