//! State transitions for interaction states
//!
//! Interaction states are small enums. Each one maps an incoming event id to
//! the next state (or `None` when the event is ignored in that state), which
//! keeps the transition table data-like and easy to test exhaustively.
//!
//! ```rust
//! use arkflow_core::fsm::{StateTransitions, Transitioned};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum Press {
//!     #[default]
//!     Up,
//!     Down,
//! }
//!
//! impl StateTransitions for Press {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Press::Up, 1) => Some(Press::Down),
//!             (Press::Down, 2) => Some(Press::Up),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = Press::Up;
//! assert!(state.apply(1).changed());
//! assert_eq!(state, Press::Down);
//! assert!(!state.apply(1).changed());
//! ```

use std::fmt::Debug;
use std::hash::Hash;

use crate::events::EventType;

/// Trait for state enums that react to events
pub trait StateTransitions: Clone + Copy + PartialEq + Eq + Hash + Debug + 'static {
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply `event` in place, returning what happened
    fn apply(&mut self, event: EventType) -> Transitioned<Self> {
        match self.on_event(event) {
            Some(next) if next != *self => {
                let from = *self;
                *self = next;
                tracing::trace!(?from, to = ?next, event, "state transition");
                Transitioned::Changed { from, to: next }
            }
            _ => Transitioned::Unchanged(*self),
        }
    }
}

/// Outcome of [`StateTransitions::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transitioned<S> {
    Changed { from: S, to: S },
    Unchanged(S),
}

impl<S: Copy> Transitioned<S> {
    pub fn changed(&self) -> bool {
        matches!(self, Transitioned::Changed { .. })
    }

    /// State before the event was applied
    pub fn from(&self) -> S {
        match self {
            Transitioned::Changed { from, .. } => *from,
            Transitioned::Unchanged(state) => *state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTER: EventType = 1;
    const LEAVE: EventType = 2;
    const LOCK: EventType = 3;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    enum Door {
        #[default]
        Closed,
        Open,
        Locked,
    }

    impl StateTransitions for Door {
        fn on_event(&self, event: EventType) -> Option<Self> {
            match (self, event) {
                (Door::Closed, ENTER) => Some(Door::Open),
                (Door::Open, LEAVE) => Some(Door::Closed),
                (Door::Closed, LOCK) => Some(Door::Locked),
                // self-loop is reported as unchanged
                (Door::Locked, LOCK) => Some(Door::Locked),
                _ => None,
            }
        }
    }

    #[test]
    fn test_apply_transitions() {
        let mut door = Door::default();

        let result = door.apply(ENTER);
        assert!(result.changed());
        assert_eq!(result.from(), Door::Closed);
        assert_eq!(door, Door::Open);

        door.apply(LEAVE);
        assert_eq!(door, Door::Closed);
    }

    #[test]
    fn test_ignored_and_self_loop_events() {
        let mut door = Door::Open;
        assert!(!door.apply(LOCK).changed());
        assert_eq!(door, Door::Open);

        let mut locked = Door::Locked;
        assert_eq!(locked.apply(LOCK), Transitioned::Unchanged(Door::Locked));
    }
}
