//! Nested scroll policy
//!
//! A scrollable nested inside another scrollable on the same axis shares the
//! gesture stream with it. For each direction the child picks a
//! [`NestedScrollMode`]; the resulting split of work between child and
//! parent is the pure table in [`dispatch`].

use std::sync::{Arc, Mutex, Weak};

use arkflow_core::geometry::Axis;

use super::content::ScrollSource;

/// How a scrollable shares a delta with its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NestedScrollMode {
    /// Never involve the parent
    #[default]
    SelfOnly,
    /// Scroll self first, hand the overshoot to the parent
    SelfFirst,
    /// Offer the delta to the parent first, scroll self with the rest
    ParentFirst,
    /// Parent and self both scroll by the delta
    Parallel,
}

/// Per-direction nested scroll policy
///
/// `forward` governs negative deltas (content moving toward its end),
/// `backward` governs positive deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NestedScrollOptions {
    pub forward: NestedScrollMode,
    pub backward: NestedScrollMode,
}

impl NestedScrollOptions {
    pub const fn new(forward: NestedScrollMode, backward: NestedScrollMode) -> Self {
        Self { forward, backward }
    }

    /// Same mode in both directions
    pub const fn both(mode: NestedScrollMode) -> Self {
        Self::new(mode, mode)
    }

    /// Mode governing a delta (or velocity) with this sign
    pub fn mode_for(&self, delta: f32) -> NestedScrollMode {
        if delta < 0.0 {
            self.forward
        } else {
            self.backward
        }
    }

    /// True when either direction may involve the parent
    pub fn need_parent(&self) -> bool {
        self.forward != NestedScrollMode::SelfOnly || self.backward != NestedScrollMode::SelfOnly
    }
}

/// Why `handle_scroll` is being called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NestedState {
    /// Directly from this node's own gesture or animation
    #[default]
    Gesture,
    /// A child relays part of its delta
    ChildScroll,
    /// A child relays an overshoot it could not take
    ChildOverScroll,
}

/// Outcome of a nested scroll step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollResult {
    /// Portion of the delta nobody consumed
    pub remain: f32,
    /// A hard boundary was hit somewhere along the chain
    pub reach_edge: bool,
}

impl ScrollResult {
    pub const fn new(remain: f32, reach_edge: bool) -> Self {
        Self { remain, reach_edge }
    }

    /// Fully consumed without touching an edge
    pub const CONSUMED: ScrollResult = ScrollResult::new(0.0, false);
}

/// What a node does with a delta, given its mode and why it was called
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestedAction {
    /// Resolve locally, never consult the parent
    SelfOnly,
    /// Consume locally, offer the overshoot to the parent
    SelfFirst,
    /// Offer the whole delta to the parent, consume the remainder locally
    ParentFirst,
    /// Offer to the parent and consume locally in the same call
    Parallel,
    /// Let the parent take a child's overshoot before absorbing it locally
    RelayOverScroll,
    /// Absorb a child's overshoot with the local edge effect, relaying it
    /// only when there is no edge effect
    AbsorbOverScroll,
}

/// The nested scroll decision table
///
/// A node without a reachable parent always resolves locally. A node
/// relaying for a child in parallel mode never re-enters its parent, which
/// would otherwise bounce the same delta around the chain.
pub fn dispatch(mode: NestedScrollMode, state: NestedState, has_parent: bool) -> NestedAction {
    use NestedScrollMode as M;
    use NestedState as S;

    if !has_parent {
        return NestedAction::SelfOnly;
    }
    match (mode, state) {
        (M::SelfOnly, _) => NestedAction::SelfOnly,
        (M::SelfFirst, S::ChildOverScroll) => NestedAction::RelayOverScroll,
        (M::SelfFirst, _) => NestedAction::SelfFirst,
        (M::ParentFirst | M::Parallel, S::ChildOverScroll) => NestedAction::AbsorbOverScroll,
        (M::ParentFirst, _) => NestedAction::ParentFirst,
        (M::Parallel, S::ChildScroll) => NestedAction::SelfOnly,
        (M::Parallel, S::Gesture) => NestedAction::Parallel,
    }
}

/// Capability of a scroll container that children can delegate to
///
/// Implemented by every scrollable pattern. Parents are referenced through
/// [`ParentRef`] and only ever called by their children, never the other
/// way around.
pub trait NestableScrollContainer: Send {
    fn axis(&self) -> Axis;

    /// Consume what it can of `offset`, reporting the rest
    fn handle_scroll(&mut self, offset: f32, source: ScrollSource, state: NestedState) -> ScrollResult;

    /// Whether some node accepted a fling with this velocity
    fn handle_scroll_velocity(&mut self, velocity: f32) -> bool;

    fn on_scroll_start_recursive(&mut self, position: f32);

    fn on_scroll_end_recursive(&mut self);
}

/// Non-owning reference to a nested scroll parent
pub type ParentRef = Weak<Mutex<dyn NestableScrollContainer>>;

/// Shared handle to a nested scroll container
pub type SharedContainer = Arc<Mutex<dyn NestableScrollContainer>>;
