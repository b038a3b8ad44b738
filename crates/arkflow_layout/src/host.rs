//! Host frame node
//!
//! The render-tree side of a pattern. Patterns never own their host; they
//! keep a `Weak<FrameNode>` and upgrade it before every use, so a pattern
//! whose node was removed from the tree quietly stops doing anything.
//!
//! The node records what the patterns asked of it (dirty flags, render
//! properties, accessibility events) for the renderer to pick up.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use arkflow_core::geometry::Offset;

/// Dirty flag bits passed to [`FrameNode::mark_dirty_node`]
pub type DirtyFlags = u32;

/// Size may have changed; measure again
pub const PROPERTY_UPDATE_MEASURE: DirtyFlags = 1 << 0;
/// Children moved; lay out again
pub const PROPERTY_UPDATE_LAYOUT: DirtyFlags = 1 << 1;
/// Only visual properties changed; repaint
pub const PROPERTY_UPDATE_RENDER: DirtyFlags = 1 << 2;

/// Accessibility events kept for the renderer; older ones are dropped
pub const MAX_PENDING_ACCESSIBILITY_EVENTS: usize = 64;

/// Accessibility events emitted by patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessibilityEventType {
    ScrollStart,
    ScrollEnd,
    Click,
    SelectionChange,
}

/// Visual properties the render context applies to the node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    pub opacity: u8,
    pub offset: Offset,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            opacity: u8::MAX,
            offset: Offset::ZERO,
        }
    }
}

#[derive(Debug, Default)]
struct NodeState {
    render: RenderContext,
    accessibility: VecDeque<AccessibilityEventType>,
}

/// A node in the host render tree
#[derive(Debug)]
pub struct FrameNode {
    id: u64,
    tag: &'static str,
    dirty: AtomicU32,
    state: Mutex<NodeState>,
}

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl FrameNode {
    pub fn new(tag: &'static str) -> Arc<Self> {
        Arc::new(Self {
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
            tag,
            dirty: AtomicU32::new(0),
            state: Mutex::new(NodeState::default()),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Request re-measure, re-layout or repaint
    pub fn mark_dirty_node(&self, flags: DirtyFlags) {
        self.dirty.fetch_or(flags, Ordering::AcqRel);
    }

    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty.load(Ordering::Acquire)
    }

    /// Read and clear the dirty flags (done by the pipeline each frame)
    pub fn take_dirty_flags(&self) -> DirtyFlags {
        self.dirty.swap(0, Ordering::AcqRel)
    }

    /// Queue an event; only the latest [`MAX_PENDING_ACCESSIBILITY_EVENTS`] are kept
    pub fn on_accessibility_event(&self, event: AccessibilityEventType) {
        tracing::trace!(node = self.id, tag = self.tag, ?event, "accessibility event");
        if let Ok(mut state) = self.state.lock() {
            if state.accessibility.len() == MAX_PENDING_ACCESSIBILITY_EVENTS {
                state.accessibility.pop_front();
            }
            state.accessibility.push_back(event);
        }
    }

    /// Drain queued accessibility events, oldest first
    pub fn take_accessibility_events(&self) -> Vec<AccessibilityEventType> {
        self.state
            .lock()
            .map(|mut s| s.accessibility.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn update_opacity(&self, opacity: u8) {
        if let Ok(mut state) = self.state.lock() {
            state.render.opacity = opacity;
        }
    }

    pub fn update_offset(&self, offset: Offset) {
        if let Ok(mut state) = self.state.lock() {
            state.render.offset = offset;
        }
    }

    pub fn render_context(&self) -> RenderContext {
        self.state.lock().map(|s| s.render).unwrap_or_default()
    }
}
