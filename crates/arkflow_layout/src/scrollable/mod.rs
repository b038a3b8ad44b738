//! Nested scrollables
//!
//! A [`ScrollablePattern`] resolves each scroll delta against its nested
//! scroll parent according to a per-direction [`NestedScrollMode`], applies
//! what is left to its [`ScrollableContent`], and handles overshoot with an
//! [`EdgeEffect`].
//!
//! # Example
//!
//! ```rust
//! use arkflow_core::geometry::Axis;
//! use arkflow_layout::host::FrameNode;
//! use arkflow_layout::scrollable::{
//!     LinearContent, NestedScrollMode, NestedScrollOptions, NestedState, ScrollSource,
//!     ScrollablePattern,
//! };
//!
//! let outer_host = FrameNode::new("Scroll");
//! let outer = ScrollablePattern::new(&outer_host, Axis::Vertical, LinearContent::new(800.0));
//!
//! let inner_host = FrameNode::new("List");
//! let inner = ScrollablePattern::new(&inner_host, Axis::Vertical, LinearContent::new(300.0));
//! {
//!     let mut inner = inner.lock().unwrap();
//!     inner.attach_to_parent(&outer).unwrap();
//!     inner.set_nested_scroll(NestedScrollOptions::both(NestedScrollMode::SelfFirst));
//!
//!     // 300px fit in the inner list, the remaining 100px scroll the outer one
//!     inner.handle_scroll(-400.0, ScrollSource::Update, NestedState::Gesture);
//!     assert_eq!(inner.current_offset(), -300.0);
//! }
//! assert_eq!(outer.lock().unwrap().current_offset(), -100.0);
//! ```

pub mod content;
pub mod edge_effect;
pub mod nested;
pub mod pattern;

pub use content::{LinearContent, OverScrollOffset, ScrollSource, ScrollableContent};
pub use edge_effect::{EdgeEffect, ScrollableEdgeEffect};
pub use nested::{
    dispatch, NestableScrollContainer, NestedAction, NestedScrollMode, NestedScrollOptions,
    NestedState, ParentRef, ScrollResult, SharedContainer,
};
pub use pattern::ScrollablePattern;
