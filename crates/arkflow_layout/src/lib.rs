//! arkflow Interaction Layer
//!
//! Patterns that turn gestures into scrolling and selection state:
//!
//! - **Nested scrolling**: [`ScrollablePattern`] negotiates every delta with
//!   its parent chain and resolves overshoot with an edge effect
//! - **Scroll bars**: [`ScrollBarPattern`] and the [`ScrollBarProxy`] that
//!   keeps bars and content in sync
//! - **Selection overlay**: handle drags, reverse detection and the
//!   selection menu
//! - **Drag preview**: bounded wait for a renderer-produced snapshot
//!
//! Patterns hang off a host [`FrameNode`] and an [`AnimationScheduler`]
//! (both held weakly) and do nothing once either is gone.
//!
//! [`AnimationScheduler`]: arkflow_animation::AnimationScheduler

pub mod config;
pub mod drag_preview;
pub mod error;
pub mod host;
pub mod scroll_bar;
pub mod scrollable;
pub mod select_overlay;

pub use config::{FlingConfig, InteractionConfig, ScrollBarConfig, SelectOverlayConfig};
pub use drag_preview::{capture_drag_preview, PixelMap, PreviewSender};
pub use error::{Error, Result};
pub use host::{AccessibilityEventType, FrameNode};
pub use scroll_bar::{DisplayMode, ScrollBarPattern, ScrollBarProxy, ScrollBarTarget};
pub use scrollable::{
    EdgeEffect, NestableScrollContainer, NestedScrollMode, NestedScrollOptions, NestedState,
    ScrollResult, ScrollSource, ScrollablePattern,
};
pub use select_overlay::{SelectOverlayInfo, SelectOverlayNode, SelectOverlayPattern};
