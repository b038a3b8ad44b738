//! Scroll bars
//!
//! A [`ScrollBarPattern`] is a draggable bar kept in sync with one
//! scrollable through a shared [`ScrollBarProxy`]. The bar is not part of
//! the nested scroll chain: dragging it moves the content directly, and the
//! content moving (from any other source) repositions the bar.
//!
//! Bar and content measure offsets in different spaces. The bar travels
//! `scrollable_distance` pixels along its track while the content travels
//! `control_distance` pixels; the proxy converts between the two.

pub mod pattern;
pub mod proxy;

pub use pattern::ScrollBarPattern;
pub use proxy::{ScrollBarProxy, ScrollBarTarget};

use serde::{Deserialize, Serialize};

/// When the bar is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Never shown
    Off,
    /// Shown while scrolling, fades out when idle
    #[default]
    Auto,
    /// Always shown
    On,
}
