//! Text selection overlay
//!
//! Two draggable handles (or one caret handle) around a selection, and the
//! menu offering cut / copy / paste / select-all.
//!
//! - [`SelectOverlayPattern`] owns the interaction state: handle drags,
//!   reverse detection, menu visibility and the caret auto-hide timer.
//! - [`SelectOverlayNode`] owns the presentation: menu layout and the
//!   opacity animations.

pub mod info;
pub mod node;
pub mod pattern;

pub use info::{
    MenuOption, SelectHandleInfo, SelectMenuInfo, SelectOverlayCallbacks, SelectOverlayInfo,
};
pub use node::{SelectOverlayNode, MAX_MAIN_OPTIONS};
pub use pattern::{handle_events, HandleDragState, SelectOverlayPattern};
