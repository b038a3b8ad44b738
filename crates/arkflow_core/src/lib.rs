//! arkflow Core
//!
//! Foundational primitives shared by the arkflow interaction crates:
//!
//! - **Geometry**: axes, offsets and rectangles with tolerant float comparison
//! - **Events**: touch points and recognized gesture information
//! - **State Transitions**: enum-based interaction state machines
//! - **Gestures**: a single-pointer pan recognizer with velocity tracking
//!
//! # Example
//!
//! ```rust
//! use arkflow_core::events::{TouchEvent, TouchType};
//! use arkflow_core::geometry::Offset;
//! use arkflow_core::gesture::{PanDirection, PanRecognizer};
//!
//! let mut pan = PanRecognizer::new(PanDirection::Vertical);
//! pan.on_action_update(|event| println!("moved {}", event.main_delta));
//!
//! pan.handle_touch(&TouchEvent::new(0, TouchType::Down, Offset::new(0.0, 0.0), 0.0));
//! pan.handle_touch(&TouchEvent::new(0, TouchType::Move, Offset::new(0.0, 12.0), 16.0));
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod gesture;

pub use events::{event_types, EventType, GestureEvent, InputEventType, SourceType, TouchEvent, TouchType};
pub use fsm::{StateTransitions, Transitioned};
pub use geometry::{near_equal, near_zero, Axis, Offset, Rect};
pub use gesture::{PanDirection, PanRecognizer, PanState, VelocityTracker};
