//! Touch and gesture events
//!
//! Raw touch points come in from the platform layer as [`TouchEvent`]s;
//! recognizers turn them into [`GestureEvent`]s that the interaction patterns
//! consume.

use crate::geometry::{Axis, Offset};

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const TOUCH_DOWN: EventType = 1;
    pub const TOUCH_MOVE: EventType = 2;
    pub const TOUCH_UP: EventType = 3;
    pub const TOUCH_CANCEL: EventType = 4;

    /// Pan recognizer accepted the gesture
    pub const PAN_START: EventType = 10;
    pub const PAN_UPDATE: EventType = 11;
    pub const PAN_END: EventType = 12;
    pub const PAN_CANCEL: EventType = 13;

    pub const CLICK: EventType = 20;

    pub const SCROLL_START: EventType = 30;
    /// Scroll (including any fling or spring-back) came to rest
    pub const SCROLL_END: EventType = 31;
}

/// Phase of a single touch point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchType {
    Down,
    Move,
    Up,
    Cancel,
}

impl TouchType {
    pub fn event_type(&self) -> EventType {
        match self {
            TouchType::Down => event_types::TOUCH_DOWN,
            TouchType::Move => event_types::TOUCH_MOVE,
            TouchType::Up => event_types::TOUCH_UP,
            TouchType::Cancel => event_types::TOUCH_CANCEL,
        }
    }
}

/// A single touch point change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Pointer identifier
    pub id: u64,
    pub touch_type: TouchType,
    /// Location in window coordinates
    pub location: Offset,
    /// Monotonic timestamp in milliseconds
    pub time_ms: f64,
}

impl TouchEvent {
    pub fn new(id: u64, touch_type: TouchType, location: Offset, time_ms: f64) -> Self {
        Self {
            id,
            touch_type,
            location,
            time_ms,
        }
    }
}

/// Kind of input device that produced a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputEventType {
    #[default]
    TouchScreen,
    Mouse,
    /// Mouse wheel or trackpad axis events
    Axis,
    Keyboard,
}

impl InputEventType {
    pub fn is_axis(&self) -> bool {
        matches!(self, InputEventType::Axis)
    }
}

/// Device class of the originating input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SourceType {
    #[default]
    Touch,
    Mouse,
    Keyboard,
}

/// Gesture information handed to pattern callbacks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureEvent {
    /// Delta along the recognizer's main axis since the previous update
    pub main_delta: f32,
    /// Velocity along the main axis (pixels per second)
    pub main_velocity: f32,
    /// Full 2D delta since the previous update
    pub delta: Offset,
    /// Full 2D velocity (pixels per second)
    pub velocity: Offset,
    pub global_location: Offset,
    pub local_location: Offset,
    pub input_event_type: InputEventType,
    pub source_type: SourceType,
    pub time_ms: f64,
}

impl GestureEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main_delta(mut self, delta: f32) -> Self {
        self.main_delta = delta;
        self
    }

    pub fn with_main_velocity(mut self, velocity: f32) -> Self {
        self.main_velocity = velocity;
        self
    }

    pub fn with_delta(mut self, delta: Offset) -> Self {
        self.delta = delta;
        self
    }

    /// Sets both global and local location
    pub fn at(mut self, location: Offset) -> Self {
        self.global_location = location;
        self.local_location = location;
        self
    }

    pub fn with_input_event_type(mut self, ty: InputEventType) -> Self {
        self.input_event_type = ty;
        self
    }

    /// Recompute `main_delta`/`main_velocity` from the 2D values for `axis`
    pub fn project(mut self, axis: Axis) -> Self {
        self.main_delta = axis.main(self.delta);
        self.main_velocity = axis.main(self.velocity);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_projection() {
        let mut event = GestureEvent::new().with_delta(Offset::new(4.0, -9.0));
        event.velocity = Offset::new(100.0, -300.0);

        let vertical = event.project(Axis::Vertical);
        assert_eq!(vertical.main_delta, -9.0);
        assert_eq!(vertical.main_velocity, -300.0);

        let horizontal = event.project(Axis::Horizontal);
        assert_eq!(horizontal.main_delta, 4.0);
    }

    #[test]
    fn test_touch_event_types() {
        assert_eq!(TouchType::Down.event_type(), event_types::TOUCH_DOWN);
        assert_eq!(TouchType::Cancel.event_type(), event_types::TOUCH_CANCEL);
        assert!(InputEventType::Axis.is_axis());
        assert!(!InputEventType::Mouse.is_axis());
    }
}
