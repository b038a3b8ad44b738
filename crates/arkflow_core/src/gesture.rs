//! Pan gesture recognition
//!
//! A [`PanRecognizer`] follows a single pointer. Once the pointer has moved
//! past the recognizer's distance threshold along its direction the gesture is
//! accepted and the recognizer reports start → update* → end (or cancel), in
//! that order, to the registered callbacks.

use smallvec::SmallVec;

use crate::events::{event_types, GestureEvent, InputEventType, TouchEvent, TouchType};
use crate::fsm::StateTransitions;
use crate::geometry::{Axis, Offset};

/// Default distance a pointer must travel before a pan is accepted
pub const DEFAULT_PAN_DISTANCE: f32 = 5.0;

/// Directions a pan recognizer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanDirection {
    Horizontal,
    #[default]
    Vertical,
    All,
}

impl From<Axis> for PanDirection {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => PanDirection::Horizontal,
            Axis::Vertical => PanDirection::Vertical,
            Axis::None => PanDirection::All,
        }
    }
}

/// Callback receiving gesture information
pub type GestureCallback = Box<dyn FnMut(&GestureEvent) + Send>;

// =========================================================================
// Velocity tracking
// =========================================================================

/// Smooths pointer velocity with an exponential moving average
#[derive(Debug, Clone, Copy, Default)]
pub struct VelocityTracker {
    velocity: Offset,
    last_time: Option<f64>,
}

impl VelocityTracker {
    /// Weight of the newest sample
    const SMOOTHING: f32 = 0.3;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.velocity = Offset::ZERO;
        self.last_time = None;
    }

    /// Record a movement of `delta` at `time_ms`
    pub fn add(&mut self, delta: Offset, time_ms: f64) {
        match self.last_time {
            Some(last) => {
                let dt = ((time_ms - last) / 1000.0) as f32;
                // Ignore reordered samples and long pauses
                if dt > 0.0 && dt < 0.5 {
                    let alpha = Self::SMOOTHING;
                    self.velocity.x = self.velocity.x * (1.0 - alpha) + delta.x / dt * alpha;
                    self.velocity.y = self.velocity.y * (1.0 - alpha) + delta.y / dt * alpha;
                }
            }
            None => {
                // First sample: assume a 60Hz frame
                self.velocity = Offset::new(delta.x * 60.0, delta.y * 60.0);
            }
        }
        self.last_time = Some(time_ms);
    }

    pub fn velocity(&self) -> Offset {
        self.velocity
    }
}

// =========================================================================
// Recognizer state
// =========================================================================

/// Lifecycle of a pan recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanState {
    /// No pointer tracked
    #[default]
    Ready,
    /// Pointer down, threshold not reached yet
    Detecting,
    /// Pan accepted, updates are being delivered
    Accepted,
}

impl StateTransitions for PanState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use event_types::*;
        match (self, event) {
            (PanState::Ready, TOUCH_DOWN) => Some(PanState::Detecting),
            (PanState::Detecting, PAN_START) => Some(PanState::Accepted),
            (PanState::Detecting, TOUCH_UP | TOUCH_CANCEL) => Some(PanState::Ready),
            (PanState::Accepted, TOUCH_UP | TOUCH_CANCEL) => Some(PanState::Ready),
            _ => None,
        }
    }
}

// =========================================================================
// PanRecognizer
// =========================================================================

/// Single-pointer pan recognizer
pub struct PanRecognizer {
    direction: PanDirection,
    distance: f32,
    input_event_type: InputEventType,
    state: PanState,
    pointer: Option<u64>,
    down_location: Offset,
    last_location: Offset,
    tracker: VelocityTracker,
    on_start: SmallVec<[GestureCallback; 1]>,
    on_update: SmallVec<[GestureCallback; 1]>,
    on_end: SmallVec<[GestureCallback; 1]>,
    on_cancel: SmallVec<[GestureCallback; 1]>,
}

impl PanRecognizer {
    pub fn new(direction: PanDirection) -> Self {
        Self {
            direction,
            distance: DEFAULT_PAN_DISTANCE,
            input_event_type: InputEventType::TouchScreen,
            state: PanState::Ready,
            pointer: None,
            down_location: Offset::ZERO,
            last_location: Offset::ZERO,
            tracker: VelocityTracker::new(),
            on_start: SmallVec::new(),
            on_update: SmallVec::new(),
            on_end: SmallVec::new(),
            on_cancel: SmallVec::new(),
        }
    }

    /// Set the acceptance distance threshold
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance.max(0.0);
        self
    }

    /// Input device reported in emitted events
    pub fn with_input_event_type(mut self, ty: InputEventType) -> Self {
        self.input_event_type = ty;
        self
    }

    pub fn set_direction(&mut self, direction: PanDirection) {
        self.direction = direction;
    }

    pub fn direction(&self) -> PanDirection {
        self.direction
    }

    pub fn state(&self) -> PanState {
        self.state
    }

    pub fn on_action_start<F: FnMut(&GestureEvent) + Send + 'static>(&mut self, f: F) {
        self.on_start.push(Box::new(f));
    }

    pub fn on_action_update<F: FnMut(&GestureEvent) + Send + 'static>(&mut self, f: F) {
        self.on_update.push(Box::new(f));
    }

    pub fn on_action_end<F: FnMut(&GestureEvent) + Send + 'static>(&mut self, f: F) {
        self.on_end.push(Box::new(f));
    }

    pub fn on_action_cancel<F: FnMut(&GestureEvent) + Send + 'static>(&mut self, f: F) {
        self.on_cancel.push(Box::new(f));
    }

    /// Feed a touch point into the recognizer
    pub fn handle_touch(&mut self, touch: &TouchEvent) {
        match touch.touch_type {
            TouchType::Down => {
                if self.state.apply(event_types::TOUCH_DOWN).changed() {
                    self.pointer = Some(touch.id);
                    self.down_location = touch.location;
                    self.last_location = touch.location;
                    self.tracker.reset();
                }
            }
            TouchType::Move => {
                if self.pointer != Some(touch.id) {
                    return;
                }
                let delta = touch.location - self.last_location;
                self.last_location = touch.location;
                self.tracker.add(delta, touch.time_ms);

                match self.state {
                    PanState::Detecting => {
                        let travelled = touch.location - self.down_location;
                        if self.distance_along_direction(travelled) >= self.distance {
                            self.state.apply(event_types::PAN_START);
                            tracing::debug!(direction = ?self.direction, "pan accepted");
                            let event = self.make_event(travelled, touch);
                            Self::emit(&mut self.on_start, &event);
                        }
                    }
                    PanState::Accepted => {
                        let event = self.make_event(delta, touch);
                        Self::emit(&mut self.on_update, &event);
                    }
                    PanState::Ready => {}
                }
            }
            TouchType::Up | TouchType::Cancel => {
                if self.pointer != Some(touch.id) {
                    return;
                }
                let was_accepted = self.state == PanState::Accepted;
                self.state.apply(touch.touch_type.event_type());
                self.pointer = None;
                if !was_accepted {
                    return;
                }
                let event = self.make_event(Offset::ZERO, touch);
                if touch.touch_type == TouchType::Up {
                    Self::emit(&mut self.on_end, &event);
                } else {
                    Self::emit(&mut self.on_cancel, &event);
                }
            }
        }
    }

    fn distance_along_direction(&self, travelled: Offset) -> f32 {
        match self.direction {
            PanDirection::Horizontal => travelled.x.abs(),
            PanDirection::Vertical => travelled.y.abs(),
            PanDirection::All => (travelled.x * travelled.x + travelled.y * travelled.y).sqrt(),
        }
    }

    fn main_component(&self, value: Offset) -> f32 {
        match self.direction {
            PanDirection::Horizontal => value.x,
            PanDirection::Vertical => value.y,
            PanDirection::All => {
                if value.x.abs() > value.y.abs() {
                    value.x
                } else {
                    value.y
                }
            }
        }
    }

    fn make_event(&self, delta: Offset, touch: &TouchEvent) -> GestureEvent {
        let velocity = self.tracker.velocity();
        GestureEvent {
            main_delta: self.main_component(delta),
            main_velocity: self.main_component(velocity),
            delta,
            velocity,
            global_location: touch.location,
            local_location: touch.location,
            input_event_type: self.input_event_type,
            time_ms: touch.time_ms,
            ..Default::default()
        }
    }

    fn emit(callbacks: &mut SmallVec<[GestureCallback; 1]>, event: &GestureEvent) {
        for callback in callbacks.iter_mut() {
            callback(event);
        }
    }
}

impl std::fmt::Debug for PanRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanRecognizer")
            .field("direction", &self.direction)
            .field("distance", &self.distance)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn touch(touch_type: TouchType, x: f32, y: f32, time_ms: f64) -> TouchEvent {
        TouchEvent::new(1, touch_type, Offset::new(x, y), time_ms)
    }

    #[derive(Default)]
    struct Log {
        events: Vec<(&'static str, f32)>,
    }

    fn recorder(direction: PanDirection) -> (PanRecognizer, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut pan = PanRecognizer::new(direction);

        let l = log.clone();
        pan.on_action_start(move |e| l.lock().unwrap().events.push(("start", e.main_delta)));
        let l = log.clone();
        pan.on_action_update(move |e| l.lock().unwrap().events.push(("update", e.main_delta)));
        let l = log.clone();
        pan.on_action_end(move |e| l.lock().unwrap().events.push(("end", e.main_velocity)));
        let l = log.clone();
        pan.on_action_cancel(move |_| l.lock().unwrap().events.push(("cancel", 0.0)));

        (pan, log)
    }

    #[test]
    fn test_pan_below_threshold_is_not_reported() {
        let (mut pan, log) = recorder(PanDirection::Vertical);

        pan.handle_touch(&touch(TouchType::Down, 0.0, 0.0, 0.0));
        pan.handle_touch(&touch(TouchType::Move, 0.0, 3.0, 16.0));
        pan.handle_touch(&touch(TouchType::Up, 0.0, 3.0, 32.0));

        assert!(log.lock().unwrap().events.is_empty());
        assert_eq!(pan.state(), PanState::Ready);
    }

    #[test]
    fn test_pan_ordering() {
        let (mut pan, log) = recorder(PanDirection::Vertical);

        pan.handle_touch(&touch(TouchType::Down, 0.0, 0.0, 0.0));
        pan.handle_touch(&touch(TouchType::Move, 0.0, 10.0, 16.0));
        pan.handle_touch(&touch(TouchType::Move, 0.0, 14.0, 32.0));
        pan.handle_touch(&touch(TouchType::Up, 0.0, 14.0, 48.0));

        let log = log.lock().unwrap();
        let names: Vec<_> = log.events.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["start", "update", "end"]);
        assert_eq!(log.events[0].1, 10.0);
        assert_eq!(log.events[1].1, 4.0);
        assert!(log.events[2].1 > 0.0, "downward pan has positive velocity");
    }

    #[test]
    fn test_horizontal_pan_ignores_vertical_motion() {
        let (mut pan, log) = recorder(PanDirection::Horizontal);

        pan.handle_touch(&touch(TouchType::Down, 0.0, 0.0, 0.0));
        pan.handle_touch(&touch(TouchType::Move, 1.0, 40.0, 16.0));
        assert_eq!(pan.state(), PanState::Detecting);
        assert!(log.lock().unwrap().events.is_empty());
    }

    #[test]
    fn test_cancel_after_accept() {
        let (mut pan, log) = recorder(PanDirection::All);

        pan.handle_touch(&touch(TouchType::Down, 0.0, 0.0, 0.0));
        pan.handle_touch(&touch(TouchType::Move, 6.0, 0.0, 16.0));
        pan.handle_touch(&touch(TouchType::Cancel, 6.0, 0.0, 20.0));

        let names: Vec<_> = log.lock().unwrap().events.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["start", "cancel"]);
    }

    #[test]
    fn test_velocity_tracker_smoothing() {
        let mut tracker = VelocityTracker::new();
        tracker.add(Offset::new(0.0, 10.0), 0.0);
        assert_eq!(tracker.velocity().y, 600.0);

        // 10px in 10ms = 1000px/s instant; EMA: 600 * 0.7 + 1000 * 0.3
        tracker.add(Offset::new(0.0, 10.0), 10.0);
        assert!((tracker.velocity().y - 720.0).abs() < 0.5);
    }
}
