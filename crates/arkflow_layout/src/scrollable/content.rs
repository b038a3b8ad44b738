//! Scrollable content geometry
//!
//! Offsets follow one convention throughout: the content offset lives in
//! `[-scrollable_distance, 0]`. `0` shows the start of the content, a
//! negative delta moves toward the end, a positive one back toward the
//! start. Spring edge effects may push the offset outside that range
//! temporarily.

use arkflow_core::geometry::{great_not_equal, less_not_equal, near_zero};

/// Why an offset is changing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScrollSource {
    #[default]
    None,
    /// Finger drag
    Update,
    /// Fling after release
    Animation,
    /// Programmatic jump
    Jump,
    /// Spring-back toward an edge
    AnimationSpring,
    /// Companion scroll bar drag
    Bar,
    /// Programmatic animated scroll
    AnimationController,
    /// Fling started from the scroll bar
    BarFling,
    /// Mouse wheel or trackpad
    Axis,
    /// Drag just started, offset is zero
    Start,
}

impl ScrollSource {
    /// Movement driven by a scroll bar
    pub fn is_bar(&self) -> bool {
        matches!(self, ScrollSource::Bar | ScrollSource::BarFling)
    }
}

/// How far a delta would push content past its edges
///
/// `start` is positive when the start edge would be overrun (content dragged
/// down/right past the top/left), `end` is negative when the end edge
/// would be overrun.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverScrollOffset {
    pub start: f32,
    pub end: f32,
}

impl OverScrollOffset {
    pub fn is_zero(&self) -> bool {
        near_zero(self.start) && near_zero(self.end)
    }

    /// Overshoot at the edge a delta of this sign is heading for
    pub fn toward(&self, delta: f32) -> f32 {
        if delta > 0.0 {
            self.start
        } else {
            self.end
        }
    }
}

/// Geometry hooks each scrollable variant provides
pub trait ScrollableContent: Send {
    fn current_offset(&self) -> f32;

    fn scrollable_distance(&self) -> f32;

    /// Move the content by `delta`; false when nothing moved
    fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool;

    fn set_scrollable_distance(&mut self, distance: f32);

    fn is_at_top(&self) -> bool {
        !less_not_equal(self.current_offset(), 0.0)
    }

    fn is_at_bottom(&self) -> bool {
        !great_not_equal(self.current_offset(), -self.scrollable_distance())
    }

    fn is_out_of_boundary(&self) -> bool {
        let offset = self.current_offset();
        great_not_equal(offset, 0.0) || less_not_equal(offset, -self.scrollable_distance())
    }

    /// Offset the content settles at after a spring-back
    fn rest_offset(&self) -> f32 {
        self.current_offset().clamp(-self.scrollable_distance().max(0.0), 0.0)
    }

    /// Overshoot `delta` would cause at either edge
    ///
    /// Only the part of the delta that crosses an edge counts; when the
    /// content is already past an edge the whole delta does.
    fn over_scroll_offset(&self, delta: f32) -> OverScrollOffset {
        let mut result = OverScrollOffset::default();

        let start_pos = self.current_offset();
        let new_start_pos = start_pos + delta;
        if start_pos > 0.0 && new_start_pos > 0.0 {
            result.start = delta;
        }
        if start_pos > 0.0 && new_start_pos <= 0.0 {
            result.start = -start_pos;
        }
        if start_pos <= 0.0 && new_start_pos > 0.0 {
            result.start = new_start_pos;
        }

        let end_pos = start_pos + self.scrollable_distance();
        let new_end_pos = end_pos + delta;
        if end_pos < 0.0 && new_end_pos < 0.0 {
            result.end = delta;
        }
        if end_pos < 0.0 && new_end_pos >= 0.0 {
            result.end = -end_pos;
        }
        if end_pos >= 0.0 && new_end_pos < 0.0 {
            result.end = new_end_pos;
        }

        result
    }
}

/// Plain linear content (a Scroll with a single child)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearContent {
    offset: f32,
    distance: f32,
}

impl LinearContent {
    /// Content that can scroll `distance` pixels past its viewport
    pub fn new(distance: f32) -> Self {
        Self {
            offset: 0.0,
            distance: distance.max(0.0),
        }
    }

    pub fn with_offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

impl ScrollableContent for LinearContent {
    fn current_offset(&self) -> f32 {
        self.offset
    }

    fn scrollable_distance(&self) -> f32 {
        self.distance
    }

    fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool {
        if near_zero(delta) {
            return false;
        }
        tracing::trace!(delta, ?source, offset = self.offset, "content offset");
        self.offset += delta;
        true
    }

    fn set_scrollable_distance(&mut self, distance: f32) {
        self.distance = distance.max(0.0);
    }
}
