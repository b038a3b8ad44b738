//! Scroll bar pattern
//!
//! Bar offsets live in `[0, scrollable_distance]`, growing toward the end
//! of the track. That is the opposite sign of the content offset, so every
//! delta handed to the proxy is negated.

use std::sync::{Arc, Mutex, Weak};

use arkflow_animation::{
    AnimationId, AnimationScheduler, CancelableTask, Easing, FrictionMotion, SharedScheduler, Tween,
};
use arkflow_core::events::GestureEvent;
use arkflow_core::geometry::{near_equal, near_zero, Axis};
use arkflow_core::gesture::{PanDirection, PanRecognizer};

use super::proxy::ScrollBarProxy;
use super::DisplayMode;
use crate::config::ScrollBarConfig;
use crate::host::{
    AccessibilityEventType, FrameNode, PROPERTY_UPDATE_LAYOUT, PROPERTY_UPDATE_MEASURE,
    PROPERTY_UPDATE_RENDER,
};
use crate::scrollable::ScrollSource;

/// Observes every offset the bar is asked to move by
pub type ScrollPositionCallback = Box<dyn FnMut(f32, ScrollSource) + Send>;
pub type ScrollEndCallback = Box<dyn FnMut() + Send>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct BarFling {
    id: AnimationId,
    position: f32,
}

pub struct ScrollBarPattern {
    self_weak: Weak<Mutex<ScrollBarPattern>>,
    host: Weak<FrameNode>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    proxy: Option<Arc<ScrollBarProxy>>,
    config: ScrollBarConfig,
    axis: Axis,
    current_offset: f32,
    scrollable_distance: f32,
    control_distance: f32,
    display_mode: DisplayMode,
    opacity: u8,
    is_driving: bool,
    fling: Option<BarFling>,
    disappear_task: CancelableTask,
    disappear_animation: Option<AnimationId>,
    on_scroll_position: Option<ScrollPositionCallback>,
    on_scroll_end: Option<ScrollEndCallback>,
}

impl ScrollBarPattern {
    pub fn new(host: &Arc<FrameNode>, axis: Axis, config: ScrollBarConfig) -> Arc<Mutex<Self>> {
        let opacity = match config.display_mode {
            DisplayMode::Off => 0,
            DisplayMode::Auto | DisplayMode::On => u8::MAX,
        };
        host.update_opacity(opacity);
        Arc::new_cyclic(|weak| {
            Mutex::new(Self {
                self_weak: weak.clone(),
                host: Arc::downgrade(host),
                scheduler: Weak::new(),
                proxy: None,
                display_mode: config.display_mode,
                config,
                axis,
                current_offset: 0.0,
                scrollable_distance: 0.0,
                control_distance: 0.0,
                opacity,
                is_driving: false,
                fling: None,
                disappear_task: CancelableTask::new(),
                disappear_animation: None,
                on_scroll_position: None,
                on_scroll_end: None,
            })
        })
    }

    /// Pan recognizer feeding drags into `bar`
    pub fn pan_recognizer(bar: &Arc<Mutex<Self>>) -> PanRecognizer {
        let axis = bar.lock().map(|b| b.axis).unwrap_or_default();
        let mut pan = PanRecognizer::new(PanDirection::from(axis));

        let weak = Arc::downgrade(bar);
        pan.on_action_start(move |event| with_bar(&weak, |b| b.handle_drag_start(event)));
        let weak = Arc::downgrade(bar);
        pan.on_action_update(move |event| with_bar(&weak, |b| b.handle_drag_update(event)));
        let weak = Arc::downgrade(bar);
        pan.on_action_end(move |event| with_bar(&weak, |b| b.handle_drag_end(event)));
        let weak = Arc::downgrade(bar);
        pan.on_action_cancel(move |_| with_bar(&weak, |b| b.handle_drag_end(&GestureEvent::new())));
        pan
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_scheduler(&mut self, scheduler: &SharedScheduler) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    /// Join `proxy`, which already links (or will link) the content
    pub fn set_scroll_bar_proxy(&mut self, proxy: Arc<ScrollBarProxy>) {
        if let Some(old) = self.proxy.take() {
            old.unregister_scroll_bar(&self.self_weak);
        }
        proxy.register_scroll_bar(self.self_weak.clone());
        self.proxy = Some(proxy);
    }

    pub fn scroll_bar_proxy(&self) -> Option<&Arc<ScrollBarProxy>> {
        self.proxy.as_ref()
    }

    pub fn config(&self) -> &ScrollBarConfig {
        &self.config
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: Axis) {
        if self.axis == axis {
            return;
        }
        self.axis = axis;
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        }
        if self.display_mode == DisplayMode::Auto && !axis.is_none() {
            self.start_disappear_animator();
        }
    }

    pub fn current_offset(&self) -> f32 {
        self.current_offset
    }

    /// Length of the bar's track
    pub fn scrollable_distance(&self) -> f32 {
        self.scrollable_distance
    }

    pub fn set_scrollable_distance(&mut self, distance: f32) {
        self.scrollable_distance = distance.max(0.0);
        self.current_offset = self.current_offset.clamp(0.0, self.scrollable_distance);
    }

    /// Scrollable distance of the content the bar represents
    pub fn control_distance(&self) -> f32 {
        self.control_distance
    }

    pub fn set_control_distance(&mut self, distance: f32) {
        self.control_distance = distance.max(0.0);
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        if self.display_mode == mode {
            return;
        }
        tracing::debug!(from = ?self.display_mode, to = ?mode, "scroll bar display mode");
        self.display_mode = mode;
        match mode {
            DisplayMode::On => self.stop_disappear_animator(),
            DisplayMode::Auto => self.start_disappear_animator(),
            DisplayMode::Off => {
                self.stop_disappear_animator();
                self.set_opacity(0);
            }
        }
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn is_driving(&self) -> bool {
        self.is_driving
    }

    pub fn is_fling_running(&self) -> bool {
        self.fling.is_some()
    }

    /// A fade-out is waiting for its delay or running
    pub fn is_disappearing(&self) -> bool {
        if self.disappear_animation.is_some() {
            return true;
        }
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let pending = match scheduler.lock() {
            Ok(scheduler) => self.disappear_task.is_pending(&scheduler),
            Err(_) => false,
        };
        pending
    }

    pub fn is_at_top(&self) -> bool {
        self.current_offset <= 0.0
    }

    pub fn is_at_bottom(&self) -> bool {
        self.current_offset >= self.scrollable_distance
    }

    pub fn on_scroll_position<F: FnMut(f32, ScrollSource) + Send + 'static>(&mut self, f: F) {
        self.on_scroll_position = Some(Box::new(f));
    }

    pub fn on_scroll_end<F: FnMut() + Send + 'static>(&mut self, f: F) {
        self.on_scroll_end = Some(Box::new(f));
    }

    // =========================================================================
    // Offset
    // =========================================================================

    /// Move the bar along its track
    ///
    /// Returns false and leaves the offset alone when the delta is zero,
    /// the bar has no axis, or the bar is already at the end it moves toward.
    pub fn update_current_offset(&mut self, delta: f32, source: ScrollSource) -> bool {
        let Some(host) = self.host.upgrade() else {
            return false;
        };
        if near_zero(delta) || self.axis.is_none() {
            return false;
        }
        if (self.is_at_bottom() && delta > 0.0) || (self.is_at_top() && delta < 0.0) {
            return false;
        }

        let last = self.current_offset;
        self.current_offset = (last + delta).clamp(0.0, self.scrollable_distance);
        let applied = self.current_offset - last;
        if near_zero(applied) {
            return false;
        }
        tracing::trace!(delta, applied, ?source, offset = self.current_offset, "bar offset");

        if let Some(proxy) = self.proxy.clone() {
            proxy.notify_scrollable_node(-applied, source, self);
        }
        host.mark_dirty_node(PROPERTY_UPDATE_LAYOUT);
        true
    }

    fn scroll_position(&mut self, offset: f32, source: ScrollSource) -> bool {
        if let Some(callback) = self.on_scroll_position.as_mut() {
            callback(offset, source);
        }
        self.update_current_offset(offset, source)
    }

    /// Follow the content after it moved on its own
    pub(crate) fn sync_with_content(&mut self, content_offset: f32, control_distance: f32) {
        self.control_distance = control_distance.max(0.0);
        let offset = if near_zero(self.control_distance) {
            0.0
        } else {
            -content_offset * self.scrollable_distance / self.control_distance
        };
        let offset = offset.clamp(0.0, self.scrollable_distance);
        if near_equal(offset, self.current_offset) {
            return;
        }
        self.current_offset = offset;
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_LAYOUT);
        }
    }

    // =========================================================================
    // Drag gesture
    // =========================================================================

    pub fn handle_drag_start(&mut self, _event: &GestureEvent) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        self.stop_fling();
        self.is_driving = true;
        if self.display_mode == DisplayMode::Auto {
            self.stop_disappear_animator();
        }
        if let Some(proxy) = self.proxy.clone() {
            proxy.notify_scroll_start();
        }
        host.on_accessibility_event(AccessibilityEventType::ScrollStart);
        tracing::debug!(offset = self.current_offset, "bar drag start");
        self.scroll_position(0.0, ScrollSource::Start);
    }

    pub fn handle_drag_update(&mut self, event: &GestureEvent) {
        if !self.is_driving || self.host.upgrade().is_none() {
            return;
        }
        let mut offset = event.main_delta;
        if event.input_event_type.is_axis() {
            // Wheel deltas are content-space and point the other way
            offset = if near_zero(self.control_distance) {
                0.0
            } else {
                -offset * self.scrollable_distance / self.control_distance
            };
        }
        self.scroll_position(offset, ScrollSource::Bar);
    }

    pub fn handle_drag_end(&mut self, event: &GestureEvent) {
        if !self.is_driving {
            return;
        }
        self.is_driving = false;
        if self.host.upgrade().is_none() {
            return;
        }

        let velocity = event.main_velocity;
        if near_zero(velocity) || event.input_event_type.is_axis() {
            self.finish_scroll();
            return;
        }
        if !self.start_fling(velocity) {
            self.finish_scroll();
        }
    }

    fn finish_scroll(&mut self) {
        tracing::debug!(offset = self.current_offset, "bar scroll end");
        if let Some(proxy) = self.proxy.clone() {
            proxy.notify_scroll_stop();
        }
        if let Some(callback) = self.on_scroll_end.as_mut() {
            callback();
        }
        if let Some(host) = self.host.upgrade() {
            host.on_accessibility_event(AccessibilityEventType::ScrollEnd);
        }
        if self.display_mode == DisplayMode::Auto {
            self.start_disappear_animator();
        }
    }

    // =========================================================================
    // Fling
    // =========================================================================

    fn start_fling(&mut self, velocity: f32) -> bool {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return false;
        };
        self.stop_fling_locked(&mut scheduler);

        let start = self.current_offset;
        let motion = FrictionMotion::new(self.config.friction, start, velocity);
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            motion,
            move |value| with_bar(&frame, |b| b.process_friction_motion(value)),
            move || with_bar(&finish, |b| b.process_friction_motion_stop()),
        );
        self.fling = Some(BarFling { id, position: start });
        tracing::debug!(velocity, start, "bar fling started");
        true
    }

    /// One fling frame at absolute position `value`
    pub fn process_friction_motion(&mut self, value: f32) {
        let Some(BarFling { id, position }) = self.fling else {
            return;
        };
        self.fling = Some(BarFling { id, position: value });
        let offset = value - position;
        if near_zero(offset) {
            return;
        }
        if !self.scroll_position(offset, ScrollSource::BarFling) {
            // Ran into an end of the track
            self.stop_fling();
            self.finish_scroll();
        }
    }

    pub fn process_friction_motion_stop(&mut self) {
        if self.fling.take().is_some() {
            self.finish_scroll();
        }
    }

    fn stop_fling(&mut self) {
        if self.fling.is_none() {
            return;
        }
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    self.stop_fling_locked(&mut scheduler);
                }
            }
            None => self.fling = None,
        }
    }

    fn stop_fling_locked(&mut self, scheduler: &mut AnimationScheduler) {
        if let Some(fling) = self.fling.take() {
            scheduler.stop_animation(fling.id);
        }
    }

    // =========================================================================
    // Auto-hide
    // =========================================================================

    /// Show the bar now and fade it out after the idle delay
    pub fn start_disappear_animator(&mut self) {
        if self.control_distance <= 0.0 {
            return;
        }
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        self.cancel_disappear_locked(&mut scheduler);
        self.set_opacity(u8::MAX);

        let weak = self.self_weak.clone();
        self.disappear_task.post(&mut scheduler, self.config.disappear_delay_ms, move || {
            with_bar(&weak, |b| b.play_disappear_animation())
        });
        tracing::debug!(delay_ms = self.config.disappear_delay_ms, "bar disappear armed");
    }

    pub fn stop_disappear_animator(&mut self) {
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    self.cancel_disappear_locked(&mut scheduler);
                }
            }
            None => {
                self.disappear_task.invalidate();
                self.disappear_animation = None;
            }
        }
        self.set_opacity(u8::MAX);
    }

    fn cancel_disappear_locked(&mut self, scheduler: &mut AnimationScheduler) {
        self.disappear_task.cancel(scheduler);
        if let Some(id) = self.disappear_animation.take() {
            scheduler.stop_animation(id);
        }
    }

    fn play_disappear_animation(&mut self) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        let fade = Tween::new(f32::from(self.opacity), 0.0, self.config.disappear_duration_ms)
            .with_easing(Easing::Friction);
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            fade,
            move |value| with_bar(&frame, |b| b.set_opacity(value.round().clamp(0.0, 255.0) as u8)),
            move || {
                with_bar(&finish, |b| {
                    b.disappear_animation = None;
                    b.set_opacity(0);
                })
            },
        );
        self.disappear_animation = Some(id);
        tracing::debug!("bar fading out");
    }

    fn set_opacity(&mut self, opacity: u8) {
        if self.opacity == opacity {
            return;
        }
        self.opacity = opacity;
        if let Some(host) = self.host.upgrade() {
            host.update_opacity(opacity);
            host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
        }
    }
}

fn with_bar(weak: &Weak<Mutex<ScrollBarPattern>>, f: impl FnOnce(&mut ScrollBarPattern)) {
    if let Some(bar) = weak.upgrade() {
        if let Ok(mut bar) = bar.lock() {
            f(&mut bar);
        }
    }
}

impl std::fmt::Debug for ScrollBarPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBarPattern")
            .field("axis", &self.axis)
            .field("current_offset", &self.current_offset)
            .field("scrollable_distance", &self.scrollable_distance)
            .field("control_distance", &self.control_distance)
            .field("display_mode", &self.display_mode)
            .field("opacity", &self.opacity)
            .field("fling", &self.fling)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(mode: DisplayMode) -> (Arc<FrameNode>, Arc<Mutex<ScrollBarPattern>>, SharedScheduler) {
        let host = FrameNode::new("ScrollBar");
        let config = ScrollBarConfig {
            display_mode: mode,
            ..Default::default()
        };
        let bar = ScrollBarPattern::new(&host, Axis::Vertical, config);
        let scheduler = AnimationScheduler::shared();
        {
            let mut b = bar.lock().unwrap();
            b.set_scheduler(&scheduler);
            b.set_scrollable_distance(500.0);
            b.set_control_distance(100.0);
        }
        (host, bar, scheduler)
    }

    #[test]
    fn test_update_clamps_to_track() {
        let (host, bar, _s) = bar(DisplayMode::On);
        let mut b = bar.lock().unwrap();
        assert!(b.update_current_offset(600.0, ScrollSource::Bar));
        assert_eq!(b.current_offset(), 500.0);
        assert_ne!(host.take_dirty_flags() & PROPERTY_UPDATE_LAYOUT, 0);

        assert!(!b.update_current_offset(0.0, ScrollSource::Bar));
        b.set_axis(Axis::None);
        assert!(!b.update_current_offset(-10.0, ScrollSource::Bar));
        assert_eq!(b.current_offset(), 500.0);
    }

    #[test]
    fn test_sync_with_content_scales_offset() {
        let (_host, bar, _s) = bar(DisplayMode::On);
        let mut b = bar.lock().unwrap();
        b.sync_with_content(-20.0, 100.0);
        assert_eq!(b.current_offset(), 100.0);
        // Overscrolled content pins the bar to its track
        b.sync_with_content(30.0, 100.0);
        assert_eq!(b.current_offset(), 0.0);
    }

    #[test]
    fn test_axis_input_is_inverted_and_scaled() {
        use arkflow_core::events::InputEventType;

        let (_host, bar, _s) = bar(DisplayMode::On);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut b = bar.lock().unwrap();
        let log = seen.clone();
        b.on_scroll_position(move |offset, source| log.lock().unwrap().push((offset, source)));
        b.handle_drag_start(&GestureEvent::new());
        b.handle_drag_update(
            &GestureEvent::new()
                .with_main_delta(-4.0)
                .with_input_event_type(InputEventType::Axis),
        );
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(0.0, ScrollSource::Start), (20.0, ScrollSource::Bar)]
        );
        assert_eq!(b.current_offset(), 20.0);
    }

    #[test]
    fn test_auto_bar_fades_after_delay() {
        let (host, bar, scheduler) = bar(DisplayMode::Auto);
        bar.lock().unwrap().start_disappear_animator();
        assert_eq!(host.render_context().opacity, 255);

        AnimationScheduler::tick(&scheduler, 1999.0);
        assert_eq!(bar.lock().unwrap().opacity(), 255);

        AnimationScheduler::tick(&scheduler, 1.0);
        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        let b = bar.lock().unwrap();
        assert_eq!(b.opacity(), 0);
        assert_eq!(host.render_context().opacity, 0);
        assert!(!b.is_disappearing());
    }

    #[test]
    fn test_stop_disappear_restores_opacity() {
        let (_host, bar, scheduler) = bar(DisplayMode::Auto);
        bar.lock().unwrap().start_disappear_animator();
        AnimationScheduler::tick(&scheduler, 2000.0);
        AnimationScheduler::tick(&scheduler, 200.0);
        {
            let mut b = bar.lock().unwrap();
            assert!(b.opacity() < 255);
            b.stop_disappear_animator();
            assert_eq!(b.opacity(), 255);
            assert!(!b.is_disappearing());
        }
        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        assert_eq!(bar.lock().unwrap().opacity(), 255);
    }

    #[test]
    fn test_disappear_needs_control_distance() {
        let (_host, bar, _s) = bar(DisplayMode::Auto);
        let mut b = bar.lock().unwrap();
        b.set_control_distance(0.0);
        b.start_disappear_animator();
        assert!(!b.is_disappearing());
    }

    #[test]
    fn test_display_mode_transitions() {
        let (host, bar, _s) = bar(DisplayMode::Auto);
        let mut b = bar.lock().unwrap();
        b.set_display_mode(DisplayMode::Off);
        assert_eq!(b.opacity(), 0);
        assert_eq!(host.render_context().opacity, 0);

        b.set_display_mode(DisplayMode::On);
        assert_eq!(b.opacity(), 255);
        assert!(!b.is_disappearing());

        b.set_display_mode(DisplayMode::Auto);
        assert!(b.is_disappearing());
    }

    #[test]
    fn test_fling_moves_bar_and_finishes_once() {
        let (_host, bar, scheduler) = bar(DisplayMode::On);
        let ends = Arc::new(Mutex::new(0));
        {
            let mut b = bar.lock().unwrap();
            let count = ends.clone();
            b.on_scroll_end(move || *count.lock().unwrap() += 1);
            b.handle_drag_start(&GestureEvent::new());
            b.handle_drag_update(&GestureEvent::new().with_main_delta(10.0));
            b.handle_drag_end(&GestureEvent::new().with_main_velocity(300.0));
            assert!(b.is_fling_running());
        }

        AnimationScheduler::run_until_idle(&scheduler, 16.0, 600);

        let b = bar.lock().unwrap();
        assert!(!b.is_fling_running());
        assert!(b.current_offset() > 10.0);
        assert_eq!(*ends.lock().unwrap(), 1);
    }

    #[test]
    fn test_dropped_host_ignores_drags() {
        let (host, bar, _s) = bar(DisplayMode::On);
        drop(host);
        let mut b = bar.lock().unwrap();
        b.handle_drag_start(&GestureEvent::new());
        b.handle_drag_update(&GestureEvent::new().with_main_delta(10.0));
        assert!(!b.is_driving());
        assert_eq!(b.current_offset(), 0.0);
    }
}
