//! Scrollable pattern
//!
//! Owns a scrollable's offset state and resolves every delta through the
//! nested scroll protocol before applying what is left to its content.
//!
//! # Lifecycle
//!
//! ```text
//! drag start ─► on_scroll_start_recursive (self, then parent)
//! drag update ─► handle_scroll(delta, Update, Gesture) ─► parent? ─► content
//! drag end ─► handle_scroll_velocity ─► fling ─► (edge) spring-back
//!                                                 └─► on_scroll_end_recursive
//! ```
//!
//! Patterns live behind `Arc<Mutex<_>>`. Animation callbacks hold a weak
//! reference and re-validate it every frame; a child only ever locks its
//! parent, never the reverse.

use std::sync::{Arc, Mutex, Weak};

use arkflow_animation::{AnimationId, AnimationScheduler, FrictionMotion, SharedScheduler};
use arkflow_core::events::GestureEvent;
use arkflow_core::geometry::{near_zero, Axis};
use arkflow_core::gesture::{PanDirection, PanRecognizer};

use super::content::{ScrollSource, ScrollableContent};
use super::edge_effect::{EdgeEffect, ScrollableEdgeEffect};
use super::nested::{
    dispatch, NestableScrollContainer, NestedAction, NestedScrollMode, NestedScrollOptions,
    NestedState, ParentRef, ScrollResult, SharedContainer,
};
use crate::config::FlingConfig;
use crate::error::{Error, Result};
use crate::host::{AccessibilityEventType, FrameNode, PROPERTY_UPDATE_LAYOUT, PROPERTY_UPDATE_RENDER};
use crate::scroll_bar::{ScrollBarProxy, ScrollBarTarget};

/// Called after the content moved, with the applied delta
pub type ScrollCallback = Box<dyn FnMut(f32, ScrollSource) + Send>;
/// Scroll start / stop notification
pub type ScrollEventCallback = Box<dyn FnMut() + Send>;

/// Animation currently driving the offset
///
/// `generation` is captured by the animation's callbacks; callbacks of a
/// replaced motion see a different generation and do nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScrollMotion {
    Fling { id: AnimationId, generation: u64, last: f32 },
    SpringBack { id: AnimationId, generation: u64 },
}

impl ScrollMotion {
    fn id(&self) -> AnimationId {
        match self {
            ScrollMotion::Fling { id, .. } | ScrollMotion::SpringBack { id, .. } => *id,
        }
    }

    fn generation(&self) -> u64 {
        match self {
            ScrollMotion::Fling { generation, .. } | ScrollMotion::SpringBack { generation, .. } => *generation,
        }
    }
}

/// A scroll container taking part in nested scrolling
pub struct ScrollablePattern {
    self_weak: Weak<Mutex<ScrollablePattern>>,
    host: Weak<FrameNode>,
    axis: Axis,
    content: Box<dyn ScrollableContent>,
    nested: NestedScrollOptions,
    edge_effect: ScrollableEdgeEffect,
    parent: Option<ParentRef>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    fling: FlingConfig,
    proxy: Option<Arc<ScrollBarProxy>>,
    motion: Option<ScrollMotion>,
    motion_generation: u64,
    is_dragging: bool,
    is_scrolling: bool,
    /// Accumulated overshoot shown by a fade edge effect
    fade_intensity: f32,
    on_scroll: Option<ScrollCallback>,
    on_scroll_start: Option<ScrollEventCallback>,
    on_scroll_stop: Option<ScrollEventCallback>,
}

impl ScrollablePattern {
    pub fn new<C>(host: &Arc<FrameNode>, axis: Axis, content: C) -> Arc<Mutex<Self>>
    where
        C: ScrollableContent + 'static,
    {
        Arc::new_cyclic(|weak| {
            Mutex::new(Self {
                self_weak: weak.clone(),
                host: Arc::downgrade(host),
                axis,
                content: Box::new(content),
                nested: NestedScrollOptions::default(),
                edge_effect: ScrollableEdgeEffect::default(),
                parent: None,
                scheduler: Weak::new(),
                fling: FlingConfig::default(),
                proxy: None,
                motion: None,
                motion_generation: 0,
                is_dragging: false,
                is_scrolling: false,
                fade_intensity: 0.0,
                on_scroll: None,
                on_scroll_start: None,
                on_scroll_stop: None,
            })
        })
    }

    /// Pan recognizer feeding drags into `pattern`
    pub fn pan_recognizer(pattern: &Arc<Mutex<Self>>) -> PanRecognizer {
        let axis = pattern.lock().map(|p| p.axis).unwrap_or_default();
        let mut pan = PanRecognizer::new(PanDirection::from(axis));

        let weak = Arc::downgrade(pattern);
        pan.on_action_start(move |event| with_pattern(&weak, |p| p.handle_drag_start(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_update(move |event| with_pattern(&weak, |p| p.handle_drag_update(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_end(move |event| with_pattern(&weak, |p| p.handle_drag_end(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_cancel(move |_| {
            with_pattern(&weak, |p| p.handle_drag_end(&GestureEvent::new()))
        });
        pan
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn nested_scroll(&self) -> NestedScrollOptions {
        self.nested
    }

    pub fn set_nested_scroll(&mut self, options: NestedScrollOptions) {
        self.nested = options;
    }

    pub fn edge_effect(&self) -> EdgeEffect {
        self.edge_effect.effect()
    }

    pub fn set_edge_effect(&mut self, effect: impl Into<ScrollableEdgeEffect>) {
        self.edge_effect = effect.into();
    }

    /// Attach the scheduler driving flings and spring-backs
    pub fn set_scheduler(&mut self, scheduler: &SharedScheduler) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    pub fn set_fling_config(&mut self, config: FlingConfig) {
        self.edge_effect = self.edge_effect.with_spring(config.spring_config());
        self.fling = config;
    }

    /// Bind a scroll bar proxy so bars follow this content
    pub fn set_scroll_bar_proxy(&mut self, proxy: Arc<ScrollBarProxy>) {
        let target: Weak<Mutex<dyn ScrollBarTarget>> = self.self_weak.clone();
        proxy.register_scrollable_node(target);
        proxy.notify_scroll_bar(self.content.current_offset(), self.content.scrollable_distance());
        self.proxy = Some(proxy);
    }

    pub fn scroll_bar_proxy(&self) -> Option<&Arc<ScrollBarProxy>> {
        self.proxy.as_ref()
    }

    pub fn on_scroll<F: FnMut(f32, ScrollSource) + Send + 'static>(&mut self, f: F) {
        self.on_scroll = Some(Box::new(f));
    }

    pub fn on_scroll_start<F: FnMut() + Send + 'static>(&mut self, f: F) {
        self.on_scroll_start = Some(Box::new(f));
    }

    pub fn on_scroll_stop<F: FnMut() + Send + 'static>(&mut self, f: F) {
        self.on_scroll_stop = Some(Box::new(f));
    }

    // =========================================================================
    // Nested scroll parent
    // =========================================================================

    /// Delegate nested scrolling to `parent`
    ///
    /// The parent must scroll along the same axis.
    pub fn attach_to_parent<P>(&mut self, parent: &Arc<Mutex<P>>) -> Result<()>
    where
        P: NestableScrollContainer + 'static,
    {
        let parent: SharedContainer = parent.clone();
        if Arc::as_ptr(&parent) as *const () == self.self_weak.as_ptr() as *const () {
            return Err(Error::SelfParent);
        }

        let parent_axis = parent.lock().map(|p| p.axis()).unwrap_or(Axis::None);
        if parent_axis != self.axis {
            tracing::warn!(child = ?self.axis, parent = ?parent_axis, "nested scroll axis mismatch");
            return Err(Error::AxisMismatch {
                child: self.axis,
                parent: parent_axis,
            });
        }

        self.parent = Some(Arc::downgrade(&parent));
        tracing::debug!(axis = ?self.axis, "attached to nested scroll parent");
        Ok(())
    }

    pub fn detach_from_parent(&mut self) {
        self.parent = None;
    }

    pub fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    fn parent(&self) -> Option<SharedContainer> {
        self.parent.as_ref()?.upgrade()
    }

    // =========================================================================
    // Content state
    // =========================================================================

    pub fn current_offset(&self) -> f32 {
        self.content.current_offset()
    }

    pub fn scrollable_distance(&self) -> f32 {
        self.content.scrollable_distance()
    }

    pub fn set_scrollable_distance(&mut self, distance: f32) {
        self.content.set_scrollable_distance(distance);
        if let Some(proxy) = &self.proxy {
            proxy.notify_scroll_bar(self.content.current_offset(), self.content.scrollable_distance());
        }
    }

    pub fn is_at_top(&self) -> bool {
        self.content.is_at_top()
    }

    pub fn is_at_bottom(&self) -> bool {
        self.content.is_at_bottom()
    }

    pub fn is_out_of_boundary(&self) -> bool {
        self.content.is_out_of_boundary()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Between scroll start and scroll end
    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// A fling or spring-back is running
    pub fn is_animating(&self) -> bool {
        self.motion.is_some()
    }

    pub fn fade_intensity(&self) -> f32 {
        self.fade_intensity
    }

    fn over_scroll_toward(&self, delta: f32) -> f32 {
        self.content.over_scroll_offset(delta).toward(delta)
    }

    /// Move the content and tell everyone who follows it
    fn apply_offset(&mut self, delta: f32, source: ScrollSource) -> bool {
        let Some(host) = self.host.upgrade() else {
            return false;
        };
        if !self.content.update_current_offset(delta, source) {
            return false;
        }
        host.update_offset(self.axis.offset(self.content.current_offset()));
        host.mark_dirty_node(PROPERTY_UPDATE_LAYOUT);
        // Bar-driven moves already reposition the bar
        if !source.is_bar() {
            if let Some(proxy) = &self.proxy {
                proxy.notify_scroll_bar(self.content.current_offset(), self.content.scrollable_distance());
            }
        }
        if let Some(callback) = self.on_scroll.as_mut() {
            callback(delta, source);
        }
        true
    }

    /// Resolve an overshoot with the local edge effect
    fn absorb(&mut self, delta: f32, over: f32, source: ScrollSource) -> ScrollResult {
        let absorption = self.edge_effect.absorb(delta, over);
        self.apply_offset(absorption.applied, source);
        if absorption.faded > 0.0 {
            self.fade_intensity += absorption.faded;
            if let Some(host) = self.host.upgrade() {
                host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
            }
        }
        ScrollResult::new(absorption.rejected, true)
    }

    /// Absorb whatever the parent left of a relayed overshoot
    fn absorb_relayed(&mut self, result: ScrollResult, source: ScrollSource) -> ScrollResult {
        if near_zero(result.remain) || !self.edge_effect.absorbs() {
            return result;
        }
        let over = self.over_scroll_toward(result.remain);
        self.absorb(result.remain, over, source)
    }

    // =========================================================================
    // Nested scroll negotiation
    // =========================================================================

    /// Resolve `offset` between this node and its parent chain
    pub fn handle_scroll(&mut self, offset: f32, source: ScrollSource, state: NestedState) -> ScrollResult {
        if near_zero(offset) {
            return ScrollResult::CONSUMED;
        }

        let parent = self.parent();
        let action = dispatch(self.nested.mode_for(offset), state, parent.is_some());

        let result = match (action, parent) {
            (NestedAction::SelfOnly, _) | (_, None) => self.scroll_self_only(offset, source, state),
            (NestedAction::SelfFirst, Some(parent)) => {
                self.scroll_self_first(&parent, offset, source, state)
            }
            (NestedAction::ParentFirst, Some(parent)) => {
                self.scroll_parent_first(&parent, offset, source, state)
            }
            (NestedAction::Parallel, Some(parent)) => self.scroll_parallel(&parent, offset, source),
            (NestedAction::RelayOverScroll, Some(parent)) => {
                let result = parent_scroll(&parent, offset, source, NestedState::ChildOverScroll);
                self.absorb_relayed(result, source)
            }
            (NestedAction::AbsorbOverScroll, Some(parent)) => {
                if self.edge_effect.absorbs() {
                    let over = self.over_scroll_toward(offset);
                    self.absorb(offset, over, source)
                } else {
                    parent_scroll(&parent, offset, source, NestedState::ChildOverScroll)
                }
            }
        };

        tracing::trace!(
            offset,
            ?source,
            ?state,
            ?action,
            remain = result.remain,
            reach_edge = result.reach_edge,
            "handle scroll"
        );
        result
    }

    fn scroll_self_only(&mut self, offset: f32, source: ScrollSource, state: NestedState) -> ScrollResult {
        let over = self.over_scroll_toward(offset);
        if near_zero(over) {
            self.apply_offset(offset, source);
            return ScrollResult::CONSUMED;
        }
        if state == NestedState::ChildScroll {
            // The relaying child decides what happens to the overshoot
            self.apply_offset(offset - over, source);
            return ScrollResult::new(over, true);
        }
        self.absorb(offset, over, source)
    }

    fn scroll_self_first(
        &mut self,
        parent: &SharedContainer,
        offset: f32,
        source: ScrollSource,
        state: NestedState,
    ) -> ScrollResult {
        let over = self.over_scroll_toward(offset);
        if near_zero(over) {
            self.apply_offset(offset, source);
            return ScrollResult::CONSUMED;
        }

        self.apply_offset(offset - over, source);
        let result = parent_scroll(parent, over, source, NestedState::ChildScroll);
        if near_zero(result.remain) {
            return ScrollResult::CONSUMED;
        }
        if state == NestedState::ChildScroll {
            return result;
        }

        // Nobody scrolled it away: offer it as overscroll, parent first
        let result = parent_scroll(parent, result.remain, source, NestedState::ChildOverScroll);
        self.absorb_relayed(result, source)
    }

    fn scroll_parent_first(
        &mut self,
        parent: &SharedContainer,
        offset: f32,
        source: ScrollSource,
        state: NestedState,
    ) -> ScrollResult {
        if state == NestedState::ChildScroll && self.content.over_scroll_offset(offset).is_zero() {
            self.apply_offset(offset, source);
            return ScrollResult::CONSUMED;
        }

        let result = parent_scroll(parent, offset, source, NestedState::ChildScroll);
        if near_zero(result.remain) {
            return ScrollResult::CONSUMED;
        }

        let remain = result.remain;
        let over = self.over_scroll_toward(remain);
        self.apply_offset(remain - over, source);
        if near_zero(over) {
            return ScrollResult::CONSUMED;
        }
        if state == NestedState::ChildScroll {
            return ScrollResult::new(over, true);
        }
        if !self.edge_effect.absorbs() {
            return parent_scroll(parent, over, source, NestedState::ChildOverScroll);
        }
        // In-bounds part is applied already, only the overshoot is left
        self.absorb(over, over, source)
    }

    fn scroll_parallel(&mut self, parent: &SharedContainer, offset: f32, source: ScrollSource) -> ScrollResult {
        let parent_result = parent_scroll(parent, offset, source, NestedState::ChildScroll);

        let over = self.over_scroll_toward(offset);
        if near_zero(over) {
            self.apply_offset(offset, source);
            return ScrollResult::CONSUMED;
        }

        let local = self.absorb(offset, over, source);
        if near_zero(local.remain) || !near_zero(parent_result.remain) {
            local
        } else {
            ScrollResult::CONSUMED
        }
    }

    /// Decide who animates a fling of `velocity`
    ///
    /// Returns false when nobody will.
    pub fn handle_scroll_velocity(&mut self, velocity: f32) -> bool {
        if self.scheduler.upgrade().is_none() {
            return false;
        }

        let not_at_edge = (velocity > 0.0 && !self.content.is_at_top())
            || (velocity < 0.0 && !self.content.is_at_bottom());
        if not_at_edge {
            return self.start_fling(velocity);
        }

        if self.nested.mode_for(velocity) == NestedScrollMode::SelfFirst {
            if let Some(parent) = self.parent() {
                let accepted = parent
                    .lock()
                    .map(|mut p| p.handle_scroll_velocity(velocity))
                    .unwrap_or(false);
                if accepted {
                    return true;
                }
            }
        }

        if self.edge_effect.effect() == EdgeEffect::Spring {
            self.start_spring_back(velocity);
            return true;
        }
        false
    }

    pub fn on_scroll_start_recursive(&mut self, position: f32) {
        self.fire_scroll_start();
        if self.nested.need_parent() {
            if let Some(parent) = self.parent() {
                if let Ok(mut parent) = parent.lock() {
                    parent.on_scroll_start_recursive(position);
                }
            }
        }
    }

    pub fn on_scroll_end_recursive(&mut self) {
        // A running fling or spring-back reports the end when it settles
        if self.motion.is_some() {
            return;
        }
        self.fire_scroll_stop();
        if self.nested.need_parent() {
            if let Some(parent) = self.parent() {
                if let Ok(mut parent) = parent.lock() {
                    parent.on_scroll_end_recursive();
                }
            }
        }
    }

    fn fire_scroll_start(&mut self) {
        if self.is_scrolling {
            return;
        }
        self.is_scrolling = true;
        tracing::debug!(offset = self.content.current_offset(), "scroll start");
        if let Some(host) = self.host.upgrade() {
            host.on_accessibility_event(AccessibilityEventType::ScrollStart);
        }
        if let Some(callback) = self.on_scroll_start.as_mut() {
            callback();
        }
        if let Some(proxy) = &self.proxy {
            proxy.stop_scroll_bar_animator();
        }
    }

    fn fire_scroll_stop(&mut self) {
        if !self.is_scrolling {
            return;
        }
        self.is_scrolling = false;
        self.fade_intensity = 0.0;
        tracing::debug!(offset = self.content.current_offset(), "scroll end");
        if let Some(host) = self.host.upgrade() {
            host.on_accessibility_event(AccessibilityEventType::ScrollEnd);
        }
        if let Some(callback) = self.on_scroll_stop.as_mut() {
            callback();
        }
        if let Some(proxy) = &self.proxy {
            proxy.start_scroll_bar_animator();
        }
    }

    // =========================================================================
    // Drag gesture
    // =========================================================================

    pub fn handle_drag_start(&mut self, event: &GestureEvent) {
        if self.host.upgrade().is_none() {
            return;
        }
        self.stop_motion();
        self.is_dragging = true;
        let position = self.axis.main(event.local_location);
        self.on_scroll_start_recursive(position);
    }

    pub fn handle_drag_update(&mut self, event: &GestureEvent) {
        if !self.is_dragging || self.host.upgrade().is_none() {
            return;
        }
        let source = if event.input_event_type.is_axis() {
            ScrollSource::Axis
        } else {
            ScrollSource::Update
        };
        self.handle_scroll(event.main_delta, source, NestedState::Gesture);
    }

    pub fn handle_drag_end(&mut self, event: &GestureEvent) {
        if !self.is_dragging {
            return;
        }
        self.is_dragging = false;
        if self.host.upgrade().is_none() {
            return;
        }

        let velocity = event.main_velocity;
        if velocity.abs() > self.fling.velocity_threshold {
            self.handle_scroll_velocity(velocity);
        } else if self.content.is_out_of_boundary() {
            self.start_spring_back(0.0);
        }
        // Nothing animates here (or a parent took the fling)
        if self.motion.is_none() {
            self.finish_scroll();
        }
    }

    fn finish_scroll(&mut self) {
        self.on_scroll_end_recursive();
    }

    // =========================================================================
    // Fling and spring-back
    // =========================================================================

    fn start_fling(&mut self, velocity: f32) -> bool {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return false;
        };
        self.stop_motion_locked(&mut scheduler);

        let start = self.content.current_offset();
        let motion = FrictionMotion::new(self.fling.friction, start, velocity)
            .with_velocity_threshold(self.fling.velocity_threshold);

        let generation = self.next_motion_generation();
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            motion,
            move |value| with_pattern(&frame, |p| p.on_fling_frame(generation, value)),
            move || with_pattern(&finish, |p| p.on_motion_finished(generation)),
        );
        self.motion = Some(ScrollMotion::Fling {
            id,
            generation,
            last: start,
        });
        tracing::debug!(velocity, start, "fling started");
        true
    }

    fn next_motion_generation(&mut self) -> u64 {
        self.motion_generation += 1;
        self.motion_generation
    }

    fn owns_motion(&self, generation: u64) -> bool {
        self.motion.is_some_and(|m| m.generation() == generation)
    }

    fn on_fling_frame(&mut self, generation: u64, value: f32) {
        let Some(ScrollMotion::Fling { id, last, .. }) = self.motion else {
            return;
        };
        if !self.owns_motion(generation) {
            return;
        }
        self.motion = Some(ScrollMotion::Fling {
            id,
            generation,
            last: value,
        });
        let delta = value - last;
        if near_zero(delta) {
            return;
        }

        let result = self.handle_scroll(delta, ScrollSource::Animation, NestedState::Gesture);
        if !result.reach_edge && !self.content.is_out_of_boundary() {
            return;
        }

        let velocity = self.motion_velocity(id);
        tracing::debug!(velocity, offset = self.content.current_offset(), "fling reached edge");
        self.stop_motion();
        if self.content.is_out_of_boundary() && self.start_spring_back(velocity) {
            return;
        }
        self.finish_scroll();
    }

    fn motion_velocity(&self, id: AnimationId) -> f32 {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return 0.0;
        };
        let velocity = match scheduler.lock() {
            Ok(scheduler) => scheduler.animation_velocity(id).unwrap_or(0.0),
            Err(_) => 0.0,
        };
        velocity
    }

    fn start_spring_back(&mut self, velocity: f32) -> bool {
        let offset = self.content.current_offset();
        let rest = self.content.rest_offset();
        let Some(spring) = self.edge_effect.spring_back(offset, rest, velocity) else {
            return false;
        };
        let Some(scheduler) = self.scheduler.upgrade() else {
            return false;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return false;
        };
        self.stop_motion_locked(&mut scheduler);

        let generation = self.next_motion_generation();
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            spring,
            move |value| with_pattern(&frame, |p| p.on_spring_frame(generation, value)),
            move || with_pattern(&finish, |p| p.on_motion_finished(generation)),
        );
        self.motion = Some(ScrollMotion::SpringBack { id, generation });
        tracing::debug!(offset, rest, velocity, "spring back");
        true
    }

    fn on_spring_frame(&mut self, generation: u64, value: f32) {
        if !self.owns_motion(generation) {
            return;
        }
        let delta = value - self.content.current_offset();
        self.apply_offset(delta, ScrollSource::AnimationSpring);
    }

    fn on_motion_finished(&mut self, generation: u64) {
        if !self.owns_motion(generation) {
            return;
        }
        let Some(motion) = self.motion.take() else {
            return;
        };
        match motion {
            ScrollMotion::Fling { .. } => {
                if self.content.is_out_of_boundary() && self.start_spring_back(0.0) {
                    return;
                }
            }
            ScrollMotion::SpringBack { .. } => {
                let delta = self.content.rest_offset() - self.content.current_offset();
                self.apply_offset(delta, ScrollSource::AnimationSpring);
            }
        }
        self.finish_scroll();
    }

    fn stop_motion(&mut self) {
        if self.motion.is_none() {
            return;
        }
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    self.stop_motion_locked(&mut scheduler);
                }
            }
            None => self.motion = None,
        }
    }

    fn stop_motion_locked(&mut self, scheduler: &mut AnimationScheduler) {
        if let Some(motion) = self.motion.take() {
            scheduler.stop_animation(motion.id());
        }
    }
}

fn with_pattern(weak: &Weak<Mutex<ScrollablePattern>>, f: impl FnOnce(&mut ScrollablePattern)) {
    if let Some(pattern) = weak.upgrade() {
        if let Ok(mut pattern) = pattern.lock() {
            f(&mut pattern);
        }
    }
}

fn parent_scroll(
    parent: &SharedContainer,
    offset: f32,
    source: ScrollSource,
    state: NestedState,
) -> ScrollResult {
    match parent.lock() {
        Ok(mut parent) => parent.handle_scroll(offset, source, state),
        Err(_) => ScrollResult::new(offset, true),
    }
}

impl NestableScrollContainer for ScrollablePattern {
    fn axis(&self) -> Axis {
        self.axis
    }

    fn handle_scroll(&mut self, offset: f32, source: ScrollSource, state: NestedState) -> ScrollResult {
        ScrollablePattern::handle_scroll(self, offset, source, state)
    }

    fn handle_scroll_velocity(&mut self, velocity: f32) -> bool {
        ScrollablePattern::handle_scroll_velocity(self, velocity)
    }

    fn on_scroll_start_recursive(&mut self, position: f32) {
        ScrollablePattern::on_scroll_start_recursive(self, position)
    }

    fn on_scroll_end_recursive(&mut self) {
        ScrollablePattern::on_scroll_end_recursive(self)
    }
}

impl ScrollBarTarget for ScrollablePattern {
    fn scroll_by_bar(&mut self, offset: f32, source: ScrollSource) -> bool {
        if near_zero(offset) {
            return false;
        }
        // A bar never drags content past its edges
        let over = self.over_scroll_toward(offset);
        self.apply_offset(offset - over, source)
    }

    fn on_bar_scroll_start(&mut self) {
        self.stop_motion();
        self.fire_scroll_start();
    }

    fn on_bar_scroll_end(&mut self) {
        self.fire_scroll_stop();
    }
}

impl std::fmt::Debug for ScrollablePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollablePattern")
            .field("axis", &self.axis)
            .field("offset", &self.content.current_offset())
            .field("nested", &self.nested)
            .field("edge_effect", &self.edge_effect.effect())
            .field("motion", &self.motion)
            .finish_non_exhaustive()
    }
}
