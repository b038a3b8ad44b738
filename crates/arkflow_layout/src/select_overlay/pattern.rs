//! Selection overlay pattern
//!
//! Tracks which handle is being dragged, keeps the handle hot zones and the
//! reverse flag in step with the handle rects, and decides when the menu
//! shows.
//!
//! ```text
//!            GRAB_FIRST            RELEASE / CANCEL
//!   Idle ───────────────► DraggingFirst ───────────► Idle
//!     │      GRAB_SECOND                RELEASE / CANCEL
//!     └─────────────────► DraggingSecond ──────────► Idle
//! ```
//!
//! A drag is claimed by hit-testing the point where the pan began; once
//! claimed it continues wherever the pointer goes.

use std::sync::{Arc, Mutex, Weak};

use arkflow_animation::{AnimationScheduler, CancelableTask, SharedScheduler};
use arkflow_core::events::{EventType, GestureEvent, TouchEvent, TouchType};
use arkflow_core::fsm::StateTransitions;
use arkflow_core::geometry::{great_not_equal, Rect};
use arkflow_core::gesture::{PanDirection, PanRecognizer};

use super::info::{MenuOption, SelectHandleInfo, SelectMenuInfo, SelectOverlayInfo};
use crate::config::SelectOverlayConfig;
use crate::host::{
    AccessibilityEventType, FrameNode, PROPERTY_UPDATE_LAYOUT, PROPERTY_UPDATE_MEASURE,
    PROPERTY_UPDATE_RENDER,
};

/// Events driving [`HandleDragState`]
pub mod handle_events {
    use arkflow_core::events::{event_types, EventType};

    /// Pan began inside the first handle's hot zone
    pub const GRAB_FIRST: EventType = 200;
    /// Pan began inside the second handle's hot zone
    pub const GRAB_SECOND: EventType = 201;
    pub const RELEASE: EventType = event_types::PAN_END;
    pub const CANCEL: EventType = event_types::PAN_CANCEL;
}

/// Which handle, if any, is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandleDragState {
    #[default]
    Idle,
    DraggingFirst,
    DraggingSecond,
}

impl HandleDragState {
    pub fn is_dragging(&self) -> bool {
        !matches!(self, HandleDragState::Idle)
    }

    /// `Some(true)` while the first handle is dragged, `Some(false)` for the second
    pub fn dragged_handle(&self) -> Option<bool> {
        match self {
            HandleDragState::Idle => None,
            HandleDragState::DraggingFirst => Some(true),
            HandleDragState::DraggingSecond => Some(false),
        }
    }
}

impl StateTransitions for HandleDragState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        use handle_events::*;
        match (self, event) {
            (HandleDragState::Idle, GRAB_FIRST) => Some(HandleDragState::DraggingFirst),
            (HandleDragState::Idle, GRAB_SECOND) => Some(HandleDragState::DraggingSecond),
            (HandleDragState::DraggingFirst | HandleDragState::DraggingSecond, RELEASE | CANCEL) => {
                Some(HandleDragState::Idle)
            }
            _ => None,
        }
    }
}

pub struct SelectOverlayPattern {
    self_weak: Weak<Mutex<SelectOverlayPattern>>,
    host: Weak<FrameNode>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    config: SelectOverlayConfig,
    info: SelectOverlayInfo,
    drag: HandleDragState,
    first_handle_region: Option<Rect>,
    second_handle_region: Option<Rect>,
    is_hidden_handle: bool,
    hidden_handle_task: CancelableTask,
}

impl SelectOverlayPattern {
    pub fn new(host: &Arc<FrameNode>, info: SelectOverlayInfo, config: SelectOverlayConfig) -> Arc<Mutex<Self>> {
        let pattern = Arc::new_cyclic(|weak| {
            Mutex::new(Self {
                self_weak: weak.clone(),
                host: Arc::downgrade(host),
                scheduler: Weak::new(),
                config,
                info,
                drag: HandleDragState::Idle,
                first_handle_region: None,
                second_handle_region: None,
                is_hidden_handle: false,
                hidden_handle_task: CancelableTask::new(),
            })
        });
        if let Ok(mut p) = pattern.lock() {
            p.update_handle_hot_zone();
            if !p.info.is_single_handle {
                // Initial orientation is not a change worth reporting
                p.info.handle_reverse = handles_reversed(&p.info.first_handle, &p.info.second_handle);
            }
        }
        pattern
    }

    /// Pan recognizer feeding handle drags into `pattern`
    pub fn pan_recognizer(pattern: &Arc<Mutex<Self>>) -> PanRecognizer {
        let mut pan = PanRecognizer::new(PanDirection::All);

        let weak = Arc::downgrade(pattern);
        pan.on_action_start(move |event| with_pattern(&weak, |p| p.handle_pan_start(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_update(move |event| with_pattern(&weak, |p| p.handle_pan_move(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_end(move |event| with_pattern(&weak, |p| p.handle_pan_end(event)));
        let weak = Arc::downgrade(pattern);
        pan.on_action_cancel(move |event| with_pattern(&weak, |p| p.handle_pan_end(event)));
        pan
    }

    pub fn set_scheduler(&mut self, scheduler: &SharedScheduler) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    pub fn config(&self) -> &SelectOverlayConfig {
        &self.config
    }

    pub fn info(&self) -> &SelectOverlayInfo {
        &self.info
    }

    pub fn drag_state(&self) -> HandleDragState {
        self.drag
    }

    pub fn is_first_handle_drag(&self) -> bool {
        self.drag == HandleDragState::DraggingFirst
    }

    pub fn is_second_handle_drag(&self) -> bool {
        self.drag == HandleDragState::DraggingSecond
    }

    pub fn first_handle_region(&self) -> Option<Rect> {
        self.first_handle_region
    }

    pub fn second_handle_region(&self) -> Option<Rect> {
        self.second_handle_region
    }

    pub fn is_menu_show(&self) -> bool {
        self.info.menu_info.menu_is_show
    }

    pub fn is_handle_show(&self) -> bool {
        !self.is_hidden_handle && (self.info.first_handle.is_show || self.info.second_handle.is_show)
    }

    pub fn is_hidden_handle(&self) -> bool {
        self.is_hidden_handle
    }

    pub fn handle_reverse(&self) -> bool {
        self.info.handle_reverse
    }

    /// Overwrite the reverse flag without notifying anyone
    pub fn set_handle_reverse(&mut self, reverse: bool) {
        self.info.handle_reverse = reverse;
    }

    // =========================================================================
    // Handle drag
    // =========================================================================

    pub fn handle_pan_start(&mut self, event: &GestureEvent) {
        if self.host.upgrade().is_none() {
            return;
        }
        self.stop_hidden_handle_task();

        // The start event arrives after the pan threshold; hit-test where it began
        let point = event.local_location - event.delta;
        let grab = if self.first_handle_region.is_some_and(|r| r.contains(point)) {
            handle_events::GRAB_FIRST
        } else if self.second_handle_region.is_some_and(|r| r.contains(point)) {
            handle_events::GRAB_SECOND
        } else {
            tracing::trace!(?point, "pan outside handle hot zones");
            return;
        };

        if !self.drag.apply(grab).changed() {
            return;
        }
        let Some(is_first) = self.drag.dragged_handle() else {
            return;
        };
        tracing::debug!(is_first, "handle drag start");
        if let Some(callback) = self.info.callbacks.on_handle_move_start.as_mut() {
            callback(is_first);
        }
    }

    pub fn handle_pan_move(&mut self, event: &GestureEvent) {
        let Some(is_first) = self.drag.dragged_handle() else {
            return;
        };
        let Some(host) = self.host.upgrade() else {
            return;
        };

        let handle = if is_first {
            &mut self.info.first_handle
        } else {
            &mut self.info.second_handle
        };
        handle.paint_rect += event.delta;
        let rect = handle.paint_rect;

        self.update_handle_hot_zone();
        host.mark_dirty_node(PROPERTY_UPDATE_LAYOUT);
        if let Some(callback) = self.info.callbacks.on_handle_move.as_mut() {
            callback(rect, is_first);
        }
        if !self.info.is_single_handle {
            self.check_handle_reverse();
        }
    }

    pub fn handle_pan_end(&mut self, _event: &GestureEvent) {
        let Some(is_first) = self.drag.dragged_handle() else {
            return;
        };
        self.drag.apply(handle_events::RELEASE);
        let Some(host) = self.host.upgrade() else {
            return;
        };

        let menu = &mut self.info.menu_info;
        if !menu.menu_is_show && !menu.menu_disable {
            menu.menu_is_show = true;
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        }
        let rect = if is_first {
            self.info.first_handle.paint_rect
        } else {
            self.info.second_handle.paint_rect
        };
        tracing::debug!(is_first, ?rect, "handle drag done");
        if self.info.menu_info.menu_is_show {
            if let Some(callback) = self.info.callbacks.on_handle_move_done.as_mut() {
                callback(rect, is_first);
            }
        }
    }

    /// Recompute which handle comes first in reading order
    ///
    /// Handles on the same line compare by left edge, otherwise by top edge.
    pub fn check_handle_reverse(&mut self) -> bool {
        let reverse = handles_reversed(&self.info.first_handle, &self.info.second_handle);
        if reverse != self.info.handle_reverse {
            self.info.handle_reverse = reverse;
            tracing::debug!(reverse, "handle reverse changed");
            if let Some(callback) = self.info.callbacks.on_handle_reverse.as_mut() {
                callback(reverse);
            }
        }
        reverse
    }

    /// Center a square hot zone on every draggable handle
    pub fn update_handle_hot_zone(&mut self) {
        let draggable = !self.info.is_single_handle && !self.info.is_handle_line_show;
        let hot_zone = self.config.handle_hot_zone;
        let region = |handle: &SelectHandleInfo| {
            (draggable && handle.is_show).then(|| Rect::from_center(handle.paint_rect.center(), hot_zone))
        };
        self.first_handle_region = region(&self.info.first_handle);
        self.second_handle_region = region(&self.info.second_handle);
    }

    // =========================================================================
    // Click and touch
    // =========================================================================

    pub fn handle_on_click(&mut self, event: &GestureEvent) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        host.on_accessibility_event(AccessibilityEventType::Click);
        if let Some(callback) = self.info.callbacks.on_click.as_mut() {
            callback(event.local_location);
        }
        if !self.info.is_single_handle || self.info.is_handle_line_show {
            return;
        }
        // Tapping a caret handle toggles its menu
        let menu = &mut self.info.menu_info;
        menu.menu_is_show = !menu.menu_is_show;
        host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        tracing::debug!(show = menu.menu_is_show, "caret menu toggled");
    }

    pub fn handle_on_touch(&mut self, event: &TouchEvent) {
        if self.host.upgrade().is_none() {
            return;
        }
        match event.touch_type {
            TouchType::Down => {
                self.stop_hidden_handle_task();
                self.reveal_handle();
            }
            TouchType::Up if self.info.is_single_handle => self.start_hidden_handle_task(),
            _ => {}
        }
    }

    // =========================================================================
    // Menu
    // =========================================================================

    pub fn show_or_hidden_menu(&mut self, is_hidden: bool) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        let any_handle = self.info.first_handle.is_show || self.info.second_handle.is_show;
        let menu = &mut self.info.menu_info;
        if is_hidden && menu.menu_is_show {
            menu.menu_is_show = false;
        } else if !is_hidden && !menu.menu_is_show && any_handle {
            menu.menu_is_show = true;
        } else {
            return;
        }
        tracing::debug!(show = menu.menu_is_show, "menu toggled");
        host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
    }

    /// Run the callback for `option`
    ///
    /// Every option except select-all closes the menu. Returns false when
    /// the menu is disabled or the option is not offered.
    pub fn dispatch_menu_option(&mut self, option: MenuOption) -> bool {
        let Some(host) = self.host.upgrade() else {
            return false;
        };
        let menu = self.info.menu_info;
        if menu.menu_disable || !menu.is_option_shown(option) {
            return false;
        }
        tracing::debug!(?option, "menu option");
        if let Some(callback) = self.info.callbacks.menu_callback_mut(option) {
            callback();
        }
        if option != MenuOption::SelectAll && menu.menu_is_show {
            self.info.menu_info.menu_is_show = false;
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        }
        true
    }

    // =========================================================================
    // Info updates
    // =========================================================================

    pub fn update_first_select_handle_info(&mut self, handle: SelectHandleInfo) {
        if self.info.first_handle == handle {
            return;
        }
        self.info.first_handle = handle;
        self.on_handles_changed();
    }

    pub fn update_second_select_handle_info(&mut self, handle: SelectHandleInfo) {
        if self.info.second_handle == handle {
            return;
        }
        self.info.second_handle = handle;
        self.on_handles_changed();
    }

    pub fn update_select_menu_info(&mut self, menu: SelectMenuInfo) {
        if self.info.menu_info == menu {
            return;
        }
        self.info.menu_info = menu;
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        }
    }

    fn on_handles_changed(&mut self) {
        if !self.info.is_single_handle {
            self.check_handle_reverse();
        }
        self.update_handle_hot_zone();
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
            host.on_accessibility_event(AccessibilityEventType::SelectionChange);
        }
    }

    // =========================================================================
    // Handle auto-hide
    // =========================================================================

    /// Hide the caret handle after a period without touches
    pub fn start_hidden_handle_task(&mut self) {
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        let weak = self.self_weak.clone();
        self.hidden_handle_task.post(&mut scheduler, self.config.hidden_handle_delay_ms, move || {
            with_pattern(&weak, |p| p.hidden_handle())
        });
        tracing::debug!(delay_ms = self.config.hidden_handle_delay_ms, "hidden handle armed");
    }

    pub fn stop_hidden_handle_task(&mut self) {
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    self.hidden_handle_task.cancel(&mut scheduler);
                }
            }
            None => self.hidden_handle_task.invalidate(),
        }
    }

    pub fn hidden_handle(&mut self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        if self.is_hidden_handle {
            return;
        }
        self.is_hidden_handle = true;
        tracing::debug!("handle hidden");
        host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
    }

    fn reveal_handle(&mut self) {
        if !self.is_hidden_handle {
            return;
        }
        self.is_hidden_handle = false;
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
        }
    }
}

/// Whether the first handle sits after the second in reading order
fn handles_reversed(first: &SelectHandleInfo, second: &SelectHandleInfo) -> bool {
    let first = first.paint_rect;
    let second = second.paint_rect;
    if same_line(first, second) {
        great_not_equal(first.left(), second.left())
    } else {
        great_not_equal(first.top(), second.top())
    }
}

fn same_line(a: Rect, b: Rect) -> bool {
    let (upper, lower) = if great_not_equal(a.top(), b.top()) { (b, a) } else { (a, b) };
    great_not_equal(upper.bottom(), lower.top() - 0.5)
}

fn with_pattern(weak: &Weak<Mutex<SelectOverlayPattern>>, f: impl FnOnce(&mut SelectOverlayPattern)) {
    if let Some(pattern) = weak.upgrade() {
        if let Ok(mut pattern) = pattern.lock() {
            f(&mut pattern);
        }
    }
}

impl std::fmt::Debug for SelectOverlayPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectOverlayPattern")
            .field("drag", &self.drag)
            .field("first_handle", &self.info.first_handle)
            .field("second_handle", &self.info.second_handle)
            .field("menu", &self.info.menu_info)
            .field("is_hidden_handle", &self.is_hidden_handle)
            .finish_non_exhaustive()
    }
}
