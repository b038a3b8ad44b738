//! Selection overlay node
//!
//! Visual side of a selection overlay: which menu options are laid out in
//! the main menu and which overflow into the extension menu, plus the
//! opacity animations for showing and hiding the overlay.
//!
//! The node reads its pattern; the pattern never calls back into the node.

use std::sync::{Arc, Mutex, Weak};

use arkflow_animation::{AnimationId, AnimationScheduler, Easing, SharedScheduler, Tween};
use arkflow_core::geometry::near_equal;
use smallvec::SmallVec;

use super::info::MenuOption;
use super::pattern::SelectOverlayPattern;
use crate::config::SelectOverlayConfig;
use crate::host::{FrameNode, PROPERTY_UPDATE_MEASURE, PROPERTY_UPDATE_RENDER};

/// Options laid out in the main menu before the rest overflow
pub const MAX_MAIN_OPTIONS: usize = 3;

type Options = SmallVec<[MenuOption; 4]>;

pub struct SelectOverlayNode {
    self_weak: Weak<Mutex<SelectOverlayNode>>,
    host: Weak<FrameNode>,
    pattern: Weak<Mutex<SelectOverlayPattern>>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
    config: SelectOverlayConfig,
    main_options: Options,
    extension_options: Options,
    is_extension_menu_show: bool,
    menu_opacity: f32,
    handle_opacity: f32,
    extension_opacity: f32,
    overlay_animation: Option<AnimationId>,
    extension_animation: Option<AnimationId>,
}

impl SelectOverlayNode {
    pub fn new(
        host: &Arc<FrameNode>,
        pattern: &Arc<Mutex<SelectOverlayPattern>>,
        config: SelectOverlayConfig,
    ) -> Arc<Mutex<Self>> {
        let node = Arc::new_cyclic(|weak| {
            Mutex::new(Self {
                self_weak: weak.clone(),
                host: Arc::downgrade(host),
                pattern: Arc::downgrade(pattern),
                scheduler: Weak::new(),
                config,
                main_options: Options::new(),
                extension_options: Options::new(),
                is_extension_menu_show: false,
                menu_opacity: 0.0,
                handle_opacity: 0.0,
                extension_opacity: 0.0,
                overlay_animation: None,
                extension_animation: None,
            })
        });
        if let Ok(mut n) = node.lock() {
            n.update_menu_options();
        }
        node
    }

    pub fn set_scheduler(&mut self, scheduler: &SharedScheduler) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    /// Rebuild the option lists from the pattern's menu info
    pub fn update_menu_options(&mut self) {
        let Some(pattern) = self.pattern.upgrade() else {
            return;
        };
        let options = match pattern.lock() {
            Ok(pattern) => pattern.info().menu_info.options(),
            Err(_) => return,
        };
        let split = options.len().min(MAX_MAIN_OPTIONS);
        self.main_options = options[..split].iter().copied().collect();
        self.extension_options = options[split..].iter().copied().collect();
        if self.extension_options.is_empty() {
            self.is_extension_menu_show = false;
            self.extension_opacity = 0.0;
        }
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_MEASURE);
        }
    }

    pub fn main_options(&self) -> &[MenuOption] {
        &self.main_options
    }

    pub fn extension_options(&self) -> &[MenuOption] {
        &self.extension_options
    }

    pub fn has_extension_menu(&self) -> bool {
        !self.extension_options.is_empty()
    }

    pub fn is_extension_menu_show(&self) -> bool {
        self.is_extension_menu_show
    }

    pub fn menu_opacity(&self) -> f32 {
        self.menu_opacity
    }

    pub fn handle_opacity(&self) -> f32 {
        self.handle_opacity
    }

    pub fn extension_opacity(&self) -> f32 {
        self.extension_opacity
    }

    pub fn is_animating(&self) -> bool {
        self.overlay_animation.is_some() || self.extension_animation.is_some()
    }

    // =========================================================================
    // Show / hide
    // =========================================================================

    pub fn show_select_overlay(&mut self, animate: bool) {
        if self.host.upgrade().is_none() {
            return;
        }
        tracing::debug!(animate, "show select overlay");
        let scheduler = if animate { self.scheduler.upgrade() } else { None };
        let Some(scheduler) = scheduler else {
            self.stop_overlay_animation();
            self.set_overlay_opacity(1.0);
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        self.stop_overlay_animation_locked(&mut scheduler);

        let fade = Tween::new(self.menu_opacity, 1.0, self.config.menu_animation_ms)
            .with_easing(Easing::FastOutSlowIn);
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            fade,
            move |value| with_node(&frame, |n| n.set_overlay_opacity(value)),
            move || {
                with_node(&finish, |n| {
                    n.overlay_animation = None;
                    n.set_overlay_opacity(1.0);
                })
            },
        );
        self.overlay_animation = Some(id);
    }

    /// Fade the overlay out, then run `on_finished`
    ///
    /// `on_finished` is dropped without running if a show interrupts the fade.
    pub fn hide_select_overlay<F>(&mut self, on_finished: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.host.upgrade().is_none() {
            return;
        }
        tracing::debug!("hide select overlay");
        let Some(scheduler) = self.scheduler.upgrade() else {
            self.stop_overlay_animation();
            self.set_overlay_opacity(0.0);
            on_finished();
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        self.stop_overlay_animation_locked(&mut scheduler);

        let fade = Tween::new(self.menu_opacity, 0.0, self.config.menu_animation_ms)
            .with_easing(Easing::FastOutSlowIn);
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            fade,
            move |value| with_node(&frame, |n| n.set_overlay_opacity(value)),
            move || {
                with_node(&finish, |n| {
                    n.overlay_animation = None;
                    n.set_overlay_opacity(0.0);
                });
                on_finished();
            },
        );
        self.overlay_animation = Some(id);
    }

    /// Switch between the main menu and the extension menu
    pub fn more_or_back_animation(&mut self, is_more: bool) {
        if self.host.upgrade().is_none() || self.is_extension_menu_show == is_more {
            return;
        }
        if is_more && self.extension_options.is_empty() {
            return;
        }
        self.is_extension_menu_show = is_more;
        let target = if is_more { 1.0 } else { 0.0 };
        tracing::debug!(is_more, "extension menu");

        let Some(scheduler) = self.scheduler.upgrade() else {
            self.set_extension_opacity(target);
            return;
        };
        let Ok(mut scheduler) = scheduler.lock() else {
            return;
        };
        if let Some(id) = self.extension_animation.take() {
            scheduler.stop_animation(id);
        }
        let fade = Tween::new(self.extension_opacity, target, self.config.menu_animation_ms)
            .with_easing(Easing::FastOutSlowIn);
        let frame = self.self_weak.clone();
        let finish = self.self_weak.clone();
        let id = scheduler.start_animation(
            fade,
            move |value| with_node(&frame, |n| n.set_extension_opacity(value)),
            move || {
                with_node(&finish, |n| {
                    n.extension_animation = None;
                    n.set_extension_opacity(target);
                })
            },
        );
        self.extension_animation = Some(id);
    }

    fn stop_overlay_animation(&mut self) {
        if self.overlay_animation.is_none() {
            return;
        }
        match self.scheduler.upgrade() {
            Some(scheduler) => {
                if let Ok(mut scheduler) = scheduler.lock() {
                    self.stop_overlay_animation_locked(&mut scheduler);
                }
            }
            None => self.overlay_animation = None,
        }
    }

    fn stop_overlay_animation_locked(&mut self, scheduler: &mut AnimationScheduler) {
        if let Some(id) = self.overlay_animation.take() {
            scheduler.stop_animation(id);
        }
    }

    fn set_overlay_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if near_equal(opacity, self.menu_opacity) && near_equal(opacity, self.handle_opacity) {
            return;
        }
        self.menu_opacity = opacity;
        self.handle_opacity = opacity;
        if let Some(host) = self.host.upgrade() {
            host.update_opacity((opacity * 255.0).round() as u8);
            host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
        }
    }

    fn set_extension_opacity(&mut self, opacity: f32) {
        self.extension_opacity = opacity.clamp(0.0, 1.0);
        if let Some(host) = self.host.upgrade() {
            host.mark_dirty_node(PROPERTY_UPDATE_RENDER);
        }
    }
}

fn with_node(weak: &Weak<Mutex<SelectOverlayNode>>, f: impl FnOnce(&mut SelectOverlayNode)) {
    if let Some(node) = weak.upgrade() {
        if let Ok(mut node) = node.lock() {
            f(&mut node);
        }
    }
}

impl std::fmt::Debug for SelectOverlayNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectOverlayNode")
            .field("main_options", &self.main_options)
            .field("extension_options", &self.extension_options)
            .field("is_extension_menu_show", &self.is_extension_menu_show)
            .field("menu_opacity", &self.menu_opacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select_overlay::info::{SelectMenuInfo, SelectOverlayInfo};
    use arkflow_core::geometry::Rect;

    fn node(menu: SelectMenuInfo) -> (Arc<FrameNode>, Arc<Mutex<SelectOverlayPattern>>, Arc<Mutex<SelectOverlayNode>>, SharedScheduler) {
        let host = FrameNode::new("SelectOverlay");
        let info = SelectOverlayInfo::new(Rect::new(0.0, 0.0, 2.0, 20.0), Rect::new(50.0, 0.0, 2.0, 20.0))
            .with_menu(menu);
        let pattern = SelectOverlayPattern::new(&host, info, SelectOverlayConfig::default());
        let node = SelectOverlayNode::new(&host, &pattern, SelectOverlayConfig::default());
        let scheduler = AnimationScheduler::shared();
        node.lock().unwrap().set_scheduler(&scheduler);
        (host, pattern, node, scheduler)
    }

    #[test]
    fn test_options_overflow_into_extension_menu() {
        let (_host, pattern, node, _s) = node(SelectMenuInfo::shown());
        {
            let n = node.lock().unwrap();
            assert_eq!(n.main_options(), &[MenuOption::Cut, MenuOption::Copy, MenuOption::Paste]);
            assert_eq!(n.extension_options(), &[MenuOption::SelectAll]);
        }

        pattern.lock().unwrap().update_select_menu_info(SelectMenuInfo {
            show_cut: false,
            ..SelectMenuInfo::shown()
        });
        let mut n = node.lock().unwrap();
        n.update_menu_options();
        assert_eq!(n.main_options().len(), 3);
        assert!(!n.has_extension_menu());
    }

    #[test]
    fn test_show_then_hide_runs_callback_after_fade() {
        let (host, _pattern, node, scheduler) = node(SelectMenuInfo::shown());
        node.lock().unwrap().show_select_overlay(true);
        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        assert_eq!(node.lock().unwrap().menu_opacity(), 1.0);
        assert_eq!(host.render_context().opacity, 255);

        let hidden = Arc::new(Mutex::new(false));
        let flag = hidden.clone();
        node.lock()
            .unwrap()
            .hide_select_overlay(move || *flag.lock().unwrap() = true);
        AnimationScheduler::tick(&scheduler, 16.0);
        assert!(!*hidden.lock().unwrap());

        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        assert!(*hidden.lock().unwrap());
        let n = node.lock().unwrap();
        assert_eq!(n.menu_opacity(), 0.0);
        assert_eq!(n.handle_opacity(), 0.0);
        assert!(!n.is_animating());
    }

    #[test]
    fn test_show_without_animation_is_immediate() {
        let (_host, _pattern, node, scheduler) = node(SelectMenuInfo::shown());
        let mut n = node.lock().unwrap();
        n.show_select_overlay(false);
        assert_eq!(n.menu_opacity(), 1.0);
        assert!(!scheduler.lock().unwrap().has_pending_work());
    }

    #[test]
    fn test_more_and_back() {
        let (_host, _pattern, node, scheduler) = node(SelectMenuInfo::shown());
        node.lock().unwrap().more_or_back_animation(true);
        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        {
            let n = node.lock().unwrap();
            assert!(n.is_extension_menu_show());
            assert_eq!(n.extension_opacity(), 1.0);
        }

        node.lock().unwrap().more_or_back_animation(false);
        AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
        let n = node.lock().unwrap();
        assert!(!n.is_extension_menu_show());
        assert_eq!(n.extension_opacity(), 0.0);
    }

    #[test]
    fn test_more_without_extension_options_is_ignored() {
        let (_host, _pattern, node, _s) = node(SelectMenuInfo {
            show_copy_all: false,
            ..SelectMenuInfo::shown()
        });
        let mut n = node.lock().unwrap();
        n.more_or_back_animation(true);
        assert!(!n.is_extension_menu_show());
    }
}
