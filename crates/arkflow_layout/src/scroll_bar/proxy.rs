//! Scroll bar proxy
//!
//! The proxy links one scrollable with the bars that represent it. It only
//! holds weak references, so either side can go away first; dead entries
//! are pruned as they are found.
//!
//! The proxy never holds its own lock while calling out. A bar that is
//! already locked when the content moves is the bar driving that move and
//! is skipped.

use std::sync::{Arc, Mutex, Weak};

use arkflow_core::geometry::near_zero;
use smallvec::SmallVec;

use super::pattern::ScrollBarPattern;
use super::DisplayMode;
use crate::scrollable::ScrollSource;

/// Content side of a proxy
pub trait ScrollBarTarget: Send {
    /// Move the content by `offset` (content space); false when nothing moved
    fn scroll_by_bar(&mut self, offset: f32, source: ScrollSource) -> bool;

    fn on_bar_scroll_start(&mut self);

    fn on_bar_scroll_end(&mut self);
}

type TargetRef = Weak<Mutex<dyn ScrollBarTarget>>;
type BarRef = Weak<Mutex<ScrollBarPattern>>;
type Bars = SmallVec<[Arc<Mutex<ScrollBarPattern>>; 2]>;

#[derive(Default)]
struct ProxyInner {
    target: Option<TargetRef>,
    bars: SmallVec<[BarRef; 2]>,
}

/// Shared link between a scrollable and its scroll bars
#[derive(Default)]
pub struct ScrollBarProxy {
    inner: Mutex<ProxyInner>,
}

impl ScrollBarProxy {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register_scrollable_node(&self, target: TargetRef) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.target = Some(target);
        }
    }

    pub fn unregister_scrollable_node(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.target = None;
        }
    }

    pub fn register_scroll_bar(&self, bar: BarRef) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        if !inner.bars.iter().any(|b| b.ptr_eq(&bar)) {
            inner.bars.push(bar);
        }
    }

    pub fn unregister_scroll_bar(&self, bar: &BarRef) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.bars.retain(|b| !b.ptr_eq(bar));
        }
    }

    pub fn has_scrollable_node(&self) -> bool {
        self.target().is_some()
    }

    /// Number of bars still alive
    pub fn scroll_bar_count(&self) -> usize {
        self.live_bars().len()
    }

    fn target(&self) -> Option<Arc<Mutex<dyn ScrollBarTarget>>> {
        self.inner.lock().ok()?.target.as_ref()?.upgrade()
    }

    fn live_bars(&self) -> Bars {
        let Ok(mut inner) = self.inner.lock() else {
            return Bars::new();
        };
        inner.bars.retain(|b| b.strong_count() > 0);
        inner.bars.iter().filter_map(Weak::upgrade).collect()
    }

    // =========================================================================
    // Bar -> content
    // =========================================================================

    /// Move the content by a bar-space `distance`
    pub fn notify_scrollable_node(&self, distance: f32, source: ScrollSource, bar: &ScrollBarPattern) -> bool {
        let Some(target) = self.target() else {
            return false;
        };
        let value = bar_to_content(distance, bar.control_distance(), bar.scrollable_distance());
        tracing::trace!(distance, value, ?source, "bar drives content");
        let Ok(mut target) = target.lock() else {
            return false;
        };
        target.scroll_by_bar(value, source)
    }

    pub fn notify_scroll_start(&self) {
        if let Some(target) = self.target() {
            if let Ok(mut target) = target.lock() {
                target.on_bar_scroll_start();
            }
        }
    }

    pub fn notify_scroll_stop(&self) {
        if let Some(target) = self.target() {
            if let Ok(mut target) = target.lock() {
                target.on_bar_scroll_end();
            }
        }
    }

    // =========================================================================
    // Content -> bars
    // =========================================================================

    /// Reposition every bar after the content moved
    pub fn notify_scroll_bar(&self, content_offset: f32, control_distance: f32) {
        for bar in self.live_bars() {
            if let Ok(mut bar) = bar.try_lock() {
                bar.sync_with_content(content_offset, control_distance);
            }
        }
    }

    /// Content stopped scrolling: auto bars may fade out
    pub fn start_scroll_bar_animator(&self) {
        for bar in self.live_bars() {
            if let Ok(mut bar) = bar.try_lock() {
                if bar.display_mode() == DisplayMode::Auto {
                    bar.start_disappear_animator();
                }
            }
        }
    }

    /// Content started scrolling: auto bars show up
    pub fn stop_scroll_bar_animator(&self) {
        for bar in self.live_bars() {
            if let Ok(mut bar) = bar.try_lock() {
                if bar.display_mode() == DisplayMode::Auto {
                    bar.stop_disappear_animator();
                }
            }
        }
    }
}

impl std::fmt::Debug for ScrollBarProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollBarProxy")
            .field("has_scrollable_node", &self.has_scrollable_node())
            .field("scroll_bars", &self.scroll_bar_count())
            .finish()
    }
}

/// Convert a bar-space distance into content space
fn bar_to_content(distance: f32, control_distance: f32, scrollable_distance: f32) -> f32 {
    if near_zero(scrollable_distance) {
        return 0.0;
    }
    distance * control_distance / scrollable_distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScrollBarConfig;
    use crate::host::FrameNode;
    use arkflow_core::geometry::Axis;

    #[derive(Default)]
    struct RecordingTarget {
        offsets: Vec<(f32, ScrollSource)>,
        starts: u32,
        ends: u32,
    }

    impl ScrollBarTarget for RecordingTarget {
        fn scroll_by_bar(&mut self, offset: f32, source: ScrollSource) -> bool {
            self.offsets.push((offset, source));
            true
        }

        fn on_bar_scroll_start(&mut self) {
            self.starts += 1;
        }

        fn on_bar_scroll_end(&mut self) {
            self.ends += 1;
        }
    }

    #[test]
    fn test_bar_distance_is_scaled_to_content() {
        assert_eq!(bar_to_content(-10.0, 100.0, 500.0), -2.0);
        assert_eq!(bar_to_content(-10.0, 100.0, 0.0), 0.0);
    }

    #[test]
    fn test_notifications_reach_target() {
        let proxy = ScrollBarProxy::new();
        let target = Arc::new(Mutex::new(RecordingTarget::default()));
        let weak: TargetRef = Arc::downgrade(&target) as TargetRef;
        proxy.register_scrollable_node(weak);

        let host = FrameNode::new("ScrollBar");
        let bar = ScrollBarPattern::new(&host, Axis::Vertical, ScrollBarConfig::default());
        {
            let mut bar = bar.lock().unwrap();
            bar.set_scrollable_distance(500.0);
            bar.set_control_distance(100.0);
            assert!(proxy.notify_scrollable_node(-10.0, ScrollSource::Bar, &bar));
        }
        proxy.notify_scroll_start();
        proxy.notify_scroll_stop();

        let target = target.lock().unwrap();
        assert_eq!(target.offsets, vec![(-2.0, ScrollSource::Bar)]);
        assert_eq!((target.starts, target.ends), (1, 1));
    }

    #[test]
    fn test_dead_bars_are_pruned() {
        let proxy = ScrollBarProxy::new();
        let host = FrameNode::new("ScrollBar");
        let kept = ScrollBarPattern::new(&host, Axis::Vertical, ScrollBarConfig::default());
        {
            let dropped = ScrollBarPattern::new(&host, Axis::Vertical, ScrollBarConfig::default());
            proxy.register_scroll_bar(Arc::downgrade(&kept));
            proxy.register_scroll_bar(Arc::downgrade(&kept));
            proxy.register_scroll_bar(Arc::downgrade(&dropped));
            assert_eq!(proxy.scroll_bar_count(), 2);
        }
        assert_eq!(proxy.scroll_bar_count(), 1);

        proxy.unregister_scroll_bar(&Arc::downgrade(&kept));
        assert_eq!(proxy.scroll_bar_count(), 0);
    }

    #[test]
    fn test_without_target_nothing_moves() {
        let proxy = ScrollBarProxy::new();
        let host = FrameNode::new("ScrollBar");
        let bar = ScrollBarPattern::new(&host, Axis::Vertical, ScrollBarConfig::default());
        assert!(!proxy.notify_scrollable_node(5.0, ScrollSource::Bar, &bar.lock().unwrap()));
        assert!(!proxy.has_scrollable_node());
    }
}
