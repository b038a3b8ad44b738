//! Integration tests for scroll bars driving, and following, their content

use std::sync::{Arc, Mutex, Weak};

use arkflow_animation::{AnimationScheduler, SharedScheduler};
use arkflow_core::events::GestureEvent;
use arkflow_core::geometry::Axis;
use arkflow_layout::config::ScrollBarConfig;
use arkflow_layout::host::FrameNode;
use arkflow_layout::scroll_bar::{DisplayMode, ScrollBarPattern, ScrollBarProxy, ScrollBarTarget};
use arkflow_layout::scrollable::{
    LinearContent, NestedState, ScrollSource, ScrollablePattern,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn counter() -> (Arc<Mutex<u32>>, impl FnMut() + Send + 'static) {
    let count = Arc::new(Mutex::new(0));
    let c = count.clone();
    (count, move || *c.lock().unwrap() += 1)
}

/// Content that only records what the bar asks of it
#[derive(Default)]
struct RecordingContent {
    offsets: Vec<(f32, ScrollSource)>,
    starts: u32,
    ends: u32,
}

impl ScrollBarTarget for RecordingContent {
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

struct Bar {
    _host: Arc<FrameNode>,
    bar: Arc<Mutex<ScrollBarPattern>>,
    scheduler: SharedScheduler,
}

/// Vertical bar with a 500px track over 100px of content travel
fn bar(proxy: &Arc<ScrollBarProxy>, mode: DisplayMode) -> Bar {
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
        b.set_scroll_bar_proxy(proxy.clone());
        b.set_scrollable_distance(500.0);
        b.set_control_distance(100.0);
    }
    Bar {
        _host: host,
        bar,
        scheduler,
    }
}

#[test]
fn test_bar_drag_is_inverted_for_content() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let content = Arc::new(Mutex::new(RecordingContent::default()));
    let target: Weak<Mutex<dyn ScrollBarTarget>> = Arc::downgrade(&content) as Weak<Mutex<dyn ScrollBarTarget>>;
    proxy.register_scrollable_node(target);
    let bar = bar(&proxy, DisplayMode::On);

    let positions = Arc::new(Mutex::new(Vec::new()));
    let log = positions.clone();
    {
        let mut b = bar.bar.lock().unwrap();
        b.on_scroll_position(move |offset, source| log.lock().unwrap().push((offset, source)));
        b.handle_drag_start(&GestureEvent::new());
        b.handle_drag_update(&GestureEvent::new().with_main_delta(10.0));
        assert_eq!(b.current_offset(), 10.0);
    }

    assert_eq!(
        *positions.lock().unwrap(),
        vec![(0.0, ScrollSource::Start), (10.0, ScrollSource::Bar)]
    );
    let content = content.lock().unwrap();
    // -10 on the bar track is -2 on the content
    assert_eq!(content.offsets, vec![(-10.0 * 100.0 / 500.0, ScrollSource::Bar)]);
    assert_eq!(content.starts, 1);
}

#[test]
fn test_bar_rejects_moves_past_its_ends() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let bar = bar(&proxy, DisplayMode::On);
    let mut b = bar.bar.lock().unwrap();

    assert!(!b.update_current_offset(-5.0, ScrollSource::Bar));
    assert_eq!(b.current_offset(), 0.0);

    assert!(b.update_current_offset(500.0, ScrollSource::Bar));
    assert!(b.is_at_bottom());
    assert!(!b.update_current_offset(5.0, ScrollSource::Bar));
    assert_eq!(b.current_offset(), 500.0);

    assert!(b.update_current_offset(-5.0, ScrollSource::Bar));
    assert_eq!(b.current_offset(), 495.0);
}

#[test]
fn test_bar_drag_without_velocity_finishes_immediately() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let content_host = FrameNode::new("Scroll");
    let content = ScrollablePattern::new(&content_host, Axis::Vertical, LinearContent::new(100.0));
    let (content_starts, on_start) = counter();
    let (content_stops, on_stop) = counter();
    {
        let mut c = content.lock().unwrap();
        c.on_scroll_start(on_start);
        c.on_scroll_stop(on_stop);
        c.set_scroll_bar_proxy(proxy.clone());
    }

    let bar = bar(&proxy, DisplayMode::Auto);
    let (bar_ends, on_end) = counter();
    {
        let mut b = bar.bar.lock().unwrap();
        b.on_scroll_end(on_end);

        b.handle_drag_start(&GestureEvent::new());
        assert_eq!(*content_starts.lock().unwrap(), 1);

        b.handle_drag_update(&GestureEvent::new().with_main_delta(10.0));
        b.handle_drag_end(&GestureEvent::new());

        assert!(!b.is_fling_running());
        assert!(b.is_disappearing());
        assert_eq!(b.opacity(), 255);
    }

    assert_eq!(content.lock().unwrap().current_offset(), -2.0);
    assert_eq!(*content_stops.lock().unwrap(), 1);
    assert_eq!(*bar_ends.lock().unwrap(), 1);
    assert!(!content.lock().unwrap().is_scrolling());

    // Left idle, the auto bar fades out
    AnimationScheduler::run_until_idle(&bar.scheduler, 16.0, 1000);
    assert_eq!(bar.bar.lock().unwrap().opacity(), 0);
}

#[test]
fn test_content_scroll_moves_bar() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let bar = bar(&proxy, DisplayMode::On);
    let content_host = FrameNode::new("Scroll");
    let content = ScrollablePattern::new(&content_host, Axis::Vertical, LinearContent::new(100.0));
    let mut c = content.lock().unwrap();
    c.set_scroll_bar_proxy(proxy.clone());

    c.handle_scroll(-20.0, ScrollSource::Update, NestedState::Gesture);
    assert_eq!(bar.bar.lock().unwrap().current_offset(), 100.0);

    // Overscroll keeps the bar pinned to the track
    c.handle_scroll(-200.0, ScrollSource::Update, NestedState::Gesture);
    assert!(c.is_out_of_boundary());
    assert_eq!(bar.bar.lock().unwrap().current_offset(), 500.0);
}

#[test]
fn test_bar_fling_drives_content() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let content_host = FrameNode::new("Scroll");
    let content = ScrollablePattern::new(&content_host, Axis::Vertical, LinearContent::new(100.0));
    let (content_stops, on_stop) = counter();
    {
        let mut c = content.lock().unwrap();
        c.on_scroll_stop(on_stop);
        c.set_scroll_bar_proxy(proxy.clone());
    }
    let bar = bar(&proxy, DisplayMode::On);
    {
        let mut b = bar.bar.lock().unwrap();
        b.handle_drag_start(&GestureEvent::new());
        b.handle_drag_update(&GestureEvent::new().with_main_delta(10.0));
        b.handle_drag_end(&GestureEvent::new().with_main_velocity(300.0));
        assert!(b.is_fling_running());
    }
    assert_eq!(*content_stops.lock().unwrap(), 0);

    AnimationScheduler::run_until_idle(&bar.scheduler, 16.0, 600);

    let bar_offset = bar.bar.lock().unwrap().current_offset();
    let content_offset = content.lock().unwrap().current_offset();
    assert!(bar_offset > 10.0);
    assert!((content_offset + bar_offset * 100.0 / 500.0).abs() < 0.01);
    assert_eq!(*content_stops.lock().unwrap(), 1);
}

#[test]
fn test_bar_outlives_its_content() {
    init_tracing();
    let proxy = ScrollBarProxy::new();
    let bar = bar(&proxy, DisplayMode::On);
    {
        let content_host = FrameNode::new("Scroll");
        let content = ScrollablePattern::new(&content_host, Axis::Vertical, LinearContent::new(100.0));
        content.lock().unwrap().set_scroll_bar_proxy(proxy.clone());
        assert!(proxy.has_scrollable_node());
    }
    assert!(!proxy.has_scrollable_node());

    let mut b = bar.bar.lock().unwrap();
    b.handle_drag_start(&GestureEvent::new());
    b.handle_drag_update(&GestureEvent::new().with_main_delta(25.0));
    b.handle_drag_end(&GestureEvent::new());
    assert_eq!(b.current_offset(), 25.0);
}
