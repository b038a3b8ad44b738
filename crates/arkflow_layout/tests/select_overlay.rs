//! Integration tests for the selection overlay: handle drags through a pan
//! recognizer, reverse detection, and the caret menu.

use std::sync::{Arc, Mutex};

use arkflow_animation::AnimationScheduler;
use arkflow_core::events::{GestureEvent, TouchEvent, TouchType};
use arkflow_core::geometry::{Offset, Rect};
use arkflow_layout::config::SelectOverlayConfig;
use arkflow_layout::host::{AccessibilityEventType, FrameNode};
use arkflow_layout::select_overlay::{
    MenuOption, SelectHandleInfo, SelectMenuInfo, SelectOverlayInfo, SelectOverlayNode,
    SelectOverlayPattern,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

const FIRST: Rect = Rect::new(20.0, 100.0, 4.0, 20.0);
const SECOND: Rect = Rect::new(220.0, 100.0, 4.0, 20.0);

#[derive(Default)]
struct Events {
    move_start: Vec<bool>,
    move_done: Vec<(Rect, bool)>,
    reverse: Vec<bool>,
}

fn overlay(events: &Arc<Mutex<Events>>) -> (Arc<FrameNode>, Arc<Mutex<SelectOverlayPattern>>) {
    let start = events.clone();
    let done = events.clone();
    let reverse = events.clone();
    let info = SelectOverlayInfo::new(FIRST, SECOND)
        .on_handle_move_start(move |is_first| start.lock().unwrap().move_start.push(is_first))
        .on_handle_move_done(move |rect, is_first| done.lock().unwrap().move_done.push((rect, is_first)))
        .on_handle_reverse(move |r| reverse.lock().unwrap().reverse.push(r));
    let host = FrameNode::new("SelectOverlay");
    let pattern = SelectOverlayPattern::new(&host, info, SelectOverlayConfig::default());
    (host, pattern)
}

#[test]
fn test_handle_drag_is_exclusive() {
    init_tracing();
    let events = Arc::new(Mutex::new(Events::default()));
    let (_host, pattern) = overlay(&events);
    let mut p = pattern.lock().unwrap();

    p.handle_pan_start(&GestureEvent::new().at(FIRST.center()));
    assert!(p.is_first_handle_drag());
    assert!(!p.is_second_handle_drag());

    // Leaving the hot zone does not end the drag
    p.handle_pan_move(&GestureEvent::new().with_delta(Offset::new(0.0, 300.0)));
    assert!(p.is_first_handle_drag());

    p.handle_pan_end(&GestureEvent::new());
    assert!(!p.is_first_handle_drag());
    assert!(!p.is_second_handle_drag());
    assert_eq!(events.lock().unwrap().move_start, vec![true]);
}

#[test]
fn test_pan_recognizer_drags_first_handle() {
    init_tracing();
    let events = Arc::new(Mutex::new(Events::default()));
    let (_host, pattern) = overlay(&events);
    let mut pan = SelectOverlayPattern::pan_recognizer(&pattern);

    let down = FIRST.center();
    pan.handle_touch(&TouchEvent::new(1, TouchType::Down, down, 0.0));
    pan.handle_touch(&TouchEvent::new(1, TouchType::Move, down + Offset::new(0.0, 15.0), 16.0));
    pan.handle_touch(&TouchEvent::new(1, TouchType::Move, down + Offset::new(0.0, 25.0), 32.0));
    pan.handle_touch(&TouchEvent::new(1, TouchType::Up, down + Offset::new(0.0, 25.0), 48.0));

    let p = pattern.lock().unwrap();
    let moved = FIRST.translate(Offset::new(0.0, 10.0));
    assert_eq!(p.info().first_handle.paint_rect, moved);
    assert_eq!(p.info().second_handle.paint_rect, SECOND);
    // Releasing a handle brings the menu up
    assert!(p.is_menu_show());
    assert_eq!(events.lock().unwrap().move_done, vec![(moved, true)]);
}

#[test]
fn test_handle_reverse_is_rederived() {
    init_tracing();
    let events = Arc::new(Mutex::new(Events::default()));
    let (_host, pattern) = overlay(&events);
    let mut p = pattern.lock().unwrap();
    assert!(!p.check_handle_reverse());

    // Drag the first handle past the second on the same line
    p.handle_pan_start(&GestureEvent::new().at(FIRST.center()));
    p.handle_pan_move(&GestureEvent::new().with_delta(Offset::new(250.0, 0.0)));
    assert!(p.handle_reverse());
    assert!(p.check_handle_reverse());
    p.handle_pan_end(&GestureEvent::new());

    // A stale flag is corrected from the rects alone
    p.update_first_select_handle_info(SelectHandleInfo::new(FIRST));
    assert!(!p.handle_reverse());
    p.set_handle_reverse(true);
    assert!(!p.check_handle_reverse());

    // Lower line wins over horizontal position
    p.update_second_select_handle_info(SelectHandleInfo::new(Rect::new(0.0, 10.0, 4.0, 20.0)));
    assert!(p.handle_reverse());

    assert_eq!(events.lock().unwrap().reverse, vec![true, false, false, true]);
}

#[test]
fn test_tap_reveals_caret_menu() {
    init_tracing();
    let host = FrameNode::new("SelectOverlay");
    let info = SelectOverlayInfo::single_handle(Rect::new(40.0, 40.0, 2.0, 20.0)).with_handle_line(false);
    let pattern = SelectOverlayPattern::new(&host, info, SelectOverlayConfig::default());
    let mut p = pattern.lock().unwrap();
    assert!(!p.is_menu_show());

    p.handle_on_click(&GestureEvent::new().at(Offset::new(300.0, 5.0)));
    assert!(p.is_menu_show());
    assert_eq!(host.take_accessibility_events(), vec![AccessibilityEventType::Click]);
}

#[test]
fn test_tap_on_range_selection_keeps_menu() {
    init_tracing();
    let events = Arc::new(Mutex::new(Events::default()));
    let (_host, pattern) = overlay(&events);
    let mut p = pattern.lock().unwrap();
    p.handle_on_click(&GestureEvent::new().at(FIRST.center()));
    assert!(!p.is_menu_show());
}

#[test]
fn test_menu_option_then_overlay_hides() {
    init_tracing();
    let copied = Arc::new(Mutex::new(false));
    let flag = copied.clone();
    let host = FrameNode::new("SelectOverlay");
    let info = SelectOverlayInfo::new(FIRST, SECOND)
        .with_menu(SelectMenuInfo::shown())
        .on_copy(move || *flag.lock().unwrap() = true);
    let pattern = SelectOverlayPattern::new(&host, info, SelectOverlayConfig::default());
    let node = SelectOverlayNode::new(&host, &pattern, SelectOverlayConfig::default());
    let scheduler = AnimationScheduler::shared();
    node.lock().unwrap().set_scheduler(&scheduler);
    node.lock().unwrap().show_select_overlay(false);

    assert!(pattern.lock().unwrap().dispatch_menu_option(MenuOption::Copy));
    assert!(*copied.lock().unwrap());
    assert!(!pattern.lock().unwrap().is_menu_show());

    let closed = Arc::new(Mutex::new(false));
    let done = closed.clone();
    node.lock()
        .unwrap()
        .hide_select_overlay(move || *done.lock().unwrap() = true);
    AnimationScheduler::run_until_idle(&scheduler, 16.0, 100);
    assert!(*closed.lock().unwrap());
    assert_eq!(host.render_context().opacity, 0);
}
