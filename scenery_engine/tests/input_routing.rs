// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch, tap, and hover routing through a live engine.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use scenery_engine::{Engine, EngineConfig, MouseButton, NullRasterizer};
use scenery_graph::{EventType, NodeId, Paint, Payload, PointerId};
use scenery_shape::Path;

type Log = Rc<RefCell<Vec<String>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn describe(name: &str, payload: &Payload) -> String {
    match payload {
        Payload::Touch(t) => format!("{name} touch {:?}", t.phase),
        Payload::Tap(_) => format!("{name} tap"),
        Payload::Hover(h) => format!("{name} hover {:?}", h.phase),
        other => format!("{name} {other:?}"),
    }
}

fn listen(
    engine: &mut Engine,
    node: NodeId,
    ty: EventType,
    name: &'static str,
    handled: bool,
    log: &Log,
) {
    let log = log.clone();
    engine.scene_mut().add_listener(node, ty, move |_, ev| {
        log.borrow_mut().push(describe(name, &ev.payload));
        handled
    });
}

fn listen_engine(engine: &mut Engine, log: &Log) {
    for ty in [EventType::Touch, EventType::Tap] {
        let log = log.clone();
        engine.add_listener(ty, move |_, ev| {
            log.borrow_mut().push(describe("engine", &ev.payload));
            false
        });
    }
}

/// Group `G` at (100, 100) with a tap listener, holding leaf `L` (50x50) with a touch listener.
fn button(engine: &mut Engine, log: &Log) -> (NodeId, NodeId) {
    let g = engine.new_group(100.0, 100.0);
    let l = engine
        .scene_mut()
        .create_leaf(Path::rect(50.0, 50.0), Paint::default());
    engine.scene_mut().insert(g, l).unwrap();
    listen(engine, g, EventType::Tap, "G", true, log);
    listen(engine, l, EventType::Touch, "L", true, log);
    listen_engine(engine, log);
    (g, l)
}

#[test]
fn quick_release_taps_group_and_ends_touch_on_leaf() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let (g, l) = button(&mut engine, &log);
    let pointer = PointerId(1);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(pointer, Point::new(100.0, 100.0), 1000.0);
    engine.tick(16.0, &mut NullRasterizer);
    assert_eq!(
        engine.pointers().get(pointer).unwrap().listener_objects,
        [g, l],
        "the ancestor claim precedes the leaf's own claim"
    );
    engine.tick(32.0, &mut NullRasterizer);

    engine.pointer_up(pointer, Point::new(100.0, 100.0), 1150.0);
    assert_eq!(
        *log.borrow(),
        ["L touch Began", "L touch Hold", "G tap", "L touch Ended"]
    );

    engine.tick(48.0, &mut NullRasterizer);
    assert!(engine.pointers().is_empty(), "released pointers are dropped on the next tick");
}

#[test]
fn slow_release_is_not_a_tap() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    button(&mut engine, &log);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(110.0, 90.0), 1000.0);
    engine.tick(16.0, &mut NullRasterizer);
    engine.pointer_up(PointerId(1), Point::new(110.0, 90.0), 1250.0);

    let log = log.borrow();
    assert!(!log.iter().any(|e| e.contains("tap")), "no tap in {log:?}");
    assert_eq!(log.last().map(String::as_str), Some("L touch Ended"));
}

#[test]
fn tap_threshold_is_configurable() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::new(EngineConfig::default().with_tap_time_ms(300.0));
    button(&mut engine, &log);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);
    engine.pointer_up(PointerId(1), Point::new(100.0, 100.0), 250.0);
    assert!(log.borrow().iter().any(|e| e == "G tap"), "250 ms is a tap at 300 ms");
}

#[test]
fn unclaimed_pointer_falls_back_to_engine_listeners() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    button(&mut engine, &log);
    let deltas = Rc::new(RefCell::new(Vec::new()));
    let d = deltas.clone();
    engine.add_listener(EventType::Touch, move |_, ev| {
        if let Payload::Touch(t) = &ev.payload {
            d.borrow_mut().push(t.delta);
        }
        false
    });

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(2), Point::new(400.0, 400.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);
    assert!(engine.pointers().get(PointerId(2)).unwrap().listener_objects.is_empty());
    engine.pointer_move(PointerId(2), Point::new(410.0, 395.0));
    engine.pointer_up(PointerId(2), Point::new(410.0, 395.0), 100.0);

    assert_eq!(
        *log.borrow(),
        [
            "engine touch Began",
            "engine touch Moved",
            "engine touch Ended",
            "engine tap"
        ]
    );
    assert!(deltas.borrow().contains(&Vec2::new(10.0, -5.0)));
}

#[test]
fn inner_group_claim_shadows_outer_for_plain_leaves() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let outer = engine.new_group(0.0, 0.0);
    let scene = engine.scene_mut();
    let inner = scene.create_group();
    let leaf = scene.create_leaf(Path::circle(10.0), Paint::default());
    scene.insert(outer, inner).unwrap();
    scene.insert(inner, leaf).unwrap();
    listen(&mut engine, outer, EventType::Touch, "outer", true, &log);
    listen(&mut engine, inner, EventType::Touch, "inner", false, &log);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(2.0, 2.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);

    assert_eq!(
        engine.pointers().get(PointerId(1)).unwrap().listener_objects,
        [inner],
        "a leaf claims only for its nearest listening group"
    );
    assert_eq!(*log.borrow(), ["inner touch Began"]);
}

#[test]
fn pointers_are_claimed_only_around_the_press() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);
    engine.tick(32.0, &mut NullRasterizer);

    // Appears under a pointer that was already resolved.
    let (g, l) = button(&mut engine, &log);
    engine.tick(48.0, &mut NullRasterizer);
    let pointer = engine.pointers().get(PointerId(1)).unwrap();
    assert!(pointer.listener_objects.is_empty());
    assert!(!engine.pointers().is_claimed_by(g));
    assert!(!engine.pointers().is_claimed_by(l));
}

#[test]
fn destroyed_claimants_are_skipped() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let (_g, l) = button(&mut engine, &log);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);
    assert!(engine.scene_mut().destroy(l));
    engine.tick(32.0, &mut NullRasterizer);

    // G has no touch listener, so hold falls through to the engine.
    assert_eq!(*log.borrow(), ["L touch Began", "engine touch Hold"]);
}

#[test]
fn only_the_primary_mouse_button_presses() {
    init_tracing();
    let mut engine = Engine::default();
    engine.mouse_down(MouseButton::Secondary, Point::new(5.0, 5.0), 0.0);
    assert!(engine.pointers().is_empty());
    assert_eq!(engine.mouse_position(), Some(Point::new(5.0, 5.0)));

    engine.mouse_down(MouseButton::Primary, Point::new(5.0, 5.0), 0.0);
    assert!(engine.pointers().get(PointerId::MOUSE).is_some());
    engine.mouse_up(MouseButton::Primary, Point::new(5.0, 5.0), 10.0);
    assert!(engine.pointers().get(PointerId::MOUSE).unwrap().is_released());
}

#[test]
fn hover_begins_and_ends_with_containment() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let h = engine.new_rect(50.0, 50.0, 20.0, 20.0);
    listen(&mut engine, h, EventType::Hover, "H", false, &log);

    engine.mouse_move(Point::new(52.0, 48.0));
    engine.tick(0.0, &mut NullRasterizer);
    engine.tick(16.0, &mut NullRasterizer);
    assert_eq!(*log.borrow(), ["H hover Began"]);
    assert_eq!(engine.scene().hover_mark(h).map(|m| m.frame), Some(2));

    engine.mouse_move(Point::new(200.0, 200.0));
    engine.tick(32.0, &mut NullRasterizer);
    assert_eq!(*log.borrow(), ["H hover Began", "H hover Ended"]);
    assert!(engine.scene().hover_mark(h).is_none());
}

#[test]
fn group_hovers_through_its_children() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let g = engine.new_group(0.0, 0.0);
    let a = engine.scene_mut().create_leaf(Path::rect(10.0, 10.0), Paint::default());
    let b = engine.scene_mut().create_leaf(Path::rect(10.0, 10.0), Paint::default());
    engine.scene_mut().set_position(b, Point::new(30.0, 0.0));
    engine.scene_mut().insert(g, a).unwrap();
    engine.scene_mut().insert(g, b).unwrap();
    listen(&mut engine, g, EventType::Hover, "G", false, &log);

    engine.mouse_move(Point::new(0.0, 0.0));
    engine.tick(0.0, &mut NullRasterizer);
    // Moving from one child to the other keeps the group hovered.
    engine.mouse_move(Point::new(30.0, 0.0));
    engine.tick(16.0, &mut NullRasterizer);
    assert_eq!(*log.borrow(), ["G hover Began"]);

    engine.mouse_leave();
    engine.tick(32.0, &mut NullRasterizer);
    assert_eq!(*log.borrow(), ["G hover Began", "G hover Ended"]);
}

#[test]
fn transparent_nodes_do_not_hover() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let h = engine.new_circle(0.0, 0.0, 10.0);
    engine.scene_mut().set_alpha(h, 0.0);
    listen(&mut engine, h, EventType::Hover, "H", false, &log);

    engine.mouse_move(Point::ORIGIN);
    engine.tick(0.0, &mut NullRasterizer);
    assert!(log.borrow().is_empty());
}

#[test]
fn destroying_a_hovered_node_ends_hover_once() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let h = engine.new_circle(0.0, 0.0, 10.0);
    listen(&mut engine, h, EventType::Hover, "H", false, &log);

    engine.mouse_move(Point::ORIGIN);
    engine.tick(0.0, &mut NullRasterizer);
    assert!(engine.scene_mut().destroy(h));
    engine.tick(16.0, &mut NullRasterizer);
    assert_eq!(*log.borrow(), ["H hover Began", "H hover Ended"]);
}

#[test]
fn hidden_leaves_are_not_touch_tested() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let (_g, l) = button(&mut engine, &log);
    engine.scene_mut().set_visible(l, false);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);

    assert!(engine.pointers().get(PointerId(1)).unwrap().listener_objects.is_empty());
    assert_eq!(*log.borrow(), ["engine touch Began"]);
}

#[test]
fn leaves_under_a_hidden_group_are_not_touch_tested() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let outer = engine.new_group(0.0, 0.0);
    let (g, _l) = button(&mut engine, &log);
    engine.scene_mut().insert(outer, g).unwrap();
    engine.scene_mut().set_visible(outer, false);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(PointerId(1), Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);

    assert!(engine.pointers().get(PointerId(1)).unwrap().listener_objects.is_empty());
    assert!(!engine.pointers().is_claimed_by(g));
}

#[test]
fn hiding_a_hovered_node_ends_hover_once() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    let h = engine.new_rect(50.0, 50.0, 20.0, 20.0);
    listen(&mut engine, h, EventType::Hover, "H", false, &log);

    engine.mouse_move(Point::new(50.0, 50.0));
    engine.tick(0.0, &mut NullRasterizer);
    engine.scene_mut().set_visible(h, false);
    engine.tick(16.0, &mut NullRasterizer);
    engine.tick(32.0, &mut NullRasterizer);

    assert_eq!(*log.borrow(), ["H hover Began", "H hover Ended"]);
    assert!(engine.scene().hover_mark(h).is_none());
}

#[test]
fn cancelled_pointer_finishes_like_a_lift() {
    init_tracing();
    let log = Log::default();
    let mut engine = Engine::default();
    button(&mut engine, &log);
    let pointer = PointerId(4);

    engine.tick(0.0, &mut NullRasterizer);
    engine.pointer_down(pointer, Point::new(100.0, 100.0), 0.0);
    engine.tick(16.0, &mut NullRasterizer);
    engine.pointer_cancel(pointer, Point::new(100.0, 100.0), 40.0);

    assert_eq!(*log.borrow(), ["L touch Began", "G tap", "L touch Ended"]);
    assert!(engine.pointers().get(pointer).unwrap().is_released());
    engine.tick(32.0, &mut NullRasterizer);
    assert!(engine.pointers().is_empty());

    // A second cancel for the same pointer is ignored.
    engine.pointer_cancel(pointer, Point::new(100.0, 100.0), 60.0);
    assert_eq!(log.borrow().len(), 3);
}
