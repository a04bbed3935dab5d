// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw order, scene edits from listeners, debug overlays, and the frame schedule.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kurbo::Point;
use scenery_engine::{
    Engine, EngineConfig, Marker, NullRasterizer, RasterOp, RecordingRasterizer, Subsystem,
};
use scenery_graph::{EventType, FrameEvent, NodeId, Paint, PointerId, Scene};
use scenery_shape::Path;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn three_rects(engine: &mut Engine) -> [NodeId; 3] {
    [
        engine.new_rect(0.0, 0.0, 10.0, 10.0),
        engine.new_rect(20.0, 0.0, 10.0, 10.0),
        engine.new_rect(40.0, 0.0, 10.0, 10.0),
    ]
}

#[test]
fn children_draw_in_order_after_their_parent() {
    init_tracing();
    let mut engine = Engine::default();
    let a = engine.new_rect(0.0, 0.0, 10.0, 10.0);
    let g = engine.new_group(0.0, 0.0);
    let b = engine.scene_mut().create_leaf(Path::circle(3.0), Paint::default());
    let c = engine.scene_mut().create_leaf(Path::circle(3.0), Paint::default());
    engine.scene_mut().insert(g, b).unwrap();
    engine.scene_mut().insert(g, c).unwrap();

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    assert_eq!(raster.ops.first(), Some(&RasterOp::Clear(engine.config().clear_color)));
    assert_eq!(raster.drawn(), [a, b, c]);

    engine.scene_mut().to_back(g);
    raster.reset();
    engine.tick(16.0, &mut raster);
    assert_eq!(raster.drawn(), [b, c, a]);
}

#[test]
fn self_destruction_on_enter_frame_skips_only_that_node() {
    init_tracing();
    let mut engine = Engine::default();
    let [a, b, c] = three_rects(&mut engine);
    engine
        .scene_mut()
        .add_listener(a, EventType::EnterFrame, move |scene, _| {
            scene.destroy(a);
            true
        });

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    assert_eq!(raster.drawn(), [b, c]);
    assert!(!engine.scene().is_alive(a));
}

#[test]
fn destroying_an_earlier_sibling_does_not_skip_later_ones() {
    init_tracing();
    let mut engine = Engine::default();
    let [a, b, c] = three_rects(&mut engine);
    engine
        .scene_mut()
        .add_listener(b, EventType::EnterFrame, move |scene, _| {
            scene.destroy(a);
            false
        });

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    assert_eq!(raster.drawn(), [a, b, c]);
    assert_eq!(engine.scene().children(engine.root()), [b, c]);
}

#[test]
fn reordering_mid_traversal_visits_everyone_once() {
    init_tracing();
    let mut engine = Engine::default();
    let [a, b, c] = three_rects(&mut engine);
    engine
        .scene_mut()
        .add_listener(a, EventType::ExitFrame, move |scene, _| {
            scene.to_back(c);
            false
        });

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    let drawn = raster.drawn();
    assert_eq!(drawn.len(), 3, "drawn: {drawn:?}");
    for n in [a, b, c] {
        assert!(drawn.contains(&n), "{n:?} missing from {drawn:?}");
    }
}

#[test]
fn nodes_added_during_traversal_are_drawn_the_same_frame() {
    init_tracing();
    let mut engine = Engine::default();
    let a = engine.new_rect(0.0, 0.0, 10.0, 10.0);
    let spawned = Rc::new(Cell::new(None));
    let s = spawned.clone();
    engine
        .scene_mut()
        .add_listener(a, EventType::EnterFrame, move |scene, _| {
            if s.get().is_none() {
                let n = scene.create_leaf(Path::circle(2.0), Paint::default());
                scene.insert(scene.root(), n).unwrap();
                s.set(Some(n));
            }
            false
        });

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    let n = spawned.get().unwrap();
    assert_eq!(raster.drawn(), [a, n]);
}

#[test]
fn enter_and_exit_frame_bracket_the_subtree() {
    init_tracing();
    let mut engine = Engine::default();
    let g = engine.new_group(0.0, 0.0);
    let leaf = engine.scene_mut().create_leaf(Path::circle(1.0), Paint::default());
    engine.scene_mut().insert(g, leaf).unwrap();

    let order = Rc::new(RefCell::new(Vec::new()));
    for (node, name) in [(g, "g"), (leaf, "leaf")] {
        for (ty, phase) in [(EventType::EnterFrame, "enter"), (EventType::ExitFrame, "exit")] {
            let order = order.clone();
            engine.scene_mut().add_listener(node, ty, move |_, _| {
                order.borrow_mut().push(format!("{name} {phase}"));
                false
            });
        }
    }
    for (ty, phase) in [(EventType::EnterFrame, "enter"), (EventType::ExitFrame, "exit")] {
        let order = order.clone();
        engine.add_listener(ty, move |_, _| {
            order.borrow_mut().push(format!("engine {phase}"));
            false
        });
    }

    engine.tick(0.0, &mut NullRasterizer);
    assert_eq!(
        *order.borrow(),
        [
            "engine enter",
            "g enter",
            "leaf enter",
            "leaf exit",
            "g exit",
            "engine exit"
        ]
    );
}

#[test]
fn debug_mode_emits_overlays_with_touch_highlight() {
    init_tracing();
    let mut engine = Engine::new(EngineConfig::default().with_debug(true));
    let leaf = engine.new_rect(10.0, 10.0, 10.0, 10.0);
    engine
        .scene_mut()
        .add_listener(leaf, EventType::Touch, |_, _| true);

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    engine.pointer_down(PointerId(1), Point::new(10.0, 10.0), 0.0);
    raster.reset();
    engine.tick(16.0, &mut raster);

    let overlays: Vec<_> = raster
        .ops
        .iter()
        .filter_map(|op| match op {
            RasterOp::Overlay {
                node,
                marker,
                touching,
            } => Some((*node, *marker, *touching)),
            _ => None,
        })
        .collect();
    assert_eq!(
        overlays,
        [
            (leaf, Marker::Dot, true),
            (engine.root(), Marker::Cross, false)
        ],
        "overlays follow each subtree"
    );
}

#[derive(Default)]
struct Recorder {
    deltas: Rc<RefCell<Vec<f64>>>,
}

impl Subsystem for Recorder {
    fn update(&mut self, _scene: &mut Scene, frame: &FrameEvent) {
        self.deltas.borrow_mut().push(frame.delta);
    }
}

#[test]
fn subsystems_and_timers_stop_while_paused() {
    init_tracing();
    let mut engine = Engine::default();
    let recorder = Recorder::default();
    let deltas = recorder.deltas.clone();
    engine.add_subsystem(recorder);
    let fired = Rc::new(Cell::new(0));
    let f = fired.clone();
    engine.perform_with_delay(20.0, -1, move |_, _| f.set(f.get() + 1));

    engine.tick(0.0, &mut NullRasterizer);
    engine.tick(16.0, &mut NullRasterizer);
    engine.tick(32.0, &mut NullRasterizer);
    assert_eq!(*deltas.borrow(), [0.0, 16.0, 16.0]);
    assert_eq!(fired.get(), 1);

    engine.pause();
    engine.tick(48.0, &mut NullRasterizer);
    engine.tick(64.0, &mut NullRasterizer);
    assert_eq!(deltas.borrow().len(), 3, "paused ticks skip subsystems");
    assert_eq!(fired.get(), 1);

    engine.step();
    engine.tick(80.0, &mut NullRasterizer);
    assert_eq!(deltas.borrow().last(), Some(&16.0));
    assert_eq!(fired.get(), 2);
    assert!(engine.is_paused());

    engine.resume();
    engine.tick(96.0, &mut NullRasterizer);
    assert_eq!(deltas.borrow().len(), 5);
    assert_eq!(fired.get(), 3);
}

#[test]
fn behaviors_run_before_bounds_and_drawing() {
    init_tracing();

    #[derive(Debug)]
    struct Grow;

    impl scenery_graph::Behavior for Grow {
        fn update(&mut self, scene: &mut Scene, id: NodeId, _frame: &FrameEvent) {
            let w = scene.width(id).unwrap_or(0.0);
            scene.set_width(id, w + 10.0);
        }
    }

    let mut engine = Engine::default();
    let r = engine.new_rect(0.0, 0.0, 10.0, 10.0);
    engine.scene_mut().set_behavior(r, Some(Box::new(Grow)));
    engine.tick(0.0, &mut NullRasterizer);
    assert_eq!(engine.scene().width(r), Some(20.0));
    assert!(!engine.scene().is_bounds_dirty(r));
    assert_eq!(engine.scene().local_bounds(r).map(|b| b.width), Some(20.0));
}

#[test]
fn containers_clip_only_their_content() {
    init_tracing();
    let mut engine = Engine::default();
    let panel = engine.new_container(100.0, 100.0, 50.0, 30.0);
    let inside = engine.new_rect(0.0, 0.0, 200.0, 10.0);
    panel.insert(engine.scene_mut(), inside).unwrap();
    let after = engine.new_circle(10.0, 10.0, 4.0);

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    let ops: Vec<String> = raster
        .ops
        .iter()
        .filter_map(|op| match op {
            RasterOp::Draw { node, .. } => Some(format!("draw {node:?}")),
            RasterOp::PushClip(node) => Some(format!("clip {node:?}")),
            RasterOp::PopClip => Some("unclip".into()),
            _ => None,
        })
        .collect();
    assert_eq!(
        ops,
        [
            format!("draw {:?}", panel.node()),
            format!("clip {:?}", panel.node()),
            format!("draw {inside:?}"),
            "unclip".into(),
            format!("draw {after:?}"),
        ]
    );

    engine.scene_mut().set_visible(panel.node(), false);
    raster.reset();
    engine.tick(16.0, &mut raster);
    assert!(!raster.ops.iter().any(|op| matches!(op, RasterOp::PushClip(_))));
    assert_eq!(raster.drawn(), [after]);
}

#[test]
fn wide_groups_draw_every_child_once_in_order() {
    init_tracing();
    let mut engine = Engine::default();
    let leaves: Vec<NodeId> = (0..5000)
        .map(|i| engine.new_rect(f64::from(i % 100), f64::from(i / 100), 1.0, 1.0))
        .collect();
    // Moving an unvisited node behind the walk draws it next, still once.
    let middle = leaves[2500];
    let last = leaves[4999];
    engine
        .scene_mut()
        .add_listener(middle, EventType::ExitFrame, move |scene, _| {
            scene.to_back(last);
            false
        });

    let mut raster = RecordingRasterizer::new();
    engine.tick(0.0, &mut raster);
    let drawn = raster.drawn();
    assert_eq!(drawn.len(), leaves.len());
    assert_eq!(drawn[..2501], leaves[..2501]);
    assert_eq!(drawn[2501], last);
    assert_eq!(drawn[2502..], leaves[2501..4999]);
}
