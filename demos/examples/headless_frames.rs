// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drive a small scene for a few frames without a window.
//!
//! The scene has a button group (a rounded rect with a label dot), a spinning
//! polygon, and a camera following a circle. Scripted mouse input exercises
//! hover, tap, and drag; every draw call is logged through `tracing`.
//!
//! Run:
//! - `cargo run -p scenery_demos --example headless_frames`

use std::cell::Cell;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use scenery_engine::{
    Camera, DebugOverlay, DrawItem, Engine, EngineConfig, FocusOptions, MouseButton, Rasterizer,
};
use scenery_graph::{Behavior, Color, EventType, FrameEvent, NodeId, Paint, Payload, Phase, Scene};
use scenery_shape::Path;
use tracing::{Level, info};

/// Logs each call instead of producing pixels.
#[derive(Debug, Default)]
struct LogRasterizer {
    draws: usize,
}

impl Rasterizer for LogRasterizer {
    fn clear(&mut self, color: Color) {
        self.draws = 0;
        tracing::debug!(?color, "clear");
    }

    fn draw(&mut self, item: &DrawItem<'_>) {
        self.draws += 1;
        let origin = item.transform * Point::ORIGIN;
        tracing::debug!(
            node = ?item.node,
            x = origin.x,
            y = origin.y,
            alpha = item.alpha,
            "draw"
        );
    }

    fn debug_overlay(&mut self, overlay: &DebugOverlay) {
        tracing::trace!(
            node = ?overlay.node,
            marker = ?overlay.marker,
            touching = overlay.touching,
            "overlay"
        );
    }
}

/// Spins its node by a fixed number of degrees per millisecond.
#[derive(Debug)]
struct Spin(f64);

impl Behavior for Spin {
    fn update(&mut self, scene: &mut Scene, id: NodeId, frame: &FrameEvent) {
        let rotation = scene.rotation(id).unwrap_or(0.0);
        scene.set_rotation(id, rotation + self.0 * frame.delta);
    }
}

fn build_button(engine: &mut Engine, taps: Rc<Cell<u32>>) -> NodeId {
    let button = engine.new_group(200.0, 120.0);
    let scene = engine.scene_mut();
    let body = scene.create_leaf(
        Path::rounded_rect(120.0, 40.0, 8.0),
        Paint::solid(Color::rgba(40, 120, 220, 255)),
    );
    let label = scene.create_leaf(Path::circle(6.0), Paint::solid(Color::WHITE));
    scene.set_position(label, Point::new(-40.0, 0.0));
    for child in [body, label] {
        if let Err(err) = scene.insert(button, child) {
            tracing::warn!(%err, "button assembly failed");
        }
    }

    scene.add_listener(button, EventType::Tap, move |_, ev| {
        if let Payload::Tap(tap) = &ev.payload {
            taps.set(taps.get() + 1);
            info!(duration = tap.duration, "button tapped");
        }
        true
    });
    scene.add_listener(button, EventType::Hover, move |scene, ev| {
        if let (Some(target), Payload::Hover(hover)) = (ev.target, &ev.payload) {
            let alpha = if hover.phase == Phase::Began { 0.7 } else { 1.0 };
            scene.set_alpha(target, alpha);
            info!(phase = ?hover.phase, "button hover");
        }
        false
    });
    button
}

fn main() {
    tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();

    let mut engine = Engine::new(EngineConfig::default().with_debug(true));
    engine.resize(640.0, 480.0);

    let taps = Rc::new(Cell::new(0));
    let button = build_button(&mut engine, taps.clone());

    let star = engine.new_polygon(
        480.0,
        320.0,
        [
            Point::new(0.0, -30.0),
            Point::new(9.0, -9.0),
            Point::new(30.0, 0.0),
            Point::new(9.0, 9.0),
            Point::new(0.0, 30.0),
            Point::new(-9.0, 9.0),
            Point::new(-30.0, 0.0),
            Point::new(-9.0, -9.0),
        ],
    );
    engine.scene_mut().set_behavior(star, Some(Box::new(Spin(0.09))));

    let camera = engine.new_camera(320.0, 240.0);
    let ball = engine.new_circle(0.0, 0.0, 12.0);
    {
        let scene = engine.scene_mut();
        Camera::add(scene, camera, ball, false);
        Camera::set_focus(scene, camera, Some(ball), FocusOptions::default());
        if let Some(cam) = scene.behavior_mut::<Camera>(camera) {
            cam.set_damping(0.8);
        }
    }
    engine.perform_with_delay(50.0, -1, move |scene, ev| {
        let step = f64::from(ev.count) * 4.0;
        scene.set_position(ball, Point::new(step, step * 0.5));
    });

    engine.add_listener(EventType::Touch, |_, ev| {
        if let Payload::Touch(touch) = &ev.payload {
            tracing::debug!(phase = ?touch.phase, "unclaimed touch");
        }
        false
    });

    let mut raster = LogRasterizer::default();
    let mut time = 0.0;
    let mut frame = |engine: &mut Engine, raster: &mut LogRasterizer| {
        engine.tick(time, raster);
        info!(frame = engine.frame().frame, draws = raster.draws, "frame done");
        time += 16.0;
    };

    frame(&mut engine, &mut raster);

    // Hover over the button, then tap it.
    engine.mouse_move(Point::new(210.0, 125.0));
    frame(&mut engine, &mut raster);
    engine.mouse_down(MouseButton::Primary, Point::new(210.0, 125.0), 32.0);
    frame(&mut engine, &mut raster);
    engine.mouse_up(MouseButton::Primary, Point::new(210.0, 125.0), 120.0);
    frame(&mut engine, &mut raster);

    // Drag across empty space; the engine-level listener sees it.
    engine.mouse_down(MouseButton::Primary, Point::new(20.0, 20.0), 140.0);
    frame(&mut engine, &mut raster);
    engine.mouse_move(Point::new(60.0, 40.0));
    engine.wheel(Vec2::new(0.0, -3.0));
    frame(&mut engine, &mut raster);
    engine.mouse_up(MouseButton::Primary, Point::new(60.0, 40.0), 600.0);
    for _ in 0..10 {
        frame(&mut engine, &mut raster);
    }

    let view = Camera::view(engine.scene(), camera);
    info!(
        taps = taps.get(),
        button_alpha = ?engine.scene().alpha(button),
        star_rotation = ?engine.scene().rotation(star),
        view_position = ?view.and_then(|v| engine.scene().position(v)),
        "done"
    );
}
