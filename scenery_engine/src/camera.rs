// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A following camera built from two groups.
//!
//! The camera is an outer group carrying a [`Camera`] behavior and one inner
//! *view* group. World content goes into the view; every frame the behavior
//! moves (and optionally rotates) the view so the focus node ends up at the
//! camera origin.
//!
//! ```
//! use kurbo::Point;
//! use scenery_engine::{Camera, Engine, FocusOptions, NullRasterizer};
//!
//! let mut engine = Engine::default();
//! let camera = engine.new_camera(400.0, 300.0);
//! let player = engine.new_circle(50.0, 80.0, 10.0);
//!
//! let scene = engine.scene_mut();
//! Camera::add(scene, camera, player, false);
//! Camera::set_focus(scene, camera, Some(player), FocusOptions::default());
//!
//! engine.tick(0.0, &mut NullRasterizer);
//! let view = Camera::view(engine.scene(), camera).unwrap();
//! assert_eq!(engine.scene().position(view), Some(Point::new(-50.0, -80.0)));
//! ```

use alloc::boxed::Box;

use kurbo::{Affine, Point, Rect, Vec2};
use scenery_graph::{Behavior, FrameEvent, NodeId, Scene};
use tracing::warn;

/// How [`Camera::set_focus`] acquires its target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FocusOptions {
    /// Counter-rotate the view to follow the focus node's rotation.
    pub track_rotation: bool,
    /// Ease towards the new focus instead of snapping to it.
    pub soft: bool,
}

/// Camera state, installed as the behavior of the camera group.
#[derive(Clone, Debug)]
pub struct Camera {
    view: NodeId,
    focus: Option<NodeId>,
    target: Point,
    damping: f64,
    zoom: f64,
    limits: Rect,
    track_rotation: bool,
    rotation_offset: f64,
    default_rotation: f64,
}

impl Camera {
    /// Camera behavior driving `view`.
    pub fn new(view: NodeId) -> Self {
        Self {
            view,
            focus: None,
            target: Point::ORIGIN,
            damping: 0.0,
            zoom: 1.0,
            limits: Rect::new(f64::MIN, f64::MIN, f64::MAX, f64::MAX),
            track_rotation: false,
            rotation_offset: 0.0,
            default_rotation: 0.0,
        }
    }

    /// Build a detached camera group holding its view, returning the camera group.
    pub fn create(scene: &mut Scene, position: Point) -> NodeId {
        let camera = scene.create_group();
        let view = scene.create_group();
        scene.set_position(camera, position);
        if let Err(err) = scene.insert_deferred(camera, view) {
            warn!(?err, "could not attach camera view");
        }
        scene.set_behavior(camera, Some(Box::new(Self::new(view))));
        camera
    }

    /// The inner view group of a camera.
    pub fn view(scene: &Scene, camera: NodeId) -> Option<NodeId> {
        scene.behavior::<Self>(camera).map(|c| c.view)
    }

    /// Insert `node` into the camera's view, optionally making it the focus.
    pub fn add(scene: &mut Scene, camera: NodeId, node: NodeId, focus: bool) {
        let Some(view) = Self::view(scene, camera) else {
            return;
        };
        if scene.insert(view, node).is_err() {
            return;
        }
        if focus && let Some(cam) = scene.behavior_mut::<Self>(camera) {
            cam.focus = Some(node);
        }
    }

    /// Follow `focus`, or stop following with `None`.
    ///
    /// Without [`FocusOptions::soft`] the camera snaps to the focus position
    /// and resets the view rotation.
    pub fn set_focus(scene: &mut Scene, camera: NodeId, focus: Option<NodeId>, options: FocusOptions) {
        let focus_position = focus.and_then(|f| scene.position(f));
        let Some(cam) = scene.behavior_mut::<Self>(camera) else {
            return;
        };
        cam.focus = focus_position.and(focus);
        if let Some(p) = focus_position
            && !options.soft
        {
            cam.target = p;
        }
        cam.default_rotation = 0.0;
        cam.track_rotation = options.track_rotation;
        let view = cam.view;
        if !options.soft {
            scene.set_rotation(view, 0.0);
        }
    }

    /// Scale the view uniformly.
    pub fn set_zoom(scene: &mut Scene, camera: NodeId, zoom: f64) {
        let Some(cam) = scene.behavior_mut::<Self>(camera) else {
            return;
        };
        cam.zoom = zoom;
        let view = cam.view;
        scene.set_scale(view, Vec2::new(zoom, zoom));
    }

    /// Current focus node.
    pub fn focus(&self) -> Option<NodeId> {
        self.focus
    }

    /// Current zoom.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Current damping.
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Set damping in `0..=1`: 0 tracks instantly, 1 never moves.
    pub fn set_damping(&mut self, damping: f64) {
        self.damping = damping.clamp(0.0, 1.0);
    }

    /// Clamp the tracked target to `limits` (in view space).
    pub fn set_limits(&mut self, limits: Rect) {
        self.limits = limits;
    }

    /// Extra rotation in degrees added to the focus rotation when tracking it.
    pub fn set_rotation_offset(&mut self, degrees: f64) {
        self.rotation_offset = degrees;
    }

    /// View rotation used when not tracking the focus rotation.
    pub fn set_default_rotation(&mut self, degrees: f64) {
        self.default_rotation = degrees;
    }

    /// Stop following.
    pub fn remove_focus(&mut self) {
        self.focus = None;
    }
}

impl Behavior for Camera {
    fn update(&mut self, scene: &mut Scene, _id: NodeId, _frame: &FrameEvent) {
        let Some(focus) = self.focus else {
            return;
        };
        let (Some(focus_pos), Some(focus_rot), Some(view_rot)) = (
            scene.position(focus),
            scene.rotation(focus),
            scene.rotation(self.view),
        ) else {
            self.focus = None;
            return;
        };
        let follow = 1.0 - self.damping;

        let target_rotation = if self.track_rotation {
            -(focus_rot + self.rotation_offset)
        } else {
            self.default_rotation
        };
        let rotation = view_rot - (view_rot - target_rotation) * follow;

        let target = self.target - (self.target - focus_pos) * follow;
        self.target = Point::new(
            target.x.clamp(self.limits.x0, self.limits.x1),
            target.y.clamp(self.limits.y0, self.limits.y1),
        );

        let offset = (Affine::rotate(rotation.to_radians()) * self.target).to_vec2() * -self.zoom;
        scene.set_rotation(self.view, rotation);
        scene.set_position(self.view, offset.to_point());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenery_graph::Paint;
    use scenery_shape::Path;

    fn setup() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let camera = Camera::create(&mut scene, Point::new(100.0, 100.0));
        scene.insert(scene.root(), camera).unwrap();
        let player = scene.create_leaf(Path::circle(5.0), Paint::default());
        scene.set_position(player, Point::new(30.0, 40.0));
        Camera::add(&mut scene, camera, player, true);
        (scene, camera, player)
    }

    #[test]
    fn snaps_view_onto_focus() {
        let (mut scene, camera, player) = setup();
        Camera::set_focus(&mut scene, camera, Some(player), FocusOptions::default());
        scene.run_behavior(camera, &FrameEvent::default());
        let view = Camera::view(&scene, camera).unwrap();
        assert_eq!(scene.position(view), Some(Point::new(-30.0, -40.0)));
    }

    #[test]
    fn damping_eases_towards_focus() {
        let (mut scene, camera, player) = setup();
        scene.behavior_mut::<Camera>(camera).unwrap().set_damping(0.5);
        scene.run_behavior(camera, &FrameEvent::default());
        let view = Camera::view(&scene, camera).unwrap();
        // Target starts at the origin and moves half way to (30, 40).
        assert_eq!(scene.position(view), Some(Point::new(-15.0, -20.0)));
        assert_eq!(scene.behavior::<Camera>(camera).unwrap().focus(), Some(player));
    }

    #[test]
    fn limits_clamp_the_target() {
        let (mut scene, camera, _player) = setup();
        scene
            .behavior_mut::<Camera>(camera)
            .unwrap()
            .set_limits(Rect::new(0.0, 0.0, 10.0, 10.0));
        scene.run_behavior(camera, &FrameEvent::default());
        let view = Camera::view(&scene, camera).unwrap();
        assert_eq!(scene.position(view), Some(Point::new(-10.0, -10.0)));
    }

    #[test]
    fn zoom_scales_view_and_offset() {
        let (mut scene, camera, _player) = setup();
        Camera::set_zoom(&mut scene, camera, 2.0);
        scene.run_behavior(camera, &FrameEvent::default());
        let view = Camera::view(&scene, camera).unwrap();
        assert_eq!(scene.scale(view), Some(Vec2::new(2.0, 2.0)));
        assert_eq!(scene.position(view), Some(Point::new(-60.0, -80.0)));
    }

    #[test]
    fn destroyed_focus_stops_tracking() {
        let (mut scene, camera, player) = setup();
        scene.destroy(player);
        scene.run_behavior(camera, &FrameEvent::default());
        assert_eq!(scene.behavior::<Camera>(camera).unwrap().focus(), None);
    }
}
