// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The frame driver: one depth-first traversal per tick that composes
//! transforms, refreshes bounds, draws, and routes pointer and hover input.

use alloc::boxed::Box;
use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::{Affine, Point, Size, Vec2};
use scenery_graph::{
    Event, EventType, FrameEvent, HoverEvent, HoverMark, Listener, ListenerId, ListenerScope,
    Listeners, NodeId, Paint, Payload, Phase, PointerId, ResizeEvent, Scene, TapEvent, TouchEvent,
    WheelEvent,
};
use scenery_shape::{HitParams, Path, PreciseHitTest};
use tracing::{debug, trace, warn};

use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::dispatcher::first_handler;
use crate::input::{KeyInput, KeyboardState, MouseButton};
use crate::pointer::{PointerPhase, PointerTable};
use crate::container::Container;
use crate::rasterizer::{ClipItem, DebugOverlay, DrawItem, Rasterizer, marker_for};
use crate::sprite::{Sequence, Sprite, SpriteSheet};
use crate::subsystem::Subsystem;
use crate::timer::{Iterations, TimerEvent, TimerId, Timers};

/// Touch and hover claims inherited from ancestors.
#[derive(Clone, Copy, Debug, Default)]
struct Claims {
    touch: Option<NodeId>,
    hover: Option<NodeId>,
}

/// Owns a [`Scene`] and drives it one frame at a time.
///
/// The host forwards input as it arrives (`pointer_*`, `mouse_*`, `key_*`,
/// `wheel`, `resize`) and calls [`Engine::tick`] once per display frame.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use scenery_engine::{Engine, RecordingRasterizer};
/// use scenery_graph::{EventType, PointerId};
///
/// let mut engine = Engine::default();
/// let button = engine.new_rect(100.0, 100.0, 80.0, 40.0);
/// engine.scene_mut().add_listener(button, EventType::Tap, |_, _| true);
///
/// let mut raster = RecordingRasterizer::new();
/// engine.tick(0.0, &mut raster);
/// assert_eq!(raster.drawn(), vec![button]);
///
/// engine.pointer_down(PointerId(1), Point::new(110.0, 105.0), 1000.0);
/// engine.tick(16.0, &mut raster);
/// assert_eq!(engine.pointers().get(PointerId(1)).unwrap().listener_objects, [button]);
/// ```
pub struct Engine {
    scene: Scene,
    config: EngineConfig,
    frame: FrameEvent,
    listeners: Listeners,
    pointers: PointerTable,
    mouse: Option<Point>,
    mouse_down: bool,
    hovered: Vec<NodeId>,
    keys: KeyboardState,
    timers: Timers,
    subsystems: Vec<Box<dyn Subsystem>>,
    size: Size,
    paused: bool,
    step_pending: bool,
    refocus: bool,
    last_time: Option<f64>,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("scene", &self.scene)
            .field("config", &self.config)
            .field("frame", &self.frame)
            .field("pointers", &self.pointers.len())
            .field("hovered", &self.hovered)
            .field("timers", &self.timers)
            .field("subsystems", &self.subsystems.len())
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with an empty scene.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            scene: Scene::new(),
            config,
            frame: FrameEvent::default(),
            listeners: Listeners::new(ListenerScope::Engine),
            pointers: PointerTable::new(),
            mouse: None,
            mouse_down: false,
            hovered: Vec::new(),
            keys: KeyboardState::new(),
            timers: Timers::new(),
            subsystems: Vec::new(),
            size: Size::ZERO,
            paused: false,
            step_pending: false,
            refocus: false,
            last_time: None,
        }
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The root group of the scene.
    pub fn root(&self) -> NodeId {
        self.scene.root()
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next tick.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Timing of the most recent tick.
    pub fn frame(&self) -> &FrameEvent {
        &self.frame
    }

    /// Tracked pointers.
    pub fn pointers(&self) -> &PointerTable {
        &self.pointers
    }

    /// Last known mouse position.
    pub fn mouse_position(&self) -> Option<Point> {
        self.mouse
    }

    // --- engine-level listeners ---

    /// Register an engine-level listener.
    ///
    /// Returns `None` for event types the engine does not emit (`Hover`, `Finalize`).
    pub fn add_listener(
        &mut self,
        ty: EventType,
        listener: impl FnMut(&mut Scene, &Event) -> bool + 'static,
    ) -> Option<ListenerId> {
        let boxed: Listener = Box::new(listener);
        self.listeners.add(ty, boxed)
    }

    /// Remove an engine-level listener.
    pub fn remove_listener(&mut self, ty: EventType, id: ListenerId) -> bool {
        self.listeners.remove(ty, id)
    }

    /// Returns `true` if an engine-level listener is registered for `ty`.
    pub fn has_listener(&self, ty: EventType) -> bool {
        self.listeners.has(ty)
    }

    fn dispatch_global(&mut self, ty: EventType, payload: Payload) -> bool {
        let event = Event {
            target: None,
            payload,
        };
        self.listeners.dispatch(&mut self.scene, ty, &event)
    }

    // --- frame loop ---

    /// Run one frame.
    ///
    /// Order: frame bookkeeping and engine `EnterFrame`, clear, key hold
    /// events, traversal from the root, hover sweep, pointer cleanup and
    /// `touch(began|hold)`, timers and subsystems (unless paused), engine `ExitFrame`.
    pub fn tick(&mut self, time_stamp: f64, rasterizer: &mut dyn Rasterizer) {
        let running = !self.paused || self.step_pending;
        let delta = match self.last_time {
            Some(last) if running && !self.refocus => time_stamp - last,
            _ => 0.0,
        };
        self.refocus = false;
        self.last_time = Some(time_stamp);
        self.frame.frame += 1;
        self.frame.time_stamp = time_stamp;
        self.frame.delta = delta;
        debug!(frame = self.frame.frame, delta, "tick");

        self.dispatch_global(EventType::EnterFrame, Payload::Frame(self.frame));
        rasterizer.clear(self.config.clear_color);
        self.update_keys();

        let root = self.scene.root();
        self.draw_update(root, Affine::IDENTITY, 1.0, Claims::default(), rasterizer);
        self.sweep_hover();
        self.update_touch_points();

        if running {
            let frame = self.frame;
            self.timers.update(&mut self.scene, &frame);
            for subsystem in &mut self.subsystems {
                trace!(name = subsystem.name(), "subsystem update");
                subsystem.update(&mut self.scene, &frame);
            }
        }
        if self.step_pending {
            self.step_pending = false;
            self.paused = true;
        }

        self.dispatch_global(EventType::ExitFrame, Payload::Frame(self.frame));
    }

    fn draw_update(
        &mut self,
        id: NodeId,
        parent: Affine,
        parent_alpha: f64,
        claims: Claims,
        rasterizer: &mut dyn Rasterizer,
    ) {
        let Some(local) = self.scene.local_transform(id) else {
            return;
        };
        let frame = self.frame;
        self.scene.record_world_transform(id, parent * local);
        self.scene
            .dispatch(id, EventType::EnterFrame, Payload::Frame(frame));
        self.scene.run_behavior(id, &frame);
        if !self.scene.is_alive(id) {
            return;
        }
        if self.scene.is_bounds_dirty(id) {
            self.scene.recompute_bounds(id);
        }

        let mut draw_tf = parent * local;
        if self.scene.is_visible(id) {
            let alpha = parent_alpha * self.scene.alpha(id).unwrap_or(0.0);
            draw_tf = self.scene.draw_transform(id).unwrap_or(draw_tf);
            if let (Some(path), Some(paint)) = (self.scene.path(id), self.scene.paint(id))
                && !path.is_empty()
            {
                rasterizer.draw(&DrawItem {
                    node: id,
                    transform: draw_tf,
                    alpha,
                    path,
                    paint,
                });
            }
            let inherited = Claims {
                touch: self.touch_update(id, draw_tf, claims.touch),
                hover: self.hover_update(id, draw_tf, alpha, claims.hover),
            };
            let clipped = self.scene.clips_children(id)
                && match self.scene.path(id) {
                    Some(path) if !path.is_empty() => {
                        rasterizer.push_clip(&ClipItem {
                            node: id,
                            transform: draw_tf,
                            path,
                        });
                        true
                    }
                    _ => false,
                };
            self.draw_children(id, draw_tf, alpha, inherited, rasterizer);
            if clipped {
                rasterizer.pop_clip();
            }
        }

        if self.config.debug && self.scene.is_alive(id) {
            self.debug_draw(id, draw_tf, rasterizer);
        }
        self.scene
            .dispatch(id, EventType::ExitFrame, Payload::Frame(frame));
    }

    /// Visit children of `id` against the live child list.
    ///
    /// After each child the live list is read again and the walk resumes at
    /// the next child not yet visited. Destroying or reordering siblings from
    /// a listener neither skips nor revisits anyone.
    fn draw_children(
        &mut self,
        id: NodeId,
        transform: Affine,
        alpha: f64,
        claims: Claims,
        rasterizer: &mut dyn Rasterizer,
    ) {
        let mut visited: HashSet<NodeId> = HashSet::new();
        let mut i = 0;
        while let Some(&child) = self.scene.children(id).get(i) {
            visited.insert(child);
            self.draw_update(child, transform, alpha, claims, rasterizer);
            let children = self.scene.children(id);
            i = if children.get(i) == Some(&child) {
                i + 1
            } else {
                0
            };
            while children.get(i).is_some_and(|c| visited.contains(c)) {
                i += 1;
            }
        }
    }

    /// Claim pointers for `id` and return the claim its children inherit.
    ///
    /// Groups are never point-tested; the nearest group with a touch or tap
    /// listener is handed down. Leaves test every claimable pointer against
    /// their outline.
    fn touch_update(
        &mut self,
        id: NodeId,
        draw_tf: Affine,
        parent_claim: Option<NodeId>,
    ) -> Option<NodeId> {
        let wants_touch = self.scene.has_listener(id, EventType::Touch)
            || self.scene.has_listener(id, EventType::Tap);
        if self.scene.is_group(id) {
            return if wants_touch { Some(id) } else { parent_claim };
        }
        if !wants_touch && parent_claim.is_none() {
            return None;
        }
        let Some(path) = self.scene.path(id) else {
            return parent_claim;
        };
        let frame = self.frame.frame;
        let params = self.config.hit_params;
        for pointer in self.pointers.iter_mut() {
            if !pointer.is_claimable(frame) || !hits(path, draw_tf, pointer.last, &params) {
                continue;
            }
            if let Some(claim) = parent_claim
                && pointer.claim(claim)
            {
                trace!(pointer = ?pointer.id, node = ?claim, "claimed by ancestor");
            }
            if wants_touch && pointer.claim(id) {
                trace!(pointer = ?pointer.id, node = ?id, "claimed");
            }
        }
        parent_claim
    }

    /// Stamp the hover object of `id` when the mouse is inside its outline.
    fn hover_update(
        &mut self,
        id: NodeId,
        draw_tf: Affine,
        alpha: f64,
        parent_claim: Option<NodeId>,
    ) -> Option<NodeId> {
        let hover_object = if self.scene.has_listener(id, EventType::Hover) {
            Some(id)
        } else {
            parent_claim
        };
        let (Some(object), Some(mouse)) = (hover_object, self.mouse) else {
            return hover_object;
        };
        if alpha <= 0.0 {
            return hover_object;
        }
        let inside = self
            .scene
            .path(id)
            .is_some_and(|path| hits(path, draw_tf, mouse, &self.config.hit_params));
        if inside {
            let mark = HoverMark {
                frame: self.frame.frame,
                position: mouse,
            };
            if self.scene.set_hover_mark(object, Some(mark)).is_none() {
                debug!(node = ?object, "hover began");
                self.hovered.push(object);
                self.scene.dispatch(
                    object,
                    EventType::Hover,
                    Payload::Hover(HoverEvent {
                        position: mouse,
                        phase: Phase::Began,
                    }),
                );
            }
        }
        hover_object
    }

    /// End hover on objects the traversal did not stamp this frame.
    fn sweep_hover(&mut self) {
        let frame = self.frame.frame;
        let position = self.mouse.unwrap_or(Point::ORIGIN);
        let hovered = core::mem::take(&mut self.hovered);
        let mut still = Vec::with_capacity(hovered.len());
        for object in hovered {
            let Some(mark) = self.scene.hover_mark(object) else {
                continue;
            };
            if mark.frame == frame {
                still.push(object);
                continue;
            }
            self.scene.set_hover_mark(object, None);
            debug!(node = ?object, "hover ended");
            self.scene.dispatch(
                object,
                EventType::Hover,
                Payload::Hover(HoverEvent {
                    position,
                    phase: Phase::Ended,
                }),
            );
        }
        // Objects that began hovering during the dispatches above are kept too.
        still.append(&mut self.hovered);
        self.hovered = still;
    }

    /// Drop released pointers, then deliver `touch(began|hold)` to the rest.
    fn update_touch_points(&mut self) {
        self.pointers.flush_released();
        for pointer_id in self.pointers.ids() {
            let Some(pointer) = self.pointers.get_mut(pointer_id) else {
                continue;
            };
            if pointer.is_released() {
                continue;
            }
            pointer.prune(&self.scene);
            let phase = if pointer.phase == PointerPhase::Began {
                Phase::Began
            } else {
                Phase::Hold
            };
            pointer.phase = PointerPhase::Hold;
            let objects = pointer.listener_objects.clone();
            let payload = Payload::Touch(TouchEvent {
                pointer: pointer_id,
                position: pointer.last,
                start: pointer.start,
                delta: Vec2::ZERO,
                phase,
            });
            if first_handler(&mut self.scene, &objects, EventType::Touch, &payload).is_none() {
                self.dispatch_global(EventType::Touch, payload);
            }
        }
    }

    fn update_keys(&mut self) {
        for event in self.keys.advance() {
            self.dispatch_global(EventType::Key, Payload::Key(event));
        }
    }

    fn debug_draw(&mut self, id: NodeId, transform: Affine, rasterizer: &mut dyn Rasterizer) {
        let Some(kind) = self.scene.kind(id) else {
            return;
        };
        let world_bounds = if id == self.scene.root() {
            None
        } else {
            self.scene.world_bounds(id)
        };
        rasterizer.debug_overlay(&DebugOverlay {
            node: id,
            transform,
            marker: marker_for(kind),
            world_bounds,
            touching: self.pointers.is_claimed_by(id),
        });
    }

    // --- pointer input ---

    /// A pointer touched down. A second press for a tracked id is ignored.
    pub fn pointer_down(&mut self, id: PointerId, position: Point, time_stamp: f64) {
        if self
            .pointers
            .press(id, position, time_stamp, self.frame.frame)
        {
            debug!(pointer = ?id, ?position, "pointer down");
        }
    }

    /// A pointer moved: `touch(moved)` goes to its listener objects in order,
    /// first handler wins, else to engine-level listeners.
    pub fn pointer_move(&mut self, id: PointerId, position: Point) {
        let Some(delta) = self.pointers.move_to(id, position) else {
            return;
        };
        let Some(pointer) = self.pointers.get_mut(id) else {
            return;
        };
        pointer.prune(&self.scene);
        let objects = pointer.listener_objects.clone();
        let payload = Payload::Touch(TouchEvent {
            pointer: id,
            position,
            start: pointer.start,
            delta,
            phase: Phase::Moved,
        });
        if first_handler(&mut self.scene, &objects, EventType::Touch, &payload).is_none() {
            self.dispatch_global(EventType::Touch, payload);
        }
    }

    /// A pointer lifted.
    ///
    /// A release within the tap time qualifies as a tap. Listener objects are
    /// walked in order; the first to handle `tap` and, independently, the first
    /// to handle `touch(ended)` stop their respective propagation. Unhandled
    /// events fall back to engine-level listeners. The pointer is removed at
    /// the end of the next tick.
    pub fn pointer_up(&mut self, id: PointerId, position: Point, time_stamp: f64) {
        let Some(mut released) = self.pointers.release(id, position) else {
            return;
        };
        let duration = time_stamp - released.start_time;
        debug!(pointer = ?id, duration, "pointer up");
        released
            .listener_objects
            .retain(|n| self.scene.is_alive(*n));

        let tap = (duration < self.config.tap_time_ms).then(|| {
            Payload::Tap(TapEvent {
                position,
                duration,
            })
        });
        let touch = Payload::Touch(TouchEvent {
            pointer: id,
            position,
            start: released.start,
            delta: Vec2::ZERO,
            phase: Phase::Ended,
        });

        let mut tap_handled = false;
        let mut touch_handled = false;
        for object in released.listener_objects {
            if let Some(tap) = &tap
                && !tap_handled
            {
                tap_handled = self.scene.dispatch(object, EventType::Tap, tap.clone());
            }
            if !touch_handled {
                touch_handled = self
                    .scene
                    .dispatch(object, EventType::Touch, touch.clone());
            }
            if touch_handled && (tap_handled || tap.is_none()) {
                break;
            }
        }

        if !touch_handled {
            self.dispatch_global(EventType::Touch, touch);
        }
        if let Some(tap) = tap
            && !tap_handled
        {
            self.dispatch_global(EventType::Tap, tap);
        }
    }

    /// A pointer was cancelled by the host; handled like a lift.
    pub fn pointer_cancel(&mut self, id: PointerId, position: Point, time_stamp: f64) {
        self.pointer_up(id, position, time_stamp);
    }

    /// Mouse button pressed. The primary button acts as pointer [`PointerId::MOUSE`].
    pub fn mouse_down(&mut self, button: MouseButton, position: Point, time_stamp: f64) {
        self.mouse = Some(position);
        if button == MouseButton::Primary {
            self.mouse_down = true;
            self.pointer_down(PointerId::MOUSE, position, time_stamp);
        }
    }

    /// Mouse moved. Updates the hover position and drags the mouse pointer while pressed.
    pub fn mouse_move(&mut self, position: Point) {
        if self.mouse_down {
            self.pointer_move(PointerId::MOUSE, position);
        }
        self.mouse = Some(position);
    }

    /// Mouse button released.
    pub fn mouse_up(&mut self, button: MouseButton, position: Point, time_stamp: f64) {
        self.mouse = Some(position);
        if button == MouseButton::Primary {
            self.mouse_down = false;
            self.pointer_up(PointerId::MOUSE, position, time_stamp);
        }
    }

    /// The mouse left the surface; hovers end on the next tick.
    pub fn mouse_leave(&mut self) {
        self.mouse = None;
    }

    // --- other input ---

    /// A key was pressed; emits an engine-level `Key(Began)`. Auto-repeat is ignored.
    pub fn key_down(&mut self, input: KeyInput) {
        if let Some(event) = self.keys.press(input) {
            self.dispatch_global(EventType::Key, Payload::Key(event));
        }
    }

    /// A key was released; emits an engine-level `Key(Ended)`.
    pub fn key_up(&mut self, input: &KeyInput) {
        let event = self.keys.release(input);
        self.dispatch_global(EventType::Key, Payload::Key(event));
    }

    /// Scroll input; emits an engine-level `Wheel`.
    pub fn wheel(&mut self, delta: Vec2) {
        self.dispatch_global(EventType::Wheel, Payload::Wheel(WheelEvent { delta }));
    }

    /// The drawing surface changed size; emits an engine-level `Resize`.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.size = Size::new(width, height);
        debug!(width, height, "resize");
        self.dispatch_global(
            EventType::Resize,
            Payload::Resize(ResizeEvent {
                size: self.size,
                center: self.center(),
            }),
        );
    }

    /// Surface size from the last [`Engine::resize`].
    pub fn size(&self) -> Size {
        self.size
    }

    /// Centre of the surface.
    pub fn center(&self) -> Point {
        Point::new(self.size.width * 0.5, self.size.height * 0.5)
    }

    // --- run state ---

    /// Stop advancing timers and subsystems; frame deltas read 0.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Undo [`Engine::pause`].
    pub fn resume(&mut self) {
        self.paused = false;
        self.step_pending = false;
    }

    /// While paused, run the next tick unpaused and pause again after it.
    pub fn step(&mut self) {
        if self.paused {
            self.step_pending = true;
        }
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.paused && !self.step_pending
    }

    /// Report host visibility. After a focus loss the next tick reads a zero
    /// delta instead of the time spent hidden.
    pub fn set_focus(&mut self, focused: bool) {
        if !focused {
            self.refocus = true;
        }
    }

    // --- timers and subsystems ---

    /// Run `callback` after `delay_ms`, `iterations` times (negative repeats forever).
    pub fn perform_with_delay(
        &mut self,
        delay_ms: f64,
        iterations: impl Into<Iterations>,
        callback: impl FnMut(&mut Scene, &mut TimerEvent) + 'static,
    ) -> TimerId {
        self.timers.perform_with_delay(delay_ms, iterations, callback)
    }

    /// Cancel a timer.
    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    /// Scheduled timers.
    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    /// Register a subsystem; subsystems update in registration order.
    pub fn add_subsystem(&mut self, subsystem: impl Subsystem + 'static) {
        self.subsystems.push(Box::new(subsystem));
    }

    // --- convenience constructors ---

    fn attach(&mut self, id: NodeId, x: f64, y: f64) -> NodeId {
        self.scene.set_position(id, Point::new(x, y));
        let root = self.scene.root();
        if let Err(err) = self.scene.insert_deferred(root, id) {
            warn!(?err, "could not attach new node");
        }
        id
    }

    fn leaf(&mut self, path: Path, x: f64, y: f64) -> NodeId {
        let paint = Paint::solid(self.config.fill_color);
        let id = self.scene.create_leaf(path, paint);
        self.attach(id, x, y)
    }

    /// New empty group under the root.
    pub fn new_group(&mut self, x: f64, y: f64) -> NodeId {
        let id = self.scene.create_group();
        self.attach(id, x, y)
    }

    /// New rectangle under the root, centred on `(x, y)`.
    pub fn new_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> NodeId {
        self.leaf(Path::rect(width, height), x, y)
    }

    /// New rounded rectangle under the root.
    pub fn new_rounded_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
    ) -> NodeId {
        self.leaf(Path::rounded_rect(width, height, radius), x, y)
    }

    /// New circle under the root.
    pub fn new_circle(&mut self, x: f64, y: f64, radius: f64) -> NodeId {
        self.leaf(Path::circle(radius), x, y)
    }

    /// New polygon under the root; vertices are in local coordinates.
    pub fn new_polygon(&mut self, x: f64, y: f64, vertices: impl IntoIterator<Item = Point>) -> NodeId {
        self.leaf(Path::polygon(vertices), x, y)
    }

    /// New [`Camera`] under the root.
    pub fn new_camera(&mut self, x: f64, y: f64) -> NodeId {
        let id = Camera::create(&mut self.scene, Point::ORIGIN);
        self.attach(id, x, y)
    }

    /// New `width` x `height` [`Container`] under the root, centred on `(x, y)`.
    pub fn new_container(&mut self, x: f64, y: f64, width: f64, height: f64) -> Container {
        let container = Container::create(&mut self.scene, width, height);
        self.attach(container.node(), x, y);
        container
    }

    /// New [`Sprite`] under the root, sized like the first frame of `sheet`.
    pub fn new_sprite(
        &mut self,
        x: f64,
        y: f64,
        sheet: SpriteSheet,
        sequences: impl IntoIterator<Item = Sequence>,
    ) -> NodeId {
        let size = sheet.frames.first().map(|r| r.size()).unwrap_or_default();
        let id = Sprite::create(&mut self.scene, sheet, sequences, size.width, size.height);
        self.attach(id, x, y)
    }
}

/// Test a device-space point against an outline drawn with `draw_tf`.
fn hits(path: &Path, draw_tf: Affine, pt: Point, params: &HitParams) -> bool {
    if path.is_empty() || draw_tf.determinant() == 0.0 {
        return false;
    }
    path.hit_test_local(draw_tf.inverse() * pt, params).is_some()
}
