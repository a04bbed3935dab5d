// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names, payloads, and per-object listener tables.
//!
//! Listeners are plain closures receiving the scene and the event. Returning
//! `true` marks the event as handled: no further listener of the same object
//! runs, and the frame driver stops propagating to other objects.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Size, Vec2};
use smallvec::SmallVec;

use crate::Scene;
use crate::types::NodeId;

/// Name of an event a listener can subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A short press-and-release.
    Tap,
    /// Pointer contact: began, hold, moved, ended.
    Touch,
    /// Mouse entering or leaving an outline.
    Hover,
    /// Start of a node's (or the frame's) processing.
    EnterFrame,
    /// End of a node's (or the frame's) processing.
    ExitFrame,
    /// The object is being destroyed.
    Finalize,
    /// Drawing surface resized (engine only).
    Resize,
    /// Scroll wheel (engine only).
    Wheel,
    /// Keyboard (engine only).
    Key,
}

impl EventType {
    /// Event types a scene node accepts listeners for.
    pub const fn is_node_event(self) -> bool {
        matches!(
            self,
            Self::Tap
                | Self::Touch
                | Self::Hover
                | Self::EnterFrame
                | Self::ExitFrame
                | Self::Finalize
        )
    }

    /// Event types the engine accepts global listeners for.
    pub const fn is_engine_event(self) -> bool {
        !matches!(self, Self::Hover | Self::Finalize)
    }
}

/// Phase of a touch, hover, or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First frame of contact (or hover entry, or key press).
    Began,
    /// Still down on a later frame.
    Hold,
    /// Moved since the last input.
    Moved,
    /// Released, cancelled, or left.
    Ended,
}

/// Identifier of a tracked pointer. Id 0 is reserved for the mouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u32);

impl PointerId {
    /// The mouse acting as a pointer.
    pub const MOUSE: Self = Self(0);
}

/// Per-frame timing, shared by reference with every callback of a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameEvent {
    /// Frame counter, incremented once per tick.
    pub frame: u64,
    /// Timestamp of the tick in milliseconds.
    pub time_stamp: f64,
    /// Milliseconds since the previous tick; 0 while paused.
    pub delta: f64,
}

/// Payload of a [`EventType::Tap`] event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapEvent {
    /// Release position in device space.
    pub position: Point,
    /// Press-to-release duration in milliseconds.
    pub duration: f64,
}

/// Payload of a [`EventType::Touch`] event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Pointer that produced the event.
    pub pointer: PointerId,
    /// Latest pointer position in device space.
    pub position: Point,
    /// Position where the press started.
    pub start: Point,
    /// Movement since the previous input; zero outside [`Phase::Moved`].
    pub delta: Vec2,
    /// Contact phase.
    pub phase: Phase,
}

/// Hover state recorded on a node: the last frame the mouse was seen inside
/// it and the mouse position at that time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverMark {
    /// Frame of the most recent containment test that hit.
    pub frame: u64,
    /// Mouse position when the mark was stamped.
    pub position: Point,
}

/// Payload of a [`EventType::Hover`] event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverEvent {
    /// Mouse position in device space.
    pub position: Point,
    /// [`Phase::Began`] on entry, [`Phase::Ended`] on exit.
    pub phase: Phase,
}

/// Modifier keys held during a key event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
}

/// Payload of a [`EventType::Key`] event.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent {
    /// Logical key value (`"a"`, `"Enter"`, …).
    pub key: String,
    /// Physical key code (`"KeyA"`, …).
    pub code: String,
    /// Modifier state.
    pub modifiers: Modifiers,
    /// [`Phase::Began`], [`Phase::Hold`], or [`Phase::Ended`].
    pub phase: Phase,
    /// Number of frames the key has been held; 0 on press and release.
    pub frame: u64,
}

/// Payload of a [`EventType::Wheel`] event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    /// Scroll amount per axis.
    pub delta: Vec2,
}

/// Payload of a [`EventType::Resize`] event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResizeEvent {
    /// New surface size.
    pub size: Size,
    /// Centre of the surface.
    pub center: Point,
}

/// Event-specific data.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// [`EventType::EnterFrame`] / [`EventType::ExitFrame`].
    Frame(FrameEvent),
    /// [`EventType::Tap`].
    Tap(TapEvent),
    /// [`EventType::Touch`].
    Touch(TouchEvent),
    /// [`EventType::Hover`].
    Hover(HoverEvent),
    /// [`EventType::Finalize`].
    Finalize,
    /// [`EventType::Key`].
    Key(KeyEvent),
    /// [`EventType::Wheel`].
    Wheel(WheelEvent),
    /// [`EventType::Resize`].
    Resize(ResizeEvent),
}

/// An event as seen by a listener.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Node the event was dispatched to; `None` for engine-level events.
    pub target: Option<NodeId>,
    /// Event data.
    pub payload: Payload,
}

/// A listener callback. Return `true` to mark the event handled.
pub type Listener = Box<dyn FnMut(&mut Scene, &Event) -> bool>;

/// Handle returned when registering a listener, used to remove it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub(crate) struct Entry {
    id: ListenerId,
    callback: Listener,
}

/// Which event types a table accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListenerScope {
    /// Scene node: tap, touch, hover, enter/exit frame, finalize.
    Node,
    /// Engine: everything but hover and finalize.
    Engine,
}

/// Ordered listener table keyed by event type.
///
/// Entries for an event type can be checked out while their callbacks run, so
/// callbacks are free to add or remove listeners on the same table; such
/// changes are merged back when the dispatch completes.
pub struct Listeners {
    scope: ListenerScope,
    table: HashMap<EventType, Vec<Entry>>,
    next_id: u64,
    /// Event types currently checked out, with the ids of their entries.
    in_flight: SmallVec<[(EventType, Vec<ListenerId>); 2]>,
    /// Removals requested while the entry was checked out.
    detached: SmallVec<[ListenerId; 2]>,
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut counts: Vec<(EventType, usize)> =
            self.table.iter().map(|(k, v)| (*k, v.len())).collect();
        counts.sort_by_key(|(k, _)| *k as u8);
        f.debug_struct("Listeners")
            .field("scope", &self.scope)
            .field("counts", &counts)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl Listeners {
    /// Create an empty table accepting the event types of `scope`.
    pub fn new(scope: ListenerScope) -> Self {
        Self {
            scope,
            table: HashMap::new(),
            next_id: 0,
            in_flight: SmallVec::new(),
            detached: SmallVec::new(),
        }
    }

    fn accepts(&self, ty: EventType) -> bool {
        match self.scope {
            ListenerScope::Node => ty.is_node_event(),
            ListenerScope::Engine => ty.is_engine_event(),
        }
    }

    /// Register `callback` for `ty`.
    ///
    /// Returns `None` (and drops the callback) when the table does not accept `ty`.
    pub fn add(&mut self, ty: EventType, callback: Listener) -> Option<ListenerId> {
        if !self.accepts(ty) {
            return None;
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.table
            .entry(ty)
            .or_default()
            .push(Entry { id, callback });
        Some(id)
    }

    /// Remove a listener. Returns `true` if it was registered for `ty`.
    pub fn remove(&mut self, ty: EventType, id: ListenerId) -> bool {
        if let Some(entries) = self.table.get_mut(&ty)
            && let Some(pos) = entries.iter().position(|e| e.id == id)
        {
            entries.remove(pos);
            return true;
        }
        if self.is_checked_out(ty, id) {
            self.detached.push(id);
            return true;
        }
        false
    }

    /// Returns `true` if at least one listener is registered for `ty`.
    pub fn has(&self, ty: EventType) -> bool {
        self.table.get(&ty).is_some_and(|e| !e.is_empty())
            || self
                .in_flight
                .iter()
                .any(|(t, ids)| *t == ty && ids.iter().any(|id| !self.detached.contains(id)))
    }

    /// Returns `true` if the listener `id` is registered for `ty`.
    pub fn contains(&self, ty: EventType, id: ListenerId) -> bool {
        self.table
            .get(&ty)
            .is_some_and(|e| e.iter().any(|e| e.id == id))
            || self.is_checked_out(ty, id)
    }

    /// `id` is running in a dispatch of `ty` and has not been removed yet.
    fn is_checked_out(&self, ty: EventType, id: ListenerId) -> bool {
        !self.detached.contains(&id)
            && self
                .in_flight
                .iter()
                .any(|(t, ids)| *t == ty && ids.contains(&id))
    }

    /// Drop every listener.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Run the listeners of `ty`, most recently added first, until one returns `true`.
    pub fn dispatch(&mut self, scene: &mut Scene, ty: EventType, event: &Event) -> bool {
        let Some(mut entries) = self.check_out(ty) else {
            return false;
        };
        let handled = run_entries(&mut entries, scene, event);
        self.check_in(ty, entries);
        handled
    }

    pub(crate) fn check_out(&mut self, ty: EventType) -> Option<Vec<Entry>> {
        let entries = self.table.remove(&ty)?;
        if entries.is_empty() {
            return None;
        }
        self.in_flight
            .push((ty, entries.iter().map(|e| e.id).collect()));
        Some(entries)
    }

    pub(crate) fn check_in(&mut self, ty: EventType, mut entries: Vec<Entry>) {
        if let Some(pos) = self.in_flight.iter().position(|(t, _)| *t == ty) {
            self.in_flight.remove(pos);
        }
        if !self.detached.is_empty() {
            let detached = core::mem::take(&mut self.detached);
            entries.retain(|e| !detached.contains(&e.id));
        }
        // Listeners added during dispatch land in a fresh vector; keep them after the originals.
        if let Some(added) = self.table.remove(&ty) {
            entries.extend(added);
        }
        if !entries.is_empty() {
            self.table.insert(ty, entries);
        }
    }
}

pub(crate) fn run_entries(entries: &mut [Entry], scene: &mut Scene, event: &Event) -> bool {
    entries
        .iter_mut()
        .rev()
        .any(|entry| (entry.callback)(scene, event))
}
