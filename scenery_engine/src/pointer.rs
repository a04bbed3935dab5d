// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Active pointer tracking.
//!
//! A pointer is created on press, collects the nodes that claim it during the
//! first traversal after the press, and is released on lift. Released pointers
//! stay in the table until the cleanup step of the next tick so the frame that
//! observes the release still sees consistent state.
//!
//! ```
//! use kurbo::Point;
//! use scenery_engine::pointer::{PointerPhase, PointerTable};
//! use scenery_graph::PointerId;
//!
//! let mut table = PointerTable::new();
//! let id = PointerId(7);
//! assert!(table.press(id, Point::new(10.0, 20.0), 1000.0, 3));
//! assert!(!table.press(id, Point::new(0.0, 0.0), 1001.0, 3), "second press is ignored");
//!
//! let delta = table.move_to(id, Point::new(15.0, 20.0)).unwrap();
//! assert_eq!(delta.x, 5.0);
//! assert_eq!(table.get(id).unwrap().phase, PointerPhase::Began);
//!
//! table.get_mut(id).unwrap().phase = PointerPhase::Hold;
//! table.move_to(id, Point::new(15.0, 22.0));
//! assert_eq!(table.get(id).unwrap().phase, PointerPhase::Moved);
//!
//! let released = table.release(id, Point::new(15.0, 24.0)).unwrap();
//! assert_eq!(released.start_time, 1000.0);
//! table.flush_released();
//! assert!(table.get(id).is_none());
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use scenery_graph::{NodeId, PointerId, Scene};
use smallvec::SmallVec;

/// Lifecycle phase of a tracked pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    /// Pressed; `touch(began)` not yet delivered.
    Began,
    /// Held down.
    Hold,
    /// Moved since the last tick.
    Moved,
    /// Lifted or cancelled; awaiting cleanup.
    Ended,
}

/// State of one active pointer.
#[derive(Clone, Debug)]
pub struct Pointer {
    /// Pointer identifier.
    pub id: PointerId,
    /// Latest device-space position.
    pub last: Point,
    /// Device-space position of the press.
    pub start: Point,
    /// Timestamp of the press in milliseconds.
    pub start_time: f64,
    /// Frame counter value when the press arrived.
    pub start_frame: u64,
    /// Nodes that claimed the pointer, in claim order.
    pub listener_objects: Vec<NodeId>,
    /// Current phase.
    pub phase: PointerPhase,
}

impl Pointer {
    /// Returns `true` once the pointer was lifted or cancelled.
    pub fn is_released(&self) -> bool {
        self.phase == PointerPhase::Ended
    }

    /// Returns `true` while the pointer can still be claimed: it is down and
    /// pressed no earlier than the previous frame.
    pub fn is_claimable(&self, frame: u64) -> bool {
        !self.is_released() && frame <= self.start_frame + 1
    }

    /// Append `node` unless it already claimed this pointer.
    pub fn claim(&mut self, node: NodeId) -> bool {
        if self.listener_objects.contains(&node) {
            return false;
        }
        self.listener_objects.push(node);
        true
    }

    /// Drop listener objects that no longer exist.
    pub fn prune(&mut self, scene: &Scene) {
        self.listener_objects.retain(|id| scene.is_alive(*id));
    }
}

/// Snapshot handed back when a pointer is released.
#[derive(Clone, Debug)]
pub struct Released {
    /// Position of the press.
    pub start: Point,
    /// Timestamp of the press in milliseconds.
    pub start_time: f64,
    /// Nodes that claimed the pointer.
    pub listener_objects: Vec<NodeId>,
}

/// Active pointers in press order.
#[derive(Clone, Debug, Default)]
pub struct PointerTable {
    active: Vec<Pointer>,
    /// Released pointers removed by the next [`PointerTable::flush_released`].
    pending_removal: SmallVec<[PointerId; 4]>,
}

impl PointerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a press. Returns `false` if the id is already tracked.
    pub fn press(&mut self, id: PointerId, at: Point, time: f64, frame: u64) -> bool {
        if self.get(id).is_some() {
            return false;
        }
        self.active.push(Pointer {
            id,
            last: at,
            start: at,
            start_time: time,
            start_frame: frame,
            listener_objects: Vec::new(),
            phase: PointerPhase::Began,
        });
        true
    }

    /// Update a pointer position, returning the movement since the last input.
    ///
    /// A pointer stays in [`PointerPhase::Began`] until its `touch(began)` has
    /// been delivered. Unknown and released pointers are ignored.
    pub fn move_to(&mut self, id: PointerId, at: Point) -> Option<Vec2> {
        let p = self.get_mut(id).filter(|p| !p.is_released())?;
        let delta = at - p.last;
        p.last = at;
        if p.phase != PointerPhase::Began {
            p.phase = PointerPhase::Moved;
        }
        Some(delta)
    }

    /// Mark a pointer released and queue it for removal.
    ///
    /// Its listener objects are handed back and cleared so later traversals
    /// cannot claim it again. Unknown and already released pointers are ignored.
    pub fn release(&mut self, id: PointerId, at: Point) -> Option<Released> {
        let p = self.get_mut(id).filter(|p| !p.is_released())?;
        p.last = at;
        p.phase = PointerPhase::Ended;
        let released = Released {
            start: p.start,
            start_time: p.start_time,
            listener_objects: core::mem::take(&mut p.listener_objects),
        };
        self.pending_removal.push(id);
        Some(released)
    }

    /// Remove every pointer queued by [`PointerTable::release`].
    pub fn flush_released(&mut self) {
        if self.pending_removal.is_empty() {
            return;
        }
        let pending = core::mem::take(&mut self.pending_removal);
        self.active.retain(|p| !pending.contains(&p.id));
    }

    /// Look up a pointer.
    pub fn get(&self, id: PointerId) -> Option<&Pointer> {
        self.active.iter().find(|p| p.id == id)
    }

    /// Look up a pointer mutably.
    pub fn get_mut(&mut self, id: PointerId) -> Option<&mut Pointer> {
        self.active.iter_mut().find(|p| p.id == id)
    }

    /// Iterate over tracked pointers in press order.
    pub fn iter(&self) -> impl Iterator<Item = &Pointer> {
        self.active.iter()
    }

    /// Iterate mutably over tracked pointers in press order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Pointer> {
        self.active.iter_mut()
    }

    /// Identifiers of tracked pointers, in press order.
    pub fn ids(&self) -> SmallVec<[PointerId; 4]> {
        self.active.iter().map(|p| p.id).collect()
    }

    /// Number of tracked pointers, released ones included.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` when no pointer is tracked.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Returns `true` if any unreleased pointer lists `node` as a listener object.
    pub fn is_claimed_by(&self, node: NodeId) -> bool {
        self.active
            .iter()
            .any(|p| !p.is_released() && p.listener_objects.contains(&node))
    }
}
