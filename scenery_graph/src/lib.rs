// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenery Graph: a retained-mode 2D scene tree of positioned, rotated, scaled drawables.
//!
//! The graph is the data half of the Scenery engine. It stores nodes, keeps
//! their axis-aligned bounds current, and owns the per-node listener tables
//! that the frame driver (`scenery_engine`) dispatches into.
//!
//! - Nodes live in a generational arena ([`Scene`]) and are addressed by [`NodeId`].
//! - A node is either a drawable leaf or a group owning an ordered list of
//!   children ([`NodeKind`]). Draw order is child order.
//! - Every node has a position, a rotation in degrees, a per-axis scale, an
//!   anchor, an opacity, a visibility flag, a [`Paint`], and an outline
//!   ([`scenery_shape::Path`]).
//!
//! ## Bounds
//!
//! - Local bounds are the node's outline extents. A group's local bounds are
//!   the union of its own outline and each child's local box mapped through
//!   the child's anchor offset, scale, and position. Empty boxes never pull
//!   the union towards the origin.
//! - The anchor offset moves the anchor point of the local box onto the node
//!   origin: `-(anchor - 0.5) * size`. Groups use their own outline size, or
//!   the aggregate size when [`Scene::set_anchor_children`] is on.
//! - World bounds re-project the local box through the node's rotation and
//!   carry the cumulative rotation of the ancestor chain. They are advisory
//!   (debug overlays, coarse culling) and never used for hit testing.
//!
//! Setters mark a node and its ancestors dirty; [`Scene::recompute_bounds`]
//! or the next frame traversal refreshes them.
//!
//! ## Structure edits
//!
//! - [`Scene::insert`] / [`Scene::insert_deferred`] move a node under a group,
//!   rejecting edits that would break the tree with [`SceneError`].
//! - [`Scene::destroy`] finalizes a subtree: `Finalize` listeners, hover end,
//!   children last-first, listener teardown, unlink, slot release.
//!
//! ## Events
//!
//! Listeners are closures `FnMut(&mut Scene, &Event) -> bool`. The most
//! recently added listener runs first and a `true` return stops dispatch.
//! Listeners may edit the scene, including destroying their own target.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bounds;
mod error;
mod event;
mod scene;
mod types;

pub use error::{HierarchyViolation, SceneError, SceneResult};
pub use event::{
    Event, EventType, FrameEvent, HoverEvent, HoverMark, KeyEvent, Listener, ListenerId,
    ListenerScope, Listeners, Modifiers, Payload, Phase, PointerId, ResizeEvent, TapEvent,
    TouchEvent, WheelEvent,
};
pub use scene::{Behavior, Descendants, Scene};
pub use types::{
    Bounds, Color, Fill, ImageKey, NodeFlags, NodeId, NodeKind, Paint, Stroke, WorldBounds,
};
