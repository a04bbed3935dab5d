// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenery Engine: the per-frame driver for a [`scenery_graph::Scene`].
//!
//! ## Overview
//!
//! [`Engine`] owns a scene and advances it one tick at a time. Each tick walks
//! the tree depth-first from the root, in child order, and for every node:
//!
//! 1) composes its world transform from the parent's draw transform,
//! 2) dispatches `EnterFrame` and runs its [`Behavior`](scenery_graph::Behavior),
//! 3) refreshes dirty bounds,
//! 4) if visible, draws it through the [`Rasterizer`] with opacity composed
//!    down the ancestor chain, resolves pointer claims and hover, and visits
//!    its children,
//! 5) emits a [`DebugOverlay`] when debug mode is on, and dispatches `ExitFrame`.
//!
//! Children are visited against the live child list, so listeners may destroy
//! or reorder siblings mid-traversal without skipping or revisiting anyone.
//!
//! ## Pointers
//!
//! A press creates a tracked pointer. During the traversal of the frame it
//! arrived on (or the next one), every leaf under the pointer claims it for
//! the nearest ancestor group with a `Touch` or `Tap` listener and, if it has
//! such a listener itself, for itself. Groups are never hit-tested.
//!
//! Claimants receive `touch(began)`, then `touch(hold)` every tick, then
//! `touch(moved)` on movement, in claim order; the first that handles an event
//! stops it. On release, `tap` (for presses shorter than
//! [`EngineConfig::tap_time_ms`]) and `touch(ended)` are dispatched the same
//! way, independently of each other. Events nobody handles go to the
//! engine-level listeners.
//!
//! ## Hover
//!
//! Hover follows the mouse position. The nearest node with a `Hover` listener
//! (itself or an ancestor) is stamped with the frame number whenever a
//! descendant outline contains the mouse; `hover(began)` fires on the first
//! stamp and `hover(ended)` on the first frame without one.
//!
//! ## Rest of the frame
//!
//! After the traversal, [`Timers`] and registered [`Subsystem`]s advance unless
//! the engine is paused. [`Camera`] is a ready-made behavior that keeps a focus
//! node centred, [`Sprite`] plays sprite-sheet sequences, and [`Container`]
//! is a fixed-size group that clips what it holds.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod camera;
mod config;
mod container;
pub mod dispatcher;
mod engine;
mod input;
pub mod pointer;
mod rasterizer;
mod sprite;
mod subsystem;
mod timer;

pub use camera::{Camera, FocusOptions};
pub use config::{DEFAULT_TAP_TIME_MS, EngineConfig};
pub use container::Container;
pub use engine::Engine;
pub use input::{KeyInput, KeyboardState, MouseButton};
pub use rasterizer::{
    ClipItem, DebugOverlay, DrawItem, Marker, NullRasterizer, RasterOp, Rasterizer,
    RecordingRasterizer,
};
pub use sprite::{Sequence, Sprite, SpriteSheet};
pub use subsystem::Subsystem;
pub use timer::{Iterations, TimerCallback, TimerEvent, TimerId, Timers};
