// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape outlines and precise point-in-shape tests for the Scenery scene graph.
//!
//! Every drawable node in a Scenery scene owns a [`Path`]: a shape outline
//! plus its axis-aligned extents in the node's local space. The frame
//! traversal maps a device-space pointer into that local space and asks the
//! path whether it was hit.
//!
//! - Build a [`Path`] with [`Path::rect`], [`Path::rounded_rect`],
//!   [`Path::circle`] or [`Path::polygon`]. Rect-like shapes are centred on
//!   the node origin.
//! - Resize it through [`Path::set_width`], [`Path::set_height`] or
//!   [`Path::set_radius`]; the outline is scaled, never rebuilt.
//! - Test points with [`Path::contains`], or with
//!   [`PreciseHitTest::hit_test_local`] when a touch tolerance is wanted.
//!
//! ```
//! use kurbo::Point;
//! use scenery_shape::{HitKind, HitParams, Path, PreciseHitTest};
//!
//! let mut path = Path::rect(20.0, 10.0);
//! assert!(path.contains(Point::new(9.0, 4.0)));
//!
//! path.set_width(40.0);
//! assert!(path.contains(Point::new(19.0, 0.0)));
//!
//! let finger = HitParams { fill_tolerance: 2.0 };
//! let hit = path.hit_test_local(Point::new(21.0, 0.0), &finger).unwrap();
//! assert_eq!(hit.kind, HitKind::Margin);
//! ```
//!
//! Strokes are cosmetic and never hit-tested.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hit;
mod path;

pub use hit::{HitKind, HitParams, HitScore, PreciseHitTest};
pub use path::{Geometry, Path};
