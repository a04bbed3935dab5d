// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene graph: node identifiers, flags, bounds, and paint.

use kurbo::Rect;

/// Identifier for a node in the scene (generational).
///
/// A handle stays valid until the node is destroyed. Slots are reused with a
/// bumped generation, so a stale handle never aliases a newer node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Per-node state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node is drawn and participates in hit and hover testing.
        const VISIBLE = 0b0000_0001;
        /// Local/world bounds are stale until the next bounds pass.
        const BOUNDS_DIRTY = 0b0000_0010;
        /// Group only: the anchor offset follows the aggregate bounds of the children.
        const ANCHOR_CHILDREN = 0b0000_0100;
        /// Destruction has started; further destroy calls are ignored.
        const DESTROYING = 0b0000_1000;
        /// `set_behavior` was called while the node's hook was running.
        const BEHAVIOR_SET = 0b0001_0000;
        /// Group only: children are drawn clipped to the group's own outline.
        const CLIP_CHILDREN = 0b0010_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::BOUNDS_DIRTY
    }
}

/// Structural variant of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// A drawable leaf; point-tested directly.
    Leaf,
    /// A node owning an ordered list of children; never point-tested itself.
    Group,
}

/// Axis-aligned box with cached extents.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    /// Minimum x.
    pub x1: f64,
    /// Minimum y.
    pub y1: f64,
    /// Maximum x.
    pub x2: f64,
    /// Maximum y.
    pub y2: f64,
    /// `x2 - x1`.
    pub width: f64,
    /// `y2 - y1`.
    pub height: f64,
}

impl Bounds {
    /// The zero box at the origin.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Build a box from its corners; width and height are derived.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Smallest box containing every point of `corners`; zero box if empty.
    pub fn from_points(corners: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut it = corners.into_iter();
        let Some((x, y)) = it.next() else {
            return Self::ZERO;
        };
        let (mut x1, mut y1, mut x2, mut y2) = (x, y, x, y);
        for (x, y) in it {
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }
        Self::new(x1, y1, x2, y2)
    }

    /// Returns `true` when the box has no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Union of two boxes; an empty operand contributes nothing.
    pub fn union(self, other: Self) -> Self {
        if other.is_empty() {
            return self;
        }
        if self.is_empty() {
            return other;
        }
        Self::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// The four corners, clockwise from the minimum corner.
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x1, self.y1),
            (self.x2, self.y1),
            (self.x2, self.y2),
            (self.x1, self.y2),
        ]
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.x2, self.y2)
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

/// Local bounds re-projected through the node's rotation.
///
/// Advisory only (debug overlays, coarse culling); never used for hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldBounds {
    /// Axis-aligned box of the rotated corners.
    pub bounds: Bounds,
    /// Own rotation plus the cumulative rotation of every ancestor, in degrees.
    pub rotation: f64,
}

/// An 8-bit RGBA color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Build a color from its components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Opaque handle to an image owned by the asset layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageKey(pub u64);

/// How a node's outline is filled.
#[derive(Clone, Debug, PartialEq)]
pub enum Fill {
    /// Flat color.
    Solid(Color),
    /// A region of an image stretched over the outline's extents.
    Image {
        /// Image to sample.
        image: ImageKey,
        /// Source region in image pixels (a sprite-sheet frame, or the whole image).
        source: Rect,
    },
    /// An image repeated across the outline.
    Pattern(ImageKey),
}

/// Outline stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    /// Line width in local units.
    pub width: f64,
    /// Stroke color.
    pub color: Color,
}

/// Everything a rasterizer needs besides geometry and transform.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Paint {
    /// Fill, if any.
    pub fill: Option<Fill>,
    /// Stroke, if any.
    pub stroke: Option<Stroke>,
}

impl Paint {
    /// A solid fill without stroke.
    pub fn solid(color: Color) -> Self {
        Self {
            fill: Some(Fill::Solid(color)),
            stroke: None,
        }
    }
}
