// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The seam between the frame traversal and whatever produces pixels.

use alloc::vec::Vec;

use kurbo::Affine;
use scenery_graph::{Color, NodeId, NodeKind, Paint, WorldBounds};
use scenery_shape::Path;

/// One drawable emitted by the traversal, in draw order.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem<'a> {
    /// Node being drawn.
    pub node: NodeId,
    /// Local-to-device transform, anchor offset included.
    pub transform: Affine,
    /// Opacity composed down the ancestor chain.
    pub alpha: f64,
    /// Outline in local space.
    pub path: &'a Path,
    /// Fill and stroke.
    pub paint: &'a Paint,
}

/// A clip region pushed before a clipping group's children are drawn.
#[derive(Clone, Copy, Debug)]
pub struct ClipItem<'a> {
    /// Group doing the clipping.
    pub node: NodeId,
    /// Local-to-device transform of the outline, anchor offset included.
    pub transform: Affine,
    /// Clip outline in local space.
    pub path: &'a Path,
}

/// Marker drawn at a node origin in debug mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    /// Rotated cross for groups.
    Cross,
    /// Small square for leaves.
    Dot,
}

/// Debug information for one node, emitted after its subtree when
/// [`EngineConfig::debug`](crate::EngineConfig::debug) is on.
#[derive(Clone, Copy, Debug)]
pub struct DebugOverlay {
    /// Node described.
    pub node: NodeId,
    /// Transform in effect for the node.
    pub transform: Affine,
    /// Origin marker.
    pub marker: Marker,
    /// World bounds, for every node but the root.
    pub world_bounds: Option<WorldBounds>,
    /// Whether an active pointer currently lists the node as a listener object.
    pub touching: bool,
}

/// Receives draw calls from [`Engine::tick`](crate::Engine::tick).
pub trait Rasterizer {
    /// Clear the surface at the start of a frame.
    fn clear(&mut self, color: Color);

    /// Draw one item.
    fn draw(&mut self, item: &DrawItem<'_>);

    /// Intersect the clip with `clip` until the matching [`Rasterizer::pop_clip`].
    /// Ignored by default.
    fn push_clip(&mut self, clip: &ClipItem<'_>) {
        let _ = clip;
    }

    /// Restore the clip in effect before the last [`Rasterizer::push_clip`].
    fn pop_clip(&mut self) {}

    /// Draw a debug overlay. Ignored by default.
    fn debug_overlay(&mut self, overlay: &DebugOverlay) {
        let _ = overlay;
    }
}

/// A rasterizer that discards everything. Useful for headless simulation.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRasterizer;

impl Rasterizer for NullRasterizer {
    fn clear(&mut self, _color: Color) {}

    fn draw(&mut self, _item: &DrawItem<'_>) {}
}

/// A recorded rasterizer call.
#[derive(Clone, Debug, PartialEq)]
pub enum RasterOp {
    /// [`Rasterizer::clear`].
    Clear(Color),
    /// [`Rasterizer::draw`].
    Draw {
        /// Node drawn.
        node: NodeId,
        /// Draw transform.
        transform: Affine,
        /// Composed opacity.
        alpha: f64,
    },
    /// [`Rasterizer::push_clip`].
    PushClip(NodeId),
    /// [`Rasterizer::pop_clip`].
    PopClip,
    /// [`Rasterizer::debug_overlay`].
    Overlay {
        /// Node described.
        node: NodeId,
        /// Marker kind.
        marker: Marker,
        /// Touch highlight.
        touching: bool,
    },
}

/// A rasterizer that records every call, for tests and tooling.
#[derive(Clone, Debug, Default)]
pub struct RecordingRasterizer {
    /// Calls in the order they were made.
    pub ops: Vec<RasterOp>,
}

impl RecordingRasterizer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes drawn since the last [`RecordingRasterizer::reset`], in draw order.
    pub fn drawn(&self) -> Vec<NodeId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                RasterOp::Draw { node, .. } => Some(*node),
                _ => None,
            })
            .collect()
    }

    /// Forget recorded calls.
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Rasterizer for RecordingRasterizer {
    fn clear(&mut self, color: Color) {
        self.ops.push(RasterOp::Clear(color));
    }

    fn draw(&mut self, item: &DrawItem<'_>) {
        self.ops.push(RasterOp::Draw {
            node: item.node,
            transform: item.transform,
            alpha: item.alpha,
        });
    }

    fn push_clip(&mut self, clip: &ClipItem<'_>) {
        self.ops.push(RasterOp::PushClip(clip.node));
    }

    fn pop_clip(&mut self) {
        self.ops.push(RasterOp::PopClip);
    }

    fn debug_overlay(&mut self, overlay: &DebugOverlay) {
        self.ops.push(RasterOp::Overlay {
            node: overlay.node,
            marker: overlay.marker,
            touching: overlay.touching,
        });
    }
}

pub(crate) fn marker_for(kind: NodeKind) -> Marker {
    match kind {
        NodeKind::Group => Marker::Cross,
        NodeKind::Leaf => Marker::Dot,
    }
}
