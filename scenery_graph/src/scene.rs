// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: node storage, structure edits, bounds, dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use kurbo::{Affine, Point, Vec2};
use scenery_shape::Path;
use tracing::{debug, trace, warn};

use crate::bounds::{anchor_offset, map_child_local, offset_bounds, rotate_bounds};
use crate::error::{HierarchyViolation, SceneError, SceneResult};
use crate::event::{
    Event, EventType, FrameEvent, HoverEvent, HoverMark, Listener, ListenerId, ListenerScope,
    Listeners, Payload, Phase, run_entries,
};
use crate::types::{Bounds, NodeFlags, NodeId, NodeKind, Paint, WorldBounds};

/// Per-node update hook, run by the frame driver right after the node's
/// `EnterFrame` listeners.
///
/// Physics bodies, tweens, sprite animation, and camera tracking attach here.
/// An installed hook can be reached again through [`Scene::behavior_mut`].
pub trait Behavior: Any {
    /// Advance the node by one frame.
    fn update(&mut self, scene: &mut Scene, id: NodeId, frame: &FrameEvent);
}

pub(crate) struct Node {
    generation: u32,
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Point,
    rotation: f64,
    scale: Vec2,
    anchor: Vec2,
    alpha: f64,
    flags: NodeFlags,
    path: Path,
    paint: Paint,
    local_bounds: Bounds,
    world_bounds: WorldBounds,
    anchor_offset: Vec2,
    world_transform: Affine,
    hover: Option<HoverMark>,
    listeners: Listeners,
    behavior: Option<Box<dyn Behavior>>,
}

impl Node {
    fn new(generation: u32, kind: NodeKind, path: Path, paint: Paint) -> Self {
        Self {
            generation,
            kind,
            parent: None,
            children: Vec::new(),
            position: Point::ORIGIN,
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            anchor: Vec2::new(0.5, 0.5),
            alpha: 1.0,
            flags: NodeFlags::default(),
            path,
            paint,
            local_bounds: Bounds::ZERO,
            world_bounds: WorldBounds::default(),
            anchor_offset: Vec2::ZERO,
            world_transform: Affine::IDENTITY,
            hover: None,
            listeners: Listeners::new(ListenerScope::Node),
            behavior: None,
        }
    }

    fn own_box(&self) -> Bounds {
        if self.path.is_empty() {
            Bounds::ZERO
        } else {
            Bounds::from(self.path.extents())
        }
    }
}

/// Arena of scene nodes rooted at a single group.
///
/// Every node is addressed by a generational [`NodeId`]. Accessors and setters
/// silently ignore stale handles; structural edits report them through
/// [`SceneError`].
///
/// Geometry and orientation setters mark the node and its ancestors dirty.
/// Bounds are refreshed by [`Scene::recompute_bounds`] or, lazily, by the frame
/// traversal when it reaches a dirty node.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use scenery_graph::{Bounds, Paint, Scene};
/// use scenery_shape::Path;
///
/// let mut scene = Scene::new();
/// let a = scene.create_group();
/// scene.insert(scene.root(), a).unwrap();
///
/// let b = scene.create_leaf(Path::rect(40.0, 40.0), Paint::default());
/// scene.set_position(b, Point::new(20.0, 0.0));
/// scene.insert(a, b).unwrap();
///
/// assert_eq!(scene.local_bounds(a), Some(Bounds::new(0.0, -20.0, 40.0, 20.0)));
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene holding only its root group.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
        };
        scene.root = scene.alloc(NodeKind::Group, Path::empty(), Paint::default());
        scene
    }

    /// The root group. It lives as long as the scene.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn alloc(&mut self, kind: NodeKind, path: Path, paint: Paint) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind, path, paint));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Node::new(generation, kind, path, paint)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    /// Create a detached drawable leaf. It is not drawn until inserted.
    pub fn create_leaf(&mut self, path: Path, paint: Paint) -> NodeId {
        let id = self.alloc(NodeKind::Leaf, path, paint);
        self.recompute_bounds(id);
        id
    }

    /// Create a detached, empty group.
    pub fn create_group(&mut self) -> NodeId {
        let id = self.alloc(NodeKind::Group, Path::empty(), Paint::default());
        self.recompute_bounds(id);
        id
    }

    // --- liveness and structure ---

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns `true` for live groups.
    pub fn is_group(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Group)
    }

    /// Structural variant of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node_opt(id).map(|n| n.kind)
    }

    /// Parent of a live node; `None` for the root, detached nodes, or stale ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Children of a node in draw order, or an empty slice for leaves and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node_opt(id).map_or(&[], |n| &n.children)
    }

    /// Returns `true` if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if n == ancestor {
                return true;
            }
            cur = self.parent(n);
        }
        false
    }

    /// Returns `true` when the node's parent chain reaches the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// Insert `child` as the last child of `parent` and refresh the parent's bounds.
    ///
    /// A child that already has a different parent is detached from it first.
    /// Inserting a node into its current parent leaves the order unchanged.
    pub fn insert(&mut self, parent: NodeId, child: NodeId) -> SceneResult<NodeId> {
        self.insert_impl(parent, child, true)
    }

    /// Like [`Scene::insert`] but leaves the parent's bounds dirty; the next
    /// bounds pass refreshes them. Useful when building many nodes at once.
    pub fn insert_deferred(&mut self, parent: NodeId, child: NodeId) -> SceneResult<NodeId> {
        self.insert_impl(parent, child, false)
    }

    fn insert_impl(
        &mut self,
        parent: NodeId,
        child: NodeId,
        update_bounds: bool,
    ) -> SceneResult<NodeId> {
        if let Err(err) = self.check_insert(parent, child) {
            warn!(?err, "rejected insert");
            return Err(err);
        }
        let old_parent = self.node(child).parent;
        if old_parent != Some(parent) {
            if let Some(old) = old_parent {
                self.unlink_parent(child, old);
                self.mark_dirty(old);
                self.recompute_bounds(old);
            }
            self.link_parent(child, parent);
        }
        debug!(?parent, ?child, "inserted node");
        self.mark_dirty(parent);
        if update_bounds {
            self.recompute_bounds(parent);
        }
        Ok(child)
    }

    fn check_insert(&self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        let target = self.node_opt(parent).ok_or(SceneError::StaleNode(parent))?;
        if !self.is_alive(child) {
            return Err(SceneError::StaleNode(child));
        }
        let reason = if target.kind != NodeKind::Group {
            HierarchyViolation::NotAGroup
        } else if child == parent {
            HierarchyViolation::SelfInsert
        } else if child == self.root {
            HierarchyViolation::Root
        } else if self.is_ancestor_or_self(child, parent) {
            HierarchyViolation::Cycle
        } else {
            return Ok(());
        };
        Err(SceneError::hierarchy(parent, child, reason))
    }

    /// Destroy a node and its subtree.
    ///
    /// In order: `Finalize` is dispatched, an active hover is ended with a
    /// `Hover` event, children are destroyed last-first, listeners are
    /// dropped, the node leaves its parent (whose bounds are refreshed), and
    /// the slot is freed.
    ///
    /// Returns `false` for the root, stale ids, and nodes already being destroyed.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if id == self.root {
            return false;
        }
        match self.node_opt_mut(id) {
            Some(n) if !n.flags.contains(NodeFlags::DESTROYING) => {
                n.flags.insert(NodeFlags::DESTROYING);
            }
            _ => return false,
        }
        debug!(?id, "destroying node");

        self.dispatch(id, EventType::Finalize, Payload::Finalize);

        if let Some(mark) = self.node_opt_mut(id).and_then(|n| n.hover.take()) {
            self.dispatch(
                id,
                EventType::Hover,
                Payload::Hover(HoverEvent {
                    position: mark.position,
                    phase: Phase::Ended,
                }),
            );
        }

        // Children destroyed during the callbacks above are already unlinked.
        while let Some(&child) = self.children(id).last() {
            if !self.destroy(child) {
                // Already mid-destruction further up the stack.
                self.unlink_parent(child, id);
            }
        }

        let Some(node) = self.node_opt_mut(id) else {
            return true;
        };
        node.listeners.clear();
        node.behavior = None;
        if let Some(parent) = node.parent
            && self.is_alive(parent)
        {
            self.unlink_parent(id, parent);
            self.mark_dirty(parent);
            if self
                .node_opt(parent)
                .is_some_and(|p| !p.flags.contains(NodeFlags::DESTROYING))
            {
                self.recompute_bounds(parent);
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        true
    }

    /// Destroy every child of `id`, last first.
    pub fn remove_all(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children.into_iter().rev() {
            self.destroy(child);
        }
    }

    /// Move a node to the end of its parent's children so it draws on top.
    pub fn to_front(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.node_mut(parent).children;
        if let Some(pos) = siblings.iter().position(|c| *c == id) {
            siblings.remove(pos);
            siblings.push(id);
        }
    }

    /// Move a node to the start of its parent's children so it draws first.
    pub fn to_back(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let siblings = &mut self.node_mut(parent).children;
        if let Some(pos) = siblings.iter().position(|c| *c == id) {
            siblings.remove(pos);
            siblings.insert(0, id);
        }
    }

    /// Get the next node in depth-first (draw) order.
    ///
    /// Returns `None` if no next node exists or if the current node is stale.
    pub fn next_depth_first(&self, current: NodeId) -> Option<NodeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(&first_child) = self.children(current).first() {
            return Some(first_child);
        }
        let mut node = current;
        while let Some(parent) = self.parent(node) {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = parent;
        }
        None
    }

    /// Iterate over `id` and its descendants in depth-first (draw) order.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            scene: self,
            top: id,
            next: self.is_alive(id).then_some(id),
        }
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    // --- transforms ---

    /// Local transform: translate by position, rotate, then scale.
    pub fn local_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| {
            Affine::translate(n.position.to_vec2())
                * Affine::rotate(n.rotation.to_radians())
                * Affine::scale_non_uniform(n.scale.x, n.scale.y)
        })
    }

    /// Local-to-device transform recorded by the most recent traversal.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id).map(|n| n.world_transform)
    }

    /// World transform followed by the anchor offset: the transform the
    /// node's outline is drawn and hit-tested with, and that its children inherit.
    pub fn draw_transform(&self, id: NodeId) -> Option<Affine> {
        self.node_opt(id)
            .map(|n| n.world_transform * Affine::translate(n.anchor_offset))
    }

    /// Store the world transform computed by the frame driver.
    pub fn record_world_transform(&mut self, id: NodeId, transform: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.world_transform = transform;
        }
    }

    /// Map a point from the node's local space to device space.
    pub fn local_to_content(&self, id: NodeId, pt: Point) -> Option<Point> {
        self.world_transform(id).map(|tf| tf * pt)
    }

    /// Map a device-space point into the node's local space.
    ///
    /// Returns `None` for stale ids and non-invertible transforms (zero scale).
    pub fn content_to_local(&self, id: NodeId, pt: Point) -> Option<Point> {
        let tf = self.world_transform(id)?;
        if tf.determinant() == 0.0 {
            return None;
        }
        Some(tf.inverse() * pt)
    }

    // --- bounds ---

    /// Refresh the local and world bounds of `id` and its subtree.
    ///
    /// Dirty descendants are recomputed first; clean ones reuse their cached
    /// local boxes. World bounds are always rebuilt for the whole subtree
    /// since they depend on ancestor rotation.
    pub fn recompute_bounds(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.update_local(id);
        let parent_rotation = self.cumulative_rotation(self.parent(id));
        self.update_world(id, parent_rotation);
    }

    fn cumulative_rotation(&self, from: Option<NodeId>) -> f64 {
        let mut total = 0.0;
        let mut cur = from;
        while let Some(id) = cur {
            let n = self.node(id);
            total += n.rotation;
            cur = n.parent;
        }
        total
    }

    fn update_local(&mut self, id: NodeId) -> Bounds {
        let node = self.node(id);
        let mut local = node.own_box();
        let kind = node.kind;
        if kind == NodeKind::Group {
            let children = node.children.clone();
            for child in children {
                let c = self.node(child);
                let child_local = if c.flags.contains(NodeFlags::BOUNDS_DIRTY) {
                    self.update_local(child)
                } else {
                    c.local_bounds
                };
                let c = self.node(child);
                local = local.union(map_child_local(
                    child_local,
                    c.anchor_offset,
                    c.scale,
                    c.position,
                ));
            }
        }
        let n = self.node_mut(id);
        n.local_bounds = local;
        let size = if kind == NodeKind::Group && !n.flags.contains(NodeFlags::ANCHOR_CHILDREN) {
            let own = n.own_box();
            (own.width, own.height)
        } else {
            (local.width, local.height)
        };
        n.anchor_offset = anchor_offset(n.anchor, size);
        n.flags.remove(NodeFlags::BOUNDS_DIRTY);
        trace!(?id, ?local, "local bounds");
        local
    }

    /// Rebuild world bounds below `id`; returns the unrotated content box.
    fn update_world(&mut self, id: NodeId, parent_rotation: f64) {
        let node = self.node(id);
        let rotation = node.rotation;
        let mut content = if node.kind == NodeKind::Group {
            node.own_box()
        } else {
            node.local_bounds
        };
        let children = node.children.clone();
        let cumulative = parent_rotation + rotation;
        for child in children {
            self.update_world(child, cumulative);
            let c = self.node(child);
            content = content.union(offset_bounds(c.world_bounds.bounds, c.position));
        }
        let n = self.node_mut(id);
        n.world_bounds = WorldBounds {
            bounds: rotate_bounds(content, rotation),
            rotation: cumulative,
        };
    }

    /// Mark `id` and its ancestors as needing a bounds pass.
    fn mark_dirty(&mut self, id: NodeId) {
        let mut cur = Some(id);
        while let Some(n) = cur.and_then(|id| self.node_opt_mut(id)) {
            n.flags.insert(NodeFlags::BOUNDS_DIRTY);
            cur = n.parent;
        }
    }

    /// Returns `true` when the node's bounds are waiting for a bounds pass.
    pub fn is_bounds_dirty(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::BOUNDS_DIRTY))
    }

    /// Cached local bounds of a live node.
    pub fn local_bounds(&self, id: NodeId) -> Option<Bounds> {
        self.node_opt(id).map(|n| n.local_bounds)
    }

    /// Cached world bounds of a live node.
    pub fn world_bounds(&self, id: NodeId) -> Option<WorldBounds> {
        self.node_opt(id).map(|n| n.world_bounds)
    }

    /// Offset applied before drawing so the anchor point sits on the node origin.
    pub fn anchor_offset(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.anchor_offset)
    }

    // --- node fields ---

    /// Position in the parent's space.
    pub fn position(&self, id: NodeId) -> Option<Point> {
        self.node_opt(id).map(|n| n.position)
    }

    /// Rotation in degrees.
    pub fn rotation(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.rotation)
    }

    /// Per-axis scale.
    pub fn scale(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.scale)
    }

    /// Anchor as a fraction of the node's size; `(0.5, 0.5)` is the centre.
    pub fn anchor(&self, id: NodeId) -> Option<Vec2> {
        self.node_opt(id).map(|n| n.anchor)
    }

    /// Own opacity in `0..=1`.
    pub fn alpha(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.alpha)
    }

    /// Visibility flag. Invisible nodes are neither drawn nor tested.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::VISIBLE))
    }

    /// Outline of the node.
    pub fn path(&self, id: NodeId) -> Option<&Path> {
        self.node_opt(id).map(|n| &n.path)
    }

    /// Fill and stroke.
    pub fn paint(&self, id: NodeId) -> Option<&Paint> {
        self.node_opt(id).map(|n| &n.paint)
    }

    /// Width of the node's outline.
    pub fn width(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.path.width())
    }

    /// Height of the node's outline.
    pub fn height(&self, id: NodeId) -> Option<f64> {
        self.node_opt(id).map(|n| n.path.height())
    }

    /// Whether a group anchors on the aggregate bounds of its children.
    pub fn anchor_children(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::ANCHOR_CHILDREN))
    }

    fn edit(&mut self, id: NodeId, f: impl FnOnce(&mut Node) -> bool) {
        if let Some(n) = self.node_opt_mut(id)
            && f(n)
        {
            self.mark_dirty(id);
        }
    }

    /// Set the position in the parent's space.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.edit(id, |n| {
            let changed = n.position != position;
            n.position = position;
            changed
        });
    }

    /// Set the x coordinate.
    pub fn set_x(&mut self, id: NodeId, x: f64) {
        if let Some(p) = self.position(id) {
            self.set_position(id, Point::new(x, p.y));
        }
    }

    /// Set the y coordinate.
    pub fn set_y(&mut self, id: NodeId, y: f64) {
        if let Some(p) = self.position(id) {
            self.set_position(id, Point::new(p.x, y));
        }
    }

    /// Set the rotation in degrees.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        self.edit(id, |n| {
            let changed = n.rotation != degrees;
            n.rotation = degrees;
            changed
        });
    }

    /// Set both scale factors. A zero factor leaves that axis unchanged.
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.set_x_scale(id, scale.x);
        self.set_y_scale(id, scale.y);
    }

    /// Set the horizontal scale. Zero is ignored.
    pub fn set_x_scale(&mut self, id: NodeId, sx: f64) {
        if sx == 0.0 {
            return;
        }
        self.edit(id, |n| {
            let changed = n.scale.x != sx;
            n.scale.x = sx;
            changed
        });
    }

    /// Set the vertical scale. Zero is ignored.
    pub fn set_y_scale(&mut self, id: NodeId, sy: f64) {
        if sy == 0.0 {
            return;
        }
        self.edit(id, |n| {
            let changed = n.scale.y != sy;
            n.scale.y = sy;
            changed
        });
    }

    /// Set the anchor as a fraction of the node's size.
    pub fn set_anchor(&mut self, id: NodeId, anchor: Vec2) {
        self.edit(id, |n| {
            let changed = n.anchor != anchor;
            n.anchor = anchor;
            changed
        });
    }

    /// Set the outline width, scaling it horizontally.
    pub fn set_width(&mut self, id: NodeId, width: f64) {
        self.edit(id, |n| {
            n.path.set_width(width);
            true
        });
    }

    /// Set the outline height, scaling it vertically.
    pub fn set_height(&mut self, id: NodeId, height: f64) {
        self.edit(id, |n| {
            n.path.set_height(height);
            true
        });
    }

    /// Set the outline radius (circles and rounded rectangles).
    pub fn set_radius(&mut self, id: NodeId, radius: f64) {
        self.edit(id, |n| {
            n.path.set_radius(radius);
            true
        });
    }

    /// Replace the outline.
    pub fn set_path(&mut self, id: NodeId, path: Path) {
        self.edit(id, |n| {
            n.path = path;
            true
        });
    }

    /// Set the own opacity; clamped to `0..=1`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) {
        if let Some(n) = self.node_opt_mut(id) {
            n.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    /// Show or hide the node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Replace the fill and stroke.
    pub fn set_paint(&mut self, id: NodeId, paint: Paint) {
        if let Some(n) = self.node_opt_mut(id) {
            n.paint = paint;
        }
    }

    /// Anchor a group on the aggregate bounds of its children instead of its own outline.
    ///
    /// Ignored for leaves.
    pub fn set_anchor_children(&mut self, id: NodeId, enabled: bool) {
        self.edit(id, |n| {
            if n.kind != NodeKind::Group {
                return false;
            }
            n.flags.set(NodeFlags::ANCHOR_CHILDREN, enabled);
            true
        });
    }

    /// Clip the drawing of a group's children to the group's own outline.
    ///
    /// Ignored for leaves. Clipping affects drawing only; hit and hover tests
    /// are unchanged.
    pub fn set_clip_children(&mut self, id: NodeId, clip: bool) {
        if let Some(n) = self.node_opt_mut(id)
            && n.kind == NodeKind::Group
        {
            n.flags.set(NodeFlags::CLIP_CHILDREN, clip);
        }
    }

    /// Returns `true` when the group clips its children.
    pub fn clips_children(&self, id: NodeId) -> bool {
        self.node_opt(id)
            .is_some_and(|n| n.flags.contains(NodeFlags::CLIP_CHILDREN))
    }

    /// Attach (or clear) the per-frame update hook.
    pub fn set_behavior(&mut self, id: NodeId, behavior: Option<Box<dyn Behavior>>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.behavior = behavior;
            n.flags.insert(NodeFlags::BEHAVIOR_SET);
        }
    }

    /// The node's update hook, if it is a `T`.
    pub fn behavior<T: Behavior>(&self, id: NodeId) -> Option<&T> {
        let b: &dyn Any = self.node_opt(id)?.behavior.as_deref()?;
        b.downcast_ref::<T>()
    }

    /// The node's update hook, if it is a `T`.
    ///
    /// Returns `None` while the hook itself is running.
    pub fn behavior_mut<T: Behavior>(&mut self, id: NodeId) -> Option<&mut T> {
        let b: &mut dyn Any = self.node_opt_mut(id)?.behavior.as_deref_mut()?;
        b.downcast_mut::<T>()
    }

    /// Returns `true` if the node has an update hook.
    pub fn has_behavior(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some_and(|n| n.behavior.is_some())
    }

    /// Run the node's update hook, if any.
    ///
    /// The hook is detached while it runs. It is reattached afterwards unless
    /// the node died or the hook called [`Scene::set_behavior`] on its own
    /// node; clearing with `None` detaches it for good.
    pub fn run_behavior(&mut self, id: NodeId, frame: &FrameEvent) {
        let Some(mut behavior) = self.node_opt_mut(id).and_then(|n| {
            n.flags.remove(NodeFlags::BEHAVIOR_SET);
            n.behavior.take()
        }) else {
            return;
        };
        behavior.update(self, id, frame);
        if let Some(n) = self.node_opt_mut(id)
            && !n.flags.contains(NodeFlags::BEHAVIOR_SET)
            && !n.flags.contains(NodeFlags::DESTROYING)
        {
            n.behavior = Some(behavior);
        }
    }

    // --- hover state ---

    /// Hover mark stamped by the most recent containment hit.
    pub fn hover_mark(&self, id: NodeId) -> Option<HoverMark> {
        self.node_opt(id).and_then(|n| n.hover)
    }

    /// Replace the hover mark, returning the previous one.
    pub fn set_hover_mark(&mut self, id: NodeId, mark: Option<HoverMark>) -> Option<HoverMark> {
        let n = self.node_opt_mut(id)?;
        core::mem::replace(&mut n.hover, mark)
    }

    // --- listeners ---

    /// Register a listener on a node.
    ///
    /// Returns `None` for stale ids and for event types nodes do not receive
    /// (`Key`, `Wheel`, `Resize`); the callback is dropped.
    pub fn add_listener(
        &mut self,
        id: NodeId,
        ty: EventType,
        listener: impl FnMut(&mut Self, &Event) -> bool + 'static,
    ) -> Option<ListenerId> {
        let boxed: Listener = Box::new(listener);
        self.node_opt_mut(id)?.listeners.add(ty, boxed)
    }

    /// Remove a listener. Returns `true` if it was registered.
    pub fn remove_listener(&mut self, id: NodeId, ty: EventType, listener: ListenerId) -> bool {
        self.node_opt_mut(id)
            .is_some_and(|n| n.listeners.remove(ty, listener))
    }

    /// Returns `true` if the node has at least one listener for `ty`.
    pub fn has_listener(&self, id: NodeId, ty: EventType) -> bool {
        self.node_opt(id).is_some_and(|n| n.listeners.has(ty))
    }

    /// Run a node's listeners for `ty`, most recent first, until one returns `true`.
    ///
    /// Listeners may mutate the scene freely, including destroying the target.
    pub fn dispatch(&mut self, id: NodeId, ty: EventType, payload: Payload) -> bool {
        let Some(mut entries) = self
            .node_opt_mut(id)
            .and_then(|n| n.listeners.check_out(ty))
        else {
            return false;
        };
        trace!(?id, ?ty, "dispatch");
        let event = Event {
            target: Some(id),
            payload,
        };
        let handled = run_entries(&mut entries, self, &event);
        if let Some(n) = self.node_opt_mut(id) {
            n.listeners.check_in(ty, entries);
        }
        handled
    }

    // --- internals ---

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.generation()).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.generation() {
            return None;
        }
        Some(n)
    }

    /// Live node; callers have checked liveness.
    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()]
            .as_ref()
            .expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()]
            .as_mut()
            .expect("dangling NodeId")
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}

/// Depth-first iterator returned by [`Scene::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    scene: &'a Scene,
    top: NodeId,
    next: Option<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.scene.next_depth_first(current).filter(|n| {
            *n != self.top && self.scene.is_ancestor_or_self(self.top, *n)
        });
        Some(current)
    }
}
