// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-size clipping groups.

use kurbo::Size;
use scenery_graph::{NodeId, Paint, Scene, SceneResult};
use scenery_shape::Path;
use tracing::warn;

/// A group with a fixed rect outline that clips the drawing of its content.
///
/// Content lives in an inner *view* group, so it can be scrolled by moving the
/// view while the clip stays put. The handle is plain data; it stays valid
/// until the container node is destroyed.
///
/// ```
/// use scenery_engine::{Engine, RasterOp, RecordingRasterizer};
///
/// let mut engine = Engine::default();
/// let panel = engine.new_container(200.0, 150.0, 100.0, 60.0);
/// let item = engine.new_rect(0.0, 0.0, 300.0, 20.0);
/// panel.insert(engine.scene_mut(), item).unwrap();
///
/// let mut raster = RecordingRasterizer::new();
/// engine.tick(0.0, &mut raster);
/// assert!(raster.ops.contains(&RasterOp::PushClip(panel.node())));
/// assert_eq!(raster.ops.last(), Some(&RasterOp::PopClip));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Container {
    node: NodeId,
    view: NodeId,
}

impl Container {
    /// Build a detached `width` x `height` container centred on its origin.
    pub fn create(scene: &mut Scene, width: f64, height: f64) -> Self {
        let node = scene.create_group();
        scene.set_path(node, Path::rect(width, height));
        scene.set_paint(node, Paint::default());
        scene.set_clip_children(node, true);
        let view = scene.create_group();
        if let Err(err) = scene.insert_deferred(node, view) {
            warn!(?err, "could not attach container view");
        }
        Self { node, view }
    }

    /// The clipping group; position and insert this one.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The inner group holding the content.
    pub fn view(&self) -> NodeId {
        self.view
    }

    /// Size of the clip region.
    pub fn size(&self, scene: &Scene) -> Option<Size> {
        let path = scene.path(self.node)?;
        Some(Size::new(path.width(), path.height()))
    }

    /// Change the size of the clip region.
    pub fn set_size(&self, scene: &mut Scene, size: Size) {
        scene.set_width(self.node, size.width);
        scene.set_height(self.node, size.height);
    }

    /// Insert `child` into the content view.
    pub fn insert(&self, scene: &mut Scene, child: NodeId) -> SceneResult<NodeId> {
        scene.insert(self.view, child)
    }

    /// Destroy all content, keeping the container and its view.
    pub fn remove_all(&self, scene: &mut Scene) {
        scene.remove_all(self.view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn content_goes_into_the_view() {
        let mut scene = Scene::new();
        let panel = Container::create(&mut scene, 40.0, 20.0);
        scene.insert(scene.root(), panel.node()).unwrap();
        let a = scene.create_leaf(Path::rect(10.0, 10.0), Paint::default());
        let b = scene.create_leaf(Path::rect(10.0, 10.0), Paint::default());
        panel.insert(&mut scene, a).unwrap();
        panel.insert(&mut scene, b).unwrap();

        assert_eq!(scene.children(panel.node()), [panel.view()]);
        assert_eq!(scene.children(panel.view()), [a, b]);
        assert!(scene.clips_children(panel.node()));

        panel.remove_all(&mut scene);
        assert!(scene.children(panel.view()).is_empty());
        assert!(scene.is_alive(panel.view()));
        assert!(!scene.is_alive(a));
    }

    #[test]
    fn size_follows_the_outline() {
        let mut scene = Scene::new();
        let panel = Container::create(&mut scene, 40.0, 20.0);
        assert_eq!(panel.size(&scene), Some(Size::new(40.0, 20.0)));
        panel.set_size(&mut scene, Size::new(80.0, 10.0));
        assert_eq!(panel.size(&scene), Some(Size::new(80.0, 10.0)));
        scene.recompute_bounds(panel.node());
        let local = scene.local_bounds(panel.node()).unwrap();
        assert_eq!((local.width, local.height), (80.0, 10.0));
    }

    #[test]
    fn scrolling_moves_the_view_not_the_clip() {
        let mut scene = Scene::new();
        let panel = Container::create(&mut scene, 40.0, 20.0);
        scene.set_position(panel.view(), Point::new(0.0, -15.0));
        assert_eq!(scene.position(panel.node()), Some(Point::ORIGIN));
        assert_eq!(scene.position(panel.view()), Some(Point::new(0.0, -15.0)));
    }
}
