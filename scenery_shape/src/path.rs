// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The path/bounds primitive: a shape outline plus its local extents.

use kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Shape, Size, Vec2};

use crate::{HitParams, HitScore, PreciseHitTest};

/// Flattening tolerance used when converting curved geometry to a [`BezPath`].
const OUTLINE_TOLERANCE: f64 = 0.1;

/// Underlying outline of a [`Path`], expressed at its natural size.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Geometry {
    /// No outline; contributes empty extents and never hits.
    #[default]
    Empty,
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Rectangle with rounded corners.
    RoundedRect(RoundedRect),
    /// Filled disk.
    Circle(Circle),
    /// Closed polygon built from a vertex list.
    Polygon(BezPath),
}

impl Geometry {
    fn bounding_box(&self) -> Rect {
        match self {
            Self::Empty => Rect::ZERO,
            Self::Rect(r) => *r,
            Self::RoundedRect(rr) => rr.bounding_box(),
            Self::Circle(c) => c.bounding_box(),
            Self::Polygon(p) => p.bounding_box(),
        }
    }

    /// Radius the geometry was built with, if it has one.
    fn natural_radius(&self) -> Option<f64> {
        match self {
            Self::Circle(c) => Some(c.radius),
            Self::RoundedRect(rr) => Some(rr.radii().top_left),
            _ => None,
        }
    }
}

/// A shape outline with its extents in local space.
///
/// A path remembers the size it was built with (its *natural* size) and the
/// size it was last set to. Resizing scales the outline rather than
/// rebuilding it, so [`Path::scale`] is the ratio between the two.
///
/// Rect-like shapes are centred on the local origin.
///
/// ```
/// use kurbo::Point;
/// use scenery_shape::Path;
///
/// let mut path = Path::rect(40.0, 20.0);
/// assert!(path.contains(Point::new(19.0, 9.0)));
///
/// path.set_width(80.0);
/// assert_eq!(path.width(), 80.0);
/// assert!(path.contains(Point::new(39.0, 0.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    geometry: Geometry,
    natural: Size,
    size: Size,
}

impl Path {
    /// An empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    fn from_geometry(geometry: Geometry) -> Self {
        let natural = geometry.bounding_box().size();
        Self {
            geometry,
            natural,
            size: natural,
        }
    }

    /// A `width × height` rectangle centred on the origin.
    pub fn rect(width: f64, height: f64) -> Self {
        Self::from_geometry(Geometry::Rect(Rect::new(
            -width * 0.5,
            -height * 0.5,
            width * 0.5,
            height * 0.5,
        )))
    }

    /// A `width × height` rounded rectangle centred on the origin.
    pub fn rounded_rect(width: f64, height: f64, radius: f64) -> Self {
        let rect = Rect::new(-width * 0.5, -height * 0.5, width * 0.5, height * 0.5);
        Self::from_geometry(Geometry::RoundedRect(RoundedRect::from_rect(rect, radius)))
    }

    /// A circle of `radius` centred on the origin.
    pub fn circle(radius: f64) -> Self {
        Self::from_geometry(Geometry::Circle(Circle::new(Point::ORIGIN, radius)))
    }

    /// A closed polygon through `vertices`, in local coordinates.
    ///
    /// Fewer than three vertices produce an outline with no interior.
    pub fn polygon(vertices: impl IntoIterator<Item = Point>) -> Self {
        let mut path = BezPath::new();
        for (i, v) in vertices.into_iter().enumerate() {
            if i == 0 {
                path.move_to(v);
            } else {
                path.line_to(v);
            }
        }
        if path.elements().is_empty() {
            return Self::empty();
        }
        path.close_path();
        Self::from_geometry(Geometry::Polygon(path))
    }

    /// The underlying outline at its natural size.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Returns `true` when the path has no outline.
    pub fn is_empty(&self) -> bool {
        matches!(self.geometry, Geometry::Empty)
    }

    /// Current (set) width.
    pub fn width(&self) -> f64 {
        self.size.width
    }

    /// Current (set) height.
    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// Current radius for circles and rounded rectangles, `None` otherwise.
    pub fn radius(&self) -> Option<f64> {
        self.geometry
            .natural_radius()
            .map(|r| r * self.scale().x)
    }

    /// Set the width, scaling the outline horizontally.
    pub fn set_width(&mut self, width: f64) {
        self.size.width = width;
    }

    /// Set the height, scaling the outline vertically.
    pub fn set_height(&mut self, height: f64) {
        self.size.height = height;
    }

    /// Set the radius, scaling the outline uniformly.
    ///
    /// Ignored for geometry without a radius or with a zero natural radius.
    pub fn set_radius(&mut self, radius: f64) {
        if let Some(natural) = self.geometry.natural_radius()
            && natural != 0.0
        {
            let factor = radius / natural;
            self.size = Size::new(self.natural.width * factor, self.natural.height * factor);
        }
    }

    /// Scale from the natural outline to the current size.
    ///
    /// An axis with a zero natural extent reports a scale of 1.
    pub fn scale(&self) -> Vec2 {
        let sx = if self.natural.width != 0.0 {
            self.size.width / self.natural.width
        } else {
            1.0
        };
        let sy = if self.natural.height != 0.0 {
            self.size.height / self.natural.height
        } else {
            1.0
        };
        Vec2::new(sx, sy)
    }

    /// Extents of the scaled outline in local space.
    pub fn extents(&self) -> Rect {
        let scale = self.scale();
        Affine::scale_non_uniform(scale.x, scale.y).transform_rect_bbox(self.geometry.bounding_box())
    }

    /// The scaled outline, for rasterizers.
    pub fn to_bez_path(&self) -> BezPath {
        let outline = match &self.geometry {
            Geometry::Empty => return BezPath::new(),
            Geometry::Rect(r) => r.to_path(OUTLINE_TOLERANCE),
            Geometry::RoundedRect(rr) => rr.to_path(OUTLINE_TOLERANCE),
            Geometry::Circle(c) => c.to_path(OUTLINE_TOLERANCE),
            Geometry::Polygon(p) => p.clone(),
        };
        let scale = self.scale();
        Affine::scale_non_uniform(scale.x, scale.y) * outline
    }

    /// Returns `true` when `pt` (local coordinates) lies inside the outline.
    pub fn contains(&self, pt: Point) -> bool {
        self.hit_test_local(pt, &HitParams::default()).is_some()
    }

    /// Undo the set-size scale; `None` when an axis is collapsed to zero.
    fn to_natural(&self, pt: Point) -> Option<Point> {
        let scale = self.scale();
        if scale.x == 0.0 || scale.y == 0.0 {
            return None;
        }
        Some(Point::new(pt.x / scale.x, pt.y / scale.y))
    }
}

impl PreciseHitTest for Path {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let pt = self.to_natural(pt)?;
        match &self.geometry {
            Geometry::Empty => None,
            Geometry::Rect(r) => r.hit_test_local(pt, params),
            Geometry::RoundedRect(rr) => rr.hit_test_local(pt, params),
            Geometry::Circle(c) => c.hit_test_local(pt, params),
            Geometry::Polygon(p) => p.hit_test_local(pt, params),
        }
    }
}
