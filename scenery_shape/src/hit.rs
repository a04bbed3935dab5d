// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Narrow-phase point-in-outline tests in local coordinates.

use kurbo::{BezPath, Circle, Point, Rect, RoundedRect, Shape};

/// Where a hit landed relative to the outline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HitKind {
    /// Inside the filled outline.
    Inside,
    /// Outside the outline but within [`HitParams::fill_tolerance`] of it.
    Margin,
}

/// Tolerances for a hit test.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitParams {
    /// Width of the band around an outline that still counts as a hit, in
    /// local units. Zero means exact containment.
    pub fill_tolerance: f64,
}

/// Result of a successful hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the point to the outline; 0 for inside hits.
    pub distance: f64,
    /// Inside or in the tolerance band.
    pub kind: HitKind,
}

impl HitScore {
    /// A hit inside the outline.
    pub const INSIDE: Self = Self {
        distance: 0.0,
        kind: HitKind::Inside,
    };

    /// Score a point `distance` away from the outline against the tolerance band.
    fn from_distance(distance: f64, params: &HitParams) -> Option<Self> {
        if distance <= 0.0 {
            Some(Self::INSIDE)
        } else if distance <= params.fill_tolerance {
            Some(Self {
                distance,
                kind: HitKind::Margin,
            })
        } else {
            None
        }
    }
}

/// Shapes that can tell whether a local-space point hits them.
pub trait PreciseHitTest {
    /// Test `pt`, given in the shape's own coordinate space.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

impl PreciseHitTest for Rect {
    /// Edges are inclusive on every side.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let r = self.abs();
        let nearest = Point::new(pt.x.clamp(r.x0, r.x1), pt.y.clamp(r.y0, r.y1));
        HitScore::from_distance(pt.distance(nearest), params)
    }
}

impl PreciseHitTest for Circle {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let outside = (self.center.distance(pt) - self.radius.abs()).max(0.0);
        HitScore::from_distance(outside, params)
    }
}

impl PreciseHitTest for RoundedRect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        filled_outline(self, pt, params)
    }
}

/// Non-zero winding, as used by kurbo's `contains`.
impl PreciseHitTest for BezPath {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        filled_outline(self, pt, params)
    }
}

/// Exact containment for any kurbo shape; the tolerance band is measured
/// against the bounding box, so it is generous around curved corners.
fn filled_outline(shape: &impl Shape, pt: Point, params: &HitParams) -> Option<HitScore> {
    if shape.contains(pt) {
        return Some(HitScore::INSIDE);
    }
    if params.fill_tolerance <= 0.0 {
        return None;
    }
    let near_box = shape.bounding_box().hit_test_local(pt, params)?;
    Some(HitScore {
        distance: near_box.distance,
        kind: HitKind::Margin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXACT: HitParams = HitParams {
        fill_tolerance: 0.0,
    };

    #[test]
    fn rect_edges_are_inclusive() {
        let r = Rect::new(-5.0, -5.0, 5.0, 5.0);
        assert_eq!(r.hit_test_local(Point::new(5.0, 0.0), &EXACT), Some(HitScore::INSIDE));
        assert_eq!(r.hit_test_local(Point::new(-5.0, -5.0), &EXACT), Some(HitScore::INSIDE));
        assert!(r.hit_test_local(Point::new(5.5, 0.0), &EXACT).is_none());
    }

    #[test]
    fn tolerance_band_reports_distance() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        let touch = HitParams {
            fill_tolerance: 1.0,
        };
        let score = r.hit_test_local(Point::new(10.5, 5.0), &touch).unwrap();
        assert_eq!(score.kind, HitKind::Margin);
        assert!((score.distance - 0.5).abs() < 1e-12, "distance {}", score.distance);
        assert!(r.hit_test_local(Point::new(12.0, 5.0), &touch).is_none());
    }

    #[test]
    fn circle_is_a_disk() {
        let c = Circle::new(Point::ORIGIN, 5.0);
        assert_eq!(c.hit_test_local(Point::new(3.0, 4.0), &EXACT), Some(HitScore::INSIDE));
        assert!(c.hit_test_local(Point::new(4.0, 4.0), &EXACT).is_none());
    }

    #[test]
    fn rounded_corner_misses_without_tolerance() {
        let rr = RoundedRect::from_rect(Rect::new(0.0, 0.0, 10.0, 10.0), 4.0);
        assert!(rr.hit_test_local(Point::new(5.0, 5.0), &EXACT).is_some());
        assert!(rr.hit_test_local(Point::new(0.2, 0.2), &EXACT).is_none());
        let touch = HitParams {
            fill_tolerance: 0.5,
        };
        let corner = rr.hit_test_local(Point::new(0.2, 0.2), &touch).unwrap();
        assert_eq!(corner.kind, HitKind::Margin);
    }

    #[test]
    fn triangle_excludes_the_far_half_of_its_box() {
        let mut tri = BezPath::new();
        tri.move_to((0.0, 0.0));
        tri.line_to((10.0, 0.0));
        tri.line_to((0.0, 10.0));
        tri.close_path();

        assert!(tri.hit_test_local(Point::new(2.0, 2.0), &EXACT).is_some());
        assert!(tri.hit_test_local(Point::new(8.0, 8.0), &EXACT).is_none());
    }
}
