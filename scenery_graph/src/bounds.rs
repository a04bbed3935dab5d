// Copyright 2025 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box arithmetic shared by the local and world bounds passes.

use kurbo::{Affine, Point, Rect, Vec2};

use crate::types::Bounds;

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box.
pub(crate) fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let min_x = (a * rect.x0).min(a * rect.x1) + (c * rect.y0).min(c * rect.y1);
    let max_x = (a * rect.x0).max(a * rect.x1) + (c * rect.y0).max(c * rect.y1);
    let min_y = (b * rect.x0).min(b * rect.x1) + (d * rect.y0).min(d * rect.y1);
    let max_y = (b * rect.x0).max(b * rect.x1) + (d * rect.y0).max(d * rect.y1);
    Rect::new(min_x + e, min_y + f, max_x + e, max_y + f)
}

/// Box of the four corners of `bounds` rotated about the origin.
pub(crate) fn rotate_bounds(bounds: Bounds, degrees: f64) -> Bounds {
    if degrees == 0.0 {
        return bounds;
    }
    transform_rect_bbox(Affine::rotate(degrees.to_radians()), bounds.to_rect()).into()
}

/// Map a child's local box into its parent's space: anchor offset, then
/// scale, then position. Rotation is left out.
pub(crate) fn map_child_local(
    local: Bounds,
    anchor_offset: Vec2,
    scale: Vec2,
    position: Point,
) -> Bounds {
    if local.is_empty() {
        return Bounds::ZERO;
    }
    let affine = Affine::translate(position.to_vec2()) * Affine::scale_non_uniform(scale.x, scale.y);
    transform_rect_bbox(affine, local.to_rect() + anchor_offset).into()
}

/// Translate a box by a child's position.
pub(crate) fn offset_bounds(bounds: Bounds, position: Point) -> Bounds {
    if bounds.is_empty() {
        return Bounds::ZERO;
    }
    (bounds.to_rect() + position.to_vec2()).into()
}

/// Offset that moves the anchor point of a `size` box onto the origin.
pub(crate) fn anchor_offset(anchor: Vec2, size: (f64, f64)) -> Vec2 {
    Vec2::new(-(anchor.x - 0.5) * size.0, -(anchor.y - 0.5) * size.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Bounds, b: Bounds) -> bool {
        const EPS: f64 = 1e-9;
        (a.x1 - b.x1).abs() < EPS
            && (a.y1 - b.y1).abs() < EPS
            && (a.x2 - b.x2).abs() < EPS
            && (a.y2 - b.y2).abs() < EPS
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let b = Bounds::new(-20.0, -5.0, 20.0, 5.0);
        let r = rotate_bounds(b, 90.0);
        assert!(approx(r, Bounds::new(-5.0, -20.0, 5.0, 20.0)), "got {r:?}");
    }

    #[test]
    fn child_mapping_applies_offset_scale_then_position() {
        let local = Bounds::new(-10.0, -10.0, 10.0, 10.0);
        let mapped = map_child_local(
            local,
            Vec2::new(10.0, 10.0),
            Vec2::new(2.0, 1.0),
            Point::new(100.0, 0.0),
        );
        assert_eq!(mapped, Bounds::new(100.0, 0.0, 140.0, 20.0));
    }

    #[test]
    fn empty_child_maps_to_nothing() {
        let mapped = map_child_local(Bounds::ZERO, Vec2::ZERO, Vec2::new(1.0, 1.0), Point::new(5.0, 5.0));
        assert!(mapped.is_empty(), "empty boxes must not move the union");
    }

    #[test]
    fn anchor_top_left_moves_box_right_and_down() {
        assert_eq!(anchor_offset(Vec2::new(0.0, 0.0), (40.0, 20.0)), Vec2::new(20.0, 10.0));
        assert_eq!(anchor_offset(Vec2::new(0.5, 0.5), (40.0, 20.0)), Vec2::ZERO);
    }
}
