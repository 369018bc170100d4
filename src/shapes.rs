// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Parametric ring derivation for the special polygons.
//!
//! Circles, ellipses, rectangles, and squares store an ordinary polygon
//! ring, but the ring is *derived* from a small parameter set (center +
//! radius, center + axes, or two corners) rather than edited per-vertex.
//! Dragging a control vertex re-runs the variant's builder from the new
//! pointer position. Each builder is a pure function so it can be tested
//! independently of the edit-mode state machine.
//!
//! All builders return closed rings (last vertex repeats the first);
//! callers strip the closing duplicate before storing.

use crate::model::Coord;
use crate::settings;
use std::f64::consts::TAU;

// ===== Shape Kinds =====

/// The special-polygon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Rectangle,
    Square,
}

impl ShapeKind {
    /// Tag value used in GeoJSON properties
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Circle => "circle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
        }
    }

    /// Parse a tag value; the generic `"polygon"` tag is not a shape kind
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "circle" => Some(ShapeKind::Circle),
            "ellipse" => Some(ShapeKind::Ellipse),
            "rectangle" => Some(ShapeKind::Rectangle),
            "square" => Some(ShapeKind::Square),
            _ => None,
        }
    }
}

// ===== Derived Rings =====

/// A circle ring through a rim point
#[derive(Debug, Clone)]
pub struct CircleRing {
    pub coords: Vec<Coord>,
    pub radius: f64,
}

/// An ellipse ring with the long axis through a rim point
#[derive(Debug, Clone)]
pub struct EllipseRing {
    pub coords: Vec<Coord>,
    pub xradius: f64,
    pub yradius: f64,
}

/// An axis-aligned rectangle ring between two corners
#[derive(Debug, Clone)]
pub struct RectangleRing {
    pub coords: Vec<Coord>,
    pub length: f64,
    pub width: f64,
}

/// A square ring, side taken from the smaller spanned dimension
#[derive(Debug, Clone)]
pub struct SquareRing {
    pub coords: Vec<Coord>,
    pub length: f64,
}

/// Circle ring around `center` passing through `rim`
pub fn circle_ring(center: Coord, rim: Coord) -> CircleRing {
    let radius = center.distance(rim);
    let segments = settings::shapes::CIRCLE_SEGMENTS;
    let mut coords = Vec::with_capacity(segments + 1);
    for i in 0..segments {
        let angle = TAU * (i as f64) / (segments as f64);
        coords.push(Coord::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
    coords.push(coords[0]);
    CircleRing { coords, radius }
}

/// Ellipse ring around `center`, long axis through `rim`, short axis from
/// the eccentricity (`b = a * sqrt(1 - e^2)`)
pub fn ellipse_ring(center: Coord, rim: Coord, eccentricity: f64, divisions: usize) -> EllipseRing {
    let xradius = center.distance(rim);
    let e = eccentricity.clamp(0.0, 0.999);
    let yradius = xradius * (1.0 - e * e).sqrt();
    let mut coords = Vec::with_capacity(divisions + 1);
    for i in 0..divisions {
        let angle = TAU * (i as f64) / (divisions as f64);
        coords.push(Coord::new(
            center.x + xradius * angle.cos(),
            center.y + yradius * angle.sin(),
        ));
    }
    coords.push(coords[0]);
    EllipseRing {
        coords,
        xradius,
        yradius,
    }
}

/// Rectangle ring between `start` and its diagonal corner.
///
/// Vertex order is fixed: `[start, (d.x, s.y), diagonal, (s.x, d.y)]`.
/// The corner-index rule in [`rectangle_anchors`] depends on this order.
pub fn rectangle_ring(start: Coord, diagonal: Coord) -> RectangleRing {
    let coords = vec![
        start,
        Coord::new(diagonal.x, start.y),
        diagonal,
        Coord::new(start.x, diagonal.y),
        start,
    ];
    RectangleRing {
        coords,
        length: (diagonal.x - start.x).abs(),
        width: (diagonal.y - start.y).abs(),
    }
}

/// Square ring between `start` and a diagonal clamped to the smaller
/// spanned dimension, keeping the drag direction
pub fn square_ring(start: Coord, diagonal: Coord) -> SquareRing {
    let dx = diagonal.x - start.x;
    let dy = diagonal.y - start.y;
    let side = dx.abs().min(dy.abs());
    let clamped = Coord::new(start.x + side * dx.signum(), start.y + side * dy.signum());
    let rect = rectangle_ring(start, clamped);
    SquareRing {
        coords: rect.coords,
        length: side,
    }
}

/// New (start, diagonal) pair for a rectangle/square whose corner
/// `corner_index` was dragged to `pointer`.
///
/// `ring` is the stored (unclosed) ring in builder order. Corners 0 and 2
/// move themselves; corners 1 and 3 are adjacent corners, so each moves one
/// axis of `start` and the other axis of `diagonal`. Returns `None` for an
/// index outside the four corners.
///
/// Known fragility: the rule assumes the builder's winding order. A ring
/// whose order was changed by an external edit will re-derive against the
/// wrong opposite corner.
pub fn rectangle_anchors(ring: &[Coord], corner_index: usize, pointer: Coord) -> Option<(Coord, Coord)> {
    let start = *ring.first()?;
    let diagonal = *ring.get(2)?;
    match corner_index {
        0 => Some((pointer, diagonal)),
        1 => Some((
            Coord::new(start.x, pointer.y),
            Coord::new(pointer.x, diagonal.y),
        )),
        2 => Some((start, pointer)),
        3 => Some((
            Coord::new(pointer.x, start.y),
            Coord::new(diagonal.x, pointer.y),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_ring_keeps_center_and_radius() {
        let center = Coord::new(10.0, 20.0);
        let rim = Coord::new(13.0, 24.0);
        let circle = circle_ring(center, rim);

        assert_relative_eq!(circle.radius, 5.0);
        assert_eq!(
            circle.coords.len(),
            settings::shapes::CIRCLE_SEGMENTS + 1
        );
        assert_eq!(circle.coords.first(), circle.coords.last());
        for c in &circle.coords {
            assert_relative_eq!(center.distance(*c), 5.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn ellipse_axes_follow_eccentricity() {
        let center = Coord::new(0.0, 0.0);
        let rim = Coord::new(10.0, 0.0);
        let ellipse = ellipse_ring(center, rim, 0.8, settings::shapes::ELLIPSE_DIVISIONS);

        assert_relative_eq!(ellipse.xradius, 10.0);
        assert_relative_eq!(ellipse.yradius, 6.0, epsilon = 1e-9);
        assert_eq!(
            ellipse.coords.len(),
            settings::shapes::ELLIPSE_DIVISIONS + 1
        );
        assert_eq!(ellipse.coords.first(), ellipse.coords.last());
    }

    #[test]
    fn rectangle_ring_order_and_spans() {
        let rect = rectangle_ring(Coord::new(1.0, 2.0), Coord::new(4.0, 6.0));
        assert_eq!(
            rect.coords,
            vec![
                Coord::new(1.0, 2.0),
                Coord::new(4.0, 2.0),
                Coord::new(4.0, 6.0),
                Coord::new(1.0, 6.0),
                Coord::new(1.0, 2.0),
            ]
        );
        assert_relative_eq!(rect.length, 3.0);
        assert_relative_eq!(rect.width, 4.0);
    }

    #[test]
    fn square_uses_smaller_dimension_with_direction() {
        let square = square_ring(Coord::new(0.0, 0.0), Coord::new(-5.0, 3.0));
        assert_relative_eq!(square.length, 3.0);
        // Clamped diagonal keeps the drag direction on both axes.
        assert_eq!(square.coords[2], Coord::new(-3.0, 3.0));
    }

    #[test]
    fn corner_rule_all_four_cases() {
        let ring = vec![
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
            Coord::new(0.0, 4.0),
        ];
        let p = Coord::new(7.0, -1.0);

        // Corner 0 moves start itself.
        assert_eq!(
            rectangle_anchors(&ring, 0, p),
            Some((p, Coord::new(4.0, 4.0)))
        );
        // Corner 1 moves start's y and diagonal's x.
        assert_eq!(
            rectangle_anchors(&ring, 1, p),
            Some((Coord::new(0.0, -1.0), Coord::new(7.0, 4.0)))
        );
        // Corner 2 moves the diagonal itself.
        assert_eq!(
            rectangle_anchors(&ring, 2, p),
            Some((Coord::new(0.0, 0.0), p))
        );
        // Corner 3 moves start's x and diagonal's y.
        assert_eq!(
            rectangle_anchors(&ring, 3, p),
            Some((Coord::new(7.0, 0.0), Coord::new(4.0, -1.0)))
        );
        assert_eq!(rectangle_anchors(&ring, 4, p), None);
    }
}
