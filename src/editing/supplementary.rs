// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Supplementary point generation.
//!
//! When a feature is selected, its editable coordinates are surfaced as
//! synthetic Point features: one vertex marker per coordinate and,
//! optionally, one midpoint marker per segment. Markers carry the owning
//! feature id and the coordinate path they stand for; clicking a midpoint
//! inserts a new vertex at its path.
//!
//! Point features and special polygons never get midpoints. Special
//! polygons also surface only a reduced, evenly spaced set of control
//! vertices — their ring is derived, not freely editable — and those
//! markers copy the owner's shape tag so downstream routing can recognize
//! them.

use crate::model::{Coord, CoordPath, CoordRef, DrawProps, Feature, Geometry, Meta, ShapeState};
use crate::settings;

/// Options for one generation pass
#[derive(Debug, Clone, Default)]
pub struct SupplementaryOptions {
    /// Whether to emit midpoint markers
    pub midpoint: bool,
    /// Vertex paths currently selected (their markers come out active)
    pub selected_paths: Vec<CoordRef>,
}

/// Build the vertex/midpoint markers for one feature
pub fn create_supplementary_points(
    feature: &Feature,
    options: &SupplementaryOptions,
) -> Vec<Feature> {
    let mut points = Vec::new();

    if let Some(kind) = feature.shape_kind() {
        // Derived rings: control vertices only, on the outer ring.
        let Geometry::Polygon(rings) = &feature.geometry else {
            return points;
        };
        let Some(ring) = rings.first() else {
            return points;
        };
        let step = (ring.len() / settings::shapes::SHAPE_CONTROL_POINTS).max(1);
        let mut index = 0;
        while index < ring.len() && points.len() < settings::shapes::SHAPE_CONTROL_POINTS {
            let path = CoordPath::new([0, index]);
            let mut vertex = make_vertex(feature, path, ring[index], options);
            vertex.props.shape = Some(ShapeState {
                kind: Some(kind),
                ..ShapeState::default()
            });
            points.push(vertex);
            index += step;
        }
        return points;
    }

    for (path, coord) in feature.geometry.positions() {
        points.push(make_vertex(feature, path, coord, options));
    }

    if options.midpoint {
        for (prefix, run, closed) in feature.geometry.segments() {
            for i in 1..run.len() {
                points.push(make_midpoint(feature, &prefix, i, run[i - 1], run[i]));
            }
            // Closed rings get a midpoint on the implicit closing segment;
            // inserting at the run length appends.
            if closed && run.len() >= 2 {
                points.push(make_midpoint(
                    feature,
                    &prefix,
                    run.len(),
                    run[run.len() - 1],
                    run[0],
                ));
            }
        }
    }

    points
}

fn make_vertex(
    owner: &Feature,
    path: CoordPath,
    coord: Coord,
    options: &SupplementaryOptions,
) -> Feature {
    let active = options
        .selected_paths
        .iter()
        .any(|r| r.feature == owner.id && r.path == path);
    Feature::with_props(
        Geometry::Point(coord),
        DrawProps {
            meta: Meta::Vertex,
            active,
            parent: Some(owner.id),
            path: Some(path),
            ..DrawProps::default()
        },
    )
}

fn make_midpoint(owner: &Feature, prefix: &[usize], index: usize, a: Coord, b: Coord) -> Feature {
    let mut indices = prefix.to_vec();
    indices.push(index);
    Feature::with_props(
        Geometry::Point(Coord::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)),
        DrawProps {
            meta: Meta::Midpoint,
            active: false,
            parent: Some(owner.id),
            path: Some(CoordPath::new(indices)),
            ..DrawProps::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{self, ShapeKind};

    fn square_feature() -> Feature {
        Feature::new(Geometry::Polygon(vec![vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(2.0, 2.0),
            Coord::new(0.0, 2.0),
        ]]))
    }

    #[test]
    fn polygon_gets_vertices_and_wrapping_midpoints() {
        let feature = square_feature();
        let points = create_supplementary_points(
            &feature,
            &SupplementaryOptions {
                midpoint: true,
                selected_paths: vec![],
            },
        );

        let vertices: Vec<_> = points
            .iter()
            .filter(|p| p.props.meta == Meta::Vertex)
            .collect();
        let midpoints: Vec<_> = points
            .iter()
            .filter(|p| p.props.meta == Meta::Midpoint)
            .collect();
        assert_eq!(vertices.len(), 4);
        assert_eq!(midpoints.len(), 4);

        // The closing-segment midpoint sits between the last and first
        // vertices, with an appending insertion path.
        let closing = midpoints.last().unwrap();
        assert_eq!(closing.props.path, Some(CoordPath::new([0, 4])));
        assert_eq!(closing.geometry, Geometry::Point(Coord::new(0.0, 1.0)));
    }

    #[test]
    fn line_midpoints_do_not_wrap() {
        let feature = Feature::new(Geometry::LineString(vec![
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(4.0, 0.0),
        ]));
        let points = create_supplementary_points(
            &feature,
            &SupplementaryOptions {
                midpoint: true,
                selected_paths: vec![],
            },
        );
        let midpoints: Vec<_> = points
            .iter()
            .filter(|p| p.props.meta == Meta::Midpoint)
            .collect();
        assert_eq!(midpoints.len(), 2);
    }

    #[test]
    fn selected_paths_come_out_active() {
        let feature = square_feature();
        let points = create_supplementary_points(
            &feature,
            &SupplementaryOptions {
                midpoint: false,
                selected_paths: vec![CoordRef {
                    feature: feature.id,
                    path: CoordPath::new([0, 2]),
                }],
            },
        );
        let active: Vec<_> = points.iter().filter(|p| p.props.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].props.path, Some(CoordPath::new([0, 2])));
        assert_eq!(active[0].props.parent, Some(feature.id));
    }

    #[test]
    fn point_feature_gets_single_vertex() {
        let feature = Feature::new(Geometry::Point(Coord::new(5.0, 6.0)));
        let points = create_supplementary_points(
            &feature,
            &SupplementaryOptions {
                midpoint: true,
                selected_paths: vec![],
            },
        );
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].props.meta, Meta::Vertex);
        assert_eq!(points[0].props.path, Some(CoordPath::new([0])));
    }

    #[test]
    fn derived_ring_exposes_control_vertices_only() {
        let circle = shapes::circle_ring(Coord::new(0.0, 0.0), Coord::new(4.0, 0.0));
        let mut ring = circle.coords;
        ring.pop(); // stored without the closing duplicate
        let mut feature = Feature::new(Geometry::Polygon(vec![ring]));
        feature.props.shape = Some(ShapeState {
            kind: Some(ShapeKind::Circle),
            center: Some(Coord::new(0.0, 0.0)),
            radius: Some(4.0),
            ..ShapeState::default()
        });

        let points = create_supplementary_points(
            &feature,
            &SupplementaryOptions {
                midpoint: true,
                selected_paths: vec![],
            },
        );
        assert_eq!(points.len(), settings::shapes::SHAPE_CONTROL_POINTS);
        assert!(points.iter().all(|p| p.props.meta == Meta::Vertex));
        assert!(points.iter().all(|p| p.shape_kind() == Some(ShapeKind::Circle)));

        // Evenly spaced around the 64-vertex ring.
        assert_eq!(points[1].props.path, Some(CoordPath::new([0, 16])));
    }

    #[test]
    fn rectangle_controls_are_its_corners() {
        let mut feature = square_feature();
        feature.props.shape = Some(ShapeState {
            kind: Some(ShapeKind::Rectangle),
            length: Some(2.0),
            width: Some(2.0),
            ..ShapeState::default()
        });
        let points =
            create_supplementary_points(&feature, &SupplementaryOptions::default());
        let paths: Vec<_> = points.iter().map(|p| p.props.path.clone().unwrap()).collect();
        assert_eq!(
            paths,
            vec![
                CoordPath::new([0, 0]),
                CoordPath::new([0, 1]),
                CoordPath::new([0, 2]),
                CoordPath::new([0, 3]),
            ]
        );
    }
}
