// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry model: the coordinate trees behind every drawable feature,
//! addressed by structured coordinate paths.
//!
//! Polygon rings are stored *without* the closing duplicate vertex; the
//! duplicate is re-appended on GeoJSON emission. This keeps path-addressed
//! editing simple (no phantom last vertex to special-case) and matches how
//! derived rings are stored after shape re-derivation.

use crate::settings;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single lng/lat coordinate (`x` = longitude, `y` = latitude)
pub type Coord = kurbo::Point;

// ===== Coordinate Paths =====

/// A structured locator for one coordinate inside a geometry tree.
///
/// `[0, 2]` addresses ring 0, vertex 2 of a polygon (the original's dotted
/// `"0.2"` form, which `Display` reproduces). Ordering is element-wise
/// numeric, so `0.9 < 0.10` — reverse-sorting paths lets multi-vertex
/// removal run deepest-index-first without invalidating shallower paths.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordPath(Vec<usize>);

impl CoordPath {
    /// Build a path from raw indices
    pub fn new(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    /// The path's index segments
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// The last segment: the vertex index within its ring or line
    pub fn vertex_index(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl fmt::Display for CoordPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for idx in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{idx}")?;
            first = false;
        }
        Ok(())
    }
}

/// One mutable vertex on one feature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoordRef {
    /// Owning feature
    pub feature: crate::model::FeatureId,
    /// Coordinate path within that feature's geometry
    pub path: CoordPath,
}

// ===== Errors =====

/// Failure to address a coordinate inside a geometry tree
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    /// The path does not resolve to a coordinate of this geometry
    #[error("coordinate path `{0}` does not exist in this geometry")]
    InvalidPath(CoordPath),
}

// ===== Geometry Families =====

/// Geometry family, ignoring the Multi- prefix.
///
/// Multi-select and combine compatibility are decided at this level: a
/// `Polygon` and a `MultiPolygon` belong to the same family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryFamily {
    Point,
    LineString,
    Polygon,
}

impl fmt::Display for GeometryFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryFamily::Point => write!(f, "Point"),
            GeometryFamily::LineString => write!(f, "LineString"),
            GeometryFamily::Polygon => write!(f, "Polygon"),
        }
    }
}

// ===== Geometry =====

/// A feature's coordinate tree
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
}

impl Geometry {
    /// GeoJSON type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

    /// Geometry family, ignoring the Multi- prefix
    pub fn family(&self) -> GeometryFamily {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryFamily::Point,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => GeometryFamily::LineString,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) => GeometryFamily::Polygon,
        }
    }

    /// Whether this is a Multi- variant
    pub fn is_multi(&self) -> bool {
        matches!(
            self,
            Geometry::MultiPoint(_) | Geometry::MultiLineString(_) | Geometry::MultiPolygon(_)
        )
    }

    /// Read the coordinate at a path
    pub fn coordinate(&self, path: &CoordPath) -> Option<Coord> {
        match (self, path.indices()) {
            (Geometry::Point(c), [0]) => Some(*c),
            (Geometry::LineString(line), [i]) => line.get(*i).copied(),
            (Geometry::Polygon(rings), [r, i]) => rings.get(*r)?.get(*i).copied(),
            (Geometry::MultiPoint(pts), [i]) => pts.get(*i).copied(),
            (Geometry::MultiLineString(lines), [p, i]) => lines.get(*p)?.get(*i).copied(),
            (Geometry::MultiPolygon(polys), [p, r, i]) => {
                polys.get(*p)?.get(*r)?.get(*i).copied()
            }
            _ => None,
        }
    }

    /// Overwrite the coordinate at a path
    pub fn update_coordinate(
        &mut self,
        path: &CoordPath,
        coord: Coord,
    ) -> Result<(), GeometryError> {
        let slot = match (&mut *self, path.indices()) {
            (Geometry::Point(c), [0]) => Some(c),
            (Geometry::LineString(line), [i]) => line.get_mut(*i),
            (Geometry::Polygon(rings), [r, i]) => {
                rings.get_mut(*r).and_then(|ring| ring.get_mut(*i))
            }
            (Geometry::MultiPoint(pts), [i]) => pts.get_mut(*i),
            (Geometry::MultiLineString(lines), [p, i]) => {
                lines.get_mut(*p).and_then(|line| line.get_mut(*i))
            }
            (Geometry::MultiPolygon(polys), [p, r, i]) => polys
                .get_mut(*p)
                .and_then(|poly| poly.get_mut(*r))
                .and_then(|ring| ring.get_mut(*i)),
            _ => None,
        };
        match slot {
            Some(c) => {
                *c = coord;
                Ok(())
            }
            None => Err(GeometryError::InvalidPath(path.clone())),
        }
    }

    /// Insert a coordinate at a path, shifting later vertices.
    ///
    /// The final path segment is the insertion index; inserting at the
    /// current vertex count appends (this is how a midpoint on the closing
    /// segment of a ring materializes).
    pub fn insert_coordinate(
        &mut self,
        path: &CoordPath,
        coord: Coord,
    ) -> Result<(), GeometryError> {
        let invalid = || GeometryError::InvalidPath(path.clone());
        match (&mut *self, path.indices()) {
            (Geometry::LineString(line), [i]) if *i <= line.len() => {
                line.insert(*i, coord);
                Ok(())
            }
            (Geometry::Polygon(rings), [r, i]) => {
                let ring = rings.get_mut(*r).ok_or_else(invalid)?;
                if *i <= ring.len() {
                    ring.insert(*i, coord);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            (Geometry::MultiLineString(lines), [p, i]) => {
                let line = lines.get_mut(*p).ok_or_else(invalid)?;
                if *i <= line.len() {
                    line.insert(*i, coord);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            (Geometry::MultiPolygon(polys), [p, r, i]) => {
                let ring = polys
                    .get_mut(*p)
                    .and_then(|poly| poly.get_mut(*r))
                    .ok_or_else(invalid)?;
                if *i <= ring.len() {
                    ring.insert(*i, coord);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Remove the coordinate at a path.
    ///
    /// Removal is allowed to leave the geometry below its minimum size;
    /// callers check `is_valid` afterwards and decide policy (keep the
    /// trimmed feature or delete it whole).
    pub fn remove_coordinate(&mut self, path: &CoordPath) -> Result<(), GeometryError> {
        let invalid = || GeometryError::InvalidPath(path.clone());
        match (&mut *self, path.indices()) {
            (Geometry::LineString(line), [i]) if *i < line.len() => {
                line.remove(*i);
                Ok(())
            }
            (Geometry::Polygon(rings), [r, i]) => {
                let ring = rings.get_mut(*r).ok_or_else(invalid)?;
                if *i < ring.len() {
                    ring.remove(*i);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            (Geometry::MultiPoint(pts), [i]) if *i < pts.len() => {
                pts.remove(*i);
                Ok(())
            }
            (Geometry::MultiLineString(lines), [p, i]) => {
                let line = lines.get_mut(*p).ok_or_else(invalid)?;
                if *i < line.len() {
                    line.remove(*i);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            (Geometry::MultiPolygon(polys), [p, r, i]) => {
                let ring = polys
                    .get_mut(*p)
                    .and_then(|poly| poly.get_mut(*r))
                    .ok_or_else(invalid)?;
                if *i < ring.len() {
                    ring.remove(*i);
                    Ok(())
                } else {
                    Err(invalid())
                }
            }
            _ => Err(invalid()),
        }
    }

    /// Replace the outer ring of a polygon (used by shape re-derivation)
    pub fn set_outer_ring(&mut self, ring: Vec<Coord>) {
        if let Geometry::Polygon(rings) = self {
            if rings.is_empty() {
                rings.push(ring);
            } else {
                rings[0] = ring;
            }
        }
    }

    /// Whether the geometry satisfies its minimum size.
    ///
    /// Lines need at least two vertices, polygon rings at least three
    /// (closing duplicate excluded); Multi- variants need at least one
    /// valid part.
    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Point(_) => true,
            Geometry::LineString(line) => line.len() >= settings::geometry::MIN_LINE_POINTS,
            Geometry::Polygon(rings) => {
                !rings.is_empty()
                    && rings
                        .iter()
                        .all(|ring| ring.len() >= settings::geometry::MIN_RING_POINTS)
            }
            Geometry::MultiPoint(pts) => !pts.is_empty(),
            Geometry::MultiLineString(lines) => {
                !lines.is_empty()
                    && lines
                        .iter()
                        .all(|line| line.len() >= settings::geometry::MIN_LINE_POINTS)
            }
            Geometry::MultiPolygon(polys) => {
                !polys.is_empty()
                    && polys.iter().all(|poly| {
                        !poly.is_empty()
                            && poly
                                .iter()
                                .all(|ring| ring.len() >= settings::geometry::MIN_RING_POINTS)
                    })
            }
        }
    }

    /// Shift every coordinate by a lng/lat delta
    pub fn translate(&mut self, delta: Vec2) {
        fn shift(coords: &mut [Coord], delta: Vec2) {
            for c in coords {
                *c += delta;
            }
        }
        match self {
            Geometry::Point(c) => *c += delta,
            Geometry::LineString(line) | Geometry::MultiPoint(line) => shift(line, delta),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter_mut().for_each(|r| shift(r, delta));
            }
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    poly.iter_mut().for_each(|r| shift(r, delta));
                }
            }
        }
    }

    /// Every vertex with its coordinate path, in storage order
    pub fn positions(&self) -> Vec<(CoordPath, Coord)> {
        let mut out = Vec::new();
        match self {
            Geometry::Point(c) => out.push((CoordPath::new([0]), *c)),
            Geometry::LineString(line) | Geometry::MultiPoint(line) => {
                for (i, c) in line.iter().enumerate() {
                    out.push((CoordPath::new([i]), *c));
                }
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                for (r, ring) in rings.iter().enumerate() {
                    for (i, c) in ring.iter().enumerate() {
                        out.push((CoordPath::new([r, i]), *c));
                    }
                }
            }
            Geometry::MultiPolygon(polys) => {
                for (p, poly) in polys.iter().enumerate() {
                    for (r, ring) in poly.iter().enumerate() {
                        for (i, c) in ring.iter().enumerate() {
                            out.push((CoordPath::new([p, r, i]), *c));
                        }
                    }
                }
            }
        }
        out
    }

    /// Vertex runs eligible for midpoint markers: `(path prefix, vertices,
    /// closed)` per line or ring. Point variants yield nothing.
    pub fn segments(&self) -> Vec<(Vec<usize>, &[Coord], bool)> {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Vec::new(),
            Geometry::LineString(line) => vec![(vec![], line.as_slice(), false)],
            Geometry::Polygon(rings) => rings
                .iter()
                .enumerate()
                .map(|(r, ring)| (vec![r], ring.as_slice(), true))
                .collect(),
            Geometry::MultiLineString(lines) => lines
                .iter()
                .enumerate()
                .map(|(p, line)| (vec![p], line.as_slice(), false))
                .collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .enumerate()
                .flat_map(|(p, poly)| {
                    poly.iter()
                        .enumerate()
                        .map(move |(r, ring)| (vec![p, r], ring.as_slice(), true))
                })
                .collect(),
        }
    }

    /// Split a Multi- geometry into its single-geometry parts.
    ///
    /// Single geometries yield themselves, so `parts().len()` is the part
    /// count the combine/uncombine machinery works with.
    pub fn parts(&self) -> Vec<Geometry> {
        match self {
            Geometry::MultiPoint(pts) => pts.iter().map(|c| Geometry::Point(*c)).collect(),
            Geometry::MultiLineString(lines) => {
                lines.iter().map(|l| Geometry::LineString(l.clone())).collect()
            }
            Geometry::MultiPolygon(polys) => {
                polys.iter().map(|p| Geometry::Polygon(p.clone())).collect()
            }
            single => vec![single.clone()],
        }
    }

    /// Assemble a Multi- geometry of the given family from single parts.
    ///
    /// Parts of a different family are skipped; the caller has already
    /// enforced family compatibility.
    pub fn multi_from_parts(family: GeometryFamily, parts: Vec<Geometry>) -> Geometry {
        match family {
            GeometryFamily::Point => Geometry::MultiPoint(
                parts
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::Point(c) => Some(c),
                        _ => None,
                    })
                    .collect(),
            ),
            GeometryFamily::LineString => Geometry::MultiLineString(
                parts
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::LineString(l) => Some(l),
                        _ => None,
                    })
                    .collect(),
            ),
            GeometryFamily::Polygon => Geometry::MultiPolygon(
                parts
                    .into_iter()
                    .filter_map(|g| match g {
                        Geometry::Polygon(p) => Some(p),
                        _ => None,
                    })
                    .collect(),
            ),
        }
    }

    /// Bounding-box center of all coordinates (shape-center fallback)
    pub fn extent_center(&self) -> Option<Coord> {
        let positions = self.positions();
        let (first, rest) = positions.split_first()?;
        let mut min = first.1;
        let mut max = first.1;
        for (_, c) in rest {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Some(Coord::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0))
    }

    /// GeoJSON geometry object; polygon rings get their closing duplicate
    /// re-appended here.
    pub fn to_geojson(&self) -> serde_json::Value {
        fn coord(c: &Coord) -> serde_json::Value {
            serde_json::json!([c.x, c.y])
        }
        fn line(coords: &[Coord]) -> serde_json::Value {
            serde_json::Value::Array(coords.iter().map(coord).collect())
        }
        fn ring(coords: &[Coord]) -> serde_json::Value {
            let mut arr: Vec<serde_json::Value> = coords.iter().map(coord).collect();
            if let Some(first) = coords.first() {
                arr.push(coord(first));
            }
            serde_json::Value::Array(arr)
        }

        let coordinates = match self {
            Geometry::Point(c) => coord(c),
            Geometry::LineString(l) | Geometry::MultiPoint(l) => line(l),
            Geometry::Polygon(rings) => {
                serde_json::Value::Array(rings.iter().map(|r| ring(r)).collect())
            }
            Geometry::MultiLineString(lines) => {
                serde_json::Value::Array(lines.iter().map(|l| line(l)).collect())
            }
            Geometry::MultiPolygon(polys) => serde_json::Value::Array(
                polys
                    .iter()
                    .map(|poly| {
                        serde_json::Value::Array(poly.iter().map(|r| ring(r)).collect())
                    })
                    .collect(),
            ),
        };

        serde_json::json!({
            "type": self.type_name(),
            "coordinates": coordinates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FeatureId;

    fn square_ring() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(0.0, 1.0),
        ]
    }

    #[test]
    fn path_display_is_dotted() {
        assert_eq!(CoordPath::new([0, 2]).to_string(), "0.2");
        assert_eq!(CoordPath::new([1]).to_string(), "1");
    }

    #[test]
    fn path_ordering_is_numeric_per_segment() {
        let shallow = CoordPath::new([0, 9]);
        let deep = CoordPath::new([0, 10]);
        assert!(shallow < deep);

        let mut paths = vec![deep.clone(), shallow.clone()];
        paths.sort_by(|a, b| b.cmp(a));
        assert_eq!(paths, vec![deep, shallow]);
    }

    #[test]
    fn coordinate_lookup_by_path() {
        let poly = Geometry::Polygon(vec![square_ring()]);
        assert_eq!(
            poly.coordinate(&CoordPath::new([0, 2])),
            Some(Coord::new(1.0, 1.0))
        );
        assert_eq!(poly.coordinate(&CoordPath::new([1, 0])), None);
        assert_eq!(poly.coordinate(&CoordPath::new([0])), None);
    }

    #[test]
    fn update_and_remove_round_trip() {
        let mut line = Geometry::LineString(vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 1.0),
            Coord::new(2.0, 2.0),
        ]);
        line.update_coordinate(&CoordPath::new([1]), Coord::new(5.0, 5.0))
            .unwrap();
        assert_eq!(
            line.coordinate(&CoordPath::new([1])),
            Some(Coord::new(5.0, 5.0))
        );

        line.remove_coordinate(&CoordPath::new([1])).unwrap();
        assert_eq!(
            line.coordinate(&CoordPath::new([1])),
            Some(Coord::new(2.0, 2.0))
        );

        let err = line.remove_coordinate(&CoordPath::new([7])).unwrap_err();
        assert_eq!(err, GeometryError::InvalidPath(CoordPath::new([7])));
    }

    #[test]
    fn insert_appends_on_closing_segment() {
        let mut poly = Geometry::Polygon(vec![square_ring()]);
        // Midpoint of the closing segment inserts at index == ring length.
        poly.insert_coordinate(&CoordPath::new([0, 4]), Coord::new(0.0, 0.5))
            .unwrap();
        assert_eq!(
            poly.coordinate(&CoordPath::new([0, 4])),
            Some(Coord::new(0.0, 0.5))
        );
    }

    #[test]
    fn validity_minimums() {
        let mut ring = square_ring();
        ring.truncate(3);
        let poly = Geometry::Polygon(vec![ring.clone()]);
        assert!(poly.is_valid());

        ring.truncate(2);
        let poly = Geometry::Polygon(vec![ring]);
        assert!(!poly.is_valid());

        assert!(!Geometry::LineString(vec![Coord::new(0.0, 0.0)]).is_valid());
    }

    #[test]
    fn translate_shifts_every_vertex() {
        let mut poly = Geometry::Polygon(vec![square_ring()]);
        poly.translate(Vec2::new(10.0, -5.0));
        assert_eq!(
            poly.coordinate(&CoordPath::new([0, 0])),
            Some(Coord::new(10.0, -5.0))
        );
        assert_eq!(
            poly.coordinate(&CoordPath::new([0, 2])),
            Some(Coord::new(11.0, -4.0))
        );
    }

    #[test]
    fn multi_parts_round_trip() {
        let a = Geometry::Polygon(vec![square_ring()]);
        let mut shifted = square_ring();
        for c in &mut shifted {
            c.x += 10.0;
        }
        let b = Geometry::Polygon(vec![shifted]);

        let multi = Geometry::multi_from_parts(
            GeometryFamily::Polygon,
            vec![a.clone(), b.clone()],
        );
        assert!(multi.is_multi());
        assert_eq!(multi.parts(), vec![a, b]);
    }

    #[test]
    fn polygon_geojson_ring_is_closed() {
        let poly = Geometry::Polygon(vec![square_ring()]);
        let value = poly.to_geojson();
        let ring = &value["coordinates"][0];
        assert_eq!(ring.as_array().unwrap().len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn coord_ref_equality() {
        let id = FeatureId::next();
        let a = CoordRef {
            feature: id,
            path: CoordPath::new([0, 1]),
        };
        let b = CoordRef {
            feature: id,
            path: CoordPath::new([0, 1]),
        };
        assert_eq!(a, b);
    }
}
