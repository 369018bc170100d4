// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Features and their internal property tags.
//!
//! Every drawable object in the store is a `Feature`: an id, a geometry, and
//! a `DrawProps` bag. The same type carries the synthetic vertex/midpoint
//! markers, distinguished by `Meta`. On GeoJSON emission the internal tags
//! are written under `draw:`-prefixed keys next to the caller's own
//! properties, and the reverse parse is tolerant of anything missing —
//! that round trip is what lets combine snapshot per-part properties and
//! uncombine restore them.

use crate::model::{Coord, CoordPath, FeatureId, Geometry};
use crate::modes::ModeKind;
use crate::shapes::ShapeKind;
use serde_json::{Map, Value};

// ===== Meta Tags =====

/// What a store entry represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Meta {
    /// A drawn geometry
    Feature,
    /// A synthetic marker for one editable coordinate
    Vertex,
    /// A synthetic marker between two adjacent vertices
    Midpoint,
}

impl Meta {
    /// Tag value used in GeoJSON properties
    pub fn as_str(&self) -> &'static str {
        match self {
            Meta::Feature => "feature",
            Meta::Vertex => "vertex",
            Meta::Midpoint => "midpoint",
        }
    }

    fn from_str(s: &str) -> Option<Self> {
        match s {
            "feature" => Some(Meta::Feature),
            "vertex" => Some(Meta::Vertex),
            "midpoint" => Some(Meta::Midpoint),
            _ => None,
        }
    }
}

// ===== Shape State =====

/// Remembered parameters of a derived (special-polygon) ring.
///
/// The ring itself is stored in the geometry like any polygon, but it is
/// re-derived from these parameters on every control-vertex drag rather
/// than edited per-vertex. Parameters are optional because externally
/// supplied features may carry only the kind tag; derivation then falls
/// back to the ring's extent center.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeState {
    pub kind: Option<ShapeKind>,
    pub center: Option<Coord>,
    pub radius: Option<f64>,
    pub xradius: Option<f64>,
    pub yradius: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub eccentricity: Option<f64>,
}

// ===== Draw Properties =====

/// Internal property tags plus the caller's own properties
#[derive(Debug, Clone, PartialEq)]
pub struct DrawProps {
    /// Feature, vertex, or midpoint
    pub meta: Meta,
    /// Whether the feature is part of the active selection display
    pub active: bool,
    /// Mode that created the feature
    pub mode: Option<ModeKind>,
    /// Owning feature id, for vertex/midpoint markers
    pub parent: Option<FeatureId>,
    /// Coordinate path on the owner, for vertex/midpoint markers
    pub path: Option<CoordPath>,
    /// Derived-ring parameters, for special polygons (and their markers,
    /// which copy the kind tag so event routing can recognize them)
    pub shape: Option<ShapeState>,
    /// Per-part property snapshots preserved through combine
    pub combined_props: Option<Vec<String>>,
    /// Caller-supplied properties, passed through untouched
    pub user: Map<String, Value>,
}

impl Default for DrawProps {
    fn default() -> Self {
        Self {
            meta: Meta::Feature,
            active: false,
            mode: None,
            parent: None,
            path: None,
            shape: None,
            combined_props: None,
            user: Map::new(),
        }
    }
}

impl DrawProps {
    /// The shape kind tag, if any
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.shape.as_ref().and_then(|s| s.kind)
    }

    /// Whether this is (or marks a vertex of) a special polygon
    pub fn is_special_polygon(&self) -> bool {
        self.shape_kind().is_some()
    }

    /// GeoJSON properties object: `draw:*` internal tags plus user keys.
    ///
    /// `geometry` supplies the `draw:type` tag and the plain-polygon
    /// styling tag (`draw:polygon = "polygon"` for undistinguished polygon
    /// geometries).
    pub fn to_geojson_map(&self, id: FeatureId, geometry: &Geometry) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("draw:id".into(), Value::from(id.as_u64()));
        map.insert("draw:meta".into(), Value::from(self.meta.as_str()));
        map.insert(
            "draw:active".into(),
            Value::from(if self.active { "true" } else { "false" }),
        );
        map.insert("draw:type".into(), Value::from(geometry.type_name()));
        if let Some(mode) = self.mode {
            map.insert("draw:mode".into(), Value::from(mode.as_str()));
        }
        if let Some(parent) = self.parent {
            map.insert("draw:pid".into(), Value::from(parent.as_u64()));
        }
        if let Some(path) = &self.path {
            map.insert("draw:path".into(), Value::from(path.to_string()));
        }
        match &self.shape {
            Some(shape) => {
                if let Some(kind) = shape.kind {
                    map.insert("draw:polygon".into(), Value::from(kind.as_str()));
                }
                if let Some(center) = shape.center {
                    map.insert(
                        "draw:center".into(),
                        Value::from(format!("{},{}", center.x, center.y)),
                    );
                }
                for (key, value) in [
                    ("draw:radius", shape.radius),
                    ("draw:xradius", shape.xradius),
                    ("draw:yradius", shape.yradius),
                    ("draw:length", shape.length),
                    ("draw:width", shape.width),
                    ("draw:eccentricity", shape.eccentricity),
                ] {
                    if let Some(v) = value {
                        map.insert(key.into(), Value::from(v));
                    }
                }
            }
            None => {
                // Plain polygons carry the generic styling tag.
                if matches!(geometry, Geometry::Polygon(_) | Geometry::MultiPolygon(_)) {
                    map.insert("draw:polygon".into(), Value::from("polygon"));
                }
            }
        }
        if let Some(parts) = &self.combined_props {
            if let Ok(encoded) = serde_json::to_string(parts) {
                map.insert("draw:properties".into(), Value::from(encoded));
            }
        }
        for (k, v) in &self.user {
            map.insert(k.clone(), v.clone());
        }
        map
    }

    /// Rebuild props from a GeoJSON properties object. Unknown `draw:*`
    /// values fall back to defaults; everything else lands in `user`.
    pub fn from_geojson_map(map: &Map<String, Value>) -> Self {
        let mut props = DrawProps::default();
        let mut shape = ShapeState::default();

        for (key, value) in map {
            match key.as_str() {
                "draw:id" | "draw:type" => {}
                "draw:meta" => {
                    if let Some(meta) = value.as_str().and_then(Meta::from_str) {
                        props.meta = meta;
                    }
                }
                "draw:active" => props.active = value.as_str() == Some("true"),
                "draw:mode" => props.mode = value.as_str().and_then(ModeKind::from_str),
                "draw:pid" => {
                    // Parent ids are not restored: they referenced a store
                    // entry from the snapshot's session.
                }
                "draw:path" => {
                    let parsed: Option<Vec<usize>> = value
                        .as_str()
                        .map(|s| s.split('.').map(|seg| seg.parse().ok()).collect::<Option<_>>())
                        .unwrap_or(None);
                    props.path = parsed.map(CoordPath::new);
                }
                "draw:polygon" => shape.kind = value.as_str().and_then(ShapeKind::from_str),
                "draw:center" => {
                    shape.center = value.as_str().and_then(|s| {
                        let (x, y) = s.split_once(',')?;
                        Some(Coord::new(x.parse().ok()?, y.parse().ok()?))
                    });
                }
                "draw:radius" => shape.radius = value.as_f64(),
                "draw:xradius" => shape.xradius = value.as_f64(),
                "draw:yradius" => shape.yradius = value.as_f64(),
                "draw:length" => shape.length = value.as_f64(),
                "draw:width" => shape.width = value.as_f64(),
                "draw:eccentricity" => shape.eccentricity = value.as_f64(),
                "draw:properties" => {
                    props.combined_props = value
                        .as_str()
                        .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok());
                }
                _ => {
                    props.user.insert(key.clone(), value.clone());
                }
            }
        }

        if shape != ShapeState::default() {
            props.shape = Some(shape);
        }
        props
    }
}

// ===== Feature =====

/// One drawable object: id, geometry, properties
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Geometry,
    pub props: DrawProps,
}

impl Feature {
    /// Create a feature with default (inactive, Feature-meta) props
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: FeatureId::next(),
            geometry,
            props: DrawProps::default(),
        }
    }

    /// Create a feature with the given props
    pub fn with_props(geometry: Geometry, props: DrawProps) -> Self {
        Self {
            id: FeatureId::next(),
            geometry,
            props,
        }
    }

    /// The shape kind tag, if any
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.props.shape_kind()
    }

    /// Whether the ring is derived rather than freely editable
    pub fn is_special_polygon(&self) -> bool {
        self.props.is_special_polygon()
    }

    /// GeoJSON Feature object
    pub fn to_geojson(&self) -> Value {
        Value::Object(Map::from_iter([
            ("type".to_string(), Value::from("Feature")),
            ("id".to_string(), Value::from(self.id.as_u64())),
            (
                "properties".to_string(),
                Value::Object(self.props.to_geojson_map(self.id, &self.geometry)),
            ),
            ("geometry".to_string(), self.geometry.to_geojson()),
        ]))
    }
}
