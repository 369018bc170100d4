// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Data model: feature ids, geometries, features, and the feature store

pub mod feature;
pub mod feature_id;
pub mod geometry;
pub mod store;

pub use feature::{DrawProps, Feature, Meta, ShapeState};
pub use feature_id::FeatureId;
pub use geometry::{Coord, CoordPath, CoordRef, Geometry, GeometryError, GeometryFamily};
pub use store::FeatureStore;
