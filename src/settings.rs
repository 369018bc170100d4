// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Engine settings and configuration constants.
//!
//! This module holds non-visual interaction and geometry constants. Anything
//! visual (marker styling, layer paint) belongs to the host map runtime.

// ============================================================================
// INTERACTION SETTINGS
// ============================================================================
/// How long after a mode stops before double-click zoom is re-enabled.
///
/// A trailing double-click from the pointer-up that ended the mode must not
/// be misread as a zoom gesture. The controller keeps this as an explicit
/// suppression deadline; a new mode setup cancels a pending re-enable.
const DOUBLE_CLICK_REENABLE_MS: u64 = 300;

// ============================================================================
// GEOMETRY SETTINGS
// ============================================================================
/// Minimum vertices for a LineString to stay valid
const MIN_LINE_POINTS: usize = 2;

/// Minimum vertices for a polygon ring (closing duplicate excluded)
const MIN_RING_POINTS: usize = 3;

// ============================================================================
// SHAPE DERIVATION SETTINGS
// ============================================================================
/// Segment count for derived circle rings
const CIRCLE_SEGMENTS: usize = 64;

/// Division count for derived ellipse rings
const ELLIPSE_DIVISIONS: usize = 99;

/// Default ellipse eccentricity when the feature carries none
const DEFAULT_ECCENTRICITY: f64 = 0.8;

/// Control-vertex count exposed on derived rings (circle/ellipse).
///
/// Derived rings are not freely editable per-vertex, so selection shows a
/// reduced set of evenly spaced control handles instead of every ring
/// vertex. Rectangles and squares store exactly four vertices, which this
/// count reproduces unchanged.
const SHAPE_CONTROL_POINTS: usize = 4;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Interaction timing
pub mod interaction {
    use std::time::Duration;

    /// Double-click zoom re-enable delay after a mode stops
    pub const DOUBLE_CLICK_REENABLE: Duration =
        Duration::from_millis(super::DOUBLE_CLICK_REENABLE_MS);
}

/// Geometry validity minimums
pub mod geometry {
    /// Minimum vertices for a LineString
    pub const MIN_LINE_POINTS: usize = super::MIN_LINE_POINTS;

    /// Minimum vertices for a polygon ring
    pub const MIN_RING_POINTS: usize = super::MIN_RING_POINTS;
}

/// Parametric shape derivation
pub mod shapes {
    /// Segments in a derived circle ring
    pub const CIRCLE_SEGMENTS: usize = super::CIRCLE_SEGMENTS;

    /// Divisions in a derived ellipse ring
    pub const ELLIPSE_DIVISIONS: usize = super::ELLIPSE_DIVISIONS;

    /// Default eccentricity for ellipse re-derivation
    pub const DEFAULT_ECCENTRICITY: f64 = super::DEFAULT_ECCENTRICITY;

    /// Control vertices exposed on derived rings
    pub const SHAPE_CONTROL_POINTS: usize = super::SHAPE_CONTROL_POINTS;
}
