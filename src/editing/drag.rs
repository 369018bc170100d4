// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Drag session bookkeeping and whole-feature translation.
//!
//! One `DragSession` lives inside each mode that supports dragging. It is
//! armed on mouse-down over a draggable target (`start`), advanced on every
//! pointer move, and cleared on mouse-up/out or mode teardown (`stop`).
//! Only one drag can be in progress per mode: `can_drag_move` gates every
//! move event, and all moves route through the same session until an
//! explicit stop.

use crate::model::{Coord, FeatureId, FeatureStore, Meta};
use kurbo::Vec2;

/// Transient state of an in-progress drag
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    /// Whether a drag may proceed (armed by mouse-down)
    pub can_drag_move: bool,
    /// Whether the pointer actually moved since arming
    pub drag_moving: bool,
    /// What the drag is moving (whole features or vertices)
    pub drag_meta: Option<Meta>,
    /// Last recorded pointer position
    pub drag_move_location: Option<Coord>,
}

impl DragSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the session at the press position
    pub fn start(&mut self, location: Coord) {
        self.can_drag_move = true;
        self.drag_move_location = Some(location);
    }

    /// Clear all bookkeeping
    pub fn stop(&mut self) {
        self.can_drag_move = false;
        self.drag_moving = false;
        self.drag_meta = None;
        self.drag_move_location = None;
    }

    /// Delta from the last recorded position to `pointer`, advancing the
    /// recorded position. `None` when the session is not armed.
    pub fn step(&mut self, pointer: Coord) -> Option<Vec2> {
        if !self.can_drag_move {
            return None;
        }
        let last = self.drag_move_location?;
        self.drag_moving = true;
        self.drag_move_location = Some(pointer);
        Some(pointer - last)
    }
}

/// Translate the given features (and markers) by a lng/lat delta
pub fn move_features(store: &mut FeatureStore, ids: &[FeatureId], delta: Vec2) {
    for id in ids {
        if let Some(feature) = store.get_mut(*id) {
            feature.geometry.translate(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Feature, Geometry};

    #[test]
    fn step_requires_arming() {
        let mut drag = DragSession::new();
        assert_eq!(drag.step(Coord::new(1.0, 1.0)), None);
        assert!(!drag.drag_moving);
    }

    #[test]
    fn step_accumulates_from_last_position() {
        let mut drag = DragSession::new();
        drag.start(Coord::new(10.0, 10.0));

        let first = drag.step(Coord::new(12.0, 9.0)).unwrap();
        assert_eq!(first, Vec2::new(2.0, -1.0));
        assert!(drag.drag_moving);

        let second = drag.step(Coord::new(12.5, 9.5)).unwrap();
        assert_eq!(second, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn stop_clears_everything() {
        let mut drag = DragSession::new();
        drag.start(Coord::new(0.0, 0.0));
        drag.drag_meta = Some(Meta::Feature);
        drag.step(Coord::new(1.0, 1.0));

        drag.stop();
        assert!(!drag.can_drag_move);
        assert!(!drag.drag_moving);
        assert_eq!(drag.drag_meta, None);
        assert_eq!(drag.drag_move_location, None);
    }

    #[test]
    fn move_features_shifts_all_ids() {
        let mut store = FeatureStore::new();
        let a = store.add(Feature::new(Geometry::Point(Coord::new(0.0, 0.0))));
        let b = store.add(Feature::new(Geometry::Point(Coord::new(5.0, 5.0))));

        move_features(&mut store, &[a, b], Vec2::new(1.0, 2.0));
        assert_eq!(
            store.get(a).unwrap().geometry,
            Geometry::Point(Coord::new(1.0, 2.0))
        );
        assert_eq!(
            store.get(b).unwrap().geometry,
            Geometry::Point(Coord::new(6.0, 7.0))
        );
    }
}
