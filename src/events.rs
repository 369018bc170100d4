// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Event model: the map events routed into modes and the semantic events
//! the engine emits back to the host.
//!
//! A `MapEvent` is a pointer event the host has already hit-tested: if the
//! pointer was over a rendered feature (drawn geometry or vertex/midpoint
//! marker), `target` carries a snapshot of it. Handlers never assume a
//! target exists — classification goes through the selector predicates,
//! which treat a missing target as "no".

use crate::model::{Coord, DrawProps, FeatureId, Meta};
use crate::modes::ModeKind;
use serde::Serialize;
use serde_json::Value;

// ===== Input Events =====

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Raw pointer state accompanying a map event
#[derive(Debug, Clone, Copy)]
pub struct PointerState {
    /// Whether shift was held
    pub shift: bool,
    /// Which button the event is about
    pub button: MouseButton,
}

/// Snapshot of the feature under the pointer, taken by the host's hit test
#[derive(Debug, Clone)]
pub struct EventTarget {
    /// Store id of the hit feature
    pub id: FeatureId,
    /// The hit feature's properties at event time
    pub props: DrawProps,
    /// The hit feature's own coordinate, when it is a point marker
    /// (midpoint insertion uses this)
    pub coordinate: Option<Coord>,
}

/// A pointer event over the map
#[derive(Debug, Clone)]
pub struct MapEvent {
    /// Pointer position in lng/lat
    pub lng_lat: Coord,
    /// The feature under the pointer, if any
    pub target: Option<EventTarget>,
    /// Raw pointer state, when the host supplies it
    pub pointer: Option<PointerState>,
}

impl MapEvent {
    /// Event at a position with no target
    pub fn at(lng_lat: Coord) -> Self {
        Self {
            lng_lat,
            target: None,
            pointer: None,
        }
    }

    /// Attach a hit-test target
    pub fn with_target(mut self, target: EventTarget) -> Self {
        self.target = Some(target);
        self
    }

    /// Attach raw pointer state
    pub fn with_pointer(mut self, shift: bool, button: MouseButton) -> Self {
        self.pointer = Some(PointerState { shift, button });
        self
    }
}

/// A keyboard event
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    /// Platform key code (27 escape, 13 enter, 46 delete)
    pub key_code: u32,
}

// ===== Emitted Events =====

/// Update event action tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    /// Whole features were translated
    Move,
    /// Individual coordinates changed
    ChangeCoordinates,
}

/// Semantic events fired at the host
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DrawEvent {
    /// A placement mode finished its feature
    DrawComplete { mode: ModeKind, feature: Value },
    /// A placement mode was cancelled
    DrawCancel { mode: ModeKind },
    /// A drag step moved features or vertices
    Drag { action: Meta, features: Vec<Value> },
    /// A drag finished and features settled
    Update {
        action: UpdateAction,
        features: Vec<Value>,
    },
    /// Selected features were combined into one Multi feature
    Combine {
        created_features: Vec<Value>,
        deleted_features: Vec<Value>,
    },
    /// A Multi feature was split into its parts
    Uncombine {
        created_features: Vec<Value>,
        deleted_features: Vec<Value>,
    },
}

/// Receiver for semantic events (the host's event bus)
pub trait EventSink {
    /// Deliver one event
    fn fire(&mut self, event: DrawEvent);
}

// ===== UI Affordances =====

/// Toolbar affordance availability, recomputed after selection changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActionableState {
    /// Two or more selected features share one geometry family
    pub combine_features: bool,
    /// At least one selected feature is a Multi geometry
    pub uncombine_features: bool,
    /// At least one feature is selected
    pub trash: bool,
}

/// Pointer cursor requested from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStyle {
    /// Grab/translate affordance
    Move,
    /// Clickable-target affordance
    Pointer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_builder_attaches_pointer_state() {
        let e = MapEvent::at(Coord::new(1.0, 2.0)).with_pointer(true, MouseButton::Left);
        assert!(e.target.is_none());
        let pointer = e.pointer.unwrap();
        assert!(pointer.shift);
        assert_eq!(pointer.button, MouseButton::Left);
    }

    #[test]
    fn update_action_serializes_snake_case() {
        let v = serde_json::to_value(UpdateAction::ChangeCoordinates).unwrap();
        assert_eq!(v, "change_coordinates");
        let v = serde_json::to_value(UpdateAction::Move).unwrap();
        assert_eq!(v, "move");
    }

    #[test]
    fn drag_event_serializes_meta_tag() {
        let event = DrawEvent::Drag {
            action: Meta::Vertex,
            features: vec![],
        };
        let v = serde_json::to_value(event).unwrap();
        assert_eq!(v["type"], "drag");
        assert_eq!(v["action"], "vertex");
    }
}
