// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Cartodraw: a vector-feature drawing and editing engine for interactive
//! maps.
//!
//! The crate is the interaction layer of a map-drawing widget: selection,
//! vertex editing, parametric shape re-derivation, and placement modes,
//! driven by pointer/keyboard events the host map runtime routes in. The
//! runtime itself — rendering, hit testing, tiles — stays outside, behind
//! two traits: [`MapAdapter`] (interaction toggles, cursor, toolbar
//! affordances) and [`EventSink`] (semantic event bus).
//!
//! Typical wiring:
//!
//! ```ignore
//! let mut draw = DrawController::new(Box::new(adapter), Box::new(sink));
//! draw.change_mode(ModeKind::Edit, ModeOptions::default());
//! // ... route host events:
//! draw.click(&event);
//! draw.render();
//! draw.tick(Instant::now());
//! ```

pub mod controller;
pub mod editing;
pub mod events;
pub mod model;
pub mod modes;
pub mod settings;
pub mod shapes;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{DrawContext, DrawController, Interaction, MapAdapter};
pub use events::{
    ActionableState, CursorStyle, DrawEvent, EventSink, EventTarget, KeyEvent, MapEvent,
    MouseButton, PointerState, UpdateAction,
};
pub use model::{
    Coord, CoordPath, CoordRef, DrawProps, Feature, FeatureId, FeatureStore, Geometry,
    GeometryError, GeometryFamily, Meta, ShapeState,
};
pub use modes::{DrawMode, ModeKind, ModeOptions};
pub use shapes::ShapeKind;
