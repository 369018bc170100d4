// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Mode system for map drawing and editing.
//!
//! A mode is an interaction state machine bound to the shared
//! `DrawContext`: the controller routes every map/keyboard event to the
//! current mode, and exactly one mode is live at a time. Modes implement
//! the `DrawMode` lifecycle (`on_setup`/`on_stop` plus per-input handlers)
//! and are dispatched through the `ModeBox` tagged union.

use crate::controller::DrawContext;
use crate::events::{KeyEvent, MapEvent};
use crate::model::FeatureId;
use serde::{Deserialize, Serialize};

// ===== Mode Identifier =====

/// Mode identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    /// Select and move whole features
    Select,
    /// Edit features down to individual vertices
    Edit,
    /// Place a single point
    Point,
}

impl ModeKind {
    /// Tag value used in properties and event payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Select => "select",
            ModeKind::Edit => "edit",
            ModeKind::Point => "point",
        }
    }

    /// Parse a tag value
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "select" => Some(ModeKind::Select),
            "edit" => Some(ModeKind::Edit),
            "point" => Some(ModeKind::Point),
            _ => None,
        }
    }
}

// ===== Mode Options =====

/// Caller-supplied options for a mode change
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModeOptions {
    /// Features to pre-select on setup (Select/Edit modes)
    #[serde(default)]
    pub feature_ids: Vec<FeatureId>,
}

impl ModeOptions {
    /// Options pre-selecting the given features
    pub fn with_features(feature_ids: Vec<FeatureId>) -> Self {
        Self { feature_ids }
    }
}

// ===== DrawMode Trait =====

/// An interaction mode bound to the shared draw context
pub trait DrawMode {
    /// Get the mode identifier
    fn kind(&self) -> ModeKind;

    /// Activate the mode
    fn on_setup(&mut self, ctx: &mut DrawContext);

    /// Deactivate the mode and release everything it created
    fn on_stop(&mut self, ctx: &mut DrawContext);

    /// Handle click/tap
    fn on_click(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle mouse-down/touch-start
    fn on_mouse_down(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle mouse-up/touch-end
    fn on_mouse_up(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle pointer movement (no buttons held)
    fn on_mouse_move(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle the pointer leaving the map
    fn on_mouse_out(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle a drag step
    fn on_drag(&mut self, _ctx: &mut DrawContext, _e: &MapEvent) {}

    /// Handle key-up
    fn on_key_up(&mut self, _ctx: &mut DrawContext, _e: &KeyEvent) {}

    /// Delete the current selection (toolbar trash)
    fn on_trash(&mut self, _ctx: &mut DrawContext) {}

    /// Combine the selected features (toolbar combine)
    fn on_combine(&mut self, _ctx: &mut DrawContext) {}

    /// Split the selected Multi features (toolbar uncombine)
    fn on_uncombine(&mut self, _ctx: &mut DrawContext) {}

    /// Display-pass hook, run once per host render
    fn on_display(&mut self, _ctx: &mut DrawContext) {}
}

// ===== ModeBox Enum =====

/// Enum wrapping all mode types
#[derive(Debug)]
pub enum ModeBox {
    Select(select::SelectMode),
    Edit(edit::EditMode),
    Point(point::PointMode),
}

impl ModeBox {
    /// Create a mode by kind
    pub fn for_kind(kind: ModeKind, options: ModeOptions) -> Self {
        match kind {
            ModeKind::Select => ModeBox::Select(select::SelectMode::new(options)),
            ModeKind::Edit => ModeBox::Edit(edit::EditMode::new(options)),
            ModeKind::Point => ModeBox::Point(point::PointMode::new(options)),
        }
    }

    /// Get the mode kind
    pub fn kind(&self) -> ModeKind {
        match self {
            ModeBox::Select(mode) => mode.kind(),
            ModeBox::Edit(mode) => mode.kind(),
            ModeBox::Point(mode) => mode.kind(),
        }
    }

    /// Activate the mode
    pub fn on_setup(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_setup(ctx),
            ModeBox::Edit(mode) => mode.on_setup(ctx),
            ModeBox::Point(mode) => mode.on_setup(ctx),
        }
    }

    /// Deactivate the mode
    pub fn on_stop(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_stop(ctx),
            ModeBox::Edit(mode) => mode.on_stop(ctx),
            ModeBox::Point(mode) => mode.on_stop(ctx),
        }
    }

    /// Handle click/tap
    pub fn on_click(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_click(ctx, e),
            ModeBox::Edit(mode) => mode.on_click(ctx, e),
            ModeBox::Point(mode) => mode.on_click(ctx, e),
        }
    }

    /// Handle mouse-down/touch-start
    pub fn on_mouse_down(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_mouse_down(ctx, e),
            ModeBox::Edit(mode) => mode.on_mouse_down(ctx, e),
            ModeBox::Point(mode) => mode.on_mouse_down(ctx, e),
        }
    }

    /// Handle mouse-up/touch-end
    pub fn on_mouse_up(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_mouse_up(ctx, e),
            ModeBox::Edit(mode) => mode.on_mouse_up(ctx, e),
            ModeBox::Point(mode) => mode.on_mouse_up(ctx, e),
        }
    }

    /// Handle pointer movement
    pub fn on_mouse_move(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_mouse_move(ctx, e),
            ModeBox::Edit(mode) => mode.on_mouse_move(ctx, e),
            ModeBox::Point(mode) => mode.on_mouse_move(ctx, e),
        }
    }

    /// Handle the pointer leaving the map
    pub fn on_mouse_out(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_mouse_out(ctx, e),
            ModeBox::Edit(mode) => mode.on_mouse_out(ctx, e),
            ModeBox::Point(mode) => mode.on_mouse_out(ctx, e),
        }
    }

    /// Handle a drag step
    pub fn on_drag(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_drag(ctx, e),
            ModeBox::Edit(mode) => mode.on_drag(ctx, e),
            ModeBox::Point(mode) => mode.on_drag(ctx, e),
        }
    }

    /// Handle key-up
    pub fn on_key_up(&mut self, ctx: &mut DrawContext, e: &KeyEvent) {
        match self {
            ModeBox::Select(mode) => mode.on_key_up(ctx, e),
            ModeBox::Edit(mode) => mode.on_key_up(ctx, e),
            ModeBox::Point(mode) => mode.on_key_up(ctx, e),
        }
    }

    /// Delete the current selection
    pub fn on_trash(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_trash(ctx),
            ModeBox::Edit(mode) => mode.on_trash(ctx),
            ModeBox::Point(mode) => mode.on_trash(ctx),
        }
    }

    /// Combine the selected features
    pub fn on_combine(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_combine(ctx),
            ModeBox::Edit(mode) => mode.on_combine(ctx),
            ModeBox::Point(mode) => mode.on_combine(ctx),
        }
    }

    /// Split the selected Multi features
    pub fn on_uncombine(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_uncombine(ctx),
            ModeBox::Edit(mode) => mode.on_uncombine(ctx),
            ModeBox::Point(mode) => mode.on_uncombine(ctx),
        }
    }

    /// Display-pass hook
    pub fn on_display(&mut self, ctx: &mut DrawContext) {
        match self {
            ModeBox::Select(mode) => mode.on_display(ctx),
            ModeBox::Edit(mode) => mode.on_display(ctx),
            ModeBox::Point(mode) => mode.on_display(ctx),
        }
    }
}

// ===== Mode Modules =====

pub mod edit;
pub mod point;
pub mod select;
