// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Select mode: feature-level selection and movement.
//!
//! The default mode, and the handoff target for finished placement modes.
//! It shares the selection machinery with edit mode but stays at the
//! feature level: clicking selects, shift-clicking toggles multi-selection
//! under the same family rule, dragging moves whole features. Vertex and
//! midpoint editing belong to edit mode.

use crate::controller::{DrawContext, Interaction};
use crate::editing::combine::{combine_selected, uncombine_selected};
use crate::editing::drag::{DragSession, move_features};
use crate::editing::selection::SelectionSet;
use crate::editing::selectors;
use crate::events::{CursorStyle, DrawEvent, KeyEvent, MapEvent, UpdateAction};
use crate::model::{FeatureId, Meta};
use crate::modes::{DrawMode, ModeKind, ModeOptions};
use serde_json::Value;

/// The select-mode state machine
#[derive(Debug, Default)]
pub struct SelectMode {
    options: ModeOptions,
    selection: SelectionSet,
    drag: DragSession,
}

impl SelectMode {
    /// Create the mode; state becomes live on `on_setup`
    pub fn new(options: ModeOptions) -> Self {
        Self {
            options,
            selection: SelectionSet::new(),
            drag: DragSession::new(),
        }
    }

    fn fire_actionable(&self, ctx: &mut DrawContext) {
        let state = self.selection.actionable_state(&ctx.store);
        ctx.set_actionable_state(state);
    }

    fn fire_update(&self, ctx: &mut DrawContext) {
        let features: Vec<Value> = ctx.store.selected().iter().map(|f| f.to_geojson()).collect();
        ctx.fire(DrawEvent::Update {
            action: UpdateAction::Move,
            features,
        });
    }

    fn start_dragging(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        tracing::debug!("select: arming drag at {:?}", e.lng_lat);
        ctx.disable(Interaction::DragPan);
        self.drag.start(e.lng_lat);
    }

    fn stop_dragging(&mut self, ctx: &mut DrawContext) {
        ctx.enable_silent(Interaction::DragPan);
        self.drag.stop();
    }

    fn click_on_feature(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        let Some(target) = &e.target else {
            return;
        };
        let feature_id = target.id;
        let is_shift_click = selectors::is_shift_down(e);
        let is_feature_selected = ctx.store.is_selected(feature_id);

        if is_shift_click {
            if !is_feature_selected {
                self.selection
                    .add_multi_selected(&mut ctx.store, feature_id, &[]);
            } else {
                self.selection.remove_feature(&mut ctx.store, feature_id, &[]);
            }
        } else {
            self.selection
                .set_single_active(&mut ctx.store, feature_id, &[]);
        }
        self.fire_actionable(ctx);
    }

    fn drag_feature(&mut self, ctx: &mut DrawContext, delta: kurbo::Vec2) {
        let selected_ids = ctx.store.selected_ids();
        let mut moved = selected_ids.clone();
        for id in &selected_ids {
            moved.extend_from_slice(self.selection.marker_ids(*id));
        }
        move_features(&mut ctx.store, &moved, delta);

        let features: Vec<Value> = selected_ids
            .iter()
            .filter_map(|id| ctx.store.get(*id))
            .filter(|f| f.props.meta == Meta::Feature)
            .map(|f| f.to_geojson())
            .collect();
        ctx.fire(DrawEvent::Drag {
            action: Meta::Feature,
            features,
        });
    }
}

impl DrawMode for SelectMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Select
    }

    fn on_setup(&mut self, ctx: &mut DrawContext) {
        let initially_selected: Vec<FeatureId> = self
            .options
            .feature_ids
            .iter()
            .copied()
            .filter(|id| {
                ctx.store
                    .get(*id)
                    .is_some_and(|f| f.props.meta == Meta::Feature)
            })
            .collect();
        if !initially_selected.is_empty() {
            self.selection
                .rebuild(&mut ctx.store, &initially_selected, false, &[]);
        }
        self.fire_actionable(ctx);
        tracing::info!(
            "select mode: setup with {} preselected",
            initially_selected.len()
        );
    }

    fn on_stop(&mut self, ctx: &mut DrawContext) {
        self.selection.clear(&mut ctx.store);
        self.stop_dragging(ctx);
        ctx.schedule_double_click_reenable();
        tracing::info!("select mode: stopped");
    }

    fn on_click(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        if selectors::no_target(e) {
            self.selection.clear(&mut ctx.store);
            self.fire_actionable(ctx);
        } else if selectors::is_feature(e) {
            self.click_on_feature(ctx, e);
        }
        self.stop_dragging(ctx);
    }

    fn on_mouse_down(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        if selectors::is_active_feature(e) {
            self.start_dragging(ctx, e);
        }
    }

    fn on_mouse_up(&mut self, ctx: &mut DrawContext, _e: &MapEvent) {
        if self.drag.drag_moving {
            self.fire_update(ctx);
        }
        self.stop_dragging(ctx);
    }

    fn on_mouse_move(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        match &e.target {
            Some(target) => {
                ctx.disable(Interaction::DoubleClickZoom);
                if selectors::is_feature(e) && ctx.store.is_selected(target.id) {
                    ctx.set_cursor(Some(CursorStyle::Move));
                } else {
                    ctx.set_cursor(Some(CursorStyle::Pointer));
                }
            }
            None => {
                ctx.set_cursor(None);
                ctx.enable(Interaction::DoubleClickZoom);
            }
        }
        self.stop_dragging(ctx);
    }

    fn on_mouse_out(&mut self, ctx: &mut DrawContext, _e: &MapEvent) {
        if self.drag.drag_moving {
            self.fire_update(ctx);
        }
        self.stop_dragging(ctx);
    }

    fn on_drag(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        let Some(delta) = self.drag.step(e.lng_lat) else {
            return;
        };
        self.drag.drag_meta = Some(Meta::Feature);
        self.drag_feature(ctx, delta);
    }

    fn on_key_up(&mut self, ctx: &mut DrawContext, e: &KeyEvent) {
        if selectors::is_delete_key(e) {
            self.on_trash(ctx);
        }
    }

    fn on_trash(&mut self, ctx: &mut DrawContext) {
        let ids = ctx.store.selected_ids();
        if ids.is_empty() {
            return;
        }
        tracing::debug!("select: deleting {} selected features", ids.len());
        self.selection.clear(&mut ctx.store);
        ctx.store.delete(&ids, false);
        self.fire_actionable(ctx);
        ctx.store.set_mode_change_rendering();
    }

    fn on_combine(&mut self, ctx: &mut DrawContext) {
        let mut paths = Vec::new();
        combine_selected(ctx, &mut self.selection, &mut paths);
    }

    fn on_uncombine(&mut self, ctx: &mut DrawContext) {
        let mut paths = Vec::new();
        uncombine_selected(ctx, &mut self.selection, &mut paths);
    }
}
