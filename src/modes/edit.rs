// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit mode: full feature editing down to individual vertices.
//!
//! The mode tracks two levels of selection — whole features (through the
//! shared `SelectionSet`) and a node selection of coordinate paths on the
//! single-feature case. Pointer input routes through the selector
//! predicates: pressing a vertex arms a vertex drag, pressing a midpoint
//! inserts a new vertex and drags it, pressing a selected feature's body
//! drags the whole selection. Special polygons re-derive their entire ring
//! from the dragged control point instead of moving one vertex.

use crate::controller::{DrawContext, Interaction};
use crate::editing::combine::{combine_selected, uncombine_selected};
use crate::editing::drag::{DragSession, move_features};
use crate::editing::selection::SelectionSet;
use crate::editing::selectors;
use crate::events::{CursorStyle, DrawEvent, KeyEvent, MapEvent, UpdateAction};
use crate::model::{Coord, CoordPath, CoordRef, Feature, FeatureId, Meta};
use crate::modes::{DrawMode, ModeKind, ModeOptions};
use crate::settings;
use crate::shapes::{self, ShapeKind};
use serde_json::Value;

/// The edit-mode state machine
#[derive(Debug, Default)]
pub struct EditMode {
    options: ModeOptions,
    selection: SelectionSet,
    selected_paths: Vec<CoordRef>,
    drag: DragSession,
}

impl EditMode {
    /// Create the mode; state becomes live on `on_setup`
    pub fn new(options: ModeOptions) -> Self {
        Self {
            options,
            selection: SelectionSet::new(),
            selected_paths: Vec::new(),
            drag: DragSession::new(),
        }
    }

    // ===== Selection Helpers =====

    fn fire_actionable(&self, ctx: &mut DrawContext) {
        let state = self.selection.actionable_state(&ctx.store);
        ctx.set_actionable_state(state);
    }

    fn fire_update(&self, ctx: &mut DrawContext) {
        let action = if self.drag.drag_meta == Some(Meta::Feature) {
            UpdateAction::Move
        } else {
            UpdateAction::ChangeCoordinates
        };
        let features: Vec<Value> = ctx.store.selected().iter().map(|f| f.to_geojson()).collect();
        ctx.fire(DrawEvent::Update { action, features });
    }

    fn clear_selected_paths(&mut self, ctx: &mut DrawContext) {
        if !self.selected_paths.is_empty() {
            self.selected_paths.clear();
            self.selection.set_active_paths(&mut ctx.store, &[]);
        }
    }

    fn set_single_active(&mut self, ctx: &mut DrawContext, id: FeatureId) {
        self.selection
            .set_single_active(&mut ctx.store, id, &self.selected_paths);
    }

    /// Rebuild markers and affordances after the node selection changed
    fn refresh_selected_vertices(&mut self, ctx: &mut DrawContext, id: FeatureId) {
        self.set_single_active(ctx, id);
        self.fire_actionable(ctx);
    }

    // ===== Drag Helpers =====

    fn start_dragging(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        tracing::debug!("edit: arming drag at {:?}", e.lng_lat);
        ctx.disable(Interaction::DragPan);
        self.drag.start(e.lng_lat);
    }

    fn stop_dragging(&mut self, ctx: &mut DrawContext) {
        ctx.enable_silent(Interaction::DragPan);
        self.drag.stop();
    }

    // ===== Click Routing =====

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
                    .add_multi_selected(&mut ctx.store, feature_id, &self.selected_paths);
            } else {
                self.selection
                    .remove_feature(&mut ctx.store, feature_id, &self.selected_paths);
            }
        } else {
            self.set_single_active(ctx, feature_id);
        }
        self.fire_actionable(ctx);
    }

    // ===== Mouse-Down Routing =====

    fn down_on_vertex(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        let Some(target) = &e.target else {
            return;
        };
        let (Some(feature_id), Some(path)) = (target.props.parent, target.props.path.clone())
        else {
            return;
        };
        let is_special = target.props.is_special_polygon();
        let is_shift = selectors::is_shift_down(e);
        self.start_dragging(ctx, e);

        let pressed = CoordRef {
            feature: feature_id,
            path,
        };

        // Multi-feature vertex multi-select is disallowed: any vertex press
        // collapses the node selection to that one path.
        if self.selection.len() > 1 {
            self.selected_paths = vec![pressed];
            self.refresh_selected_vertices(ctx, feature_id);
            return;
        }

        match self.selected_paths.iter().position(|r| *r == pressed) {
            None => {
                if is_shift && !is_special {
                    self.selected_paths.push(pressed);
                } else {
                    self.selected_paths = vec![pressed];
                }
                self.refresh_selected_vertices(ctx, feature_id);
            }
            Some(index) if is_shift => {
                self.selected_paths.remove(index);
                self.refresh_selected_vertices(ctx, feature_id);
            }
            Some(_) => {
                // Pressing an already-selected path without shift keeps the
                // node selection and leaves the drag armed.
            }
        }
    }

    fn down_on_mid_point(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        let Some(target) = &e.target else {
            return;
        };
        let (Some(feature_id), Some(path)) = (target.props.parent, target.props.path.clone())
        else {
            return;
        };
        let Some(coordinate) = target.coordinate else {
            return;
        };
        self.start_dragging(ctx, e);
        self.drag.drag_meta = Some(Meta::Vertex);

        let inserted = ctx
            .store
            .get_mut(feature_id)
            .map(|feature| feature.geometry.insert_coordinate(&path, coordinate));
        if !matches!(inserted, Some(Ok(()))) {
            return;
        }
        tracing::debug!("edit: inserted vertex at {}.{path}", feature_id);

        self.selected_paths = vec![CoordRef {
            feature: feature_id,
            path,
        }];
        self.set_single_active(ctx, feature_id);
        self.fire_actionable(ctx);
        self.fire_update(ctx);
    }

    fn down_on_feature(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        // Clicking the body while nodes are selected is a no-op, preserving
        // node-edit focus.
        if self.selected_paths.is_empty() {
            self.start_dragging(ctx, e);
        } else {
            self.stop_dragging(ctx);
        }
    }

    // ===== Dragging =====

    fn drag_vertex(&mut self, ctx: &mut DrawContext, pointer: Coord, delta: kurbo::Vec2) {
        let mut dragged: Vec<FeatureId> = Vec::new();
        for cref in self.selected_paths.clone() {
            let Some(feature) = ctx.store.get_mut(cref.feature) else {
                continue;
            };
            if feature.is_special_polygon() {
                Self::rederive_special(feature, &cref.path, pointer);
            } else if let Some(coordinate) = feature.geometry.coordinate(&cref.path) {
                let _ = feature
                    .geometry
                    .update_coordinate(&cref.path, coordinate + delta);
            }
            if !dragged.contains(&cref.feature) {
                dragged.push(cref.feature);
            }
        }

        // Redraw the markers around the new geometry.
        if let Some(owner) = dragged.first().copied() {
            self.set_single_active(ctx, owner);
        }

        let features: Vec<Value> = dragged
            .iter()
            .filter_map(|id| ctx.store.get(*id))
            .filter(|f| f.props.meta == Meta::Feature)
            .map(|f| f.to_geojson())
            .collect();
        ctx.fire(DrawEvent::Drag {
            action: Meta::Vertex,
            features,
        });
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

    /// Re-derive a special polygon's whole ring from the dragged control
    /// point's new position.
    fn rederive_special(feature: &mut Feature, path: &CoordPath, pointer: Coord) {
        let Some(kind) = feature.shape_kind() else {
            return;
        };
        let stored_center = feature.props.shape.as_ref().and_then(|s| s.center);
        let center = stored_center.or_else(|| feature.geometry.extent_center());

        match kind {
            ShapeKind::Circle => {
                let Some(center) = center else {
                    return;
                };
                let circle = shapes::circle_ring(center, pointer);
                let mut ring = circle.coords;
                ring.pop();
                feature.geometry.set_outer_ring(ring);
                if let Some(shape) = feature.props.shape.as_mut() {
                    shape.center = Some(center);
                    shape.radius = Some(circle.radius);
                }
            }
            ShapeKind::Ellipse => {
                let Some(center) = center else {
                    return;
                };
                let eccentricity = feature
                    .props
                    .shape
                    .as_ref()
                    .and_then(|s| s.eccentricity)
                    .unwrap_or(settings::shapes::DEFAULT_ECCENTRICITY);
                let ellipse = shapes::ellipse_ring(
                    center,
                    pointer,
                    eccentricity,
                    settings::shapes::ELLIPSE_DIVISIONS,
                );
                let mut ring = ellipse.coords;
                ring.pop();
                feature.geometry.set_outer_ring(ring);
                if let Some(shape) = feature.props.shape.as_mut() {
                    shape.center = Some(center);
                    shape.xradius = Some(ellipse.xradius);
                    shape.yradius = Some(ellipse.yradius);
                }
            }
            ShapeKind::Rectangle => {
                let Some(corner) = path.vertex_index() else {
                    return;
                };
                let crate::model::Geometry::Polygon(rings) = &feature.geometry else {
                    return;
                };
                let Some(current) = rings.first().cloned() else {
                    return;
                };
                let Some((start, diagonal)) = shapes::rectangle_anchors(&current, corner, pointer)
                else {
                    return;
                };
                let rect = shapes::rectangle_ring(start, diagonal);
                let mut ring = rect.coords;
                ring.pop();
                feature.geometry.set_outer_ring(ring);
                if let Some(shape) = feature.props.shape.as_mut() {
                    shape.length = Some(rect.length);
                    shape.width = Some(rect.width);
                }
            }
            ShapeKind::Square => {
                let Some(corner) = path.vertex_index() else {
                    return;
                };
                let crate::model::Geometry::Polygon(rings) = &feature.geometry else {
                    return;
                };
                let Some(current) = rings.first().cloned() else {
                    return;
                };
                let Some((start, diagonal)) = shapes::rectangle_anchors(&current, corner, pointer)
                else {
                    return;
                };
                let square = shapes::square_ring(start, diagonal);
                let mut ring = square.coords;
                ring.pop();
                feature.geometry.set_outer_ring(ring);
                if let Some(shape) = feature.props.shape.as_mut() {
                    shape.length = Some(square.length);
                }
            }
        }
    }

    // ===== Trash =====

    fn delete_selected(&mut self, ctx: &mut DrawContext) {
        let ids = ctx.store.selected_ids();
        tracing::debug!("edit: deleting {} selected features", ids.len());
        self.selection.clear(&mut ctx.store);
        self.selected_paths.clear();
        ctx.store.delete(&ids, false);
        self.fire_actionable(ctx);
        ctx.store.set_mode_change_rendering();
    }
}

impl DrawMode for EditMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Edit
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
            // Midpoints only show on a single selection, as with clicks.
            let midpoint = initially_selected.len() == 1;
            self.selection.rebuild(
                &mut ctx.store,
                &initially_selected,
                midpoint,
                &self.selected_paths,
            );
        }
        self.selection
            .set_active_paths(&mut ctx.store, &self.selected_paths);
        self.fire_actionable(ctx);
        tracing::info!(
            "edit mode: setup with {} preselected",
            initially_selected.len()
        );
    }

    fn on_stop(&mut self, ctx: &mut DrawContext) {
        self.selection.clear(&mut ctx.store);
        self.clear_selected_paths(ctx);
        self.stop_dragging(ctx);
        ctx.schedule_double_click_reenable();
        tracing::info!("edit mode: stopped");
    }

    fn on_click(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        if selectors::no_target(e) {
            // Full deselect back to neutral.
            self.clear_selected_paths(ctx);
            self.selection.clear(&mut ctx.store);
            self.fire_actionable(ctx);
        } else if selectors::is_feature(e) {
            self.clear_selected_paths(ctx);
            self.click_on_feature(ctx, e);
        }
        self.stop_dragging(ctx);
    }

    fn on_mouse_down(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        if selectors::is_vertex(e) {
            self.down_on_vertex(ctx, e);
        } else if selectors::is_mid_point(e) {
            self.down_on_mid_point(ctx, e);
        } else if selectors::is_active_feature(e) {
            self.down_on_feature(ctx, e);
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
                    // A selected feature body drags unless node editing has
                    // taken focus.
                    if self.selected_paths.is_empty() {
                        ctx.set_cursor(Some(CursorStyle::Move));
                    } else {
                        ctx.set_cursor(None);
                    }
                } else if selectors::is_vertex(e) {
                    let selected_vertex = match (&target.props.parent, &target.props.path) {
                        (Some(parent), Some(path)) => self
                            .selected_paths
                            .iter()
                            .any(|r| r.feature == *parent && r.path == *path),
                        _ => false,
                    };
                    if selected_vertex || target.props.is_special_polygon() {
                        ctx.set_cursor(Some(CursorStyle::Move));
                    } else {
                        ctx.set_cursor(Some(CursorStyle::Pointer));
                    }
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
        if !self.selected_paths.is_empty() {
            self.drag.drag_meta = Some(Meta::Vertex);
            self.drag_vertex(ctx, e.lng_lat, delta);
        } else {
            self.drag.drag_meta = Some(Meta::Feature);
            self.drag_feature(ctx, delta);
        }
    }

    fn on_key_up(&mut self, ctx: &mut DrawContext, e: &KeyEvent) {
        if selectors::is_delete_key(e) {
            self.on_trash(ctx);
        }
    }

    fn on_trash(&mut self, ctx: &mut DrawContext) {
        let selected_ids = ctx.store.selected_ids();

        if !self.selected_paths.is_empty() {
            // Remove deepest paths first so shallower indices stay valid.
            let mut paths = self.selected_paths.clone();
            paths.sort_by(|a, b| b.path.cmp(&a.path));

            let mut all_valid = true;
            let mut last_feature = None;
            for cref in &paths {
                last_feature = Some(cref.feature);
                let Some(feature) = ctx.store.get_mut(cref.feature) else {
                    continue;
                };
                if feature.is_special_polygon() {
                    // Derived rings are never node-trimmed.
                    all_valid = false;
                } else {
                    let _ = feature.geometry.remove_coordinate(&cref.path);
                    if !feature.geometry.is_valid() {
                        all_valid = false;
                    }
                }
            }

            if all_valid {
                tracing::debug!("edit: trashed {} vertices", paths.len());
                self.selected_paths.clear();
                if let Some(id) = last_feature {
                    self.set_single_active(ctx, id);
                }
                self.fire_actionable(ctx);
                self.fire_update(ctx);
                ctx.store.set_mode_change_rendering();
            } else {
                self.delete_selected(ctx);
            }
        } else if !selected_ids.is_empty() {
            self.delete_selected(ctx);
        }
    }

    fn on_combine(&mut self, ctx: &mut DrawContext) {
        combine_selected(ctx, &mut self.selection, &mut self.selected_paths);
    }

    fn on_uncombine(&mut self, ctx: &mut DrawContext) {
        uncombine_selected(ctx, &mut self.selection, &mut self.selected_paths);
    }
}
