// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Point mode: place a single point feature.
//!
//! The template for placement modes. The first click creates the feature;
//! every further click before completion just relocates it, so only the
//! latest position survives. Completion happens in the display pass: once
//! the placed feature settles from active to inactive, the mode fires
//! draw-complete and hands off to Select mode with the new feature as the
//! sole selection. Escape or trash cancels instead, deleting the
//! in-progress feature.

use crate::controller::DrawContext;
use crate::editing::selectors;
use crate::events::{ActionableState, DrawEvent, KeyEvent, MapEvent};
use crate::model::{DrawProps, Feature, FeatureId, Geometry, Meta};
use crate::modes::{DrawMode, ModeKind, ModeOptions};

/// The point-placement state machine
#[derive(Debug, Default)]
pub struct PointMode {
    point: Option<FeatureId>,
}

impl PointMode {
    /// Create the mode; state becomes live on `on_setup`
    pub fn new(_options: ModeOptions) -> Self {
        Self { point: None }
    }

    fn cancel(&mut self, ctx: &mut DrawContext) {
        if let Some(id) = self.point.take() {
            ctx.store.delete(&[id], true);
        }
        tracing::info!("point mode: cancelled");
        ctx.fire(DrawEvent::DrawCancel {
            mode: ModeKind::Point,
        });
        ctx.change_mode(ModeKind::Select, ModeOptions::default());
    }

    fn complete(&mut self, ctx: &mut DrawContext, id: FeatureId) {
        let Some(feature) = ctx.store.get(id) else {
            return;
        };
        let geojson = feature.to_geojson();
        self.point = None;
        tracing::info!("point mode: completed feature {id}");
        ctx.fire(DrawEvent::DrawComplete {
            mode: ModeKind::Point,
            feature: geojson,
        });
        ctx.change_mode(ModeKind::Select, ModeOptions::with_features(vec![id]));
    }
}

impl DrawMode for PointMode {
    fn kind(&self) -> ModeKind {
        ModeKind::Point
    }

    fn on_setup(&mut self, ctx: &mut DrawContext) {
        // Double-click zoom stays off while placing, and a pending
        // re-enable from a just-stopped mode is cancelled here.
        ctx.suppress_double_click();
        ctx.store.clear_selected();
        ctx.set_actionable_state(ActionableState {
            trash: true,
            ..ActionableState::default()
        });
        tracing::info!("point mode: setup");
    }

    fn on_stop(&mut self, ctx: &mut DrawContext) {
        // An in-progress feature survives an external stop, but loses its
        // active flag.
        if let Some(id) = self.point
            && let Some(feature) = ctx.store.get_mut(id)
        {
            feature.props.active = false;
        }
        ctx.schedule_double_click_reenable();
        tracing::info!("point mode: stopped");
    }

    fn on_click(&mut self, ctx: &mut DrawContext, e: &MapEvent) {
        if let Some(feature) = self.point.and_then(|id| ctx.store.get_mut(id)) {
            // Relocate: only the latest click position survives.
            feature.geometry = Geometry::Point(e.lng_lat);
            feature.props.active = true;
            return;
        }

        let feature = Feature::with_props(
            Geometry::Point(e.lng_lat),
            DrawProps {
                meta: Meta::Feature,
                active: true,
                mode: Some(ModeKind::Point),
                ..DrawProps::default()
            },
        );
        tracing::debug!("point mode: placed at {:?}", e.lng_lat);
        self.point = Some(ctx.store.add(feature));
    }

    fn on_key_up(&mut self, ctx: &mut DrawContext, e: &KeyEvent) {
        if selectors::is_escape_key(e) {
            self.cancel(ctx);
        }
    }

    fn on_trash(&mut self, ctx: &mut DrawContext) {
        self.cancel(ctx);
    }

    fn on_display(&mut self, ctx: &mut DrawContext) {
        // The placed feature settling from active to inactive is the
        // completion signal.
        let Some(id) = self.point else {
            return;
        };
        let Some(feature) = ctx.store.get_mut(id) else {
            self.point = None;
            return;
        };
        if feature.props.active {
            feature.props.active = false;
            self.complete(ctx, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DrawController;
    use crate::model::Coord;
    use crate::testing::{RecordingAdapter, RecordingSink, SharedLog, test_context};

    #[test]
    fn first_click_places_following_clicks_relocate() {
        let (mut ctx, _log) = test_context();
        let mut mode = PointMode::new(ModeOptions::default());
        mode.on_setup(&mut ctx);

        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(10.0, 20.0)));
        assert_eq!(ctx.store.len(), 1);
        let id = mode.point.unwrap();

        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(11.0, 21.0)));
        assert_eq!(ctx.store.len(), 1, "same feature, relocated");
        assert_eq!(
            ctx.store.get(id).unwrap().geometry,
            Geometry::Point(Coord::new(11.0, 21.0))
        );
    }

    #[test]
    fn display_pass_completes_the_feature() {
        let (mut ctx, log) = test_context();
        let mut mode = PointMode::new(ModeOptions::default());
        mode.on_setup(&mut ctx);
        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(10.0, 20.0)));
        let id = mode.point.unwrap();

        mode.on_display(&mut ctx);
        assert!(!ctx.store.get(id).unwrap().props.active);
        assert!(log.contains("event draw_complete"));
        assert_eq!(mode.point, None);

        // A second pass must not complete again.
        log.clear();
        mode.on_display(&mut ctx);
        assert!(!log.contains("event draw_complete"));
    }

    #[test]
    fn escape_cancels_and_deletes_the_feature() {
        let (mut ctx, log) = test_context();
        let mut mode = PointMode::new(ModeOptions::default());
        mode.on_setup(&mut ctx);
        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(1.0, 2.0)));

        mode.on_key_up(&mut ctx, &KeyEvent { key_code: 27 });
        assert!(ctx.store.is_empty());
        assert!(log.contains("event draw_cancel"));
    }

    #[test]
    fn trash_cancels_like_escape() {
        let (mut ctx, log) = test_context();
        let mut mode = PointMode::new(ModeOptions::default());
        mode.on_setup(&mut ctx);
        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(1.0, 2.0)));

        mode.on_trash(&mut ctx);
        assert!(ctx.store.is_empty());
        assert!(log.contains("event draw_cancel"));
    }

    #[test]
    fn stop_keeps_the_feature_but_deactivates_it() {
        let (mut ctx, _log) = test_context();
        let mut mode = PointMode::new(ModeOptions::default());
        mode.on_setup(&mut ctx);
        mode.on_click(&mut ctx, &MapEvent::at(Coord::new(1.0, 2.0)));
        let id = mode.point.unwrap();

        mode.on_stop(&mut ctx);
        assert!(ctx.store.contains(id));
        assert!(!ctx.store.get(id).unwrap().props.active);
    }

    #[test]
    fn completed_point_hands_off_to_select_as_sole_selection() {
        let log = SharedLog::default();
        let mut controller = DrawController::new(
            Box::new(RecordingAdapter::new(log.clone())),
            Box::new(RecordingSink::new(log.clone())),
        );

        controller.change_mode(ModeKind::Point, ModeOptions::default());
        controller.click(&MapEvent::at(Coord::new(10.0, 20.0)));
        controller.render();

        assert_eq!(controller.mode(), ModeKind::Select);
        let selected = controller.store().selected_ids();
        assert_eq!(selected.len(), 1);
        let feature = controller.store().get(selected[0]).unwrap();
        assert_eq!(feature.geometry, Geometry::Point(Coord::new(10.0, 20.0)));
        assert!(log.contains("event draw_complete"));
    }
}
