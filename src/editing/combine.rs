// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Combine and uncombine of selected features.
//!
//! Combine folds two or more same-family selected features into one
//! Multi- feature, snapshotting each part's full GeoJSON properties so a
//! later uncombine can restore them. Already-Multi members contribute
//! their parts (and their preserved snapshots) individually. Uncombine is
//! the inverse: every selected Multi- feature is split into one feature
//! per part, restoring the snapshot when one exists and synthesizing
//! default tags when it does not.
//!
//! Both operations are silent no-ops when their preconditions fail — a
//! mixed-family selection cannot combine, a selection without Multi
//! members cannot uncombine.

use crate::controller::DrawContext;
use crate::editing::selection::SelectionSet;
use crate::events::DrawEvent;
use crate::model::{CoordRef, DrawProps, Feature, FeatureId, Geometry, Meta};
use serde_json::Value;

/// Combine the selected features into one Multi- feature
pub fn combine_selected(
    ctx: &mut DrawContext,
    selection: &mut SelectionSet,
    selected_paths: &mut Vec<CoordRef>,
) {
    let selected: Vec<Feature> = ctx.store.selected().into_iter().cloned().collect();
    if selected.len() < 2 {
        return;
    }

    let family = selected[0].geometry.family();
    let mut parts = Vec::new();
    let mut part_props: Vec<String> = Vec::new();
    let mut features_combined: Vec<Value> = Vec::new();

    for feature in &selected {
        if feature.geometry.family() != family {
            return;
        }
        if feature.geometry.is_multi() {
            let snapshots = feature.props.combined_props.clone().unwrap_or_default();
            for (idx, part) in feature.geometry.parts().into_iter().enumerate() {
                parts.push(part);
                if let Some(snapshot) = snapshots.get(idx) {
                    part_props.push(snapshot.clone());
                }
            }
        } else {
            parts.push(feature.geometry.clone());
            let props_map = feature.props.to_geojson_map(feature.id, &feature.geometry);
            if let Ok(snapshot) = serde_json::to_string(&Value::Object(props_map)) {
                part_props.push(snapshot);
            }
        }
        features_combined.push(feature.to_geojson());
    }

    if features_combined.len() < 2 {
        return;
    }

    tracing::info!("combining {} features into Multi{}", selected.len(), family);
    let selected_ids = ctx.store.selected_ids();
    ctx.store.delete(&selected_ids, true);
    selected_paths.clear();

    let multi = Feature::with_props(
        Geometry::multi_from_parts(family, parts),
        DrawProps {
            meta: Meta::Feature,
            active: false,
            mode: Some(ctx.mode()),
            combined_props: Some(part_props),
            ..DrawProps::default()
        },
    );
    let multi_id = ctx.store.add(multi);
    selection.set_single_active(&mut ctx.store, multi_id, selected_paths);

    let state = selection.actionable_state(&ctx.store);
    ctx.set_actionable_state(state);
    ctx.store.set_mode_change_rendering();

    let created = ctx
        .store
        .get(multi_id)
        .map(|f| f.to_geojson())
        .into_iter()
        .collect();
    ctx.fire(DrawEvent::Combine {
        created_features: created,
        deleted_features: features_combined,
    });
}

/// Split every selected Multi- feature into its parts
pub fn uncombine_selected(
    ctx: &mut DrawContext,
    selection: &mut SelectionSet,
    selected_paths: &mut Vec<CoordRef>,
) {
    let selected: Vec<Feature> = ctx.store.selected().into_iter().cloned().collect();
    if selected.is_empty() {
        return;
    }

    let mut created_ids: Vec<FeatureId> = Vec::new();
    let mut created_features: Vec<Value> = Vec::new();
    let mut features_uncombined: Vec<Value> = Vec::new();

    for feature in &selected {
        if !feature.geometry.is_multi() {
            continue;
        }

        let snapshots = feature.props.combined_props.clone().unwrap_or_default();
        for (idx, part) in feature.geometry.parts().into_iter().enumerate() {
            let props = match snapshots
                .get(idx)
                .and_then(|s| serde_json::from_str::<Value>(s).ok())
                .and_then(|v| v.as_object().cloned())
            {
                Some(map) => DrawProps::from_geojson_map(&map),
                None => DrawProps {
                    meta: Meta::Feature,
                    active: false,
                    mode: Some(ctx.mode()),
                    ..DrawProps::default()
                },
            };
            let sub = Feature::with_props(part, props);
            let sub_id = ctx.store.add(sub);
            created_ids.push(sub_id);
            if let Some(added) = ctx.store.get(sub_id) {
                created_features.push(added.to_geojson());
            }
        }

        ctx.store.delete(&[feature.id], true);
        selected_paths.clear();
        features_uncombined.push(feature.to_geojson());
    }

    if features_uncombined.is_empty() {
        return;
    }

    tracing::info!(
        "uncombined {} features into {} parts",
        features_uncombined.len(),
        created_ids.len()
    );
    for (idx, id) in created_ids.iter().enumerate() {
        if idx == 0 {
            selection.set_single_active(&mut ctx.store, *id, selected_paths);
        } else {
            selection.add_multi_active(&mut ctx.store, *id, selected_paths);
        }
    }

    let state = selection.actionable_state(&ctx.store);
    ctx.set_actionable_state(state);
    ctx.store.set_mode_change_rendering();

    ctx.fire(DrawEvent::Uncombine {
        created_features,
        deleted_features: features_uncombined,
    });
}
