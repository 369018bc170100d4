// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! The selection model: which features are active, and the supplementary
//! markers cached for each of them.
//!
//! `SelectionSet` maps each selected feature id to the marker features it
//! created for it, in selection order (`IndexMap`, so the combine family
//! anchor and event payload order are deterministic). Every mutation keeps
//! the store consistent: markers are store features too, so removing a
//! selection always deletes its markers, and owners are re-tagged
//! active/inactive as they enter and leave the set.

use crate::editing::supplementary::{SupplementaryOptions, create_supplementary_points};
use crate::events::ActionableState;
use crate::model::{CoordRef, FeatureId, FeatureStore, Geometry, Meta};
use indexmap::IndexMap;

/// Cached state for one selected feature
#[derive(Debug, Clone)]
pub struct SelectedEntry {
    /// Whether midpoint markers were generated for this feature
    pub midpoint: bool,
    /// Marker feature ids, in generation order
    pub points: Vec<FeatureId>,
}

/// Ordered set of selected features with their cached markers
#[derive(Debug, Default)]
pub struct SelectionSet {
    entries: IndexMap<FeatureId, SelectedEntry>,
}

impl SelectionSet {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> Vec<FeatureId> {
        self.entries.keys().copied().collect()
    }

    /// Number of selected features
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a feature is in the selection
    pub fn contains(&self, id: FeatureId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Cached marker ids for one selected feature
    pub fn marker_ids(&self, owner: FeatureId) -> &[FeatureId] {
        self.entries
            .get(&owner)
            .map(|e| e.points.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the whole selection: delete every cached marker, re-tag the
    /// owners inactive, and clear the store's selected ids.
    pub fn clear(&mut self, store: &mut FeatureStore) {
        let mut marker_ids = Vec::new();
        for (owner, entry) in self.entries.drain(..) {
            marker_ids.extend(entry.points);
            if let Some(feature) = store.get_mut(owner) {
                feature.props.active = false;
            }
        }
        if !marker_ids.is_empty() {
            store.delete(&marker_ids, true);
        }
        store.clear_selected();
    }

    /// Rebuild the selection from scratch for the given ids.
    ///
    /// Ids missing from the store are skipped. Midpoint eligibility is
    /// decided per feature: Point geometries and special polygons never get
    /// midpoints, whatever the caller asked for.
    pub fn rebuild(
        &mut self,
        store: &mut FeatureStore,
        ids: &[FeatureId],
        midpoint: bool,
        selected_paths: &[CoordRef],
    ) {
        self.clear(store);
        store.set_selected(ids);

        for id in ids {
            let Some(feature) = store.get_mut(*id) else {
                continue;
            };
            feature.props.active = true;

            let no_midpoint = matches!(feature.geometry, Geometry::Point(_))
                || feature.is_special_polygon();
            let effective_midpoint = midpoint && !no_midpoint;
            let snapshot = feature.clone();

            let markers = create_supplementary_points(
                &snapshot,
                &SupplementaryOptions {
                    midpoint: effective_midpoint,
                    selected_paths: selected_paths.to_vec(),
                },
            );
            let mut point_ids = Vec::with_capacity(markers.len());
            for marker in markers {
                point_ids.push(store.add(marker));
            }
            self.entries.insert(
                *id,
                SelectedEntry {
                    midpoint: effective_midpoint,
                    points: point_ids,
                },
            );
        }
    }

    /// Select exactly one feature (with midpoints)
    pub fn set_single_active(
        &mut self,
        store: &mut FeatureStore,
        id: FeatureId,
        selected_paths: &[CoordRef],
    ) {
        self.rebuild(store, &[id], true, selected_paths);
    }

    /// Add one feature to a multi-selection (markers without midpoints)
    pub fn add_multi_active(
        &mut self,
        store: &mut FeatureStore,
        id: FeatureId,
        selected_paths: &[CoordRef],
    ) {
        let mut ids = self.ids();
        if !ids.contains(&id) {
            ids.push(id);
        }
        self.rebuild(store, &ids, false, selected_paths);
    }

    /// Add a feature to the multi-selection if its geometry family matches
    /// every already-selected feature; otherwise collapse the selection to
    /// just that feature.
    pub fn add_multi_selected(
        &mut self,
        store: &mut FeatureStore,
        id: FeatureId,
        selected_paths: &[CoordRef],
    ) {
        let Some(family) = store.get(id).map(|f| f.geometry.family()) else {
            return;
        };
        let compatible = store
            .selected()
            .iter()
            .all(|f| f.geometry.family() == family);

        if compatible {
            self.add_multi_active(store, id, selected_paths);
        } else {
            self.set_single_active(store, id, selected_paths);
        }
    }

    /// Remove one feature from the selection, deleting its markers. If
    /// exactly one feature remains, it is re-activated as a single
    /// selection so its midpoints come back.
    pub fn remove_feature(
        &mut self,
        store: &mut FeatureStore,
        id: FeatureId,
        selected_paths: &[CoordRef],
    ) {
        if let Some(entry) = self.entries.shift_remove(&id) {
            store.delete(&entry.points, true);
        }
        if let Some(feature) = store.get_mut(id) {
            feature.props.active = false;
        }
        store.deselect(id);

        if self.entries.len() == 1
            && let Some(remaining) = self.entries.keys().next().copied()
        {
            self.set_single_active(store, remaining, selected_paths);
        }
    }

    /// Re-tag cached vertex markers active/inactive to match the given
    /// selected paths (used when the node selection changes without a
    /// marker rebuild).
    pub fn set_active_paths(&self, store: &mut FeatureStore, selected_paths: &[CoordRef]) {
        for entry in self.entries.values() {
            for marker_id in &entry.points {
                let Some(marker) = store.get_mut(*marker_id) else {
                    continue;
                };
                if marker.props.meta != Meta::Vertex {
                    continue;
                }
                let selected = match (&marker.props.parent, &marker.props.path) {
                    (Some(parent), Some(path)) => selected_paths
                        .iter()
                        .any(|r| r.feature == *parent && r.path == *path),
                    _ => false,
                };
                marker.props.active = selected;
            }
        }
    }

    /// Recompute the toolbar affordances from the current selection
    pub fn actionable_state(&self, store: &FeatureStore) -> ActionableState {
        let selected = store.selected();

        let mut combine_features = false;
        if selected.len() > 1 {
            combine_features = true;
            let family = selected[0].geometry.family();
            for feature in &selected {
                if feature.geometry.family() != family {
                    combine_features = false;
                }
            }
        }

        ActionableState {
            combine_features,
            uncombine_features: selected.iter().any(|f| f.geometry.is_multi()),
            trash: !selected.is_empty(),
        }
    }
}
