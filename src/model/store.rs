// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! The in-memory feature store.
//!
//! The store exclusively owns every `Feature`, including the synthetic
//! vertex/midpoint markers the selection machinery creates; modes hold only
//! ids. Insertion order is preserved (`IndexMap`/`IndexSet`) so selection
//! order — which drives the combine family anchor and event payload order —
//! is deterministic.
//!
//! Deletes come in two flavors: regular deletes are logged for the host
//! render layer to pick up, silent deletes (marker cleanup, combine
//! originals) are not.

use crate::model::{Feature, FeatureId, Geometry, Meta};
use indexmap::{IndexMap, IndexSet};

/// Owning collection of features plus the selected-id set
#[derive(Debug, Default)]
pub struct FeatureStore {
    features: IndexMap<FeatureId, Feature>,
    selected: IndexSet<FeatureId>,
    deleted_log: Vec<FeatureId>,
    force_render: bool,
}

impl FeatureStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Features =====

    /// Number of stored features (markers included)
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the store holds no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Create and add a feature from a geometry, returning its id
    pub fn new_feature(&mut self, geometry: Geometry) -> FeatureId {
        self.add(Feature::new(geometry))
    }

    /// Add a feature, returning its id
    pub fn add(&mut self, feature: Feature) -> FeatureId {
        let id = feature.id;
        self.features.insert(id, feature);
        id
    }

    /// Look up a feature
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    /// Look up a feature mutably
    pub fn get_mut(&mut self, id: FeatureId) -> Option<&mut Feature> {
        self.features.get_mut(&id)
    }

    /// Whether a feature exists
    pub fn contains(&self, id: FeatureId) -> bool {
        self.features.contains_key(&id)
    }

    /// Iterate all features in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Ids of all non-marker features, in insertion order
    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features
            .values()
            .filter(|f| f.props.meta == Meta::Feature)
            .map(|f| f.id)
            .collect()
    }

    /// Delete features by id. Regular deletes are logged for the host
    /// render layer; silent deletes are not. Deleted ids are always dropped
    /// from the selection.
    pub fn delete(&mut self, ids: &[FeatureId], silent: bool) {
        for id in ids {
            if self.features.shift_remove(id).is_some() {
                self.selected.shift_remove(id);
                if !silent {
                    self.deleted_log.push(*id);
                }
            }
        }
    }

    // ===== Selection Ids =====

    /// Replace the selected-id set, keeping the given order
    pub fn set_selected(&mut self, ids: &[FeatureId]) {
        self.selected.clear();
        for id in ids {
            if self.features.contains_key(id) {
                self.selected.insert(*id);
            }
        }
    }

    /// Drop one id from the selection
    pub fn deselect(&mut self, id: FeatureId) {
        self.selected.shift_remove(&id);
    }

    /// Clear the selection entirely
    pub fn clear_selected(&mut self) {
        self.selected.clear();
    }

    /// Whether an id is selected
    pub fn is_selected(&self, id: FeatureId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected ids in selection order
    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selected.iter().copied().collect()
    }

    /// Selected features in selection order
    pub fn selected(&self) -> Vec<&Feature> {
        self.selected
            .iter()
            .filter_map(|id| self.features.get(id))
            .collect()
    }

    // ===== Render Flags =====

    /// Request a forced re-render after a structural change
    pub fn set_mode_change_rendering(&mut self) {
        self.force_render = true;
    }

    /// Take the forced-render flag
    pub fn take_force_render(&mut self) -> bool {
        std::mem::take(&mut self.force_render)
    }

    /// Take the ids deleted since the last call (regular deletes only)
    pub fn take_deleted(&mut self) -> Vec<FeatureId> {
        std::mem::take(&mut self.deleted_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coord;

    fn point(x: f64, y: f64) -> Geometry {
        Geometry::Point(Coord::new(x, y))
    }

    #[test]
    fn add_get_delete() {
        let mut store = FeatureStore::new();
        let id = store.new_feature(point(1.0, 2.0));
        assert!(store.contains(id));
        assert_eq!(store.len(), 1);

        store.delete(&[id], false);
        assert!(!store.contains(id));
        assert_eq!(store.take_deleted(), vec![id]);
    }

    #[test]
    fn silent_delete_is_not_logged() {
        let mut store = FeatureStore::new();
        let id = store.new_feature(point(0.0, 0.0));
        store.delete(&[id], true);
        assert!(store.take_deleted().is_empty());
    }

    #[test]
    fn delete_drops_selection() {
        let mut store = FeatureStore::new();
        let id = store.new_feature(point(0.0, 0.0));
        store.set_selected(&[id]);
        assert!(store.is_selected(id));

        store.delete(&[id], true);
        assert!(!store.is_selected(id));
        assert!(store.selected_ids().is_empty());
    }

    #[test]
    fn selection_order_is_preserved() {
        let mut store = FeatureStore::new();
        let a = store.new_feature(point(0.0, 0.0));
        let b = store.new_feature(point(1.0, 0.0));
        let c = store.new_feature(point(2.0, 0.0));

        store.set_selected(&[c, a, b]);
        assert_eq!(store.selected_ids(), vec![c, a, b]);
    }

    #[test]
    fn set_selected_skips_unknown_ids() {
        let mut store = FeatureStore::new();
        let a = store.new_feature(point(0.0, 0.0));
        let ghost = FeatureId::next();

        store.set_selected(&[a, ghost]);
        assert_eq!(store.selected_ids(), vec![a]);
    }

    #[test]
    fn force_render_flag_is_one_shot() {
        let mut store = FeatureStore::new();
        store.set_mode_change_rendering();
        assert!(store.take_force_render());
        assert!(!store.take_force_render());
    }
}
