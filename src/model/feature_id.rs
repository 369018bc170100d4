// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Unique identifiers for features, including the synthetic vertex and
//! midpoint markers.
//!
//! Each `FeatureId` is a monotonically increasing `u64` generated from a
//! global atomic counter. IDs are used as keys in the feature store and the
//! selection set, and for matching event targets back to store entries. They
//! are never reused within a session, so deleted features leave no dangling
//! references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A unique identifier for a feature (drawn geometry, vertex, or midpoint)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(u64);

static FEATURE_COUNTER: AtomicU64 = AtomicU64::new(1);

impl FeatureId {
    /// Create a new unique feature ID
    pub fn next() -> Self {
        Self(FEATURE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value, for event payloads and logging
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for FeatureId {
    fn default() -> Self {
        Self::next()
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
