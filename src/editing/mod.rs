// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod combine;
pub mod drag;
pub mod selection;
pub mod selectors;
pub mod supplementary;

pub use drag::DragSession;
pub use selection::SelectionSet;
pub use supplementary::{SupplementaryOptions, create_supplementary_points};
