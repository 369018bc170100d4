// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Event-classification predicates.
//!
//! Pure functions over a `MapEvent`/`KeyEvent`, used by mode handlers to
//! route input. Every target predicate returns `false` when the event has
//! no target — handlers can call them on any event without checking first.

use crate::events::{KeyEvent, MapEvent, MouseButton};
use crate::model::Meta;

const KEY_ENTER: u32 = 13;
const KEY_ESCAPE: u32 = 27;
const KEY_DELETE: u32 = 46;

fn target_meta(e: &MapEvent) -> Option<Meta> {
    e.target.as_ref().map(|t| t.props.meta)
}

/// The event has no feature target
pub fn no_target(e: &MapEvent) -> bool {
    e.target.is_none()
}

/// The target is a drawn feature
pub fn is_feature(e: &MapEvent) -> bool {
    target_meta(e) == Some(Meta::Feature)
}

/// The target is a vertex marker
pub fn is_vertex(e: &MapEvent) -> bool {
    target_meta(e) == Some(Meta::Vertex)
}

/// The target is a midpoint marker
pub fn is_mid_point(e: &MapEvent) -> bool {
    target_meta(e) == Some(Meta::Midpoint)
}

/// The target is a drawn feature tagged active
pub fn is_active_feature(e: &MapEvent) -> bool {
    match &e.target {
        Some(t) => t.props.active && t.props.meta == Meta::Feature,
        None => false,
    }
}

/// The target is a drawn feature tagged inactive
pub fn is_inactive_feature(e: &MapEvent) -> bool {
    match &e.target {
        Some(t) => !t.props.active && t.props.meta == Meta::Feature,
        None => false,
    }
}

/// Shift is held and the primary button pressed
pub fn is_shift_mousedown(e: &MapEvent) -> bool {
    match e.pointer {
        Some(p) => p.shift && p.button == MouseButton::Left,
        None => false,
    }
}

/// Shift is held
pub fn is_shift_down(e: &MapEvent) -> bool {
    e.pointer.is_some_and(|p| p.shift)
}

/// Escape key
pub fn is_escape_key(e: &KeyEvent) -> bool {
    e.key_code == KEY_ESCAPE
}

/// Enter key
pub fn is_enter_key(e: &KeyEvent) -> bool {
    e.key_code == KEY_ENTER
}

/// Delete key
pub fn is_delete_key(e: &KeyEvent) -> bool {
    e.key_code == KEY_DELETE
}

/// Catch-all guard
pub fn is_true(_e: &MapEvent) -> bool {
    true
}
