// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! The draw controller: owns the feature store, the collaborator seams,
//! and the one live mode.
//!
//! The host map runtime supplies a `MapAdapter` (named interaction toggles,
//! cursor, toolbar affordances) and an `EventSink` (semantic event bus) and
//! routes its raw input through the controller's entry points. The
//! controller owns "current mode" as one exclusive, swappable value —
//! never two modes live at once — and hands each event to it together with
//! the shared `DrawContext`.
//!
//! Mode changes requested from inside a handler are deferred: the handler
//! records the request on the context and the controller applies it after
//! the handler returns, stopping the old mode before setting up the new.
//!
//! Double-click zoom after a mode stop is governed by an explicit
//! suppression deadline instead of a fire-and-forget timer: `on_stop`
//! schedules a re-enable, the host's `tick` applies it once the deadline
//! passes, and a new mode setup in between cancels it.

use crate::events::{ActionableState, CursorStyle, DrawEvent, EventSink, KeyEvent, MapEvent};
use crate::model::FeatureStore;
use crate::modes::{ModeBox, ModeKind, ModeOptions};
use crate::settings;
use std::time::Instant;

// ===== Map Adapter =====

/// Named map interactions the engine toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Double-click zoom gesture
    DoubleClickZoom,
    /// Drag-to-pan gesture
    DragPan,
}

/// The host map runtime's control surface
pub trait MapAdapter {
    /// Enable a named interaction
    fn enable(&mut self, interaction: Interaction);

    /// Enable a named interaction without notifying listeners
    fn enable_silent(&mut self, interaction: Interaction) {
        self.enable(interaction);
    }

    /// Disable a named interaction
    fn disable(&mut self, interaction: Interaction);

    /// Set the pointer cursor, or restore the default with `None`
    fn set_cursor(&mut self, cursor: Option<CursorStyle>);

    /// Report toolbar affordance availability
    fn set_actionable_state(&mut self, state: ActionableState);
}

// ===== Draw Context =====

/// Shared state handed to every mode handler
pub struct DrawContext {
    /// The feature store (owns all features, markers included)
    pub store: FeatureStore,
    adapter: Box<dyn MapAdapter>,
    sink: Box<dyn EventSink>,
    mode_kind: ModeKind,
    pending_mode: Option<(ModeKind, ModeOptions)>,
    reenable_double_click_at: Option<Instant>,
}

impl DrawContext {
    pub(crate) fn new(adapter: Box<dyn MapAdapter>, sink: Box<dyn EventSink>) -> Self {
        Self {
            store: FeatureStore::new(),
            adapter,
            sink,
            mode_kind: ModeKind::Select,
            pending_mode: None,
            reenable_double_click_at: None,
        }
    }

    /// The current mode's kind
    pub fn mode(&self) -> ModeKind {
        self.mode_kind
    }

    /// Request a mode change; applied after the current handler returns
    pub fn change_mode(&mut self, kind: ModeKind, options: ModeOptions) {
        self.pending_mode = Some((kind, options));
    }

    /// Fire a semantic event at the host
    pub fn fire(&mut self, event: DrawEvent) {
        self.sink.fire(event);
    }

    /// Enable a named map interaction
    pub fn enable(&mut self, interaction: Interaction) {
        self.adapter.enable(interaction);
    }

    /// Enable a named map interaction without notifying listeners
    pub fn enable_silent(&mut self, interaction: Interaction) {
        self.adapter.enable_silent(interaction);
    }

    /// Disable a named map interaction
    pub fn disable(&mut self, interaction: Interaction) {
        self.adapter.disable(interaction);
    }

    /// Set or clear the map cursor
    pub fn set_cursor(&mut self, cursor: Option<CursorStyle>) {
        self.adapter.set_cursor(cursor);
    }

    /// Push toolbar affordances to the host UI
    pub fn set_actionable_state(&mut self, state: ActionableState) {
        self.adapter.set_actionable_state(state);
    }

    /// Disable double-click zoom now and cancel any pending re-enable
    pub fn suppress_double_click(&mut self) {
        self.reenable_double_click_at = None;
        self.adapter.disable(Interaction::DoubleClickZoom);
    }

    /// Schedule the post-stop double-click re-enable
    pub fn schedule_double_click_reenable(&mut self) {
        self.reenable_double_click_at =
            Some(Instant::now() + settings::interaction::DOUBLE_CLICK_REENABLE);
    }

    fn take_pending_mode(&mut self) -> Option<(ModeKind, ModeOptions)> {
        self.pending_mode.take()
    }

    fn apply_reenable(&mut self, now: Instant) {
        if let Some(deadline) = self.reenable_double_click_at
            && now >= deadline
        {
            self.reenable_double_click_at = None;
            self.adapter.enable(Interaction::DoubleClickZoom);
        }
    }
}

// ===== Draw Controller =====

/// Owner of the draw context and the single live mode
pub struct DrawController {
    ctx: DrawContext,
    mode: ModeBox,
}

impl DrawController {
    /// Create a controller starting in Select mode
    pub fn new(adapter: Box<dyn MapAdapter>, sink: Box<dyn EventSink>) -> Self {
        let mut ctx = DrawContext::new(adapter, sink);
        let mut mode = ModeBox::for_kind(ModeKind::Select, ModeOptions::default());
        mode.on_setup(&mut ctx);
        Self { ctx, mode }
    }

    /// The feature store
    pub fn store(&self) -> &FeatureStore {
        &self.ctx.store
    }

    /// The feature store, mutable (host-side feature management)
    pub fn store_mut(&mut self) -> &mut FeatureStore {
        &mut self.ctx.store
    }

    /// The current mode's kind
    pub fn mode(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Switch modes: stop the current one, set up the new one.
    ///
    /// A stop may schedule the double-click re-enable; if the new mode's
    /// setup suppresses double-click zoom again, that schedule is cancelled
    /// there, so a rapid stop-then-setup cannot race the suppression back
    /// off.
    pub fn change_mode(&mut self, kind: ModeKind, options: ModeOptions) {
        tracing::info!("change mode: {} -> {}", self.mode.kind().as_str(), kind.as_str());
        self.mode.on_stop(&mut self.ctx);
        self.ctx.mode_kind = kind;
        self.mode = ModeBox::for_kind(kind, options);
        self.mode.on_setup(&mut self.ctx);
        self.apply_pending_mode();
    }

    fn apply_pending_mode(&mut self) {
        while let Some((kind, options)) = self.ctx.take_pending_mode() {
            self.mode.on_stop(&mut self.ctx);
            self.ctx.mode_kind = kind;
            self.mode = ModeBox::for_kind(kind, options);
            self.mode.on_setup(&mut self.ctx);
        }
    }

    // ===== Event Entry Points =====

    /// Route a click (or tap) to the current mode
    pub fn click(&mut self, e: &MapEvent) {
        self.mode.on_click(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a tap to the current mode
    pub fn tap(&mut self, e: &MapEvent) {
        self.click(e);
    }

    /// Route a mouse-down to the current mode
    pub fn mouse_down(&mut self, e: &MapEvent) {
        self.mode.on_mouse_down(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a touch-start to the current mode
    pub fn touch_start(&mut self, e: &MapEvent) {
        self.mouse_down(e);
    }

    /// Route a mouse-up to the current mode
    pub fn mouse_up(&mut self, e: &MapEvent) {
        self.mode.on_mouse_up(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a touch-end to the current mode
    pub fn touch_end(&mut self, e: &MapEvent) {
        self.mouse_up(e);
    }

    /// Route a pointer move to the current mode
    pub fn mouse_move(&mut self, e: &MapEvent) {
        self.mode.on_mouse_move(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a pointer-out to the current mode
    pub fn mouse_out(&mut self, e: &MapEvent) {
        self.mode.on_mouse_out(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a drag step to the current mode
    pub fn drag(&mut self, e: &MapEvent) {
        self.mode.on_drag(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Route a key-up to the current mode
    pub fn key_up(&mut self, e: &KeyEvent) {
        self.mode.on_key_up(&mut self.ctx, e);
        self.apply_pending_mode();
    }

    /// Delete the current selection (toolbar trash)
    pub fn trash(&mut self) {
        self.mode.on_trash(&mut self.ctx);
        self.apply_pending_mode();
    }

    /// Combine the selected features (toolbar combine)
    pub fn combine_features(&mut self) {
        self.mode.on_combine(&mut self.ctx);
        self.apply_pending_mode();
    }

    /// Split the selected Multi features (toolbar uncombine)
    pub fn uncombine_features(&mut self) {
        self.mode.on_uncombine(&mut self.ctx);
        self.apply_pending_mode();
    }

    /// Run the display pass. The host calls this once per render; placement
    /// modes use it to notice their feature settling and complete.
    pub fn render(&mut self) {
        self.mode.on_display(&mut self.ctx);
        self.apply_pending_mode();
    }

    /// Advance the controller clock: applies a scheduled double-click
    /// re-enable once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        self.ctx.apply_reenable(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingAdapter, RecordingSink, SharedLog};
    use std::time::Duration;

    fn controller() -> (DrawController, SharedLog) {
        let log = SharedLog::default();
        (
            DrawController::new(
                Box::new(RecordingAdapter::new(log.clone())),
                Box::new(RecordingSink::new(log.clone())),
            ),
            log,
        )
    }

    #[test]
    fn starts_in_select_mode() {
        let (controller, _log) = controller();
        assert_eq!(controller.mode(), ModeKind::Select);
    }

    #[test]
    fn change_mode_swaps_exclusively() {
        let (mut controller, _log) = controller();
        controller.change_mode(ModeKind::Edit, ModeOptions::default());
        assert_eq!(controller.mode(), ModeKind::Edit);
        controller.change_mode(ModeKind::Point, ModeOptions::default());
        assert_eq!(controller.mode(), ModeKind::Point);
    }

    #[test]
    fn tick_reenables_double_click_after_deadline() {
        let (mut controller, log) = controller();
        // Entering point mode suppresses double-click zoom; leaving it
        // schedules the re-enable.
        controller.change_mode(ModeKind::Point, ModeOptions::default());
        controller.change_mode(ModeKind::Select, ModeOptions::default());
        log.clear();

        controller.tick(Instant::now());
        assert!(!log.contains("enable DoubleClickZoom"), "too early");

        controller.tick(Instant::now() + Duration::from_secs(1));
        assert!(log.contains("enable DoubleClickZoom"));

        // One-shot: a second tick past the deadline does nothing more.
        log.clear();
        controller.tick(Instant::now() + Duration::from_secs(2));
        assert!(!log.contains("enable DoubleClickZoom"));
    }

    #[test]
    fn new_setup_cancels_pending_reenable() {
        let (mut controller, log) = controller();
        controller.change_mode(ModeKind::Point, ModeOptions::default());
        // Leaving point mode schedules the re-enable; re-entering a
        // placement mode before the deadline must cancel it.
        controller.change_mode(ModeKind::Point, ModeOptions::default());
        log.clear();

        controller.tick(Instant::now() + Duration::from_secs(1));
        assert!(!log.contains("enable DoubleClickZoom"));
    }
}
