// Copyright 2025 the Cartodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the crate's tests: recording implementations of the
//! collaborator traits and event-target helpers.

use crate::controller::{Interaction, MapAdapter};
use crate::events::{ActionableState, CursorStyle, DrawEvent, EventSink, EventTarget};
use crate::model::{FeatureId, FeatureStore, Geometry};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct LogInner {
    lines: Vec<String>,
    events: Vec<DrawEvent>,
}

/// Shared log that the recording adapter and sink write into
#[derive(Clone, Default)]
pub struct SharedLog(Rc<RefCell<LogInner>>);

impl SharedLog {
    pub fn push(&self, line: impl Into<String>) {
        self.0.borrow_mut().lines.push(line.into());
    }

    pub fn push_event(&self, event: DrawEvent) {
        self.0.borrow_mut().events.push(event);
    }

    /// Whether any logged line contains the needle
    pub fn contains(&self, needle: &str) -> bool {
        self.0.borrow().lines.iter().any(|l| l.contains(needle))
    }

    pub fn lines(&self) -> Vec<String> {
        self.0.borrow().lines.clone()
    }

    pub fn events(&self) -> Vec<DrawEvent> {
        self.0.borrow().events.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.0.borrow_mut();
        inner.lines.clear();
        inner.events.clear();
    }
}

/// Map adapter that records every call
pub struct RecordingAdapter {
    log: SharedLog,
}

impl RecordingAdapter {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }
}

impl MapAdapter for RecordingAdapter {
    fn enable(&mut self, interaction: Interaction) {
        self.log.push(format!("enable {interaction:?}"));
    }

    fn enable_silent(&mut self, interaction: Interaction) {
        self.log.push(format!("enable-silent {interaction:?}"));
    }

    fn disable(&mut self, interaction: Interaction) {
        self.log.push(format!("disable {interaction:?}"));
    }

    fn set_cursor(&mut self, cursor: Option<CursorStyle>) {
        match cursor {
            Some(CursorStyle::Move) => self.log.push("cursor move"),
            Some(CursorStyle::Pointer) => self.log.push("cursor pointer"),
            None => self.log.push("cursor default"),
        }
    }

    fn set_actionable_state(&mut self, state: ActionableState) {
        self.log.push(format!(
            "actionable combine={} uncombine={} trash={}",
            state.combine_features, state.uncombine_features, state.trash
        ));
    }
}

/// Event sink that records every fired event
pub struct RecordingSink {
    log: SharedLog,
}

impl RecordingSink {
    pub fn new(log: SharedLog) -> Self {
        Self { log }
    }
}

impl EventSink for RecordingSink {
    fn fire(&mut self, event: DrawEvent) {
        let tag = match &event {
            DrawEvent::DrawComplete { .. } => "draw_complete",
            DrawEvent::DrawCancel { .. } => "draw_cancel",
            DrawEvent::Drag { .. } => "drag",
            DrawEvent::Update { .. } => "update",
            DrawEvent::Combine { .. } => "combine",
            DrawEvent::Uncombine { .. } => "uncombine",
        };
        self.log.push(format!("event {tag}"));
        self.log.push_event(event);
    }
}

/// Install a subscriber so `RUST_LOG` controls test logging. Safe to call
/// from every test; repeat installs are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A draw context wired to recording collaborators
pub fn test_context() -> (crate::controller::DrawContext, SharedLog) {
    init_tracing();
    let log = SharedLog::default();
    let ctx = crate::controller::DrawContext::new(
        Box::new(RecordingAdapter::new(log.clone())),
        Box::new(RecordingSink::new(log.clone())),
    );
    (ctx, log)
}

/// Hit-test snapshot of a stored feature, the way the host would build one
pub fn target_for(store: &FeatureStore, id: FeatureId) -> EventTarget {
    let feature = store.get(id).expect("target feature must exist");
    let coordinate = match &feature.geometry {
        Geometry::Point(c) => Some(*c),
        _ => None,
    };
    EventTarget {
        id,
        props: feature.props.clone(),
        coordinate,
    }
}
