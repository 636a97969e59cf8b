//! Test utilities: a hook-recording widget and window construction helpers.

use std::sync::{Arc, Mutex};

use crate::{
    event::{Event, EventKind},
    id::NodeId,
    style::Style,
    widget::{Context, EventOutcome, Widget},
    window::Window,
};

/// A shared, append-only log of strings, written to by [`Recorder`] widgets
/// and inspected by tests.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    /// A fresh, empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().expect("log poisoned").push(entry.into());
    }

    /// Take all entries, leaving the log empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().expect("log poisoned"))
    }

    /// A snapshot of the entries.
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("log poisoned").clone()
    }
}

/// A widget that records every hook and event it sees into an [`EventLog`],
/// with a configurable per-kind outcome.
pub struct Recorder {
    /// Tag prefixed to every log entry.
    pub tag: &'static str,
    /// Destination log.
    pub log: EventLog,
    /// Kinds answered with [`EventOutcome::Handle`].
    handles: Vec<EventKind>,
    /// Kinds answered with [`EventOutcome::Consume`].
    consumes: Vec<EventKind>,
}

impl Recorder {
    /// A recorder that ignores everything.
    pub fn new(tag: &'static str, log: &EventLog) -> Self {
        Self {
            tag,
            log: log.clone(),
            handles: Vec::new(),
            consumes: Vec::new(),
        }
    }

    /// Answer `Handle` for the given kind.
    pub fn handling(mut self, kind: EventKind) -> Self {
        self.handles.push(kind);
        self
    }

    /// Answer `Consume` for the given kind.
    pub fn consuming(mut self, kind: EventKind) -> Self {
        self.consumes.push(kind);
        self
    }
}

impl Widget for Recorder {
    fn on_event(&mut self, _ctx: &mut Context<'_>, event: &mut Event) -> EventOutcome {
        self.log.push(format!("{}.event.{:?}", self.tag, event.kind));
        if self.handles.contains(&event.kind) {
            EventOutcome::Handle
        } else if self.consumes.contains(&event.kind) {
            EventOutcome::Consume
        } else {
            EventOutcome::Ignore
        }
    }

    fn will_become_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.log.push(format!("{}.will_become", self.tag));
    }

    fn did_become_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.log.push(format!("{}.did_become", self.tag));
    }

    fn will_resign_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.log.push(format!("{}.will_resign", self.tag));
    }

    fn did_resign_active(&mut self, _win: &mut Window, _node: NodeId, _event: Option<&Event>) {
        self.log.push(format!("{}.did_resign", self.tag));
    }

    fn name(&self) -> &'static str {
        "recorder"
    }
}

/// A 200x200 window with a minimal style.
pub fn test_window() -> Window {
    Window::new(Style::with_font("test-font"), 200, 200).expect("window construction")
}

/// A window with explicit bounds.
pub fn test_window_sized(width: i32, height: i32) -> Window {
    Window::new(Style::with_font("test-font"), width, height).expect("window construction")
}
