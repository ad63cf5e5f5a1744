//! Semantic dialog events and the per-instance dispatcher
//!
//! Handlers are registered per [`EventKind`] and invoked synchronously, in
//! registration order, on the thread that delivers the native event. Channel
//! subscribers receive every event after the handlers have run.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::errors::DialogError;

/// Kinds of semantic events, named after their wire names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Loaded,
    Navigated,
    ButtonClicked,
    RadioClicked,
    LinkClicked,
    Timer,
    VerificationClicked,
    ExpandoClicked,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::Loaded,
        EventKind::Navigated,
        EventKind::ButtonClicked,
        EventKind::RadioClicked,
        EventKind::LinkClicked,
        EventKind::Timer,
        EventKind::VerificationClicked,
        EventKind::ExpandoClicked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Loaded => "loaded",
            EventKind::Navigated => "navigated",
            EventKind::ButtonClicked => "click:button",
            EventKind::RadioClicked => "click:radio",
            EventKind::LinkClicked => "click:link",
            EventKind::Timer => "timer",
            EventKind::VerificationClicked => "click:verification",
            EventKind::ExpandoClicked => "click:expando",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DialogError::parse(format!("Unknown event kind: {}", s)))
    }
}

/// A translated event as seen by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DialogEvent {
    Loaded,
    Navigated,
    /// `button` is `None` only if the native layer reported no selection
    ButtonClicked { button: Option<String> },
    RadioClicked { radio: Option<String> },
    LinkClicked { href: String },
    /// Milliseconds since display or the last timer reset
    Timer { elapsed_ms: u64 },
    VerificationClicked { checked: bool },
    ExpandoClicked { expanded: bool },
}

impl DialogEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DialogEvent::Loaded => EventKind::Loaded,
            DialogEvent::Navigated => EventKind::Navigated,
            DialogEvent::ButtonClicked { .. } => EventKind::ButtonClicked,
            DialogEvent::RadioClicked { .. } => EventKind::RadioClicked,
            DialogEvent::LinkClicked { .. } => EventKind::LinkClicked,
            DialogEvent::Timer { .. } => EventKind::Timer,
            DialogEvent::VerificationClicked { .. } => EventKind::VerificationClicked,
            DialogEvent::ExpandoClicked { .. } => EventKind::ExpandoClicked,
        }
    }
}

/// Identifies a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event handler
pub type EventHandler = Arc<dyn Fn(&DialogEvent) + Send + Sync>;

/// Per-instance event dispatcher
pub struct EventDispatcher {
    handlers: Mutex<HashMap<EventKind, Vec<(SubscriptionId, EventHandler)>>>,
    channels: Mutex<Vec<mpsc::UnboundedSender<DialogEvent>>>,
    next_id: AtomicU64,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handler_count())
            .field("channels", &self.channels.lock().len())
            .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
            channels: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a handler for one event kind
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&DialogEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .lock()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a handler; returns whether it was registered
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.lock();
        for list in handlers.values_mut() {
            if let Some(position) = list.iter().position(|(existing, _)| *existing == id) {
                list.remove(position);
                return true;
            }
        }
        false
    }

    /// Receive every event on a channel
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<DialogEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.lock().push(tx);
        rx
    }

    /// Invoke the handlers for the event's kind, then feed the channels
    ///
    /// No lock is held while handlers run, so a handler may register
    /// handlers or act on the dialog that owns this dispatcher.
    pub fn emit(&self, event: &DialogEvent) {
        let handlers: Vec<EventHandler> = self
            .handlers
            .lock()
            .get(&event.kind())
            .map(|list| list.iter().map(|(_, handler)| handler.clone()).collect())
            .unwrap_or_default();

        for handler in handlers {
            handler(event);
        }

        self.channels
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().values().map(Vec::len).sum()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
