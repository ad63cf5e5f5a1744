//! Native layer contract
//!
//! The native layer paints the dialog, runs its message loop and reports
//! what the user did. This crate only talks to it through [`NativeBackend`]
//! (to create sessions) and [`NativeDialog`] (one per dialog instance).
//!
//! All values handed over here are already validated and translated; the
//! native layer never sees a semantic id.

use std::fmt;
use std::sync::Arc;

use crate::attributes::{Attribute, NativeValue};
use crate::types::{NativeButton, RawResult};

/// Opaque handle identifying a native session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeHandle(pub u64);

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native-{}", self.0)
    }
}

/// Raw events emitted by a native session, payloads untranslated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// The window was constructed
    Loaded,
    /// A navigation to this session completed
    Navigated,
    /// A button was clicked (native id, message-only offset included)
    ButtonClicked(i32),
    /// A radio option was selected
    RadioClicked(i32),
    /// A hyperlink in the content was clicked
    LinkClicked(String),
    /// Timer tick with milliseconds elapsed since display or last reset
    Timer(u64),
    /// The verification checkbox was toggled
    VerificationClicked(bool),
    /// The expando button was toggled
    ExpandoClicked(bool),
}

impl RawEvent {
    /// Wire name of the event kind
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawEvent::Loaded => "loaded",
            RawEvent::Navigated => "navigated",
            RawEvent::ButtonClicked(_) => "click:button",
            RawEvent::RadioClicked(_) => "click:radio",
            RawEvent::LinkClicked(_) => "click:link",
            RawEvent::Timer(_) => "timer",
            RawEvent::VerificationClicked(_) => "click:verification",
            RawEvent::ExpandoClicked(_) => "click:expando",
        }
    }
}

/// Callback through which a native session delivers raw events
pub type RawEventSink = Arc<dyn Fn(RawEvent) + Send + Sync>;

/// Callback invoked once with the final raw result of a modal session
pub type CompletionCallback = Box<dyn FnOnce(RawResult) + Send>;

/// Factory for native sessions
pub trait NativeBackend: Send + Sync {
    /// Construct a native session bound to `sink`
    fn create_session(&self, sink: RawEventSink) -> Arc<dyn NativeDialog>;
}

/// One native dialog session
///
/// Implementations must not call back into the owning dialog synchronously
/// from `show` or `navigate` while expecting a result from that call; raw
/// events and the completion are delivered through the sink and callback.
pub trait NativeDialog: Send + Sync {
    /// Handle used to address this session as a navigation target
    fn handle(&self) -> NativeHandle;

    /// Per-attribute setter, keyed by attribute
    fn set_attribute(&self, attribute: Attribute, value: &NativeValue);

    /// Replace the button table
    fn set_buttons(&self, buttons: &[NativeButton]);

    /// Replace the radio button table
    fn set_radio_buttons(&self, options: &[NativeButton]);

    /// Begin the modal session; `on_complete` receives the final result of
    /// the whole navigation chain started here
    fn show(&self, on_complete: CompletionCallback);

    /// Request a transfer of control to `target`; confirmation arrives later
    /// as [`RawEvent::Navigated`] on the target's sink
    fn navigate(&self, target: &dyn NativeDialog);

    /// Restart the timer of a displayed session
    fn reset_timer(&self);
}
