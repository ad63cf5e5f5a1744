//! Headless native backend
//!
//! An in-process [`NativeBackend`] that paints nothing. Every call a dialog
//! makes is recorded, and a driver (a test, or the `taskdialog` command line
//! tool replaying a script) plays the user's part: raising raw events,
//! confirming navigations and completing the modal session.
//!
//! Completion follows the native contract: whichever session of a chain is
//! completed, the result is delivered to the callback registered by the
//! `show` that started the chain.
//!
//! The backend only tracks sessions. Each session lives as long as the dialog
//! owning it; once released, its handle disappears from the backend.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

use crate::attributes::{Attribute, NativeValue};
use crate::native::{
    CompletionCallback, NativeBackend, NativeDialog, NativeHandle, RawEvent, RawEventSink,
};
use crate::types::{NativeButton, RawResult};

/// One recorded call into a native session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeCall {
    SetAttribute {
        attribute: Attribute,
        value: NativeValue,
    },
    SetButtons(Vec<NativeButton>),
    SetRadioButtons(Vec<NativeButton>),
    Show,
    Navigate { target: NativeHandle },
    ResetTimer,
}

#[derive(Default)]
struct Registry {
    sessions: Mutex<HashMap<NativeHandle, Weak<HeadlessSession>>>,
    next_handle: AtomicU64,
}

impl Registry {
    fn get(&self, handle: NativeHandle) -> Option<Arc<HeadlessSession>> {
        self.sessions.lock().get(&handle).and_then(Weak::upgrade)
    }

    /// Forget sessions whose dialog was released
    fn prune(sessions: &mut HashMap<NativeHandle, Weak<HeadlessSession>>) {
        sessions.retain(|handle, session| {
            let alive = session.strong_count() > 0;
            if !alive {
                trace!("Released headless session {}", handle);
            }
            alive
        });
    }
}

/// Backend creating recording sessions
#[derive(Clone, Default)]
pub struct HeadlessBackend {
    registry: Arc<Registry>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self, handle: NativeHandle) -> Option<Arc<HeadlessSession>> {
        self.registry.get(handle)
    }

    /// Handles of every live session, oldest first
    pub fn sessions(&self) -> Vec<NativeHandle> {
        let mut sessions = self.registry.sessions.lock();
        Registry::prune(&mut sessions);
        let mut handles: Vec<_> = sessions.keys().copied().collect();
        handles.sort();
        handles
    }
}

impl NativeBackend for HeadlessBackend {
    fn create_session(&self, sink: RawEventSink) -> Arc<dyn NativeDialog> {
        let handle = NativeHandle(self.registry.next_handle.fetch_add(1, Ordering::Relaxed) + 1);
        let session = Arc::new(HeadlessSession {
            handle,
            sink,
            registry: Arc::downgrade(&self.registry),
            calls: Mutex::new(Vec::new()),
            completion: Mutex::new(None),
            host: Mutex::new(None),
            pending: Mutex::new(None),
        });

        {
            let mut sessions = self.registry.sessions.lock();
            Registry::prune(&mut sessions);
            sessions.insert(handle, Arc::downgrade(&session));
        }
        trace!("Created headless session {}", handle);
        session
    }
}

/// A recording native session
pub struct HeadlessSession {
    handle: NativeHandle,
    sink: RawEventSink,
    registry: Weak<Registry>,
    calls: Mutex<Vec<NativeCall>>,
    completion: Mutex<Option<CompletionCallback>>,
    /// Session whose `show` started the chain this one joined
    host: Mutex<Option<NativeHandle>>,
    /// Requested navigation target
    pending: Mutex<Option<NativeHandle>>,
}

impl std::fmt::Debug for HeadlessSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessSession")
            .field("handle", &self.handle)
            .field("calls", &self.calls.lock().len())
            .field("host", &*self.host.lock())
            .field("pending", &*self.pending.lock())
            .finish()
    }
}

impl HeadlessSession {
    pub fn calls(&self) -> Vec<NativeCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Values pushed through one attribute setter, in order
    pub fn attribute_calls(&self, attribute: Attribute) -> Vec<NativeValue> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                NativeCall::SetAttribute {
                    attribute: pushed,
                    value,
                } if *pushed == attribute => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    /// Target of a navigation requested but not yet confirmed
    pub fn pending_navigation(&self) -> Option<NativeHandle> {
        *self.pending.lock()
    }

    /// Deliver a raw event as if the user had acted on this session
    pub fn emit(&self, raw: RawEvent) {
        trace!("{} emits {:?}", self.handle, raw);
        let sink = self.sink.clone();
        sink(raw);
    }

    /// Switch the window to the requested target and report `navigated` on it
    ///
    /// Returns the target's handle, or `None` if no navigation was requested.
    pub fn confirm_navigation(&self) -> Option<NativeHandle> {
        let target_handle = self.pending.lock().take()?;
        let Some(target) = self.registry.upgrade().and_then(|r| r.get(target_handle)) else {
            warn!("Navigation target {} of {} is gone", target_handle, self.handle);
            return None;
        };

        let root = self.host.lock().unwrap_or(self.handle);
        *target.host.lock() = Some(root);
        debug!("{} navigated to {}", self.handle, target_handle);

        target.emit(RawEvent::Navigated);
        Some(target_handle)
    }

    /// End the modal session of this session's chain with `raw`
    ///
    /// Returns whether a pending completion was delivered.
    pub fn complete(&self, raw: RawResult) -> bool {
        let root_handle = self.host.lock().unwrap_or(self.handle);
        let root = if root_handle == self.handle {
            None
        } else {
            self.registry.upgrade().and_then(|r| r.get(root_handle))
        };

        let completion = match &root {
            Some(root) => root.completion.lock().take(),
            None => self.completion.lock().take(),
        };

        match completion {
            Some(callback) => {
                debug!("{} completes chain of {} with {:?}", self.handle, root_handle, raw);
                callback(raw);
                true
            }
            None => {
                warn!("{} has no modal session to complete", self.handle);
                false
            }
        }
    }

    fn record(&self, call: NativeCall) {
        self.calls.lock().push(call);
    }
}

impl NativeDialog for HeadlessSession {
    fn handle(&self) -> NativeHandle {
        self.handle
    }

    fn set_attribute(&self, attribute: Attribute, value: &NativeValue) {
        self.record(NativeCall::SetAttribute {
            attribute,
            value: value.clone(),
        });
    }

    fn set_buttons(&self, buttons: &[NativeButton]) {
        self.record(NativeCall::SetButtons(buttons.to_vec()));
    }

    fn set_radio_buttons(&self, options: &[NativeButton]) {
        self.record(NativeCall::SetRadioButtons(options.to_vec()));
    }

    fn show(&self, on_complete: CompletionCallback) {
        self.record(NativeCall::Show);
        *self.completion.lock() = Some(on_complete);
    }

    fn navigate(&self, target: &dyn NativeDialog) {
        let target = target.handle();
        self.record(NativeCall::Navigate { target });
        *self.pending.lock() = Some(target);
    }

    fn reset_timer(&self) {
        self.record(NativeCall::ResetTimer);
    }
}
