//! Dialog instances
//!
//! A [`TaskDialog`] is a cheap, cloneable handle to one dialog instance. The
//! instance owns its shadow attributes, option tables, lifecycle state, event
//! dispatcher and native session. Instances never share mutable state except
//! through the one-way navigation link written when a navigation completes.
//!
//! ## Lifecycle
//!
//! ```text
//! new ──configure──▶ Unshown ──show()──▶ Visible ──close──▶ Closed
//!                       │                   │
//!                       │                navigate(target), confirmed
//!                       │                   ▼
//!                       └──(as target)──▶ Visible    source: HandedOff
//! ```
//!
//! - [`session`]: display, completion and timer control
//! - [`navigation`]: chaining one instance to the next

pub mod navigation;
pub mod session;

use parking_lot::Mutex;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use crate::attributes::{Attribute, AttributeValue, Icon, NativeValue, ProgressBarState, ShadowStore};
use crate::bridge::{translate_event, OptionTables};
use crate::config::DialogConfig;
use crate::errors::Result;
use crate::events::{DialogEvent, EventDispatcher, EventKind, SubscriptionId};
use crate::native::{NativeBackend, NativeDialog, NativeHandle, RawEvent, RawEventSink};
use crate::types::{ButtonSpec, DialogId, RadioSpec, Visibility};

/// Mutable state of one instance
#[derive(Debug)]
pub(crate) struct DialogState {
    pub(crate) store: ShadowStore,
    pub(crate) visibility: Visibility,
    pub(crate) buttons: Vec<ButtonSpec>,
    pub(crate) radio_buttons: Vec<RadioSpec>,
    /// Successor this instance handed control to; written once
    pub(crate) navigated_to: Option<Weak<DialogInner>>,
    /// Requested successor awaiting native confirmation
    pub(crate) pending_target: Option<Weak<DialogInner>>,
    /// Instance that requested navigation to this one
    pub(crate) navigation_source: Option<Weak<DialogInner>>,
}

impl DialogState {
    fn new() -> Self {
        Self {
            store: ShadowStore::new(),
            visibility: Visibility::Unshown,
            buttons: Vec::new(),
            radio_buttons: Vec::new(),
            navigated_to: None,
            pending_target: None,
            navigation_source: None,
        }
    }
}

pub(crate) struct DialogInner {
    pub(crate) id: DialogId,
    pub(crate) state: Mutex<DialogState>,
    pub(crate) native: Arc<dyn NativeDialog>,
    pub(crate) events: EventDispatcher,
}

/// Handle to a dialog instance
#[derive(Clone)]
pub struct TaskDialog {
    pub(crate) inner: Arc<DialogInner>,
}

impl fmt::Debug for TaskDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskDialog")
            .field("id", &self.inner.id)
            .field("visibility", &self.visibility())
            .field("native", &self.inner.native.handle())
            .finish()
    }
}

impl PartialEq for TaskDialog {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for TaskDialog {}

/// Non-owning handle to a dialog instance
///
/// Handlers registered on a dialog should capture this instead of a
/// [`TaskDialog`] when they refer back to the dialog that owns them.
#[derive(Debug, Clone)]
pub struct WeakTaskDialog(Weak<DialogInner>);

impl WeakTaskDialog {
    /// The dialog, unless every strong handle was dropped
    pub fn upgrade(&self) -> Option<TaskDialog> {
        self.0.upgrade().map(|inner| TaskDialog { inner })
    }
}

impl TaskDialog {
    /// Create an empty, unshown dialog with a fresh native session
    pub fn new(backend: &dyn NativeBackend) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<DialogInner>| {
            let owner = weak.clone();
            let sink: RawEventSink = Arc::new(move |raw: RawEvent| match owner.upgrade() {
                Some(inner) => TaskDialog { inner }.handle_raw_event(raw),
                None => trace!("Dropping {} for a released dialog", raw.kind_name()),
            });

            DialogInner {
                id: DialogId::new(),
                state: Mutex::new(DialogState::new()),
                native: backend.create_session(sink),
                events: EventDispatcher::new(),
            }
        });

        debug!("Created dialog {} on {}", inner.id, inner.native.handle());
        Self { inner }
    }

    /// Create a dialog and apply a configuration mapping
    ///
    /// Icons are applied after every other attribute, so a configuration
    /// holding both an icon and its text never depends on key order.
    pub fn with_config(backend: &dyn NativeBackend, config: DialogConfig) -> Result<Self> {
        let dialog = Self::new(backend);
        dialog.apply_config(config)?;
        Ok(dialog)
    }

    /// Apply every entry of a configuration mapping
    pub fn apply_config(&self, config: DialogConfig) -> Result<()> {
        let DialogConfig {
            attributes,
            buttons,
            radio_buttons,
        } = config;

        if let Some(buttons) = buttons {
            self.set_buttons(buttons);
        }
        if let Some(radio_buttons) = radio_buttons {
            self.set_radio_buttons(radio_buttons);
        }

        let (icons, others): (Vec<_>, Vec<_>) = attributes
            .into_iter()
            .partition(|(attribute, _)| attribute.is_icon());

        for (attribute, value) in others.into_iter().chain(icons) {
            self.set(attribute, value)?;
        }
        Ok(())
    }

    pub fn id(&self) -> &DialogId {
        &self.inner.id
    }

    pub fn native_handle(&self) -> NativeHandle {
        self.inner.native.handle()
    }

    pub fn visibility(&self) -> Visibility {
        self.inner.state.lock().visibility
    }

    pub fn downgrade(&self) -> WeakTaskDialog {
        WeakTaskDialog(Arc::downgrade(&self.inner))
    }

    // ========== ATTRIBUTES ==========

    /// Assign an attribute
    ///
    /// The value is validated first; on success it is stored and, if its
    /// push guard allows, forwarded to the native setter.
    pub fn set(&self, attribute: Attribute, value: impl Into<AttributeValue>) -> Result<()> {
        let value = value.into();
        let push = {
            let mut state = self.inner.state.lock();
            let visibility = state.visibility;
            state.store.set(attribute, value, visibility)?
        };

        if let Some(native) = push {
            self.push(attribute, &native);
        }
        Ok(())
    }

    /// Current value of an attribute, `None` if it was never assigned
    pub fn get(&self, attribute: Attribute) -> Option<AttributeValue> {
        self.inner.state.lock().store.get(attribute).cloned()
    }

    /// Whether the attribute was ever assigned, whatever the value
    pub fn is_set(&self, attribute: Attribute) -> bool {
        self.inner.state.lock().store.is_set(attribute)
    }

    fn push(&self, attribute: Attribute, native: &NativeValue) {
        debug!(
            "{} {}({:?})",
            self.inner.id,
            attribute.spec().native_setter,
            native
        );
        self.inner.native.set_attribute(attribute, native);
    }

    /// Forward held-back values once the instance is visible
    pub(crate) fn reapply(&self, deferred: Vec<(Attribute, NativeValue)>) {
        for (attribute, native) in deferred {
            self.push(attribute, &native);
        }
    }

    pub fn set_buttons(&self, buttons: Vec<ButtonSpec>) {
        self.inner.state.lock().buttons = buttons;
    }

    pub fn buttons(&self) -> Vec<ButtonSpec> {
        self.inner.state.lock().buttons.clone()
    }

    pub fn set_radio_buttons(&self, radio_buttons: Vec<RadioSpec>) {
        self.inner.state.lock().radio_buttons = radio_buttons;
    }

    pub fn radio_buttons(&self) -> Vec<RadioSpec> {
        self.inner.state.lock().radio_buttons.clone()
    }

    // ========== EVENTS ==========

    /// Register a handler for one kind of semantic event
    pub fn on<F>(&self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&DialogEvent) + Send + Sync + 'static,
    {
        self.inner.events.on(kind, handler)
    }

    pub fn off(&self, id: SubscriptionId) -> bool {
        self.inner.events.off(id)
    }

    /// Receive every semantic event of this instance on a channel
    pub fn subscribe(&self) -> tokio::sync::mpsc::UnboundedReceiver<DialogEvent> {
        self.inner.events.subscribe()
    }

    /// Entry point of the native sink
    fn handle_raw_event(&self, raw: RawEvent) {
        trace!("{} raw {:?}", self.inner.id, raw);

        if raw == RawEvent::Navigated {
            self.confirm_navigation();
        }

        let event = {
            let state = self.inner.state.lock();
            translate_event(
                raw,
                OptionTables {
                    buttons: &state.buttons,
                    radio_buttons: &state.radio_buttons,
                },
            )
        };
        self.inner.events.emit(&event);
    }
}

macro_rules! text_accessors {
    ($($attribute:ident => $getter:ident, $setter:ident;)*) => {
        impl TaskDialog {
            $(
                pub fn $getter(&self) -> Option<String> {
                    self.get(Attribute::$attribute)
                        .and_then(|value| value.as_text().map(str::to_string))
                }

                pub fn $setter(&self, value: impl Into<String>) -> Result<()> {
                    self.set(Attribute::$attribute, AttributeValue::Text(value.into()))
                }
            )*
        }
    };
}

macro_rules! flag_accessors {
    ($($attribute:ident => $getter:ident, $setter:ident;)*) => {
        impl TaskDialog {
            $(
                pub fn $getter(&self) -> Option<bool> {
                    self.get(Attribute::$attribute).and_then(|value| value.as_flag())
                }

                pub fn $setter(&self, value: bool) -> Result<()> {
                    self.set(Attribute::$attribute, AttributeValue::Flag(value))
                }
            )*
        }
    };
}

text_accessors! {
    WindowTitle => window_title, set_window_title;
    MainInstruction => main_instruction, set_main_instruction;
    Content => content, set_content;
    CollapsedControlText => collapsed_control_text, set_collapsed_control_text;
    ExpandedControlText => expanded_control_text, set_expanded_control_text;
    ExpandedInformation => expanded_information, set_expanded_information;
    VerificationText => verification_text, set_verification_text;
    Footer => footer, set_footer;
}

flag_accessors! {
    UseLinks => use_links, set_use_links;
    UseCommandLinks => use_command_links, set_use_command_links;
    UseProgressBar => use_progress_bar, set_use_progress_bar;
    UseTimer => use_timer, set_use_timer;
    Cancelable => cancelable, set_cancelable;
    Minimizable => minimizable, set_minimizable;
    ProgressBarMarquee => progress_bar_marquee, set_progress_bar_marquee;
}

impl TaskDialog {
    /// Requires `MainInstruction` to have been set
    pub fn set_main_icon(&self, icon: Icon) -> Result<()> {
        self.set(Attribute::MainIcon, icon)
    }

    pub fn main_icon(&self) -> Option<Icon> {
        self.icon(Attribute::MainIcon)
    }

    /// Requires `Footer` to have been set
    pub fn set_footer_icon(&self, icon: Icon) -> Result<()> {
        self.set(Attribute::FooterIcon, icon)
    }

    pub fn footer_icon(&self) -> Option<Icon> {
        self.icon(Attribute::FooterIcon)
    }

    fn icon(&self, attribute: Attribute) -> Option<Icon> {
        self.get(attribute)
            .and_then(|value| value.as_text().and_then(|name| name.parse().ok()))
    }

    pub fn set_progress_bar_position(&self, position: i32) -> Result<()> {
        self.set(Attribute::ProgressBarPosition, position)
    }

    pub fn progress_bar_position(&self) -> Option<i32> {
        self.get(Attribute::ProgressBarPosition)
            .and_then(|value| value.as_number())
            .and_then(|number| i32::try_from(number).ok())
    }

    pub fn set_progress_bar_state(&self, state: ProgressBarState) -> Result<()> {
        self.set(Attribute::ProgressBarState, state)
    }

    pub fn progress_bar_state(&self) -> Option<ProgressBarState> {
        self.get(Attribute::ProgressBarState)
            .and_then(|value| value.as_text().and_then(|name| name.parse().ok()))
    }
}
