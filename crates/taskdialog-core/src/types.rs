//! Core types for taskdialog-core
//!
//! Identifiers, lifecycle states, option tables and the raw/semantic result
//! shapes shared by the translator, the state machine and the backends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a dialog instance
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new() -> Self {
        Self(format!("dialog-{}", uuid::Uuid::new_v4()))
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a dialog instance
///
/// ```text
/// Unshown → Visible → Closed
///              ↓
///          HandedOff   (navigated to a successor page)
/// ```
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Visibility {
    /// Created and possibly configured, never displayed
    Unshown,
    /// Currently displayed by the native layer
    Visible,
    /// Control was transferred to a navigation successor
    HandedOff,
    /// The session this instance terminated
    Closed,
}

impl Visibility {
    /// Whether the instance can no longer be displayed or receive
    /// visible-only attributes
    pub fn is_finished(&self) -> bool {
        matches!(self, Visibility::HandedOff | Visibility::Closed)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Visibility::Unshown => "unshown",
            Visibility::Visible => "visible",
            Visibility::HandedOff => "handed-off",
            Visibility::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// A caller-defined button
///
/// Position in the owning table is significant: it determines the native id.
/// Deserializes from `["id", "Label"]`, `["id", "Label", true]` or
/// `{ id, label, message_only }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ButtonRepr")]
pub struct ButtonSpec {
    /// Semantic id reported back to the caller
    pub id: String,
    /// Text shown on the button
    pub label: String,
    /// Message-only buttons report a click without closing the dialog
    pub message_only: bool,
}

impl ButtonSpec {
    /// Create a closing button
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            message_only: false,
        }
    }

    /// Create a button that reports clicks without closing the dialog
    pub fn message_only(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            message_only: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ButtonRepr {
    Pair(String, String),
    Triple(String, String, bool),
    Table {
        id: String,
        label: String,
        #[serde(default)]
        message_only: bool,
    },
}

impl From<ButtonRepr> for ButtonSpec {
    fn from(repr: ButtonRepr) -> Self {
        match repr {
            ButtonRepr::Pair(id, label) => ButtonSpec::new(id, label),
            ButtonRepr::Triple(id, label, message_only) => ButtonSpec {
                id,
                label,
                message_only,
            },
            ButtonRepr::Table {
                id,
                label,
                message_only,
            } => ButtonSpec {
                id,
                label,
                message_only,
            },
        }
    }
}

/// A caller-defined radio option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RadioRepr")]
pub struct RadioSpec {
    pub id: String,
    pub label: String,
}

impl RadioSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RadioRepr {
    Pair(String, String),
    Table { id: String, label: String },
}

impl From<RadioRepr> for RadioSpec {
    fn from(repr: RadioRepr) -> Self {
        match repr {
            RadioRepr::Pair(id, label) | RadioRepr::Table { id, label } => RadioSpec { id, label },
        }
    }
}

/// One entry of a native button or radio table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeButton {
    /// Native numeric id, offset included for message-only buttons
    pub id: i32,
    pub label: String,
    pub message_only: bool,
}

/// Final result as reported by the native layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawResult {
    /// Native id of the button that closed the dialog, `0` when none
    pub button: i32,
    /// Native id of the selected radio option, if any
    pub radio: Option<i32>,
    /// Whether the verification checkbox was checked
    #[serde(default)]
    pub verification: bool,
}

impl RawResult {
    pub fn button(button: i32) -> Self {
        Self {
            button,
            ..Default::default()
        }
    }

    pub fn with_radio(mut self, radio: i32) -> Self {
        self.radio = Some(radio);
        self
    }

    pub fn with_verification(mut self, checked: bool) -> Self {
        self.verification = checked;
        self
    }
}

/// Final result of a dialog session, expressed in semantic ids
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogResult {
    /// Semantic id of the closing button; `None` when the session ended
    /// without one (e.g. the window was dismissed)
    pub button: Option<String>,
    /// Semantic id of the selected radio option
    pub radio: Option<String>,
    /// Whether the verification checkbox was checked
    pub verification: bool,
}
