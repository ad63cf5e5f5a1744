//! Attribute values
//!
//! [`AttributeValue`] is what the caller assigns and reads back;
//! [`NativeValue`] is what reaches the native setter after validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DialogError;

/// Kind of value an attribute accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Flag,
    Number,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => f.write_str("text"),
            ValueKind::Flag => f.write_str("flag"),
            ValueKind::Number => f.write_str("number"),
        }
    }
}

/// A caller-facing attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Flag(bool),
    Number(i64),
    Text(String),
}

impl AttributeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            AttributeValue::Flag(_) => ValueKind::Flag,
            AttributeValue::Number(_) => ValueKind::Number,
            AttributeValue::Text(_) => ValueKind::Text,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttributeValue::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            AttributeValue::Number(number) => Some(*number),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Flag(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Number(value as i64)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<Icon> for AttributeValue {
    fn from(icon: Icon) -> Self {
        AttributeValue::Text(icon.name().to_string())
    }
}

impl From<ProgressBarState> for AttributeValue {
    fn from(state: ProgressBarState) -> Self {
        AttributeValue::Text(state.name().to_string())
    }
}

/// A validated value as handed to the native layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum NativeValue {
    Text(String),
    Flag(bool),
    Int(i32),
}

/// Standard dialog icons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    None,
    Warning,
    Error,
    Info,
    Shield,
}

impl Icon {
    pub const ALL: [Icon; 5] = [Icon::None, Icon::Warning, Icon::Error, Icon::Info, Icon::Shield];

    /// Numeric icon code understood by the native layer
    pub fn native_code(&self) -> i32 {
        match self {
            Icon::None => 0,
            Icon::Warning => -1,
            Icon::Error => -2,
            Icon::Info => -3,
            Icon::Shield => -4,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Icon::None => "none",
            Icon::Warning => "warning",
            Icon::Error => "error",
            Icon::Info => "info",
            Icon::Shield => "shield",
        }
    }
}

impl FromStr for Icon {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Icon::ALL
            .iter()
            .copied()
            .find(|icon| icon.name() == s)
            .ok_or_else(|| DialogError::configuration(format!("Unknown icon: {}", s)))
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Progress bar states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBarState {
    Normal,
    Error,
    Paused,
}

impl ProgressBarState {
    pub const ALL: [ProgressBarState; 3] = [
        ProgressBarState::Normal,
        ProgressBarState::Error,
        ProgressBarState::Paused,
    ];

    pub fn native_code(&self) -> i32 {
        match self {
            ProgressBarState::Normal => 1,
            ProgressBarState::Error => 2,
            ProgressBarState::Paused => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProgressBarState::Normal => "normal",
            ProgressBarState::Error => "error",
            ProgressBarState::Paused => "paused",
        }
    }
}

impl FromStr for ProgressBarState {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProgressBarState::ALL
            .iter()
            .copied()
            .find(|state| state.name() == s)
            .ok_or_else(|| DialogError::configuration(format!("Unknown state: {}", s)))
    }
}

impl fmt::Display for ProgressBarState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
