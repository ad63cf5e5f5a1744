//! Error types for taskdialog-core
//!
//! Every failure in this crate is synchronous and final: nothing is retried,
//! and validation always runs before the native layer is touched, so a
//! rejected change never leaves a native session half updated.
//!
//! ## Error Categories
//!
//! - **Configuration**: an attribute value was rejected by its validator
//! - **State**: an operation was requested in the wrong lifecycle state
//! - **Parse**: a configuration document could not be decoded
//! - **SessionAborted**: an awaited session ended without a result

use thiserror::Error;

/// Result type alias for dialog operations
pub type Result<T> = std::result::Result<T, DialogError>;

/// Error type for dialog operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    /// An attribute value was rejected (unknown icon, icon set before its
    /// companion text, unknown progress bar state, wrong value kind)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The instance is not in a state that allows the operation
    #[error("State error: {message}")]
    State { message: String },

    /// A configuration document could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The completion channel of an awaited session was dropped
    #[error("Dialog session ended without reporting a result")]
    SessionAborted,
}

impl DialogError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Whether this error was raised by an attribute validator
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Whether this error was raised by a lifecycle check
    pub fn is_state(&self) -> bool {
        matches!(self, Self::State { .. })
    }
}

impl From<serde_json::Error> for DialogError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON: {}", err))
    }
}

impl From<toml::de::Error> for DialogError {
    fn from(err: toml::de::Error) -> Self {
        Self::parse(format!("TOML: {}", err))
    }
}
