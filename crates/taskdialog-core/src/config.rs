//! Declarative dialog configuration
//!
//! A [`DialogConfig`] is a mapping from attribute name to value, plus the
//! optional `Buttons` and `RadioButtons` tables, loadable from JSON or TOML:
//!
//! ```toml
//! WindowTitle = "Installer"
//! MainInstruction = "Continue?"
//! MainIcon = "info"
//! Buttons = [["yes", "Yes", true], ["no", "No", true]]
//! ```
//!
//! Unknown attribute names are parse errors. Order of entries never matters;
//! [`TaskDialog::with_config`](crate::TaskDialog::with_config) applies icons
//! last.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attributes::{Attribute, AttributeValue};
use crate::errors::Result;
use crate::types::{ButtonSpec, RadioSpec};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogConfig {
    #[serde(flatten)]
    pub attributes: IndexMap<Attribute, AttributeValue>,

    #[serde(rename = "Buttons", default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ButtonSpec>>,

    #[serde(rename = "RadioButtons", default, skip_serializing_if = "Option::is_none")]
    pub radio_buttons: Option<Vec<RadioSpec>>,
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(attribute, value.into());
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<ButtonSpec>) -> Self {
        self.buttons = Some(buttons);
        self
    }

    pub fn with_radio_buttons(mut self, radio_buttons: Vec<RadioSpec>) -> Self {
        self.radio_buttons = Some(radio_buttons);
        self
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.buttons.is_none() && self.radio_buttons.is_none()
    }
}
