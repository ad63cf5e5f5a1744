use std::collections::HashMap;
use tracing::debug;

use super::table::{Attribute, PushGuard, ATTRIBUTE_TABLE};
use super::value::{AttributeValue, NativeValue};
use crate::errors::{DialogError, Result};
use crate::types::Visibility;

/// A stored attribute: the caller's value and its native form
#[derive(Debug, Clone, PartialEq)]
struct StoredAttribute {
    value: AttributeValue,
    native: NativeValue,
}

/// Shadow copy of every attribute explicitly assigned on one dialog
///
/// Absence is meaningful: an attribute that was never assigned is distinct
/// from one assigned an empty or false value. Every accepted assignment tells
/// the caller whether the native setter must be invoked now.
#[derive(Debug, Default, Clone)]
pub struct ShadowStore {
    entries: HashMap<Attribute, StoredAttribute>,
}

impl ShadowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a value
    ///
    /// Returns the native value when the push guard allows forwarding it
    /// immediately, `None` when it must wait for the dialog to become
    /// visible. On error nothing is stored.
    pub fn set(
        &mut self,
        attribute: Attribute,
        value: AttributeValue,
        visibility: Visibility,
    ) -> Result<Option<NativeValue>> {
        let spec = attribute.spec();

        match spec.guard {
            PushGuard::AfterCompanion(companion) if !self.is_set(companion) => {
                return Err(DialogError::configuration(format!(
                    "Before setting {}, ensure that {} has a value",
                    attribute, companion
                )));
            }
            PushGuard::WhileVisible if visibility.is_finished() => {
                return Err(DialogError::state(format!(
                    "Cannot set {} on a {} dialog",
                    attribute, visibility
                )));
            }
            _ => {}
        }

        let native = spec.validate(&value)?;

        let push = match spec.guard {
            PushGuard::WhileVisible => visibility == Visibility::Visible,
            _ => true,
        };

        self.entries.insert(
            attribute,
            StoredAttribute {
                value,
                native: native.clone(),
            },
        );

        if push {
            Ok(Some(native))
        } else {
            debug!("Holding {} until the dialog is visible", attribute);
            Ok(None)
        }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&AttributeValue> {
        self.entries.get(&attribute).map(|entry| &entry.value)
    }

    /// Native form of a stored value
    pub fn native(&self, attribute: Attribute) -> Option<&NativeValue> {
        self.entries.get(&attribute).map(|entry| &entry.native)
    }

    /// Whether `set` ever succeeded for `attribute`, whatever the value
    pub fn is_set(&self, attribute: Attribute) -> bool {
        self.entries.contains_key(&attribute)
    }

    /// Visible-only attributes that were assigned, in re-application order
    pub fn deferred_values(&self) -> Vec<(Attribute, NativeValue)> {
        ATTRIBUTE_TABLE
            .deferred()
            .filter_map(|attribute| {
                self.native(attribute)
                    .map(|native| (attribute, native.clone()))
            })
            .collect()
    }

    /// Attributes currently set, in table order
    pub fn attributes(&self) -> Vec<Attribute> {
        ATTRIBUTE_TABLE
            .iter()
            .map(|spec| spec.attribute)
            .filter(|attribute| self.is_set(*attribute))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
