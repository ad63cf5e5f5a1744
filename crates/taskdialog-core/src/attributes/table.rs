//! The attribute table
//!
//! Single source of truth for every configurable attribute: the kind of
//! value it accepts, how that value is validated and transformed, when it may
//! be pushed to the native layer, and the native setter it maps to. The table
//! is built once and never extended at runtime.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::value::{AttributeValue, Icon, NativeValue, ProgressBarState, ValueKind};
use crate::errors::{DialogError, Result};

/// Every attribute a dialog exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    WindowTitle,
    MainInstruction,
    Content,
    CollapsedControlText,
    ExpandedControlText,
    ExpandedInformation,
    VerificationText,
    Footer,
    UseLinks,
    UseCommandLinks,
    UseProgressBar,
    UseTimer,
    Cancelable,
    Minimizable,
    MainIcon,
    FooterIcon,
    ProgressBarMarquee,
    ProgressBarPosition,
    ProgressBarState,
}

impl Attribute {
    pub const ALL: [Attribute; 19] = [
        Attribute::WindowTitle,
        Attribute::MainInstruction,
        Attribute::Content,
        Attribute::CollapsedControlText,
        Attribute::ExpandedControlText,
        Attribute::ExpandedInformation,
        Attribute::VerificationText,
        Attribute::Footer,
        Attribute::UseLinks,
        Attribute::UseCommandLinks,
        Attribute::UseProgressBar,
        Attribute::UseTimer,
        Attribute::Cancelable,
        Attribute::Minimizable,
        Attribute::MainIcon,
        Attribute::FooterIcon,
        Attribute::ProgressBarMarquee,
        Attribute::ProgressBarPosition,
        Attribute::ProgressBarState,
    ];

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    pub fn spec(&self) -> &'static AttributeSpec {
        // Every variant is registered by build_attribute_table
        &ATTRIBUTE_TABLE.specs[self]
    }

    /// Icon attributes, which depend on a companion text attribute
    pub fn is_icon(&self) -> bool {
        matches!(self.spec().guard, PushGuard::AfterCompanion(_))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self> {
        ATTRIBUTE_TABLE
            .by_name
            .get(s)
            .copied()
            .ok_or_else(|| DialogError::configuration(format!("Unknown attribute: {}", s)))
    }
}

/// When a validated value may be forwarded to the native layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushGuard {
    /// Pushed immediately in every state
    Always,
    /// Accepted (and then pushed) only once the companion attribute was set
    AfterCompanion(Attribute),
    /// Pushed only while visible; otherwise kept for re-application
    WhileVisible,
}

/// Validates a caller value and produces the native value
pub type Validator = fn(&AttributeValue) -> Result<NativeValue>;

/// Table entry for one attribute
#[derive(Debug)]
pub struct AttributeSpec {
    pub attribute: Attribute,
    pub name: &'static str,
    pub kind: ValueKind,
    pub guard: PushGuard,
    /// Name of the native setter, e.g. `SetMainIcon`
    pub native_setter: &'static str,
    validator: Validator,
}

impl AttributeSpec {
    /// Check the value kind, then run the attribute's validator
    pub fn validate(&self, value: &AttributeValue) -> Result<NativeValue> {
        if value.kind() != self.kind {
            return Err(DialogError::configuration(format!(
                "{} expects a {} value, got {}",
                self.name,
                self.kind,
                value.kind()
            )));
        }
        (self.validator)(value)
    }
}

/// All attribute specs, indexed by attribute and by name
pub struct AttributeTable {
    specs: HashMap<Attribute, AttributeSpec>,
    by_name: HashMap<&'static str, Attribute>,
    order: Vec<Attribute>,
}

impl AttributeTable {
    fn new() -> Self {
        Self {
            specs: HashMap::new(),
            by_name: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn add(
        &mut self,
        attribute: Attribute,
        name: &'static str,
        native_setter: &'static str,
        kind: ValueKind,
        guard: PushGuard,
        validator: Validator,
    ) {
        self.by_name.insert(name, attribute);
        self.order.push(attribute);
        self.specs.insert(
            attribute,
            AttributeSpec {
                attribute,
                name,
                kind,
                guard,
                native_setter,
                validator,
            },
        );
    }

    /// Specs in registration order
    pub fn iter(&self) -> impl Iterator<Item = &AttributeSpec> {
        self.order.iter().filter_map(move |attribute| self.specs.get(attribute))
    }

    /// Attributes held back until the dialog is visible, in re-application order
    pub fn deferred(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.iter()
            .filter(|spec| spec.guard == PushGuard::WhileVisible)
            .map(|spec| spec.attribute)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

lazy_static! {
    /// The attribute table shared by every dialog
    pub static ref ATTRIBUTE_TABLE: AttributeTable = build_attribute_table();
}

fn build_attribute_table() -> AttributeTable {
    use Attribute::*;

    let mut table = AttributeTable::new();

    // Plain text, pushed immediately
    for (attribute, name, setter) in [
        (WindowTitle, "WindowTitle", "SetWindowTitle"),
        (MainInstruction, "MainInstruction", "SetMainInstruction"),
        (Content, "Content", "SetContent"),
        (CollapsedControlText, "CollapsedControlText", "SetCollapsedControlText"),
        (ExpandedControlText, "ExpandedControlText", "SetExpandedControlText"),
        (ExpandedInformation, "ExpandedInformation", "SetExpandedInformation"),
        (VerificationText, "VerificationText", "SetVerificationText"),
        (Footer, "Footer", "SetFooter"),
    ] {
        table.add(attribute, name, setter, ValueKind::Text, PushGuard::Always, text_value);
    }

    // Flags, pushed immediately
    for (attribute, name, setter) in [
        (UseLinks, "UseLinks", "SetUseLinks"),
        (UseCommandLinks, "UseCommandLinks", "SetUseCommandLinks"),
        (UseProgressBar, "UseProgressBar", "SetUseProgressBar"),
        (UseTimer, "UseTimer", "SetUseTimer"),
        (Cancelable, "Cancelable", "SetCancelable"),
        (Minimizable, "Minimizable", "SetMinimizable"),
    ] {
        table.add(attribute, name, setter, ValueKind::Flag, PushGuard::Always, flag_value);
    }

    // Icons; the native layer crashes on an icon without its text
    table.add(
        MainIcon,
        "MainIcon",
        "SetMainIcon",
        ValueKind::Text,
        PushGuard::AfterCompanion(MainInstruction),
        icon_value,
    );
    table.add(
        FooterIcon,
        "FooterIcon",
        "SetFooterIcon",
        ValueKind::Text,
        PushGuard::AfterCompanion(Footer),
        icon_value,
    );

    // Progress bar messages only reach a live window
    table.add(
        ProgressBarMarquee,
        "ProgressBarMarquee",
        "SetProgressBarMarquee",
        ValueKind::Flag,
        PushGuard::WhileVisible,
        flag_value,
    );
    table.add(
        ProgressBarPosition,
        "ProgressBarPosition",
        "SetProgressBarPosition",
        ValueKind::Number,
        PushGuard::WhileVisible,
        position_value,
    );
    table.add(
        ProgressBarState,
        "ProgressBarState",
        "SetProgressBarState",
        ValueKind::Text,
        PushGuard::WhileVisible,
        progress_state_value,
    );

    table
}

fn text_value(value: &AttributeValue) -> Result<NativeValue> {
    match value {
        AttributeValue::Text(text) => Ok(NativeValue::Text(text.clone())),
        other => Err(kind_mismatch(other)),
    }
}

fn flag_value(value: &AttributeValue) -> Result<NativeValue> {
    match value {
        AttributeValue::Flag(flag) => Ok(NativeValue::Flag(*flag)),
        other => Err(kind_mismatch(other)),
    }
}

fn icon_value(value: &AttributeValue) -> Result<NativeValue> {
    match value {
        AttributeValue::Text(name) => Ok(NativeValue::Int(name.parse::<Icon>()?.native_code())),
        other => Err(kind_mismatch(other)),
    }
}

fn position_value(value: &AttributeValue) -> Result<NativeValue> {
    match value {
        AttributeValue::Number(position) => i32::try_from(*position)
            .map(NativeValue::Int)
            .map_err(|_| DialogError::configuration(format!("Progress position out of range: {}", position))),
        other => Err(kind_mismatch(other)),
    }
}

fn progress_state_value(value: &AttributeValue) -> Result<NativeValue> {
    match value {
        AttributeValue::Text(name) => Ok(NativeValue::Int(name.parse::<ProgressBarState>()?.native_code())),
        other => Err(kind_mismatch(other)),
    }
}

fn kind_mismatch(value: &AttributeValue) -> DialogError {
    DialogError::configuration(format!("Unexpected {} value", value.kind()))
}
