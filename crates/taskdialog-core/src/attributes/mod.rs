//! Attribute table, values and the shadow property store
//!
//! - [`Attribute`]: every configurable attribute of a dialog
//! - [`ATTRIBUTE_TABLE`]: validator, push guard and native setter per attribute
//! - [`ShadowStore`]: per-dialog copy of every explicitly assigned attribute
//!
//! ## Push guards
//!
//! ```text
//! Always          text and flags        → native setter immediately
//! AfterCompanion  MainIcon, FooterIcon  → rejected until the text is set
//! WhileVisible    progress bar          → held, re-applied when visible
//! ```

pub mod store;
pub mod table;
pub mod value;

pub use store::ShadowStore;
pub use table::{Attribute, AttributeSpec, PushGuard, ATTRIBUTE_TABLE};
pub use value::{AttributeValue, Icon, NativeValue, ProgressBarState, ValueKind};
