//! # TaskDialog-Core
//!
//! A stateful facade over a native task dialog.
//!
//! This crate provides:
//! - A shadow copy of every attribute, validated before it reaches the native layer
//! - Deferred application of progress attributes until the dialog is visible
//! - Translation between semantic button/radio ids and native numeric ids
//! - Event subscription with semantic payloads
//! - Page navigation from one dialog instance to another
//!
//! ## Architecture
//!
//! [`TaskDialog`] owns the state of one instance and talks to the native
//! layer only through the [`native::NativeDialog`] trait. The
//! [`headless::HeadlessBackend`] implements that trait in process, recording
//! every call, and is what the tests and the `taskdialog` tool drive.
//!
//! ```no_run
//! use taskdialog_core::{headless::HeadlessBackend, ButtonSpec, TaskDialog};
//!
//! # fn main() -> taskdialog_core::Result<()> {
//! let backend = HeadlessBackend::new();
//! let dialog = TaskDialog::new(&backend);
//! dialog.set_window_title("Installer")?;
//! dialog.set_main_instruction("Install updates now?")?;
//! dialog.set_buttons(vec![
//!     ButtonSpec::new("now", "Install now"),
//!     ButtonSpec::new("later", "Later"),
//! ]);
//! dialog.show_with(|result| println!("{:?}", result.button))?;
//! # Ok(())
//! # }
//! ```

pub mod attributes;
pub mod bridge;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod events;
pub mod headless;
pub mod native;
pub mod translate;
pub mod types;

pub use attributes::{Attribute, AttributeValue, Icon, ProgressBarState};
pub use config::DialogConfig;
pub use dialog::{TaskDialog, WeakTaskDialog};
pub use errors::{DialogError, Result};
pub use events::{DialogEvent, EventKind, SubscriptionId};
pub use types::{ButtonSpec, DialogId, DialogResult, RadioSpec, Visibility};
