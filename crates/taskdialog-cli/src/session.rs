//! Scripted dialog sessions
//!
//! A session file describes a set of pages (one dialog each), the page
//! shown first, which button clicks navigate to which page, and a script of
//! raw native steps to replay against the headless backend:
//!
//! ```toml
//! start = "confirm"
//!
//! [pages.confirm]
//! MainInstruction = "Install updates?"
//! Buttons = [["yes", "Yes", true], ["no", "No"]]
//! navigate_on = { yes = "done" }
//!
//! [pages.done]
//! MainInstruction = "Updates installed"
//! Buttons = [["ok", "OK"]]
//!
//! [[script]]
//! action = "button"
//! page = "confirm"
//! id = "yes"
//!
//! [[script]]
//! action = "confirm-navigation"
//! page = "confirm"
//!
//! [[script]]
//! action = "close"
//! page = "done"
//! button = "ok"
//! ```

use anyhow::{anyhow, bail, Context, Result};
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use taskdialog_core::{
    headless::{HeadlessBackend, HeadlessSession},
    native::RawEvent,
    translate::{encode_button_id, encode_radio_id},
    types::RawResult,
    DialogConfig, DialogEvent, DialogResult, EventKind, TaskDialog,
};

/// One page of a session: a dialog plus its navigation rules
#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    /// Semantic button id to the page it navigates to
    #[serde(default)]
    pub navigate_on: IndexMap<String, String>,

    #[serde(flatten)]
    pub dialog: DialogConfig,
}

/// A raw native step, addressed to a page
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    Button { page: String, id: String },
    Radio { page: String, id: String },
    Link { page: String, href: String },
    Timer { page: String, elapsed_ms: u64 },
    Verification { page: String, checked: bool },
    Expando { page: String, expanded: bool },
    ConfirmNavigation { page: String },
    Close {
        page: String,
        #[serde(default)]
        button: Option<String>,
        #[serde(default)]
        radio: Option<String>,
        #[serde(default)]
        verification: bool,
    },
}

impl Step {
    fn page(&self) -> &str {
        match self {
            Step::Button { page, .. }
            | Step::Radio { page, .. }
            | Step::Link { page, .. }
            | Step::Timer { page, .. }
            | Step::Verification { page, .. }
            | Step::Expando { page, .. }
            | Step::ConfirmNavigation { page }
            | Step::Close { page, .. } => page,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionFile {
    pub start: String,
    pub pages: IndexMap<String, PageSpec>,
    #[serde(default)]
    pub script: Vec<Step>,
}

impl SessionFile {
    /// Load a session file, JSON if the extension says so, TOML otherwise
    pub async fn load(path: &Path) -> Result<Self> {
        let input = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let parsed = if is_json(path) {
            Self::from_json_str(&input)
        } else {
            Self::from_toml_str(&input)
        };
        parsed.with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }
}

pub fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// A semantic event as printed in the transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEvent {
    pub page: String,
    #[serde(flatten)]
    pub event: DialogEvent,
}

/// Event log shared by the page handlers
#[derive(Clone, Default)]
struct SharedLog(Arc<Mutex<Vec<TranscriptEvent>>>);

impl SharedLog {
    fn push(&self, page: &str, event: &DialogEvent) {
        self.0.lock().push(TranscriptEvent {
            page: page.to_string(),
            event: event.clone(),
        });
    }

    fn take(&self) -> Vec<TranscriptEvent> {
        std::mem::take(&mut *self.0.lock())
    }
}

/// Everything a replayed session produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub events: Vec<TranscriptEvent>,
    pub result: DialogResult,
}

/// Replays a session file against the headless backend
pub struct SessionDriver {
    backend: HeadlessBackend,
    pages: IndexMap<String, TaskDialog>,
    start: String,
    script: Vec<Step>,
    log: SharedLog,
}

impl SessionDriver {
    /// Construct every page and wire its navigation rules
    pub fn new(file: SessionFile) -> Result<Self> {
        let backend = HeadlessBackend::new();
        let log = SharedLog::default();

        if !file.pages.contains_key(&file.start) {
            bail!("Start page '{}' is not defined", file.start);
        }

        let mut pages = IndexMap::new();
        let mut rules = Vec::new();
        for (name, spec) in file.pages {
            let dialog = TaskDialog::with_config(&backend, spec.dialog)
                .with_context(|| format!("Invalid configuration for page '{}'", name))?;
            debug!("Page '{}' is dialog {}", name, dialog.id());

            for kind in EventKind::ALL {
                let log = log.clone();
                let page = name.clone();
                dialog.on(kind, move |event| log.push(&page, event));
            }
            rules.push((name.clone(), spec.navigate_on));
            pages.insert(name, dialog);
        }

        for (name, navigate_on) in rules {
            for (button, target) in navigate_on {
                let owner = &pages[&name];
                let destination = pages
                    .get(&target)
                    .map(TaskDialog::downgrade)
                    .ok_or_else(|| anyhow!("Page '{}' navigates to unknown page '{}'", name, target))?;

                // Pages may navigate to each other; handlers hold them weakly
                let source = owner.downgrade();
                owner.on(EventKind::ButtonClicked, move |event| {
                    let DialogEvent::ButtonClicked { button: Some(id) } = event else {
                        return;
                    };
                    if *id != button {
                        return;
                    }
                    let (Some(source), Some(destination)) = (source.upgrade(), destination.upgrade())
                    else {
                        warn!("Navigation on '{}' refers to a released page", id);
                        return;
                    };
                    if let Err(e) = source.navigate(&destination) {
                        warn!("Navigation on '{}' failed: {}", id, e);
                    }
                });
            }
        }

        Ok(Self {
            backend,
            pages,
            start: file.start,
            script: file.script,
            log,
        })
    }

    /// Show the start page, replay the script and collect the transcript
    pub fn run(self) -> Result<Transcript> {
        let start = self.dialog(&self.start)?;
        let (tx, mut rx) = oneshot::channel();
        start.show_with(move |result| {
            let _ = tx.send(result);
        })?;
        info!("Session started on page '{}'", self.start);

        for (index, step) in self.script.iter().enumerate() {
            self.replay(step)
                .with_context(|| format!("Script step {} ({:?}) failed", index + 1, step))?;
        }

        let result = rx
            .try_recv()
            .map_err(|_| anyhow!("Script ended before the dialog was closed"))?;

        Ok(Transcript {
            events: self.log.take(),
            result,
        })
    }

    fn replay(&self, step: &Step) -> Result<()> {
        let dialog = self.dialog(step.page())?;
        let session = self.session(dialog)?;

        match step {
            Step::Button { id, .. } => {
                session.emit(RawEvent::ButtonClicked(button_id(dialog, id)?));
            }
            Step::Radio { id, .. } => {
                session.emit(RawEvent::RadioClicked(radio_id(dialog, id)?));
            }
            Step::Link { href, .. } => session.emit(RawEvent::LinkClicked(href.clone())),
            Step::Timer { elapsed_ms, .. } => session.emit(RawEvent::Timer(*elapsed_ms)),
            Step::Verification { checked, .. } => {
                session.emit(RawEvent::VerificationClicked(*checked));
            }
            Step::Expando { expanded, .. } => session.emit(RawEvent::ExpandoClicked(*expanded)),
            Step::ConfirmNavigation { page } => {
                if session.confirm_navigation().is_none() {
                    bail!("Page '{}' has no navigation to confirm", page);
                }
            }
            Step::Close {
                page,
                button,
                radio,
                verification,
            } => {
                let mut raw = RawResult::button(match button {
                    Some(id) => button_id(dialog, id)?,
                    None => 0,
                });
                if let Some(id) = radio {
                    raw = raw.with_radio(radio_id(dialog, id)?);
                }
                raw = raw.with_verification(*verification);

                if !session.complete(raw) {
                    bail!("Page '{}' is not part of a running session", page);
                }
            }
        }
        Ok(())
    }

    fn dialog(&self, page: &str) -> Result<&TaskDialog> {
        self.pages
            .get(page)
            .ok_or_else(|| anyhow!("Unknown page '{}'", page))
    }

    fn session(&self, dialog: &TaskDialog) -> Result<Arc<HeadlessSession>> {
        self.backend
            .session(dialog.native_handle())
            .ok_or_else(|| anyhow!("No native session for dialog {}", dialog.id()))
    }
}

/// Semantic id, standard name or literal native id
fn button_id(dialog: &TaskDialog, id: &str) -> Result<i32> {
    encode_button_id(id, &dialog.buttons())
        .or_else(|| id.parse().ok())
        .ok_or_else(|| anyhow!("Unknown button '{}'", id))
}

fn radio_id(dialog: &TaskDialog, id: &str) -> Result<i32> {
    encode_radio_id(id, &dialog.radio_buttons())
        .or_else(|| id.parse().ok())
        .ok_or_else(|| anyhow!("Unknown radio option '{}'", id))
}
