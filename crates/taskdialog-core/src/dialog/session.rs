//! Display and completion of a dialog session
//!
//! A session starts with `show()` on an unshown instance and ends when the
//! native layer reports the final result. If the instance navigated along the
//! way, the result belongs to the last instance of the chain and is decoded
//! against that instance's option tables.

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::TaskDialog;
use crate::attributes::Attribute;
use crate::errors::{DialogError, Result};
use crate::translate::{decode_button_result, decode_radio_result, encode_buttons, encode_radio_buttons};
use crate::types::{DialogResult, RawResult, Visibility};

/// Receives the final semantic result of a session
pub type ResultCallback = Box<dyn FnOnce(DialogResult) + Send>;

impl TaskDialog {
    /// Display the dialog without waiting for its result
    pub fn show(&self) -> Result<()> {
        self.begin_session(None)
    }

    /// Display the dialog; `on_result` receives the final result once the
    /// whole navigation chain completes
    pub fn show_with<F>(&self, on_result: F) -> Result<()>
    where
        F: FnOnce(DialogResult) + Send + 'static,
    {
        self.begin_session(Some(Box::new(on_result)))
    }

    /// Display the dialog and wait for the final result
    pub async fn run(&self) -> Result<DialogResult> {
        let (tx, rx) = oneshot::channel();
        self.show_with(move |result| {
            let _ = tx.send(result);
        })?;
        rx.await.map_err(|_| DialogError::SessionAborted)
    }

    fn begin_session(&self, on_result: Option<ResultCallback>) -> Result<()> {
        let (buttons, radio_buttons, deferred) = {
            let mut state = self.inner.state.lock();
            if state.visibility != Visibility::Unshown {
                return Err(DialogError::state(format!(
                    "Cannot show dialog {}: it is already {}",
                    self.inner.id, state.visibility
                )));
            }
            if state.navigation_source.is_some() {
                return Err(DialogError::state(format!(
                    "Cannot show dialog {}: it is the target of a pending navigation",
                    self.inner.id
                )));
            }
            let tables = (
                encode_buttons(&state.buttons),
                encode_radio_buttons(&state.radio_buttons),
            );
            state.visibility = Visibility::Visible;
            (tables.0, tables.1, state.store.deferred_values())
        };

        info!("Showing dialog {}", self.inner.id);

        // Always pushed, even empty, to clear native defaults
        self.inner.native.set_buttons(&buttons);
        self.inner.native.set_radio_buttons(&radio_buttons);

        // Progress setters were no-ops while unshown
        self.reapply(deferred);

        // The native session is owned by this instance
        let root = Arc::downgrade(&self.inner);
        let id = self.inner.id.clone();
        self.inner.native.show(Box::new(move |raw: RawResult| {
            let Some(inner) = root.upgrade() else {
                warn!("Discarding completion of released dialog {}", id);
                return;
            };
            match (TaskDialog { inner }).complete(raw) {
                Ok(result) => {
                    if let Some(on_result) = on_result {
                        on_result(result);
                    }
                }
                Err(e) => warn!("Discarding completion of dialog {}: {}", id, e),
            }
        }));

        Ok(())
    }

    /// Close the effective instance of the chain and decode the raw result
    pub(crate) fn complete(&self, raw: RawResult) -> Result<DialogResult> {
        let effective = self.effective();

        let (buttons, radio_buttons, pending_target) = {
            let mut state = effective.inner.state.lock();
            if state.visibility != Visibility::Visible {
                return Err(DialogError::state(format!(
                    "Dialog {} reported completion while {}",
                    effective.inner.id, state.visibility
                )));
            }
            state.visibility = Visibility::Closed;
            (
                state.buttons.clone(),
                state.radio_buttons.clone(),
                state.pending_target.take(),
            )
        };

        // A navigation that never got confirmed is abandoned
        if let Some(target) = pending_target.and_then(|weak| weak.upgrade()) {
            debug!("Abandoning pending navigation to {}", target.id);
            target.state.lock().navigation_source = None;
        }

        let result = DialogResult {
            button: decode_button_result(raw.button, &buttons),
            radio: raw
                .radio
                .and_then(|radio| decode_radio_result(radio, &radio_buttons)),
            verification: raw.verification,
        };

        info!(
            "Dialog {} closed through {} with {:?}",
            self.inner.id, effective.inner.id, result
        );
        Ok(result)
    }

    /// Last instance of the navigation chain starting here
    ///
    /// Stops early, with a warning, if a successor was already released.
    pub fn effective(&self) -> TaskDialog {
        let mut current = self.clone();
        loop {
            let next = current.inner.state.lock().navigated_to.clone();
            match next {
                None => return current,
                Some(weak) => match weak.upgrade() {
                    Some(inner) => current = TaskDialog { inner },
                    None => {
                        warn!("Navigation successor of {} was released", current.inner.id);
                        return current;
                    }
                },
            }
        }
    }

    /// Successor this instance handed control to, if any
    pub fn navigated_to(&self) -> Option<TaskDialog> {
        self.inner
            .state
            .lock()
            .navigated_to
            .as_ref()
            .and_then(|weak| weak.upgrade())
            .map(|inner| TaskDialog { inner })
    }

    /// Restart the native timer
    ///
    /// Only forwarded while visible with `UseTimer` enabled; otherwise a no-op.
    pub fn reset_timer(&self) {
        let active = {
            let state = self.inner.state.lock();
            state.visibility == Visibility::Visible
                && state
                    .store
                    .get(Attribute::UseTimer)
                    .and_then(|value| value.as_flag())
                    .unwrap_or(false)
        };

        if active {
            self.inner.native.reset_timer();
        } else {
            debug!("Ignoring timer reset on dialog {}", self.inner.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::NativeValue;
    use crate::headless::{HeadlessBackend, NativeCall};
    use crate::types::ButtonSpec;
    use parking_lot::Mutex;

    #[test]
    fn test_show_pushes_tables_and_transitions() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        dialog.set_buttons(vec![ButtonSpec::new("go", "Go")]);
        dialog.show().unwrap();

        assert_eq!(dialog.visibility(), Visibility::Visible);
        let calls = backend.session(dialog.native_handle()).unwrap().calls();
        assert!(matches!(&calls[0], NativeCall::SetButtons(table) if table[0].id == 101));
        assert!(matches!(&calls[1], NativeCall::SetRadioButtons(table) if table.is_empty()));
        assert_eq!(calls[2], NativeCall::Show);
    }

    #[test]
    fn test_show_twice_fails() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        dialog.show().unwrap();
        dialog.set_content("changed").unwrap();
        assert!(dialog.show().unwrap_err().is_state());
    }

    #[test]
    fn test_completion_decodes_result() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        dialog.set_buttons(vec![ButtonSpec::new("retry", "Retry"), ButtonSpec::new("skip", "Skip")]);

        let result = Arc::new(Mutex::new(None));
        let slot = result.clone();
        dialog.show_with(move |r| *slot.lock() = Some(r)).unwrap();

        backend
            .session(dialog.native_handle())
            .unwrap()
            .complete(RawResult::button(102).with_verification(true));

        assert_eq!(
            result.lock().clone(),
            Some(DialogResult {
                button: Some("skip".into()),
                radio: None,
                verification: true,
            })
        );
        assert_eq!(dialog.visibility(), Visibility::Closed);
    }

    #[test]
    fn test_dismissed_dialog_reports_no_button() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        let result = Arc::new(Mutex::new(None));
        let slot = result.clone();
        dialog.show_with(move |r| *slot.lock() = Some(r)).unwrap();
        backend.session(dialog.native_handle()).unwrap().complete(RawResult::default());
        assert_eq!(result.lock().as_ref().map(|r| r.button.clone()), Some(None));
    }

    #[test]
    fn test_reset_timer_only_when_enabled_and_visible() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        let session = backend.session(dialog.native_handle()).unwrap();

        dialog.set_use_timer(true).unwrap();
        dialog.reset_timer();
        assert!(!session.calls().contains(&NativeCall::ResetTimer));

        dialog.show().unwrap();
        dialog.reset_timer();
        assert!(session.calls().contains(&NativeCall::ResetTimer));
    }

    #[test]
    fn test_reset_timer_ignored_without_timer() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        dialog.set_use_timer(false).unwrap();
        dialog.show().unwrap();
        dialog.reset_timer();
        let session = backend.session(dialog.native_handle()).unwrap();
        assert!(!session.calls().contains(&NativeCall::ResetTimer));
    }

    #[test]
    fn test_progress_reapplied_once_on_show() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        let session = backend.session(dialog.native_handle()).unwrap();

        dialog.set_progress_bar_position(40).unwrap();
        assert!(session.attribute_calls(Attribute::ProgressBarPosition).is_empty());

        dialog.show().unwrap();
        assert_eq!(
            session.attribute_calls(Attribute::ProgressBarPosition),
            vec![NativeValue::Int(40)]
        );
    }

    #[test]
    fn test_visible_dialog_released_with_last_handle() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        let handle = dialog.native_handle();
        dialog.show_with(|_| {}).unwrap();

        let weak = dialog.downgrade();
        drop(dialog);

        assert!(weak.upgrade().is_none());
        assert!(backend.session(handle).is_none());
    }

    #[tokio::test]
    async fn test_run_awaits_result() {
        let backend = HeadlessBackend::new();
        let dialog = TaskDialog::new(&backend);
        let session = backend.session(dialog.native_handle()).unwrap();

        let waiter = {
            let dialog = dialog.clone();
            tokio::spawn(async move { dialog.run().await })
        };
        while dialog.visibility() != Visibility::Visible {
            tokio::task::yield_now().await;
        }
        session.complete(RawResult::button(1));

        let result = waiter.await.unwrap().unwrap();
        assert_eq!(result.button.as_deref(), Some("ok"));
    }
}
