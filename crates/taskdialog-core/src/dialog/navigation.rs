//! Navigation between dialog instances
//!
//! A visible instance hands its window over to an unshown one in two steps.
//! `navigate` records the request and asks the native layer to switch; the
//! target's native session later reports `navigated`, at which point the
//! source becomes handed off, the target becomes visible and the source
//! remembers its successor. Results of the whole chain are then resolved
//! through the last instance.

use std::sync::Arc;
use parking_lot::MutexGuard;
use tracing::{debug, info, warn};

use super::{DialogInner, DialogState, TaskDialog};
use crate::errors::{DialogError, Result};
use crate::translate::{encode_buttons, encode_radio_buttons};
use crate::types::Visibility;

impl TaskDialog {
    /// Ask the native layer to replace this dialog's window with `target`
    ///
    /// The source must be visible with no navigation in flight; the target
    /// must be unshown and not already claimed by another source. On error
    /// neither instance changes.
    pub fn navigate(&self, target: &TaskDialog) -> Result<()> {
        if Arc::ptr_eq(&self.inner, &target.inner) {
            return Err(DialogError::state(format!(
                "Dialog {} cannot navigate to itself",
                self.inner.id
            )));
        }

        let (buttons, radio_buttons) = {
            let (mut source, mut dest) = lock_pair(&self.inner, &target.inner);

            if source.visibility != Visibility::Visible {
                return Err(DialogError::state(format!(
                    "Cannot navigate from dialog {}: it is {}",
                    self.inner.id, source.visibility
                )));
            }
            if source.pending_target.is_some() {
                return Err(DialogError::state(format!(
                    "Dialog {} already has a navigation in flight",
                    self.inner.id
                )));
            }
            if dest.visibility != Visibility::Unshown {
                return Err(DialogError::state(format!(
                    "Cannot navigate to dialog {}: it is already {}",
                    target.inner.id, dest.visibility
                )));
            }
            if dest.navigation_source.is_some() {
                return Err(DialogError::state(format!(
                    "Dialog {} is already the target of another navigation",
                    target.inner.id
                )));
            }

            source.pending_target = Some(Arc::downgrade(&target.inner));
            dest.navigation_source = Some(Arc::downgrade(&self.inner));
            (
                encode_buttons(&dest.buttons),
                encode_radio_buttons(&dest.radio_buttons),
            )
        };

        info!("Dialog {} navigating to {}", self.inner.id, target.inner.id);

        target.inner.native.set_buttons(&buttons);
        target.inner.native.set_radio_buttons(&radio_buttons);
        self.inner.native.navigate(target.inner.native.as_ref());
        Ok(())
    }

    /// Whether a navigation requested by this instance awaits confirmation
    pub fn has_pending_navigation(&self) -> bool {
        self.inner.state.lock().pending_target.is_some()
    }

    /// Apply a native `navigated` confirmation received by this instance
    pub(crate) fn confirm_navigation(&self) {
        let source = self.inner.state.lock().navigation_source.take();
        let Some(source) = source.and_then(|weak| weak.upgrade()) else {
            warn!("Dialog {} confirmed a navigation nobody requested", self.inner.id);
            return;
        };

        let deferred = {
            let (mut from, mut to) = lock_pair(&source, &self.inner);

            let requested = from
                .pending_target
                .as_ref()
                .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), Arc::as_ptr(&self.inner)));
            if from.visibility != Visibility::Visible || !requested {
                warn!(
                    "Ignoring navigation confirmation from {} ({}) to {}",
                    source.id, from.visibility, self.inner.id
                );
                if requested {
                    from.pending_target = None;
                }
                return;
            }
            if to.visibility != Visibility::Unshown {
                warn!(
                    "Navigation target {} confirmed while {}",
                    self.inner.id, to.visibility
                );
                // The source keeps its window and may navigate again
                from.pending_target = None;
                return;
            }

            from.pending_target = None;
            from.visibility = Visibility::HandedOff;
            from.navigated_to = Some(Arc::downgrade(&self.inner));
            to.visibility = Visibility::Visible;
            to.store.deferred_values()
        };

        debug!("Navigation {} -> {} confirmed", source.id, self.inner.id);
        self.reapply(deferred);
    }
}

/// Lock two distinct instances in address order
fn lock_pair<'a>(
    first: &'a Arc<DialogInner>,
    second: &'a Arc<DialogInner>,
) -> (MutexGuard<'a, DialogState>, MutexGuard<'a, DialogState>) {
    if Arc::as_ptr(first) < Arc::as_ptr(second) {
        let a = first.state.lock();
        let b = second.state.lock();
        (a, b)
    } else {
        let b = second.state.lock();
        let a = first.state.lock();
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessBackend, NativeCall};
    use crate::types::ButtonSpec;

    fn visible(backend: &HeadlessBackend) -> TaskDialog {
        let dialog = TaskDialog::new(backend);
        dialog.show().unwrap();
        dialog
    }

    #[test]
    fn test_navigation_requires_confirmation() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        let b = TaskDialog::new(&backend);
        b.set_buttons(vec![ButtonSpec::new("done", "Done")]);

        a.navigate(&b).unwrap();
        assert_eq!(a.visibility(), Visibility::Visible);
        assert_eq!(b.visibility(), Visibility::Unshown);
        assert!(a.has_pending_navigation());

        let b_calls = backend.session(b.native_handle()).unwrap().calls();
        assert!(matches!(&b_calls[0], NativeCall::SetButtons(table) if table.len() == 1));
        let a_calls = backend.session(a.native_handle()).unwrap().calls();
        assert_eq!(
            a_calls.last(),
            Some(&NativeCall::Navigate {
                target: b.native_handle()
            })
        );

        backend
            .session(a.native_handle())
            .unwrap()
            .confirm_navigation();
        assert_eq!(a.visibility(), Visibility::HandedOff);
        assert_eq!(b.visibility(), Visibility::Visible);
        assert_eq!(a.navigated_to(), Some(b.clone()));
        assert!(!a.has_pending_navigation());
    }

    #[test]
    fn test_self_navigation_rejected() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        assert!(a.navigate(&a).unwrap_err().is_state());
        assert_eq!(a.visibility(), Visibility::Visible);
    }

    #[test]
    fn test_navigation_to_visible_target_rejected() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        let b = visible(&backend);

        assert!(a.navigate(&b).unwrap_err().is_state());
        assert_eq!(a.visibility(), Visibility::Visible);
        assert_eq!(b.visibility(), Visibility::Visible);
        assert!(!a.has_pending_navigation());
    }

    #[test]
    fn test_navigation_from_unshown_rejected() {
        let backend = HeadlessBackend::new();
        let a = TaskDialog::new(&backend);
        let b = TaskDialog::new(&backend);
        assert!(a.navigate(&b).unwrap_err().is_state());
    }

    #[test]
    fn test_second_pending_navigation_rejected() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        let b = TaskDialog::new(&backend);
        let c = TaskDialog::new(&backend);

        a.navigate(&b).unwrap();
        assert!(a.navigate(&c).unwrap_err().is_state());

        let d = visible(&backend);
        assert!(d.navigate(&b).unwrap_err().is_state());
    }

    #[test]
    fn test_pending_target_cannot_be_shown() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        let b = TaskDialog::new(&backend);

        a.navigate(&b).unwrap();
        assert!(b.show().unwrap_err().is_state());
        assert_eq!(b.visibility(), Visibility::Unshown);
        assert!(!backend
            .session(b.native_handle())
            .unwrap()
            .calls()
            .contains(&NativeCall::Show));
    }

    #[test]
    fn test_confirmation_onto_shown_target_releases_source() {
        let backend = HeadlessBackend::new();
        let a = visible(&backend);
        let b = TaskDialog::new(&backend);
        a.navigate(&b).unwrap();

        // Only reachable by bypassing show(); the source must not stay stuck
        b.inner.state.lock().visibility = Visibility::Visible;
        backend
            .session(a.native_handle())
            .unwrap()
            .confirm_navigation();

        assert_eq!(a.visibility(), Visibility::Visible);
        assert!(!a.has_pending_navigation());
        assert_eq!(a.navigated_to(), None);

        let c = TaskDialog::new(&backend);
        a.navigate(&c).unwrap();
        assert!(a.has_pending_navigation());
    }

    #[test]
    fn test_unrequested_confirmation_ignored() {
        let backend = HeadlessBackend::new();
        let b = TaskDialog::new(&backend);
        backend
            .session(b.native_handle())
            .unwrap()
            .emit(crate::native::RawEvent::Navigated);
        assert_eq!(b.visibility(), Visibility::Unshown);
    }
}
