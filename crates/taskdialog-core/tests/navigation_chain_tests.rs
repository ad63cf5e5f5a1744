//! Navigation chain integration tests
//!
//! A chain of instances behaves as one logical session: events stay with the
//! instance whose session raised them, while the final result is reported
//! through the last instance of the chain.

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

use taskdialog_core::{
    attributes::NativeValue,
    headless::{HeadlessBackend, NativeCall},
    native::RawEvent,
    types::RawResult,
    Attribute, ButtonSpec, DialogEvent, DialogResult, EventKind, TaskDialog, Visibility,
};

fn yes_no(backend: &HeadlessBackend) -> TaskDialog {
    let dialog = TaskDialog::new(backend);
    dialog.set_main_instruction("Continue?").unwrap();
    dialog.set_buttons(vec![
        ButtonSpec::message_only("yes", "Yes"),
        ButtonSpec::message_only("no", "No"),
    ]);
    dialog
}

fn ok_only(backend: &HeadlessBackend) -> TaskDialog {
    let dialog = TaskDialog::new(backend);
    dialog.set_main_instruction("Done").unwrap();
    dialog.set_buttons(vec![ButtonSpec::new("ok", "OK")]);
    dialog
}

#[test]
fn test_yes_no_then_ok_chain() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);

    let clicks = Arc::new(Mutex::new(Vec::new()));
    {
        let clicks = clicks.clone();
        let source = a.clone();
        let target = b.clone();
        a.on(EventKind::ButtonClicked, move |event| {
            clicks.lock().push(event.clone());
            if let DialogEvent::ButtonClicked { button: Some(id) } = event {
                if id == "yes" {
                    source.navigate(&target).unwrap();
                }
            }
        });
    }

    let result = Arc::new(Mutex::new(None));
    let slot = result.clone();
    a.show_with(move |r| *slot.lock() = Some(r)).unwrap();

    let session_a = backend.session(a.native_handle()).unwrap();
    session_a.emit(RawEvent::ButtonClicked(1101));
    assert_eq!(
        *clicks.lock(),
        vec![DialogEvent::ButtonClicked {
            button: Some("yes".into())
        }]
    );
    assert_eq!(session_a.pending_navigation(), Some(b.native_handle()));

    session_a.confirm_navigation();
    assert_eq!(a.visibility(), Visibility::HandedOff);
    assert_eq!(b.visibility(), Visibility::Visible);

    backend
        .session(b.native_handle())
        .unwrap()
        .complete(RawResult::button(101));

    assert_eq!(
        result.lock().clone(),
        Some(DialogResult {
            button: Some("ok".into()),
            radio: None,
            verification: false,
        })
    );
    assert_eq!(a.visibility(), Visibility::HandedOff);
    assert_eq!(b.visibility(), Visibility::Closed);
    assert_eq!(a.effective(), b);
}

#[test]
fn test_navigation_to_shown_target_changes_nothing() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);
    a.show().unwrap();
    b.show().unwrap();

    let err = a.navigate(&b).unwrap_err();
    assert!(err.is_state());
    assert_eq!(a.visibility(), Visibility::Visible);
    assert_eq!(b.visibility(), Visibility::Visible);
    assert!(!a.has_pending_navigation());
    assert_eq!(a.navigated_to(), None);

    let navigations = backend
        .session(a.native_handle())
        .unwrap()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, NativeCall::Navigate { .. }))
        .count();
    assert_eq!(navigations, 0);
}

#[test]
fn test_navigation_to_closed_target_rejected() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);
    b.show().unwrap();
    backend
        .session(b.native_handle())
        .unwrap()
        .complete(RawResult::button(101));
    a.show().unwrap();

    assert!(a.navigate(&b).unwrap_err().is_state());
    assert_eq!(b.visibility(), Visibility::Closed);
}

#[test]
fn test_target_progress_applied_on_confirmation() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);
    b.set_progress_bar_position(60).unwrap();
    b.set_progress_bar_marquee(true).unwrap();
    a.show().unwrap();

    a.navigate(&b).unwrap();
    let session_b = backend.session(b.native_handle()).unwrap();
    assert!(session_b.attribute_calls(Attribute::ProgressBarPosition).is_empty());

    backend
        .session(a.native_handle())
        .unwrap()
        .confirm_navigation();
    assert_eq!(
        session_b.attribute_calls(Attribute::ProgressBarPosition),
        vec![NativeValue::Int(60)]
    );
    assert_eq!(
        session_b.attribute_calls(Attribute::ProgressBarMarquee),
        vec![NativeValue::Flag(true)]
    );
}

#[test]
fn test_events_stay_with_originating_instance() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);
    let a_events = Arc::new(Mutex::new(Vec::new()));
    let b_events = Arc::new(Mutex::new(Vec::new()));
    {
        let a_events = a_events.clone();
        a.on(EventKind::ButtonClicked, move |e| a_events.lock().push(e.clone()));
        let b_navigated = b_events.clone();
        let b_events = b_events.clone();
        b.on(EventKind::ButtonClicked, move |e| b_events.lock().push(e.clone()));
        b.on(EventKind::Navigated, move |e| b_navigated.lock().push(e.clone()));
    }

    a.show().unwrap();
    a.navigate(&b).unwrap();
    backend
        .session(a.native_handle())
        .unwrap()
        .confirm_navigation();
    backend
        .session(b.native_handle())
        .unwrap()
        .emit(RawEvent::ButtonClicked(101));

    assert!(a_events.lock().is_empty());
    assert_eq!(
        *b_events.lock(),
        vec![
            DialogEvent::Navigated,
            DialogEvent::ButtonClicked {
                button: Some("ok".into())
            },
        ]
    );
}

#[test]
fn test_close_before_confirmation_abandons_navigation() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);

    let result = Arc::new(Mutex::new(None));
    let slot = result.clone();
    a.show_with(move |r| *slot.lock() = Some(r)).unwrap();
    a.navigate(&b).unwrap();

    backend
        .session(a.native_handle())
        .unwrap()
        .complete(RawResult::button(1102));

    assert_eq!(
        result.lock().as_ref().and_then(|r| r.button.clone()),
        Some("no".to_string())
    );
    assert_eq!(a.visibility(), Visibility::Closed);
    assert_eq!(b.visibility(), Visibility::Unshown);

    // The target is free to start its own session
    b.show().unwrap();
}

#[test]
fn test_pending_target_cannot_start_own_session() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);
    let c = ok_only(&backend);

    let result = Arc::new(Mutex::new(None));
    let slot = result.clone();
    a.show_with(move |r| *slot.lock() = Some(r)).unwrap();
    a.navigate(&b).unwrap();

    assert!(b.show().unwrap_err().is_state());
    assert_eq!(b.visibility(), Visibility::Unshown);

    backend.session(a.native_handle()).unwrap().confirm_navigation();
    assert_eq!(a.visibility(), Visibility::HandedOff);
    assert_eq!(b.visibility(), Visibility::Visible);
    assert!(!a.has_pending_navigation());

    // The chain keeps moving from its new tail
    b.navigate(&c).unwrap();
    backend.session(b.native_handle()).unwrap().confirm_navigation();
    backend
        .session(c.native_handle())
        .unwrap()
        .complete(RawResult::button(101));
    assert_eq!(
        result.lock().as_ref().and_then(|r| r.button.clone()),
        Some("ok".to_string())
    );
}

#[test]
fn test_three_instance_chain_resolves_through_tail() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = yes_no(&backend);
    let c = ok_only(&backend);

    let result = Arc::new(Mutex::new(None));
    let slot = result.clone();
    a.show_with(move |r| *slot.lock() = Some(r)).unwrap();

    a.navigate(&b).unwrap();
    backend.session(a.native_handle()).unwrap().confirm_navigation();
    b.navigate(&c).unwrap();
    backend.session(b.native_handle()).unwrap().confirm_navigation();

    assert_eq!(a.effective(), c);
    assert_eq!(a.navigated_to(), Some(b.clone()));
    assert_eq!(b.visibility(), Visibility::HandedOff);

    backend
        .session(c.native_handle())
        .unwrap()
        .complete(RawResult::button(101));
    assert_eq!(
        result.lock().as_ref().and_then(|r| r.button.clone()),
        Some("ok".to_string())
    );
}

#[tokio::test]
async fn test_run_resolves_through_chain() {
    let backend = HeadlessBackend::new();
    let a = yes_no(&backend);
    let b = ok_only(&backend);

    let waiter = {
        let a = a.clone();
        tokio::spawn(async move { a.run().await })
    };
    while a.visibility() != Visibility::Visible {
        tokio::task::yield_now().await;
    }

    a.navigate(&b).unwrap();
    backend.session(a.native_handle()).unwrap().confirm_navigation();
    backend
        .session(b.native_handle())
        .unwrap()
        .complete(RawResult::button(101).with_verification(true));

    let result = waiter.await.unwrap().unwrap();
    assert_eq!(result.button.as_deref(), Some("ok"));
    assert!(result.verification);
}
