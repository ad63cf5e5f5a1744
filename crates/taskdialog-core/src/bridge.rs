//! Event Bridge
//!
//! The only consumer of raw native events. Each raw event is translated
//! against the option tables of the dialog whose native session emitted it,
//! and the result is published on that same dialog, not on the tail of its
//! navigation chain.

use crate::events::DialogEvent;
use crate::native::RawEvent;
use crate::translate::{decode_button_result, decode_radio_result};
use crate::types::{ButtonSpec, RadioSpec};

/// Option tables a raw event is translated against
#[derive(Debug, Clone, Copy)]
pub struct OptionTables<'a> {
    pub buttons: &'a [ButtonSpec],
    pub radio_buttons: &'a [RadioSpec],
}

/// Translate one raw event into its semantic form
pub fn translate_event(raw: RawEvent, tables: OptionTables<'_>) -> DialogEvent {
    match raw {
        RawEvent::Loaded => DialogEvent::Loaded,
        RawEvent::Navigated => DialogEvent::Navigated,
        RawEvent::ButtonClicked(id) => DialogEvent::ButtonClicked {
            button: decode_button_result(id, tables.buttons),
        },
        RawEvent::RadioClicked(id) => DialogEvent::RadioClicked {
            radio: decode_radio_result(id, tables.radio_buttons),
        },
        RawEvent::LinkClicked(href) => DialogEvent::LinkClicked { href },
        RawEvent::Timer(elapsed_ms) => DialogEvent::Timer { elapsed_ms },
        RawEvent::VerificationClicked(checked) => DialogEvent::VerificationClicked { checked },
        RawEvent::ExpandoClicked(expanded) => DialogEvent::ExpandoClicked { expanded },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_click_translated() {
        let buttons = vec![
            ButtonSpec::message_only("yes", "Yes"),
            ButtonSpec::message_only("no", "No"),
        ];
        let tables = OptionTables {
            buttons: &buttons,
            radio_buttons: &[],
        };

        assert_eq!(
            translate_event(RawEvent::ButtonClicked(1101), tables),
            DialogEvent::ButtonClicked {
                button: Some("yes".into())
            }
        );
        assert_eq!(
            translate_event(RawEvent::ButtonClicked(2), tables),
            DialogEvent::ButtonClicked {
                button: Some("cancel".into())
            }
        );
    }

    #[test]
    fn test_radio_click_translated() {
        let radios = vec![RadioSpec::new("first", "First"), RadioSpec::new("second", "Second")];
        let tables = OptionTables {
            buttons: &[],
            radio_buttons: &radios,
        };
        assert_eq!(
            translate_event(RawEvent::RadioClicked(102), tables),
            DialogEvent::RadioClicked {
                radio: Some("second".into())
            }
        );
    }

    #[test]
    fn test_payloads_carried_over() {
        let tables = OptionTables {
            buttons: &[],
            radio_buttons: &[],
        };
        assert_eq!(
            translate_event(RawEvent::Timer(1500), tables),
            DialogEvent::Timer { elapsed_ms: 1500 }
        );
        assert_eq!(
            translate_event(RawEvent::LinkClicked("http://example.org".into()), tables),
            DialogEvent::LinkClicked {
                href: "http://example.org".into()
            }
        );
        assert_eq!(
            translate_event(RawEvent::ExpandoClicked(true), tables),
            DialogEvent::ExpandoClicked { expanded: true }
        );
    }
}
