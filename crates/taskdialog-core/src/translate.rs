//! Identifier Translator
//!
//! Stateless mapping between the native layer's numeric ids and the semantic
//! ids chosen by the caller. Custom buttons and radio options are numbered
//! from [`FIRST_CUSTOM_ID`] in table order, each table in its own numbering
//! space. Message-only buttons are shifted by [`MESSAGE_ONLY_OFFSET`] so a
//! notification click can be told apart from a closing click.
//!
//! Decoding never fails: an id the translator does not recognize is passed
//! through as its decimal text, since the native layer is authoritative and
//! may report ids this table does not know about.

use tracing::debug;

use crate::types::{ButtonSpec, NativeButton, RadioSpec};

/// Native id of the first custom button or radio option
pub const FIRST_CUSTOM_ID: i32 = 101;

/// Added to the native id of message-only buttons
pub const MESSAGE_ONLY_OFFSET: i32 = 1000;

/// Native id reported when nothing was selected
pub const NO_SELECTION: i32 = 0;

/// Standard platform buttons and their semantic ids
pub const STANDARD_BUTTONS: &[(i32, &str)] = &[(1, "ok"), (2, "cancel")];

/// Build the native button table for `buttons`
pub fn encode_buttons(buttons: &[ButtonSpec]) -> Vec<NativeButton> {
    buttons
        .iter()
        .enumerate()
        .map(|(index, button)| {
            let base = FIRST_CUSTOM_ID + index as i32;
            NativeButton {
                id: if button.message_only {
                    base + MESSAGE_ONLY_OFFSET
                } else {
                    base
                },
                label: button.label.clone(),
                message_only: button.message_only,
            }
        })
        .collect()
}

/// Build the native radio table for `options`
pub fn encode_radio_buttons(options: &[RadioSpec]) -> Vec<NativeButton> {
    options
        .iter()
        .enumerate()
        .map(|(index, option)| NativeButton {
            id: FIRST_CUSTOM_ID + index as i32,
            label: option.label.clone(),
            message_only: false,
        })
        .collect()
}

/// Native id a semantic button id is encoded to, standard buttons included
pub fn encode_button_id(id: &str, buttons: &[ButtonSpec]) -> Option<i32> {
    buttons
        .iter()
        .zip(encode_buttons(buttons))
        .find(|(button, _)| button.id == id)
        .map(|(_, native)| native.id)
        .or_else(|| {
            STANDARD_BUTTONS
                .iter()
                .find(|(_, name)| *name == id)
                .map(|(code, _)| *code)
        })
}

/// Native id a semantic radio id is encoded to
pub fn encode_radio_id(id: &str, options: &[RadioSpec]) -> Option<i32> {
    options
        .iter()
        .position(|option| option.id == id)
        .map(|index| FIRST_CUSTOM_ID + index as i32)
}

/// Map a native button id back to a semantic id
///
/// Returns `None` for [`NO_SELECTION`].
pub fn decode_button_result(native_id: i32, buttons: &[ButtonSpec]) -> Option<String> {
    if native_id == NO_SELECTION {
        return None;
    }

    let id = if native_id > MESSAGE_ONLY_OFFSET {
        native_id - MESSAGE_ONLY_OFFSET
    } else {
        native_id
    };

    if let Some(button) = positional(id, buttons.len()).and_then(|index| buttons.get(index)) {
        return Some(button.id.clone());
    }

    if let Some((_, name)) = STANDARD_BUTTONS.iter().find(|(code, _)| *code == id) {
        return Some((*name).to_string());
    }

    debug!("Button id {} has no semantic mapping, passing it through", native_id);
    Some(native_id.to_string())
}

/// Map a native radio id back to a semantic id
///
/// Radio ids carry no offset and have no standard table.
pub fn decode_radio_result(native_id: i32, options: &[RadioSpec]) -> Option<String> {
    if native_id == NO_SELECTION {
        return None;
    }

    if let Some(option) = positional(native_id, options.len()).and_then(|index| options.get(index)) {
        return Some(option.id.clone());
    }

    debug!("Radio id {} has no semantic mapping, passing it through", native_id);
    Some(native_id.to_string())
}

/// Table index for a custom id in `[101, 100 + len]`
fn positional(id: i32, len: usize) -> Option<usize> {
    if id < FIRST_CUSTOM_ID {
        return None;
    }
    let index = (id - FIRST_CUSTOM_ID) as usize;
    (index < len).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buttons() -> Vec<ButtonSpec> {
        vec![
            ButtonSpec::new("save", "Save"),
            ButtonSpec::message_only("refresh", "Refresh"),
            ButtonSpec::new("discard", "Discard"),
        ]
    }

    #[test]
    fn test_encode_buttons_assigns_sequential_ids() {
        let table = encode_buttons(&buttons());
        let ids: Vec<i32> = table.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![101, 1102, 103]);
        assert!(table[1].message_only);
        assert_eq!(table[2].label, "Discard");
    }

    #[test]
    fn test_encode_radio_buttons_has_no_offset() {
        let table = encode_radio_buttons(&[RadioSpec::new("a", "A"), RadioSpec::new("b", "B")]);
        assert_eq!(table.iter().map(|b| b.id).collect::<Vec<_>>(), vec![101, 102]);
    }

    #[test]
    fn test_decode_positional_and_offset() {
        let buttons = buttons();
        for k in 1..=buttons.len() as i32 {
            let expected = Some(buttons[(k - 1) as usize].id.clone());
            assert_eq!(decode_button_result(100 + k, &buttons), expected);
            assert_eq!(decode_button_result(1000 + 100 + k, &buttons), expected);
        }
    }

    #[test]
    fn test_decode_standard_buttons() {
        assert_eq!(decode_button_result(1, &[]), Some("ok".to_string()));
        assert_eq!(decode_button_result(2, &buttons()), Some("cancel".to_string()));
    }

    #[test]
    fn test_decode_unmapped_passes_through() {
        assert_eq!(decode_button_result(7, &buttons()), Some("7".to_string()));
        assert_eq!(decode_button_result(104, &buttons()), Some("104".to_string()));
        assert_eq!(decode_button_result(1104, &buttons()), Some("1104".to_string()));
        assert_eq!(decode_radio_result(105, &[]), Some("105".to_string()));
    }

    #[test]
    fn test_decode_no_selection() {
        assert_eq!(decode_button_result(NO_SELECTION, &buttons()), None);
        assert_eq!(decode_radio_result(NO_SELECTION, &[]), None);
    }

    #[test]
    fn test_decode_radio_ignores_standard_table() {
        let options = vec![RadioSpec::new("first", "First")];
        assert_eq!(decode_radio_result(101, &options), Some("first".to_string()));
        assert_eq!(decode_radio_result(1, &options), Some("1".to_string()));
    }

    #[test]
    fn test_encode_single_ids() {
        let buttons = buttons();
        assert_eq!(encode_button_id("refresh", &buttons), Some(1102));
        assert_eq!(encode_button_id("discard", &buttons), Some(103));
        assert_eq!(encode_button_id("cancel", &buttons), Some(2));
        assert_eq!(encode_button_id("missing", &buttons), None);

        let options = vec![RadioSpec::new("a", "A"), RadioSpec::new("b", "B")];
        assert_eq!(encode_radio_id("b", &options), Some(102));
        assert_eq!(encode_radio_id("ok", &options), None);
    }
}
