use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use super::*;
use crate::types::{YesNoPresentation, line_text};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn required() -> Validation {
    json!({"required": true})
        .as_object()
        .cloned()
        .unwrap_or_default()
}

#[test]
fn required_accepts_only_the_two_sentinels() {
    assert!(validate_yes_no(&json!("yes"), &required()).is_valid());
    assert!(validate_yes_no(&json!("no"), &required()).is_valid());
    for value in [json!(""), json!("maybe"), json!(true), Value::Null] {
        assert_eq!(
            validate_yes_no(&value, &required()),
            Validity::invalid("This field is required")
        );
    }
    assert!(validate_yes_no(&json!("maybe"), &Validation::new()).is_valid());
}

#[test]
fn badges_follow_palette_labels() {
    let context = RenderContext::default();
    let shown = |value: Value| {
        YesNoObjectType
            .display(&value, &Validation::new(), &context)
            .map(|line| line_text(&line))
    };
    assert_eq!(shown(json!("yes")).as_deref(), Some(" YES "));
    assert_eq!(shown(json!("no")).as_deref(), Some(" NO "));
    assert_eq!(shown(Value::Null).as_deref(), Some(" N/A "));

    let custom = RenderContext::default().with_palette(
        TypePalette::default().with_yes_no(YesNoPresentation::default().with_labels("Ja", "Nein")),
    );
    let line = YesNoObjectType
        .display(&json!("no"), &Validation::new(), &custom)
        .expect("badge");
    assert_eq!(line_text(&line), " Nein ");
}

#[test]
fn input_cycles_through_options() {
    let mut input = YesNoInput::new(&json!(""), &required(), Arc::new(TypePalette::default()));
    let yes = input.handle_key(&key(KeyCode::Right)).expect("change");
    assert_eq!(yes.value, json!("yes"));
    assert!(yes.is_valid);

    let no = input.handle_key(&key(KeyCode::Char(' '))).expect("change");
    assert_eq!(no.value, json!("no"));

    let unset = input.handle_key(&key(KeyCode::Right)).expect("change");
    assert_eq!(unset.value, json!(""));
    assert!(!unset.is_valid);

    let back = input.handle_key(&key(KeyCode::Left)).expect("change");
    assert_eq!(back.value, json!("no"));
}

#[test]
fn shortcut_keys_select_directly() {
    let mut input = YesNoInput::new(&Value::Null, &Validation::new(), Arc::new(TypePalette::default()));
    assert_eq!(
        input.handle_key(&key(KeyCode::Char('y'))).map(|c| c.value),
        Some(json!("yes"))
    );
    assert_eq!(
        input.handle_key(&key(KeyCode::Delete)).map(|c| c.value),
        Some(json!(""))
    );
    assert!(input.handle_key(&key(KeyCode::Delete)).is_none());
}
