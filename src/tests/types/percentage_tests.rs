use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};

use super::*;
use crate::types::line_text;

fn rules(value: Value) -> Validation {
    value.as_object().cloned().unwrap_or_default()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn display_appends_percent_sign() {
    let context = RenderContext::default();
    let shown = |value: Value| {
        PercentageObjectType
            .display(&value, &Validation::new(), &context)
            .map(|line| line_text(&line))
    };
    assert_eq!(shown(json!(42)).as_deref(), Some("42%"));
    assert_eq!(shown(Value::Null).as_deref(), Some("0%"));
}

#[test]
fn validation_matches_number_rules() {
    let validation = rules(json!({"min": 10, "max": 90}));
    assert_eq!(
        PercentageObjectType.validate(&json!(5), &validation),
        Validity::invalid("Minimum value is 10")
    );
    assert!(PercentageObjectType.validate(&json!(50), &validation).is_valid());
}

#[test]
fn slider_is_clamped_to_default_range() {
    let input = PercentageInput::new(
        &json!(100),
        &Validation::new(),
        Arc::new(TypePalette::default()),
    );
    let mut input = input;
    let change = input.handle_key(&key(KeyCode::Right)).expect("change");
    assert_eq!(change.value, json!(100));

    let bottom = input.handle_key(&key(KeyCode::Home)).expect("change");
    assert_eq!(bottom.value, json!(0));
}

#[test]
fn slider_uses_configured_bounds() {
    let validation = rules(json!({"min": 20, "max": 40}));
    let mut input = PercentageInput::new(
        &Value::Null,
        &validation,
        Arc::new(TypePalette::default()),
    );
    assert_eq!(input.value(), Value::Null);

    let first = input.handle_key(&key(KeyCode::Right)).expect("change");
    assert_eq!(first.value, json!(21));
    assert!(first.is_valid);

    let top = input.handle_key(&key(KeyCode::End)).expect("change");
    assert_eq!(top.value, json!(40));
    assert!(line_text(&input.lines(true)[0]).ends_with("40%"));
}

#[test]
fn configure_shows_default_range() {
    let context = RenderContext::default();
    let editor = PercentageObjectType.configure(&Validation::new(), &context);
    let lines = editor.lines(false);
    assert!(line_text(&lines[1]).contains('0'));
    assert!(line_text(&lines[2]).contains("100"));
}
