use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Modifier;
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
fn required_rejects_empty_and_null() {
    let validation = rules(json!({"required": true}));
    assert_eq!(
        validate_string(&json!(""), &validation),
        Validity::invalid("This field is required")
    );
    assert_eq!(
        validate_string(&Value::Null, &validation),
        Validity::invalid("This field is required")
    );
    assert!(validate_string(&json!("x"), &validation).is_valid());
}

#[test]
fn length_bounds_count_characters() {
    let validation = rules(json!({"minLength": 3, "maxLength": 5}));
    assert_eq!(
        validate_string(&json!("ab"), &validation),
        Validity::invalid("Minimum length is 3 characters")
    );
    assert_eq!(
        validate_string(&json!("abcdef"), &validation),
        Validity::invalid("Maximum length is 5 characters")
    );
    assert!(validate_string(&json!("ééé"), &validation).is_valid());
}

#[test]
fn zero_bounds_are_ignored() {
    let validation = rules(json!({"minLength": 0, "maxLength": 0}));
    assert!(validate_string(&json!("anything at all"), &validation).is_valid());
}

#[test]
fn regex_uses_custom_message() {
    let validation = rules(json!({"regex": "^[a-z]+$", "regexMessage": "lowercase only"}));
    assert_eq!(
        validate_string(&json!("ABC"), &validation),
        Validity::invalid("lowercase only")
    );
    assert!(validate_string(&json!("abc"), &validation).is_valid());

    let default_message = rules(json!({"regex": "^[a-z]+$"}));
    assert_eq!(
        validate_string(&json!("ABC"), &default_message),
        Validity::invalid("Invalid format")
    );
}

#[test]
fn broken_regex_reports_pattern() {
    let validation = rules(json!({"regex": "(unclosed"}));
    assert_eq!(
        validate_string(&json!("x"), &validation),
        Validity::invalid("Invalid pattern: (unclosed")
    );
}

#[test]
fn links_render_underlined() {
    let context = RenderContext::default();
    let line = StringObjectType
        .display(&json!("https://example.com"), &Validation::new(), &context)
        .expect("line");
    assert_eq!(line_text(&line), "https://example.com");
    assert!(line.spans[0].style.add_modifier.contains(Modifier::UNDERLINED));
}

#[test]
fn input_emits_value_with_validity() {
    let validation = rules(json!({"minLength": 2}));
    let mut input = StringInput::new(&Value::Null, &validation);

    let first = input.handle_key(&key(KeyCode::Char('a'))).expect("change");
    assert_eq!(first.value, json!("a"));
    assert!(!first.is_valid);

    let second = input.handle_key(&key(KeyCode::Char('b'))).expect("change");
    assert_eq!(second.value, json!("ab"));
    assert!(second.is_valid);
}

#[test]
fn input_refuses_growth_past_max_length() {
    let validation = rules(json!({"maxLength": 2}));
    let mut input = StringInput::new(&json!("ab"), &validation);
    assert!(input.handle_key(&key(KeyCode::Char('c'))).is_none());
    assert_eq!(input.value(), json!("ab"));

    let shrink = input.handle_key(&key(KeyCode::Backspace)).expect("change");
    assert_eq!(shrink.value, json!("a"));
}

#[test]
fn input_ignores_control_chords() {
    let mut input = StringInput::new(&json!("x"), &Validation::new());
    let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert!(input.handle_key(&chord).is_none());
}

#[test]
fn configure_emits_full_validation() {
    let context = RenderContext::default();
    let mut editor = StringObjectType.configure(&rules(json!({"regex": "x"})), &context);
    let updated = editor.handle_key(&key(KeyCode::Char(' '))).expect("toggle");
    assert_eq!(updated.get("required"), Some(&json!(true)));
    assert_eq!(updated.get("regex"), Some(&json!("x")));

    let lines = editor.lines(true);
    assert!(line_text(&lines[2]).contains("200"));
}
