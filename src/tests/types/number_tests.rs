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
fn bounds_are_inclusive() {
    let validation = rules(json!({"min": 0, "max": 10}));
    assert_eq!(
        validate_number(&json!(-1), &validation),
        Validity::invalid("Minimum value is 0")
    );
    assert!(validate_number(&json!(0), &validation).is_valid());
    assert!(validate_number(&json!(10), &validation).is_valid());
    assert_eq!(
        validate_number(&json!(11), &validation),
        Validity::invalid("Maximum value is 10")
    );
}

#[test]
fn zero_counts_as_present() {
    let validation = rules(json!({"required": true}));
    assert!(validate_number(&json!(0), &validation).is_valid());
    assert_eq!(
        validate_number(&Value::Null, &validation),
        Validity::invalid("This field is required")
    );
}

#[test]
fn numeric_strings_are_coerced() {
    let validation = rules(json!({"max": 5}));
    assert!(validate_number(&json!("4.5"), &validation).is_valid());
    assert_eq!(
        validate_number(&json!("6"), &validation),
        Validity::invalid("Maximum value is 5")
    );
    assert_eq!(
        validate_number(&json!("six"), &validation),
        Validity::invalid("Value must be a number")
    );
}

#[test]
fn fractional_bounds_keep_their_fraction() {
    let validation = rules(json!({"min": 1.5}));
    assert_eq!(
        validate_number(&json!(1), &validation),
        Validity::invalid("Minimum value is 1.5")
    );
}

#[test]
fn display_groups_thousands() {
    let context = RenderContext::default();
    let line = NumberObjectType
        .display(&json!(1234567.5), &Validation::new(), &context)
        .expect("line");
    assert_eq!(line_text(&line), "1,234,567.5");
    assert!(
        NumberObjectType
            .display(&Value::Null, &Validation::new(), &context)
            .is_none()
    );
}

#[test]
fn input_parses_and_steps() {
    let context = RenderContext::default();
    let validation = rules(json!({"max": 12}));
    let mut input = NumberObjectType.input(&json!(1), &validation, &context);

    let typed = input.handle_key(&key(KeyCode::Char('2'))).expect("change");
    assert_eq!(typed.value, json!(12));
    assert!(typed.is_valid);

    let stepped = input.handle_key(&key(KeyCode::Right)).expect("change");
    assert_eq!(stepped.value, json!(13));
    assert!(!stepped.is_valid);

    let fast = input
        .handle_key(&KeyEvent::new(KeyCode::Left, KeyModifiers::SHIFT))
        .expect("change");
    assert_eq!(fast.value, json!(3));
}

#[test]
fn unparseable_input_reads_as_zero() {
    let context = RenderContext::default();
    let mut input = NumberObjectType.input(&Value::Null, &Validation::new(), &context);
    let change = input.handle_key(&key(KeyCode::Char('-'))).expect("change");
    assert_eq!(change.value, json!(0));
    assert!(input.handle_key(&key(KeyCode::Char('x'))).is_none());
}
