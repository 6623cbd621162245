use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use super::*;
use crate::types::line_text;

fn type_text(input: &mut ImageInput, text: &str) -> Option<InputChange> {
    let mut last = None;
    for ch in text.chars() {
        last = input.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
    }
    last
}

fn required() -> Validation {
    json!({"required": true})
        .as_object()
        .cloned()
        .unwrap_or_default()
}

#[test]
fn validate_checks_presence_only() {
    assert_eq!(
        validate_image(&json!(""), &required()),
        Validity::invalid("This field is required")
    );
    assert!(validate_image(&json!("anything"), &required()).is_valid());
    assert!(validate_image(&Value::Null, &Validation::new()).is_valid());
}

#[test]
fn display_sizes_preview_by_preset() {
    let context = RenderContext::default();
    let small = json!({"previewSize": "small"})
        .as_object()
        .cloned()
        .unwrap_or_default();
    let line = ImageObjectType
        .display(&json!("https://example.com/a.png"), &small, &context)
        .expect("line");
    assert_eq!(line_text(&line), "[image 100×100] https://example.com/a.png");
    assert!(
        ImageObjectType
            .display(&json!(""), &Validation::new(), &context)
            .is_none()
    );
}

#[test]
fn edit_queues_probe_and_emits_immediately() {
    let mut input = ImageInput::new(
        &Value::Null,
        &Validation::new(),
        Arc::new(TypePalette::default()),
    );
    let change = type_text(&mut input, "https://x.io/a.png").expect("change");
    assert!(change.is_valid);
    assert!(input.is_validating());

    let request = input.take_probe_request().expect("probe queued");
    assert_eq!(request.source, "https://x.io/a.png");
    assert!(input.take_probe_request().is_none());
    assert!(
        input
            .lines(true)
            .iter()
            .any(|line| line_text(line) == "Validating image...")
    );
}

#[test]
fn bad_syntax_warns_without_probe() {
    let mut input = ImageInput::new(
        &Value::Null,
        &Validation::new(),
        Arc::new(TypePalette::default()),
    );
    let change = type_text(&mut input, "nope").expect("change");
    assert!(!change.is_valid);
    assert_eq!(input.warning(), Some("Invalid image URL or Base64 data"));
    assert!(input.take_probe_request().is_none());
}

#[test]
fn probe_outcome_keeps_value_and_sets_warning() {
    let mut input = ImageInput::new(
        &json!("https://x.io/a.png"),
        &Validation::new(),
        Arc::new(TypePalette::default()),
    );
    let failed = input
        .apply_probe(Validity::invalid("Image must be square"))
        .expect("change");
    assert_eq!(failed.value, json!("https://x.io/a.png"));
    assert!(!failed.is_valid);
    assert_eq!(input.warning(), Some("Image must be square"));

    let passed = input.apply_probe(Validity::Valid).expect("change");
    assert!(passed.is_valid);
    assert_eq!(input.warning(), None);
    assert!(!input.is_validating());
}

#[test]
fn configure_custom_ratio_round_trip() {
    let context = RenderContext::default();
    let mut editor = ImageObjectType.configure(&Validation::new(), &context);
    let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
    let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);

    editor.handle_key(&down);
    editor.handle_key(&down);
    let custom = editor.handle_key(&left).expect("custom ratio");
    assert_eq!(custom.get("aspectRatio"), Some(&json!(1.5)));

    editor.handle_key(&down);
    let stepped = editor.handle_key(&left).expect("ratio step");
    assert_eq!(stepped.get("aspectRatio"), Some(&json!(1.4)));
}
