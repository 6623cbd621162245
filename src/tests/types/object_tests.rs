use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use super::*;
use crate::types::line_text;

fn rules(value: Value) -> Validation {
    value.as_object().cloned().unwrap_or_default()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn catalog() -> Arc<ObjectCatalog> {
    Arc::new(
        ObjectCatalog::default()
            .with_entry(ObjectRef::new("1", "Acme").with_description("Anvils"))
            .with_entry(ObjectRef::new("2", "Globex"))
            .with_entry(ObjectRef::new("3", "Initech")),
    )
}

#[test]
fn absent_values_trip_required() {
    let validation = rules(json!({"required": true}));
    for value in [Value::Null, json!(""), json!([])] {
        assert_eq!(
            validate_object(&value, &validation),
            Validity::invalid("This field is required")
        );
    }
    assert!(validate_object(&json!({"id": "1", "name": "Acme"}), &validation).is_valid());
}

#[test]
fn counts_apply_only_when_multiple() {
    let validation = rules(json!({"multiple": true, "min": 2, "max": 3}));
    let one = json!([{"id": "1", "name": "Acme"}]);
    assert_eq!(
        validate_object(&one, &validation),
        Validity::invalid("Select at least 2 objects")
    );
    let four = json!([
        {"id": "1", "name": "a"}, {"id": "2", "name": "b"},
        {"id": "3", "name": "c"}, {"id": "4", "name": "d"}
    ]);
    assert_eq!(
        validate_object(&four, &validation),
        Validity::invalid("Select at most 3 objects")
    );

    let single = rules(json!({"min": 2}));
    assert!(validate_object(&one, &single).is_valid());
}

#[test]
fn legacy_id_shows_deprecation_notice() {
    let context = RenderContext::default();
    let line = ObjectObjectType
        .display(&json!("abc"), &Validation::new(), &context)
        .expect("line");
    assert_eq!(
        line_text(&line),
        "Object id: abc. This format is deprecated, please copy the id and reinput it."
    );
}

#[test]
fn display_renders_tags() {
    let context = RenderContext::default();
    let line = ObjectObjectType
        .display(
            &json!([{"id": "1", "name": "Acme"}, {"id": "2", "name": "Globex"}]),
            &Validation::new(),
            &context,
        )
        .expect("line");
    assert_eq!(line_text(&line), " Acme   Globex ");
    assert!(
        ObjectObjectType
            .display(&Value::Null, &Validation::new(), &context)
            .is_none()
    );
}

#[test]
fn catalog_search_is_case_insensitive() {
    let catalog = catalog();
    let names = |query: &str| {
        catalog
            .search(query)
            .into_iter()
            .map(|entry| entry.name.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(names("GLO"), vec!["Globex"]);
    assert_eq!(names("anvil"), vec!["Acme"]);
    assert_eq!(names("").len(), 3);
}

#[test]
fn catalog_from_value_skips_malformed_entries() {
    let catalog = ObjectCatalog::from_value(&json!([
        {"id": 7, "name": "Seven"},
        {"name": "no id"},
        "bare"
    ]));
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.entries()[0].id, "7");
}

#[test]
fn single_mode_replaces_selection() {
    let mut picker = ObjectPicker::new(&Value::Null, &Validation::new(), catalog());
    let first = picker.handle_key(&key(KeyCode::Enter)).expect("select");
    assert_eq!(first.value["id"], json!("1"));

    picker.handle_key(&key(KeyCode::Down));
    let second = picker.handle_key(&key(KeyCode::Enter)).expect("select");
    assert_eq!(second.value["id"], json!("2"));
    assert!(second.value.is_object());
}

#[test]
fn multiple_mode_appends_and_skips_duplicates() {
    let validation = rules(json!({"multiple": true, "min": 2}));
    let mut picker = ObjectPicker::new(&Value::Null, &validation, catalog());

    let first = picker.handle_key(&key(KeyCode::Enter)).expect("select");
    assert!(!first.is_valid);
    assert!(picker.handle_key(&key(KeyCode::Enter)).is_none());

    for ch in "init".chars() {
        assert!(picker.handle_key(&key(KeyCode::Char(ch))).is_none());
    }
    let second = picker.handle_key(&key(KeyCode::Enter)).expect("select");
    assert!(second.is_valid);
    assert_eq!(second.value.as_array().map(Vec::len), Some(2));
    assert_eq!(second.value[1]["name"], json!("Initech"));
}

#[test]
fn backspace_edits_query_before_selection() {
    let validation = rules(json!({"multiple": true}));
    let mut picker = ObjectPicker::new(
        &json!([{"id": "1", "name": "Acme"}]),
        &validation,
        catalog(),
    );
    picker.handle_key(&key(KeyCode::Char('g')));
    assert!(picker.handle_key(&key(KeyCode::Backspace)).is_none());

    let removed = picker.handle_key(&key(KeyCode::Backspace)).expect("removed");
    assert_eq!(removed.value, json!([]));
    assert!(picker.handle_key(&key(KeyCode::Backspace)).is_none());
}

#[test]
fn max_blocks_further_additions() {
    let validation = rules(json!({"multiple": true, "max": 1}));
    let mut picker = ObjectPicker::new(&Value::Null, &validation, catalog());
    picker.handle_key(&key(KeyCode::Enter)).expect("select");
    picker.handle_key(&key(KeyCode::Down));
    assert!(picker.handle_key(&key(KeyCode::Enter)).is_none());
}

#[test]
fn delete_clears_legacy_value() {
    let mut picker = ObjectPicker::new(&json!("abc"), &Validation::new(), catalog());
    assert_eq!(picker.value(), json!("abc"));
    let cleared = picker.handle_key(&key(KeyCode::Delete)).expect("cleared");
    assert_eq!(cleared.value, Value::Null);
}

#[test]
fn disabling_multiple_drops_count_bounds() {
    let context = RenderContext::default();
    let mut editor = ObjectObjectType.configure(
        &rules(json!({"multiple": true, "min": 1, "max": 4})),
        &context,
    );
    assert_eq!(editor.lines(false).len(), 4);

    editor.handle_key(&key(KeyCode::Down));
    let updated = editor.handle_key(&key(KeyCode::Char(' '))).expect("toggle");
    assert_eq!(updated, rules(json!({"multiple": false})));
    assert_eq!(editor.lines(false).len(), 2);
}
