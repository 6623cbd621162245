use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use super::*;
use crate::types::line_text;

const SHAPES: &[(&str, &str)] = &[("round", "Round"), ("square", "Square")];

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn editor(validation: Value) -> SettingsEditor {
    SettingsEditor::new(
        &validation.as_object().cloned().unwrap_or_default(),
        vec![
            SettingRow::toggle("required", "Required"),
            SettingRow::count("limit", "Limit", Some(5.0)),
            SettingRow::text("note", "Note", "none"),
            SettingRow::choice("shape", "Shape", SHAPES, "round"),
        ],
    )
}

#[test]
fn toggle_flips_flag() {
    let mut editor = editor(json!({}));
    let updated = editor.handle_key(&key(KeyCode::Enter)).expect("toggled");
    assert_eq!(updated.get("required"), Some(&json!(true)));
    let updated = editor.handle_key(&key(KeyCode::Enter)).expect("toggled");
    assert_eq!(updated.get("required"), Some(&json!(false)));
}

#[test]
fn number_steps_from_shown_default() {
    let mut editor = editor(json!({}));
    editor.handle_key(&key(KeyCode::Down));
    let updated = editor.handle_key(&key(KeyCode::Right)).expect("stepped");
    assert_eq!(updated.get("limit"), Some(&json!(6)));
}

#[test]
fn count_never_goes_negative() {
    let mut editor = editor(json!({"limit": 0}));
    editor.handle_key(&key(KeyCode::Down));
    let updated = editor.handle_key(&key(KeyCode::Left)).expect("stepped");
    assert_eq!(updated.get("limit"), Some(&json!(0)));
}

#[test]
fn typed_digits_accumulate_and_clear() {
    let mut editor = editor(json!({"limit": 3}));
    editor.handle_key(&key(KeyCode::Down));
    let updated = editor.handle_key(&key(KeyCode::Char('2'))).expect("typed");
    assert_eq!(updated.get("limit"), Some(&json!(32)));

    editor.handle_key(&key(KeyCode::Backspace));
    let updated = editor.handle_key(&key(KeyCode::Backspace)).expect("cleared");
    assert!(!updated.contains_key("limit"));
}

#[test]
fn text_row_edits_string() {
    let mut editor = editor(json!({}));
    editor.handle_key(&key(KeyCode::Down));
    editor.handle_key(&key(KeyCode::Down));
    editor.handle_key(&key(KeyCode::Char('h')));
    let updated = editor.handle_key(&key(KeyCode::Char('i'))).expect("typed");
    assert_eq!(updated.get("note"), Some(&json!("hi")));
}

#[test]
fn choice_cycles_both_ways() {
    let mut editor = editor(json!({"keep": 1}));
    for _ in 0..3 {
        editor.handle_key(&key(KeyCode::Down));
    }
    let updated = editor.handle_key(&key(KeyCode::Right)).expect("cycled");
    assert_eq!(updated.get("shape"), Some(&json!("square")));
    assert_eq!(updated.get("keep"), Some(&json!(1)));
    let updated = editor.handle_key(&key(KeyCode::Right)).expect("cycled");
    assert_eq!(updated.get("shape"), Some(&json!("round")));
}

#[test]
fn lines_mark_selected_row() {
    let editor = editor(json!({"note": "hello"}));
    let lines = editor.lines(true);
    assert_eq!(lines.len(), 4);
    assert!(line_text(&lines[0]).starts_with("› Required"));
    assert!(line_text(&lines[1]).ends_with('5'));
    assert!(line_text(&lines[2]).ends_with("hello"));
    assert!(line_text(&lines[3]).ends_with("‹ Round ›"));
}

#[test]
fn hidden_rows_are_skipped() {
    fn has_note(validation: &Validation) -> bool {
        validation.contains_key("note")
    }
    let mut editor = SettingsEditor::new(
        &Validation::new(),
        vec![
            SettingRow::toggle("required", "Required"),
            SettingRow::text("detail", "Detail", "").visible_when(has_note),
        ],
    );
    editor.handle_key(&key(KeyCode::Down));
    let updated = editor.handle_key(&key(KeyCode::Char(' '))).expect("toggled");
    assert_eq!(updated.get("required"), Some(&json!(true)));
    assert_eq!(editor.lines(false).len(), 1);
}
