use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::*;
use crate::app::keymap::help_text;

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

fn action(key: KeyEvent, contexts: &[KeymapContext]) -> Option<KeyAction> {
    match classify(&key, contexts) {
        CommandDispatch::App(action) => Some(action),
        CommandDispatch::Input(_) => None,
    }
}

#[test]
fn quit_is_global() {
    for contexts in [
        &[KeymapContext::View][..],
        &[KeymapContext::Edit],
        &[KeymapContext::Configure, KeymapContext::Panel],
    ] {
        assert_eq!(
            action(key(KeyCode::Char('q'), KeyModifiers::CONTROL), contexts),
            Some(KeyAction::Quit)
        );
    }
}

#[test]
fn save_is_not_bound_in_view_mode() {
    let save = key(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(action(save, &[KeymapContext::View]), None);
    assert_eq!(action(save, &[KeymapContext::Edit]), Some(KeyAction::Save));
}

#[test]
fn shift_tab_steps_backwards() {
    let back = key(KeyCode::BackTab, KeyModifiers::SHIFT);
    assert_eq!(
        action(back, &[KeymapContext::Edit]),
        Some(KeyAction::FocusStep(-1))
    );
    assert_eq!(
        action(key(KeyCode::Tab, KeyModifiers::NONE), &[KeymapContext::Configure]),
        Some(KeyAction::FocusStep(1))
    );
}

#[test]
fn arrows_reach_editors_while_editing() {
    let down = key(KeyCode::Down, KeyModifiers::NONE);
    assert!(matches!(
        classify(&down, &[KeymapContext::Edit]),
        CommandDispatch::Input(event) if event.code == KeyCode::Down
    ));
    assert_eq!(
        action(down, &[KeymapContext::View]),
        Some(KeyAction::ListSelect(1))
    );
}

#[test]
fn field_list_bindings_only_apply_with_list_focus() {
    let move_up = key(KeyCode::Up, KeyModifiers::CONTROL);
    assert_eq!(
        action(move_up, &[KeymapContext::Configure, KeymapContext::Fields]),
        Some(KeyAction::ListMove(-1))
    );
    assert_eq!(
        action(move_up, &[KeymapContext::Configure, KeymapContext::Panel]),
        None
    );
    let space = key(KeyCode::Char(' '), KeyModifiers::NONE);
    assert_eq!(
        action(space, &[KeymapContext::Configure, KeymapContext::Fields]),
        Some(KeyAction::ListGrab)
    );
    assert_eq!(
        action(space, &[KeymapContext::Configure, KeymapContext::NewField]),
        None
    );
}

#[test]
fn help_lists_context_bindings() {
    let help = help_text(&[KeymapContext::Configure, KeymapContext::Fields]).expect("help");
    assert!(help.contains("Ctrl+S save"));
    assert!(help.contains("Space grab/drop"));
    assert!(!help.contains("add field"));
}
