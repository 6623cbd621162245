use crossterm::event::KeyEvent;

use super::keymap::{self, KeymapContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Save,
    Quit,
    ResetStatus,
    Revert,
    TogglePopup,
    FocusStep(i32),
    ListSelect(i32),
    ListMove(i32),
    ListGrab,
    ListAddEntry,
    ListRemoveEntry,
}

/// Outcome of routing one key press: either an app-level action or a raw
/// key for the focused editor.
#[derive(Debug, Clone, Copy)]
pub(crate) enum CommandDispatch {
    App(KeyAction),
    Input(KeyEvent),
}

pub(crate) fn classify(key: &KeyEvent, contexts: &[KeymapContext]) -> CommandDispatch {
    match keymap::classify_key(key, contexts) {
        Some(action) => CommandDispatch::App(action),
        None => CommandDispatch::Input(*key),
    }
}

#[cfg(test)]
#[path = "../tests/app/input_tests.rs"]
mod tests;
