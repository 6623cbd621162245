use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;
use std::sync::LazyLock;

use super::input::KeyAction;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

/// Where a binding applies. `Global` bindings apply everywhere.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum KeymapContext {
    Global,
    View,
    Edit,
    Configure,
    NewField,
    Fields,
    Panel,
}

impl KeymapContext {
    fn from_str(raw: &str) -> Option<Self> {
        match raw {
            "global" => Some(KeymapContext::Global),
            "view" => Some(KeymapContext::View),
            "edit" => Some(KeymapContext::Edit),
            "configure" => Some(KeymapContext::Configure),
            "new-field" => Some(KeymapContext::NewField),
            "fields" => Some(KeymapContext::Fields),
            "panel" => Some(KeymapContext::Panel),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    contexts: Vec<String>,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Save,
    Quit,
    ResetStatus,
    Revert,
    TogglePopup,
    FocusStep { delta: i32 },
    ListSelect { delta: i32 },
    ListMove { delta: i32 },
    ListGrab,
    ListAddEntry,
    ListRemoveEntry,
}

struct KeyBinding {
    action: KeyAction,
    contexts: Vec<KeymapContext>,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Self {
        let contexts = raw
            .contexts
            .iter()
            .filter_map(|ctx| KeymapContext::from_str(ctx))
            .collect::<Vec<_>>();
        assert!(
            !contexts.is_empty(),
            "keymap entry {} must declare at least one context",
            raw.id
        );
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo).unwrap_or_else(|err| {
                    panic!("failed to parse combo '{combo}' for {}: {err}", raw.id)
                })
            })
            .collect::<Vec<_>>();
        assert!(
            !combos.is_empty(),
            "keymap entry {} must declare combos",
            raw.id
        );
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.clone())
            .collect::<Vec<_>>()
            .join("/");
        Self {
            action: raw.action.into_action(),
            contexts,
            combos,
            snippet: format!("{combos_display} {}", raw.description),
        }
    }

    fn applies_to(&self, active: &[KeymapContext]) -> bool {
        self.contexts
            .iter()
            .any(|ctx| *ctx == KeymapContext::Global || active.contains(ctx))
    }

    fn matches(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.combos
            .iter()
            .find(|pattern| pattern.matches(key))
            .map(|_| self.action)
    }
}

/// One parsed combo such as `Ctrl+Down`. Letter keys match either case, so
/// an extra Shift is tolerated for them.
struct KeyPattern {
    code: KeyCode,
    modifiers: KeyModifiers,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self, String> {
        let display = spec.trim().to_string();
        if display.eq_ignore_ascii_case("shift+tab") {
            return Ok(Self {
                code: KeyCode::BackTab,
                modifiers: KeyModifiers::empty(),
                display,
            });
        }
        let mut modifiers = KeyModifiers::empty();
        let mut code = None;
        for token in display.split('+').map(str::trim).filter(|t| !t.is_empty()) {
            if code.is_some() {
                return Err(format!("key must come last in '{display}'"));
            }
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" => modifiers |= KeyModifiers::ALT,
                key => code = Some(key_code(key)?),
            }
        }
        let code = code.ok_or_else(|| format!("combo '{display}' names no key"))?;
        Ok(Self {
            code,
            modifiers,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        let code_matches = match (self.code, key.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual)) => {
                expected == actual.to_ascii_lowercase()
            }
            (expected, actual) => expected == actual,
        };
        if !code_matches {
            return false;
        }
        let tolerate_shift = matches!(self.code, KeyCode::BackTab)
            || matches!(self.code, KeyCode::Char(ch) if ch.is_ascii_alphabetic());
        let mut pressed = key.modifiers;
        if tolerate_shift && !self.modifiers.contains(KeyModifiers::SHIFT) {
            pressed.remove(KeyModifiers::SHIFT);
        }
        pressed == self.modifiers
    }
}

fn key_code(token: &str) -> Result<KeyCode, String> {
    let code = match token {
        "tab" => KeyCode::Tab,
        "backtab" => KeyCode::BackTab,
        "enter" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "delete" | "del" => KeyCode::Delete,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => KeyCode::Char(ch),
                _ => return Err(format!("unsupported key '{other}'")),
            }
        }
    };
    Ok(code)
}

impl RawAction {
    fn into_action(self) -> KeyAction {
        match self {
            RawAction::Save => KeyAction::Save,
            RawAction::Quit => KeyAction::Quit,
            RawAction::ResetStatus => KeyAction::ResetStatus,
            RawAction::Revert => KeyAction::Revert,
            RawAction::TogglePopup => KeyAction::TogglePopup,
            RawAction::FocusStep { delta } => KeyAction::FocusStep(delta),
            RawAction::ListSelect { delta } => KeyAction::ListSelect(delta),
            RawAction::ListMove { delta } => KeyAction::ListMove(delta),
            RawAction::ListGrab => KeyAction::ListGrab,
            RawAction::ListAddEntry => KeyAction::ListAddEntry,
            RawAction::ListRemoveEntry => KeyAction::ListRemoveEntry,
        }
    }
}

static KEYMAP: LazyLock<Vec<KeyBinding>> = LazyLock::new(|| {
    let raw_entries: Vec<RawEntry> =
        serde_json::from_str(keymap_source!()).expect("invalid keymap/default.keymap.json");
    raw_entries.into_iter().map(KeyBinding::from_raw).collect()
});

/// First binding active in `contexts` that matches `key`.
pub(crate) fn classify_key(key: &KeyEvent, contexts: &[KeymapContext]) -> Option<KeyAction> {
    KEYMAP
        .iter()
        .filter(|binding| binding.applies_to(contexts))
        .find_map(|binding| binding.matches(key))
}

pub(crate) fn help_text(contexts: &[KeymapContext]) -> Option<String> {
    let snippets = KEYMAP
        .iter()
        .filter(|binding| binding.applies_to(contexts))
        .map(|binding| binding.snippet.clone())
        .collect::<Vec<_>>();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join(" • "))
    }
}
