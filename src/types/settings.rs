use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::FieldConfigure;

use super::helpers::{format_number, handle_text_edit, number, number_value};

#[derive(Debug, Clone)]
pub(crate) enum SettingKind {
    Toggle,
    Number {
        shown_default: Option<f64>,
        min: Option<f64>,
        step: f64,
    },
    Text {
        placeholder: &'static str,
    },
    Choice {
        options: &'static [(&'static str, &'static str)],
        default: &'static str,
    },
}

/// One editable key of a validation object.
#[derive(Debug, Clone)]
pub(crate) struct SettingRow {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: SettingKind,
    pub visible: Option<fn(&Validation) -> bool>,
}

impl SettingRow {
    pub fn toggle(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Toggle,
            visible: None,
        }
    }

    pub fn number(key: &'static str, label: &'static str, shown_default: Option<f64>) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Number {
                shown_default,
                min: None,
                step: 1.0,
            },
            visible: None,
        }
    }

    pub fn count(key: &'static str, label: &'static str, shown_default: Option<f64>) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Number {
                shown_default,
                min: Some(0.0),
                step: 1.0,
            },
            visible: None,
        }
    }

    pub fn text(key: &'static str, label: &'static str, placeholder: &'static str) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Text { placeholder },
            visible: None,
        }
    }

    pub fn choice(
        key: &'static str,
        label: &'static str,
        options: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            kind: SettingKind::Choice { options, default },
            visible: None,
        }
    }

    /// Arrow-key increment and lower bound for a number row.
    pub fn with_step(mut self, step: f64, floor: f64) -> Self {
        if let SettingKind::Number { min, step: current, .. } = &mut self.kind {
            *current = step;
            *min = Some(floor);
        }
        self
    }

    pub fn visible_when(mut self, predicate: fn(&Validation) -> bool) -> Self {
        self.visible = Some(predicate);
        self
    }

    fn is_visible(&self, validation: &Validation) -> bool {
        self.visible.is_none_or(|predicate| predicate(validation))
    }
}

/// Generic configure surface: a list of setting rows over one validation
/// object. Every change yields the full validation object.
#[derive(Debug, Clone)]
pub(crate) struct SettingsEditor {
    rows: Vec<SettingRow>,
    validation: Validation,
    selected: usize,
    // Raw text of the number row being typed into, so partial input such as
    // "-" or "2." survives between keys.
    number_buffer: Option<(usize, String)>,
    finalize: Option<fn(&mut Validation)>,
}

impl SettingsEditor {
    pub fn new(validation: &Validation, rows: Vec<SettingRow>) -> Self {
        Self {
            rows,
            validation: validation.clone(),
            selected: 0,
            number_buffer: None,
            finalize: None,
        }
    }

    /// Hook run after every edit, before the validation is emitted.
    pub fn with_finalize(mut self, finalize: fn(&mut Validation)) -> Self {
        self.finalize = Some(finalize);
        self
    }

    fn visible_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_visible(&self.validation))
            .map(|(idx, _)| idx)
            .collect()
    }

    fn current_row(&self) -> Option<usize> {
        let visible = self.visible_rows();
        visible
            .get(self.selected.min(visible.len().saturating_sub(1)))
            .copied()
    }

    fn move_selection(&mut self, delta: i32) -> bool {
        let len = self.visible_rows().len();
        if len == 0 {
            return false;
        }
        let next = (self.selected.min(len - 1) as i32 + delta).clamp(0, len as i32 - 1) as usize;
        let moved = next != self.selected;
        self.selected = next;
        if moved {
            self.number_buffer = None;
        }
        moved
    }

    fn edit_row(&mut self, row_index: usize, key: &KeyEvent) -> bool {
        let row = self.rows[row_index].clone();
        match row.kind {
            SettingKind::Toggle => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    let current = self
                        .validation
                        .get(row.key)
                        .and_then(Value::as_bool)
                        .unwrap_or(false);
                    self.validation
                        .insert(row.key.to_string(), Value::Bool(!current));
                    true
                }
                _ => false,
            },
            SettingKind::Number {
                shown_default,
                min,
                step,
            } => {
                let current = number(&self.validation, row.key);
                match key.code {
                    KeyCode::Left | KeyCode::Right => {
                        self.number_buffer = None;
                        let delta = if key.code == KeyCode::Left { -step } else { step };
                        let base = current.or(shown_default).unwrap_or(0.0);
                        let mut next = ((base + delta) * 1000.0).round() / 1000.0;
                        if let Some(min) = min {
                            next = next.max(min);
                        }
                        self.validation
                            .insert(row.key.to_string(), number_value(next));
                        true
                    }
                    KeyCode::Char(ch)
                        if (ch.is_ascii_digit() || ch == '-' || ch == '.')
                            && !key.modifiers.contains(KeyModifiers::CONTROL) =>
                    {
                        let mut buffer = self.number_text(row_index, current);
                        buffer.push(ch);
                        self.number_buffer = Some((row_index, buffer.clone()));
                        self.store_number(row.key, &buffer, min)
                    }
                    KeyCode::Backspace => {
                        let mut buffer = self.number_text(row_index, current);
                        buffer.pop();
                        self.number_buffer = Some((row_index, buffer.clone()));
                        self.store_number(row.key, &buffer, min)
                    }
                    KeyCode::Delete => {
                        self.number_buffer = None;
                        self.validation.remove(row.key).is_some()
                    }
                    _ => false,
                }
            }
            SettingKind::Text { .. } => {
                let mut buffer = self
                    .validation
                    .get(row.key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if handle_text_edit(&mut buffer, key) {
                    self.validation
                        .insert(row.key.to_string(), Value::String(buffer));
                    true
                } else {
                    false
                }
            }
            SettingKind::Choice { options, default } => {
                let delta: i32 = match key.code {
                    KeyCode::Left => -1,
                    KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => 1,
                    _ => return false,
                };
                if options.is_empty() {
                    return false;
                }
                let current = self.choice_value(row.key, options, default);
                let index = options
                    .iter()
                    .position(|(value, _)| *value == current)
                    .unwrap_or(0) as i32;
                let len = options.len() as i32;
                let next = (((index + delta) % len) + len) % len;
                self.validation.insert(
                    row.key.to_string(),
                    Value::String(options[next as usize].0.to_string()),
                );
                true
            }
        }
    }

    /// Selected option of a choice row. A number stored under a choice key
    /// selects the `custom` option when the row offers one.
    fn choice_value(
        &self,
        key: &str,
        options: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> &str {
        match self.validation.get(key) {
            Some(Value::String(current)) => current,
            Some(Value::Number(_)) if options.iter().any(|(value, _)| *value == "custom") => {
                "custom"
            }
            _ => default,
        }
    }

    fn number_text(&self, row_index: usize, current: Option<f64>) -> String {
        match &self.number_buffer {
            Some((row, buffer)) if *row == row_index => buffer.clone(),
            _ => current.map(format_number).unwrap_or_default(),
        }
    }

    fn store_number(&mut self, key: &str, buffer: &str, min: Option<f64>) -> bool {
        let trimmed = buffer.trim();
        if trimmed.is_empty() {
            return self.validation.remove(key).is_some();
        }
        let Ok(mut parsed) = trimmed.parse::<f64>() else {
            return false;
        };
        if let Some(min) = min {
            parsed = parsed.max(min);
        }
        self.validation.insert(key.to_string(), number_value(parsed));
        true
    }

    fn row_value(&self, row_index: usize) -> String {
        let row = &self.rows[row_index];
        match &row.kind {
            SettingKind::Toggle => {
                if self
                    .validation
                    .get(row.key)
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
                {
                    "[x]".to_string()
                } else {
                    "[ ]".to_string()
                }
            }
            SettingKind::Number { shown_default, .. } => match &self.number_buffer {
                Some((buffered, buffer)) if *buffered == row_index => buffer.clone(),
                _ => number(&self.validation, row.key)
                    .or(*shown_default)
                    .map(format_number)
                    .unwrap_or_else(|| "—".to_string()),
            },
            SettingKind::Text { placeholder } => self
                .validation
                .get(row.key)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| placeholder.to_string()),
            SettingKind::Choice { options, default } => {
                let current = self.choice_value(row.key, options, default);
                let label = options
                    .iter()
                    .find(|(value, _)| *value == current)
                    .map(|(_, label)| *label)
                    .unwrap_or(current);
                format!("‹ {label} ›")
            }
        }
    }
}

impl FieldConfigure for SettingsEditor {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Validation> {
        match key.code {
            KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down => {
                self.move_selection(1);
                None
            }
            _ => {
                let row = self.current_row()?;
                if !self.edit_row(row, key) {
                    return None;
                }
                if let Some(finalize) = self.finalize {
                    finalize(&mut self.validation);
                }
                let visible = self.visible_rows().len();
                self.selected = self.selected.min(visible.saturating_sub(1));
                Some(self.validation.clone())
            }
        }
    }

    fn validation(&self) -> &Validation {
        &self.validation
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let current = self.current_row();
        self.visible_rows()
            .into_iter()
            .map(|idx| {
                let row = &self.rows[idx];
                let selected = focused && current == Some(idx);
                let marker = if selected { "› " } else { "  " };
                let label_style = if selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(format!("{:<18}", row.label), label_style),
                    Span::raw(self.row_value(idx)),
                ])
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/types/settings_tests.rs"]
mod tests;
