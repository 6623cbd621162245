use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::helpers::{REQUIRED_MESSAGE, flag};
use super::settings::{SettingRow, SettingsEditor};
use super::{RenderContext, TypePalette};

const CYCLE: [&str; 3] = ["", "yes", "no"];

#[derive(Debug, Clone, Copy, Default)]
pub struct YesNoObjectType;

pub fn validate_yes_no(value: &Value, validation: &Validation) -> Validity {
    let answered = matches!(value.as_str(), Some("yes" | "no"));
    if flag(validation, "required") && !answered {
        return Validity::invalid(REQUIRED_MESSAGE);
    }
    Validity::Valid
}

fn badge(value: &Value, palette: &TypePalette) -> Span<'static> {
    let labels = &palette.yes_no;
    let (label, background) = match value.as_str() {
        Some("yes") => (labels.yes_label.to_string(), Color::Blue),
        Some("no") => (labels.no_label.to_string(), Color::Red),
        _ => (labels.unset_label.to_string(), Color::DarkGray),
    };
    Span::styled(
        format!(" {label} "),
        Style::default()
            .fg(Color::White)
            .bg(background)
            .add_modifier(Modifier::BOLD),
    )
}

impl ObjectType for YesNoObjectType {
    fn type_name(&self) -> &str {
        "yesno"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_yes_no(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        _validation: &Validation,
        context: &RenderContext,
    ) -> Option<Line<'static>> {
        Some(Line::from(badge(value, &context.palette)))
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(YesNoInput::new(
            value,
            validation,
            Arc::clone(&context.palette),
        ))
    }

    fn configure(
        &self,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Box<dyn FieldConfigure> {
        Box::new(SettingsEditor::new(
            validation,
            vec![SettingRow::toggle("required", "Required")],
        ))
    }
}

/// Three-way selector cycling `""`, `yes`, `no`.
#[derive(Debug, Clone)]
pub struct YesNoInput {
    index: usize,
    validation: Validation,
    palette: Arc<TypePalette>,
}

impl YesNoInput {
    pub fn new(value: &Value, validation: &Validation, palette: Arc<TypePalette>) -> Self {
        let index = value
            .as_str()
            .and_then(|current| CYCLE.iter().position(|option| *option == current))
            .unwrap_or(0);
        Self {
            index,
            validation: validation.clone(),
            palette,
        }
    }

    fn select(&mut self, index: usize) -> InputChange {
        self.index = index % CYCLE.len();
        let value = self.value();
        let is_valid = validate_yes_no(&value, &self.validation).is_valid();
        InputChange::new(value, is_valid)
    }
}

impl FieldInput for YesNoInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        match key.code {
            KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => {
                Some(self.select(self.index + 1))
            }
            KeyCode::Left => Some(self.select(self.index + CYCLE.len() - 1)),
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(self.select(1)),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(self.select(2)),
            KeyCode::Delete | KeyCode::Backspace if self.index != 0 => Some(self.select(0)),
            _ => None,
        }
    }

    fn value(&self) -> Value {
        Value::String(CYCLE[self.index].to_string())
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let labels = &self.palette.yes_no;
        let options = [
            labels.placeholder.to_string(),
            labels.yes_label.to_string(),
            labels.no_label.to_string(),
        ];
        let spans = options
            .into_iter()
            .enumerate()
            .flat_map(|(idx, label)| {
                let style = if idx == self.index {
                    let accent = if focused { Color::Cyan } else { Color::White };
                    Style::default().fg(accent).add_modifier(Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                [Span::styled(format!(" {label} "), style), Span::raw(" ")]
            })
            .collect::<Vec<_>>();
        vec![Line::from(spans)]
    }
}

#[cfg(test)]
#[path = "../tests/types/yesno_tests.rs"]
mod tests;
