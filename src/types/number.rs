use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::Line;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::Validation;
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::helpers::{
    Numeric, REQUIRED_MESSAGE, flag, format_number, group_thousands, handle_text_edit,
    input_line, number, number_value, numeric, value_text,
};
use super::settings::{SettingRow, SettingsEditor};
use super::{RenderContext, TypePalette};

#[derive(Debug, Clone, Copy, Default)]
pub struct NumberObjectType;

/// Shared by `number` and `percentage`: `required` treats only null/absent
/// as missing, `min`/`max` are inclusive.
pub fn validate_number(value: &Value, validation: &Validation) -> Validity {
    let current = match numeric(value) {
        Numeric::Absent => {
            if flag(validation, "required") {
                return Validity::invalid(REQUIRED_MESSAGE);
            }
            return Validity::Valid;
        }
        Numeric::NotANumber => return Validity::invalid("Value must be a number"),
        Numeric::Number(current) => current,
    };

    if let Some(min) = number(validation, "min")
        && current < min
    {
        return Validity::Invalid(format!("Minimum value is {}", format_number(min)));
    }
    if let Some(max) = number(validation, "max")
        && current > max
    {
        return Validity::Invalid(format!("Maximum value is {}", format_number(max)));
    }
    Validity::Valid
}

impl ObjectType for NumberObjectType {
    fn type_name(&self) -> &str {
        "number"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_number(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        _validation: &Validation,
        _context: &RenderContext,
    ) -> Option<Line<'static>> {
        match numeric(value) {
            Numeric::Absent => None,
            Numeric::Number(current) => Some(Line::from(group_thousands(current))),
            Numeric::NotANumber => Some(Line::from(value_text(value))),
        }
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(NumberInput::new(
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
            vec![
                SettingRow::toggle("required", "Required"),
                SettingRow::number("min", "Minimum Value", None),
                SettingRow::number("max", "Maximum Value", None),
            ],
        ))
    }
}

/// Free-form numeric entry. Unparseable text counts as 0, Left/Right step
/// by the palette tuning (Shift for the fast step).
#[derive(Debug, Clone)]
pub struct NumberInput {
    buffer: String,
    validation: Validation,
    palette: Arc<TypePalette>,
}

impl NumberInput {
    pub fn new(value: &Value, validation: &Validation, palette: Arc<TypePalette>) -> Self {
        Self {
            buffer: value_text(value),
            validation: validation.clone(),
            palette,
        }
    }

    fn parsed(&self) -> f64 {
        parse_lenient(&self.buffer)
    }
}

impl FieldInput for NumberInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        match key.code {
            KeyCode::Left | KeyCode::Right => {
                let fast = key.modifiers.contains(KeyModifiers::SHIFT);
                let step = self.palette.numeric.step(fast);
                let delta = if key.code == KeyCode::Left { -step } else { step };
                self.buffer = format_number(self.parsed() + delta);
            }
            KeyCode::Char(ch)
                if !(ch.is_ascii_digit() || matches!(ch, '-' | '.' | 'e' | 'E')) =>
            {
                return None;
            }
            _ => {
                if !handle_text_edit(&mut self.buffer, key) {
                    return None;
                }
            }
        }
        let value = number_value(self.parsed());
        let is_valid = validate_number(&value, &self.validation).is_valid();
        Some(InputChange::new(value, is_valid))
    }

    fn value(&self) -> Value {
        number_value(self.parsed())
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        vec![input_line(&self.buffer, "0", focused)]
    }
}

fn parse_lenient(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "../tests/types/number_tests.rs"]
mod tests;
