use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::helpers::{Numeric, format_number, group_thousands, number_value, numeric, positive};
use super::number::validate_number;
use super::settings::{SettingRow, SettingsEditor};
use super::{RenderContext, TypePalette};

const SLIDER_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct PercentageObjectType;

impl ObjectType for PercentageObjectType {
    fn type_name(&self) -> &str {
        "percentage"
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
        let shown = match numeric(value) {
            Numeric::Number(current) if current != 0.0 => group_thousands(current),
            _ => "0".to_string(),
        };
        Some(Line::from(format!("{shown}%")))
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(PercentageInput::new(
            value,
            validation,
            Arc::clone(&context.palette),
        ))
    }

    fn configure(
        &self,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldConfigure> {
        let defaults = &context.palette.defaults;
        Box::new(SettingsEditor::new(
            validation,
            vec![
                SettingRow::toggle("required", "Required"),
                SettingRow::number("min", "Minimum Value", Some(defaults.percentage_min)),
                SettingRow::number("max", "Maximum Value", Some(defaults.percentage_max)),
            ],
        ))
    }
}

/// Slider between `min || 0` and `max || 100`.
#[derive(Debug, Clone)]
pub struct PercentageInput {
    value: Option<f64>,
    min: f64,
    max: f64,
    validation: Validation,
    palette: Arc<TypePalette>,
}

impl PercentageInput {
    pub fn new(value: &Value, validation: &Validation, palette: Arc<TypePalette>) -> Self {
        let min = positive(validation, "min").unwrap_or(palette.defaults.percentage_min);
        let max = positive(validation, "max").unwrap_or(palette.defaults.percentage_max);
        let value = match numeric(value) {
            Numeric::Number(current) => Some(current),
            _ => None,
        };
        Self {
            value,
            min: min.min(max),
            max: max.max(min),
            validation: validation.clone(),
            palette,
        }
    }

    fn emit(&mut self, next: f64) -> InputChange {
        let next = next.clamp(self.min, self.max);
        self.value = Some(next);
        let value = number_value(next);
        let is_valid = validate_number(&value, &self.validation).is_valid();
        InputChange::new(value, is_valid)
    }
}

impl FieldInput for PercentageInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        let current = self.value.unwrap_or(self.min);
        let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
            self.palette.numeric.step(true)
        } else {
            self.palette.numeric.percentage_step
        };
        match key.code {
            KeyCode::Left => Some(self.emit(current - step)),
            KeyCode::Right => Some(self.emit(current + step)),
            KeyCode::Home => Some(self.emit(self.min)),
            KeyCode::End => Some(self.emit(self.max)),
            _ => None,
        }
    }

    fn value(&self) -> Value {
        self.value.map(number_value).unwrap_or(Value::Null)
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let current = self.value.unwrap_or(self.min);
        let span = (self.max - self.min).max(f64::EPSILON);
        let filled = (((current - self.min) / span) * SLIDER_WIDTH as f64).round() as usize;
        let filled = filled.min(SLIDER_WIDTH);
        let track_color = if focused { Color::Cyan } else { Color::Blue };
        vec![Line::from(vec![
            Span::styled("█".repeat(filled), Style::default().fg(track_color)),
            Span::styled(
                "░".repeat(SLIDER_WIDTH - filled),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(format!(" {}%", format_number(current))),
        ])]
    }
}

#[cfg(test)]
#[path = "../tests/types/percentage_tests.rs"]
mod tests;
