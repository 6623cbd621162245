use crossterm::event::KeyEvent;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::RenderContext;
use super::helpers::{REQUIRED_MESSAGE, flag, handle_text_edit, input_line, positive, text, value_text};
use super::settings::{SettingRow, SettingsEditor};

#[derive(Debug, Clone, Copy, Default)]
pub struct StringObjectType;

pub fn validate_string(value: &Value, validation: &Validation) -> Validity {
    let contents = value_text(value);
    if flag(validation, "required") && contents.is_empty() {
        return Validity::invalid(REQUIRED_MESSAGE);
    }

    let length = contents.chars().count() as f64;
    if let Some(min) = positive(validation, "minLength")
        && length < min
    {
        return Validity::Invalid(format!("Minimum length is {min} characters"));
    }
    if let Some(max) = positive(validation, "maxLength")
        && length > max
    {
        return Validity::Invalid(format!("Maximum length is {max} characters"));
    }

    if let Some(pattern) = text(validation, "regex") {
        let Ok(regex) = Regex::new(pattern) else {
            return Validity::Invalid(format!("Invalid pattern: {pattern}"));
        };
        if !regex.is_match(&contents) {
            return Validity::invalid(text(validation, "regexMessage").unwrap_or("Invalid format"));
        }
    }

    Validity::Valid
}

impl ObjectType for StringObjectType {
    fn type_name(&self) -> &str {
        "string"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_string(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        _validation: &Validation,
        _context: &RenderContext,
    ) -> Option<Line<'static>> {
        let contents = value_text(value);
        if contents.starts_with("http") {
            return Some(Line::from(Span::styled(
                contents,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::UNDERLINED),
            )));
        }
        Some(Line::from(contents))
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(StringInput::new(value, validation))
    }

    fn configure(
        &self,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldConfigure> {
        let max_default = context.palette.defaults.string_max_length;
        Box::new(SettingsEditor::new(
            validation,
            vec![
                SettingRow::toggle("required", "Required"),
                SettingRow::count("minLength", "Minimum Length", Some(0.0)),
                SettingRow::count("maxLength", "Maximum Length", Some(max_default)),
                SettingRow::text("regex", "Regex Pattern", "regex pattern"),
                SettingRow::text("regexMessage", "Regex Error Message", ""),
            ],
        ))
    }
}

#[derive(Debug, Clone)]
pub struct StringInput {
    buffer: String,
    validation: Validation,
}

impl StringInput {
    pub fn new(value: &Value, validation: &Validation) -> Self {
        Self {
            buffer: value_text(value),
            validation: validation.clone(),
        }
    }

    fn max_length(&self) -> Option<usize> {
        positive(&self.validation, "maxLength").map(|max| max.max(0.0) as usize)
    }
}

impl FieldInput for StringInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        let mut next = self.buffer.clone();
        if !handle_text_edit(&mut next, key) {
            return None;
        }
        if let Some(max) = self.max_length()
            && next.chars().count() > max
            && next.len() > self.buffer.len()
        {
            return None;
        }
        self.buffer = next;
        let value = Value::String(self.buffer.clone());
        let is_valid = validate_string(&value, &self.validation).is_valid();
        Some(InputChange::new(value, is_valid))
    }

    fn value(&self) -> Value {
        Value::String(self.buffer.clone())
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        vec![input_line(&self.buffer, "", focused)]
    }
}

#[cfg(test)]
#[path = "../tests/types/string_tests.rs"]
mod tests;
