use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde_json::{Number, Value};

use crate::domain::Validation;

pub(crate) const REQUIRED_MESSAGE: &str = "This field is required";

pub(crate) fn flag(validation: &Validation, key: &str) -> bool {
    validation.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Numeric constraint; numeric strings are accepted.
pub(crate) fn number(validation: &Validation, key: &str) -> Option<f64> {
    match validation.get(key)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Numeric constraint where zero means "unset".
pub(crate) fn positive(validation: &Validation, key: &str) -> Option<f64> {
    number(validation, key).filter(|value| *value != 0.0 && !value.is_nan())
}

pub(crate) fn text<'a>(validation: &'a Validation, key: &str) -> Option<&'a str> {
    validation
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

pub(crate) enum Numeric {
    Absent,
    Number(f64),
    NotANumber,
}

pub(crate) fn numeric(value: &Value) -> Numeric {
    match value {
        Value::Null => Numeric::Absent,
        Value::Number(number) => number
            .as_f64()
            .map(Numeric::Number)
            .unwrap_or(Numeric::NotANumber),
        Value::String(text) if text.trim().is_empty() => Numeric::Absent,
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Numeric::Number)
            .unwrap_or(Numeric::NotANumber),
        _ => Numeric::NotANumber,
    }
}

/// Render a number without a trailing `.0` for integral values.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Thousands-grouped rendering with at most three fraction digits.
pub(crate) fn group_thousands(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let negative = rounded < 0.0;
    let text = format_number(rounded.abs());
    let (integral, fraction) = match text.split_once('.') {
        Some((integral, fraction)) => (integral.to_string(), Some(fraction.to_string())),
        None => (text, None),
    };
    let mut grouped = String::with_capacity(integral.len() + integral.len() / 3);
    for (idx, ch) in integral.chars().enumerate() {
        if idx > 0 && (integral.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(&fraction);
    }
    out
}

/// JSON number for `value`, integral when possible.
pub(crate) fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

pub(crate) fn handle_text_edit(buffer: &mut String, key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                return false;
            }
            buffer.push(ch);
            true
        }
        KeyCode::Backspace => buffer.pop().is_some(),
        KeyCode::Delete => {
            if buffer.is_empty() {
                return false;
            }
            buffer.clear();
            true
        }
        _ => false,
    }
}

pub(crate) fn input_line(text: &str, placeholder: &str, focused: bool) -> Line<'static> {
    let mut spans = Vec::with_capacity(2);
    if text.is_empty() {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        let style = if focused {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(text.to_string(), style));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
    }
    Line::from(spans)
}

pub(crate) fn hint_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

pub(crate) fn warning_line(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::Red)))
}

/// Flatten a line into plain text; handy for assertions and status output.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect::<String>()
}
