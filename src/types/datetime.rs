use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use crossterm::event::KeyEvent;
use ratatui::text::Line;
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::RenderContext;
use super::helpers::{
    REQUIRED_MESSAGE, flag, handle_text_edit, hint_line, input_line, text, value_text,
    warning_line,
};
use super::settings::{SettingRow, SettingsEditor};

const INPUT_TYPES: &[(&str, &str)] = &[
    ("date", "Date Only"),
    ("datetime", "Date and Time"),
    ("time", "Time Only"),
];

const DISPLAY_MODES: &[(&str, &str)] = &[
    ("date", "Date Only"),
    ("datetime", "Date and Time"),
    ("time", "Time Only"),
    ("fromNow", "Time Ago / From Now"),
];

const LONG_DATE: &str = "%B %-d, %Y";
const LONG_DATETIME: &str = "%A, %B %-d, %Y %-I:%M %p";
const SHORT_TIME: &str = "%-I:%M %p";

#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeObjectType;

/// How a datetime field is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Date,
    DateTime,
    Time,
    FromNow,
}

impl DisplayMode {
    pub fn from_validation(validation: &Validation) -> Self {
        match text(validation, "displayMode") {
            Some("date") => Self::Date,
            Some("time") => Self::Time,
            Some("fromNow") => Self::FromNow,
            _ => Self::DateTime,
        }
    }
}

/// What a datetime field asks the user to type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Date,
    DateTime,
    Time,
}

impl InputKind {
    pub fn from_validation(validation: &Validation) -> Self {
        match text(validation, "type") {
            Some("date") => Self::Date,
            Some("time") => Self::Time,
            _ => Self::DateTime,
        }
    }

    fn edit_format(self) -> &'static str {
        match self {
            Self::Date => "%Y-%m-%d",
            Self::DateTime => "%Y-%m-%dT%H:%M",
            Self::Time => "%H:%M",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Self::Date => "YYYY-MM-DD",
            Self::DateTime => "YYYY-MM-DDTHH:mm",
            Self::Time => "HH:mm",
        }
    }
}

/// Parse the date forms a datetime field accepts. Offsets are converted to
/// local time; time-only input is anchored to 1970-01-01.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Local).naive_local());
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in ["%H:%M:%S%.f", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
            return NaiveDate::from_ymd_opt(1970, 1, 1).map(|epoch| epoch.and_time(time));
        }
    }
    None
}

/// Numbers are epoch milliseconds; strings go through [`parse_datetime`].
fn parse_value(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(raw) => parse_datetime(raw),
        Value::Number(number) => {
            let millis = number.as_i64()?;
            DateTime::from_timestamp_millis(millis)
                .map(|utc| utc.with_timezone(&Local).naive_local())
        }
        _ => None,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(raw) => raw.is_empty(),
        _ => false,
    }
}

pub fn format_long(moment: &NaiveDateTime) -> String {
    moment.format(LONG_DATETIME).to_string()
}

pub fn validate_datetime(value: &Value, validation: &Validation) -> Validity {
    if is_empty(value) {
        if flag(validation, "required") {
            return Validity::invalid(REQUIRED_MESSAGE);
        }
        return Validity::Valid;
    }

    let Some(moment) = parse_value(value) else {
        return Validity::invalid("Invalid date");
    };

    if let Some(min) = text(validation, "min").and_then(parse_datetime)
        && moment < min
    {
        return Validity::Invalid(format!("Date must be after {}", format_long(&min)));
    }
    if let Some(max) = text(validation, "max").and_then(parse_datetime)
        && moment > max
    {
        return Validity::Invalid(format!("Date must be before {}", format_long(&max)));
    }
    Validity::Valid
}

/// Render `moment` in the given mode, relative phrases measured from `now`.
pub fn format_moment(moment: &NaiveDateTime, mode: DisplayMode, now: &NaiveDateTime) -> String {
    match mode {
        DisplayMode::Date => moment.format(LONG_DATE).to_string(),
        DisplayMode::DateTime => format_long(moment),
        DisplayMode::Time => moment.format(SHORT_TIME).to_string(),
        DisplayMode::FromNow => humanize_relative(moment, now),
    }
}

/// Relative phrase such as `3 days ago` or `in an hour`.
pub fn humanize_relative(then: &NaiveDateTime, now: &NaiveDateTime) -> String {
    let delta = then.signed_duration_since(*now);
    let seconds = delta.num_milliseconds() as f64 / 1000.0;
    let phrase = relative_phrase(seconds.abs());
    if seconds > 0.0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn relative_phrase(seconds: f64) -> String {
    let rounded = |unit: f64| (seconds / unit).round() as i64;
    let days_exact = seconds / 86_400.0;

    if rounded(1.0) <= 44 {
        return "a few seconds".to_string();
    }
    if rounded(1.0) <= 89 {
        return "a minute".to_string();
    }
    let minutes = rounded(60.0);
    if minutes <= 44 {
        return format!("{minutes} minutes");
    }
    if minutes <= 89 {
        return "an hour".to_string();
    }
    let hours = rounded(3_600.0);
    if hours <= 21 {
        return format!("{hours} hours");
    }
    if hours <= 35 {
        return "a day".to_string();
    }
    let days = rounded(86_400.0);
    if days <= 25 {
        return format!("{days} days");
    }
    if days <= 45 {
        return "a month".to_string();
    }
    let months = (days_exact / 30.436_875).round() as i64;
    if months <= 10 {
        return format!("{months} months");
    }
    if months <= 17 {
        return "a year".to_string();
    }
    let years = (days_exact / 365.25).round() as i64;
    format!("{years} years")
}

impl ObjectType for DateTimeObjectType {
    fn type_name(&self) -> &str {
        "datetime"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_datetime(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Option<Line<'static>> {
        let moment = parse_value(value)?;
        let now = Local::now().naive_local();
        let mode = DisplayMode::from_validation(validation);
        Some(Line::from(format_moment(&moment, mode, &now)))
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(DateTimeInput::new(value, validation))
    }

    fn configure(
        &self,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Box<dyn FieldConfigure> {
        let not_time_only =
            |validation: &Validation| InputKind::from_validation(validation) != InputKind::Time;
        Box::new(SettingsEditor::new(
            validation,
            vec![
                SettingRow::toggle("required", "Required"),
                SettingRow::choice("type", "Input Type", INPUT_TYPES, "datetime"),
                SettingRow::choice("displayMode", "Display Mode", DISPLAY_MODES, "datetime"),
                SettingRow::text("min", "Minimum Date", "YYYY-MM-DDTHH:mm")
                    .visible_when(not_time_only),
                SettingRow::text("max", "Maximum Date", "YYYY-MM-DDTHH:mm")
                    .visible_when(not_time_only),
            ],
        ))
    }
}

/// Text entry in the field's input format with a live preview line.
#[derive(Debug, Clone)]
pub struct DateTimeInput {
    buffer: String,
    kind: InputKind,
    validation: Validation,
}

impl DateTimeInput {
    pub fn new(value: &Value, validation: &Validation) -> Self {
        let kind = InputKind::from_validation(validation);
        let buffer = match parse_value(value) {
            Some(moment) => moment.format(kind.edit_format()).to_string(),
            None => value_text(value),
        };
        Self {
            buffer,
            kind,
            validation: validation.clone(),
        }
    }
}

impl FieldInput for DateTimeInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        if !handle_text_edit(&mut self.buffer, key) {
            return None;
        }
        let value = Value::String(self.buffer.clone());
        let is_valid = validate_datetime(&value, &self.validation).is_valid();
        Some(InputChange::new(value, is_valid))
    }

    fn value(&self) -> Value {
        Value::String(self.buffer.clone())
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let mut lines = vec![input_line(&self.buffer, self.kind.placeholder(), focused)];
        if self.buffer.trim().is_empty() {
            return lines;
        }
        match parse_datetime(&self.buffer) {
            Some(moment) => lines.push(hint_line(format_long(&moment))),
            None => lines.push(warning_line("Invalid date")),
        }
        lines
    }
}

#[cfg(test)]
#[path = "../tests/types/datetime_tests.rs"]
mod tests;
