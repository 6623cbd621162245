use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::{ObjectRef, Validation};
use crate::registry::{FieldConfigure, FieldInput, InputChange, ObjectType, Validity};

use super::RenderContext;
use super::helpers::{REQUIRED_MESSAGE, flag, format_number, hint_line, input_line, positive};
use super::settings::{SettingRow, SettingsEditor};

const VISIBLE_CANDIDATES: usize = 5;

/// Records an `object` field can point at. Stands in for an external search
/// service: the host fills it, the picker filters it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectCatalog {
    entries: Vec<ObjectRef>,
}

impl ObjectCatalog {
    pub fn new(entries: Vec<ObjectRef>) -> Self {
        Self { entries }
    }

    /// Catalog from a JSON array of `{id, name, description?}` records;
    /// malformed entries are skipped.
    pub fn from_value(value: &Value) -> Self {
        let entries = value
            .as_array()
            .map(|items| items.iter().filter_map(ObjectRef::from_value).collect())
            .unwrap_or_default();
        Self { entries }
    }

    pub fn with_entry(mut self, entry: ObjectRef) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[ObjectRef] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive match on name, id and description. An empty query
    /// returns everything.
    pub fn search(&self, query: &str) -> Vec<&ObjectRef> {
        let needle = query.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.id.to_lowercase().contains(&needle)
                    || entry
                        .description
                        .as_deref()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectObjectType;

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(id) => id.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

pub fn validate_object(value: &Value, validation: &Validation) -> Validity {
    if is_absent(value) {
        if flag(validation, "required") {
            return Validity::invalid(REQUIRED_MESSAGE);
        }
        return Validity::Valid;
    }

    if flag(validation, "multiple")
        && let Value::Array(items) = value
    {
        let count = items.len() as f64;
        if let Some(min) = positive(validation, "min")
            && count < min
        {
            return Validity::Invalid(format!("Select at least {} objects", format_number(min)));
        }
        if let Some(max) = positive(validation, "max")
            && count > max
        {
            return Validity::Invalid(format!("Select at most {} objects", format_number(max)));
        }
    }
    Validity::Valid
}

fn tag(object: &ObjectRef) -> Span<'static> {
    Span::styled(
        format!(" {} ", object.name),
        Style::default().fg(Color::White).bg(Color::Blue),
    )
}

fn tag_line(objects: &[ObjectRef]) -> Line<'static> {
    let mut spans = Vec::with_capacity(objects.len() * 2);
    for (idx, object) in objects.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(tag(object));
    }
    Line::from(spans)
}

fn deprecated_line(id: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("Object id: {id}. This format is deprecated, please copy the id and reinput it."),
        Style::default().fg(Color::Red),
    ))
}

/// Selection carried by a value: object, array of objects, or nothing.
fn selection_of(value: &Value) -> Vec<ObjectRef> {
    match value {
        Value::Array(items) => items.iter().filter_map(ObjectRef::from_value).collect(),
        Value::Object(_) => ObjectRef::from_value(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

fn count_hint(validation: &Validation) -> Option<String> {
    let min = positive(validation, "min").map(format_number);
    let max = positive(validation, "max").map(format_number);
    match (min, max) {
        (Some(min), Some(max)) => Some(format!("Select between {min} and {max} objects")),
        (Some(min), None) => Some(format!("Select at least {min} objects")),
        (None, Some(max)) => Some(format!("Select up to {max} objects")),
        (None, None) => None,
    }
}

fn drop_count_bounds(validation: &mut Validation) {
    if !flag(validation, "multiple") {
        validation.remove("min");
        validation.remove("max");
    }
}

fn is_multiple(validation: &Validation) -> bool {
    flag(validation, "multiple")
}

impl ObjectType for ObjectObjectType {
    fn type_name(&self) -> &str {
        "object"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_object(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        _validation: &Validation,
        _context: &RenderContext,
    ) -> Option<Line<'static>> {
        match value {
            Value::String(id) if !id.is_empty() => Some(deprecated_line(id)),
            Value::Array(_) | Value::Object(_) => {
                let selection = selection_of(value);
                (!selection.is_empty()).then(|| tag_line(&selection))
            }
            _ => None,
        }
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(ObjectPicker::new(
            value,
            validation,
            Arc::clone(&context.catalog),
        ))
    }

    fn configure(
        &self,
        validation: &Validation,
        _context: &RenderContext,
    ) -> Box<dyn FieldConfigure> {
        Box::new(
            SettingsEditor::new(
                validation,
                vec![
                    SettingRow::toggle("required", "Required"),
                    SettingRow::toggle("multiple", "Allow Multiple"),
                    SettingRow::count("min", "Minimum Objects", Some(0.0))
                        .visible_when(is_multiple),
                    SettingRow::count("max", "Maximum Objects", Some(0.0))
                        .visible_when(is_multiple),
                ],
            )
            .with_finalize(drop_count_bounds),
        )
    }
}

/// Catalog-backed picker. Typing filters candidates, Up/Down highlight,
/// Enter selects, Backspace on an empty query removes the last selection,
/// Delete clears the selection.
#[derive(Debug, Clone)]
pub struct ObjectPicker {
    selected: Vec<ObjectRef>,
    legacy_id: Option<String>,
    query: String,
    highlight: usize,
    validation: Validation,
    catalog: Arc<ObjectCatalog>,
}

impl ObjectPicker {
    pub fn new(value: &Value, validation: &Validation, catalog: Arc<ObjectCatalog>) -> Self {
        let legacy_id = value
            .as_str()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        Self {
            selected: selection_of(value),
            legacy_id,
            query: String::new(),
            highlight: 0,
            validation: validation.clone(),
            catalog,
        }
    }

    fn multiple(&self) -> bool {
        flag(&self.validation, "multiple")
    }

    fn candidates(&self) -> Vec<&ObjectRef> {
        self.catalog.search(&self.query)
    }

    fn at_capacity(&self) -> bool {
        self.multiple()
            && positive(&self.validation, "max")
                .is_some_and(|max| self.selected.len() as f64 >= max)
    }

    fn select_highlighted(&mut self) -> bool {
        let Some(candidate) = self.candidates().get(self.highlight).map(|c| (*c).clone()) else {
            return false;
        };
        if self.multiple() {
            if self.at_capacity() || self.selected.iter().any(|obj| obj.id == candidate.id) {
                return false;
            }
            self.selected.push(candidate);
        } else {
            self.selected = vec![candidate];
        }
        self.legacy_id = None;
        true
    }

    fn change(&self) -> InputChange {
        let value = self.value();
        let is_valid = validate_object(&value, &self.validation).is_valid();
        InputChange::new(value, is_valid)
    }
}

impl FieldInput for ObjectPicker {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        match key.code {
            KeyCode::Up => {
                self.highlight = self.highlight.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                let last = self.candidates().len().saturating_sub(1);
                self.highlight = (self.highlight + 1).min(last);
                None
            }
            KeyCode::Enter => self.select_highlighted().then(|| self.change()),
            KeyCode::Backspace if !self.query.is_empty() => {
                self.query.pop();
                self.highlight = 0;
                None
            }
            KeyCode::Backspace => {
                self.selected.pop()?;
                Some(self.change())
            }
            KeyCode::Delete => {
                if self.selected.is_empty() && self.legacy_id.is_none() {
                    return None;
                }
                self.selected.clear();
                self.legacy_id = None;
                Some(self.change())
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.query.push(ch);
                self.highlight = 0;
                None
            }
            _ => None,
        }
    }

    fn value(&self) -> Value {
        if self.multiple() {
            return Value::Array(self.selected.iter().map(ObjectRef::to_value).collect());
        }
        match (self.selected.last(), &self.legacy_id) {
            (Some(object), _) => object.to_value(),
            (None, Some(id)) => Value::String(id.clone()),
            (None, None) => Value::Null,
        }
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(id) = &self.legacy_id {
            lines.push(deprecated_line(id));
        } else if self.selected.is_empty() {
            lines.push(hint_line("No object selected"));
        } else {
            lines.push(tag_line(&self.selected));
        }

        let placeholder = if self.multiple() {
            "Add Object"
        } else {
            "Select Object"
        };
        lines.push(input_line(&self.query, placeholder, focused));

        if focused {
            let candidates = self.candidates();
            let start = self
                .highlight
                .saturating_sub(VISIBLE_CANDIDATES.saturating_sub(1));
            for (idx, candidate) in candidates
                .iter()
                .enumerate()
                .skip(start)
                .take(VISIBLE_CANDIDATES)
            {
                let chosen = self.selected.iter().any(|obj| obj.id == candidate.id);
                let marker = if idx == self.highlight { "› " } else { "  " };
                let style = if idx == self.highlight {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else if chosen {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };
                let mut spans = vec![
                    Span::raw(marker),
                    Span::styled(candidate.name.clone(), style),
                ];
                if let Some(description) = &candidate.description {
                    spans.push(Span::styled(
                        format!("  {description}"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                lines.push(Line::from(spans));
            }
            if candidates.is_empty() {
                lines.push(hint_line("No matching objects"));
            }
        }

        if self.multiple()
            && let Some(hint) = count_hint(&self.validation)
        {
            lines.push(hint_line(hint));
        }
        lines
    }
}

#[cfg(test)]
#[path = "../tests/types/object_tests.rs"]
mod tests;
