use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
};
use serde_json::Value;

use crate::domain::Validation;
use crate::registry::{
    FieldConfigure, FieldInput, InputChange, ObjectType, ProbeRequest, Validity,
};

use super::helpers::{
    REQUIRED_MESSAGE, flag, handle_text_edit, hint_line, input_line, text, value_text,
    warning_line,
};
use super::image_probe::{check_source, is_data_uri};
use super::settings::{SettingRow, SettingsEditor};
use super::{RenderContext, TypePalette};

const PREVIEW_SIZES: &[(&str, &str)] = &[
    ("small", "Small (100px)"),
    ("medium", "Medium (200px)"),
    ("large", "Large (300px)"),
];

const ASPECT_RATIOS: &[(&str, &str)] = &[
    ("free", "Free"),
    ("square", "Square (1:1)"),
    ("landscape", "Landscape"),
    ("portrait", "Portrait"),
    ("custom", "Custom Ratio"),
];

const DEFAULT_CUSTOM_RATIO: f64 = 1.5;
const SOURCE_PREVIEW_CHARS: usize = 48;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImageObjectType;

/// Presence check only; dimension constraints are enforced by the input's
/// probe.
pub fn validate_image(value: &Value, validation: &Validation) -> Validity {
    if value_text(value).is_empty() && flag(validation, "required") {
        return Validity::invalid(REQUIRED_MESSAGE);
    }
    Validity::Valid
}

fn preview_line(source: &str, validation: &Validation, palette: &TypePalette) -> Line<'static> {
    let size = palette.image.size_for(text(validation, "previewSize"));
    let shown = if is_data_uri(source) {
        let media = source
            .split_once([';', ','])
            .map(|(media, _)| media)
            .unwrap_or(source);
        format!("{media} ({} bytes inline)", source.len())
    } else if source.chars().count() > SOURCE_PREVIEW_CHARS {
        let head: String = source.chars().take(SOURCE_PREVIEW_CHARS - 1).collect();
        format!("{head}…")
    } else {
        source.to_string()
    };
    Line::from(vec![
        Span::styled(
            format!("[image {size}×{size}] "),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(shown),
    ])
}

/// Custom aspect ratios are stored as a number under `aspectRatio`; the
/// `free` choice removes the key.
fn normalize_aspect_ratio(validation: &mut Validation) {
    match validation.get("aspectRatio").and_then(Value::as_str) {
        Some("free") => {
            validation.remove("aspectRatio");
        }
        Some("custom") => {
            validation.insert("aspectRatio".to_string(), DEFAULT_CUSTOM_RATIO.into());
        }
        _ => {}
    }
}

fn has_custom_ratio(validation: &Validation) -> bool {
    validation.get("aspectRatio").is_some_and(Value::is_number)
}

impl ObjectType for ImageObjectType {
    fn type_name(&self) -> &str {
        "image"
    }

    fn validate(&self, value: &Value, validation: &Validation) -> Validity {
        validate_image(value, validation)
    }

    fn display(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Option<Line<'static>> {
        let source = value_text(value);
        if source.is_empty() {
            return None;
        }
        Some(preview_line(&source, validation, &context.palette))
    }

    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput> {
        Box::new(ImageInput::new(
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
        Box::new(
            SettingsEditor::new(
                validation,
                vec![
                    SettingRow::toggle("required", "Required"),
                    SettingRow::choice("previewSize", "Preview Size", PREVIEW_SIZES, "medium"),
                    SettingRow::choice("aspectRatio", "Aspect Ratio", ASPECT_RATIOS, "free"),
                    SettingRow::number("aspectRatio", "Custom Ratio", Some(DEFAULT_CUSTOM_RATIO))
                        .with_step(0.1, 0.1)
                        .visible_when(has_custom_ratio),
                    SettingRow::count("minWidth", "Min Width (px)", None),
                    SettingRow::count("minHeight", "Min Height (px)", None),
                    SettingRow::count("maxWidth", "Max Width (px)", None),
                    SettingRow::count("maxHeight", "Max Height (px)", None),
                    SettingRow::count("maxSize", "Max Size (bytes)", None),
                ],
            )
            .with_finalize(normalize_aspect_ratio),
        )
    }
}

/// URL or data URI entry. Every edit is emitted at once with the syntax
/// check as its validity, and queues a dimension probe whose outcome
/// arrives later through [`FieldInput::apply_probe`].
#[derive(Debug, Clone)]
pub struct ImageInput {
    buffer: String,
    validation: Validation,
    palette: Arc<TypePalette>,
    warning: Option<String>,
    pending: Option<ProbeRequest>,
    validating: bool,
}

impl ImageInput {
    pub fn new(value: &Value, validation: &Validation, palette: Arc<TypePalette>) -> Self {
        Self {
            buffer: value_text(value),
            validation: validation.clone(),
            palette,
            warning: None,
            pending: None,
            validating: false,
        }
    }

    pub fn is_validating(&self) -> bool {
        self.validating
    }

    fn quick_validity(&self) -> Validity {
        let value = Value::String(self.buffer.clone());
        if let Validity::Invalid(message) = validate_image(&value, &self.validation) {
            return Validity::Invalid(message);
        }
        if self.buffer.is_empty() {
            return Validity::Valid;
        }
        check_source(&self.buffer)
    }
}

impl FieldInput for ImageInput {
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange> {
        if !handle_text_edit(&mut self.buffer, key) {
            return None;
        }
        let quick = self.quick_validity();
        self.warning = quick.message().map(str::to_string);
        if self.buffer.is_empty() || !quick.is_valid() {
            self.pending = None;
            self.validating = false;
        } else {
            self.pending = Some(ProbeRequest {
                source: self.buffer.clone(),
                validation: self.validation.clone(),
            });
            self.validating = true;
        }
        Some(InputChange::new(self.value(), quick.is_valid()))
    }

    fn value(&self) -> Value {
        Value::String(self.buffer.clone())
    }

    fn lines(&self, focused: bool) -> Vec<Line<'static>> {
        let mut lines = vec![input_line(
            &self.buffer,
            "Enter image URL or base64 data",
            focused,
        )];
        if !self.buffer.is_empty() {
            lines.push(preview_line(&self.buffer, &self.validation, &self.palette));
        }
        if let Some(warning) = &self.warning {
            lines.push(warning_line(warning.clone()));
        }
        if self.validating {
            lines.push(hint_line("Validating image..."));
        }
        lines
    }

    fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    fn take_probe_request(&mut self) -> Option<ProbeRequest> {
        self.pending.take()
    }

    fn apply_probe(&mut self, outcome: Validity) -> Option<InputChange> {
        self.validating = false;
        self.warning = outcome.message().map(str::to_string);
        Some(InputChange::new(self.value(), outcome.is_valid()))
    }
}

#[cfg(test)]
#[path = "../tests/types/image_tests.rs"]
mod tests;
