use std::fmt;

use crossterm::event::KeyEvent;
use ratatui::text::Line;
use serde_json::Value;

use crate::domain::Validation;
use crate::types::RenderContext;

/// Result of validating one value against its field's constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn invalid(message: impl Into<String>) -> Self {
        Validity::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Validity::Valid => None,
            Validity::Invalid(message) => Some(message),
        }
    }

    /// Error-map representation: empty for valid values.
    pub fn into_message(self) -> String {
        match self {
            Validity::Valid => String::new(),
            Validity::Invalid(message) => message,
        }
    }
}

impl From<Result<(), String>> for Validity {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Validity::Valid,
            Err(message) => Validity::Invalid(message),
        }
    }
}

/// Emitted by an input editor after every edit. `is_valid` is computed by the
/// editor itself.
#[derive(Debug, Clone, PartialEq)]
pub struct InputChange {
    pub value: Value,
    pub is_valid: bool,
}

impl InputChange {
    pub fn new(value: Value, is_valid: bool) -> Self {
        Self { value, is_valid }
    }
}

/// Asynchronous check an editor wants run on its current value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub source: String,
    pub validation: Validation,
}

/// One field type: validation plus its display, input and configure surfaces.
pub trait ObjectType: Send + Sync + fmt::Debug {
    fn type_name(&self) -> &str;

    /// Pure check of `value` against `validation`.
    fn validate(&self, value: &Value, validation: &Validation) -> Validity;

    /// Read-only rendering. Must tolerate null or wrong-shaped values;
    /// `None` renders nothing.
    fn display(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Option<Line<'static>>;

    /// Interactive editor seeded with `value`.
    fn input(
        &self,
        value: &Value,
        validation: &Validation,
        context: &RenderContext,
    ) -> Box<dyn FieldInput>;

    /// Editor for this type's validation object.
    fn configure(&self, validation: &Validation, context: &RenderContext)
    -> Box<dyn FieldConfigure>;
}

pub trait FieldInput: fmt::Debug {
    /// Feed one key; returns the complete new value when the key edited it.
    fn handle_key(&mut self, key: &KeyEvent) -> Option<InputChange>;

    fn value(&self) -> Value;

    fn lines(&self, focused: bool) -> Vec<Line<'static>>;

    /// Visible, non-blocking warning (e.g. a failed image probe).
    fn warning(&self) -> Option<&str> {
        None
    }

    fn take_probe_request(&mut self) -> Option<ProbeRequest> {
        None
    }

    fn apply_probe(&mut self, outcome: Validity) -> Option<InputChange> {
        let _ = outcome;
        None
    }
}

pub trait FieldConfigure: fmt::Debug {
    /// Feed one key; returns the complete replacement validation object when
    /// the key changed it.
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Validation>;

    fn validation(&self) -> &Validation;

    fn lines(&self, focused: bool) -> Vec<Line<'static>>;
}
