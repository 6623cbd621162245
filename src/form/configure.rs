use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{
    FieldConfig, FieldMeta, FormConfig, Validation, normalize_config, normalize_form_config,
};

use super::error::FieldNameError;

pub type ConfigListener = Box<dyn FnMut(&FormConfig)>;

/// Partial update of one field; present parts replace the field's parts
/// wholesale, absent parts are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConfigPatch {
    pub type_name: Option<String>,
    pub validation: Option<Validation>,
    pub meta: Option<FieldMeta>,
}

impl FieldConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.type_name.is_none() && self.validation.is_none() && self.meta.is_none()
    }

    fn apply(self, field: &mut FieldConfig) {
        if let Some(type_name) = self.type_name {
            field.type_name = type_name;
        }
        if let Some(validation) = self.validation {
            field.validation = validation;
        }
        if let Some(meta) = self.meta {
            field.meta = meta;
        }
    }
}

/// Editing engine behind configure mode: add, remove, retype and reorder
/// fields. Every mutation reports the complete config to `on_config_change`.
pub struct FormConfigurator {
    config: FormConfig,
    field_errors: IndexMap<String, FieldNameError>,
    dragged: Option<String>,
    on_config_change: Option<ConfigListener>,
}

impl fmt::Debug for FormConfigurator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormConfigurator")
            .field("config", &self.config)
            .field("field_errors", &self.field_errors)
            .field("dragged", &self.dragged)
            .finish()
    }
}

impl FormConfigurator {
    pub fn new(initial: &FormConfig) -> Self {
        Self::build(normalize_form_config(initial))
    }

    pub fn from_value(raw: &Value) -> Self {
        Self::build(normalize_config(raw))
    }

    fn build(config: FormConfig) -> Self {
        Self {
            config,
            field_errors: IndexMap::new(),
            dragged: None,
            on_config_change: None,
        }
    }

    pub fn on_config_change(mut self, listener: impl FnMut(&FormConfig) + 'static) -> Self {
        self.on_config_change = Some(Box::new(listener));
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn into_config(self) -> FormConfig {
        self.config
    }

    pub fn field_errors(&self) -> &IndexMap<String, FieldNameError> {
        &self.field_errors
    }

    pub fn field_error(&self, name: &str) -> Option<FieldNameError> {
        self.field_errors.get(name).copied()
    }

    fn check_name(&self, name: &str) -> Result<(), FieldNameError> {
        if name.trim().is_empty() {
            return Err(FieldNameError::Empty);
        }
        if self.config.contains(name) {
            return Err(FieldNameError::Duplicate);
        }
        Ok(())
    }

    /// Append a field named `name` of type `type_name`. On rejection the
    /// reason is recorded under the attempted name and `false` is returned.
    pub fn add_field(&mut self, name: &str, type_name: &str) -> bool {
        if let Err(error) = self.check_name(name) {
            tracing::debug!(field = name, %error, "field rejected");
            self.field_errors.insert(name.to_string(), error);
            return false;
        }
        let order = self.config.len() as f64;
        self.config.fields.insert(
            name.to_string(),
            FieldConfig::new(name, type_name).with_order(order),
        );
        self.field_errors.shift_remove(name);
        self.notify();
        true
    }

    /// Delete `name`. Remaining orders are left untouched.
    pub fn remove_field(&mut self, name: &str) -> bool {
        self.field_errors.shift_remove(name);
        if self.config.fields.shift_remove(name).is_none() {
            return false;
        }
        if self.dragged.as_deref() == Some(name) {
            self.dragged = None;
        }
        self.notify();
        true
    }

    /// Merge `patch` into an existing field. Unknown fields are ignored.
    pub fn handle_config_change(&mut self, field: &str, patch: FieldConfigPatch) -> bool {
        let Some(existing) = self.config.fields.get_mut(field) else {
            tracing::warn!(field, "config change for unknown field ignored");
            return false;
        };
        patch.apply(existing);
        self.notify();
        true
    }

    /// Move the field at `source` (in display order) to `target` and
    /// renumber every field densely from zero.
    pub fn handle_field_order(&mut self, source: usize, target: usize) -> bool {
        let mut ordered = self
            .config
            .sorted_fields()
            .into_iter()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>();
        if source >= ordered.len() {
            return false;
        }
        let target = target.min(ordered.len() - 1);
        let moved = ordered.remove(source);
        ordered.insert(target, moved);

        let mut previous = std::mem::take(&mut self.config.fields);
        for (index, name) in ordered.into_iter().enumerate() {
            if let Some(mut field) = previous.shift_remove(&name) {
                field.meta.order = index as f64;
                self.config.fields.insert(name, field);
            }
        }
        self.notify();
        true
    }

    pub fn start_drag(&mut self, name: &str) {
        self.dragged = Some(name.to_string());
    }

    pub fn dragged_field(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn clear_drag(&mut self) {
        self.dragged = None;
    }

    /// Drop the dragged field at display position `target`, then end the
    /// drag. Returns whether anything moved.
    pub fn drop_dragged(&mut self, target: usize) -> bool {
        let Some(dragged) = self.dragged.take() else {
            return false;
        };
        let source = self
            .config
            .sorted_fields()
            .iter()
            .position(|(name, _)| *name == dragged);
        match source {
            Some(source) if source != target => self.handle_field_order(source, target),
            _ => false,
        }
    }

    /// Replace the config with `initial` and clear errors and drag state.
    pub fn reset(&mut self, initial: &FormConfig) {
        self.config = normalize_form_config(initial);
        self.field_errors.clear();
        self.dragged = None;
    }

    fn notify(&mut self) {
        if let Some(listener) = self.on_config_change.as_mut() {
            listener(&self.config);
        }
    }
}

#[cfg(test)]
#[path = "../tests/form/configure_tests.rs"]
mod tests;
