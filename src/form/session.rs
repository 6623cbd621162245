use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::domain::{
    FieldConfig, FormConfig, FormMode, FormValues, is_truthy, normalize_config,
    normalize_form_config,
};
use crate::registry::{ObjectType, ObjectTypeRegistry, Validity};

pub type ValuesListener = Box<dyn FnMut(&FormValues)>;
pub type ValidityListener = Box<dyn FnMut(bool)>;

static NULL: Value = Value::Null;

/// Values, per-field errors and aggregate validity of one form session.
///
/// Changes are only accepted in [`FormMode::Edit`]. Every accepted change is
/// reported to the `on_change` listener with the full value map, and every
/// recomputation of the error map to `on_validation_change`.
pub struct FormSession {
    registry: Arc<ObjectTypeRegistry>,
    config: FormConfig,
    implementations: IndexMap<String, Arc<dyn ObjectType>>,
    mode: FormMode,
    values: FormValues,
    errors: IndexMap<String, String>,
    dirty: bool,
    on_change: Option<ValuesListener>,
    on_validation_change: Option<ValidityListener>,
}

impl fmt::Debug for FormSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSession")
            .field("mode", &self.mode)
            .field("fields", &self.config.len())
            .field("values", &self.values)
            .field("errors", &self.errors)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl FormSession {
    /// Session over a raw `{"fields": {...}}` document.
    pub fn new(registry: Arc<ObjectTypeRegistry>, raw_config: &Value, mode: FormMode) -> Self {
        Self::build(registry, normalize_config(raw_config), mode)
    }

    pub fn from_config(registry: Arc<ObjectTypeRegistry>, config: &FormConfig, mode: FormMode) -> Self {
        Self::build(registry, normalize_form_config(config), mode)
    }

    fn build(registry: Arc<ObjectTypeRegistry>, config: FormConfig, mode: FormMode) -> Self {
        tracing::debug!(fields = config.len(), %mode, "form session created");
        let implementations = config
            .fields
            .iter()
            .filter_map(|(name, field)| {
                let implementation = registry.get(&field.type_name)?;
                Some((name.clone(), implementation))
            })
            .collect();
        Self {
            registry,
            config,
            implementations,
            mode,
            values: FormValues::new(),
            errors: IndexMap::new(),
            dirty: false,
            on_change: None,
            on_validation_change: None,
        }
    }

    pub fn with_initial_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    pub fn on_change(mut self, listener: impl FnMut(&FormValues) + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn on_validation_change(mut self, listener: impl FnMut(bool) + 'static) -> Self {
        self.on_validation_change = Some(Box::new(listener));
        self
    }

    pub fn registry(&self) -> &Arc<ObjectTypeRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Type implementation `field` resolved to when the session was built,
    /// after the registry's `string` fallback.
    pub fn implementation(&self, field: &str) -> Option<&Arc<dyn ObjectType>> {
        self.implementations.get(field)
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FormMode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "form mode changed");
            self.mode = mode;
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Current value of `field`; null when unset.
    pub fn value(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    pub fn errors(&self) -> &IndexMap<String, String> {
        &self.errors
    }

    /// Recorded error for `field`, if it is non-empty.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    pub fn is_valid(&self) -> bool {
        self.errors.values().all(String::is_empty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn sorted_fields(&self) -> Vec<(&str, &FieldConfig)> {
        self.config.sorted_fields()
    }

    /// Fields the renderer shows in the current mode: everything while
    /// editing, only fields holding a truthy value in view mode, nothing in
    /// configure mode (the configurator renders those).
    pub fn visible_fields(&self) -> Vec<(&str, &FieldConfig)> {
        match self.mode {
            FormMode::Edit => self.sorted_fields(),
            FormMode::View => self
                .sorted_fields()
                .into_iter()
                .filter(|(name, _)| is_truthy(self.value(name)))
                .collect(),
            FormMode::Configure => Vec::new(),
        }
    }

    /// Run the field's type validation. Fields missing from the config, or
    /// whose type resolves to nothing, are always valid.
    pub fn validate_field(&self, field: &str, value: &Value) -> Validity {
        let (Some(config), Some(implementation)) =
            (self.config.get(field), self.implementations.get(field))
        else {
            return Validity::Valid;
        };
        implementation.validate(value, &config.validation)
    }

    /// Accept an edit coming from a field input. Ignored outside edit mode;
    /// returns whether the change was applied.
    pub fn handle_field_change(&mut self, field: &str, value: Value, is_valid: bool) -> bool {
        if self.mode != FormMode::Edit {
            tracing::debug!(field, mode = %self.mode, "field change ignored");
            return false;
        }

        let message = if is_valid {
            String::new()
        } else {
            self.validate_field(field, &value).into_message()
        };
        self.values.insert(field.to_string(), value);
        self.dirty = true;
        if let Some(listener) = self.on_change.as_mut() {
            listener(&self.values);
        }

        self.errors.insert(field.to_string(), message);
        self.notify_validity();
        true
    }

    /// Validate every configured field against its current value, record the
    /// results and report aggregate validity.
    pub fn validate_all(&mut self) -> bool {
        let results = self
            .config
            .sorted_fields()
            .into_iter()
            .map(|(name, _)| {
                let message = self.validate_field(name, self.value(name)).into_message();
                (name.to_string(), message)
            })
            .collect::<Vec<_>>();
        self.errors.extend(results);
        self.notify_validity();
        self.is_valid()
    }

    /// Start over from `initial_values`: values replaced, errors and the
    /// dirty flag cleared.
    pub fn reset(&mut self, initial_values: FormValues) {
        tracing::debug!("form session reset");
        self.values = initial_values;
        self.errors.clear();
        self.dirty = false;
        self.notify_validity();
    }

    pub fn into_values(self) -> FormValues {
        self.values
    }

    fn notify_validity(&mut self) {
        let valid = self.is_valid();
        if let Some(listener) = self.on_validation_change.as_mut() {
            listener(valid);
        }
    }
}

#[cfg(test)]
#[path = "../tests/form/session_tests.rs"]
mod tests;
