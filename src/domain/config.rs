use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Type key every unresolved or missing `type` falls back to.
pub const DEFAULT_TYPE: &str = "string";

/// Type-specific constraint record. Only the owning type implementation
/// interprets its keys.
pub type Validation = Map<String, Value>;

/// Current values of one editing session, keyed by field name.
pub type FormValues = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Ascending sort key. Whole numbers are written without a fraction.
    #[serde(serialize_with = "serialize_order")]
    pub order: f64,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl FieldMeta {
    pub fn new(label: impl Into<String>, order: f64) -> Self {
        Self {
            order,
            label: label.into(),
            description: None,
            icon: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

fn serialize_order<S: Serializer>(order: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if order.fract() == 0.0 && order.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*order as i64)
    } else {
        serializer.serialize_f64(*order)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub validation: Validation,
    pub meta: FieldMeta,
}

impl FieldConfig {
    pub fn new(field: &str, type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            validation: Validation::new(),
            meta: FieldMeta::new(field, 0.0),
        }
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.meta.order = order;
        self
    }

    pub fn with_meta(mut self, meta: FieldMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Label shown in headers; an empty label falls back to the field key.
    pub fn display_label<'a>(&'a self, field: &'a str) -> &'a str {
        if self.meta.label.is_empty() {
            field
        } else {
            &self.meta.label
        }
    }
}

/// Ordered mapping from field name to its configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub fields: IndexMap<String, FieldConfig>,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(name.into(), config);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&FieldConfig> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Fields sorted by `meta.order`; equal orders keep insertion order.
    pub fn sorted_fields(&self) -> Vec<(&str, &FieldConfig)> {
        let mut entries = self
            .fields
            .iter()
            .map(|(name, config)| (name.as_str(), config))
            .collect::<Vec<_>>();
        entries.sort_by(|(_, a), (_, b)| a.meta.order.total_cmp(&b.meta.order));
        entries
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Map::new()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMode {
    View,
    Edit,
    Configure,
}

impl FormMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::View => "view",
            FormMode::Edit => "edit",
            FormMode::Configure => "configure",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to another record, the value shape of the `object` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let id = map.get("id").and_then(value_as_key)?;
        let name = map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| id.clone());
        let description = map
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            id,
            name,
            description,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn value_as_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Build a value map from a JSON document; non-object documents yield an
/// empty map.
pub fn values_from_value(value: &Value) -> FormValues {
    value
        .as_object()
        .map(|map| {
            map.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn values_to_value(values: &FormValues) -> Value {
    Value::Object(
        values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    )
}

/// Loose truthiness used wherever the record format treats "falsy" values
/// (null, false, 0, "") as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
