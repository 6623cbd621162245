use serde_json::{Map, Value};

use super::config::{DEFAULT_TYPE, FieldConfig, FieldMeta, FormConfig, is_truthy};

/// Bring one raw field entry into the canonical `{type, validation, meta}`
/// shape.
///
/// Three input shapes are recognised:
/// * a bare type string,
/// * a legacy object whose `meta` is missing or null; its `validation`
///   content is discarded even when present,
/// * a full object, whose missing `meta` keys are defaulted.
///
/// Anything else is treated like the legacy shape.
pub fn normalize_field(field: &str, raw: &Value) -> FieldConfig {
    match raw {
        Value::String(type_name) => FieldConfig::new(field, type_name.clone()),
        Value::Object(map) if is_legacy_shape(map) => FieldConfig::new(field, type_of(map)),
        Value::Object(map) => FieldConfig {
            type_name: type_of(map),
            validation: map
                .get("validation")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            meta: meta_of(field, map.get("meta")),
        },
        _ => FieldConfig::new(field, DEFAULT_TYPE),
    }
}

/// Normalize every entry under `fields` into a new config. The input is only
/// read; a missing or non-object `fields` yields an empty config.
pub fn normalize_config(raw: &Value) -> FormConfig {
    let fields = raw
        .get("fields")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .iter()
                .map(|(name, entry)| (name.clone(), normalize_field(name, entry)))
                .collect()
        })
        .unwrap_or_default();
    FormConfig { fields }
}

/// Re-run normalization over an already typed config.
pub fn normalize_form_config(config: &FormConfig) -> FormConfig {
    normalize_config(&config.to_value())
}

// Entries written before `meta` existed carry no usable display metadata;
// their whole shape is rebuilt, including `validation`.
fn is_legacy_shape(map: &Map<String, Value>) -> bool {
    !map.get("meta").is_some_and(is_truthy)
}

fn type_of(map: &Map<String, Value>) -> String {
    map.get("type")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_TYPE)
        .to_string()
}

fn meta_of(field: &str, raw: Option<&Value>) -> FieldMeta {
    let meta = raw.and_then(Value::as_object);
    let lookup = |key: &str| meta.and_then(|meta| meta.get(key));
    let order = lookup("order")
        .and_then(Value::as_f64)
        .filter(|order| order.is_finite())
        .unwrap_or(0.0);
    let label = lookup("label")
        .and_then(Value::as_str)
        .unwrap_or(field)
        .to_string();
    FieldMeta {
        order,
        label,
        description: lookup("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        icon: lookup("icon").and_then(Value::as_str).map(str::to_string),
    }
}

#[cfg(test)]
#[path = "../tests/domain/normalize_tests.rs"]
mod tests;
