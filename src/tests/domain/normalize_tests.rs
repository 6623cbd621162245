use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::domain::{FieldMeta, FormConfig};

#[test]
fn bare_string_becomes_typed_field() {
    let field = normalize_field("age", &json!("number"));
    assert_eq!(field, FieldConfig::new("age", "number"));
    assert_eq!(field.meta.label, "age");
    assert_eq!(field.meta.order, 0.0);
    assert!(field.validation.is_empty());
}

#[test]
fn legacy_object_drops_validation() {
    let field = normalize_field(
        "title",
        &json!({"type": "string", "validation": {"required": true}}),
    );
    assert_eq!(field.type_name, "string");
    assert!(field.validation.is_empty());
    assert_eq!(field.meta, FieldMeta::new("title", 0.0));
}

#[test]
fn legacy_object_without_type_defaults_to_string() {
    let field = normalize_field("notes", &json!({}));
    assert_eq!(field.type_name, "string");

    let null_meta = normalize_field("notes", &json!({"type": "yesno", "meta": null}));
    assert_eq!(null_meta.type_name, "yesno");
    assert_eq!(null_meta.meta.label, "notes");
}

#[test]
fn missing_meta_discards_validation_even_when_present() {
    let field = normalize_field(
        "age",
        &json!({"type": "number", "validation": {"min": 5}, "meta": null}),
    );
    assert_eq!(field.type_name, "number");
    assert!(field.validation.is_empty());

    let kept = normalize_field(
        "age",
        &json!({"type": "number", "validation": {"min": 5}, "meta": {"label": "Age"}}),
    );
    assert_eq!(kept.validation.get("min"), Some(&json!(5)));
}

#[test]
fn full_object_fills_missing_meta_keys() {
    let field = normalize_field(
        "score",
        &json!({
            "type": "percentage",
            "validation": {"max": 50},
            "meta": {"description": "How far along", "icon": "chart"}
        }),
    );
    assert_eq!(field.type_name, "percentage");
    assert_eq!(field.validation.get("max"), Some(&json!(50)));
    assert_eq!(field.meta.order, 0.0);
    assert_eq!(field.meta.label, "score");
    assert_eq!(field.meta.description.as_deref(), Some("How far along"));
    assert_eq!(field.meta.icon.as_deref(), Some("chart"));
}

#[test]
fn full_object_keeps_explicit_meta() {
    let field = normalize_field(
        "score",
        &json!({"type": "number", "meta": {"order": 4, "label": "Score"}}),
    );
    assert_eq!(field.meta.order, 4.0);
    assert_eq!(field.meta.label, "Score");
    assert!(field.validation.is_empty());
}

#[test]
fn scalar_entries_fall_back_to_string() {
    for raw in [json!(null), json!(3), json!(true)] {
        let field = normalize_field("x", &raw);
        assert_eq!(field, FieldConfig::new("x", "string"));
    }
}

#[test]
fn config_without_fields_is_empty() {
    assert!(normalize_config(&json!({})).is_empty());
    assert!(normalize_config(&json!({"fields": 7})).is_empty());
}

#[test]
fn config_keeps_entry_order_and_leaves_input_untouched() {
    let raw = json!({
        "fields": {
            "zeta": "string",
            "alpha": {"type": "number", "validation": {"min": 1}, "meta": {"order": 1}},
        }
    });
    let before = raw.clone();
    let config = normalize_config(&raw);

    assert_eq!(raw, before);
    let names = config.fields.keys().cloned().collect::<Vec<_>>();
    assert_eq!(names, vec!["zeta".to_string(), "alpha".to_string()]);
}

#[test]
fn normalization_is_idempotent() {
    let raw = json!({
        "fields": {
            "name": "string",
            "legacy": {"type": "number", "validation": {"min": 2}},
            "full": {
                "type": "image",
                "validation": {"previewSize": "small"},
                "meta": {"order": 2, "label": "Photo", "icon": "camera"}
            },
            "odd": 12,
        }
    });
    let once = normalize_config(&raw);
    let twice = normalize_config(&once.to_value());
    assert_eq!(once, twice);
    assert_eq!(normalize_form_config(&twice), once);
}

#[test]
fn fractional_orders_sort_without_rounding() {
    let config = normalize_config(&json!({
        "fields": {
            "c": {"type": "string", "meta": {"order": 0.6}},
            "b": {"type": "string", "meta": {"order": 0.45}},
            "a": {"type": "string", "meta": {"order": 0.4}}
        }
    }));
    let names = config
        .sorted_fields()
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(config.get("b").map(|field| field.meta.order), Some(0.45));
}

#[test]
fn whole_orders_serialize_as_integers() {
    let config = FormConfig::new()
        .with_field("a", FieldConfig::new("a", "string").with_order(2.0))
        .with_field("b", FieldConfig::new("b", "string").with_order(2.5));
    let value = config.to_value();
    assert_eq!(value["fields"]["a"]["meta"]["order"], json!(2));
    assert_eq!(value["fields"]["b"]["meta"]["order"], json!(2.5));
}

#[test]
fn sorted_fields_is_stable_for_equal_orders() {
    let config = FormConfig::new()
        .with_field("b", FieldConfig::new("b", "string").with_order(1.0))
        .with_field("a", FieldConfig::new("a", "string"))
        .with_field("c", FieldConfig::new("c", "string"));
    let order = config
        .sorted_fields()
        .into_iter()
        .map(|(name, _)| name)
        .collect::<Vec<_>>();
    assert_eq!(order, vec!["a", "c", "b"]);
}
