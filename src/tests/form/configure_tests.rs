use std::cell::RefCell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn three_fields() -> FormConfigurator {
    FormConfigurator::from_value(&json!({
        "fields": {
            "a": {"type": "string", "meta": {"order": 0}},
            "b": {"type": "number", "meta": {"order": 1}},
            "c": {"type": "yesno", "meta": {"order": 2}}
        }
    }))
}

fn display_order(configurator: &FormConfigurator) -> Vec<(String, i64)> {
    configurator
        .config()
        .sorted_fields()
        .into_iter()
        .map(|(name, field)| (name.to_string(), field.meta.order as i64))
        .collect()
}

#[test]
fn add_field_appends_with_next_order() {
    let mut configurator = three_fields();
    assert!(configurator.add_field("d", "image"));
    let added = configurator.config().get("d").expect("added");
    assert_eq!(added.type_name, "image");
    assert_eq!(added.meta.order, 3.0);
    assert_eq!(added.meta.label, "d");
    assert!(added.validation.is_empty());
}

#[test]
fn add_field_rejects_blank_and_duplicate_names() {
    let mut configurator = three_fields();
    assert!(!configurator.add_field("   ", "string"));
    assert_eq!(configurator.field_error("   "), Some(FieldNameError::Empty));

    assert!(!configurator.add_field("a", "number"));
    assert_eq!(configurator.field_error("a"), Some(FieldNameError::Duplicate));
    assert_eq!(
        FieldNameError::Duplicate.to_string(),
        "Field name must be unique"
    );
    assert_eq!(configurator.config().len(), 3);
    assert_eq!(configurator.config().get("a").map(|f| f.type_name.as_str()), Some("string"));
}

#[test]
fn successful_add_clears_previous_error() {
    let mut configurator = three_fields();
    configurator.remove_field("c");
    assert!(configurator.add_field("c", "string"));
    assert!(configurator.field_errors().is_empty());

    configurator.add_field("c", "string");
    assert_eq!(configurator.field_error("c"), Some(FieldNameError::Duplicate));
    configurator.remove_field("c");
    assert_eq!(configurator.field_error("c"), None);
}

#[test]
fn remove_field_keeps_other_orders() {
    let mut configurator = three_fields();
    assert!(configurator.remove_field("b"));
    assert_eq!(
        display_order(&configurator),
        vec![("a".to_string(), 0), ("c".to_string(), 2)]
    );
    assert!(!configurator.remove_field("b"));
}

#[test]
fn config_change_merges_shallowly() {
    let mut configurator = three_fields();
    let validation = json!({"min": 1}).as_object().cloned().unwrap_or_default();
    assert!(configurator.handle_config_change(
        "b",
        FieldConfigPatch::new().with_validation(validation.clone())
    ));
    let field = configurator.config().get("b").expect("field");
    assert_eq!(field.type_name, "number");
    assert_eq!(field.validation, validation);
    assert_eq!(field.meta.order, 1.0);

    configurator.handle_config_change("b", FieldConfigPatch::new().with_type("percentage"));
    let field = configurator.config().get("b").expect("field");
    assert_eq!(field.type_name, "percentage");
    assert_eq!(field.validation, validation);
}

#[test]
fn config_change_for_unknown_field_is_ignored() {
    let mut configurator = three_fields();
    let before = configurator.config().clone();
    assert!(!configurator.handle_config_change("zzz", FieldConfigPatch::new().with_type("number")));
    assert_eq!(configurator.config(), &before);
}

#[test]
fn reorder_renumbers_densely() {
    let mut configurator = three_fields();
    assert!(configurator.handle_field_order(0, 2));
    assert_eq!(
        display_order(&configurator),
        vec![
            ("b".to_string(), 0),
            ("c".to_string(), 1),
            ("a".to_string(), 2)
        ]
    );
    let keys = configurator.config().fields.keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys, vec!["b", "c", "a"]);
}

#[test]
fn reorder_uses_display_order_and_clamps_target() {
    let mut configurator = FormConfigurator::from_value(&json!({
        "fields": {
            "late": {"type": "string", "meta": {"order": 9}},
            "early": {"type": "string", "meta": {"order": 1}},
            "mid": {"type": "string", "meta": {"order": 5}}
        }
    }));
    assert!(configurator.handle_field_order(0, 99));
    assert_eq!(
        display_order(&configurator),
        vec![
            ("mid".to_string(), 0),
            ("late".to_string(), 1),
            ("early".to_string(), 2)
        ]
    );
    assert!(!configurator.handle_field_order(7, 0));
}

#[test]
fn drag_and_drop_reorders_once() {
    let mut configurator = three_fields();
    configurator.start_drag("c");
    assert_eq!(configurator.dragged_field(), Some("c"));
    assert!(configurator.drop_dragged(0));
    assert_eq!(configurator.dragged_field(), None);
    assert_eq!(display_order(&configurator)[0], ("c".to_string(), 0));

    configurator.start_drag("c");
    assert!(!configurator.drop_dragged(0));
    configurator.start_drag("a");
    configurator.clear_drag();
    assert!(!configurator.drop_dragged(2));
}

#[test]
fn every_mutation_reports_the_full_config() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut configurator =
        three_fields().on_config_change(move |config| sink.borrow_mut().push(config.len()));

    configurator.add_field("d", "string");
    configurator.handle_field_order(3, 0);
    configurator.handle_config_change("a", FieldConfigPatch::new().with_type("number"));
    configurator.remove_field("b");
    configurator.add_field("", "string");

    assert_eq!(*seen.borrow(), vec![4, 4, 4, 3]);
}

#[test]
fn reset_restores_initial_config() {
    let initial = three_fields().config().clone();
    let mut configurator = FormConfigurator::new(&initial);
    configurator.add_field("", "string");
    configurator.start_drag("a");
    configurator.remove_field("a");
    configurator.reset(&initial);
    assert_eq!(configurator.config(), &initial);
    assert!(configurator.field_errors().is_empty());
    assert_eq!(configurator.dragged_field(), None);
}
