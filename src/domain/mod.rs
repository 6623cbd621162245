mod config;
mod normalize;

pub use config::{
    DEFAULT_TYPE, FieldConfig, FieldMeta, FormConfig, FormMode, FormValues, ObjectRef, Validation,
    is_truthy, values_from_value, values_to_value,
};
pub use normalize::{normalize_config, normalize_field, normalize_form_config};
