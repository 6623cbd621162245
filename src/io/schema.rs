use std::collections::BTreeMap;

use anyhow::{Context, Result};
use jsonschema::validator_for;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DocumentError;

/// Shape of a form config document as it may appear on disk, before
/// normalization. Every part is optional; the normalizer fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Smart form config")]
pub struct RawFormConfig {
    /// Field name to field entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, RawField>>,
}

/// One entry under `fields`: a bare type name or an object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawField {
    TypeName(String),
    Entry(RawFieldEntry),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawFieldEntry {
    /// Registered type name; `string` when missing.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Type specific rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Map<String, Value>>,
    /// Display metadata. Entries without it are read in the legacy shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<RawFieldMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct RawFieldMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Key into the icon table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// JSON Schema accepted for config documents.
pub fn config_schema() -> Result<Value> {
    serde_json::to_value(schema_for!(RawFormConfig)).context("failed to render config schema")
}

/// Check `document` against [`config_schema`]. Structural problems are
/// collected, not reported one at a time.
pub fn check_config_document(document: &Value) -> Result<()> {
    let schema = config_schema()?;
    let validator = validator_for(&schema).context("failed to compile config schema")?;
    let issues = validator
        .iter_errors(document)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect::<Vec<_>>();
    if issues.is_empty() {
        Ok(())
    } else {
        tracing::debug!(issues = issues.len(), "config document rejected");
        Err(DocumentError::Structure(issues).into())
    }
}
