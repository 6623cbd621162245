use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::{FormConfig, FormValues, normalize_config, values_from_value};

use super::{DocumentError, DocumentFormat, schema::check_config_document};

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .with_context(|| "failed to parse TOML document")
            .and_then(|value| {
                serde_json::to_value(value).context("failed to convert TOML to JSON")
            }),
    }
}

/// Read a document from a file path, or from stdin when `source` is `-`.
///
/// The format is `format` when given, else inferred from the file extension,
/// else JSON.
pub fn read_document(source: &str, format: Option<DocumentFormat>) -> Result<Value> {
    let (contents, inferred) = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read document from stdin")?;
        (buffer, None)
    } else {
        let path = Path::new(source);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        (contents, DocumentFormat::from_path(path))
    };
    let format = format.or(inferred).unwrap_or_default();
    parse_document_str(&contents, format).with_context(|| format!("while loading {source}"))
}

/// Structurally check a raw config document and normalize it.
pub fn load_form_config(document: &Value) -> Result<FormConfig> {
    check_config_document(document)?;
    let config = normalize_config(document);
    tracing::debug!(fields = config.len(), "form config loaded");
    Ok(config)
}

/// Turn a value document into a value map. A `null` document is an empty map.
pub fn load_values(document: &Value) -> Result<FormValues, DocumentError> {
    match document {
        Value::Null => Ok(FormValues::new()),
        Value::Object(_) => Ok(values_from_value(document)),
        _ => Err(DocumentError::NotAnObject),
    }
}
