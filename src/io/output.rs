use std::{
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde_json::Value;

use super::DocumentFormat;

/// Where a finished document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    /// `-` is stdout, anything else a file path.
    pub fn parse(spec: &str) -> Self {
        if spec == "-" {
            OutputDestination::Stdout
        } else {
            OutputDestination::file(spec)
        }
    }

    /// Format implied by a file destination's extension.
    pub fn inferred_format(&self) -> Option<DocumentFormat> {
        match self {
            OutputDestination::Stdout => None,
            OutputDestination::File(path) => DocumentFormat::from_path(path),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::Json)
    }
}

/// Serialize `value` once and write it to every destination.
pub fn emit(value: &Value, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = render_document(value, options.format, options.pretty)?;
    for destination in &options.destinations {
        write_payload(destination, &payload).with_context(|| match destination {
            OutputDestination::Stdout => "failed to write to stdout".to_string(),
            OutputDestination::File(path) => {
                format!("failed to write to file {}", path.display())
            }
        })?;
        tracing::debug!(?destination, %options.format, "document written");
    }
    Ok(())
}

pub fn render_document(value: &Value, format: DocumentFormat, pretty: bool) -> Result<String> {
    match format {
        DocumentFormat::Json => {
            if pretty {
                serde_json::to_string_pretty(value).context("failed to serialize JSON")
            } else {
                serde_json::to_string(value).context("failed to serialize JSON")
            }
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => serde_yaml::to_string(value).context("failed to serialize YAML"),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => {
            if pretty {
                toml::to_string_pretty(value).context("failed to serialize TOML")
            } else {
                toml::to_string(value).context("failed to serialize TOML")
            }
        }
    }
}

fn write_payload(destination: &OutputDestination, payload: &str) -> Result<()> {
    match destination {
        OutputDestination::Stdout => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{payload}")?;
            stdout.flush()?;
        }
        OutputDestination::File(path) => {
            let mut file = File::create(path)?;
            writeln!(file, "{payload}")?;
            file.flush()?;
        }
    }
    Ok(())
}
