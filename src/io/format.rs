use std::{fmt, path::Path, str::FromStr};

use super::DocumentError;

/// Supported data formats for input/output layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
    #[cfg(feature = "toml")]
    Toml,
}

impl DocumentFormat {
    /// Formats compiled into this build.
    pub fn available() -> &'static [DocumentFormat] {
        &[
            DocumentFormat::Json,
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml,
            #[cfg(feature = "toml")]
            DocumentFormat::Toml,
        ]
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(DocumentFormat::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            #[cfg(feature = "toml")]
            "toml" => Some(DocumentFormat::Toml),
            _ => None,
        }
    }

    /// Guess from a file name. Unknown or missing extensions give `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl FromStr for DocumentFormat {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| DocumentError::UnsupportedFormat(s.to_string()))
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            #[cfg(feature = "yaml")]
            DocumentFormat::Yaml => write!(f, "yaml"),
            #[cfg(feature = "toml")]
            DocumentFormat::Toml => write!(f, "toml"),
        }
    }
}
