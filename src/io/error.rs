use std::{error::Error, fmt};

/// Structural problems with a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The document does not match the config document schema. Each entry is
    /// `<pointer>: <message>`.
    Structure(Vec<String>),
    /// A value document whose root is not an object.
    NotAnObject,
    UnsupportedFormat(String),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentError::Structure(issues) => {
                write!(f, "invalid form config document ({} issue(s))", issues.len())?;
                for issue in issues {
                    write!(f, "\n  {issue}")?;
                }
                Ok(())
            }
            DocumentError::NotAnObject => f.write_str("value document must be an object"),
            DocumentError::UnsupportedFormat(name) => {
                write!(f, "unsupported document format '{name}'")
            }
        }
    }
}

impl Error for DocumentError {}
