/// Structural problem with a field name offered to the configurator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNameError {
    Empty,
    Duplicate,
}

impl FieldNameError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldNameError::Empty => "Field name cannot be empty",
            FieldNameError::Duplicate => "Field name must be unique",
        }
    }
}

impl std::fmt::Display for FieldNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for FieldNameError {}
