mod object_type;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::domain::DEFAULT_TYPE;
use crate::types::{
    DateTimeObjectType, ImageObjectType, NumberObjectType, ObjectObjectType,
    PercentageObjectType, StringObjectType, YesNoObjectType,
};

pub use object_type::{
    FieldConfigure, FieldInput, InputChange, ObjectType, ProbeRequest, Validity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    BlankTypeName,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::BlankTypeName => write!(f, "object type name cannot be blank"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Mapping from type name to implementation. Built once at startup, then
/// shared read-only (usually behind an `Arc`). There is no removal.
#[derive(Debug, Default)]
pub struct ObjectTypeRegistry {
    types: IndexMap<String, Arc<dyn ObjectType>>,
}

impl ObjectTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in type, `string` first.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [Arc<dyn ObjectType>; 7] = [
            Arc::new(StringObjectType),
            Arc::new(NumberObjectType),
            Arc::new(PercentageObjectType),
            Arc::new(DateTimeObjectType),
            Arc::new(ObjectObjectType),
            Arc::new(ImageObjectType),
            Arc::new(YesNoObjectType),
        ];
        for implementation in builtins {
            let name = implementation.type_name().to_string();
            registry.types.insert(name, implementation);
        }
        registry
    }

    pub fn register(&mut self, implementation: impl ObjectType + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(implementation))
    }

    /// Store `implementation` under its type name. Re-registering a name
    /// replaces the earlier entry and logs a warning.
    pub fn register_arc(&mut self, implementation: Arc<dyn ObjectType>) -> Result<(), RegistryError> {
        let name = implementation.type_name().trim().to_string();
        if name.is_empty() {
            return Err(RegistryError::BlankTypeName);
        }
        if self.types.contains_key(&name) {
            tracing::warn!(type_name = %name, "object type is being overwritten");
        }
        self.types.insert(name, implementation);
        Ok(())
    }

    /// Look up `type_name`, falling back to the `string` implementation.
    /// Returns `None` only when neither is registered.
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn ObjectType>> {
        if let Some(implementation) = self.types.get(type_name) {
            return Some(Arc::clone(implementation));
        }
        tracing::warn!(
            type_name,
            "object type not found, falling back to {DEFAULT_TYPE} type"
        );
        self.types.get(DEFAULT_TYPE).map(Arc::clone)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Owned copy of every registration in registration order.
    pub fn get_all(&self) -> IndexMap<String, Arc<dyn ObjectType>> {
        self.types.clone()
    }

    pub fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/registry/registry_tests.rs"]
mod tests;
