#![deny(rust_2018_idioms)]
//! Typed record fields with a pluggable type registry, validation, and
//! terminal view, edit and configure sessions.

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
pub mod presentation;
pub mod registry;
pub mod types;

pub use app::{SessionOutcome, SmartFormUI, UiOptions};
pub use domain::{FieldConfig, FieldMeta, FormConfig, FormMode, FormValues, Validation};
pub use form::{FieldConfigPatch, FieldNameError, FormConfigurator, FormSession};
pub use registry::{ObjectType, ObjectTypeRegistry, RegistryError, Validity};

pub mod prelude {
    pub use super::{
        FieldConfig, FormConfig, FormConfigurator, FormMode, FormSession, FormValues,
        ObjectTypeRegistry, SessionOutcome, SmartFormUI, UiOptions, Validity,
    };
}
