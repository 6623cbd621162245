//! Loading config and value documents, and writing results back out.

mod error;
mod format;
mod input;
mod output;
mod schema;

pub use error::DocumentError;
pub use format::DocumentFormat;
pub use input::{load_form_config, load_values, parse_document_str, read_document};
pub use output::{OutputDestination, OutputOptions, emit, render_document};
pub use schema::{
    RawField, RawFieldEntry, RawFieldMeta, RawFormConfig, check_config_document, config_schema,
};
