mod configure;
mod error;
mod probe;
mod session;

pub use configure::{ConfigListener, FieldConfigPatch, FormConfigurator};
pub use error::FieldNameError;
pub use probe::ProbeTracker;
pub use session::{FormSession, ValidityListener, ValuesListener};
