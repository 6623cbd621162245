pub(crate) mod input;
pub(crate) mod keymap;
mod options;
mod popup;
mod probe_worker;
mod runtime;
mod smart_form;
mod status;
mod terminal;

pub use options::UiOptions;
pub use runtime::SessionOutcome;
pub use smart_form::SmartFormUI;
