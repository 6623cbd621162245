mod components;
mod icons;
mod view;

pub use components::{
    add_field_lines, form_field_lines, header_lines, panel_lines, value_line,
};
pub use icons::{DEFAULT_ICON, IconSet};
pub use view::{
    ConfigureFocus, ConfigureRender, FormRender, MetaRow, PanelRender, PopupRender, ScreenRender,
    UiContext, draw,
};

#[cfg(test)]
#[path = "../tests/presentation/view_tests.rs"]
mod tests;
