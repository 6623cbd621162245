mod configure;
mod fields;
mod footer;
mod layout;
mod popup;

pub use configure::{add_field_lines, panel_lines, render_configure};
pub use fields::{form_field_lines, header_lines, render_form, value_line};
pub use footer::render_footer;
pub use popup::render_popup;
