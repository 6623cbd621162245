use indexmap::IndexMap;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    domain::FieldConfig,
    form::{FormConfigurator, FormSession},
    registry::{FieldConfigure, FieldInput},
    types::RenderContext,
};

use super::{
    components::{render_configure, render_footer, render_form, render_popup},
    icons::IconSet,
};

pub struct UiContext<'a> {
    pub status_message: &'a str,
    pub dirty: bool,
    pub error_count: usize,
    pub help: Option<&'a str>,
    pub focus_label: Option<String>,
    pub popup: Option<PopupRender<'a>>,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub options: &'a [String],
    pub selected: usize,
}

/// What the body area shows.
pub enum ScreenRender<'a> {
    Form(FormRender<'a>),
    Configure(ConfigureRender<'a>),
}

/// View or edit screen: the session plus one live editor per field.
pub struct FormRender<'a> {
    pub title: &'a str,
    pub session: &'a FormSession,
    pub editors: &'a IndexMap<String, Box<dyn FieldInput>>,
    pub context: &'a RenderContext,
    pub icons: &'a IconSet,
    /// Index into the session's visible fields.
    pub selected: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigureFocus {
    NewName,
    NewType,
    Fields,
    Meta,
    TypeConfig,
}

impl ConfigureFocus {
    pub const ORDER: [ConfigureFocus; 5] = [
        ConfigureFocus::NewName,
        ConfigureFocus::NewType,
        ConfigureFocus::Fields,
        ConfigureFocus::Meta,
        ConfigureFocus::TypeConfig,
    ];

    pub fn cycle(self, delta: isize) -> Self {
        let len = Self::ORDER.len() as isize;
        let current = Self::ORDER
            .iter()
            .position(|focus| *focus == self)
            .unwrap_or(0) as isize;
        Self::ORDER[(current + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaRow {
    Label,
    Description,
    Icon,
    Type,
}

impl MetaRow {
    pub const ALL: [MetaRow; 4] = [MetaRow::Label, MetaRow::Description, MetaRow::Icon, MetaRow::Type];

    pub fn label(self) -> &'static str {
        match self {
            MetaRow::Label => "Label",
            MetaRow::Description => "Description",
            MetaRow::Icon => "Icon",
            MetaRow::Type => "Type",
        }
    }

    pub fn step(self, delta: isize) -> Self {
        let current = Self::ALL.iter().position(|row| *row == self).unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, Self::ALL.len() as isize - 1);
        Self::ALL[next as usize]
    }
}

/// Configure screen: add-field box, ordered field list and the detail panel
/// of the selected field.
pub struct ConfigureRender<'a> {
    pub title: &'a str,
    pub configurator: &'a FormConfigurator,
    pub icons: &'a IconSet,
    pub focus: ConfigureFocus,
    pub draft_name: &'a str,
    pub draft_type: &'a str,
    /// Index into the configurator's display order.
    pub selected: Option<usize>,
    pub panel: Option<PanelRender<'a>>,
}

pub struct PanelRender<'a> {
    pub field: &'a str,
    pub config: &'a FieldConfig,
    pub row: MetaRow,
    pub type_configure: &'a dyn FieldConfigure,
}

pub fn draw(frame: &mut Frame<'_>, screen: ScreenRender<'_>, ctx: UiContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(7), Constraint::Length(4)])
        .split(frame.area());

    match &screen {
        ScreenRender::Form(form) => render_form(frame, chunks[0], form),
        ScreenRender::Configure(configure) => render_configure(frame, chunks[0], configure),
    }
    render_footer(frame, chunks[1], &ctx);

    if let Some(popup) = ctx.popup {
        render_popup(frame, popup);
    }
}
