use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use serde_json::Value;
use textwrap::wrap;

use crate::{
    domain::{FieldConfig, FormMode},
    registry::ObjectTypeRegistry,
    types::RenderContext,
};

use super::super::{icons::IconSet, view::FormRender};
use super::layout::indent;

pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &FormRender<'_>) {
    let block = Block::default()
        .title(format!("{} ({})", form.title, form.session.mode()))
        .borders(Borders::ALL);
    let visible = form.session.visible_fields();
    if visible.is_empty() {
        let message = match form.session.mode() {
            FormMode::View => "Nothing to display",
            _ => "This form has no fields",
        };
        frame.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let content_width = area.width.saturating_sub(6);
    let items = visible
        .iter()
        .enumerate()
        .map(|(idx, (name, config))| {
            let selected = form.selected == Some(idx);
            ListItem::new(form_field_lines(form, name, config, selected, content_width))
        })
        .collect::<Vec<_>>();

    let mut list_state = ListState::default();
    list_state.select(form.selected.map(|idx| idx.min(visible.len() - 1)));

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Lines of one field: header, then the mode's content, then (while
/// editing) the recorded error.
pub fn form_field_lines(
    form: &FormRender<'_>,
    name: &str,
    config: &FieldConfig,
    selected: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let session = form.session;
    let mut lines = header_lines(name, config, form.icons, selected, width);

    match session.mode() {
        FormMode::View => {
            let display = session_value_line(form, name, config);
            lines.extend(indent(display, 2));
        }
        FormMode::Edit => {
            let content = match form.editors.get(name) {
                Some(editor) => editor.lines(selected),
                None => session_value_line(form, name, config).into_iter().collect(),
            };
            lines.extend(indent(content, 2));
            if let Some(message) = session.error(name) {
                lines.extend(error_lines(message, width));
            }
        }
        FormMode::Configure => {}
    }
    lines.push(Line::default());
    lines
}

/// Icon, label and required marker, followed by the wrapped description.
pub fn header_lines(
    name: &str,
    config: &FieldConfig,
    icons: &IconSet,
    selected: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let label_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    };
    let mut header = vec![
        Span::styled(
            format!("{} ", icons.resolve(config.meta.icon.as_deref())),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(config.display_label(name).to_string(), label_style),
    ];
    if config.is_required() {
        header.push(Span::styled(
            " *",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let mut lines = vec![Line::from(header)];
    if let Some(description) = config.meta.description.as_deref()
        && !description.trim().is_empty()
    {
        for segment in wrap(description, width.max(8) as usize) {
            lines.push(Line::from(Span::styled(
                format!("  {segment}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines
}

/// Read-only rendering of `value` through the field's type, for hosts that
/// show single values outside a form.
pub fn value_line(
    registry: &ObjectTypeRegistry,
    config: &FieldConfig,
    value: &Value,
    context: &RenderContext,
) -> Option<Line<'static>> {
    registry
        .get(&config.type_name)?
        .display(value, &config.validation, context)
}

fn session_value_line(form: &FormRender<'_>, name: &str, config: &FieldConfig) -> Option<Line<'static>> {
    form.session.implementation(name)?.display(
        form.session.value(name),
        &config.validation,
        form.context,
    )
}

fn error_lines(message: &str, width: u16) -> Vec<Line<'static>> {
    wrap(message, width.max(8) as usize)
        .into_iter()
        .map(|segment| {
            Line::from(Span::styled(
                format!("  ✗ {segment}"),
                Style::default().fg(Color::Red),
            ))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/presentation/fields_tests.rs"]
mod tests;
