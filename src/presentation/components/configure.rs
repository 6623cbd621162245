use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::types::{hint_line, input_line};

use super::super::icons::DEFAULT_ICON;
use super::super::view::{ConfigureFocus, ConfigureRender, MetaRow, PanelRender};

pub fn render_configure(frame: &mut Frame<'_>, area: Rect, view: &ConfigureRender<'_>) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(columns[0]);

    let add_box = Paragraph::new(add_field_lines(view)).block(
        focus_block("Add New Field", view.focus, &[
            ConfigureFocus::NewName,
            ConfigureFocus::NewType,
        ]),
    );
    frame.render_widget(add_box, left[0]);

    render_field_list(frame, left[1], view);

    let title = match &view.panel {
        Some(panel) => format!("Field: {}", panel.field),
        None => "Field".to_string(),
    };
    let panel_block = focus_block(title, view.focus, &[
        ConfigureFocus::Meta,
        ConfigureFocus::TypeConfig,
    ]);
    let panel = match &view.panel {
        Some(panel) => Paragraph::new(panel_lines(panel, view))
            .wrap(Wrap { trim: false })
            .block(panel_block),
        None => Paragraph::new(hint_line("Add a field to configure it")).block(panel_block),
    };
    frame.render_widget(panel, columns[1]);
}

fn focus_block(title: impl Into<String>, focus: ConfigureFocus, owned: &[ConfigureFocus]) -> Block<'static> {
    let style = if owned.contains(&focus) {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .title(title.into())
        .borders(Borders::ALL)
        .border_style(style)
}

/// Name input, type selector and any error recorded for the typed name.
pub fn add_field_lines(view: &ConfigureRender<'_>) -> Vec<Line<'static>> {
    let mut name_line = input_line(
        view.draft_name,
        "Field name",
        view.focus == ConfigureFocus::NewName,
    );
    name_line.spans.insert(0, Span::raw("Name  "));

    let type_style = if view.focus == ConfigureFocus::NewType {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let type_line = Line::from(vec![
        Span::raw("Type  "),
        Span::styled(format!("‹ {} ›", view.draft_type), type_style),
        Span::styled("  Enter to add", Style::default().fg(Color::DarkGray)),
    ]);

    let mut lines = vec![name_line, type_line];
    if let Some(error) = view.configurator.field_error(view.draft_name) {
        lines.push(Line::from(Span::styled(
            error.message(),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

fn render_field_list(frame: &mut Frame<'_>, area: Rect, view: &ConfigureRender<'_>) {
    let block = focus_block(format!("{} fields", view.title), view.focus, &[ConfigureFocus::Fields]);
    let items = field_items(view);
    if items.is_empty() {
        frame.render_widget(Paragraph::new("No fields yet").block(block), area);
        return;
    }

    let mut state = ListState::default();
    state.select(view.selected.map(|idx| idx.min(items.len() - 1)));
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("» ");
    frame.render_stateful_widget(list, area, &mut state);
}

fn field_items(view: &ConfigureRender<'_>) -> Vec<ListItem<'static>> {
    let dragged = view.configurator.dragged_field();
    view.configurator
        .config()
        .sorted_fields()
        .into_iter()
        .map(|(name, config)| {
            let moving = dragged == Some(name);
            let handle = if moving {
                Span::styled("≡ ", Style::default().fg(Color::Magenta))
            } else {
                Span::styled("⋮ ", Style::default().fg(Color::DarkGray))
            };
            let mut spans = vec![
                handle,
                Span::raw(format!("{} ", view.icons.resolve(config.meta.icon.as_deref()))),
                Span::styled(
                    name.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  {}", config.type_name),
                    Style::default().fg(Color::DarkGray),
                ),
            ];
            if moving {
                spans.push(Span::styled(
                    "  (moving)",
                    Style::default().fg(Color::Magenta),
                ));
            }
            let mut lines = vec![Line::from(spans)];
            if let Some(error) = view.configurator.field_error(name) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", error.message()),
                    Style::default().fg(Color::Red),
                )));
            }
            ListItem::new(lines)
        })
        .collect()
}

/// Meta rows of the selected field followed by its type configuration.
pub fn panel_lines(panel: &PanelRender<'_>, view: &ConfigureRender<'_>) -> Vec<Line<'static>> {
    let meta_focused = view.focus == ConfigureFocus::Meta;
    let mut lines = MetaRow::ALL
        .iter()
        .map(|row| {
            let selected = meta_focused && panel.row == *row;
            let marker = if selected { "› " } else { "  " };
            let label_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut spans = vec![
                Span::raw(marker),
                Span::styled(format!("{:<18}", row.label()), label_style),
            ];
            spans.extend(meta_value(panel, view, *row, selected).spans);
            Line::from(spans)
        })
        .collect::<Vec<_>>();

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Type Configuration",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    lines.extend(
        panel
            .type_configure
            .lines(view.focus == ConfigureFocus::TypeConfig),
    );
    lines
}

fn meta_value(
    panel: &PanelRender<'_>,
    view: &ConfigureRender<'_>,
    row: MetaRow,
    selected: bool,
) -> Line<'static> {
    let meta = &panel.config.meta;
    match row {
        MetaRow::Label => input_line(&meta.label, panel.field, selected),
        MetaRow::Description => input_line(
            meta.description.as_deref().unwrap_or_default(),
            "Optional description",
            selected,
        ),
        MetaRow::Icon => {
            let key = meta.icon.as_deref().unwrap_or(DEFAULT_ICON);
            Line::from(format!("‹ {} {key} ›", view.icons.resolve(Some(key))))
        }
        MetaRow::Type => Line::from(format!("‹ {} ›", panel.config.type_name)),
    }
}
