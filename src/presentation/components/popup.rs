use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

use unicode_width::UnicodeWidthStr;

use super::super::view::PopupRender;
use super::layout::popup_rect;

/// Centered picker drawn over the screen. Rows beyond the terminal height are
/// reached by scrolling the selection.
pub fn render_popup(frame: &mut Frame<'_>, popup: PopupRender<'_>) {
    let Some(last) = popup.options.len().checked_sub(1) else {
        return;
    };
    let screen = frame.area();
    let widest = popup
        .options
        .iter()
        .map(|option| option.width() + 2)
        .max()
        .unwrap_or_default()
        .max(popup.title.width());
    let width = (widest as u16).saturating_add(6).min(screen.width.saturating_sub(2).max(1));
    let height = (popup.options.len() as u16)
        .saturating_add(2)
        .clamp(3, screen.height.max(3));
    let area = popup_rect(screen, width, height);

    let items = popup
        .options
        .iter()
        .map(|option| ListItem::new(Line::from(vec![Span::raw(option.clone())])))
        .collect::<Vec<_>>();
    let block = Block::default()
        .title(popup.title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    let mut state = ListState::default().with_selected(Some(popup.selected.min(last)));
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}
