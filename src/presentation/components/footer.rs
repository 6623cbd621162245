use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use super::super::view::UiContext;

/// Two rows: the key bindings that apply right now, then the session status.
pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let [keys, status] = Layout::vertical([Constraint::Length(2), Constraint::Length(2)]).areas(area);

    let help = Paragraph::new(format!("Actions: {}", ctx.help.unwrap_or(" ")))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true });
    frame.render_widget(help, keys);
    frame.render_widget(
        Paragraph::new(status_line(ctx)).wrap(Wrap { trim: true }),
        status,
    );
}

fn status_line(ctx: &UiContext<'_>) -> Line<'static> {
    let mut spans = vec![
        Span::raw("Status: "),
        Span::raw(if ctx.status_message.trim().is_empty() {
            "Ready".to_string()
        } else {
            ctx.status_message.to_string()
        }),
    ];
    let dim = Style::default().fg(Color::DarkGray);
    if ctx.dirty {
        spans.push(Span::styled(" • unsaved changes", dim));
    }
    if ctx.error_count > 0 {
        spans.push(Span::styled(format!(" • errors: {}", ctx.error_count), dim));
    }
    if let Some(label) = &ctx.focus_label {
        spans.push(Span::styled(format!(" • focus: {label}"), dim));
    }
    spans.push(Span::raw(" "));
    spans.push(match ctx.error_count {
        0 => Span::styled("[ok]", Style::default().fg(Color::Green)),
        count => Span::styled(
            format!("[! {count}]"),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
    });
    Line::from(spans)
}
