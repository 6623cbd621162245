use ratatui::{
    layout::Rect,
    text::{Line, Span},
};

/// Rectangle of at most `width` x `height` centered in `area`.
pub fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Prefix every line with `width` spaces.
pub fn indent(lines: impl IntoIterator<Item = Line<'static>>, width: usize) -> Vec<Line<'static>> {
    let pad = " ".repeat(width);
    lines
        .into_iter()
        .map(|mut line| {
            line.spans.insert(0, Span::raw(pad.clone()));
            line
        })
        .collect()
}
