//! Parameter Table Widget
//!
//! Renders the extracted parameters as aligned `name: value` rows.

use crate::render::ParameterRow;
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the parameter listing. Returns the content height after wrapping
/// so the caller can bound scrolling.
pub fn render_parameters(
    frame: &mut Frame,
    area: Rect,
    rows: &[ParameterRow],
    scroll: u16,
) -> u16 {
    let block = Block::default()
        .title(" Extracted Technical Parameters ")
        .borders(Borders::ALL)
        .border_style(if rows.is_empty() {
            Theme::border()
        } else {
            Theme::border_focused()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph = Paragraph::new(build_lines(rows)).wrap(Wrap { trim: false });
    let height = wrapped_height(&paragraph, inner.width);

    frame.render_widget(paragraph.scroll((scroll, 0)), inner);

    height
}

fn wrapped_height(paragraph: &Paragraph<'_>, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    u16::try_from(paragraph.line_count(width)).unwrap_or(u16::MAX)
}

fn build_lines(rows: &[ParameterRow]) -> Vec<Line<'static>> {
    let name_width = rows
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| {
            let padding = name_width - row.name.chars().count();
            Line::from(vec![
                Span::styled(format!("{}:", row.name), Theme::parameter_name()),
                Span::raw(" ".repeat(padding + 1)),
                Span::styled(row.value.clone(), Theme::text()),
            ])
        })
        .collect()
}
