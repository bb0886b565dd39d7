//! Status Widget
//!
//! Shows the selected file, the analyze action, and the pending/error
//! indicator for the current interaction state.

use crate::controller::{InteractionState, Phase};
use crate::tui::app::{Notice, NoticeLevel};
use crate::tui::theme::{Icons, Theme};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Everything the status panel needs from the app
pub struct StatusView<'a> {
    pub state: &'a InteractionState,
    pub notice: Option<&'a Notice>,
    pub analyze_label: &'a str,
    pub spinner_frame: usize,
    pub last_completed: Option<DateTime<Local>>,
}

/// Render the status panel
pub fn render_status(frame: &mut Frame, area: Rect, view: &StatusView<'_>) {
    let block = Block::default()
        .title(" Analysis ")
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let paragraph =
        Paragraph::new(build_lines(view, inner.width as usize)).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn build_lines(view: &StatusView<'_>, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let state = view.state;

    // File line
    match state.file() {
        Some(file) => lines.push(Line::from(vec![
            Span::raw(format!("{} ", Icons::FILE)),
            Span::styled(
                truncate_string(file.filename(), width.saturating_sub(30)),
                Theme::text(),
            ),
            Span::styled(
                format!("  {} · {}", format_size(file.len()), file.media_type()),
                Theme::text_secondary(),
            ),
        ])),
        None => lines.push(Line::from(Span::styled(
            "No file selected",
            Theme::text_dim(),
        ))),
    }

    // Analyze button
    let button_style = if state.can_analyze() {
        Theme::button()
    } else {
        Theme::button_disabled()
    };
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", view.analyze_label), button_style),
        Span::styled("  Ctrl+R / F5", Theme::text_dim()),
    ]));

    // Outcome line
    match state.phase() {
        Phase::Pending => lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::spinner(view.spinner_frame)), Theme::active()),
            Span::styled("Waiting for the extraction service...", Theme::active()),
        ])),
        Phase::Failed => lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::ERROR), Theme::error()),
            Span::styled(state.error().unwrap_or_default().to_string(), Theme::error()),
        ])),
        Phase::Success => {
            let count = state.result().map(|r| r.len()).unwrap_or(0);
            let mut spans = vec![
                Span::styled(format!("{} ", Icons::COMPLETE), Theme::complete()),
                Span::styled(format!("{} parameters extracted", count), Theme::complete()),
            ];
            if let Some(at) = view.last_completed {
                spans.push(Span::styled(
                    format!(" at {}", at.format("%H:%M:%S")),
                    Theme::text_secondary(),
                ));
            }
            lines.push(Line::from(spans));
        }
        Phase::Idle => {}
    }

    if let Some(notice) = view.notice {
        let style = match notice.level {
            NoticeLevel::Warning => Theme::warning(),
            NoticeLevel::Error => Theme::error(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", Icons::WARNING), style),
            Span::styled(notice.message.clone(), style),
        ]));
    }

    lines
}

fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Truncate a string to fit within a given width
fn truncate_string(s: &str, max_width: usize) -> String {
    let count = s.chars().count();
    if count <= max_width {
        s.to_string()
    } else if max_width > 3 {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max_width).collect()
    }
}
