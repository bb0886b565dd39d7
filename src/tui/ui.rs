//! UI Rendering
//!
//! Main UI layout and rendering logic for the TUI.

use crate::render::render_rows;
use crate::tui::app::{App, View};
use crate::tui::theme::Theme;
use crate::tui::widgets::{self, StatusView};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the main UI
pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Path input
            Constraint::Length(6), // Status
            Constraint::Min(5),    // Parameters
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_input(frame, chunks[1], app);

    let status = StatusView {
        state: app.controller.state(),
        notice: app.notice.as_ref(),
        analyze_label: app.analyze_label(),
        spinner_frame: app.spinner_frame,
        last_completed: app.last_completed,
    };
    widgets::render_status(frame, chunks[2], &status);

    let rows = render_rows(app.controller.state().result());
    let content_height = widgets::render_parameters(frame, chunks[3], &rows, app.scroll_offset);
    app.update_scroll_bounds(content_height, chunks[3].height.saturating_sub(2));

    render_status_bar(frame, chunks[4]);

    if app.view == View::Help {
        render_help(frame);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let title_text = vec![Line::from(vec![
        Span::raw("⚡ "),
        Span::styled("ATR Analyzer", Theme::title()),
        Span::styled(
            format!("  {}", app.config.service.base_url),
            Theme::text_secondary(),
        ),
    ])];

    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

    frame.render_widget(title, area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Document ")
        .borders(Borders::ALL)
        .border_style(if app.view == View::Main {
            Theme::border_focused()
        } else {
            Theme::border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(&app.path_input, inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect) {
    let shortcuts = vec![
        Span::styled(" [Enter]", Theme::shortcut_key()),
        Span::styled(" Select ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+R]", Theme::shortcut_key()),
        Span::styled(" Analyze ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+L]", Theme::shortcut_key()),
        Span::styled(" Clear ", Theme::shortcut_desc()),
        Span::styled("[Ctrl+Q]", Theme::shortcut_key()),
        Span::styled(" Quit ", Theme::shortcut_desc()),
        Span::styled("[F1]", Theme::shortcut_key()),
        Span::styled(" Help", Theme::shortcut_desc()),
    ];

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), area);
}

fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("Enter        ", "Select the typed file"),
        ("Ctrl+R / F5  ", "Analyze the selected file"),
        ("Ctrl+L       ", "Clear the selection"),
        ("↑/↓          ", "Scroll parameters"),
        ("PageUp/Down  ", "Scroll page"),
        ("Esc          ", "Close this help"),
        ("Ctrl+Q       ", "Quit"),
        ("Ctrl+C       ", "Force quit"),
    ];

    let mut help_lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", Theme::heading())),
        Line::from(""),
    ];
    help_lines.extend(entries.iter().map(|(key, desc)| {
        Line::from(vec![
            Span::styled(*key, Theme::shortcut_key()),
            Span::styled(*desc, Theme::text()),
        ])
    }));
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Accepted documents: .pdf, .txt",
        Theme::text_dim(),
    )));

    let paragraph = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused()),
    );

    frame.render_widget(paragraph, area);
}

/// Helper to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ExtractionService, ServiceError};
    use crate::config::Config;
    use crate::models::{ParameterMap, SelectedFile};
    use crate::tui::event::AppAction;
    use async_trait::async_trait;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;

    struct StaticService;

    #[async_trait]
    impl ExtractionService for StaticService {
        async fn extract(&self, _file: &SelectedFile) -> Result<ParameterMap, ServiceError> {
            Ok(vec![("voltage", "5V"), ("current", "2A")].into_iter().collect())
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn test_renders_parameters_in_order() {
        let config = Config::from_vars(|_| None).unwrap();
        let mut app = App::new(config, Arc::new(StaticService));
        app.controller
            .select_file(Some(SelectedFile::from_bytes("atr.pdf", b"%PDF".to_vec())));
        app.controller.analyze().await;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("ATR Analyzer"));
        assert!(text.contains("Extracted Technical Parameters"));
        let voltage = text.find("voltage: 5V").unwrap();
        let current = text.find("current: 2A").unwrap();
        assert!(voltage < current);
    }

    #[tokio::test]
    async fn test_scrolls_past_wrapped_value_to_last_row() {
        let config = Config::from_vars(|_| None).unwrap();
        let mut app = App::new(config, Arc::new(StaticService));

        let mut parameters = ParameterMap::new();
        parameters.insert("location", "x".repeat(400));
        for i in 0..10 {
            parameters.insert(format!("k{}", i), "v");
        }
        parameters.insert("last_param", "END");

        app.controller
            .select_file(Some(SelectedFile::from_bytes("atr.pdf", b"%PDF".to_vec())));
        assert!(app.controller.begin_analysis().is_some());
        app.controller.complete_analysis(Ok(parameters));

        let mut terminal = Terminal::new(TestBackend::new(40, 24)).unwrap();
        for _ in 0..200 {
            terminal.draw(|frame| render(frame, &mut app)).unwrap();
            app.handle_action(AppAction::ScrollDown).await;
        }
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        assert!(app.max_scroll > 3);
        assert_eq!(app.scroll_offset, app.max_scroll);
        let text = buffer_text(&terminal);
        assert!(text.contains("last_param: END"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 60, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 30);
        assert_eq!(popup.x, 20);
    }
}
