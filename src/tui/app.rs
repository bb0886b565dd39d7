//! Application State
//!
//! Wraps the [`SubmissionController`] with the terminal-only state: the path
//! input, notices, scrolling, and the channel that brings request outcomes
//! back to the event loop.

use crate::client::ExtractionService;
use crate::config::Config;
use crate::controller::{run_extraction, AnalysisOutcome, SubmissionController};
use crate::models::{SelectedFile, ACCEPTED_EXTENSIONS};
use crate::tui::event::AppAction;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tui_textarea::TextArea;

const PATH_PLACEHOLDER: &str = "Path to an ATR document (.pdf or .txt), then Enter";

/// Current view/screen
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    #[default]
    Main,
    Help,
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    AnalysisFinished(AnalysisOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A message about the file input that is not part of the analysis state,
/// e.g. an unreadable path.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Main application state
pub struct App {
    pub config: Config,

    // UI State
    pub view: View,
    pub should_quit: bool,
    pub path_input: TextArea<'static>,
    pub notice: Option<Notice>,
    pub scroll_offset: u16,
    pub max_scroll: u16,
    pub spinner_frame: usize,

    // Analysis State
    pub controller: SubmissionController,
    pub last_completed: Option<DateTime<Local>>,

    event_rx: mpsc::Receiver<AppEvent>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn ExtractionService>) -> Self {
        let (tx, rx) = mpsc::channel(16);

        Self {
            config,
            view: View::Main,
            should_quit: false,
            path_input: Self::empty_input(),
            notice: None,
            scroll_offset: 0,
            max_scroll: 0,
            spinner_frame: 0,
            controller: SubmissionController::new(service),
            last_completed: None,
            event_rx: rx,
            event_tx: tx,
        }
    }

    fn empty_input() -> TextArea<'static> {
        let mut input = TextArea::default();
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(PATH_PLACEHOLDER);
        input
    }

    /// Fill the path field and select it, as if typed and confirmed.
    pub async fn preselect(&mut self, path: PathBuf) {
        let mut input = TextArea::new(vec![path.to_string_lossy().into_owned()]);
        input.set_cursor_line_style(ratatui::style::Style::default());
        input.set_placeholder_text(PATH_PLACEHOLDER);
        input.move_cursor(tui_textarea::CursorMove::End);
        self.path_input = input;
        self.select_from_input().await;
    }

    /// Wait for the next background event
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.event_rx.recv().await
    }

    /// Handle a background event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::AnalysisFinished(outcome) => {
                self.controller.complete_analysis(outcome);
                self.last_completed = Some(Local::now());
                self.scroll_offset = 0;
            }
        }
    }

    /// Handle a user action
    pub async fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::Quit | AppAction::ForceQuit => {
                self.should_quit = true;
            }
            AppAction::SelectFile => {
                if self.view == View::Main {
                    self.select_from_input().await;
                }
            }
            AppAction::Analyze => {
                if self.view == View::Main {
                    self.start_analysis();
                }
            }
            AppAction::ClearSelection => {
                self.controller.select_file(None);
                self.path_input = Self::empty_input();
                self.notice = None;
                self.scroll_offset = 0;
            }
            AppAction::ToggleHelp => {
                self.view = if self.view == View::Help {
                    View::Main
                } else {
                    View::Help
                };
            }
            AppAction::Escape => {
                self.view = View::Main;
            }
            AppAction::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            AppAction::ScrollDown => {
                if self.scroll_offset < self.max_scroll {
                    self.scroll_offset += 1;
                }
            }
            AppAction::ScrollPageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
            }
            AppAction::ScrollPageDown => {
                self.scroll_offset = (self.scroll_offset + 10).min(self.max_scroll);
            }
            AppAction::Input(key_event) => {
                if self.view == View::Main {
                    self.path_input.input(key_event);
                }
            }
            AppAction::Tick => {
                if self.controller.state().is_pending() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
        }
    }

    /// Path currently typed in the input, with `~/` expanded.
    pub fn typed_path(&self) -> Option<PathBuf> {
        let raw = self.path_input.lines().join("");
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if let Some(rest) = raw.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return Some(home.join(rest));
            }
        }
        Some(PathBuf::from(raw))
    }

    async fn select_from_input(&mut self) {
        let Some(path) = self.typed_path() else {
            self.notice = Some(Notice {
                level: NoticeLevel::Warning,
                message: "Type the path of a document first".to_string(),
            });
            return;
        };

        match SelectedFile::load(&path).await {
            Ok(file) => {
                self.notice = if file.has_accepted_extension() {
                    None
                } else {
                    Some(Notice {
                        level: NoticeLevel::Warning,
                        message: format!(
                            "{} is not a .{} file; the service may reject it",
                            file.filename(),
                            ACCEPTED_EXTENSIONS.join(" or .")
                        ),
                    })
                };
                self.controller.select_file(Some(file));
                self.scroll_offset = 0;
            }
            Err(e) => {
                warn!("Could not load {:?}: {}", path, e);
                self.notice = Some(Notice {
                    level: NoticeLevel::Error,
                    message: e.to_string(),
                });
            }
        }
    }

    /// Start a request on a background task. No-op unless a file is
    /// selected and nothing is in flight.
    fn start_analysis(&mut self) {
        let Some(file) = self.controller.begin_analysis() else {
            return;
        };

        self.spinner_frame = 0;
        let tx = self.event_tx.clone();
        let service = self.controller.service();

        tokio::spawn(async move {
            let outcome = run_extraction(service, file).await;
            if tx.send(AppEvent::AnalysisFinished(outcome)).await.is_err() {
                info!("Analysis finished after the UI closed");
            }
        });
    }

    /// Label for the analyze action, mirroring its enabled state.
    pub fn analyze_label(&self) -> &'static str {
        if self.controller.state().is_pending() {
            "Analyzing..."
        } else {
            "Analyze ATR"
        }
    }

    /// Update max scroll based on content
    pub fn update_scroll_bounds(&mut self, content_height: u16, viewport_height: u16) {
        self.max_scroll = content_height.saturating_sub(viewport_height);
        if self.scroll_offset > self.max_scroll {
            self.scroll_offset = self.max_scroll;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ServiceError;
    use crate::controller::Phase;
    use crate::models::ParameterMap;
    use async_trait::async_trait;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct FixedService(Result<ParameterMap, ServiceError>);

    #[async_trait]
    impl ExtractionService for FixedService {
        async fn extract(&self, _file: &SelectedFile) -> Result<ParameterMap, ServiceError> {
            self.0.clone()
        }
    }

    fn test_config() -> Config {
        Config::from_vars(|_| None).unwrap()
    }

    fn app_with(outcome: Result<ParameterMap, ServiceError>) -> App {
        App::new(test_config(), Arc::new(FixedService(outcome)))
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            let key = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            app.handle_action(AppAction::Input(key)).await;
        }
    }

    #[tokio::test]
    async fn test_select_then_analyze_success() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("atr.txt");
        std::fs::write(&path, "Tensiune: 20 kV").unwrap();

        let mut app = app_with(Ok(vec![("voltage", "20 kV")].into_iter().collect()));
        type_text(&mut app, path.to_str().unwrap()).await;
        app.handle_action(AppAction::SelectFile).await;

        assert_eq!(app.controller.state().file().unwrap().filename(), "atr.txt");
        assert!(app.notice.is_none());

        app.handle_action(AppAction::Analyze).await;
        assert_eq!(app.controller.state().phase(), Phase::Pending);
        assert_eq!(app.analyze_label(), "Analyzing...");

        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        let state = app.controller.state();
        assert_eq!(state.phase(), Phase::Success);
        assert_eq!(state.result().unwrap().get("voltage").unwrap().to_string(), "20 kV");
        assert!(app.last_completed.is_some());
        assert_eq!(app.analyze_label(), "Analyze ATR");
    }

    #[tokio::test]
    async fn test_analyze_failure_shows_detail() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("atr.pdf");
        std::fs::write(&path, "%PDF-1.4").unwrap();

        let mut app = app_with(Err(ServiceError::Status {
            status: 422,
            detail: Some("corrupt file".to_string()),
        }));
        app.preselect(path).await;
        app.handle_action(AppAction::Analyze).await;
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert_eq!(app.controller.state().error(), Some("corrupt file"));
        assert!(app.controller.state().result().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_path_sets_notice_and_keeps_state() {
        let mut app = app_with(Ok(ParameterMap::new()));
        type_text(&mut app, "/definitely/not/here.pdf").await;
        app.handle_action(AppAction::SelectFile).await;

        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Error));
        assert!(app.controller.state().file().is_none());
    }

    #[tokio::test]
    async fn test_unexpected_extension_warns_but_selects() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("atr.docx");
        std::fs::write(&path, "binary").unwrap();

        let mut app = app_with(Ok(ParameterMap::new()));
        app.preselect(path).await;

        assert_eq!(app.notice.as_ref().map(|n| n.level), Some(NoticeLevel::Warning));
        assert!(app.controller.state().file().is_some());
    }

    #[tokio::test]
    async fn test_analyze_without_file_is_noop() {
        let mut app = app_with(Ok(ParameterMap::new()));
        app.handle_action(AppAction::Analyze).await;
        assert_eq!(app.controller.state().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn test_clear_selection() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("atr.txt");
        std::fs::write(&path, "x").unwrap();

        let mut app = app_with(Ok(ParameterMap::new()));
        app.preselect(path).await;
        app.handle_action(AppAction::ClearSelection).await;

        assert!(app.controller.state().file().is_none());
        assert!(app.typed_path().is_none());
    }

    #[test]
    fn test_scroll_bounds() {
        let mut app = app_with(Ok(ParameterMap::new()));
        app.scroll_offset = 30;
        app.update_scroll_bounds(40, 15);
        assert_eq!(app.max_scroll, 25);
        assert_eq!(app.scroll_offset, 25);

        app.update_scroll_bounds(5, 15);
        assert_eq!(app.max_scroll, 0);
        assert_eq!(app.scroll_offset, 0);
    }
}
