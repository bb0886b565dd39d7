//! Event Handling
//!
//! Maps keyboard and timer events to analyzer actions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::{FutureExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Force quit without confirmation
    ForceQuit,
    /// Select the file whose path is in the input (Enter)
    SelectFile,
    /// Submit the selected file for analysis
    Analyze,
    /// Clear the current selection
    ClearSelection,
    /// Toggle help view
    ToggleHelp,
    /// Escape - close modals
    Escape,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    /// Regular input character for the path field
    Input(KeyEvent),
    /// Timer tick for the spinner
    Tick,
}

/// Event handler for the TUI
pub struct EventHandler {
    rx: mpsc::Receiver<AppAction>,
    _tx: mpsc::Sender<AppAction>,
}

impl EventHandler {
    /// Create a new event handler with specified tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel(100);
        let tx_clone = tx.clone();

        tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_rate);

            loop {
                let tick = tick_interval.tick();
                let crossterm_event = reader.next().fuse();

                tokio::select! {
                    _ = tick => {
                        if tx_clone.send(AppAction::Tick).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(evt)) = crossterm_event => {
                        if let Some(action) = Self::map_event(evt) {
                            if tx_clone.send(action).await.is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Self { rx, _tx: tx }
    }

    /// Wait for the next action
    pub async fn next(&mut self) -> Option<AppAction> {
        self.rx.recv().await
    }

    fn map_event(event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Self::map_key_event(key),
            _ => None,
        }
    }

    /// Map a key event to an app action
    pub fn map_key_event(key: KeyEvent) -> Option<AppAction> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(AppAction::ForceQuit),
            (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(AppAction::Quit),

            (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(AppAction::Analyze),
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(AppAction::ClearSelection),
            (KeyModifiers::CONTROL, KeyCode::Char('h')) => Some(AppAction::ToggleHelp),

            (KeyModifiers::NONE, code) | (KeyModifiers::SHIFT, code) => match code {
                KeyCode::Esc => Some(AppAction::Escape),
                KeyCode::Enter => Some(AppAction::SelectFile),
                KeyCode::F(1) => Some(AppAction::ToggleHelp),
                KeyCode::F(5) => Some(AppAction::Analyze),

                KeyCode::Up => Some(AppAction::ScrollUp),
                KeyCode::Down => Some(AppAction::ScrollDown),
                KeyCode::PageUp => Some(AppAction::ScrollPageUp),
                KeyCode::PageDown => Some(AppAction::ScrollPageDown),

                // Everything else edits the path field
                _ => Some(AppAction::Input(key)),
            },

            _ => Some(AppAction::Input(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(modifiers: KeyModifiers, code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('r'))),
            Some(AppAction::Analyze)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::F(5))),
            Some(AppAction::Analyze)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::NONE, KeyCode::Enter)),
            Some(AppAction::SelectFile)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('l'))),
            Some(AppAction::ClearSelection)
        );
        assert_eq!(
            EventHandler::map_key_event(key(KeyModifiers::CONTROL, KeyCode::Char('c'))),
            Some(AppAction::ForceQuit)
        );
    }

    #[test]
    fn test_plain_characters_are_path_input() {
        let slash = key(KeyModifiers::NONE, KeyCode::Char('/'));
        assert_eq!(EventHandler::map_key_event(slash), Some(AppAction::Input(slash)));

        let upper = key(KeyModifiers::SHIFT, KeyCode::Char('A'));
        assert_eq!(EventHandler::map_key_event(upper), Some(AppAction::Input(upper)));
    }
}
