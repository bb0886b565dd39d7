//! Theme and Styling
//!
//! Colors and styles for the analyzer terminal interface.

use ratatui::style::{Color, Modifier, Style};

/// Application theme
pub struct Theme;

impl Theme {
    // === Primary Colors ===

    /// Primary accent color (blue, matches the analyze button)
    pub const ACCENT: Color = Color::Rgb(37, 99, 235);

    /// Success (green)
    pub const SUCCESS: Color = Color::Rgb(34, 197, 94);

    /// Warning color (yellow/amber)
    pub const WARNING: Color = Color::Rgb(251, 191, 36);

    /// Error color (red)
    pub const ERROR: Color = Color::Rgb(220, 38, 38);

    // === Text Colors ===

    pub const TEXT_PRIMARY: Color = Color::Rgb(229, 229, 229);
    pub const TEXT_SECONDARY: Color = Color::Rgb(161, 161, 161);
    pub const TEXT_DIM: Color = Color::Rgb(82, 82, 82);

    // === Border Colors ===

    pub const BORDER: Color = Color::Rgb(51, 51, 51);
    pub const BORDER_FOCUSED: Color = Color::Rgb(59, 130, 246);

    // === Styles ===

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    pub fn text_dim() -> Style {
        Style::default().fg(Self::TEXT_DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// Parameter name column
    pub fn parameter_name() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    pub fn shortcut_key() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn shortcut_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Active/in-progress indicator
    pub fn active() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    pub fn complete() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    /// Enabled analyze button
    pub fn button() -> Style {
        Style::default()
            .fg(Color::White)
            .bg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    /// Disabled analyze button
    pub fn button_disabled() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY).bg(Self::BORDER)
    }
}

/// Status icons
pub struct Icons;

impl Icons {
    pub const COMPLETE: &'static str = "✓";
    pub const ERROR: &'static str = "✗";
    pub const FILE: &'static str = "📄";
    pub const WARNING: &'static str = "!";
    pub const SPINNER: [&'static str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

    pub fn spinner(frame: usize) -> &'static str {
        Self::SPINNER[frame % Self::SPINNER.len()]
    }
}
