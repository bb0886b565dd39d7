//! TUI Widgets
//!
//! Custom widgets for the ATR Analyzer TUI.

mod parameters;
mod status;

pub use parameters::render_parameters;
pub use status::{render_status, StatusView};
