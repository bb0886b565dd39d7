// ATR Analyzer - client for extracting technical parameters from ATR documents

pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod models;
pub mod render;
pub mod types;
pub mod tui;       // Terminal User Interface
pub mod utils;

// Re-exports for convenience
pub use client::{ExtractionService, HttpExtractionClient, ServiceError};
pub use config::Config;
pub use controller::{InteractionState, Phase, SubmissionController};
pub use models::{ParameterMap, ParameterValue, SelectedFile};
