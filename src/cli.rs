//! Command line interface
//!
//! `atr-analyzer [tui [FILE]]` opens the interactive UI;
//! `atr-analyzer analyze FILE [--json]` runs one analysis and prints it.

use crate::client::ExtractionService;
use crate::controller::{InteractionState, Phase, SubmissionController};
use crate::models::SelectedFile;
use crate::render::render_listing;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "atr-analyzer", author, version, about)]
pub struct Cli {
    /// Extraction service base URL (overrides ANALYZER_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Transport timeout in seconds, 0 waits indefinitely (overrides ANALYZER_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive terminal UI (default)
    Tui {
        /// Document to preselect
        file: Option<PathBuf>,
    },
    /// Analyze one document and print the extracted parameters
    Analyze {
        /// PDF or plain-text document
        file: PathBuf,

        /// Print the parameters as a JSON object
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Tui { file: None })
    }
}

/// Run one analysis. Returns `Ok(false)` when the service reported a
/// failure, which has already been written to `err`.
pub async fn run_analyze<W: Write, E: Write>(
    service: Arc<dyn ExtractionService>,
    path: &Path,
    json: bool,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<bool> {
    let file = SelectedFile::load(path)
        .await
        .with_context(|| format!("Cannot analyze {}", path.display()))?;
    if !file.has_accepted_extension() {
        warn!("{} is not a PDF or text file; the service may reject it", file.filename());
    }

    let mut controller = SubmissionController::new(service);
    controller.select_file(Some(file));
    controller.analyze().await;

    write_outcome(controller.state(), json, out, err)
}

fn write_outcome<W: Write, E: Write>(
    state: &InteractionState,
    json: bool,
    out: &mut W,
    err: &mut E,
) -> anyhow::Result<bool> {
    match state.phase() {
        Phase::Success => {
            if json {
                let parameters = state.result().map(|r| r.to_json()).unwrap_or_default();
                writeln!(out, "{}", serde_json::to_string_pretty(&parameters)?)?;
            } else {
                let listing = render_listing(state.result());
                if !listing.is_empty() {
                    writeln!(out, "{}", listing)?;
                }
            }
            Ok(true)
        }
        Phase::Failed => {
            writeln!(err, "Error: {}", state.error().unwrap_or_default())?;
            Ok(false)
        }
        phase => anyhow::bail!("Analysis did not complete (state: {:?})", phase),
    }
}
