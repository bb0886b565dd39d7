//! Submission Controller
//!
//! Owns the [`InteractionState`] and drives the request lifecycle:
//!
//! ```text
//!   Idle ──analyze()──▶ Pending ──ok──▶ Success
//!    ▲                     └──err──▶ Failed
//!    └──────── select_file() ◀────────┘
//! ```
//!
//! Every mutation goes through [`InteractionState::apply`], which keeps
//! `result` and `error` mutually exclusive and clears `pending` on both
//! outcomes.

use crate::client::{ExtractionService, ServiceError};
use crate::models::{ParameterMap, SelectedFile};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Result of one extraction round trip.
pub type AnalysisOutcome = Result<ParameterMap, ServiceError>;

/// Events that may change the interaction state.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    FileSelected(Option<SelectedFile>),
    AnalysisStarted,
    AnalysisSucceeded(ParameterMap),
    AnalysisFailed(String),
}

/// Derived view of the state, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    file: Option<SelectedFile>,
    pending: bool,
    result: Option<ParameterMap>,
    error: Option<String>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn result(&self) -> Option<&ParameterMap> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A file is selected and nothing is in flight.
    pub fn can_analyze(&self) -> bool {
        self.file.is_some() && !self.pending
    }

    pub fn phase(&self) -> Phase {
        if self.pending {
            Phase::Pending
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.result.is_some() {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    /// Apply one transition. Returns `false` when the transition is not
    /// allowed from the current state and nothing changed.
    pub fn apply(&mut self, transition: Transition) -> bool {
        match transition {
            Transition::FileSelected(candidate) => {
                self.file = candidate;
                self.result = None;
                self.error = None;
            }
            Transition::AnalysisStarted => {
                if !self.can_analyze() {
                    return false;
                }
                self.pending = true;
                self.result = None;
                self.error = None;
            }
            Transition::AnalysisSucceeded(parameters) => {
                if !self.pending {
                    return false;
                }
                self.pending = false;
                self.result = Some(parameters);
                self.error = None;
            }
            Transition::AnalysisFailed(message) => {
                if !self.pending {
                    return false;
                }
                self.pending = false;
                self.result = None;
                self.error = Some(message);
            }
        }
        true
    }
}

pub struct SubmissionController {
    state: InteractionState,
    service: Arc<dyn ExtractionService>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ExtractionService>) -> Self {
        Self {
            state: InteractionState::new(),
            service,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn service(&self) -> Arc<dyn ExtractionService> {
        Arc::clone(&self.service)
    }

    /// Replace the selection. Any previous result or error is discarded.
    pub fn select_file(&mut self, candidate: Option<SelectedFile>) {
        match &candidate {
            Some(file) => info!("Selected {} ({} bytes)", file.filename(), file.len()),
            None => debug!("Selection cleared"),
        }
        self.state.apply(Transition::FileSelected(candidate));
    }

    /// Enter Pending and hand back the file to upload, or `None` when there
    /// is nothing selected or a request is already in flight.
    pub fn begin_analysis(&mut self) -> Option<SelectedFile> {
        if !self.state.apply(Transition::AnalysisStarted) {
            if self.state.is_pending() {
                debug!("Analysis already in flight, ignoring");
            } else {
                debug!("No file selected, ignoring analyze");
            }
            return None;
        }
        let file = self.state.file.clone()?;
        info!("Analysis started for {}", file.filename());
        Some(file)
    }

    /// Record the outcome of the request started by [`begin_analysis`].
    ///
    /// [`begin_analysis`]: Self::begin_analysis
    pub fn complete_analysis(&mut self, outcome: AnalysisOutcome) {
        let transition = match outcome {
            Ok(parameters) => {
                info!("Analysis succeeded with {} parameters", parameters.len());
                Transition::AnalysisSucceeded(parameters)
            }
            Err(e) => {
                warn!("Analysis failed: {}", e);
                Transition::AnalysisFailed(e.user_message())
            }
        };

        if !self.state.apply(transition) {
            debug!("Dropping analysis outcome, no request in flight");
        }
    }

    /// Run one full analysis: guard, request, record.
    pub async fn analyze(&mut self) {
        let Some(file) = self.begin_analysis() else {
            return;
        };
        let outcome = run_extraction(self.service(), file).await;
        self.complete_analysis(outcome);
    }
}

/// Call the service, turning a panic inside the request into an ordinary
/// failure so the caller can always leave Pending.
pub async fn run_extraction(
    service: Arc<dyn ExtractionService>,
    file: SelectedFile,
) -> AnalysisOutcome {
    match AssertUnwindSafe(service.extract(&file)).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => {
            error!("Extraction panicked for {}", file.filename());
            Err(ServiceError::Transport("extraction task panicked".to_string()))
        }
    }
}
