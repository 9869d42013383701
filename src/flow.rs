//! Lead flow state machine.
//!
//! One [`LeadFlow`] drives one visitor through
//! `Idle -> Analyzing -> Success | Error -> Idle`. It is the single source of
//! truth for which view is rendered and owns the in-flight lead and result.
//!
//! ```text
//!   Idle ──submit──▶ Analyzing ──resolve(Ok)──▶ Success ──reset──▶ Idle
//!                        │
//!                        └──resolve(Err)──▶ Error ──retry──▶ Idle
//! ```
//!
//! Every submit mints an [`AttemptId`]. A resolution carrying anything other
//! than the current attempt is stale and ignored, so a late answer can never
//! overwrite a newer state.
//!
//! # Example
//!
//! ```rust
//! use property_scout::flow::{AppState, LeadFlow};
//! use property_scout::model::LeadInfo;
//!
//! let mut flow = LeadFlow::new();
//! let attempt = flow
//!     .submit(LeadInfo {
//!         name: "Jane Smith".into(),
//!         email: "jane@x.com".into(),
//!         phone: "5551234567".into(),
//!         address: "123 Maple Ave, Springfield, IL".into(),
//!     })
//!     .unwrap();
//! assert_eq!(flow.state(), AppState::Analyzing);
//! # let _ = attempt;
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::analysis::{AnalysisError, PropertyAnalyzer};
use crate::model::{AnalysisResult, LeadInfo};

/// The only failure text a visitor ever sees.
pub const ANALYSIS_FAILED_MESSAGE: &str = "We encountered an issue analyzing this property. Please try checking the address or try again later.";

/// Which view is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppState {
    #[default]
    Idle,
    Analyzing,
    Success,
    Error,
}

impl fmt::Display for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// A transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    Submit,
    Reset,
    Retry,
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Retry => "retry",
        })
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    /// The action is not allowed from the current state.
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: AppState, action: FlowAction },
}

/// Identifies one analysis attempt within a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptId(u64);

/// Outcome of [`LeadFlow::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The flow moved to the given state.
    Applied(AppState),
    /// The attempt was no longer current; nothing changed.
    Stale,
}

/// Snapshot of what the active view needs.
///
/// Each variant carries exactly the data its state guarantees.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowView {
    Idle,
    Analyzing { lead: LeadInfo },
    Success { lead: LeadInfo, result: AnalysisResult },
    Error { message: String },
}

/// Single-owner state container for one visitor.
#[derive(Debug, Default)]
pub struct LeadFlow {
    state: AppState,
    lead: Option<LeadInfo>,
    result: Option<AnalysisResult>,
    error: Option<String>,
    current_attempt: Option<AttemptId>,
    attempts: u64,
}

impl LeadFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> AppState {
        self.state
    }

    #[must_use]
    pub fn lead(&self) -> Option<&LeadInfo> {
        self.lead.as_ref()
    }

    #[must_use]
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn require(&self, expected: AppState, action: FlowAction) -> Result<(), FlowError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(FlowError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    fn clear(&mut self) {
        self.lead = None;
        self.result = None;
        self.error = None;
        self.current_attempt = None;
    }

    /// Idle -> Analyzing. Stores the lead and clears any prior outcome.
    pub fn submit(&mut self, lead: LeadInfo) -> Result<AttemptId, FlowError> {
        self.require(AppState::Idle, FlowAction::Submit)?;

        self.clear();
        self.attempts += 1;
        let attempt = AttemptId(self.attempts);
        self.lead = Some(lead);
        self.current_attempt = Some(attempt);
        self.state = AppState::Analyzing;
        Ok(attempt)
    }

    /// Analyzing -> Success | Error, if `attempt` is still current.
    ///
    /// The underlying error is logged; the flow only keeps the fixed
    /// [`ANALYSIS_FAILED_MESSAGE`].
    pub fn resolve(
        &mut self,
        attempt: AttemptId,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Resolution {
        if self.state != AppState::Analyzing || self.current_attempt != Some(attempt) {
            tracing::debug!(
                name: "flow.resolve.stale",
                state = %self.state,
                "Discarding analysis outcome for a superseded attempt"
            );
            return Resolution::Stale;
        }

        self.current_attempt = None;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.state = AppState::Success;
            }
            Err(e) => {
                tracing::error!(name: "flow.analysis.failed", error = %e, "Property analysis failed");
                self.error = Some(ANALYSIS_FAILED_MESSAGE.to_string());
                self.state = AppState::Error;
            }
        }
        Resolution::Applied(self.state)
    }

    /// Success -> Idle. Discards lead and result.
    pub fn reset(&mut self) -> Result<(), FlowError> {
        self.require(AppState::Success, FlowAction::Reset)?;
        self.clear();
        self.state = AppState::Idle;
        Ok(())
    }

    /// Error -> Idle. Discards the message and the failed lead.
    pub fn retry(&mut self) -> Result<(), FlowError> {
        self.require(AppState::Error, FlowAction::Retry)?;
        self.clear();
        self.state = AppState::Idle;
        Ok(())
    }

    /// Snapshot for rendering.
    #[must_use]
    pub fn view(&self) -> FlowView {
        match (self.state, &self.lead, &self.result, &self.error) {
            (AppState::Analyzing, Some(lead), _, _) => FlowView::Analyzing { lead: lead.clone() },
            (AppState::Success, Some(lead), Some(result), _) => FlowView::Success {
                lead: lead.clone(),
                result: result.clone(),
            },
            (AppState::Error, _, _, Some(message)) => FlowView::Error {
                message: message.clone(),
            },
            _ => FlowView::Idle,
        }
    }
}

/// Run the analysis for `attempt` and resolve the flow with its outcome.
///
/// The lock is only taken after the provider call returns, so the flow stays
/// readable (and renderable) while the request is in flight.
pub async fn run_analysis(
    flow: &Mutex<LeadFlow>,
    attempt: AttemptId,
    address: &str,
    analyzer: &dyn PropertyAnalyzer,
) -> Resolution {
    let outcome = analyzer.analyze(address).await;
    flow.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(attempt, outcome)
}
