//! Property analysis against a generative-AI provider.
//!
//! One address in, one [`AnalysisResult`] out. The request carries a
//! natural-language extraction prompt, a live web search tool directive and a
//! strict JSON response schema; the reply is merged field by field into a
//! fully-defaulted report so partial schema compliance never fails a lead.
//!
//! # Overview
//!
//! - [`PropertyAnalyzer`]: the seam the lead flow drives
//! - [`GeminiAnalyzer`]: Gemini `generateContent` implementation
//! - [`merge`]: pure reply-to-report functions (defaults, citations, map link)
//! - [`prompt`]: instruction text and response schema
//!
//! # Example
//!
//! ```rust,ignore
//! use property_scout::analysis::{AnalysisSettings, GeminiAnalyzer, PropertyAnalyzer};
//!
//! let analyzer = GeminiAnalyzer::new(AnalysisSettings {
//!     base_url: "https://generativelanguage.googleapis.com".to_string(),
//!     api_key: "...".to_string(),
//!     model: "gemini-3-flash-preview".to_string(),
//! });
//! let report = analyzer.analyze("123 Maple Ave, Springfield, IL").await?;
//! ```

pub mod gemini;
pub mod merge;
pub mod prompt;

pub use gemini::GeminiAnalyzer;

use thiserror::Error;

use crate::model::AnalysisResult;

/// Connection settings for the analysis provider.
#[derive(Clone)]
pub struct AnalysisSettings {
    /// Provider base URL (e.g., `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// API key; the only credential the application needs.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

impl std::fmt::Debug for AnalysisSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Failure of a single analysis call.
///
/// Callers are expected to collapse every variant into one user-facing
/// message; the detail is for logs only.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Transport failure (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status (auth, quota, bad request).
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// Response envelope was not the expected JSON shape.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Analyzes one property address.
#[async_trait::async_trait]
pub trait PropertyAnalyzer: Send + Sync {
    /// Run a single best-effort analysis. No retry, no partial result.
    ///
    /// # Errors
    ///
    /// Returns the provider or transport error unchanged.
    async fn analyze(&self, address: &str) -> Result<AnalysisResult, AnalysisError>;
}
