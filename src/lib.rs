//! PropertyScout: pre-bid property reports for contractors.
//!
//! A visitor leaves contact details and a property address; the server
//! asks a search-grounded model for a structured property profile and
//! renders it as a report. Address entry is assisted by geocoder
//! suggestions.
//!
//! # Architecture
//!
//! - **Server**: Axum router serving HTML pages, HTMX fragments and a small JSON API
//! - **Analysis**: Gemini `generateContent` client with a response schema and search grounding
//! - **Geocoding**: Nominatim address suggestions with stale-response gating
//! - **Flow**: Per-visitor state machine (Idle, Analyzing, Success, Error)
//! - **UI**: Server-rendered HTML strings + HTMX
//!
//! # Modules
//!
//! - [`analysis`]: Property analysis client and result merging
//! - [`config`]: Layered configuration (defaults, file, env, CLI)
//! - [`flow`]: Lead flow state machine
//! - [`geocode`]: Address suggestion client
//! - [`model`]: Lead and report records
//! - [`server`]: Router and handlers
//! - [`session`]: Per-browser session store
//! - [`ui`]: HTML views and components

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod analysis;
pub mod config;
pub mod flow;
pub mod geocode;
pub mod model;
pub mod server;
pub mod session;
pub mod ui;

use std::sync::Arc;

use crate::analysis::PropertyAnalyzer;
use crate::config::AppConfig;
use crate::geocode::AddressLookup;
use crate::session::SessionStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct SharedState {
    /// Property analysis provider.
    pub analyzer: Arc<dyn PropertyAnalyzer>,
    /// Address suggestion provider.
    pub geocoder: Arc<dyn AddressLookup>,
    /// Visitor sessions.
    pub sessions: SessionStore,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for SharedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedState")
            .field("sessions", &self.sessions.len())
            .field("config", &self.config)
            .finish()
    }
}
