//! Per-visitor session management.
//!
//! Each browser session owns exactly one lead flow and one lookup gate.
//! Sessions live in memory only and expire after a period of inactivity;
//! nothing survives a restart.
//!
//! # Architecture
//!
//! - [`Session`]: one visitor's flow plus suggestion gate
//! - [`SessionStore`]: thread-safe registry of active sessions
//!
//! # Example
//!
//! ```rust
//! use property_scout::flow::AppState;
//! use property_scout::session::SessionStore;
//!
//! let store = SessionStore::new();
//! let session = store.create();
//! assert_eq!(session.with_flow(|flow| flow.state()), AppState::Idle);
//! assert!(store.get(session.id()).is_some());
//! ```

mod thread;

pub use thread::{DEFAULT_SESSION_TIMEOUT, Session, SessionStore, spawn_sweeper};
