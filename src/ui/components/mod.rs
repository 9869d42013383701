//! ShadCN-style reusable UI pieces, rendered to HTML strings.
//!
//! # Components
//!
//! - [`button`]: Clickable button with variants
//! - [`card`]: Card container
//! - [`text_input`]: Labelled form field
//! - [`badge`]: Status badge/tag
//! - [`icons`]: Inline SVG icons

mod badge;
mod button;
mod card;
pub mod icons;
mod input;

pub use badge::{BadgeVariant, badge};
pub use button::{ButtonVariant, button};
pub use card::card;
pub use input::{InputField, text_input};
