//! Server-rendered HTML views.
//!
//! Pages are a shell plus one view fragment chosen by the visitor's flow
//! state. HTMX swaps fragments in place; nothing here holds state.
//!
//! # Structure
//!
//! - [`shell`]: Document shell (head, nav, footer)
//! - [`views`]: One fragment per flow state plus the suggestion list
//! - [`components`]: Reusable ShadCN-style pieces

pub mod components;
pub mod shell;
pub mod views;

pub use shell::page;
pub use views::{idle_form, suggestion_list, view_fragment};

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
