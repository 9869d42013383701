//! Card container.

/// Wrap `body` in a card. `class` extends the base classes.
#[must_use]
pub fn card(class: &str, body: &str) -> String {
    format!(
        r#"<div class="rounded-2xl border border-panelBorder bg-panel text-textPrimary shadow-xl {class}">{body}</div>"#
    )
}
