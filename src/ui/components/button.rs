//! Button component with variants.

/// Button visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Primary action button.
    #[default]
    Primary,
    /// Secondary action button.
    Secondary,
    /// Destructive action button.
    Destructive,
}

impl ButtonVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Primary => "bg-primary text-white hover:bg-primaryMuted",
            Self::Secondary => "bg-panel text-textPrimary border border-panelBorder hover:bg-panelBorder",
            Self::Destructive => "bg-danger text-white hover:bg-red-700",
        }
    }
}

/// Render a button.
///
/// `attrs` is inserted verbatim (HTMX attributes and the like) and must
/// already be escaped; `label` may contain markup such as an icon.
///
/// # Example
///
/// ```rust,ignore
/// button(ButtonVariant::Primary, "submit", r#"hx-post="/leads""#, "Analyze");
/// ```
#[must_use]
pub fn button(variant: ButtonVariant, button_type: &str, attrs: &str, label: &str) -> String {
    let base_classes = "inline-flex items-center justify-center gap-2 rounded-lg font-bold \
                        h-12 px-6 w-full transition-colors focus-visible:outline-none \
                        focus-visible:ring-2 focus-visible:ring-primary focus-visible:ring-offset-2 \
                        disabled:pointer-events-none disabled:opacity-50";

    format!(
        r#"<button type="{button_type}" class="{base_classes} {}" {attrs}>{label}</button>"#,
        variant.classes()
    )
}
