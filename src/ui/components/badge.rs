//! Badge component for status indicators and tags.

use crate::ui::escape;

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Default badge style.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Warning badge.
    Warning,
    /// Muted badge for unknown values.
    Secondary,
}

impl BadgeVariant {
    /// Get CSS classes for this variant.
    #[must_use]
    pub fn classes(self) -> &'static str {
        match self {
            Self::Default => "bg-primary text-white",
            Self::Success => "bg-success text-white",
            Self::Warning => "bg-warning text-black",
            Self::Secondary => "bg-panel text-textPrimary border border-panelBorder",
        }
    }
}

/// Render a badge with escaped `text`.
#[must_use]
pub fn badge(variant: BadgeVariant, text: &str) -> String {
    format!(
        r#"<span class="inline-flex items-center rounded-full px-2.5 py-0.5 text-xs font-semibold {}">{}</span>"#,
        variant.classes(),
        escape(text)
    )
}
