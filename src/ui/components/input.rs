//! Labelled text input for the lead form.

use crate::ui::escape;

/// One form field.
#[derive(Debug, Clone, Copy)]
pub struct InputField<'a> {
    /// Name attribute; also used as the element id.
    pub name: &'a str,
    /// Visible label.
    pub label: &'a str,
    /// Input type (text, email, tel).
    pub input_type: &'a str,
    /// Placeholder text.
    pub placeholder: &'a str,
    /// Pre-filled value (escaped on render).
    pub value: &'a str,
    /// Extra attributes, inserted verbatim.
    pub attrs: &'a str,
}

/// Render a required input with its label.
#[must_use]
pub fn text_input(field: &InputField<'_>) -> String {
    let base_classes = "flex h-11 w-full rounded-lg border border-panelBorder bg-background \
                        px-3 py-2 text-sm text-textPrimary placeholder:text-textMuted \
                        focus-visible:outline-none focus-visible:ring-2 focus-visible:ring-primary";

    format!(
        r#"<label for="{name}" class="block space-y-1.5">
    <span class="text-sm font-medium text-textSecondary">{label}</span>
    <input id="{name}" name="{name}" type="{input_type}" placeholder="{placeholder}" value="{value}" class="{base_classes}" autocomplete="off" required {attrs}>
</label>"#,
        name = field.name,
        label = field.label,
        input_type = field.input_type,
        placeholder = field.placeholder,
        value = escape(field.value),
        attrs = field.attrs,
    )
}
