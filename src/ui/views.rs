//! One fragment per flow state.
//!
//! Every fragment is a `<div id="view">` so any of them can replace any
//! other with `hx-swap="outerHTML"`.

use std::fmt::Write as _;

use crate::flow::FlowView;
use crate::geocode::{AddressSuggestion, SUGGEST_DEBOUNCE};
use crate::model::{AnalysisResult, FoundationType, LeadInfo};

use super::components::{
    BadgeVariant, ButtonVariant, InputField, badge, button, card, icons, text_input,
};
use super::escape;

/// Element id shared by all view fragments.
pub const VIEW_ID: &str = "view";

/// Element id of the address suggestion list.
pub const SUGGESTIONS_ID: &str = "address-suggestions";

/// Poll interval while an analysis is in flight.
const POLL_TRIGGER: &str = "every 1s";

/// Render the fragment for the current flow state.
#[must_use]
pub fn view_fragment(view: &FlowView) -> String {
    match view {
        FlowView::Idle => idle_form(None, None),
        FlowView::Analyzing { lead } => analyzing(lead),
        FlowView::Success { lead, result } => report(lead, result),
        FlowView::Error { message } => error(message),
    }
}

/// Lead capture form with address autocomplete.
///
/// `previous` refills the fields after a rejected submission; `notice` is
/// shown above the form.
#[must_use]
pub fn idle_form(previous: Option<&LeadInfo>, notice: Option<&str>) -> String {
    let address_attrs = format!(
        r##"list="{SUGGESTIONS_ID}" hx-get="/fragments/suggestions" hx-trigger="keyup changed delay:{}ms" hx-target="#{SUGGESTIONS_ID}" hx-swap="outerHTML""##,
        SUGGEST_DEBOUNCE.as_millis()
    );

    let fields = [
        InputField {
            name: "name",
            label: "Full Name",
            input_type: "text",
            placeholder: "Jane Smith",
            value: previous.map_or("", |l| l.name.as_str()),
            attrs: "",
        },
        InputField {
            name: "email",
            label: "Email",
            input_type: "email",
            placeholder: "jane@example.com",
            value: previous.map_or("", |l| l.email.as_str()),
            attrs: "",
        },
        InputField {
            name: "phone",
            label: "Phone",
            input_type: "tel",
            placeholder: "(555) 123-4567",
            value: previous.map_or("", |l| l.phone.as_str()),
            attrs: "",
        },
        InputField {
            name: "address",
            label: "Property Address",
            input_type: "text",
            placeholder: "123 Maple Ave, Springfield, IL",
            value: previous.map_or("", |l| l.address.as_str()),
            attrs: &address_attrs,
        },
    ];

    let mut body = String::from(
        r#"<div class="p-6 sm:p-8 space-y-5">
    <h2 class="text-2xl font-bold">Get a Property Report</h2>"#,
    );
    if let Some(notice) = notice {
        let _ = write!(
            body,
            r#"<p class="rounded-lg bg-red-50 text-red-700 px-3 py-2 text-sm" role="alert">{}</p>"#,
            escape(notice)
        );
    }
    let _ = write!(
        body,
        r##"<form class="space-y-4" action="/leads" method="post" hx-post="/leads" hx-target="#{VIEW_ID}" hx-swap="outerHTML" hx-disabled-elt="find button">"##
    );
    for field in &fields {
        body.push_str(&text_input(field));
    }
    let _ = write!(body, r#"<datalist id="{SUGGESTIONS_ID}"></datalist>"#);
    body.push_str(&button(
        ButtonVariant::Primary,
        "submit",
        "",
        "Analyze Property",
    ));
    body.push_str("</form></div>");

    format!(
        r#"<div id="{VIEW_ID}" class="max-w-lg mx-auto">{}</div>"#,
        card("", &body)
    )
}

/// In-flight view. Polls until the flow leaves `Analyzing`.
fn analyzing(lead: &LeadInfo) -> String {
    format!(
        r#"<div id="{VIEW_ID}" hx-get="/fragments/view" hx-trigger="{POLL_TRIGGER}" hx-swap="outerHTML" class="flex flex-col items-center justify-center py-20 max-w-2xl mx-auto text-center" aria-busy="true">
    <div class="bg-panel p-6 rounded-full shadow-xl mb-8">{spinner}</div>
    <h2 class="text-2xl sm:text-3xl font-bold mb-4">Analyzing Property Assets</h2>
    <p class="text-textMuted mb-6">{address}</p>
    <div class="space-y-2 text-textMuted text-sm">
        <p class="animate-pulse">Retrieving public tax records...</p>
        <p class="animate-pulse">Identifying structural composition...</p>
        <p class="animate-pulse">Synthesizing contractor brief...</p>
    </div>
</div>"#,
        spinner = icons::loader("h-10 w-10 text-primary"),
        address = escape(&lead.address),
    )
}

fn error(message: &str) -> String {
    let body = format!(
        r#"<div class="p-6 sm:p-8 text-center">
    <div class="w-12 h-12 bg-red-100 rounded-full flex items-center justify-center mx-auto mb-4">{icon}</div>
    <h3 class="font-bold text-xl mb-2">Analysis Interrupted</h3>
    <p class="text-textMuted mb-6 text-sm sm:text-base">{message}</p>
    {retry}
</div>"#,
        icon = icons::alert("text-red-600"),
        message = escape(message),
        retry = button(
            ButtonVariant::Destructive,
            "button",
            &format!(r##"hx-post="/retry" hx-target="#{VIEW_ID}" hx-swap="outerHTML""##),
            "Try Again",
        ),
    );
    format!(
        r#"<div id="{VIEW_ID}" class="max-w-md mx-auto py-12 sm:py-24">{}</div>"#,
        card("border-red-100", &body)
    )
}

fn foundation_badge(foundation: FoundationType) -> String {
    let variant = match foundation {
        FoundationType::Unknown => BadgeVariant::Secondary,
        _ => BadgeVariant::Success,
    };
    badge(variant, foundation.as_str())
}

fn fact(label: &str, value: &str) -> String {
    let shown = if value.trim().is_empty() { "-" } else { value };
    format!(
        r#"<div class="p-4 rounded-xl bg-surfaceVariant"><dt class="text-xs font-bold uppercase tracking-wider text-textMuted">{label}</dt><dd class="mt-1 font-semibold">{}</dd></div>"#,
        escape(shown)
    )
}

/// Success view: the report plus the lead it was run for.
fn report(lead: &LeadInfo, result: &AnalysisResult) -> String {
    let facts = [
        ("Year Built", &result.year_built),
        ("Square Feet", &result.sq_ft),
        ("Beds", &result.beds),
        ("Baths", &result.baths),
        ("Estimated Value", &result.estimated_value),
        ("Layout", &result.layout_description),
    ]
    .iter()
    .map(|(label, value)| fact(label, value))
    .collect::<String>();

    let sources = if result.grounding_sources.is_empty() {
        String::new()
    } else {
        let items = result
            .grounding_sources
            .iter()
            .map(|s| {
                let title = if s.title.is_empty() { &s.uri } else { &s.title };
                format!(
                    r#"<li><a href="{}" target="_blank" rel="noopener noreferrer" class="text-primary hover:underline">{}</a></li>"#,
                    escape(&s.uri),
                    escape(title)
                )
            })
            .collect::<String>();
        format!(
            r#"<section class="p-6 border-t border-panelBorder"><h3 class="font-bold mb-3">Sources</h3><ul class="space-y-1 text-sm">{items}</ul></section>"#
        )
    };

    let body = format!(
        r#"<header class="p-6 border-b border-panelBorder flex flex-col sm:flex-row sm:items-center justify-between gap-4">
    <div>
        <p class="text-xs font-bold uppercase tracking-wider text-textMuted">Prepared for {name}</p>
        <h2 class="text-2xl font-bold">{address}</h2>
        <p class="text-sm text-textMuted">{email} · {phone}</p>
    </div>
    <a href="{map_link}" target="_blank" rel="noopener noreferrer" class="inline-flex items-center gap-2 text-primary font-medium hover:underline">{pin} Open in Maps</a>
</header>
<section class="p-6 flex flex-wrap gap-2">
    {foundation} {listing} {flood}
</section>
<dl class="p-6 pt-0 grid gap-4 grid-cols-2 lg:grid-cols-3">{facts}</dl>
<section class="p-6 border-t border-panelBorder">
    <h3 class="font-bold mb-2">Tax History</h3>
    <p class="text-sm">{tax_history}</p>
</section>
<section class="p-6 border-t border-panelBorder">
    <h3 class="font-bold mb-2">Contractor Notes</h3>
    <pre class="whitespace-pre-wrap font-sans text-sm">{reasoning}</pre>
</section>
{sources}
<footer class="p-6 border-t border-panelBorder">{reset}</footer>"#,
        name = escape(&lead.name),
        address = escape(&lead.address),
        email = escape(&lead.email),
        phone = escape(&lead.phone),
        map_link = escape(&result.map_link),
        pin = icons::map_pin(""),
        foundation = foundation_badge(result.foundation_type),
        listing = badge(BadgeVariant::Default, &result.listing_status),
        flood = if result.flood_zone.is_empty() {
            String::new()
        } else {
            badge(BadgeVariant::Warning, &format!("Flood Zone {}", result.flood_zone))
        },
        tax_history = escape(&result.tax_history),
        reasoning = escape(&result.reasoning),
        reset = button(
            ButtonVariant::Secondary,
            "button",
            &format!(r##"hx-post="/reset" hx-target="#{VIEW_ID}" hx-swap="outerHTML""##),
            "Analyze Another Property",
        ),
    );

    format!(
        r#"<div id="{VIEW_ID}" class="max-w-4xl mx-auto">{}</div>"#,
        card("", &body)
    )
}

/// `<datalist>` of suggestion display names, swapped under the address input.
#[must_use]
pub fn suggestion_list(suggestions: &[AddressSuggestion]) -> String {
    let options = suggestions
        .iter()
        .map(|s| format!(r#"<option value="{}"></option>"#, escape(&s.display_name)))
        .collect::<String>();
    format!(r#"<datalist id="{SUGGESTIONS_ID}">{options}</datalist>"#)
}
