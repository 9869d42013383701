//! Inline SVG icons.

/// Common icon size class.
const ICON_SIZE: &str = "h-5 w-5";

fn svg(class: &str, body: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{ICON_SIZE} {class}">{body}</svg>"#
    )
}

/// House icon.
#[must_use]
pub fn house(class: &str) -> String {
    svg(
        class,
        r#"<path d="m3 9 9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#,
    )
}

/// Loader/spinner icon.
#[must_use]
pub fn loader(class: &str) -> String {
    svg(
        &format!("{class} animate-spin"),
        r#"<path d="M21 12a9 9 0 1 1-6.219-8.56"/>"#,
    )
}

/// Warning triangle.
#[must_use]
pub fn alert(class: &str) -> String {
    svg(
        class,
        r#"<path d="M10.29 3.86 1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0z"/><line x1="12" y1="9" x2="12" y2="13"/><line x1="12" y1="17" x2="12.01" y2="17"/>"#,
    )
}

/// Map pin icon.
#[must_use]
pub fn map_pin(class: &str) -> String {
    svg(
        class,
        r#"<path d="M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0Z"/><circle cx="12" cy="10" r="3"/>"#,
    )
}
