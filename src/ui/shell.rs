//! Document shell.

use super::components::icons;

/// HTMX response handling: swap 4xx fragments (validation, conflicts) too,
/// and leave the page alone on 204.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"4..","swap":true,"error":false},{"code":"...","swap":false,"error":true}]}"#;

/// Full HTML page around `content`.
#[must_use]
pub fn page(title: &str, content: &str) -> String {
    let logo = icons::house("text-white");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Pre-bid property intelligence for contractors">
    <meta name="htmx-config" content='{HTMX_CONFIG}'>
    <title>{title} - PropertyScout AI</title>

    <!-- Local assets only (no CDN) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-background text-textPrimary antialiased flex flex-col">
    <nav class="sticky top-0 z-50 w-full bg-surfaceContainer border-b border-panelBorder shadow-sm">
        <div class="container mx-auto flex h-16 items-center justify-between px-4 max-w-7xl">
            <a href="/" class="flex items-center gap-2 font-bold">
                <span class="bg-primary p-1.5 rounded-lg">{logo}</span>
                <span class="text-lg tracking-tight">PropertyScout AI</span>
            </a>
        </div>
    </nav>

    <main class="flex-grow container mx-auto px-4 py-8 sm:py-12 max-w-7xl">
        {content}
    </main>

    <footer class="bg-surfaceContainer border-t border-panelBorder py-8">
        <p class="text-sm text-textMuted text-center">PropertyScout AI. Built for Pros.</p>
    </footer>
</body>
</html>"#
    )
}
