use axum::{
    Form, Json, Router,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use tracing::{debug, info, warn};

use crate::SharedState;
use crate::analysis::{AnalysisSettings, GeminiAnalyzer};
use crate::config::AppConfig;
use crate::flow::{self, ANALYSIS_FAILED_MESSAGE, FlowError, LeadFlow};
use crate::geocode::NominatimClient;
use crate::model::LeadInfo;
use crate::session::{DEFAULT_SESSION_TIMEOUT, Session, SessionStore, spawn_sweeper};
use crate::ui::{idle_form, page, suggestion_list, view_fragment};

/// Cookie carrying the visitor's session id.
pub const SESSION_COOKIE: &str = "scout_session";

/// How often expired sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: AnalysisSettings) -> anyhow::Result<()> {
    info!(
        name: "analysis.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        "Analysis provider configured"
    );
    info!(
        name: "geocode.config.loaded",
        base_url = %config.geocoding.base_url,
        user_agent = %config.geocoding.user_agent,
        "Geocoder configured"
    );

    let sessions = SessionStore::new();
    spawn_sweeper(sessions.clone(), SWEEP_INTERVAL, DEFAULT_SESSION_TIMEOUT);

    let state = SharedState {
        analyzer: Arc::new(GeminiAnalyzer::new(settings)),
        geocoder: Arc::new(NominatimClient::new(
            config.geocoding.base_url.clone(),
            config.geocoding.user_agent.clone(),
        )),
        sessions,
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the application router.
pub fn build_router(state: SharedState) -> Router {
    let timeout_duration = Duration::from_secs(state.config.server.request_timeout_secs);
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    Router::new()
        // HTML pages and fragments
        .route("/", get(index_handler))
        .route("/leads", post(submit_lead))
        .route("/reset", post(reset_handler))
        .route("/retry", post(retry_handler))
        .route("/fragments/view", get(view_handler))
        .route("/fragments/suggestions", get(suggestions_fragment))
        // JSON API
        .route("/api/address/suggestions", get(api_suggestions))
        .route("/api/analyze", post(api_analyze))
        .route("/healthz", get(healthz))
        // Static assets
        .nest_service("/static", static_dir)
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the visitor's session, issuing a cookie when a new one is made.
fn session_for(state: &SharedState, jar: CookieJar) -> (Session, CookieJar) {
    let presented = jar.get(SESSION_COOKIE).map(|c| c.value().to_owned());
    let session = state.sessions.get_or_create(presented.as_deref());

    if presented.as_deref() == Some(session.id()) {
        return (session, jar);
    }

    debug!(name: "session.created", session_id = %session.id(), "New visitor session");
    let cookie = Cookie::build((SESSION_COOKIE, session.id().to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (session, jar.add(cookie))
}

/// 409 with the fragment for the state the flow is actually in.
fn conflict(jar: CookieJar, session: &Session, err: &FlowError) -> Response {
    warn!(
        name: "flow.transition.rejected",
        session_id = %session.id(),
        error = %err,
        "Rejected flow transition"
    );
    (
        StatusCode::CONFLICT,
        jar,
        Html(view_fragment(&session.view())),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - Full page for the current flow state.
async fn index_handler(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    let (session, jar) = session_for(&state, jar);
    let content = view_fragment(&session.view());
    (jar, Html(page("Property Report", &content)))
}

/// GET /fragments/view - Current view fragment; polled while analyzing.
async fn view_handler(State(state): State<SharedState>, jar: CookieJar) -> impl IntoResponse {
    let (session, jar) = session_for(&state, jar);
    (jar, Html(view_fragment(&session.view())))
}

/// POST /leads - Capture a lead and start its analysis.
async fn submit_lead(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(lead): Form<LeadInfo>,
) -> Response {
    let (session, jar) = session_for(&state, jar);

    if let Err(e) = lead.validate() {
        debug!(name: "lead.invalid", error = %e, "Lead rejected");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            jar,
            Html(idle_form(Some(&lead), Some(&e.to_string()))),
        )
            .into_response();
    }

    let address = lead.address.clone();
    let attempt = match session.with_flow(|flow| flow.submit(lead)) {
        Ok(attempt) => attempt,
        Err(e) => return conflict(jar, &session, &e),
    };

    info!(
        name: "lead.submitted",
        session_id = %session.id(),
        address = %address,
        "Lead captured, analysis started"
    );

    let task_session = session.clone();
    let analyzer = Arc::clone(&state.analyzer);
    tokio::spawn(async move {
        let resolution =
            flow::run_analysis(task_session.flow(), attempt, &address, analyzer.as_ref()).await;
        debug!(
            name: "lead.resolved",
            session_id = %task_session.id(),
            resolution = ?resolution,
            "Analysis finished"
        );
    });

    (jar, Html(view_fragment(&session.view()))).into_response()
}

/// POST /reset - Success -> Idle.
async fn reset_handler(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let (session, jar) = session_for(&state, jar);
    match session.with_flow(LeadFlow::reset) {
        Ok(()) => (jar, Html(idle_form(None, None))).into_response(),
        Err(e) => conflict(jar, &session, &e),
    }
}

/// POST /retry - Error -> Idle.
async fn retry_handler(State(state): State<SharedState>, jar: CookieJar) -> Response {
    let (session, jar) = session_for(&state, jar);
    match session.with_flow(LeadFlow::retry) {
        Ok(()) => (jar, Html(idle_form(None, None))).into_response(),
        Err(e) => conflict(jar, &session, &e),
    }
}

/// Query parameters for the suggestion fragment (named after the input).
#[derive(Debug, Deserialize)]
struct SuggestionFragmentQuery {
    #[serde(default)]
    address: String,
}

/// GET /fragments/suggestions - `<datalist>` for the address input.
///
/// Answers 204 when a newer lookup from the same session was issued while
/// this one was in flight.
async fn suggestions_fragment(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(query): Query<SuggestionFragmentQuery>,
) -> Response {
    let (session, jar) = session_for(&state, jar);

    let ticket = session.gate().issue();
    let suggestions = state.geocoder.suggest(&query.address).await;

    if !session.gate().is_latest(ticket) {
        debug!(name: "geocode.lookup.stale", session_id = %session.id(), "Dropping superseded suggestions");
        return (StatusCode::NO_CONTENT, jar).into_response();
    }

    (jar, Html(suggestion_list(&suggestions))).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Query parameters for the suggestion API.
#[derive(Debug, Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

/// GET /api/address/suggestions - Raw geocoder matches as JSON.
async fn api_suggestions(
    State(state): State<SharedState>,
    Query(query): Query<SuggestionQuery>,
) -> impl IntoResponse {
    Json(state.geocoder.suggest(&query.q).await)
}

/// Request body for the analysis API.
#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    address: String,
}

/// POST /api/analyze - Stateless analysis of one address.
async fn api_analyze(
    State(state): State<SharedState>,
    Json(req): Json<AnalyzeRequest>,
) -> Response {
    if req.address.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": "address is required" })),
        )
            .into_response();
    }

    match state.analyzer.analyze(&req.address).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!(name: "api.analyze.failed", error = %e, "Property analysis failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": ANALYSIS_FAILED_MESSAGE })),
            )
                .into_response()
        }
    }
}

/// GET /healthz - Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}
