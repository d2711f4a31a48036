use crate::app::views::{Notice, Views};
use crate::core::engine::PlanEngine;
use crate::domain::model::{OutputFormat, PlanForm};
use crate::domain::ports::PlanRequester;
use crate::utils::error::{ErrorCategory, PlanError};
use axum::extract::{Form, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub type DynPlanEngine = PlanEngine<Box<dyn PlanRequester>>;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<DynPlanEngine>,
    pub views: Arc<Views>,
    pub default_format: OutputFormat,
}

impl AppState {
    pub fn new(engine: DynPlanEngine, default_format: OutputFormat) -> crate::Result<Self> {
        Ok(Self {
            engine: Arc::new(engine),
            views: Arc::new(Views::new()?),
            default_format,
        })
    }
}

/// Errors that escape a handler.
#[derive(Debug)]
pub enum WebError {
    Unprocessable(String),
    Upstream(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            WebError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            WebError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<PlanError> for WebError {
    fn from(e: PlanError) -> Self {
        match e.category() {
            ErrorCategory::Input => WebError::Unprocessable(e.user_friendly_message()),
            ErrorCategory::External => WebError::Upstream(e.user_friendly_message()),
            _ => WebError::Internal(e.to_string()),
        }
    }
}

fn status_for(error: &PlanError) -> StatusCode {
    match error.category() {
        ErrorCategory::Input => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::External => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/plan", post(generate_plan))
        .route("/download", post(download))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> crate::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 DiaPlate listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let page = state
        .views
        .form_page(&Views::empty_form(), None, state.engine.requester_kind())?;
    Ok(Html(page))
}

async fn generate_plan(
    State(state): State<AppState>,
    Form(form): Form<PlanForm>,
) -> Result<Response, WebError> {
    let planner = state.engine.requester_kind();

    match state.engine.run(&form).await {
        Ok(outcome) => {
            let page = state
                .views
                .result_page(&form, &outcome, planner, state.default_format)?;
            Ok(Html(page).into_response())
        }
        Err(e) if e.is_recoverable() => {
            let notice = Notice::from_error(&e);
            let page = state.views.form_page(&form, Some(&notice), planner)?;
            Ok((status_for(&e), Html(page)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DownloadForm {
    pub name: String,
    pub plan: String,
    pub format: String,
}

async fn download(
    State(state): State<AppState>,
    Form(request): Form<DownloadForm>,
) -> Result<Response, WebError> {
    if request.name.trim().is_empty() {
        return Err(PlanError::MissingName.into());
    }

    let format = if request.format.trim().is_empty() {
        state.default_format
    } else {
        request.format.parse::<OutputFormat>()?
    };

    let document = state.engine.document(&request.name, &request.plan);
    let rendered = state.engine.render(&document, format)?;

    let disposition = format!("attachment; filename=\"{}\"", rendered.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, rendered.mime.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    planner: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthBody> {
    Json(HealthBody {
        status: "ok",
        planner: state.engine.requester_kind(),
    })
}
