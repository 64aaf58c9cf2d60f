//! HTTP front end for the calculator.
//!
//! | Method | Path          | Purpose |
//! |--------|---------------|---------|
//! | GET    | `/`           | Calculator form |
//! | POST   | `/`           | Form submission, renders results or an error |
//! | POST   | `/api/tax`    | JSON [`TaxQuery`] in, JSON [`TaxResult`] out |
//! | GET    | `/styles.css` | Stylesheet |

use anyhow::Context;
use axum::{
    Form, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tax_core::{GamblingTaxEngine, TaxQuery, TaxResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::form::{FormError, TaxForm};
use crate::pages::{
    STYLES_CSS, render_error_page, render_form_page, render_not_found_page, render_result_page,
};

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    pub engine: GamblingTaxEngine<'static>,
    pub default_tax_year: i32,
}

impl AppState {
    pub fn new(default_tax_year: i32) -> Self {
        Self {
            engine: GamblingTaxEngine::default(),
            default_tax_year,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn json_error(
    status: StatusCode,
    message: String,
) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler).post(calculate_handler))
        .route("/api/tax", post(api_tax_handler))
        .route("/styles.css", get(styles_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_form_page(state.default_tax_year))
}

async fn calculate_handler(
    State(state): State<AppState>,
    Form(form): Form<TaxForm>,
) -> Response {
    match form.calculate(&state.engine) {
        Ok(result) => {
            info!(
                rule = %result.rule_applied,
                tax_owed = %result.tax_owed,
                "form calculation complete"
            );
            Html(render_result_page(&result)).into_response()
        }
        Err(error) => {
            warn!(%error, "form submission rejected");
            (
                StatusCode::BAD_REQUEST,
                Html(render_error_page(&error.to_string())),
            )
                .into_response()
        }
    }
}

async fn api_tax_handler(
    State(state): State<AppState>,
    payload: Result<Json<TaxQuery>, JsonRejection>,
) -> Response {
    let query = match payload {
        Ok(Json(query)) => query,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "malformed api request");
            return json_error(rejection.status(), rejection.body_text());
        }
    };

    if let Some(field) = query.negative_amount() {
        warn!(field, "api request with negative amount");
        return json_error(
            StatusCode::BAD_REQUEST,
            FormError::NegativeAmount(field).to_string(),
        );
    }

    match state.engine.calculate(&query) {
        Ok(result) => {
            info!(tax_year = query.tax_year, tax_owed = %result.tax_owed, "api calculation complete");
            Json::<TaxResult>(result).into_response()
        }
        Err(error) => {
            warn!(%error, "api request rejected");
            json_error(StatusCode::BAD_REQUEST, error.to_string())
        }
    }
}

async fn styles_handler() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLES_CSS,
    )
}

async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found_page())).into_response()
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(error) => {
            warn!(%error, "cannot listen for ctrl-c; running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Binds the configured address and serves until ctrl-c.
pub async fn serve(config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "gambling tax calculator listening");

    axum::serve(listener, router(AppState::new(config.default_tax_year)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    info!("server stopped");
    Ok(())
}
