//! HTTP API for quoting and settling intents.

use axum::{
	extract::{rejection::JsonRejection, State},
	http::StatusCode,
	response::{IntoResponse, Json, Response},
	routing::{get, post},
	Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use solver_core::{CoreError, SettlementReceipt, SolverEngine};
use solver_types::{Intent, MarketData};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::quotes::{Quote, QuoteBook, QuoteError};

#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<SolverEngine>,
	pub quotes: Arc<QuoteBook>,
}

/// Body of `POST /api/settle`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SettleRequest {
	pub quote_id: String,
	pub plan_index: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

#[derive(Debug, Serialize)]
struct MarketResponse<'a> {
	strategies: Vec<&'a str>,
	market: &'a MarketData,
}

/// Errors returned by handlers, rendered as `{error, message}`.
#[derive(Debug, Error)]
pub enum ApiError {
	#[error("{0}")]
	BadRequest(String),
	#[error(transparent)]
	Quote(#[from] QuoteError),
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::BadRequest(rejection.body_text())
	}
}

impl ApiError {
	fn status_and_code(&self) -> (StatusCode, &'static str) {
		match self {
			ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
			ApiError::Quote(err) => match err {
				QuoteError::Solver(CoreError::InvalidIntent(_)) => {
					(StatusCode::BAD_REQUEST, "INVALID_INTENT")
				}
				QuoteError::Solver(CoreError::Settlement(_)) => {
					(StatusCode::BAD_REQUEST, "SETTLEMENT_FAILED")
				}
				QuoteError::Solver(CoreError::Configuration(_)) => {
					(StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
				}
				QuoteError::NotFound(_) => (StatusCode::NOT_FOUND, "QUOTE_NOT_FOUND"),
				QuoteError::PlanIndexOutOfRange { .. } => {
					(StatusCode::BAD_REQUEST, "INVALID_PLAN_INDEX")
				}
				QuoteError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let (status, code) = self.status_and_code();
		if status.is_server_error() {
			warn!(error = %self, "Request failed");
		}

		let body = ErrorResponse {
			error: code.to_string(),
			message: self.to_string(),
		};
		(status, Json(body)).into_response()
	}
}

/// Builds the API router with tracing and CORS layers.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/api/market", get(market))
		.route("/api/quote", post(quote))
		.route("/api/settle", post(settle))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
		.layer(CorsLayer::permissive())
}

/// Serves the API until `shutdown` resolves.
pub async fn start_http_server(
	state: AppState,
	host: &str,
	port: u16,
	shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
	let listener = tokio::net::TcpListener::bind((host, port)).await?;
	info!("API server listening on {}", listener.local_addr()?);

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown)
		.await?;

	Ok(())
}

async fn health() -> Json<serde_json::Value> {
	Json(serde_json::json!({ "status": "ok" }))
}

async fn market(State(state): State<AppState>) -> Response {
	Json(MarketResponse {
		strategies: state.engine.strategy_names(),
		market: state.engine.market(),
	})
	.into_response()
}

async fn quote(
	State(state): State<AppState>,
	payload: Result<Json<Intent>, JsonRejection>,
) -> Result<Json<Quote>, ApiError> {
	let Json(intent) = payload?;
	let quote = state.quotes.issue(&state.engine, intent, Utc::now()).await?;
	Ok(Json(quote))
}

async fn settle(
	State(state): State<AppState>,
	payload: Result<Json<SettleRequest>, JsonRejection>,
) -> Result<Json<SettlementReceipt>, ApiError> {
	let Json(request) = payload?;
	let receipt = state
		.quotes
		.settle(&request.quote_id, request.plan_index, Utc::now())
		.await?;
	Ok(Json(receipt))
}
