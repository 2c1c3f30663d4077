use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tokio::sync::mpsc::error::TrySendError;
use tower::limit::ConcurrencyLimitLayer;

use crate::bot::SweepSender;
use crate::github::webhook::{CloseStalePrsRequest, CronToken};

/// Shared server state for all axum handlers.
pub struct ServerState {
    sweep_queue: SweepSender,
    cron_token: CronToken,
}

impl ServerState {
    pub fn new(sweep_queue: SweepSender, cron_token: CronToken) -> Self {
        Self {
            sweep_queue,
            cron_token,
        }
    }

    pub fn get_cron_token(&self) -> &CronToken {
        &self.cron_token
    }
}

pub type ServerStateRef = Arc<ServerState>;

pub fn create_app(state: ServerState) -> Router {
    Router::new()
        .route("/close_stale_prs", post(close_stale_prs_handler))
        .route("/health", get(health_handler))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(Arc::new(state))
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "")
}

/// Axum handler that validates a cron request and enqueues a stale PR sweep.
///
/// The response is the same regardless of whether a sweep was enqueued, so that callers
/// without the token learn nothing about why their request was ignored.
pub async fn close_stale_prs_handler(
    State(state): State<ServerStateRef>,
    body: Bytes,
) -> impl IntoResponse {
    let request: CloseStalePrsRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(error) => {
            tracing::debug!("Ignoring cron request with unparsable body: {error:?}");
            return (StatusCode::OK, "");
        }
    };

    let sweep = match request.into_sweep(state.get_cron_token()) {
        Ok(sweep) => sweep,
        Err(rejection) => {
            tracing::warn!("Ignoring cron request: {rejection:?}");
            return (StatusCode::OK, "");
        }
    };

    tracing::info!(
        "Scheduling stale PR sweep of {} (installation {})",
        sweep.repository,
        sweep.installation
    );
    match state.sweep_queue.try_send(sweep) {
        Ok(()) => {}
        Err(TrySendError::Full(sweep)) => {
            tracing::error!("Sweep queue is full, dropping sweep of {}", sweep.repository);
        }
        Err(TrySendError::Closed(sweep)) => {
            tracing::error!(
                "Sweep queue is closed, dropping sweep of {}",
                sweep.repository
            );
        }
    }
    (StatusCode::OK, "")
}
