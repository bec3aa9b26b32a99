//! HTTP surface: routes, handlers and error mapping

pub mod dto;
pub mod error;
pub mod handlers;

use crate::application::trading::TradingService;
use axum::{
    Router,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub trading: TradingService,
}

/// Build the application router.
///
/// Resource routes are served both at the root and under `/api`.
pub fn router(trading: TradingService, request_timeout: Duration) -> Router {
    let resources = Router::new()
        .route("/stocks", get(handlers::list_stocks))
        .route("/stocks/:ticker", get(handlers::get_stock))
        .route("/trades", post(handlers::create_trade));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(resources.clone())
        .nest("/api", resources)
        .with_state(AppState { trading })
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
