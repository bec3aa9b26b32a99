//! Stock and trade endpoint handlers

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::errors::{TradingError, ValidationError};
use crate::interfaces::http::AppState;
use crate::interfaces::http::dto::{
    CreateTradeRequest, ListStocksQuery, StockResponse, TradeResponse,
};
use crate::interfaces::http::error::ApiError;

/// `GET /stocks/{ticker}`
pub async fn get_stock(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockResponse>, ApiError> {
    let stock = state.trading.get_stock(&ticker).await?;
    Ok(Json(stock.into()))
}

/// `GET /stocks?tickers=A,B,C`
pub async fn list_stocks(
    State(state): State<AppState>,
    Query(query): Query<ListStocksQuery>,
) -> Result<Json<Vec<StockResponse>>, ApiError> {
    let tickers = query.ticker_list();
    let stocks = state.trading.list_stocks(tickers.as_slice()).await?;
    Ok(Json(stocks.into_iter().map(StockResponse::from).collect()))
}

/// `POST /trades`
pub async fn create_trade(
    State(state): State<AppState>,
    payload: Result<Json<CreateTradeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;

    let price = request.price.ok_or_else(|| required("price"))?;
    let quantity = request.quantity.ok_or_else(|| required("quantity"))?;
    let trade = state
        .trading
        .record_trade(
            request.ticker_symbol.as_deref().unwrap_or_default(),
            price,
            quantity,
            request.broker_id.as_deref().unwrap_or_default(),
        )
        .await?;

    debug!(ticker = %trade.ticker_symbol, trade_id = trade.id, "Trade created via API");

    // Trade is committed by now; a Location that cannot be encoded is left out
    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::try_from(format!("/stocks/{}", trade.ticker_symbol)) {
        headers.insert(header::LOCATION, location);
    }

    Ok((
        StatusCode::CREATED,
        headers,
        Json(TradeResponse::from(trade)),
    ))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.trading.health_check().await?;
    Ok(Json(json!({ "status": "ok" })))
}

fn required(field: &'static str) -> ApiError {
    TradingError::from(ValidationError::Required { field }).into()
}
