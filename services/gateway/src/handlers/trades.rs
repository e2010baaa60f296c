use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::CreateTradeRequestPayload;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use types::ids::{RequestId, TradeId};
use types::request::TradeRequest;
use types::trade::{SwappedItem, Trade};

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub trade: Trade,
    pub trade_request: TradeRequest,
}

pub async fn create_trade_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTradeRequestPayload>,
) -> Result<(StatusCode, Json<TradeRequest>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(&format!("{}:create_request", user.user_id), 30, 30.0)?;

    let request = state.engine.create_trade_request(
        user.user_id,
        payload.requested_item_id,
        payload.offered_item_id,
    )?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn accept_trade_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(request_id): Path<RequestId>,
) -> Result<Json<AcceptResponse>, AppError> {
    let (trade, trade_request) = state.engine.accept_trade_request(user.user_id, request_id)?;
    Ok(Json(AcceptResponse {
        trade,
        trade_request,
    }))
}

pub async fn reject_trade_request(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(request_id): Path<RequestId>,
) -> Result<Json<TradeRequest>, AppError> {
    Ok(Json(state.engine.reject_trade_request(user.user_id, request_id)?))
}

pub async fn complete_trade(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trade_id): Path<TradeId>,
) -> Result<Json<Trade>, AppError> {
    Ok(Json(state.engine.complete_trade(user.user_id, trade_id)?))
}

pub async fn cancel_trade(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(trade_id): Path<TradeId>,
) -> Result<Json<Trade>, AppError> {
    Ok(Json(state.engine.cancel_trade(user.user_id, trade_id)?))
}

pub async fn user_trades(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Trade>>, AppError> {
    Ok(Json(state.engine.user_trades(user.user_id)?))
}

pub async fn completed_trades(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Trade>>, AppError> {
    Ok(Json(state.engine.completed_trades(user.user_id)?))
}

pub async fn received_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TradeRequest>>, AppError> {
    Ok(Json(state.engine.received_requests(user.user_id)?))
}

pub async fn sent_requests(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<TradeRequest>>, AppError> {
    Ok(Json(state.engine.sent_requests(user.user_id)?))
}

pub async fn trade_transfers(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(trade_id): Path<TradeId>,
) -> Result<Json<Vec<SwappedItem>>, AppError> {
    Ok(Json(state.engine.trade_transfers(trade_id)?))
}
