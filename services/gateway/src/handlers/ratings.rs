use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{CreateRatingRequest, UpdateRatingRequest};
use crate::state::AppState;
use crate::validation;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use types::ids::{RatingId, UserId};
use types::loyalty::LoyaltyAccount;
use types::rating::Rating;
use types::trade::Trade;

pub async fn create_rating(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<Rating>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(&format!("{}:create_rating", user.user_id), 10, 10.0)?;

    let create = validation::validate_new_rating(payload)?;
    let rating = state.ledger.create_rating(user.user_id, create)?;
    Ok((StatusCode::CREATED, Json(rating)))
}

pub async fn update_rating(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(rating_id): Path<RatingId>,
    Json(payload): Json<UpdateRatingRequest>,
) -> Result<Json<Rating>, AppError> {
    let (score, comment) = validation::validate_rating_update(payload)?;
    Ok(Json(
        state
            .ledger
            .update_rating(user.user_id, rating_id, score, comment)?,
    ))
}

pub async fn delete_rating(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(rating_id): Path<RatingId>,
) -> Result<StatusCode, AppError> {
    state.ledger.delete_rating(user.user_id, rating_id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn pending_ratings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Trade>>, AppError> {
    Ok(Json(state.ledger.pending_ratings(user.user_id)?))
}

pub async fn user_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<Vec<Rating>>, AppError> {
    Ok(Json(state.ledger.ratings_of(user_id)?))
}

pub async fn user_loyalty(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<LoyaltyAccount>, AppError> {
    Ok(Json(state.ledger.loyalty_of(user_id)?))
}
