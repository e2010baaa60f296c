use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{CreateItemRequest, ImageRequest, UpdateItemRequest, VisibilityRequest};
use crate::state::AppState;
use crate::validation;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use types::ids::ItemId;
use types::item::Item;

pub async fn create_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(&format!("{}:create_item", user.user_id), 20, 20.0)?;

    let new_item = validation::validate_new_item(payload)?;
    let item = state.registry.create_item(user.user_id, new_item)?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<ItemId>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(state.registry.get_item(item_id)?))
}

pub async fn my_items(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.registry.items_of(user.user_id)?))
}

pub async fn update_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<Item>, AppError> {
    let edit = validation::validate_item_edit(payload)?;
    Ok(Json(state.registry.update_item(user.user_id, item_id, edit)?))
}

pub async fn set_visibility(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<VisibilityRequest>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(
        state
            .registry
            .set_visibility(user.user_id, item_id, payload.visible)?,
    ))
}

pub async fn attach_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<Item>, AppError> {
    let image = validation::validate_image(payload.image)?;
    Ok(Json(state.registry.attach_image(user.user_id, item_id, image)?))
}

pub async fn detach_image(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<ItemId>,
    Json(payload): Json<ImageRequest>,
) -> Result<Json<Item>, AppError> {
    let image = validation::validate_image(payload.image)?;
    Ok(Json(
        state.registry.detach_image(user.user_id, item_id, &image)?,
    ))
}

pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(item_id): Path<ItemId>,
) -> Result<StatusCode, AppError> {
    state.registry.delete_item(user.user_id, item_id)?;
    Ok(StatusCode::NO_CONTENT)
}
