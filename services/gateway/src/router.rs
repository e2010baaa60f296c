use crate::handlers::{items, ratings, trades};
use crate::state::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // items
        .route("/items", post(items::create_item))
        .route(
            "/items/{id}",
            get(items::get_item)
                .patch(items::update_item)
                .delete(items::delete_item),
        )
        .route("/items/{id}/visibility", post(items::set_visibility))
        .route(
            "/items/{id}/images",
            post(items::attach_image).delete(items::detach_image),
        )
        .route("/users/me/items", get(items::my_items))
        // trade requests
        .route("/trade-requests", post(trades::create_trade_request))
        .route(
            "/trade-requests/{id}/accept",
            post(trades::accept_trade_request),
        )
        .route(
            "/trade-requests/{id}/reject",
            post(trades::reject_trade_request),
        )
        .route("/trade-requests/received", get(trades::received_requests))
        .route("/trade-requests/sent", get(trades::sent_requests))
        // trades
        .route("/trades", get(trades::user_trades))
        .route("/trades/completed", get(trades::completed_trades))
        .route("/trades/{id}/complete", post(trades::complete_trade))
        .route("/trades/{id}/cancel", post(trades::cancel_trade))
        .route("/trades/{id}/transfers", get(trades::trade_transfers))
        // ratings & loyalty
        .route("/ratings", post(ratings::create_rating))
        .route(
            "/ratings/{id}",
            patch(ratings::update_rating).delete(ratings::delete_rating),
        )
        .route("/ratings/pending", get(ratings::pending_ratings))
        .route("/users/{id}/ratings", get(ratings::user_ratings))
        .route("/users/{id}/loyalty", get(ratings::user_loyalty));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
