pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Student submission
        .route(
            "/aiRoute/preferDetails",
            post(handlers::handle_prefer_details),
        )
        // Admin reads
        .route(
            "/aiRoute/getPreferDetails",
            get(handlers::handle_list_preferences),
        )
        .route(
            "/aiRoute/getPreferDetails/:id",
            get(handlers::handle_get_preference),
        )
        .route(
            "/aiRoute/getPreferDetailsByEmail/:email",
            get(handlers::handle_get_preferences_by_email),
        )
        .route(
            "/aiRoute/getPreferDetailsStats",
            get(handlers::handle_preference_stats),
        )
        .with_state(state)
}
