use axum::{
    Router, middleware,
    routing::{delete, post},
};

use super::handlers::{record_fish_catch, remove_fish_catch};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/:id/catches", post(record_fish_catch))
        .route("/:id/catches/:fish_catch_id", delete(remove_fish_catch))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
