use axum::{
    Router, middleware,
    routing::{post, put},
};

use super::handlers::{add_guest, add_official, approve, assign_placement, register, reject};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/:id/participants/register", post(register))
        .route("/:id/participants/guests", post(add_guest))
        .route("/:id/participants/officials", post(add_official))
        .route("/:id/participants/:participant_id/approve", post(approve))
        .route("/:id/participants/:participant_id/reject", post(reject))
        .route(
            "/:id/participants/:participant_id/placement",
            put(assign_placement),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
