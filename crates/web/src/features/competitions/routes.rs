use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    add_category, change_status, create_competition, get_competition, set_category_enabled,
    update_competition,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_competition))
        .route("/:id", put(update_competition))
        .route("/:id/categories", post(add_category))
        .route(
            "/:id/categories/:category_id/enabled",
            put(set_category_enabled),
        )
        .route("/:id/status", post(change_status))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/:id", get(get_competition))
        .merge(protected)
}
