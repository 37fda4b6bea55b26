use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: AppState, enable_cors: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::all_data))
        .route("/epochs", get(handlers::list_epochs))
        .route("/epochs/{epoch}", get(handlers::epoch_state))
        .route("/epochs/{epoch}/speed", get(handlers::epoch_speed))
        .route("/epochs/{epoch}/location", get(handlers::epoch_location))
        .route("/now", get(handlers::now))
        .route("/comment", get(handlers::comments))
        .route("/header", get(handlers::header))
        .route("/metadata", get(handlers::metadata))
        .route("/delete-data", delete(handlers::delete_data))
        .route("/post-data", post(handlers::post_data))
        .route("/help", get(handlers::help));

    let router = if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
