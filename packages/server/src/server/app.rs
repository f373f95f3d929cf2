//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_post_handler, detect_type_handler, generate_handler, health_handler,
    list_posts_handler, root_handler, rsvp_handler,
};

/// Build the Axum application router
pub fn build_app(deps: ServerDeps) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]);

    let api = Router::new()
        .route("/posts", get(list_posts_handler).post(create_post_handler))
        .route("/posts/detect-type", post(detect_type_handler))
        .route("/posts/generate", post(generate_handler))
        .route("/posts/:id/rsvp", put(rsvp_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", api)
        .layer(Extension(Arc::new(deps)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
