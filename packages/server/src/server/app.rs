//! Application setup and router.

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{health_handler, publications, publishers, tags};

/// Shared application state
#[derive(Clone, Debug)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router over the given dependencies.
pub fn build_app(deps: ServerDeps) -> Router {
    let app_state = AppState { deps };

    // CORS configuration - allow any origin for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health_handler))
        // Publishers and the follow graph
        .route(
            "/api/publishers",
            get(publishers::list_publishers_handler).post(publishers::create_publisher_handler),
        )
        .route(
            "/api/publishers/:id",
            get(publishers::get_publisher_handler).delete(publishers::delete_publisher_handler),
        )
        .route(
            "/api/publishers/follow/:followed_id/:follower_id",
            put(publishers::follow_handler),
        )
        .route(
            "/api/publishers/unfollow/:followed_id/:follower_id",
            put(publishers::unfollow_handler),
        )
        .route("/api/publishers/:id/followers", get(publishers::followers_handler))
        .route("/api/publishers/:id/follows", get(publishers::follows_handler))
        .route("/api/publishers/:id/favourites", get(publishers::favourites_handler))
        // Publications, reactions and republishing
        .route("/api/publications", post(publications::create_publication_handler))
        .route(
            "/api/publications/:id",
            get(publications::get_publication_handler)
                .delete(publications::delete_publication_handler),
        )
        .route(
            "/api/publications/publisher/:id",
            get(publications::by_publisher_handler),
        )
        .route("/api/publications/tag/:id", get(publications::by_tag_handler))
        .route("/api/publications/mentions/:id", get(publications::by_mention_handler))
        .route(
            "/api/publications/faved/:publication_id/:publisher_id",
            put(publications::favorite_handler).delete(publications::unfavorite_handler),
        )
        .route(
            "/api/publications/liked/:publication_id/:publisher_id",
            put(publications::like_handler).delete(publications::unlike_handler),
        )
        .route(
            "/api/publications/republish/:source_id/:target_id",
            put(publications::republish_handler),
        )
        // Tag ledger
        .route("/api/tags", get(tags::list_tags_handler))
        .route("/api/tags/:id", get(tags::get_tag_handler))
        .route("/api/tag_popular/:days", get(tags::popular_tags_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
