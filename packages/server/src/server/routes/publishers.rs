//! Publisher registration and follow-graph routes.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::common::PublisherId;
use crate::domains::publications::models::Publication;
use crate::domains::publishers::actions;
use crate::domains::publishers::models::{Publisher, PublisherDetail};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreatePublisherRequest {
    pub account_handle: String,
}

pub async fn create_publisher_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreatePublisherRequest>,
) -> Result<(StatusCode, Json<Publisher>), ApiError> {
    let publisher =
        actions::register_publisher(&request.account_handle, Utc::now(), &state.deps).await?;
    Ok((StatusCode::CREATED, Json(publisher)))
}

pub async fn list_publishers_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Publisher>>, ApiError> {
    Ok(Json(actions::list_publishers(&state.deps).await?))
}

pub async fn get_publisher_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<PublisherDetail>, ApiError> {
    Ok(Json(actions::publisher_detail(id, &state.deps).await?))
}

pub async fn delete_publisher_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<StatusCode, ApiError> {
    actions::delete_publisher(id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Responds with the follower's updated view.
pub async fn follow_handler(
    Extension(state): Extension<AppState>,
    Path((followed_id, follower_id)): Path<(PublisherId, PublisherId)>,
) -> Result<Json<PublisherDetail>, ApiError> {
    actions::follow(follower_id, followed_id, &state.deps).await?;
    Ok(Json(actions::publisher_detail(follower_id, &state.deps).await?))
}

pub async fn unfollow_handler(
    Extension(state): Extension<AppState>,
    Path((followed_id, follower_id)): Path<(PublisherId, PublisherId)>,
) -> Result<Json<PublisherDetail>, ApiError> {
    actions::unfollow(follower_id, followed_id, &state.deps).await?;
    Ok(Json(actions::publisher_detail(follower_id, &state.deps).await?))
}

pub async fn followers_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<Vec<Publisher>>, ApiError> {
    Ok(Json(actions::list_followers(id, &state.deps).await?))
}

pub async fn follows_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<Vec<Publisher>>, ApiError> {
    Ok(Json(actions::list_following(id, &state.deps).await?))
}

pub async fn favourites_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    Ok(Json(actions::list_favourites(id, &state.deps).await?))
}
