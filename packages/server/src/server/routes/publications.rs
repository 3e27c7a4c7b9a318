//! Publication, reaction and republish routes.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::common::{PublicationId, PublisherId, TagId};
use crate::domains::publications::actions;
use crate::domains::publications::models::{Publication, PublicationDetail};
use crate::domains::publishers::actions as social;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreatePublicationRequest {
    pub publisher_id: PublisherId,
    pub body: String,
    /// Defaults to the time the request is handled.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

pub async fn create_publication_handler(
    Extension(state): Extension<AppState>,
    Json(request): Json<CreatePublicationRequest>,
) -> Result<(StatusCode, Json<PublicationDetail>), ApiError> {
    let created_at = request.created_at.unwrap_or_else(Utc::now);
    let detail = actions::create_publication(
        request.publisher_id,
        &request.body,
        created_at,
        &state.deps,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn get_publication_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublicationId>,
) -> Result<Json<PublicationDetail>, ApiError> {
    Ok(Json(actions::publication_detail(id, &state.deps).await?))
}

pub async fn delete_publication_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublicationId>,
) -> Result<StatusCode, ApiError> {
    actions::delete_publication(id, &state.deps).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn by_publisher_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    Ok(Json(actions::by_author(id, &state.deps).await?))
}

pub async fn by_tag_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    Ok(Json(actions::by_tag(id, &state.deps).await?))
}

pub async fn by_mention_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<PublisherId>,
) -> Result<Json<Vec<Publication>>, ApiError> {
    Ok(Json(actions::by_mention(id, &state.deps).await?))
}

// Reaction routes answer with the publication's updated detail view.

pub async fn favorite_handler(
    Extension(state): Extension<AppState>,
    Path((publication_id, publisher_id)): Path<(PublicationId, PublisherId)>,
) -> Result<Json<PublicationDetail>, ApiError> {
    social::favorite(publisher_id, publication_id, &state.deps).await?;
    Ok(Json(actions::publication_detail(publication_id, &state.deps).await?))
}

pub async fn unfavorite_handler(
    Extension(state): Extension<AppState>,
    Path((publication_id, publisher_id)): Path<(PublicationId, PublisherId)>,
) -> Result<Json<PublicationDetail>, ApiError> {
    social::unfavorite(publisher_id, publication_id, &state.deps).await?;
    Ok(Json(actions::publication_detail(publication_id, &state.deps).await?))
}

pub async fn like_handler(
    Extension(state): Extension<AppState>,
    Path((publication_id, publisher_id)): Path<(PublicationId, PublisherId)>,
) -> Result<Json<PublicationDetail>, ApiError> {
    social::like(publisher_id, publication_id, &state.deps).await?;
    Ok(Json(actions::publication_detail(publication_id, &state.deps).await?))
}

pub async fn unlike_handler(
    Extension(state): Extension<AppState>,
    Path((publication_id, publisher_id)): Path<(PublicationId, PublisherId)>,
) -> Result<Json<PublicationDetail>, ApiError> {
    social::unlike(publisher_id, publication_id, &state.deps).await?;
    Ok(Json(actions::publication_detail(publication_id, &state.deps).await?))
}

/// `target_id` becomes a republish of `source_id`.
pub async fn republish_handler(
    Extension(state): Extension<AppState>,
    Path((source_id, target_id)): Path<(PublicationId, PublicationId)>,
) -> Result<Json<Publication>, ApiError> {
    Ok(Json(actions::republish(source_id, target_id, &state.deps).await?))
}
