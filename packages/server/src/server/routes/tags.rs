use axum::{
    extract::{Extension, Path},
    Json,
};
use chrono::Utc;

use crate::common::TagId;
use crate::domains::tag::actions;
use crate::domains::tag::models::Tag;
use crate::server::app::AppState;
use crate::server::error::ApiError;

pub async fn list_tags_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(actions::list_tags(&state.deps).await?))
}

pub async fn get_tag_handler(
    Extension(state): Extension<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<Tag>, ApiError> {
    Ok(Json(actions::find_tag(id, &state.deps).await?))
}

/// Tags used within the last `days` days.
pub async fn popular_tags_handler(
    Extension(state): Extension<AppState>,
    Path(days): Path<u32>,
) -> Result<Json<Vec<Tag>>, ApiError> {
    Ok(Json(actions::popular_within_days(days, Utc::now(), &state.deps).await?))
}
