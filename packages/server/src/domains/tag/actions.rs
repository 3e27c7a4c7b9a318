//! Tag ledger actions - resolve-or-create and trending queries
//!
//! The ledger keeps one row per distinct tag name. Creating a publication
//! bumps `last_use` on each of its tags; "popular" means used recently.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use crate::common::{DomainError, DomainResult, TagId};
use crate::domains::tag::models::Tag;
use crate::kernel::ServerDeps;

/// Reject names that could never have come out of a publication body.
pub fn validate_tag_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::Validation("tag name cannot be empty".to_string()));
    }
    if name.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "tag name cannot contain whitespace: {:?}",
            name
        )));
    }
    Ok(())
}

/// Find the tag named `name` or create it, recording a use at `as_of`.
///
/// `last_use` only moves forward, so replaying an old publication never
/// makes a tag look less recent. The store performs the lookup and the
/// write as one step; concurrent calls for a brand-new name yield one tag.
pub async fn resolve_or_create(
    name: &str,
    as_of: DateTime<Utc>,
    deps: &ServerDeps,
) -> DomainResult<Tag> {
    validate_tag_name(name)?;

    let tag = deps.store.upsert_tag(name, as_of).await?;
    debug!(tag_id = %tag.id, tag_name = %tag.name, last_use = %tag.last_use, "Tag resolved");
    Ok(tag)
}

/// Every tag used strictly after `threshold`, ordered by name.
pub async fn popular_since(threshold: DateTime<Utc>, deps: &ServerDeps) -> DomainResult<Vec<Tag>> {
    let tags = deps.store.find_tags_used_after(threshold).await?;
    info!(threshold = %threshold, count = tags.len(), "Popular tags loaded");
    Ok(tags)
}

/// Tags used within the last `days` days as seen from `now`.
pub async fn popular_within_days(
    days: u32,
    now: DateTime<Utc>,
    deps: &ServerDeps,
) -> DomainResult<Vec<Tag>> {
    let threshold = now
        .checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    popular_since(threshold, deps).await
}

pub async fn find_tag(tag_id: TagId, deps: &ServerDeps) -> DomainResult<Tag> {
    deps.store
        .find_tag(tag_id)
        .await?
        .ok_or_else(|| DomainError::not_found("tag", tag_id))
}

pub async fn list_tags(deps: &ServerDeps) -> DomainResult<Vec<Tag>> {
    Ok(deps.store.list_tags().await?)
}
