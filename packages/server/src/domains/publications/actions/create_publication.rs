use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::common::{DomainError, DomainResult, PublisherId};
use crate::domains::annotation::annotate;
use crate::domains::publications::models::{Publication, PublicationDetail};
use crate::domains::tag::actions::validate_tag_name;
use crate::kernel::ServerDeps;

/// Create a publication and link the mentions and tags found in its body.
///
/// Mentions are best effort: a handle that does not resolve to a publisher
/// (or whose publisher is gone by the time of the write) is skipped. Tags
/// are resolved or created with `created_at` as their use date. The
/// publication, its links and the tag writes are stored in one step, so a
/// failed create leaves no tags behind.
///
/// Returned mentions are ordered by id and tags by name.
pub async fn create_publication(
    author_id: PublisherId,
    body: &str,
    created_at: DateTime<Utc>,
    deps: &ServerDeps,
) -> DomainResult<PublicationDetail> {
    let author = deps
        .store
        .find_publisher(author_id)
        .await?
        .ok_or_else(|| DomainError::Validation(format!("unknown author {}", author_id)))?;

    let annotations = annotate(body, &deps.markers);
    debug!(
        author_id = %author.id,
        mentions = ?annotations.mentions,
        tags = ?annotations.tags,
        "Publication body annotated"
    );

    let mut mentions: Vec<PublisherId> = Vec::with_capacity(annotations.mentions.len());
    for handle in &annotations.mentions {
        match deps.directory.find_publisher_by_account_handle(handle).await? {
            Some(mentioned) if !mentions.contains(&mentioned.id) => mentions.push(mentioned.id),
            Some(_) => {}
            None => debug!(handle = %handle, "Mention does not resolve to a publisher, skipping"),
        }
    }

    for name in &annotations.tags {
        validate_tag_name(name)?;
    }

    let publication = Publication::new(author.id, body, created_at);
    let links = deps
        .store
        .insert_publication(&publication, &mentions, &annotations.tags)
        .await?
        .ok_or_else(|| DomainError::Validation(format!("unknown author {}", author_id)))?;

    info!(
        publication_id = %publication.id,
        author_id = %author.id,
        mention_count = links.mentions.len(),
        tag_count = links.tags.len(),
        "Publication created"
    );

    Ok(PublicationDetail {
        publication,
        mentions: links.mentions,
        tags: links.tags,
        faved_by: Vec::new(),
        liked_by: Vec::new(),
        republished_by: Vec::new(),
    })
}
