//! Publication lookups, relation queries and deletion

use tracing::info;

use crate::common::{DomainError, DomainResult, PublicationId, PublisherId, TagId};
use crate::domains::publications::models::{Publication, PublicationDetail, Reaction};
use crate::domains::publishers::actions::find_publisher;
use crate::domains::tag::actions::find_tag;
use crate::kernel::ServerDeps;

pub async fn find_publication(
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<Publication> {
    deps.store
        .find_publication(publication_id)
        .await?
        .ok_or_else(|| DomainError::not_found("publication", publication_id))
}

/// The publication with mentions, tags, reactions and republish links.
pub async fn publication_detail(
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<PublicationDetail> {
    let publication = find_publication(publication_id, deps).await?;

    Ok(PublicationDetail {
        mentions: deps.store.mentions_of(publication_id).await?,
        tags: deps.store.tags_of(publication_id).await?,
        faved_by: deps.store.reactions_to(Reaction::Favorite, publication_id).await?,
        liked_by: deps.store.reactions_to(Reaction::Like, publication_id).await?,
        republished_by: deps.store.republished_by(publication_id).await?,
        publication,
    })
}

/// Publications authored by `publisher_id`.
pub async fn by_author(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publication>> {
    find_publisher(publisher_id, deps).await?;
    Ok(deps.store.find_by_author(publisher_id).await?)
}

/// Publications carrying the tag.
pub async fn by_tag(tag_id: TagId, deps: &ServerDeps) -> DomainResult<Vec<Publication>> {
    find_tag(tag_id, deps).await?;
    Ok(deps.store.find_by_tag(tag_id).await?)
}

/// Publications that mention `publisher_id`.
pub async fn by_mention(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publication>> {
    find_publisher(publisher_id, deps).await?;
    Ok(deps.store.find_by_mention(publisher_id).await?)
}

/// Delete a publication and its memberships in other entities' relations.
pub async fn delete_publication(
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    if !deps.store.delete_publication(publication_id).await? {
        return Err(DomainError::not_found("publication", publication_id));
    }

    info!(publication_id = %publication_id, "Publication deleted");
    Ok(())
}
