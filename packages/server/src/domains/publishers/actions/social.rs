//! Social graph actions - follow edges and publication reactions
//!
//! Each relation is a single edge in the store, so "A follows B" and
//! "B is followed by A" are the same fact read from two ends. Nothing here
//! can update one side without the other.

use tracing::{debug, info};

use crate::common::{DomainError, DomainResult, PublicationId, PublisherId};
use crate::domains::publications::models::{Publication, Reaction};
use crate::domains::publishers::models::Publisher;
use crate::kernel::{EdgeInsert, ServerDeps};

use super::registration::find_publisher;

async fn find_publication(
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<Publication> {
    deps.store
        .find_publication(publication_id)
        .await?
        .ok_or_else(|| DomainError::not_found("publication", publication_id))
}

async fn resolve_all(
    ids: Vec<PublisherId>,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publisher>> {
    let mut publishers = Vec::with_capacity(ids.len());
    for id in ids {
        // An edge can outlive its lookup if the publisher is deleted in between.
        if let Some(publisher) = deps.store.find_publisher(id).await? {
            publishers.push(publisher);
        }
    }
    Ok(publishers)
}

// =============================================================================
// Follow edges
// =============================================================================

/// `follower_id` starts following `followed_id`.
pub async fn follow(
    follower_id: PublisherId,
    followed_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    if follower_id == followed_id {
        return Err(DomainError::SelfReference(format!(
            "publisher {} cannot follow itself",
            follower_id
        )));
    }
    find_publisher(follower_id, deps).await?;
    find_publisher(followed_id, deps).await?;

    match deps.store.insert_follow(follower_id, followed_id).await? {
        EdgeInsert::Inserted => {}
        EdgeInsert::AlreadyPresent => {
            return Err(DomainError::DuplicateRelation(format!(
                "publisher {} already follows {}",
                follower_id, followed_id
            )));
        }
        EdgeInsert::MissingEndpoint => {
            // One side was deleted after the lookups above
            find_publisher(follower_id, deps).await?;
            find_publisher(followed_id, deps).await?;
            return Err(DomainError::not_found("publisher", followed_id));
        }
    }

    info!(follower_id = %follower_id, followed_id = %followed_id, "Publisher followed");
    Ok(())
}

pub async fn unfollow(
    follower_id: PublisherId,
    followed_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    if follower_id == followed_id {
        return Err(DomainError::SelfReference(format!(
            "publisher {} cannot unfollow itself",
            follower_id
        )));
    }
    find_publisher(follower_id, deps).await?;
    find_publisher(followed_id, deps).await?;

    if !deps.store.delete_follow(follower_id, followed_id).await? {
        return Err(DomainError::NotFoundRelation(format!(
            "publisher {} does not follow {}",
            follower_id, followed_id
        )));
    }

    info!(follower_id = %follower_id, followed_id = %followed_id, "Publisher unfollowed");
    Ok(())
}

/// Publishers following `publisher_id`.
pub async fn list_followers(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publisher>> {
    find_publisher(publisher_id, deps).await?;
    let ids = deps.store.followers_of(publisher_id).await?;
    resolve_all(ids, deps).await
}

/// Publishers that `publisher_id` follows.
pub async fn list_following(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publisher>> {
    find_publisher(publisher_id, deps).await?;
    let ids = deps.store.follows_of(publisher_id).await?;
    resolve_all(ids, deps).await
}

// =============================================================================
// Favorites and likes
// =============================================================================

async fn react(
    kind: Reaction,
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    find_publisher(publisher_id, deps).await?;
    find_publication(publication_id, deps).await?;

    // Set semantics: reacting twice is a no-op, not an error.
    match deps.store.insert_reaction(kind, publisher_id, publication_id).await? {
        EdgeInsert::Inserted => info!(
            reaction = %kind,
            publisher_id = %publisher_id,
            publication_id = %publication_id,
            "Reaction added"
        ),
        EdgeInsert::AlreadyPresent => debug!(
            reaction = %kind,
            publisher_id = %publisher_id,
            publication_id = %publication_id,
            "Reaction already present"
        ),
        EdgeInsert::MissingEndpoint => {
            find_publisher(publisher_id, deps).await?;
            find_publication(publication_id, deps).await?;
            return Err(DomainError::not_found("publication", publication_id));
        }
    }
    Ok(())
}

async fn unreact(
    kind: Reaction,
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    find_publisher(publisher_id, deps).await?;
    find_publication(publication_id, deps).await?;

    if !deps.store.delete_reaction(kind, publisher_id, publication_id).await? {
        return Err(DomainError::NotFoundRelation(format!(
            "publisher {} has no {} on publication {}",
            publisher_id, kind, publication_id
        )));
    }

    info!(
        reaction = %kind,
        publisher_id = %publisher_id,
        publication_id = %publication_id,
        "Reaction removed"
    );
    Ok(())
}

pub async fn favorite(
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    react(Reaction::Favorite, publisher_id, publication_id, deps).await
}

pub async fn unfavorite(
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    unreact(Reaction::Favorite, publisher_id, publication_id, deps).await
}

pub async fn like(
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    react(Reaction::Like, publisher_id, publication_id, deps).await
}

pub async fn unlike(
    publisher_id: PublisherId,
    publication_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<()> {
    unreact(Reaction::Like, publisher_id, publication_id, deps).await
}

/// Publications `publisher_id` has favorited.
pub async fn list_favourites(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Vec<Publication>> {
    find_publisher(publisher_id, deps).await?;
    let ids = deps.store.reactions_by(Reaction::Favorite, publisher_id).await?;

    let mut publications = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(publication) = deps.store.find_publication(id).await? {
            publications.push(publication);
        }
    }
    Ok(publications)
}
