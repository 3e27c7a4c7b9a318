//! Publisher lifecycle - registration, lookup, detail view, deletion

use chrono::{DateTime, Utc};
use tracing::info;

use crate::common::{DomainError, DomainResult, PublisherId};
use crate::domains::publications::models::Reaction;
use crate::domains::publishers::models::{Publisher, PublisherDetail};
use crate::kernel::ServerDeps;

/// Create the publisher for an external account.
///
/// One account maps to exactly one publisher, so a taken handle is a
/// duplicate relation rather than a silent upsert.
pub async fn register_publisher(
    account_handle: &str,
    created_at: DateTime<Utc>,
    deps: &ServerDeps,
) -> DomainResult<Publisher> {
    if account_handle.is_empty() || account_handle.chars().any(char::is_whitespace) {
        return Err(DomainError::Validation(format!(
            "invalid account handle: {:?}",
            account_handle
        )));
    }

    let publisher = Publisher::new(account_handle, created_at);
    if !deps.store.insert_publisher(&publisher).await? {
        return Err(DomainError::DuplicateRelation(format!(
            "account {} already has a publisher",
            account_handle
        )));
    }

    info!(publisher_id = %publisher.id, account_handle = %account_handle, "Publisher registered");
    Ok(publisher)
}

pub async fn find_publisher(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<Publisher> {
    deps.store
        .find_publisher(publisher_id)
        .await?
        .ok_or_else(|| DomainError::not_found("publisher", publisher_id))
}

pub async fn list_publishers(deps: &ServerDeps) -> DomainResult<Vec<Publisher>> {
    Ok(deps.store.list_publishers().await?)
}

/// The publisher with every relation it takes part in.
pub async fn publisher_detail(
    publisher_id: PublisherId,
    deps: &ServerDeps,
) -> DomainResult<PublisherDetail> {
    let publisher = find_publisher(publisher_id, deps).await?;

    let mentioned_in = deps
        .store
        .find_by_mention(publisher_id)
        .await?
        .into_iter()
        .map(|publication| publication.id)
        .collect();

    Ok(PublisherDetail {
        follows: deps.store.follows_of(publisher_id).await?,
        followers: deps.store.followers_of(publisher_id).await?,
        favourites: deps.store.reactions_by(Reaction::Favorite, publisher_id).await?,
        likes: deps.store.reactions_by(Reaction::Like, publisher_id).await?,
        mentioned_in,
        publisher,
    })
}

/// Delete a publisher along with its publications and every edge touching it.
pub async fn delete_publisher(publisher_id: PublisherId, deps: &ServerDeps) -> DomainResult<()> {
    if !deps.store.delete_publisher(publisher_id).await? {
        return Err(DomainError::not_found("publisher", publisher_id));
    }

    info!(publisher_id = %publisher_id, "Publisher deleted");
    Ok(())
}
