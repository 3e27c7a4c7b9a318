// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Invariant checks (self-follow, duplicate edges, tag-name rules) live in the
// domain actions; the store only has to make each call atomic.
//
// Naming convention: Base* for trait names (e.g., BaseSocialStore)

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::common::{PublicationId, PublisherId, TagId};
use crate::domains::publications::models::{Publication, Reaction};
use crate::domains::publishers::models::Publisher;
use crate::domains::tag::models::Tag;

// =============================================================================
// Store outcomes
// =============================================================================

/// Result of adding an edge between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    Inserted,
    AlreadyPresent,
    /// One of the endpoints does not exist (or was deleted concurrently).
    MissingEndpoint,
}

/// Links stored together with a new publication.
///
/// Mentions are ordered by id and tags by name, the same order the
/// relation queries (`mentions_of`, `tags_of`) return.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationLinks {
    pub mentions: Vec<PublisherId>,
    pub tags: Vec<Tag>,
}

// =============================================================================
// Account Directory Trait (Infrastructure - identity resolution)
// =============================================================================

/// Maps external account handles to publishers.
///
/// Injected separately from the store so mention resolution can be swapped
/// (e.g. for a case-insensitive directory) without touching persistence.
#[async_trait]
pub trait BaseAccountDirectory: Send + Sync {
    async fn find_publisher_by_account_handle(&self, handle: &str) -> Result<Option<Publisher>>;
}

// =============================================================================
// Social Store Trait (Infrastructure - persistence)
// =============================================================================

/// Persistence for publishers, publications, tags and the edges between them.
///
/// Every method is one atomic unit of work. Edge inserts and removals report
/// whether they changed anything, which is how callers detect duplicates
/// without a racy read-then-write.
#[async_trait]
pub trait BaseSocialStore: Send + Sync {
    /// Liveness check used by the health route.
    async fn ping(&self) -> Result<()>;

    // -- publishers --------------------------------------------------------

    /// Returns false when the account handle is already taken.
    async fn insert_publisher(&self, publisher: &Publisher) -> Result<bool>;

    async fn find_publisher(&self, id: PublisherId) -> Result<Option<Publisher>>;

    async fn list_publishers(&self) -> Result<Vec<Publisher>>;

    /// Deletes the publisher, its authored publications and every edge
    /// touching either. Returns false when the publisher did not exist.
    async fn delete_publisher(&self, id: PublisherId) -> Result<bool>;

    // -- follow edges ------------------------------------------------------

    async fn insert_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<EdgeInsert>;

    async fn delete_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<bool>;

    /// Publishers that `follower` follows.
    async fn follows_of(&self, follower: PublisherId) -> Result<Vec<PublisherId>>;

    /// Publishers following `followed`.
    async fn followers_of(&self, followed: PublisherId) -> Result<Vec<PublisherId>>;

    // -- favorite / like edges ---------------------------------------------

    async fn insert_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<EdgeInsert>;

    async fn delete_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<bool>;

    /// Publications the publisher reacted to with `kind`.
    async fn reactions_by(
        &self,
        kind: Reaction,
        publisher: PublisherId,
    ) -> Result<Vec<PublicationId>>;

    /// Publishers that reacted to the publication with `kind`.
    async fn reactions_to(
        &self,
        kind: Reaction,
        publication: PublicationId,
    ) -> Result<Vec<PublisherId>>;

    // -- tags --------------------------------------------------------------

    /// Atomic resolve-or-create keyed by exact name. An existing tag gets
    /// `last_use = max(last_use, as_of)`; a new one starts at `as_of`.
    async fn upsert_tag(&self, name: &str, as_of: DateTime<Utc>) -> Result<Tag>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;

    /// Tags whose `last_use` is strictly after `threshold`.
    async fn find_tags_used_after(&self, threshold: DateTime<Utc>) -> Result<Vec<Tag>>;

    // -- publications ------------------------------------------------------

    /// Stores the publication with its links in one unit of work.
    ///
    /// Each tag name is resolved or created with `last_use` moved up to the
    /// publication's `created_at`. Mention ids that no longer name a
    /// publisher are dropped. Returns `None`, writing nothing, when the
    /// author does not exist.
    async fn insert_publication(
        &self,
        publication: &Publication,
        mentions: &[PublisherId],
        tag_names: &[String],
    ) -> Result<Option<PublicationLinks>>;

    async fn find_publication(&self, id: PublicationId) -> Result<Option<Publication>>;

    /// Deletes the publication and its edges; publications that republished
    /// it lose their `republished_from` pointer. Tags survive.
    async fn delete_publication(&self, id: PublicationId) -> Result<bool>;

    /// Points `target.republished_from` at `source`. False if `target` is gone.
    async fn set_republished_from(
        &self,
        target: PublicationId,
        source: PublicationId,
    ) -> Result<bool>;

    async fn find_by_author(&self, publisher: PublisherId) -> Result<Vec<Publication>>;

    async fn find_by_tag(&self, tag: TagId) -> Result<Vec<Publication>>;

    async fn find_by_mention(&self, publisher: PublisherId) -> Result<Vec<Publication>>;

    async fn mentions_of(&self, publication: PublicationId) -> Result<Vec<PublisherId>>;

    /// Tags of the publication, ordered by name.
    async fn tags_of(&self, publication: PublicationId) -> Result<Vec<Tag>>;

    async fn republished_by(&self, source: PublicationId) -> Result<Vec<PublicationId>>;
}
