//! Integration tests for publication creation, annotation linking,
//! republishing, relation queries and deletion.

mod common;

use std::sync::Arc;

use crate::common::{day, init_tracing, memory_deps, register};
use server_core::common::{DomainError, PublicationId, PublisherId, TagId};
use server_core::domains::annotation::Markers;
use server_core::domains::publications::actions::{
    by_author, by_mention, by_tag, create_publication, delete_publication, find_publication,
    publication_detail, republish,
};
use server_core::domains::publishers::actions::{favorite, like, publisher_detail};
use server_core::domains::publishers::models::Publisher;
use server_core::domains::tag::actions::{find_tag, list_tags};
use server_core::kernel::{MemoryStore, ServerDeps, SpyAccountDirectory};

fn ids(
    publications: &[server_core::domains::publications::models::Publication],
) -> Vec<PublicationId> {
    let mut ids: Vec<PublicationId> = publications.iter().map(|p| p.id).collect();
    ids.sort();
    ids
}

// =============================================================================
// Creation
// =============================================================================

#[tokio::test]
async fn create_links_mentions_and_tags() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let detail = create_publication(alice.id, "Check @bob re #launch", day(2), &deps)
        .await
        .unwrap();

    assert_eq!(detail.publication.publisher_id, alice.id);
    assert_eq!(detail.publication.body, "Check @bob re #launch");
    assert_eq!(detail.publication.created_at, day(2));
    assert_eq!(detail.publication.republished_from, None);
    assert_eq!(detail.mentions, vec![bob.id]);
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].name, "launch");
    assert_eq!(detail.tags[0].last_use, day(2));

    // The stored view matches what creation returned
    let stored = publication_detail(detail.publication.id, &deps).await.unwrap();
    assert_eq!(stored.publication, detail.publication);
    assert_eq!(stored.mentions, detail.mentions);
    assert_eq!(stored.tags, detail.tags);

    // Both ends of each edge are visible
    let bob_view = publisher_detail(bob.id, &deps).await.unwrap();
    assert_eq!(bob_view.mentioned_in, vec![detail.publication.id]);
    let tagged = by_tag(detail.tags[0].id, &deps).await.unwrap();
    assert_eq!(ids(&tagged), vec![detail.publication.id]);
    let authored = by_author(alice.id, &deps).await.unwrap();
    assert_eq!(ids(&authored), vec![detail.publication.id]);
}

#[tokio::test]
async fn unresolved_mentions_are_skipped() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let detail = create_publication(alice.id, "hi @bob and @nobody", day(2), &deps)
        .await
        .unwrap();
    assert_eq!(detail.mentions, vec![bob.id]);
}

#[tokio::test]
async fn repeated_mentions_and_tags_link_once() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let detail = create_publication(alice.id, "@bob @bob #rust #rust", day(2), &deps)
        .await
        .unwrap();
    assert_eq!(detail.mentions, vec![bob.id]);
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(list_tags(&deps).await.unwrap().len(), 1);
}

#[tokio::test]
async fn self_mention_is_allowed() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;

    let detail = create_publication(alice.id, "note to @alice", day(2), &deps)
        .await
        .unwrap();
    assert_eq!(detail.mentions, vec![alice.id]);
}

#[tokio::test]
async fn plain_body_has_no_links() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;

    let detail = create_publication(alice.id, "just words, e-mail me at a@b.c", day(2), &deps)
        .await
        .unwrap();
    assert!(detail.mentions.is_empty());
    assert!(detail.tags.is_empty());
}

#[tokio::test]
async fn empty_body_is_allowed() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;

    let detail = create_publication(alice.id, "", day(2), &deps).await.unwrap();
    assert_eq!(detail.publication.body, "");
}

#[tokio::test]
async fn unknown_author_is_validation_error() {
    let deps = memory_deps();

    let err = create_publication(PublisherId::new(), "hello #ghost", day(2), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    // Nothing was written
    assert!(list_tags(&deps).await.unwrap().is_empty());
}

#[tokio::test]
async fn tags_track_latest_publication_date() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;

    let first = create_publication(alice.id, "#rust", day(10), &deps).await.unwrap();
    create_publication(alice.id, "older #rust", day(3), &deps).await.unwrap();

    let tag = find_tag(first.tags[0].id, &deps).await.unwrap();
    assert_eq!(tag.last_use, day(10));
    assert_eq!(by_tag(tag.id, &deps).await.unwrap().len(), 2);
}

#[tokio::test]
async fn custom_markers_are_honored() {
    init_tracing();
    let deps = ServerDeps::in_memory(Markers::new('+', '$').unwrap());
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let detail = create_publication(alice.id, "@alice +bob #no $yes", day(2), &deps)
        .await
        .unwrap();
    assert_eq!(detail.mentions, vec![bob.id]);
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].name, "yes");
}

#[tokio::test]
async fn mentions_resolve_through_injected_directory() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let seed = ServerDeps::new(store.clone(), store.clone(), Markers::default());
    let alice = register(&seed, "alice").await;
    let bob = register(&seed, "bob").await;
    let carol = register(&seed, "carol").await;

    // The directory only knows bob, even though carol exists in the store
    let directory = SpyAccountDirectory::new().with_publisher(&bob);
    let deps = ServerDeps::new(store, Arc::new(directory.clone()), Markers::default());

    let detail = create_publication(alice.id, "@bob @carol", day(2), &deps)
        .await
        .unwrap();
    assert_eq!(detail.mentions, vec![bob.id]);
    assert_eq!(directory.lookups(), vec!["bob".to_string(), "carol".to_string()]);
    assert!(by_mention(carol.id, &deps).await.unwrap().is_empty());
}

#[tokio::test]
async fn mention_resolved_to_missing_publisher_is_skipped() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let seed = ServerDeps::new(store.clone(), store.clone(), Markers::default());
    let alice = register(&seed, "alice").await;

    // The directory still resolves a publisher the store no longer has
    let ghost = Publisher::new("ghost", day(1));
    let directory = SpyAccountDirectory::new().with_publisher(&ghost);
    let deps = ServerDeps::new(store, Arc::new(directory), Markers::default());

    let detail = create_publication(alice.id, "hi @ghost #launch", day(2), &deps)
        .await
        .unwrap();
    assert!(detail.mentions.is_empty());
    assert_eq!(detail.tags.len(), 1);
    assert_eq!(detail.tags[0].name, "launch");

    let stored = publication_detail(detail.publication.id, &deps).await.unwrap();
    assert!(stored.mentions.is_empty());
    assert_eq!(stored.tags, detail.tags);
}

#[tokio::test]
async fn links_are_ordered_the_same_on_create_and_read() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;
    let carol = register(&deps, "carol").await;

    let detail = create_publication(alice.id, "@carol @bob #zeta #mid #alpha", day(2), &deps)
        .await
        .unwrap();

    let names: Vec<&str> = detail.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    let mut mentions = vec![bob.id, carol.id];
    mentions.sort();
    assert_eq!(detail.mentions, mentions);

    let stored = publication_detail(detail.publication.id, &deps).await.unwrap();
    assert_eq!(stored.tags, detail.tags);
    assert_eq!(stored.mentions, detail.mentions);
}

// =============================================================================
// Republish
// =============================================================================

async fn two_publications(deps: &ServerDeps) -> (Publisher, PublicationId, PublicationId) {
    let alice = register(deps, "alice").await;
    let a = create_publication(alice.id, "first", day(2), deps).await.unwrap();
    let b = create_publication(alice.id, "second", day(3), deps).await.unwrap();
    (alice, a.publication.id, b.publication.id)
}

#[tokio::test]
async fn republish_points_target_at_source() {
    let deps = memory_deps();
    let (_, source, target) = two_publications(&deps).await;

    let updated = republish(source, target, &deps).await.unwrap();
    assert_eq!(updated.id, target);
    assert_eq!(updated.republished_from, Some(source));

    let stored = find_publication(target, &deps).await.unwrap();
    assert_eq!(stored.republished_from, Some(source));
    let source_view = publication_detail(source, &deps).await.unwrap();
    assert_eq!(source_view.republished_by, vec![target]);
}

#[tokio::test]
async fn republish_self_is_rejected() {
    let deps = memory_deps();
    let (_, source, _) = two_publications(&deps).await;

    let err = republish(source, source, &deps).await.unwrap_err();
    assert!(matches!(err, DomainError::SelfReference(_)));
    assert_eq!(find_publication(source, &deps).await.unwrap().republished_from, None);
}

#[tokio::test]
async fn mutual_republish_is_allowed() {
    let deps = memory_deps();
    let (_, a, b) = two_publications(&deps).await;

    republish(a, b, &deps).await.unwrap();
    republish(b, a, &deps).await.unwrap();

    assert_eq!(find_publication(a, &deps).await.unwrap().republished_from, Some(b));
    assert_eq!(find_publication(b, &deps).await.unwrap().republished_from, Some(a));
}

#[tokio::test]
async fn republish_replaces_earlier_source() {
    let deps = memory_deps();
    let (alice, a, b) = two_publications(&deps).await;
    let c = create_publication(alice.id, "third", day(4), &deps).await.unwrap().publication.id;

    republish(a, c, &deps).await.unwrap();
    republish(b, c, &deps).await.unwrap();

    assert_eq!(find_publication(c, &deps).await.unwrap().republished_from, Some(b));
    assert!(publication_detail(a, &deps).await.unwrap().republished_by.is_empty());
}

#[tokio::test]
async fn republish_unknown_publication_is_not_found() {
    let deps = memory_deps();
    let (_, a, _) = two_publications(&deps).await;

    let err = republish(PublicationId::new(), a, &deps).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
    let err = republish(a, PublicationId::new(), &deps).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}

// =============================================================================
// Queries
// =============================================================================

#[tokio::test]
async fn queries_require_existing_anchor() {
    let deps = memory_deps();

    assert!(matches!(
        by_author(PublisherId::new(), &deps).await.unwrap_err(),
        DomainError::NotFound { entity: "publisher", .. }
    ));
    assert!(matches!(
        by_mention(PublisherId::new(), &deps).await.unwrap_err(),
        DomainError::NotFound { entity: "publisher", .. }
    ));
    assert!(matches!(
        by_tag(TagId::new(), &deps).await.unwrap_err(),
        DomainError::NotFound { entity: "tag", .. }
    ));
}

#[tokio::test]
async fn by_mention_returns_every_mentioning_publication() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let one = create_publication(alice.id, "@bob one", day(2), &deps).await.unwrap();
    let two = create_publication(bob.id, "two @bob", day(3), &deps).await.unwrap();
    create_publication(alice.id, "three", day(4), &deps).await.unwrap();

    let mut expected = vec![one.publication.id, two.publication.id];
    expected.sort();
    assert_eq!(ids(&by_mention(bob.id, &deps).await.unwrap()), expected);
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn delete_publication_clears_edges_but_keeps_tags() {
    let deps = memory_deps();
    let alice = register(&deps, "alice").await;
    let bob = register(&deps, "bob").await;

    let detail = create_publication(alice.id, "@bob #launch", day(2), &deps).await.unwrap();
    let id = detail.publication.id;
    let reposted = create_publication(bob.id, "repost", day(3), &deps)
        .await
        .unwrap()
        .publication
        .id;
    republish(id, reposted, &deps).await.unwrap();
    favorite(bob.id, id, &deps).await.unwrap();
    like(bob.id, id, &deps).await.unwrap();

    delete_publication(id, &deps).await.unwrap();

    assert!(matches!(
        find_publication(id, &deps).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    let bob_view = publisher_detail(bob.id, &deps).await.unwrap();
    assert!(bob_view.mentioned_in.is_empty());
    assert!(bob_view.favourites.is_empty());
    assert!(bob_view.likes.is_empty());
    assert!(by_author(alice.id, &deps).await.unwrap().is_empty());

    // The tag survives with no publications
    let tag = find_tag(detail.tags[0].id, &deps).await.unwrap();
    assert!(by_tag(tag.id, &deps).await.unwrap().is_empty());

    // The republish pointer is cleared rather than left dangling
    assert_eq!(find_publication(reposted, &deps).await.unwrap().republished_from, None);

    let err = delete_publication(id, &deps).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }));
}
