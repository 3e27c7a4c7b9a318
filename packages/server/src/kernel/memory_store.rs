//! In-process store backed by edge sets.
//!
//! All state sits behind a single `RwLock`, so every trait call is one
//! atomic unit of work: concurrent upserts of a new tag name produce one
//! row, and a follow edge is never visible from one side only.

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::edge_set::EdgeSet;
use super::traits::{BaseAccountDirectory, BaseSocialStore, EdgeInsert, PublicationLinks};
use crate::common::{PublicationId, PublisherId, TagId};
use crate::domains::publications::models::{Publication, Reaction};
use crate::domains::publishers::models::Publisher;
use crate::domains::tag::models::Tag;

#[derive(Debug, Default)]
struct GraphState {
    publishers: HashMap<PublisherId, Publisher>,
    handles: HashMap<String, PublisherId>,
    publications: HashMap<PublicationId, Publication>,
    tags: HashMap<TagId, Tag>,
    tag_names: HashMap<String, TagId>,

    authorship: EdgeSet<PublisherId, PublicationId>,
    follows: EdgeSet<PublisherId, PublisherId>,
    favorites: EdgeSet<PublisherId, PublicationId>,
    likes: EdgeSet<PublisherId, PublicationId>,
    mentions: EdgeSet<PublicationId, PublisherId>,
    taggings: EdgeSet<PublicationId, TagId>,
}

impl GraphState {
    fn reactions(&self, kind: Reaction) -> &EdgeSet<PublisherId, PublicationId> {
        match kind {
            Reaction::Favorite => &self.favorites,
            Reaction::Like => &self.likes,
        }
    }

    fn reactions_mut(&mut self, kind: Reaction) -> &mut EdgeSet<PublisherId, PublicationId> {
        match kind {
            Reaction::Favorite => &mut self.favorites,
            Reaction::Like => &mut self.likes,
        }
    }

    fn upsert_tag(&mut self, name: &str, as_of: DateTime<Utc>) -> Tag {
        if let Some(id) = self.tag_names.get(name).copied() {
            if let Some(tag) = self.tags.get_mut(&id) {
                tag.touch(as_of);
                return tag.clone();
            }
        }
        let tag = Tag::new(name, as_of);
        self.tag_names.insert(tag.name.clone(), tag.id);
        self.tags.insert(tag.id, tag.clone());
        tag
    }

    fn publications_for(&self, ids: Vec<PublicationId>) -> Vec<Publication> {
        ids.into_iter()
            .filter_map(|id| self.publications.get(&id).cloned())
            .collect()
    }

    fn remove_publication(&mut self, id: PublicationId) -> bool {
        let Some(publication) = self.publications.remove(&id) else {
            return false;
        };
        self.authorship.remove(publication.publisher_id, id);
        self.mentions.remove_left(id);
        self.taggings.remove_left(id);
        self.favorites.remove_right(id);
        self.likes.remove_right(id);
        for other in self.publications.values_mut() {
            if other.republished_from == Some(id) {
                other.republished_from = None;
            }
        }
        true
    }
}

/// Store that keeps everything in memory. Used by tests and by the server
/// when no `DATABASE_URL` is configured.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<GraphState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_name(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    tags
}

fn edge_outcome(inserted: bool) -> EdgeInsert {
    if inserted {
        EdgeInsert::Inserted
    } else {
        EdgeInsert::AlreadyPresent
    }
}

#[async_trait]
impl BaseAccountDirectory for MemoryStore {
    async fn find_publisher_by_account_handle(&self, handle: &str) -> Result<Option<Publisher>> {
        let state = self.state.read().await;
        Ok(state
            .handles
            .get(handle)
            .and_then(|id| state.publishers.get(id))
            .cloned())
    }
}

#[async_trait]
impl BaseSocialStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn insert_publisher(&self, publisher: &Publisher) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.handles.contains_key(&publisher.account_handle)
            || state.publishers.contains_key(&publisher.id)
        {
            return Ok(false);
        }
        state
            .handles
            .insert(publisher.account_handle.clone(), publisher.id);
        state.publishers.insert(publisher.id, publisher.clone());
        Ok(true)
    }

    async fn find_publisher(&self, id: PublisherId) -> Result<Option<Publisher>> {
        Ok(self.state.read().await.publishers.get(&id).cloned())
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>> {
        let state = self.state.read().await;
        let mut publishers: Vec<Publisher> = state.publishers.values().cloned().collect();
        publishers.sort_by_key(|p| p.id);
        Ok(publishers)
    }

    async fn delete_publisher(&self, id: PublisherId) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(publisher) = state.publishers.remove(&id) else {
            return Ok(false);
        };
        state.handles.remove(&publisher.account_handle);

        for publication_id in state.authorship.right_of(id) {
            state.remove_publication(publication_id);
        }
        state.follows.remove_left(id);
        state.follows.remove_right(id);
        state.favorites.remove_left(id);
        state.likes.remove_left(id);
        state.mentions.remove_right(id);
        Ok(true)
    }

    async fn insert_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<EdgeInsert> {
        let mut state = self.state.write().await;
        if follower == followed {
            bail!("publisher {} cannot follow itself", follower);
        }
        if !state.publishers.contains_key(&follower) || !state.publishers.contains_key(&followed) {
            return Ok(EdgeInsert::MissingEndpoint);
        }
        Ok(edge_outcome(state.follows.insert(follower, followed)))
    }

    async fn delete_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<bool> {
        Ok(self.state.write().await.follows.remove(follower, followed))
    }

    async fn follows_of(&self, follower: PublisherId) -> Result<Vec<PublisherId>> {
        Ok(self.state.read().await.follows.right_of(follower))
    }

    async fn followers_of(&self, followed: PublisherId) -> Result<Vec<PublisherId>> {
        Ok(self.state.read().await.follows.left_of(followed))
    }

    async fn insert_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<EdgeInsert> {
        let mut state = self.state.write().await;
        if !state.publishers.contains_key(&publisher)
            || !state.publications.contains_key(&publication)
        {
            return Ok(EdgeInsert::MissingEndpoint);
        }
        Ok(edge_outcome(state.reactions_mut(kind).insert(publisher, publication)))
    }

    async fn delete_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<bool> {
        Ok(self
            .state
            .write()
            .await
            .reactions_mut(kind)
            .remove(publisher, publication))
    }

    async fn reactions_by(
        &self,
        kind: Reaction,
        publisher: PublisherId,
    ) -> Result<Vec<PublicationId>> {
        Ok(self.state.read().await.reactions(kind).right_of(publisher))
    }

    async fn reactions_to(
        &self,
        kind: Reaction,
        publication: PublicationId,
    ) -> Result<Vec<PublisherId>> {
        Ok(self.state.read().await.reactions(kind).left_of(publication))
    }

    async fn upsert_tag(&self, name: &str, as_of: DateTime<Utc>) -> Result<Tag> {
        Ok(self.state.write().await.upsert_tag(name, as_of))
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>> {
        Ok(self.state.read().await.tags.get(&id).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(state.tags.values().cloned().collect()))
    }

    async fn find_tags_used_after(&self, threshold: DateTime<Utc>) -> Result<Vec<Tag>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(
            state
                .tags
                .values()
                .filter(|tag| tag.used_after(threshold))
                .cloned()
                .collect(),
        ))
    }

    async fn insert_publication(
        &self,
        publication: &Publication,
        mentions: &[PublisherId],
        tag_names: &[String],
    ) -> Result<Option<PublicationLinks>> {
        let mut state = self.state.write().await;
        if state.publications.contains_key(&publication.id) {
            bail!("publication {} already exists", publication.id);
        }
        if !state.publishers.contains_key(&publication.publisher_id) {
            return Ok(None);
        }

        let id = publication.id;
        state.publications.insert(id, publication.clone());
        state.authorship.insert(publication.publisher_id, id);
        for mentioned in mentions {
            if state.publishers.contains_key(mentioned) {
                state.mentions.insert(id, *mentioned);
            }
        }
        for name in tag_names {
            let tag = state.upsert_tag(name, publication.created_at);
            state.taggings.insert(id, tag.id);
        }

        let mentions = state.mentions.right_of(id);
        let tags = sorted_by_name(
            state
                .taggings
                .right_of(id)
                .into_iter()
                .filter_map(|tag| state.tags.get(&tag).cloned())
                .collect(),
        );
        Ok(Some(PublicationLinks { mentions, tags }))
    }

    async fn find_publication(&self, id: PublicationId) -> Result<Option<Publication>> {
        Ok(self.state.read().await.publications.get(&id).cloned())
    }

    async fn delete_publication(&self, id: PublicationId) -> Result<bool> {
        Ok(self.state.write().await.remove_publication(id))
    }

    async fn set_republished_from(
        &self,
        target: PublicationId,
        source: PublicationId,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        if target == source {
            bail!("publication {} cannot republish itself", target);
        }
        if !state.publications.contains_key(&source) {
            bail!("republish source {} does not exist", source);
        }
        match state.publications.get_mut(&target) {
            Some(publication) => {
                publication.republished_from = Some(source);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_author(&self, publisher: PublisherId) -> Result<Vec<Publication>> {
        let state = self.state.read().await;
        Ok(state.publications_for(state.authorship.right_of(publisher)))
    }

    async fn find_by_tag(&self, tag: TagId) -> Result<Vec<Publication>> {
        let state = self.state.read().await;
        Ok(state.publications_for(state.taggings.left_of(tag)))
    }

    async fn find_by_mention(&self, publisher: PublisherId) -> Result<Vec<Publication>> {
        let state = self.state.read().await;
        Ok(state.publications_for(state.mentions.left_of(publisher)))
    }

    async fn mentions_of(&self, publication: PublicationId) -> Result<Vec<PublisherId>> {
        Ok(self.state.read().await.mentions.right_of(publication))
    }

    async fn tags_of(&self, publication: PublicationId) -> Result<Vec<Tag>> {
        let state = self.state.read().await;
        Ok(sorted_by_name(
            state
                .taggings
                .right_of(publication)
                .into_iter()
                .filter_map(|id| state.tags.get(&id).cloned())
                .collect(),
        ))
    }

    async fn republished_by(&self, source: PublicationId) -> Result<Vec<PublicationId>> {
        let state = self.state.read().await;
        let mut ids: Vec<PublicationId> = state
            .publications
            .values()
            .filter(|p| p.republished_from == Some(source))
            .map(|p| p.id)
            .collect();
        ids.sort();
        Ok(ids)
    }
}
