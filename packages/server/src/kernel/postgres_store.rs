//! Postgres-backed store.
//!
//! Uniqueness (account handles, tag names, edges) is enforced by the schema,
//! so every "insert if absent" is a single statement with `ON CONFLICT`.
//! Cascading deletes are foreign-key driven; see `migrations/`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgExecutor, PgPoolOptions, PgQueryResult};
use sqlx::PgPool;

use super::traits::{BaseAccountDirectory, BaseSocialStore, EdgeInsert, PublicationLinks};
use crate::common::{PublicationId, PublisherId, TagId};
use crate::domains::publications::models::{Publication, Reaction};
use crate::domains::publishers::models::Publisher;
use crate::domains::tag::models::Tag;

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self::new(pool))
    }
}

fn reaction_table(kind: Reaction) -> &'static str {
    match kind {
        Reaction::Favorite => "publication_faved_by",
        Reaction::Like => "publication_liked_by",
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// An edge insert fails its foreign key when an endpoint is gone.
fn edge_outcome(result: Result<PgQueryResult, sqlx::Error>) -> Result<EdgeInsert> {
    match result {
        Ok(done) if done.rows_affected() == 1 => Ok(EdgeInsert::Inserted),
        Ok(_) => Ok(EdgeInsert::AlreadyPresent),
        Err(err) if is_foreign_key_violation(&err) => Ok(EdgeInsert::MissingEndpoint),
        Err(err) => Err(err.into()),
    }
}

async fn upsert_tag_with<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
    as_of: DateTime<Utc>,
) -> Result<Tag> {
    let tag = sqlx::query_as::<_, Tag>(
        r#"
        INSERT INTO tags (id, name, last_use)
        VALUES ($1, $2, $3)
        ON CONFLICT (name) DO UPDATE
        SET last_use = GREATEST(tags.last_use, EXCLUDED.last_use)
        RETURNING *
        "#,
    )
    .bind(TagId::new())
    .bind(name)
    .bind(as_of)
    .fetch_one(executor)
    .await?;
    Ok(tag)
}

#[async_trait]
impl BaseAccountDirectory for PostgresStore {
    async fn find_publisher_by_account_handle(&self, handle: &str) -> Result<Option<Publisher>> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE account_handle = $1")
            .bind(handle)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }
}

#[async_trait]
impl BaseSocialStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_publisher(&self, publisher: &Publisher) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO publishers (id, account_handle, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(publisher.id)
        .bind(&publisher.account_handle)
        .bind(publisher.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_publisher(&self, id: PublisherId) -> Result<Option<Publisher>> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_publishers(&self) -> Result<Vec<Publisher>> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn delete_publisher(&self, id: PublisherId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn insert_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<EdgeInsert> {
        let result = sqlx::query(
            r#"
            INSERT INTO publisher_follows (follower_id, followed_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower)
        .bind(followed)
        .execute(&self.pool)
        .await;
        edge_outcome(result)
    }

    async fn delete_follow(
        &self,
        follower: PublisherId,
        followed: PublisherId,
    ) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM publisher_follows WHERE follower_id = $1 AND followed_id = $2",
        )
        .bind(follower)
        .bind(followed)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn follows_of(&self, follower: PublisherId) -> Result<Vec<PublisherId>> {
        sqlx::query_scalar::<_, PublisherId>(
            r#"
            SELECT followed_id FROM publisher_follows
            WHERE follower_id = $1
            ORDER BY followed_id
            "#,
        )
        .bind(follower)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn followers_of(&self, followed: PublisherId) -> Result<Vec<PublisherId>> {
        sqlx::query_scalar::<_, PublisherId>(
            r#"
            SELECT follower_id FROM publisher_follows
            WHERE followed_id = $1
            ORDER BY follower_id
            "#,
        )
        .bind(followed)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn insert_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<EdgeInsert> {
        let sql = format!(
            "INSERT INTO {} (publisher_id, publication_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
            reaction_table(kind)
        );
        let result = sqlx::query(&sql)
            .bind(publisher)
            .bind(publication)
            .execute(&self.pool)
            .await;
        edge_outcome(result)
    }

    async fn delete_reaction(
        &self,
        kind: Reaction,
        publisher: PublisherId,
        publication: PublicationId,
    ) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE publisher_id = $1 AND publication_id = $2",
            reaction_table(kind)
        );
        let result = sqlx::query(&sql)
            .bind(publisher)
            .bind(publication)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn reactions_by(
        &self,
        kind: Reaction,
        publisher: PublisherId,
    ) -> Result<Vec<PublicationId>> {
        let sql = format!(
            "SELECT publication_id FROM {} WHERE publisher_id = $1 ORDER BY publication_id",
            reaction_table(kind)
        );
        sqlx::query_scalar::<_, PublicationId>(&sql)
            .bind(publisher)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn reactions_to(
        &self,
        kind: Reaction,
        publication: PublicationId,
    ) -> Result<Vec<PublisherId>> {
        let sql = format!(
            "SELECT publisher_id FROM {} WHERE publication_id = $1 ORDER BY publisher_id",
            reaction_table(kind)
        );
        sqlx::query_scalar::<_, PublisherId>(&sql)
            .bind(publication)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn upsert_tag(&self, name: &str, as_of: DateTime<Utc>) -> Result<Tag> {
        upsert_tag_with(&self.pool, name, as_of).await
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name COLLATE \"C\"")
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_tags_used_after(&self, threshold: DateTime<Utc>) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            r#"SELECT * FROM tags WHERE last_use > $1 ORDER BY name COLLATE "C""#,
        )
            .bind(threshold)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn insert_publication(
        &self,
        publication: &Publication,
        mentions: &[PublisherId],
        tag_names: &[String],
    ) -> Result<Option<PublicationLinks>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO publications (id, publisher_id, body, created_at, republished_from)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(publication.id)
        .bind(publication.publisher_id)
        .bind(&publication.body)
        .bind(publication.created_at)
        .bind(publication.republished_from)
        .execute(&mut *tx)
        .await;
        match inserted {
            Ok(_) => {}
            // Missing author; dropping `tx` rolls back
            Err(err) if is_foreign_key_violation(&err) => return Ok(None),
            Err(err) => return Err(err.into()),
        }

        // Publishers deleted since the caller resolved them are skipped
        let mut mentions = sqlx::query_scalar::<_, PublisherId>(
            r#"
            INSERT INTO publication_mentions (publication_id, publisher_id)
            SELECT $1, p.id
            FROM publishers p
            WHERE p.id = ANY($2::uuid[])
            FOR KEY SHARE
            ON CONFLICT DO NOTHING
            RETURNING publisher_id
            "#,
        )
        .bind(publication.id)
        .bind(mentions)
        .fetch_all(&mut *tx)
        .await?;
        mentions.sort();

        // Sorted so concurrent creates lock tag rows in the same order
        let mut names: Vec<&str> = tag_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            tags.push(upsert_tag_with(&mut *tx, name, publication.created_at).await?);
        }
        let tag_ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();

        sqlx::query(
            r#"
            INSERT INTO publication_tags (publication_id, tag_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(publication.id)
        .bind(tag_ids.as_slice())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(PublicationLinks { mentions, tags }))
    }

    async fn find_publication(&self, id: PublicationId) -> Result<Option<Publication>> {
        sqlx::query_as::<_, Publication>("SELECT * FROM publications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn delete_publication(&self, id: PublicationId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM publications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_republished_from(
        &self,
        target: PublicationId,
        source: PublicationId,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE publications SET republished_from = $2 WHERE id = $1")
            .bind(target)
            .bind(source)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_by_author(&self, publisher: PublisherId) -> Result<Vec<Publication>> {
        sqlx::query_as::<_, Publication>(
            "SELECT * FROM publications WHERE publisher_id = $1 ORDER BY id",
        )
        .bind(publisher)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_tag(&self, tag: TagId) -> Result<Vec<Publication>> {
        sqlx::query_as::<_, Publication>(
            r#"
            SELECT p.*
            FROM publications p
            INNER JOIN publication_tags pt ON pt.publication_id = p.id
            WHERE pt.tag_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_mention(&self, publisher: PublisherId) -> Result<Vec<Publication>> {
        sqlx::query_as::<_, Publication>(
            r#"
            SELECT p.*
            FROM publications p
            INNER JOIN publication_mentions pm ON pm.publication_id = p.id
            WHERE pm.publisher_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(publisher)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn mentions_of(&self, publication: PublicationId) -> Result<Vec<PublisherId>> {
        sqlx::query_scalar::<_, PublisherId>(
            r#"
            SELECT publisher_id FROM publication_mentions
            WHERE publication_id = $1
            ORDER BY publisher_id
            "#,
        )
        .bind(publication)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn tags_of(&self, publication: PublicationId) -> Result<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN publication_tags pt ON pt.tag_id = t.id
            WHERE pt.publication_id = $1
            ORDER BY t.name COLLATE "C"
            "#,
        )
        .bind(publication)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn republished_by(&self, source: PublicationId) -> Result<Vec<PublicationId>> {
        sqlx::query_scalar::<_, PublicationId>(
            "SELECT id FROM publications WHERE republished_from = $1 ORDER BY id",
        )
        .bind(source)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }
}
