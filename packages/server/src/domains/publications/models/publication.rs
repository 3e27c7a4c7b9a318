use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{PublicationId, PublisherId};
use crate::domains::tag::models::Tag;

/// Publication - authored content owned by one publisher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Publication {
    pub id: PublicationId,
    pub publisher_id: PublisherId,
    pub body: String,
    pub created_at: DateTime<Utc>,

    // One-hop pointer to the publication this one reposts. Never self.
    pub republished_from: Option<PublicationId>,
}

impl Publication {
    pub fn new(
        publisher_id: PublisherId,
        body: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PublicationId::new(),
            publisher_id,
            body: body.into(),
            created_at,
            republished_from: None,
        }
    }
}

/// A publication with its resolved relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationDetail {
    #[serde(flatten)]
    pub publication: Publication,
    pub mentions: Vec<PublisherId>,
    pub tags: Vec<Tag>,
    pub faved_by: Vec<PublisherId>,
    pub liked_by: Vec<PublisherId>,
    pub republished_by: Vec<PublicationId>,
}
