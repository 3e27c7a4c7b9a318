use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{PublicationId, PublisherId};

/// Publisher - the authoring identity of exactly one external account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Publisher {
    pub id: PublisherId,
    pub account_handle: String, // unique, the login used in @mentions
    pub created_at: DateTime<Utc>,
}

impl Publisher {
    pub fn new(account_handle: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: PublisherId::new(),
            account_handle: account_handle.into(),
            created_at,
        }
    }
}

/// A publisher together with every relation it takes part in.
///
/// All collections are projections of the shared edge sets, so `follows`
/// here and `followers` on the other side can never disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherDetail {
    #[serde(flatten)]
    pub publisher: Publisher,
    pub follows: Vec<PublisherId>,
    pub followers: Vec<PublisherId>,
    pub favourites: Vec<PublicationId>,
    pub likes: Vec<PublicationId>,
    pub mentioned_in: Vec<PublicationId>,
}
