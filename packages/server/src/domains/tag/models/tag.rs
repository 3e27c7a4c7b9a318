use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::TagId;

/// Tag - one row per distinct label, keyed by exact name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String, // case-sensitive, without the tag marker
    pub last_use: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: impl Into<String>, last_use: DateTime<Utc>) -> Self {
        Self {
            id: TagId::new(),
            name: name.into(),
            last_use,
        }
    }

    /// Moves `last_use` forward to `as_of`; an older date leaves it alone.
    pub fn touch(&mut self, as_of: DateTime<Utc>) {
        if as_of > self.last_use {
            self.last_use = as_of;
        }
    }

    /// Whether the tag was used strictly after `threshold`.
    pub fn used_after(&self, threshold: DateTime<Utc>) -> bool {
        self.last_use > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn touch_only_moves_forward() {
        let mut tag = Tag::new("rust", day(10));
        tag.touch(day(5));
        assert_eq!(tag.last_use, day(10));
        tag.touch(day(12));
        assert_eq!(tag.last_use, day(12));
    }

    #[test]
    fn used_after_is_strict() {
        let tag = Tag::new("rust", day(10));
        assert!(!tag.used_after(day(10)));
        assert!(tag.used_after(day(10) - Duration::seconds(1)));
    }
}
