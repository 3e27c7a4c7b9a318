//! Mention and tag extraction from publication bodies.
//!
//! A body is split on whitespace into words. A word that starts with the
//! mention marker yields a mention handle, one that starts with the tag
//! marker yields a tag name. Exactly one leading marker is stripped, so
//! `@@bob` yields the handle `@bob`. Markers in the middle of a word are
//! plain text (`mail@example.org` is not a mention). No case folding and
//! no punctuation stripping happen here: `#Rust,` yields the tag `Rust,`.
//!
//! Pure and side-effect free; resolving handles and tags is the caller's job.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

/// Marker characters recognized at the start of a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markers {
    pub mention: char,
    pub tag: char,
}

impl Markers {
    pub fn new(mention: char, tag: char) -> DomainResult<Self> {
        if mention == tag {
            return Err(DomainError::Validation(format!(
                "mention and tag markers must differ (both '{}')",
                mention
            )));
        }
        if mention.is_whitespace() || tag.is_whitespace() {
            return Err(DomainError::Validation(
                "markers cannot be whitespace".to_string(),
            ));
        }
        Ok(Self { mention, tag })
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            mention: '@',
            tag: '#',
        }
    }
}

/// Candidate tokens found in a body, in first-occurrence order, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    pub mentions: Vec<String>,
    pub tags: Vec<String>,
}

impl Annotations {
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty() && self.tags.is_empty()
    }
}

/// Extract mention handles and tag names from `body`.
pub fn annotate(body: &str, markers: &Markers) -> Annotations {
    let mut annotations = Annotations::default();
    let mut seen_mentions = HashSet::new();
    let mut seen_tags = HashSet::new();

    for word in body.split_whitespace() {
        if let Some(handle) = word.strip_prefix(markers.mention) {
            if !handle.is_empty() && seen_mentions.insert(handle) {
                annotations.mentions.push(handle.to_string());
            }
        } else if let Some(name) = word.strip_prefix(markers.tag) {
            if !name.is_empty() && seen_tags.insert(name) {
                annotations.tags.push(name.to_string());
            }
        }
    }

    annotations
}
