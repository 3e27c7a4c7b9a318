//! Typed ID definitions for the social graph entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Publisher entities (accounts that author and follow).
pub struct Publisher;

/// Marker type for Publication entities (authored posts).
pub struct Publication;

/// Marker type for Tag entities (hashtag labels).
pub struct Tag;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type PublisherId = Id<Publisher>;

pub type PublicationId = Id<Publication>;

pub type TagId = Id<Tag>;
