pub mod publication;
pub mod reaction;

pub use publication::{Publication, PublicationDetail};
pub use reaction::Reaction;
