pub mod actions;
pub mod models;

pub use models::{Publication, PublicationDetail, Reaction};
