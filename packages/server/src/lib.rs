// Microblog - API Core
//
// Publishers post publications that mention other publishers, carry tags,
// get favorited and liked, and can be republished. Publishers follow each
// other. The domain actions own the relation invariants; storage sits
// behind the kernel traits (in-memory or Postgres) and HTTP is a thin axum
// layer over the actions.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
