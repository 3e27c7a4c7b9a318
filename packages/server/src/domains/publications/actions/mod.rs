//! Publication domain actions - entry points called by the HTTP routes

pub mod core;
pub mod create_publication;
pub mod republish;

pub use self::core::*;
pub use create_publication::create_publication;
pub use republish::republish;
