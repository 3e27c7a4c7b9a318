// HTTP routes
pub mod health;
pub mod publications;
pub mod publishers;
pub mod tags;

pub use health::*;
