//! Publisher domain actions
//!
//! Entry points called by the HTTP routes. Actions take typed ids and
//! `&ServerDeps`, enforce the relation invariants, and report failures as
//! `DomainError`.

pub mod registration;
pub mod social;

pub use registration::*;
pub use social::*;
