use serde::{Deserialize, Serialize};

/// Ways a publisher can mark a publication. Each kind is its own edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Favorite,
    Like,
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reaction::Favorite => write!(f, "favorite"),
            Reaction::Like => write!(f, "like"),
        }
    }
}
