use thiserror::Error;

/// Errors raised by social graph and publication operations.
///
/// Every variant is a recoverable condition reported to the caller.
/// Unresolved mention handles are not errors and never show up here.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Self reference not allowed: {0}")]
    SelfReference(String),

    #[error("Relation already exists: {0}")]
    DuplicateRelation(String),

    #[error("Relation does not exist: {0}")]
    NotFoundRelation(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::SelfReference(_) => "self_reference",
            DomainError::DuplicateRelation(_) => "duplicate_relation",
            DomainError::NotFoundRelation(_) => "not_found_relation",
            DomainError::NotFound { .. } => "not_found",
            DomainError::Internal(_) => "internal",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
