// Domain modules
//
// annotation   - mention/tag extraction from publication bodies (pure)
// tag          - tag ledger: resolve-or-create and trending queries
// publishers   - registration and the social graph (follows, reactions)
// publications - creation with annotation, republishing, relation queries

pub mod annotation;
pub mod publications;
pub mod publishers;
pub mod tag;
