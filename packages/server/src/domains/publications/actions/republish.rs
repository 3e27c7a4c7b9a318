use tracing::info;

use crate::common::{DomainError, DomainResult, PublicationId};
use crate::domains::publications::models::Publication;
use crate::kernel::ServerDeps;

use super::core::find_publication;

/// Mark `target_id` as a republication of `source_id`.
///
/// Only the direct one-hop pointer is stored and an earlier source is
/// replaced. Chains and mutual republishing (a from b, b from a) are
/// allowed; only a publication republishing itself is rejected.
pub async fn republish(
    source_id: PublicationId,
    target_id: PublicationId,
    deps: &ServerDeps,
) -> DomainResult<Publication> {
    if source_id == target_id {
        return Err(DomainError::SelfReference(format!(
            "publication {} cannot republish itself",
            source_id
        )));
    }
    find_publication(source_id, deps).await?;
    let mut target = find_publication(target_id, deps).await?;

    if !deps.store.set_republished_from(target_id, source_id).await? {
        return Err(DomainError::not_found("publication", target_id));
    }
    target.republished_from = Some(source_id);

    info!(source_id = %source_id, target_id = %target_id, "Publication republished");
    Ok(target)
}
