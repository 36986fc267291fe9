//! Map fused candidates back to prior decisions.

use std::collections::HashSet;

use inbox_core::candidate::CandidateResult;
use inbox_core::entities::Decision;
use inbox_core::enums::CandidateSource;

use crate::SearchError;
use crate::capability::InboxStore;

/// Upper bound on precedents handed to the decision engine.
pub const MAX_PRECEDENTS: usize = 5;

/// Decision ids referenced by graph candidates, deduplicated, in candidate order.
#[must_use]
pub fn precedent_ids(candidates: &[CandidateResult]) -> Vec<String> {
    let mut seen = HashSet::new();
    candidates
        .iter()
        .filter(|c| c.source == CandidateSource::Graph)
        .filter_map(CandidateResult::decision_id)
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// Load the decisions behind graph candidates, in candidate order.
///
/// Ids that no longer resolve are dropped. At most `limit` decisions are
/// returned; the cap applies after dropping, so a deleted decision does not
/// cost a slot.
///
/// # Errors
///
/// Returns the store error if the bulk lookup fails.
pub async fn resolve_precedents(
    store: &dyn InboxStore,
    candidates: &[CandidateResult],
    limit: usize,
) -> Result<Vec<Decision>, SearchError> {
    let ids = precedent_ids(candidates);
    if ids.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }
    let mut decisions = store.decisions_by_ids(&ids).await?;
    if decisions.len() < ids.len() {
        tracing::debug!(
            requested = ids.len(),
            found = decisions.len(),
            "dropped precedents that no longer exist"
        );
    }
    decisions.truncate(limit);
    Ok(decisions)
}
