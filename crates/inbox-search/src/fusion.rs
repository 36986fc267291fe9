//! Deduplication and the three ranking strategies.
//!
//! Every function here is pure; the retriever feeds them whatever the
//! sources produced and whatever the reranker scored.

use std::collections::{HashMap, HashSet};

use inbox_core::candidate::CandidateResult;

/// Keep the first occurrence of each id. Callers concatenate sources in
/// priority order (vector, keyword, graph), so the retained copy comes from
/// the highest-priority source that produced it.
#[must_use]
pub fn dedup_first_seen(candidates: Vec<CandidateResult>) -> Vec<CandidateResult> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

/// Reciprocal Rank Fusion: `score(id) = Σ 1 / (k + rank + 1)` over every
/// ranking that contains `id`, with `rank` zero-based.
///
/// Returns ids with their fused score, best first. Equal scores keep the
/// order in which ids were first encountered.
#[must_use]
pub fn reciprocal_rank_fusion(rankings: &[Vec<String>], k: u32) -> Vec<(String, f64)> {
    let mut order: Vec<String> = Vec::new();
    let mut scores: HashMap<String, f64> = HashMap::new();
    for ranking in rankings {
        for (rank, id) in ranking.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let contribution = 1.0 / (f64::from(k) + rank as f64 + 1.0);
            match scores.get_mut(id) {
                Some(score) => *score += contribution,
                None => {
                    scores.insert(id.clone(), contribution);
                    order.push(id.clone());
                }
            }
        }
    }

    let mut fused: Vec<(String, f64)> = order
        .into_iter()
        .map(|id| {
            let score = scores.get(&id).copied().unwrap_or(0.0);
            (id, score)
        })
        .collect();
    // Stable sort: ties stay in first-seen order.
    fused.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    fused
}

/// Sort by native score, best first, and keep `top_k`.
#[must_use]
pub fn rank_native(mut candidates: Vec<CandidateResult>, top_k: usize) -> Vec<CandidateResult> {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(top_k);
    candidates
}

/// Attach reranker scores (same order as `candidates`), sort by them, keep `top_k`.
///
/// Returns `None` when the score count does not match.
#[must_use]
pub fn rank_by_scores(
    mut candidates: Vec<CandidateResult>,
    scores: &[f64],
    top_k: usize,
) -> Option<Vec<CandidateResult>> {
    if scores.len() != candidates.len() {
        return None;
    }
    for (candidate, score) in candidates.iter_mut().zip(scores) {
        candidate.rerank_score = Some(*score);
    }
    candidates.sort_by(|a, b| {
        b.rerank_score
            .partial_cmp(&a.rerank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(top_k);
    Some(candidates)
}

/// Fuse per-source rankings with RRF and return the deduplicated candidates
/// in fused order, each carrying its `fused_score`.
#[must_use]
pub fn rank_rrf(
    per_source: &[Vec<CandidateResult>],
    deduped: Vec<CandidateResult>,
    k: u32,
    top_k: usize,
) -> Vec<CandidateResult> {
    let rankings: Vec<Vec<String>> = per_source
        .iter()
        .map(|list| {
            let mut ranked: Vec<&CandidateResult> = list.iter().collect();
            ranked.sort_by(|a, b| {
                b.score
                    .partial_cmp(&a.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            ranked.into_iter().map(|c| c.id.clone()).collect()
        })
        .collect();

    let mut by_id: HashMap<String, CandidateResult> =
        deduped.into_iter().map(|c| (c.id.clone(), c)).collect();
    reciprocal_rank_fusion(&rankings, k)
        .into_iter()
        .filter_map(|(id, score)| {
            by_id.remove(&id).map(|mut c| {
                c.fused_score = Some(score);
                c
            })
        })
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use inbox_core::enums::CandidateSource;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn cand(id: &str, score: f64, source: CandidateSource) -> CandidateResult {
        CandidateResult::new(id, format!("text {id}"), score, source)
    }

    fn ids(list: &[CandidateResult]) -> Vec<&str> {
        list.iter().map(|c| c.id.as_str()).collect()
    }

    fn ranking(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn dedup_keeps_highest_priority_copy() {
        let merged = dedup_first_seen(vec![
            cand("a", 0.2, CandidateSource::Vector),
            cand("b", 0.9, CandidateSource::Vector),
            cand("a", 5.0, CandidateSource::Keyword),
            cand("c", 0.1, CandidateSource::Keyword),
            cand("b", 0.8, CandidateSource::Graph),
        ]);
        assert_eq!(ids(&merged), vec!["a", "b", "c"]);
        assert_eq!(merged[0].source, CandidateSource::Vector);
        assert!((merged[0].score - 0.2).abs() < f64::EPSILON);
        assert_eq!(merged[1].source, CandidateSource::Vector);
    }

    #[test]
    fn rrf_formula() {
        let fused = reciprocal_rank_fusion(&[ranking(&["a", "b"]), ranking(&["b", "c"])], 60);
        let expected_b = 1.0 / 62.0 + 1.0 / 61.0;
        assert_eq!(fused[0].0, "b");
        assert!((fused[0].1 - expected_b).abs() < 1e-12);
        assert_eq!(fused[1].0, "a");
        assert!((fused[1].1 - 1.0 / 61.0).abs() < 1e-12);
        assert_eq!(fused[2].0, "c");
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    fn rrf_self_fusion_preserves_order(#[case] copies: usize) {
        let base = ranking(&["x", "y", "z", "w"]);
        let once: Vec<String> = reciprocal_rank_fusion(&[base.clone()], 60)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        let many: Vec<String> = reciprocal_rank_fusion(&vec![base.clone(); copies], 60)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(once, base);
        assert_eq!(many, once);
    }

    #[test]
    fn rrf_ties_keep_first_seen_order() {
        let fused = reciprocal_rank_fusion(&[ranking(&["a"]), ranking(&["b"])], 60);
        assert_eq!(fused[0].0, "a");
        assert_eq!(fused[1].0, "b");
        assert!(reciprocal_rank_fusion(&[], 60).is_empty());
    }

    #[test]
    fn native_sort_truncates() {
        let ranked = rank_native(
            vec![
                cand("a", 0.1, CandidateSource::Vector),
                cand("b", 0.8, CandidateSource::Graph),
                cand("c", 0.5, CandidateSource::Keyword),
            ],
            2,
        );
        assert_eq!(ids(&ranked), vec!["b", "c"]);
    }

    #[test]
    fn rerank_scores_reorder_and_mismatch_is_rejected() {
        let list = vec![
            cand("a", 0.9, CandidateSource::Vector),
            cand("b", 0.1, CandidateSource::Keyword),
        ];
        let ranked = rank_by_scores(list.clone(), &[-2.0, 3.5], 5).unwrap();
        assert_eq!(ids(&ranked), vec!["b", "a"]);
        assert_eq!(ranked[0].rerank_score, Some(3.5));
        assert!(rank_by_scores(list, &[1.0], 5).is_none());
    }

    #[test]
    fn rrf_mode_uses_per_source_ranks() {
        let vector = vec![cand("a", 0.9, CandidateSource::Vector), cand("b", 0.5, CandidateSource::Vector)];
        let keyword = vec![cand("b", 3.0, CandidateSource::Keyword), cand("c", 1.0, CandidateSource::Keyword)];
        let per_source = vec![vector.clone(), keyword.clone()];
        let deduped = dedup_first_seen(vector.into_iter().chain(keyword).collect());

        let ranked = rank_rrf(&per_source, deduped, 60, 2);
        assert_eq!(ids(&ranked), vec!["b", "a"]);
        assert_eq!(ranked[0].source, CandidateSource::Vector);
        assert!(ranked[0].fused_score.is_some());
    }
}
