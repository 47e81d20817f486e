//! Ranking combiner: blend similarity, rules, and feedback into the final
//! confidence ordering.
//!
//! Pure logic over explicit inputs — no I/O, no captured mutable state.
//! Every request builds its own score vector; the catalog slice is only read.

use serde::Serialize;
use std::cmp::Ordering;

use crate::catalog::CatalogEntry;
use crate::feedback::{self, AccumulatedFeedback};
use crate::knowledge::Knowledge;

/// One ranked result as reported to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub food_sources: String,
    pub confidence: f64,
    pub citation: String,
}

/// Score every row, normalize, clip, and keep the top-k.
///
/// `diet` and `allergies` must already be lowercased. Similarity slices are
/// parallel to `entries`.
pub fn rank(
    entries: &[CatalogEntry],
    semantic: &[f64],
    intent: &[f64],
    diet: &str,
    allergies: &[String],
    feedback_map: &AccumulatedFeedback,
    knowledge: &Knowledge,
) -> Vec<Recommendation> {
    debug_assert_eq!(entries.len(), semantic.len());
    debug_assert_eq!(entries.len(), intent.len());

    let weights = &knowledge.weights;
    let mut scored: Vec<(usize, f64)> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rules = knowledge.rule_multiplier(&entry.food_sources, diet, allergies);
            let base = weights.semantic * semantic[i]
                + weights.intent * intent[i]
                + weights.rules * rules;
            let final_score =
                base * feedback::multiplier(feedback_map, &entry.name, &knowledge.feedback);
            (i, final_score)
        })
        .collect();

    // Normalize against the best row; skipped when nothing scored above zero.
    let max = scored.iter().map(|&(_, s)| s).fold(0.0_f64, f64::max);
    if max > 0.0 {
        for (_, score) in scored.iter_mut() {
            *score = (*score / max) * 100.0;
        }
    }
    // Ceiling reserves headroom so no result claims near-certain confidence.
    let ceiling = knowledge.scoring.confidence_ceiling;
    for (_, score) in scored.iter_mut() {
        *score = score.min(ceiling);
    }

    // Stable descending sort keeps catalog order among ties.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(knowledge.scoring.top_k);

    scored
        .into_iter()
        .map(|(i, score)| {
            let entry = &entries[i];
            Recommendation {
                name: entry.name.clone(),
                kind: entry.kind.clone(),
                description: entry.description.clone(),
                food_sources: entry.food_sources.clone(),
                confidence: (score * 100.0).round() / 100.0,
                citation: entry.citation.clone(),
            }
        })
        .collect()
}
