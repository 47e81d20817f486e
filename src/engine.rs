//! Recommendation engine: the immutable catalog plus both fitted vector
//! spaces, with pure per-request scoring. No I/O — suitable for unit tests
//! and offline evaluation.
//!
//! Built once at startup and shared behind `Arc`; requests never mutate it.

use serde::Deserialize;

use crate::catalog::Catalog;
use crate::feedback::AccumulatedFeedback;
use crate::knowledge::Knowledge;
use crate::normalize;
use crate::ranking::{self, Recommendation};
use crate::tfidf::TfidfSpace;

/// Caller profile attached to every prediction request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub gender: String,
    pub diet_preference: String,
    pub lifestyle: String,
    pub allergies: Vec<String>,
}

pub struct RecommendEngine {
    catalog: Catalog,
    semantic: TfidfSpace,
    intent: TfidfSpace,
    knowledge: Knowledge,
}

impl RecommendEngine {
    /// Fit both vector spaces over the catalog. The engine is read-only
    /// afterwards and safe to share across concurrent requests.
    pub fn new(catalog: Catalog, knowledge: Knowledge) -> Self {
        let semantic = TfidfSpace::fit(&catalog.semantic_texts());
        let intent = TfidfSpace::fit(&catalog.intent_texts());
        Self {
            catalog,
            semantic,
            intent,
            knowledge,
        }
    }

    /// Score the whole catalog for one request and return the top matches.
    pub fn recommend(
        &self,
        text: &str,
        profile: &UserProfile,
        feedback_map: &AccumulatedFeedback,
    ) -> Vec<Recommendation> {
        let query = normalize::prepare_query(text);
        let semantic = self.semantic.similarities(&query);
        let intent = self.intent.similarities(&query);

        let diet = profile.diet_preference.to_lowercase();
        let allergies: Vec<String> = profile
            .allergies
            .iter()
            .map(|a| a.to_lowercase())
            .collect();

        ranking::rank(
            self.catalog.entries(),
            &semantic,
            &intent,
            &diet,
            &allergies,
            feedback_map,
            &self.knowledge,
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
