//! User feedback: remote history fetch, per-request merging, and the step
//! multiplier applied at scoring time.
//!
//! The remote store is a collaborator behind a trait so the HTTP client can
//! be swapped for a stub in tests. Fetch failures degrade to an empty
//! history — personalization is best-effort, never a request error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::knowledge::FeedbackSection;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub nutrient_name: String,
    pub score_adjustment: f64,
}

/// Lowercase nutrient name → summed adjustment. Built fresh per request.
pub type AccumulatedFeedback = HashMap<String, f64>;

#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn fetch(&self, user_id: &str) -> anyhow::Result<Vec<FeedbackRecord>>;
}

/// Production store: `GET {base}/api/feedback/{userId}` with a bounded
/// timeout; any non-success status is an error.
pub struct HttpFeedbackStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFeedbackStore {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl FeedbackStore for HttpFeedbackStore {
    async fn fetch(&self, user_id: &str) -> anyhow::Result<Vec<FeedbackRecord>> {
        let url = format!("{}/api/feedback/{}", self.base_url, user_id);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("feedback store returned status {}", response.status());
        }
        Ok(response.json().await?)
    }
}

/// Store with no history. Used in tests and when no backend is configured.
pub struct NoopFeedbackStore;

#[async_trait]
impl FeedbackStore for NoopFeedbackStore {
    async fn fetch(&self, _user_id: &str) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(Vec::new())
    }
}

/// Merge persisted history with in-request feedback, summing adjustments per
/// lowercase nutrient name. An empty user id skips the fetch entirely.
pub async fn accumulate(
    store: &dyn FeedbackStore,
    user_id: &str,
    request_feedbacks: &[FeedbackRecord],
) -> AccumulatedFeedback {
    let mut acc = AccumulatedFeedback::new();

    if !user_id.is_empty() {
        match store.fetch(user_id).await {
            Ok(records) => {
                debug!(count = records.len(), "fetched persisted feedback");
                for fb in records {
                    *acc.entry(fb.nutrient_name.to_lowercase()).or_insert(0.0) +=
                        fb.score_adjustment;
                }
            }
            Err(err) => {
                warn!(error = %err, "feedback fetch failed; proceeding without history");
            }
        }
    }

    for fb in request_feedbacks {
        *acc.entry(fb.nutrient_name.to_lowercase()).or_insert(0.0) += fb.score_adjustment;
    }

    acc
}

/// Step multiplier: negative sum penalizes, positive boosts, absence is
/// neutral. Magnitude is ignored so feedback effects stay coarse and stable.
pub fn multiplier(acc: &AccumulatedFeedback, nutrient_name: &str, cfg: &FeedbackSection) -> f64 {
    match acc.get(&nutrient_name.to_lowercase()).copied().unwrap_or(0.0) {
        sum if sum < 0.0 => cfg.negative_penalty,
        sum if sum > 0.0 => cfg.positive_boost,
        _ => 1.0,
    }
}
