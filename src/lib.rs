// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod feedback;
pub mod knowledge;
pub mod normalize;
pub mod ranking;
pub mod tfidf;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::engine::{RecommendEngine, UserProfile};
pub use crate::ranking::Recommendation;
