//! CineRec recommendation engine
//!
//! Backs the movie-recommendation case-study notebook: an in-memory MovieLens
//! slice, a content-based scorer (genre Jaccard), a collaborative scorer with a
//! pluggable affinity estimator, canned evaluation metrics, chart analytics,
//! generative commentary and the HTTP surface serving all of it.

pub mod analytics;
pub mod collaborative;
pub mod config;
pub mod content_based;
pub mod dataset;
pub mod evaluation;
pub mod insight;
pub mod loader;
pub mod math;
pub mod notebook;
pub mod server;
pub mod types;

// Re-export key types
pub use analytics::{genre_popularity, rating_distribution};
pub use collaborative::{AffinityEstimator, CollaborativeFilteringEngine, RandomAffinity};
pub use self::config::EngineConfig;
pub use content_based::{jaccard_similarity, ContentBasedEngine};
pub use dataset::Dataset;
pub use evaluation::evaluate;
pub use insight::{
    get_insight, GeminiInsightClient, InsightPanels, InsightProvider, InsightStatus,
    OFFLINE_FALLBACK,
};
pub use notebook::{render, NotebookRequest, NotebookView, Section};
pub use types::*;

use crate::config::ScoringConfig;
use std::sync::Arc;

/// Scorers bound to one dataset
#[derive(Clone)]
pub struct RecommenderEngine {
    dataset: Arc<Dataset>,
    content: ContentBasedEngine,
    collaborative: CollaborativeFilteringEngine,
    scoring: ScoringConfig,
}

impl RecommenderEngine {
    /// Engine using the random affinity estimator
    pub fn new(dataset: Arc<Dataset>, scoring: ScoringConfig) -> Self {
        let estimator = match scoring.affinity_seed {
            Some(seed) => RandomAffinity::with_seed(seed),
            None => RandomAffinity::new(),
        };
        Self::with_estimator(dataset, scoring, Arc::new(estimator))
    }

    pub fn with_estimator(
        dataset: Arc<Dataset>,
        scoring: ScoringConfig,
        estimator: Arc<dyn AffinityEstimator>,
    ) -> Self {
        Self {
            content: ContentBasedEngine::new(Arc::clone(&dataset)),
            collaborative: CollaborativeFilteringEngine::with_estimator(
                Arc::clone(&dataset),
                estimator,
            ),
            dataset,
            scoring,
        }
    }

    pub fn with_default_config(dataset: Arc<Dataset>) -> Self {
        Self::new(dataset, ScoringConfig::default())
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Requested list length, defaulted and capped by the scoring config
    pub fn clamp_top_n(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.scoring.default_top_n)
            .min(self.scoring.max_top_n)
    }

    pub fn score_by_content(&self, movie_id: MovieId, top_n: usize) -> Vec<Recommendation> {
        self.content.score_by_content(movie_id, top_n)
    }

    pub fn score_by_collaborative(&self, user_id: UserId, top_n: usize) -> Vec<Recommendation> {
        self.collaborative.score_by_collaborative(user_id, top_n)
    }

    pub fn evaluate(&self) -> EvaluationMetrics {
        evaluate()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn engine() -> RecommenderEngine {
        let mut rng = StdRng::seed_from_u64(2024);
        RecommenderEngine::with_default_config(Arc::new(Dataset::builtin(&mut rng)))
    }

    #[test]
    fn test_clamp_top_n() {
        let engine = engine();
        assert_eq!(engine.clamp_top_n(None), 5);
        assert_eq!(engine.clamp_top_n(Some(12)), 12);
        assert_eq!(engine.clamp_top_n(Some(500)), 50);
        assert_eq!(engine.clamp_top_n(Some(0)), 0);
    }

    #[test]
    fn test_engine_delegates_to_scorers() {
        let engine = engine();
        assert_eq!(engine.score_by_content(1, 5).len(), 5);
        assert!(engine.score_by_collaborative(1, 5).len() <= 5);
        assert_eq!(engine.evaluate().improvement_percent, "17.2%");
    }
}
