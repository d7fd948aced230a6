//! Content-based filtering
//!
//! Ranks movies by genre overlap with a reference movie.

use crate::dataset::Dataset;
use crate::types::{MovieId, Recommendation};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Content-based recommendation engine over a shared dataset
#[derive(Debug, Clone)]
pub struct ContentBasedEngine {
    dataset: Arc<Dataset>,
}

impl ContentBasedEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    /// Movies most similar to `target_movie_id`, best first
    ///
    /// An unknown target yields an empty list. The target never appears in its
    /// own results, and equal scores keep catalog order.
    pub fn score_by_content(&self, target_movie_id: MovieId, top_n: usize) -> Vec<Recommendation> {
        let Some(target) = self.dataset.movie(target_movie_id) else {
            debug!(movie_id = target_movie_id, "Unknown target movie, no content recommendations");
            return Vec::new();
        };

        let mut scored: Vec<Recommendation> = self
            .dataset
            .movies()
            .iter()
            .filter(|m| m.id != target_movie_id)
            .map(|m| Recommendation::from_movie(m, jaccard_similarity(&target.genres, &m.genres)))
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_n);

        debug!(
            movie_id = target_movie_id,
            returned = scored.len(),
            "Content recommendations computed"
        );

        scored
    }
}

/// `|A ∩ B| / |A ∪ B|`, or 0 when both sets are empty
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}
