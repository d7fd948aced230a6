//! Collaborative filtering
//!
//! Ranks the movies a user has not rated yet by an estimated affinity. The
//! estimator is pluggable; the default one models "global average plus a
//! random latent affinity" and stands in for a trained factorization model.
//! With that estimator, repeated calls for the same user return different
//! scores and orderings, while the candidate set stays the same.

use crate::dataset::{Dataset, MAX_RATING, MIN_RATING};
use crate::math::round_to_tenth;
use crate::types::{MovieId, Recommendation, UserId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Global average rating the random estimator starts from
pub const GLOBAL_AVERAGE: f64 = 3.5;

/// Width of the random affinity term, drawn from `[0, AFFINITY_SPREAD)`
pub const AFFINITY_SPREAD: f64 = 1.5;

/// Predicts how much a user would like a movie, on the rating scale
pub trait AffinityEstimator: Send + Sync {
    fn estimate_affinity(&self, user_id: UserId, movie_id: MovieId) -> f64;
}

/// `GLOBAL_AVERAGE + U[0, AFFINITY_SPREAD)`, ignoring both ids
#[derive(Debug)]
pub struct RandomAffinity {
    rng: Mutex<StdRng>,
}

impl RandomAffinity {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomAffinity {
    fn default() -> Self {
        Self::new()
    }
}

impl AffinityEstimator for RandomAffinity {
    fn estimate_affinity(&self, _user_id: UserId, _movie_id: MovieId) -> f64 {
        let bonus = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0.0..AFFINITY_SPREAD),
            // A poisoned lock only means another scorer panicked mid-draw
            Err(poisoned) => poisoned.into_inner().gen_range(0.0..AFFINITY_SPREAD),
        };
        GLOBAL_AVERAGE + bonus
    }
}

/// Collaborative recommendation engine
#[derive(Clone)]
pub struct CollaborativeFilteringEngine {
    dataset: Arc<Dataset>,
    estimator: Arc<dyn AffinityEstimator>,
}

impl CollaborativeFilteringEngine {
    /// Engine using the random placeholder estimator
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_estimator(dataset, Arc::new(RandomAffinity::new()))
    }

    pub fn with_estimator(dataset: Arc<Dataset>, estimator: Arc<dyn AffinityEstimator>) -> Self {
        Self { dataset, estimator }
    }

    /// Unrated movies for `user_id`, best estimated affinity first
    ///
    /// A user without ratings (or unknown to the dataset) is treated as having
    /// watched nothing.
    pub fn score_by_collaborative(&self, user_id: UserId, top_n: usize) -> Vec<Recommendation> {
        let watched = self.dataset.watched_by(user_id);

        let mut scored: Vec<Recommendation> = self
            .dataset
            .movies()
            .iter()
            .filter(|m| !watched.contains(&m.id))
            .filter_map(|m| {
                let raw = self.estimator.estimate_affinity(user_id, m.id);
                if !raw.is_finite() {
                    warn!(user_id, movie_id = m.id, "Estimator returned a non-finite affinity");
                    return None;
                }
                Some(Recommendation::from_movie(m, display_score(raw)))
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_n);

        debug!(
            user_id,
            watched = watched.len(),
            returned = scored.len(),
            "Collaborative recommendations computed"
        );

        scored
    }
}

/// Clamp into the rating domain and round to one decimal
///
/// Rounding never lifts a value that stayed below the maximum up to it, so an
/// estimate in `[3.5, 5.0)` is displayed in `[3.5, 5.0)`.
fn display_score(raw: f64) -> f64 {
    let clamped = raw.clamp(MIN_RATING, MAX_RATING);
    let rounded = round_to_tenth(clamped);
    if rounded >= MAX_RATING && clamped < MAX_RATING {
        round_to_tenth(MAX_RATING - 0.1)
    } else {
        rounded
    }
}
