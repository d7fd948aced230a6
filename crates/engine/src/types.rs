//! Core domain types for the recommendation notebook

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type MovieId = u32;
pub type UserId = u32;

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub genres: BTreeSet<String>,
}

impl Movie {
    pub fn new<I, S>(id: MovieId, title: impl Into<String>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            title: title.into(),
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }
}

/// A single user rating
///
/// The same (user, movie) pair may appear more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub value: f64,
    /// Unix seconds
    pub timestamp: i64,
}

/// A ranked movie produced by one scoring call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: BTreeSet<String>,
    pub score: f64,
}

impl Recommendation {
    pub fn from_movie(movie: &Movie, score: f64) -> Self {
        Self {
            movie_id: movie.id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            score,
        }
    }
}

/// Offline accuracy figures shown on the evaluation cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// RMSE of the factorization model
    pub model_error: f64,
    /// RMSE of the global-mean baseline
    pub baseline_error: f64,
    pub improvement_percent: String,
}

/// Named value for a bar/pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub name: String,
    pub value: u64,
}

impl ChartDataPoint {
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}
