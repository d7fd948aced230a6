//! Exploratory statistics for the notebook charts

use crate::math::round_half_up;
use crate::types::{ChartDataPoint, Movie, Rating};
use std::collections::{BTreeMap, HashMap};

/// Genres shown in the popularity chart
pub const DEFAULT_GENRE_LIMIT: usize = 8;

/// Histogram of ratings bucketed to whole stars, ascending by star
pub fn rating_distribution(ratings: &[Rating]) -> Vec<ChartDataPoint> {
    let mut counts: BTreeMap<i64, u64> = BTreeMap::new();
    for rating in ratings {
        *counts.entry(round_half_up(rating.value)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(stars, count)| ChartDataPoint::new(format!("{} Stars", stars), count))
        .collect()
}

/// Movie count per genre, most common first
///
/// Genres with equal counts keep the order in which they were first seen in
/// the catalog.
pub fn genre_popularity(movies: &[Movie], limit: usize) -> Vec<ChartDataPoint> {
    let mut order: Vec<ChartDataPoint> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for genre in movies.iter().flat_map(|m| m.genres.iter()) {
        match index.get(genre.as_str()) {
            Some(&position) => order[position].value += 1,
            None => {
                index.insert(genre.as_str(), order.len());
                order.push(ChartDataPoint::new(genre.clone(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.value.cmp(&a.value));
    order.truncate(limit);
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rating(value: f64) -> Rating {
        Rating {
            user_id: 1,
            movie_id: 1,
            value,
            timestamp: 0,
        }
    }

    #[test]
    fn test_rating_distribution_buckets() {
        let ratings: Vec<_> = [3.0, 3.4, 3.5, 4.4, 4.5, 5.0]
            .into_iter()
            .map(rating)
            .collect();

        let dist = rating_distribution(&ratings);
        assert_eq!(
            dist,
            vec![
                ChartDataPoint::new("3 Stars", 2),
                ChartDataPoint::new("4 Stars", 2),
                ChartDataPoint::new("5 Stars", 2),
            ]
        );
    }

    #[test]
    fn test_rating_distribution_sums_to_total() {
        let mut rng = StdRng::seed_from_u64(42);
        let dataset = Dataset::builtin(&mut rng);

        let total: u64 = rating_distribution(dataset.ratings())
            .iter()
            .map(|p| p.value)
            .sum();
        assert_eq!(total as usize, dataset.ratings().len());
    }

    #[test]
    fn test_genre_popularity_sorted_and_limited() {
        let movies = vec![
            Movie::new(1, "A", ["Drama", "War"]),
            Movie::new(2, "B", ["Comedy", "Drama"]),
            Movie::new(3, "C", ["Comedy", "Drama", "Romance"]),
        ];

        let popularity = genre_popularity(&movies, 2);
        assert_eq!(
            popularity,
            vec![
                ChartDataPoint::new("Drama", 3),
                ChartDataPoint::new("Comedy", 2),
            ]
        );
    }

    #[test]
    fn test_genre_popularity_builtin_catalog() {
        let movies = crate::dataset::builtin_movies();
        let popularity = genre_popularity(&movies, DEFAULT_GENRE_LIMIT);

        assert_eq!(popularity.len(), DEFAULT_GENRE_LIMIT);
        assert!(popularity.windows(2).all(|w| w[0].value >= w[1].value));
    }
}
