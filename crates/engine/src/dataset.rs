//! In-memory movie catalog and rating log
//!
//! The built-in catalog is a 35-title slice of MovieLens. Ratings are generated
//! on startup: 500 rows spread over 50 users, ten rows per user, each pointing
//! at a uniformly drawn movie with a value in `[3.0, 5.0]`.

use crate::math::round_to_tenth;
use crate::types::{Movie, MovieId, Rating, UserId};
use cinerec_core::{CineRecError, Result};
use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Number of generated ratings in the built-in dataset
pub const MOCK_RATING_COUNT: usize = 500;

/// Generated ratings per user; row `i` belongs to user `i / 10 + 1`
const RATINGS_PER_USER: usize = 10;

/// Timestamp of the first generated rating (unix seconds)
const BASE_TIMESTAMP: i64 = 1_260_759_144;
const TIMESTAMP_STEP: i64 = 100;

/// Accepted rating domain
pub const MIN_RATING: f64 = 0.5;
pub const MAX_RATING: f64 = 5.0;

const BUILTIN_MOVIES: &[(MovieId, &str, &[&str])] = &[
    (1, "Toy Story (1995)", &["Adventure", "Animation", "Children", "Comedy", "Fantasy"]),
    (2, "Jumanji (1995)", &["Adventure", "Children", "Fantasy"]),
    (3, "Grumpier Old Men (1995)", &["Comedy", "Romance"]),
    (6, "Heat (1995)", &["Action", "Crime", "Thriller"]),
    (10, "GoldenEye (1995)", &["Action", "Adventure", "Thriller"]),
    (32, "Twelve Monkeys (a.k.a. 12 Monkeys) (1995)", &["Mystery", "Sci-Fi", "Thriller"]),
    (47, "Seven (a.k.a. Se7en) (1995)", &["Mystery", "Thriller"]),
    (50, "Usual Suspects, The (1995)", &["Crime", "Mystery", "Thriller"]),
    (110, "Braveheart (1995)", &["Action", "Drama", "War"]),
    (150, "Apollo 13 (1995)", &["Adventure", "Drama", "IMAX"]),
    (260, "Star Wars: Episode IV - A New Hope (1977)", &["Action", "Adventure", "Sci-Fi"]),
    (296, "Pulp Fiction (1994)", &["Comedy", "Crime", "Drama", "Thriller"]),
    (318, "Shawshank Redemption, The (1994)", &["Crime", "Drama"]),
    (356, "Forrest Gump (1994)", &["Comedy", "Drama", "Romance", "War"]),
    (480, "Jurassic Park (1993)", &["Action", "Adventure", "Sci-Fi", "Thriller"]),
    (527, "Schindler's List (1993)", &["Drama", "War"]),
    (589, "Terminator 2: Judgment Day (1991)", &["Action", "Sci-Fi"]),
    (593, "Silence of the Lambs, The (1991)", &["Crime", "Horror", "Thriller"]),
    (780, "Independence Day (a.k.a. ID4) (1996)", &["Action", "Adventure", "Sci-Fi", "Thriller"]),
    (858, "Godfather, The (1972)", &["Crime", "Drama"]),
    (1196, "Star Wars: Episode V - The Empire Strikes Back (1980)", &["Action", "Adventure", "Sci-Fi"]),
    (1198, "Raiders of the Lost Ark (Indiana Jones and the Raiders of the Lost Ark) (1981)", &["Action", "Adventure"]),
    (1210, "Star Wars: Episode VI - Return of the Jedi (1983)", &["Action", "Adventure", "Sci-Fi"]),
    (1270, "Back to the Future (1985)", &["Adventure", "Comedy", "Sci-Fi"]),
    (2028, "Saving Private Ryan (1998)", &["Action", "Drama", "War"]),
    (2571, "Matrix, The (1999)", &["Action", "Sci-Fi", "Thriller"]),
    (2762, "Sixth Sense, The (1999)", &["Drama", "Horror", "Mystery"]),
    (2858, "American Beauty (1999)", &["Drama", "Romance"]),
    (2959, "Fight Club (1999)", &["Action", "Crime", "Drama", "Thriller"]),
    (4226, "Memento (2000)", &["Mystery", "Thriller"]),
    (4993, "Lord of the Rings: The Fellowship of the Ring, The (2001)", &["Adventure", "Fantasy"]),
    (5952, "Lord of the Rings: The Two Towers, The (2002)", &["Adventure", "Fantasy"]),
    (7153, "Lord of the Rings: The Return of the King, The (2003)", &["Action", "Adventure", "Drama", "Fantasy"]),
    (58559, "Dark Knight, The (2008)", &["Action", "Crime", "Drama", "IMAX"]),
    (79132, "Inception (2010)", &["Action", "Crime", "Drama", "Mystery", "Sci-Fi", "Thriller", "IMAX"]),
];

/// Read-only movie and rating collections
#[derive(Debug, Clone)]
pub struct Dataset {
    movies: Vec<Movie>,
    ratings: Vec<Rating>,
    positions: HashMap<MovieId, usize>,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate movie ids and out-of-domain ratings
    pub fn new(movies: Vec<Movie>, ratings: Vec<Rating>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter().enumerate() {
            if positions.insert(movie.id, position).is_some() {
                return Err(CineRecError::dataset(format!(
                    "duplicate movie id {}",
                    movie.id
                )));
            }
        }

        for rating in &ratings {
            if !rating.value.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating.value) {
                return Err(CineRecError::dataset(format!(
                    "rating {} by user {} for movie {} is outside {}..={}",
                    rating.value, rating.user_id, rating.movie_id, MIN_RATING, MAX_RATING
                )));
            }
        }

        let dangling = ratings
            .iter()
            .filter(|r| !positions.contains_key(&r.movie_id))
            .count();
        if dangling > 0 {
            warn!(dangling, "Ratings reference movies missing from the catalog");
        }

        debug!(
            movies = movies.len(),
            ratings = ratings.len(),
            "Dataset constructed"
        );

        Ok(Self {
            movies,
            ratings,
            positions,
        })
    }

    /// Built-in catalog with [`MOCK_RATING_COUNT`] freshly generated ratings
    pub fn builtin<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::builtin_with_ratings(MOCK_RATING_COUNT, rng)
    }

    pub fn builtin_with_ratings<R: Rng + ?Sized>(rating_count: usize, rng: &mut R) -> Self {
        let movies = builtin_movies();
        let ratings = generate_mock_ratings(&movies, rating_count, rng);
        let positions = movies
            .iter()
            .enumerate()
            .map(|(position, movie)| (movie.id, position))
            .collect();

        Self {
            movies,
            ratings,
            positions,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.positions.get(&id).map(|&position| &self.movies[position])
    }

    pub fn contains_movie(&self, id: MovieId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Movies the user has rated at least once
    pub fn watched_by(&self, user_id: UserId) -> HashSet<MovieId> {
        self.ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.movie_id)
            .collect()
    }

    /// Distinct user ids, ascending
    pub fn user_ids(&self) -> BTreeSet<UserId> {
        self.ratings.iter().map(|r| r.user_id).collect()
    }
}

/// The built-in MovieLens catalog, in display order
pub fn builtin_movies() -> Vec<Movie> {
    BUILTIN_MOVIES
        .iter()
        .map(|(id, title, genres)| Movie::new(*id, *title, genres.iter().copied()))
        .collect()
}

/// Generate `count` mock ratings against `movies`
///
/// Returns an empty log when `movies` is empty.
pub fn generate_mock_ratings<R: Rng + ?Sized>(
    movies: &[Movie],
    count: usize,
    rng: &mut R,
) -> Vec<Rating> {
    if movies.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|i| {
            let movie = &movies[rng.gen_range(0..movies.len())];
            Rating {
                user_id: (i / RATINGS_PER_USER) as UserId + 1,
                movie_id: movie.id,
                value: round_to_tenth(3.0 + rng.gen_range(0.0..2.0)),
                timestamp: BASE_TIMESTAMP + i as i64 * TIMESTAMP_STEP,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rating(user_id: UserId, movie_id: MovieId, value: f64) -> Rating {
        Rating {
            user_id,
            movie_id,
            value,
            timestamp: 0,
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let movies = builtin_movies();
        assert_eq!(movies.len(), 35);
        assert_eq!(movies[0].title, "Toy Story (1995)");
        assert_eq!(movies.last().unwrap().id, 79132);
        assert!(movies.iter().all(|m| !m.genres.is_empty()));
    }

    #[test]
    fn test_builtin_dataset_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let dataset = Dataset::builtin(&mut rng);

        assert_eq!(dataset.ratings().len(), MOCK_RATING_COUNT);
        assert_eq!(dataset.user_ids().len(), 50);
        assert_eq!(dataset.user_ids().first(), Some(&1));
        assert_eq!(dataset.user_ids().last(), Some(&50));

        for (i, r) in dataset.ratings().iter().enumerate() {
            assert!((3.0..=5.0).contains(&r.value), "value {}", r.value);
            assert!(dataset.contains_movie(r.movie_id));
            assert_eq!(r.timestamp, BASE_TIMESTAMP + i as i64 * 100);
            assert_eq!(r.user_id as usize, i / 10 + 1);
        }
    }

    #[test]
    fn test_duplicate_movie_id_rejected() {
        let movies = vec![
            Movie::new(1, "A", ["Drama"]),
            Movie::new(1, "B", ["Comedy"]),
        ];
        let err = Dataset::new(movies, Vec::new()).unwrap_err();
        assert!(matches!(err, CineRecError::DatasetError { .. }));
    }

    #[test]
    fn test_out_of_domain_rating_rejected() {
        let movies = vec![Movie::new(1, "A", ["Drama"])];
        assert!(Dataset::new(movies.clone(), vec![rating(1, 1, 5.5)]).is_err());
        assert!(Dataset::new(movies.clone(), vec![rating(1, 1, 0.0)]).is_err());
        assert!(Dataset::new(movies, vec![rating(1, 1, 0.5)]).is_ok());
    }

    #[test]
    fn test_watched_by_counts_duplicates_once() {
        let movies = vec![
            Movie::new(1, "A", ["Drama"]),
            Movie::new(2, "B", ["Comedy"]),
        ];
        let ratings = vec![rating(9, 1, 4.0), rating(9, 1, 3.0), rating(3, 2, 4.5)];
        let dataset = Dataset::new(movies, ratings).unwrap();

        let watched = dataset.watched_by(9);
        assert_eq!(watched.len(), 1);
        assert!(watched.contains(&1));
        assert!(dataset.watched_by(404).is_empty());
    }

    #[test]
    fn test_generate_without_movies() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_mock_ratings(&[], 10, &mut rng).is_empty());
    }
}
