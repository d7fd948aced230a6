//! MovieLens-style CSV loading
//!
//! Reads `movies.csv` (`movieId,title,genres`, genres separated by `|`) and
//! `ratings.csv` (`userId,movieId,rating,timestamp`) into a validated
//! [`Dataset`].

use crate::dataset::Dataset;
use crate::types::{Movie, MovieId, Rating, UserId};
use cinerec_core::{CineRecError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// MovieLens marker for a movie without genres
const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
struct MovieRecord {
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    title: String,
    #[serde(default)]
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    #[serde(rename = "userId")]
    user_id: UserId,
    #[serde(rename = "movieId")]
    movie_id: MovieId,
    rating: f64,
    timestamp: i64,
}

/// Load the catalog from a `movies.csv` file
pub fn load_movies(path: impl AsRef<Path>) -> Result<Vec<Movie>> {
    let path = path.as_ref();
    let records: Vec<MovieRecord> = read_records(path)?;

    let movies: Vec<Movie> = records
        .into_iter()
        .map(|record| Movie::new(record.movie_id, record.title, parse_genres(&record.genres)))
        .collect();

    info!(path = %path.display(), movies = movies.len(), "Loaded movies");
    Ok(movies)
}

/// Load the rating log from a `ratings.csv` file
pub fn load_ratings(path: impl AsRef<Path>) -> Result<Vec<Rating>> {
    let path = path.as_ref();
    let records: Vec<RatingRecord> = read_records(path)?;

    let ratings: Vec<Rating> = records
        .into_iter()
        .map(|record| Rating {
            user_id: record.user_id,
            movie_id: record.movie_id,
            value: record.rating,
            timestamp: record.timestamp,
        })
        .collect();

    info!(path = %path.display(), ratings = ratings.len(), "Loaded ratings");
    Ok(ratings)
}

/// Load and validate both files
pub fn load_dataset(movies_path: impl AsRef<Path>, ratings_path: impl AsRef<Path>) -> Result<Dataset> {
    let movies = load_movies(movies_path)?;
    let ratings = load_ratings(ratings_path)?;
    Dataset::new(movies, ratings)
}

fn parse_genres(raw: &str) -> Vec<String> {
    if raw.trim() == NO_GENRES {
        return Vec::new();
    }

    raw.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

fn read_records<T>(path: &Path) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::Reader::from_path(path).map_err(|e| parse_error(path, e))?;

    reader
        .deserialize()
        .map(|row| row.map_err(|e| parse_error(path, e)))
        .collect()
}

fn parse_error(path: &Path, error: csv::Error) -> CineRecError {
    let row = error.position().map(|p| p.line());
    CineRecError::ParseError {
        path: path.display().to_string(),
        row,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn test_load_movies_from_csv() {
        let file = csv_file(&[
            "movieId,title,genres",
            "1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy",
            "\"2\",\"Heat, The (1995)\",Action|Crime|Thriller",
            "3,Unlabelled (2001),(no genres listed)",
        ]);

        let movies = load_movies(file.path()).unwrap();
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].genres.len(), 5);
        assert_eq!(movies[1].title, "Heat, The (1995)");
        assert!(movies[1].genres.contains("Crime"));
        assert!(movies[2].genres.is_empty());
    }

    #[test]
    fn test_load_ratings_from_csv() {
        let file = csv_file(&[
            "userId,movieId,rating,timestamp",
            "1,1,4.0,964982703",
            "1,3,4.5,964981247",
        ]);

        let ratings = load_ratings(file.path()).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 3);
        assert_eq!(ratings[1].value, 4.5);
        assert_eq!(ratings[0].timestamp, 964982703);
    }

    #[test]
    fn test_malformed_row_reports_position() {
        let file = csv_file(&["userId,movieId,rating,timestamp", "1,abc,4.0,1"]);

        match load_ratings(file.path()).unwrap_err() {
            CineRecError::ParseError { row, .. } => assert!(row.is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_dataset_rejects_duplicate_ids() {
        let movies = csv_file(&["movieId,title,genres", "1,A,Drama", "1,B,Comedy"]);
        let ratings = csv_file(&["userId,movieId,rating,timestamp"]);

        assert!(matches!(
            load_dataset(movies.path(), ratings.path()),
            Err(CineRecError::DatasetError { .. })
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(load_movies("/nonexistent/movies.csv").is_err());
    }
}
