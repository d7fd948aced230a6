//! Notebook article view model
//!
//! The article is rendered from an explicit [`NotebookRequest`] (the selected
//! movie and user) into a [`NotebookView`]; there is no ambient UI state.

use crate::analytics::{genre_popularity, rating_distribution, DEFAULT_GENRE_LIMIT};
use crate::evaluation::evaluate;
use crate::insight::InsightPanels;
use crate::types::{ChartDataPoint, EvaluationMetrics, Movie, MovieId, Recommendation, UserId};
use crate::RecommenderEngine;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_USER: UserId = 1;

/// Article sections, in reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Intro,
    DataLoading,
    #[serde(rename = "EDA")]
    Eda,
    Preprocessing,
    ContentBased,
    Collaborative,
    Evaluation,
    Comparison,
    BusinessInsights,
    Conclusion,
}

impl Section {
    pub const ALL: [Section; 10] = [
        Section::Intro,
        Section::DataLoading,
        Section::Eda,
        Section::Preprocessing,
        Section::ContentBased,
        Section::Collaborative,
        Section::Evaluation,
        Section::Comparison,
        Section::BusinessInsights,
        Section::Conclusion,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Section::Intro => "Intro",
            Section::DataLoading => "DataLoading",
            Section::Eda => "EDA",
            Section::Preprocessing => "Preprocessing",
            Section::ContentBased => "ContentBased",
            Section::Collaborative => "Collaborative",
            Section::Evaluation => "Evaluation",
            Section::Comparison => "Comparison",
            Section::BusinessInsights => "BusinessInsights",
            Section::Conclusion => "Conclusion",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Intro => "1. Introduction",
            Section::DataLoading => "2. Data Import",
            Section::Eda => "3. EDA & Visualization",
            Section::Preprocessing => "4. Data Preprocessing",
            Section::ContentBased => "5. Content-Based System",
            Section::Collaborative => "6. Collaborative Filtering",
            Section::Evaluation => "7. Model Evaluation",
            Section::Comparison => "8. Approach Comparison",
            Section::BusinessInsights => "9. Business Strategy",
            Section::Conclusion => "10. Summary & Next Steps",
        }
    }

    /// Zero-based reading position
    pub fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// Topic the section asks commentary about, if it has an insight panel
    pub fn insight_topic(self) -> Option<&'static str> {
        match self {
            Section::Intro => {
                Some("the business importance of recommendation systems for streaming platforms")
            }
            Section::BusinessInsights => Some(
                "how to pitch these recommendation systems to a Product Manager to secure budget for productionization",
            ),
            _ => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown section '{}'", s))
    }
}

/// User selections driving one render
///
/// Blank query values (`?movie_id=`) count as unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookRequest {
    /// Defaults to the first catalog movie
    #[serde(default, deserialize_with = "blank_as_none")]
    pub movie_id: Option<MovieId>,
    /// Defaults to [`DEFAULT_USER`]
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<UserId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top_n: Option<usize>,
}

/// Deserialize an optional query value, treating an empty string as absent
pub(crate) fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionInfo {
    pub id: &'static str,
    pub label: &'static str,
    pub has_insight: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub movies: usize,
    pub ratings: usize,
    pub users: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightEntry {
    pub section: Section,
    pub text: String,
}

/// Everything the front-end needs to draw the article
#[derive(Debug, Clone, Serialize)]
pub struct NotebookView {
    pub sections: Vec<SectionInfo>,
    pub summary: DatasetSummary,
    pub rating_distribution: Vec<ChartDataPoint>,
    pub genre_popularity: Vec<ChartDataPoint>,
    pub selected_movie: Option<Movie>,
    pub content_recommendations: Vec<Recommendation>,
    pub selected_user: UserId,
    pub collaborative_recommendations: Vec<Recommendation>,
    pub evaluation: EvaluationMetrics,
    pub insights: Vec<InsightEntry>,
}

/// Render the article for one set of selections
pub fn render(
    engine: &RecommenderEngine,
    request: &NotebookRequest,
    panels: Option<&InsightPanels>,
) -> NotebookView {
    let dataset = engine.dataset();
    let top_n = engine.clamp_top_n(request.top_n);

    let movie_id = request
        .movie_id
        .or_else(|| dataset.movies().first().map(|m| m.id));
    let user_id = request.user_id.unwrap_or(DEFAULT_USER);

    let content_recommendations = movie_id
        .map(|id| engine.score_by_content(id, top_n))
        .unwrap_or_default();

    let insights = panels
        .map(|p| {
            p.snapshot()
                .into_iter()
                .map(|(section, text)| InsightEntry { section, text })
                .collect()
        })
        .unwrap_or_default();

    NotebookView {
        sections: Section::ALL
            .into_iter()
            .map(|s| SectionInfo {
                id: s.id(),
                label: s.label(),
                has_insight: s.insight_topic().is_some(),
            })
            .collect(),
        summary: DatasetSummary {
            movies: dataset.movies().len(),
            ratings: dataset.ratings().len(),
            users: dataset.user_ids().len(),
        },
        rating_distribution: rating_distribution(dataset.ratings()),
        genre_popularity: genre_popularity(dataset.movies(), DEFAULT_GENRE_LIMIT),
        selected_movie: movie_id.and_then(|id| dataset.movie(id).cloned()),
        content_recommendations,
        selected_user: user_id,
        collaborative_recommendations: engine.score_by_collaborative(user_id, top_n),
        evaluation: evaluate(),
        insights,
    }
}
