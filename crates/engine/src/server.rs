//! HTTP surface for the notebook front-end

use actix_web::{web, HttpResponse, Responder};
use cinerec_core::CineRecError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::analytics::{genre_popularity, rating_distribution, DEFAULT_GENRE_LIMIT};
use crate::insight::{InsightPanels, InsightStatus};
use crate::notebook::{blank_as_none, render, NotebookRequest, Section};
use crate::types::{MovieId, UserId};
use crate::RecommenderEngine;

/// Application state shared across all handlers
pub struct AppState {
    pub engine: Arc<RecommenderEngine>,
    pub panels: Arc<InsightPanels>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

#[derive(Debug, Deserialize)]
pub struct TopNQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub section: Section,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: "cinerec-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/v1/movies
async fn list_movies(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.dataset().movies())
}

/// GET /api/v1/recommendations/content/{movie_id}
///
/// Unknown movie ids yield an empty list rather than an error.
async fn content_recommendations(
    state: web::Data<AppState>,
    path: web::Path<MovieId>,
    query: web::Query<TopNQuery>,
) -> impl Responder {
    let movie_id = path.into_inner();
    let top_n = state.engine.clamp_top_n(query.top_n);
    debug!(movie_id, top_n, "Content recommendation request");

    HttpResponse::Ok().json(state.engine.score_by_content(movie_id, top_n))
}

/// GET /api/v1/recommendations/collaborative/{user_id}
async fn collaborative_recommendations(
    state: web::Data<AppState>,
    path: web::Path<UserId>,
    query: web::Query<TopNQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    let top_n = state.engine.clamp_top_n(query.top_n);
    debug!(user_id, top_n, "Collaborative recommendation request");

    HttpResponse::Ok().json(state.engine.score_by_collaborative(user_id, top_n))
}

/// GET /api/v1/evaluation
async fn evaluation(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.evaluate())
}

/// GET /api/v1/analytics/ratings
async fn rating_analytics(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(rating_distribution(state.engine.dataset().ratings()))
}

/// GET /api/v1/analytics/genres
async fn genre_analytics(
    state: web::Data<AppState>,
    query: web::Query<GenreQuery>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(DEFAULT_GENRE_LIMIT);
    HttpResponse::Ok().json(genre_popularity(state.engine.dataset().movies(), limit))
}

/// GET /api/v1/notebook
async fn notebook(
    state: web::Data<AppState>,
    query: web::Query<NotebookRequest>,
) -> impl Responder {
    let view = render(&state.engine, &query, Some(state.panels.as_ref()));
    HttpResponse::Ok().json(view)
}

/// POST /api/v1/insights/{section}
///
/// Returns cached commentary, starts a fetch, or reports that one is already
/// running for the section.
async fn request_insight(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, CineRecError> {
    let raw = path.into_inner();

    let (section, topic) = raw
        .parse::<Section>()
        .ok()
        .and_then(|s| s.insight_topic().map(|topic| (s, topic)))
        .ok_or_else(|| CineRecError::NotFound(format!("no insight panel for section '{}'", raw)))?;

    info!(section = section.id(), "Insight requested");

    let response = match state.panels.request(section, topic).await {
        InsightStatus::Ready(text) => InsightResponse {
            section,
            status: "ready",
            text: Some(text),
        },
        InsightStatus::Pending => InsightResponse {
            section,
            status: "pending",
            text: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Configure application routes
///
/// Malformed path or query parameters are answered with a JSON validation
/// error instead of actix's plain-text body.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| CineRecError::validation(err.to_string(), "path").into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| CineRecError::validation(err.to_string(), "query").into()),
    )
    .service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health))
            .route("/movies", web::get().to(list_movies))
            .service(
                web::scope("/recommendations")
                    .route(
                        "/content/{movie_id}",
                        web::get().to(content_recommendations),
                    )
                    .route(
                        "/collaborative/{user_id}",
                        web::get().to(collaborative_recommendations),
                    ),
            )
            .route("/evaluation", web::get().to(evaluation))
            .service(
                web::scope("/analytics")
                    .route("/ratings", web::get().to(rating_analytics))
                    .route("/genres", web::get().to(genre_analytics)),
            )
            .route("/notebook", web::get().to(notebook))
            .route("/insights/{section}", web::post().to(request_insight)),
    );
}
