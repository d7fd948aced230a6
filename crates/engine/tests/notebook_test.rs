//! Notebook rendering and HTTP endpoint wiring

use actix_web::{test, web, App};
use cinerec_core::InsightConfig;
use cinerec_engine::server::{configure_routes, AppState};
use cinerec_engine::{
    render, Dataset, GeminiInsightClient, InsightPanels, InsightStatus, NotebookRequest,
    RecommenderEngine, Section, OFFLINE_FALLBACK,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use std::sync::Arc;

fn engine() -> Arc<RecommenderEngine> {
    let mut rng = StdRng::seed_from_u64(8);
    Arc::new(RecommenderEngine::with_default_config(Arc::new(
        Dataset::builtin(&mut rng),
    )))
}

/// Panels backed by a client without credentials, so every fetch falls back
fn offline_panels() -> Arc<InsightPanels> {
    let client = GeminiInsightClient::new(InsightConfig::default()).unwrap();
    Arc::new(InsightPanels::new(Arc::new(client)))
}

fn state() -> web::Data<AppState> {
    web::Data::new(AppState {
        engine: engine(),
        panels: offline_panels(),
    })
}

#[std::prelude::v1::test]
fn test_render_defaults() {
    let engine = engine();
    let view = render(&engine, &NotebookRequest::default(), None);

    assert_eq!(view.sections.len(), 10);
    assert_eq!(view.summary.movies, 35);
    assert_eq!(view.summary.ratings, 500);
    assert_eq!(view.summary.users, 50);
    assert_eq!(view.selected_movie.as_ref().map(|m| m.id), Some(1));
    assert_eq!(view.selected_user, 1);
    assert_eq!(view.content_recommendations.len(), 5);
    assert_eq!(view.collaborative_recommendations.len(), 5);
    assert_eq!(view.evaluation.improvement_percent, "17.2%");
    assert_eq!(view.genre_popularity.len(), 8);
    assert!(view.insights.is_empty());
}

#[std::prelude::v1::test]
fn test_render_unknown_selection_degrades_gracefully() {
    let engine = engine();
    let request = NotebookRequest {
        movie_id: Some(31337),
        user_id: Some(777),
        top_n: Some(3),
    };
    let view = render(&engine, &request, None);

    assert!(view.selected_movie.is_none());
    assert!(view.content_recommendations.is_empty());
    assert_eq!(view.collaborative_recommendations.len(), 3);
}

#[std::prelude::v1::test]
fn test_offline_panel_caches_fallback() {
    let panels = offline_panels();
    let topic = Section::Intro.insight_topic().unwrap();

    let status = tokio_test::block_on(panels.request(Section::Intro, topic));
    assert_eq!(status, InsightStatus::Ready(OFFLINE_FALLBACK.to_string()));

    let view = render(&engine(), &NotebookRequest::default(), Some(panels.as_ref()));
    assert_eq!(view.insights.len(), 1);
    assert_eq!(view.insights[0].section, Section::Intro);
}

#[actix_web::test]
async fn test_content_endpoint() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations/content/1?top_n=3")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let recs = body.as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["movie_id"], 2);
    assert!(recs.iter().all(|r| r["movie_id"] != 1));
}

#[actix_web::test]
async fn test_content_endpoint_unknown_movie_is_empty_list() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations/content/999999")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!([]));
}

#[actix_web::test]
async fn test_collaborative_endpoint_caps_top_n() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/recommendations/collaborative/12345?top_n=1000")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // capped at 50, but the catalog only has 35 movies
    assert_eq!(body.as_array().unwrap().len(), 35);
}

#[actix_web::test]
async fn test_evaluation_endpoint() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get().uri("/api/v1/evaluation").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        serde_json::json!({
            "model_error": 0.872,
            "baseline_error": 1.054,
            "improvement_percent": "17.2%"
        })
    );
}

#[actix_web::test]
async fn test_analytics_endpoints() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/ratings")
        .to_request();
    let ratings: Value = test::call_and_read_body_json(&app, req).await;
    let total: u64 = ratings
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["value"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 500);

    let req = test::TestRequest::get()
        .uri("/api/v1/analytics/genres?limit=3")
        .to_request();
    let genres: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(genres.as_array().unwrap().len(), 3);
}

#[actix_web::test]
async fn test_notebook_endpoint() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/notebook?movie_id=2571&user_id=4")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["selected_movie"]["title"], "Matrix, The (1999)");
    assert_eq!(body["selected_user"], 4);
    assert_eq!(body["sections"][2]["id"], "EDA");
    assert_eq!(body["sections"][8]["label"], "9. Business Strategy");
}

#[actix_web::test]
async fn test_notebook_endpoint_blank_selection_uses_defaults() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/notebook?movie_id=&user_id=&top_n=")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["selected_movie"]["id"], 1);
    assert_eq!(body["selected_user"], 1);
    assert_eq!(body["content_recommendations"].as_array().unwrap().len(), 5);
}

#[actix_web::test]
async fn test_insight_endpoint_unknown_section_is_json_not_found() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/insights/Appendix")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn test_insight_endpoint_serves_fallback_offline() {
    let app = test::init_service(App::new().app_data(state()).configure(configure_routes)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/insights/BusinessInsights")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ready");
    assert_eq!(body["text"], OFFLINE_FALLBACK);
}
