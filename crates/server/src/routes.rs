use axum::Router;
use ndawonga_core::config::ServerConfig;
use ndawonga_db::DbPool;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;
use crate::{chat, health, quotes, site};

/// Full HTTP surface: JSON API, health, and the optional static and upload trees.
pub fn app(state: AppState, db_pool: DbPool, server: &ServerConfig) -> Router {
    let api = Router::new()
        .merge(quotes::router())
        .merge(chat::router())
        .merge(site::router())
        .with_state(state);

    let mut router = api.merge(health::router(db_pool));

    if let Some(uploads_dir) = &server.uploads_dir {
        router = router.nest_service("/uploads", ServeDir::new(uploads_dir));
    }
    if let Some(static_dir) = &server.static_dir {
        let index = ServeFile::new(static_dir.join("index.html"));
        router = router.fallback_service(ServeDir::new(static_dir).fallback(index));
    }

    router.layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use ndawonga_core::config::AppConfig;
    use ndawonga_core::pricing::PricingTable;
    use ndawonga_db::{connect_with_settings, migrations};
    use serde_json::Value;
    use tower::ServiceExt;

    use super::app;
    use crate::state::AppState;

    async fn router(server: &ndawonga_core::config::ServerConfig) -> axum::Router {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        app(AppState::from_pool(pool.clone(), PricingTable::default()), pool, server)
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn quote_submission_round_trips_through_the_router() {
        let router = router(&AppConfig::default().server).await;

        let response = router
            .oneshot(
                Request::post("/api/quotes")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"name":"Kagiso","email":"kagiso@example.co.za","area_sq_m":10}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["message"], "Quote request saved");
        assert!(body["id"].as_i64().is_some_and(|id| id > 0));
    }

    #[tokio::test]
    async fn oversized_area_estimate_saturates_and_still_answers() {
        let router = router(&AppConfig::default().server).await;

        let response = router
            .oneshot(
                Request::post("/api/quotes/estimate")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"project_type":"Road Construction","area_sq_m":1e27,"complexity":"high"}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert!(body["estimated_cost"].as_f64().is_some_and(|cost| cost > 7.9e28));
        assert_eq!(body["category_fell_back"], false);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request_with_error_body() {
        let router = router(&AppConfig::default().server).await;

        let response = router
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn chat_reply_is_returned_as_json() {
        let router = router(&AppConfig::default().server).await;

        let response = router
            .oneshot(
                Request::post("/api/chat")
                    .header("content-type", "application/json")
                    .header("x-session-id", "router-test")
                    .body(Body::from(r#"{"message":"Show me your projects"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json(response).await["reply"],
            "You can view our projects on the Projects page or request a quote there."
        );
    }

    #[tokio::test]
    async fn static_dir_serves_frontend_and_uploads() {
        let site = tempfile::tempdir().expect("tempdir");
        let uploads = tempfile::tempdir().expect("tempdir");
        std::fs::write(site.path().join("index.html"), "<h1>Ndawonga</h1>").expect("write index");
        std::fs::write(uploads.path().join("profile.pdf"), "%PDF-1.4").expect("write upload");

        let mut server = AppConfig::default().server;
        server.static_dir = Some(site.path().to_path_buf());
        server.uploads_dir = Some(uploads.path().to_path_buf());
        let router = router(&server).await;

        let index = router
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(index.status(), StatusCode::OK);

        let upload = router
            .clone()
            .oneshot(Request::get("/uploads/profile.pdf").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(upload.status(), StatusCode::OK);

        let health = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);
    }
}
