use super::*;
use crate::http::state::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use racs_core::SystemClock;
use racs_engine::{Engine, RealRunner};
use racs_storage::Store;
use std::sync::Arc;
use tower::ServiceExt;

#[tokio::test]
async fn unknown_route_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(Engine::new(
        Arc::new(Store::open_in_memory().unwrap()),
        Arc::new(RealRunner),
        Arc::new(SystemClock),
        dir.path().join("projects"),
        dir.path().join("tasks"),
    ));
    let app = build_router(AppState { engine, no_login: true });

    let response = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
