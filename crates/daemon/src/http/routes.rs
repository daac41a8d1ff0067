// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Router configuration for the control surface (spec.md §6).

use super::handlers;
use super::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/project/create", post(handlers::create_project))
        .route("/project/update", post(handlers::update_project))
        .route("/project/triggers", post(handlers::replace_triggers))
        .route("/project/build", post(handlers::build))
        .route("/project/delete", post(handlers::delete))
        .route("/project/list", get(handlers::list_projects))
        .route("/project/status", get(handlers::project_status))
        .route("/project/events", get(handlers::events))
        .route("/task/logs", get(handlers::task_logs))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
