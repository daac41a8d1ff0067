// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin handler adapters onto [`racs_engine::Engine`] (spec.md §6).

use super::dto::{
    parse_stage, BuildQuery, CreateProjectRequest, DeleteQuery, LogQuery, ProjectQuery,
    ReplaceTriggersRequest, UpdateProjectRequest,
};
use super::error::{ApiError, BadRequest};
use super::state::AppState;
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::Json;
use racs_core::{ProjectId, TaskId};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<i64>, ApiError> {
    let id = state.engine.create_project(req.into()).await?;
    Ok(Json(id.get()))
}

pub async fn update_project(
    State(state): State<AppState>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<StatusCode, ApiError> {
    let id = req.project_id();
    state.engine.update_project(id, req.into_edit())?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn replace_triggers(
    State(state): State<AppState>,
    Json(req): Json<ReplaceTriggersRequest>,
) -> Result<StatusCode, Response> {
    let source = req.source_id();
    let edges = req.into_triggers().map_err(|_| BadRequest.into_response())?;
    state.engine.replace_triggers(source, edges).map_err(ApiError).map_err(IntoResponse::into_response)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn build(
    State(state): State<AppState>,
    Query(query): Query<BuildQuery>,
) -> Result<StatusCode, Response> {
    let stage = parse_stage(&query.stage).ok_or_else(|| BadRequest.into_response())?;
    state
        .engine
        .enqueue_build(ProjectId::new(query.id), stage, String::new())
        .await
        .map_err(ApiError)
        .map_err(IntoResponse::into_response)?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn delete(
    State(state): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, Response> {
    if query.confirm != "YES" {
        return Err(BadRequest.into_response());
    }
    state
        .engine
        .delete_project(ProjectId::new(query.id))
        .await
        .map_err(ApiError)
        .map_err(IntoResponse::into_response)?;
    Ok(StatusCode::ACCEPTED)
}

pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<racs_core::ProjectSnapshot>> {
    Json(state.engine.list_projects())
}

pub async fn project_status(
    State(state): State<AppState>,
    Query(query): Query<ProjectQuery>,
) -> Result<Json<racs_core::ProjectSnapshot>, StatusCode> {
    state
        .engine
        .project_snapshot(ProjectId::new(query.id))
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl tokio_stream::Stream<Item = Result<SseEvent, Infallible>>> {
    let (snapshot, receiver) = state.engine.subscribe();

    // The snapshot belongs to this subscriber alone (spec.md §4.5: sent
    // exactly once, as its first message); it never touches the broadcast
    // channel, so it is emitted directly ahead of the live stream here.
    let snapshot_event = serde_json::to_string(&snapshot).ok().map(|json| Ok(SseEvent::default().data(json)));
    let snapshot_stream = tokio_stream::iter(snapshot_event);

    let live_stream = BroadcastStream::new(receiver).filter_map(|item| match item {
        Ok(event) => serde_json::to_string(&event).ok().map(|json| Ok(SseEvent::default().data(json))),
        Err(_) => None,
    });

    Sse::new(snapshot_stream.chain(live_stream)).keep_alive(KeepAlive::default())
}

pub async fn task_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> Result<Response, StatusCode> {
    let task_id = TaskId::new(query.id);
    let task = state.engine.shared().store.get_task(task_id).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let Some(task) = task else {
        return Err(StatusCode::NOT_FOUND);
    };

    let log_path = state.engine.shared().task_log_path(query.id);
    let tail = racs_engine::read_tail(&log_path, query.offset, task.state)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut response = tail.body.into_response();
    response.headers_mut().insert(
        "X-Task-State",
        HeaderValue::from_static(tail.state.as_str()),
    );
    Ok(response)
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
