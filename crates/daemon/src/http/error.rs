// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP error translation (spec.md §7e, §7): handlers return opaque 5xx
//! responses and never leak backend details.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use racs_engine::EngineError;
use tracing::warn;

pub struct ApiError(pub EngineError);

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            EngineError::UnknownProject(_) | EngineError::UnknownRegistry(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(error = %self.0, "request failed");
        status.into_response()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BadRequest;

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        StatusCode::BAD_REQUEST.into_response()
    }
}
