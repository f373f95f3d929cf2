use std::sync::Arc;

use axum::{extract::Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::now;
use crate::kernel::ServerDeps;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    store: &'static str,
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
}

/// Health check endpoint
///
/// Reports which store backend the server settled on at startup.
pub async fn health_handler(Extension(deps): Extension<Arc<ServerDeps>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        store: deps.store.backend(),
        timestamp: now(),
    })
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Campus Feed API Server",
    })
}
