use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::common::{now, ApiResponse, PostId};
use crate::domains::posts::models::{Coercion, ExtractedEntities, NewPost, Post, PostType};
use crate::domains::posts::store::MAX_LIST_LIMIT;
use crate::kernel::ServerDeps;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectTypeRequest {
    pub content: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectTypeResponse {
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub extracted_entities: ExtractedEntities,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub generated_content: String,
    pub original_prompt: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub post_type: Option<String>,
    pub author: Option<String>,
    pub extracted_entities: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RsvpRequest {
    pub status: Option<String>,
}

fn required<'a>(value: &'a Option<String>, message: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::validation(message))
}

/// POST /api/posts/detect-type
pub async fn detect_type_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    body: Result<Json<DetectTypeRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<DetectTypeResponse>>> {
    let Json(body) = body?;
    let content = required(&body.content, "Content is required")?;
    let api_key = body.api_key.as_deref();

    let post_type = deps.classifier.detect_post_type(content, api_key).await;
    let extracted_entities = deps
        .classifier
        .extract_entities(content, post_type, api_key)
        .await;

    info!(%post_type, "Detected post type");

    Ok(Json(ApiResponse::ok(DetectTypeResponse {
        content: content.to_string(),
        post_type,
        extracted_entities,
        timestamp: now(),
    })))
}

/// POST /api/posts/generate
pub async fn generate_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<GenerateResponse>>> {
    let Json(body) = body?;
    let prompt = required(&body.prompt, "Prompt is required")?;

    let generated_content = deps
        .classifier
        .generate_post(prompt, body.api_key.as_deref())
        .await;

    Ok(Json(ApiResponse::ok(GenerateResponse {
        generated_content,
        original_prompt: prompt.to_string(),
        timestamp: now(),
    })))
}

/// POST /api/posts
pub async fn create_post_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    body: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Post>>)> {
    let Json(body) = body?;
    let content = required(&body.content, "Content is required")?;

    // Missing type: classify with server credentials only
    let post_type = match body.post_type.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(raw) => raw
            .parse::<PostType>()
            .map_err(|_| ApiError::validation(format!("Invalid post type: {}", raw)))?,
        None => deps.classifier.detect_post_type(content, None).await,
    };

    let entities = body
        .extracted_entities
        .map(|value| ExtractedEntities::from_json(post_type, value, Coercion::Strict))
        .transpose()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let post = deps
        .store
        .create(NewPost {
            content: content.to_string(),
            post_type,
            author: body.author.unwrap_or_default(),
            entities,
        })
        .await?;

    info!(post_id = %post.id, post_type = %post.post_type, "Created post");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(post))))
}

/// GET /api/posts?limit=N
pub async fn list_posts_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> ApiResult<Json<ApiResponse<Vec<Post>>>> {
    let Query(query) = query.map_err(|e| ApiError::validation(e.body_text()))?;

    let posts = deps
        .store
        .list(query.limit.unwrap_or(MAX_LIST_LIMIT))
        .await?;

    Ok(Json(ApiResponse::ok(posts)))
}

/// PUT /api/posts/:id/rsvp
pub async fn rsvp_handler(
    Extension(deps): Extension<Arc<ServerDeps>>,
    Path(id): Path<String>,
    body: Result<Json<RsvpRequest>, JsonRejection>,
) -> ApiResult<Json<ApiResponse<Post>>> {
    let Json(body) = body?;

    let raw_status = body.status.unwrap_or_default();
    let status = deps
        .rsvp_vocabulary
        .parse_status(&raw_status)
        .ok_or_else(|| ApiError::validation(format!("Invalid RSVP status: {}", raw_status)))?;

    // Ids that can't be a post id can't name a stored post either
    let id = PostId::parse(&id).map_err(|_| ApiError::post_not_found())?;

    let post = deps.store.update_rsvp(id, status).await?;
    info!(post_id = %post.id, ?status, "RSVP recorded");

    Ok(Json(ApiResponse::ok(post)))
}
