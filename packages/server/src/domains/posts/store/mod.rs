//! Post persistence.
//!
//! One trait, two backends. The backend is chosen once at startup and shared
//! by every handler through `ServerDeps`.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPostStore;
pub use postgres::PostgresPostStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::common::PostId;
use crate::domains::posts::models::{NewPost, Post, RsvpStatus};

/// Upper bound on `list`, whatever the caller asks for.
pub const MAX_LIST_LIMIT: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Post not found")]
    NotFound,

    #[error("RSVP is only available for event posts")]
    NotAnEvent,

    #[error("Content is required")]
    EmptyContent,

    #[error("post already exists")]
    Conflict,

    #[error("stored post is malformed: {0}")]
    InvalidRow(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn backend(&self) -> &'static str;

    /// Persist a new post with a fresh id and `createdAt == updatedAt`.
    async fn create(&self, post: NewPost) -> StoreResult<Post>;

    /// Newest first, at most `clamp_limit(limit)` posts.
    async fn list(&self, limit: usize) -> StoreResult<Vec<Post>>;

    /// Add one RSVP to an event post and refresh `updatedAt`.
    async fn update_rsvp(&self, id: PostId, status: RsvpStatus) -> StoreResult<Post>;
}

pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_LIST_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(10), 10);
        assert_eq!(clamp_limit(500), MAX_LIST_LIMIT);
    }
}
