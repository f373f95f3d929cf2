use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use super::{clamp_limit, PostStore, StoreError, StoreResult};
use crate::common::{now, PostId};
use crate::domains::posts::models::{
    Coercion, ExtractedEntities, NewPost, Post, PostMetadata, PostType, RsvpStatus,
};

/// Durable store backed by the `posts` table.
#[derive(Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct PostRow {
    id: PostId,
    content: String,
    post_type: String,
    author: String,
    entities: Value,
    metadata: Value,
    likes: i32,
    comments: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = StoreError;

    fn try_from(row: PostRow) -> StoreResult<Self> {
        let post_type: PostType = row
            .post_type
            .parse()
            .map_err(|e: anyhow::Error| StoreError::InvalidRow(e.to_string()))?;
        let entities = ExtractedEntities::from_json(post_type, row.entities, Coercion::Lenient)
            .map_err(|e| StoreError::InvalidRow(e.to_string()))?;

        Ok(Post {
            id: row.id,
            content: row.content,
            post_type,
            author: row.author,
            entities,
            metadata: serde_json::from_value(row.metadata)?,
            likes: u32::try_from(row.likes).unwrap_or_default(),
            comments: serde_json::from_value(row.comments)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        info!("Connected to Postgres, migrations applied");
        Ok(Self::new(pool))
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl PostStore for PostgresPostStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, post: NewPost) -> StoreResult<Post> {
        let post = post
            .into_post(PostId::new(), now())
            .ok_or(StoreError::EmptyContent)?;

        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts
                (id, content, post_type, author, entities, metadata, likes, comments, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *",
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(post.post_type.as_str())
        .bind(&post.author)
        .bind(serde_json::to_value(&post.entities)?)
        .bind(serde_json::to_value(&post.metadata)?)
        .bind(i32::try_from(post.likes).unwrap_or(i32::MAX))
        .bind(serde_json::to_value(&post.comments)?)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)?;

        debug!(post_id = %post.id, post_type = %post.post_type, "Stored post in Postgres");
        row.try_into()
    }

    async fn list(&self, limit: usize) -> StoreResult<Vec<Post>> {
        let limit = clamp_limit(limit) as i64;

        let rows = sqlx::query_as::<_, PostRow>(
            "SELECT * FROM posts
             ORDER BY created_at DESC, id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Post::try_from).collect()
    }

    async fn update_rsvp(&self, id: PostId, status: RsvpStatus) -> StoreResult<Post> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, PostRow>("SELECT * FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;

        let post = Post::try_from(row)?;
        if post.post_type != PostType::Event {
            return Err(StoreError::NotAnEvent);
        }

        let mut metadata: PostMetadata = post.metadata;
        metadata
            .rsvp_counts
            .get_or_insert_with(Default::default)
            .increment(status);
        let updated_at = now().max(post.created_at);

        let row = sqlx::query_as::<_, PostRow>(
            "UPDATE posts SET metadata = $2, updated_at = $3
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(serde_json::to_value(&metadata)?)
        .bind(updated_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(post_id = %id, ?status, "Recorded RSVP");
        row.try_into()
    }
}
