use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{clamp_limit, PostStore, StoreError, StoreResult};
use crate::common::{now, PostId};
use crate::domains::posts::models::{NewPost, Post, PostType, RsvpStatus};

/// Process-local store used when no database is configured.
///
/// Posts are kept in insertion order; everything is lost on restart.
#[derive(Default)]
pub struct InMemoryPostStore {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, post: NewPost) -> StoreResult<Post> {
        let post = post
            .into_post(PostId::new(), now())
            .ok_or(StoreError::EmptyContent)?;

        self.posts.write().await.push(post.clone());
        debug!(post_id = %post.id, post_type = %post.post_type, "Stored post in memory");

        Ok(post)
    }

    async fn list(&self, limit: usize) -> StoreResult<Vec<Post>> {
        let posts = self.posts.read().await;
        Ok(posts.iter().rev().take(clamp_limit(limit)).cloned().collect())
    }

    async fn update_rsvp(&self, id: PostId, status: RsvpStatus) -> StoreResult<Post> {
        // Held across the read-modify-write so concurrent RSVPs never lose a count
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound)?;

        if post.post_type != PostType::Event {
            return Err(StoreError::NotAnEvent);
        }

        post.metadata
            .rsvp_counts
            .get_or_insert_with(Default::default)
            .increment(status);
        post.updated_at = now().max(post.created_at);

        Ok(post.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::posts::models::RsvpCounts;
    use std::sync::Arc;

    fn new_post(content: &str, post_type: PostType) -> NewPost {
        NewPost::builder().content(content).post_type(post_type).build()
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_bounded() {
        let store = InMemoryPostStore::new();
        for i in 0..60 {
            store
                .create(new_post(&format!("post {}", i), PostType::Announcement))
                .await
                .unwrap();
        }

        let posts = store.list(50).await.unwrap();
        assert_eq!(posts.len(), 50);
        assert_eq!(posts[0].content, "post 59");
        assert_eq!(posts[49].content, "post 10");

        let posts = store.list(1000).await.unwrap();
        assert_eq!(posts.len(), 50);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_content() {
        let store = InMemoryPostStore::new();
        let err = store
            .create(new_post("   ", PostType::Event))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::EmptyContent));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_rsvp_increments_one_counter() {
        let store = InMemoryPostStore::new();
        let post = store.create(new_post("Hackathon", PostType::Event)).await.unwrap();

        for status in [RsvpStatus::Going, RsvpStatus::Going, RsvpStatus::NotGoing] {
            store.update_rsvp(post.id, status).await.unwrap();
        }
        let updated = store.update_rsvp(post.id, RsvpStatus::Going).await.unwrap();

        assert_eq!(
            updated.metadata.rsvp_counts,
            Some(RsvpCounts {
                going: 3,
                interested: 0,
                not_going: 1
            })
        );
        assert!(updated.updated_at >= updated.created_at);
        assert_eq!(updated.created_at, post.created_at);
    }

    #[tokio::test]
    async fn test_rsvp_on_non_event_is_rejected_and_leaves_post_unchanged() {
        let store = InMemoryPostStore::new();
        let post = store
            .create(new_post("Found keys", PostType::LostFound))
            .await
            .unwrap();

        let err = store.update_rsvp(post.id, RsvpStatus::Going).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAnEvent));

        let stored = store.list(1).await.unwrap().remove(0);
        assert_eq!(stored, post);
    }

    #[tokio::test]
    async fn test_rsvp_unknown_post() {
        let store = InMemoryPostStore::new();
        let err = store
            .update_rsvp(PostId::new(), RsvpStatus::Interested)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_concurrent_rsvps_are_all_counted() {
        let store = Arc::new(InMemoryPostStore::new());
        let post = store.create(new_post("Open mic", PostType::Event)).await.unwrap();

        let tasks: Vec<_> = (0..20)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.update_rsvp(post.id, RsvpStatus::Interested).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = store.list(1).await.unwrap().remove(0);
        assert_eq!(stored.metadata.rsvp_counts.unwrap().interested, 20);
    }
}
