use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::entities::{ExtractedEntities, ItemStatus};
use super::rsvp::RsvpCounts;
use crate::common::PostId;

/// Author recorded when a post is submitted without one.
pub const DEFAULT_AUTHOR: &str = "Anonymous User";

/// A campus feed post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub author: String,
    pub entities: ExtractedEntities,
    pub metadata: PostMetadata,
    pub likes: u32,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Post type
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Event,
    LostFound,
    Announcement,
}

impl PostType {
    pub const ALL: [PostType; 3] = [PostType::Event, PostType::LostFound, PostType::Announcement];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Event => "event",
            PostType::LostFound => "lost_found",
            PostType::Announcement => "announcement",
        }
    }

    /// Interpret a model's one-word classification answer.
    ///
    /// Anything outside the three types becomes `Announcement`.
    pub fn from_model_output(raw: &str) -> Self {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.')
            .trim()
            .to_lowercase();

        cleaned.parse().unwrap_or(PostType::Announcement)
    }
}

impl std::fmt::Display for PostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PostType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "event" => Ok(PostType::Event),
            "lost_found" => Ok(PostType::LostFound),
            "announcement" => Ok(PostType::Announcement),
            _ => Err(anyhow::anyhow!("Invalid post type: {}", s)),
        }
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Type-specific derived data. Only the sub-objects for the post's own type
/// are populated; the rest stay `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMetadata {
    pub rsvp_counts: Option<RsvpCounts>,
    pub event_details: Option<EventDetails>,
    pub lost_found_details: Option<LostFoundDetails>,
    pub announcement_details: Option<AnnouncementDetails>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub date: Option<String>,
    pub location: Option<String>,
    pub rsvp_deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostFoundDetails {
    pub item_status: Option<ItemStatus>,
    pub item_name: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDetails {
    pub department: Option<String>,
    pub attachment_url: Option<String>,
    pub attachment_type: Option<String>,
}

impl PostMetadata {
    /// Build the metadata for a new post from its entities.
    pub fn derive(entities: &ExtractedEntities) -> Self {
        match entities {
            ExtractedEntities::Event(e) => PostMetadata {
                rsvp_counts: Some(RsvpCounts::default()),
                event_details: Some(EventDetails {
                    date: e.date.clone(),
                    location: e.location.clone(),
                    rsvp_deadline: None,
                }),
                ..Default::default()
            },
            ExtractedEntities::LostFound(e) => PostMetadata {
                lost_found_details: Some(LostFoundDetails {
                    item_status: e.item_status,
                    item_name: e.item_name.clone(),
                    location: e.location.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ExtractedEntities::Announcement(e) => PostMetadata {
                announcement_details: Some(AnnouncementDetails {
                    department: e.department.clone(),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}

// =============================================================================
// New post input
// =============================================================================

/// Input to `PostStore::create`.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(field_defaults(setter(into)))]
pub struct NewPost {
    pub content: String,
    pub post_type: PostType,
    #[builder(default = DEFAULT_AUTHOR.to_string())]
    pub author: String,
    #[builder(default, setter(strip_option))]
    pub entities: Option<ExtractedEntities>,
}

impl NewPost {
    /// Materialise a stored post: trims text, fills defaults, derives metadata.
    ///
    /// Returns `None` when the trimmed content is empty. Entities that belong to
    /// a different type than `post_type` are replaced with empty ones.
    pub fn into_post(self, id: PostId, now: DateTime<Utc>) -> Option<Post> {
        let content = self.content.trim().to_string();
        if content.is_empty() {
            return None;
        }

        let author = match self.author.trim() {
            "" => DEFAULT_AUTHOR.to_string(),
            a => a.to_string(),
        };

        let entities = self
            .entities
            .filter(|e| e.post_type() == self.post_type)
            .unwrap_or_else(|| ExtractedEntities::empty(self.post_type));

        Some(Post {
            id,
            content,
            post_type: self.post_type,
            author,
            metadata: PostMetadata::derive(&entities),
            entities,
            likes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::posts::models::entities::{EventEntities, LostFoundEntities};

    #[test]
    fn test_post_type_wire_names() {
        for t in PostType::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, serde_json::Value::String(t.to_string()));
            assert_eq!(t.as_str().parse::<PostType>().unwrap(), t);
        }
    }

    #[test]
    fn test_from_model_output() {
        assert_eq!(PostType::from_model_output("  Event\n"), PostType::Event);
        assert_eq!(PostType::from_model_output("\"lost_found\""), PostType::LostFound);
        assert_eq!(PostType::from_model_output("announcement."), PostType::Announcement);
        assert_eq!(PostType::from_model_output("poll"), PostType::Announcement);
        assert_eq!(PostType::from_model_output(""), PostType::Announcement);
    }

    #[test]
    fn test_event_post_gets_zeroed_rsvp_counts() {
        let post = NewPost::builder()
            .content("Hackathon tonight")
            .post_type(PostType::Event)
            .build()
            .into_post(PostId::new(), Utc::now())
            .unwrap();

        assert_eq!(post.metadata.rsvp_counts, Some(RsvpCounts::default()));
        assert!(post.metadata.event_details.is_some());
        assert!(post.metadata.lost_found_details.is_none());
        assert!(post.metadata.announcement_details.is_none());
    }

    #[test]
    fn test_only_matching_metadata_is_populated() {
        let entities = ExtractedEntities::LostFound(LostFoundEntities {
            item_status: Some(ItemStatus::Lost),
            item_name: Some("blue backpack".into()),
            location: Some("the library".into()),
        });
        let post = NewPost::builder()
            .content("Lost my blue backpack near the library")
            .post_type(PostType::LostFound)
            .entities(entities)
            .build()
            .into_post(PostId::new(), Utc::now())
            .unwrap();

        let details = post.metadata.lost_found_details.clone().unwrap();
        assert_eq!(details.item_name.as_deref(), Some("blue backpack"));
        assert_eq!(details.item_status, Some(ItemStatus::Lost));
        assert!(post.metadata.rsvp_counts.is_none());
        assert!(post.metadata.event_details.is_none());
        assert!(post.metadata.announcement_details.is_none());
    }

    #[test]
    fn test_into_post_trims_and_defaults() {
        let post = NewPost::builder()
            .content("  Library hours change  ")
            .post_type(PostType::Announcement)
            .author("   ")
            .build()
            .into_post(PostId::new(), Utc::now())
            .unwrap();

        assert_eq!(post.content, "Library hours change");
        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
        assert_eq!(post.created_at, post.updated_at);
    }

    #[test]
    fn test_blank_content_is_rejected() {
        let post = NewPost::builder()
            .content(" \n ")
            .post_type(PostType::Event)
            .build()
            .into_post(PostId::new(), Utc::now());
        assert!(post.is_none());
    }

    #[test]
    fn test_mismatched_entities_are_replaced() {
        let post = NewPost::builder()
            .content("Career fair")
            .post_type(PostType::Announcement)
            .entities(ExtractedEntities::Event(EventEntities {
                date: Some("today".into()),
                ..Default::default()
            }))
            .build()
            .into_post(PostId::new(), Utc::now())
            .unwrap();

        assert_eq!(post.entities, ExtractedEntities::empty(PostType::Announcement));
    }

    #[test]
    fn test_post_json_shape() {
        let post = NewPost::builder()
            .content("Seminar")
            .post_type(PostType::Event)
            .author("Student-1A2B")
            .build()
            .into_post(PostId::new(), Utc::now())
            .unwrap();
        let json = serde_json::to_value(&post).unwrap();

        assert_eq!(json["type"], "event");
        assert_eq!(json["author"], "Student-1A2B");
        assert_eq!(json["metadata"]["rsvpCounts"]["notGoing"], 0);
        assert!(json["metadata"]["lostFoundDetails"].is_null());
        assert!(json["createdAt"].is_string());
        assert!(json["entities"]["title"].is_null());
    }
}
