//! Structured fields pulled out of free-text post content.
//!
//! The key set depends on the post type. Every field is optional and an
//! absent value serialises as `null`, never as a missing key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::post::PostType;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntities {
    pub date: Option<String>,
    pub location: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostFoundEntities {
    pub item_status: Option<ItemStatus>,
    pub item_name: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementEntities {
    pub department: Option<String>,
    pub deadline: Option<String>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Lost,
    Found,
}

impl std::str::FromStr for ItemStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lost" => Ok(ItemStatus::Lost),
            "found" => Ok(ItemStatus::Found),
            other => Err(anyhow::anyhow!("Invalid item status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::str::FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(anyhow::anyhow!("Invalid priority: {}", other)),
        }
    }
}

/// Entities for one post, shaped by its type.
///
/// Serialised untagged: the JSON is just the field object for the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExtractedEntities {
    Event(EventEntities),
    LostFound(LostFoundEntities),
    Announcement(AnnouncementEntities),
}

/// How strictly to treat values that don't fit the expected shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// Caller input: wrong types or out-of-set values are errors.
    Strict,
    /// Model output and stored rows: anything unusable becomes `null`.
    Lenient,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntitiesError {
    #[error("extracted entities must be a JSON object")]
    NotAnObject,

    #[error("invalid value for entity field '{0}'")]
    InvalidField(&'static str),
}

impl ExtractedEntities {
    /// All-null entities for a type.
    pub fn empty(post_type: PostType) -> Self {
        match post_type {
            PostType::Event => ExtractedEntities::Event(EventEntities::default()),
            PostType::LostFound => ExtractedEntities::LostFound(LostFoundEntities::default()),
            PostType::Announcement => {
                ExtractedEntities::Announcement(AnnouncementEntities::default())
            }
        }
    }

    pub fn post_type(&self) -> PostType {
        match self {
            ExtractedEntities::Event(_) => PostType::Event,
            ExtractedEntities::LostFound(_) => PostType::LostFound,
            ExtractedEntities::Announcement(_) => PostType::Announcement,
        }
    }

    /// Coerce a loosely-typed JSON object into the shape for `post_type`.
    ///
    /// Unknown keys are ignored. `null` as a whole is treated as an empty object.
    pub fn from_json(
        post_type: PostType,
        value: Value,
        coercion: Coercion,
    ) -> Result<Self, EntitiesError> {
        let map = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(EntitiesError::NotAnObject),
        };
        let fields = Fields { map, coercion };

        Ok(match post_type {
            PostType::Event => ExtractedEntities::Event(EventEntities {
                date: fields.string("date")?,
                location: fields.string("location")?,
                title: fields.string("title")?,
            }),
            PostType::LostFound => ExtractedEntities::LostFound(LostFoundEntities {
                item_status: fields.parsed("itemStatus")?,
                item_name: fields.string("itemName")?,
                location: fields.string("location")?,
            }),
            PostType::Announcement => ExtractedEntities::Announcement(AnnouncementEntities {
                department: fields.string("department")?,
                deadline: fields.string("deadline")?,
                priority: fields.parsed("priority")?,
            }),
        })
    }
}

struct Fields {
    map: Map<String, Value>,
    coercion: Coercion,
}

impl Fields {
    fn string(&self, key: &'static str) -> Result<Option<String>, EntitiesError> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => {
                let s = s.trim();
                Ok((!s.is_empty()).then(|| s.to_string()))
            }
            Some(_) => match self.coercion {
                Coercion::Strict => Err(EntitiesError::InvalidField(key)),
                Coercion::Lenient => Ok(None),
            },
        }
    }

    fn parsed<T: std::str::FromStr>(&self, key: &'static str) -> Result<Option<T>, EntitiesError> {
        let Some(raw) = self.string(key)? else {
            return Ok(None);
        };
        match raw.parse::<T>() {
            Ok(v) => Ok(Some(v)),
            Err(_) if self.coercion == Coercion::Lenient => Ok(None),
            Err(_) => Err(EntitiesError::InvalidField(key)),
        }
    }
}
