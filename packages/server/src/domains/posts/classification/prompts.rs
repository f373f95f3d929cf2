//! Prompts and response parsing shared by every provider adapter.

use serde_json::Value;

use super::ProviderError;
use crate::domains::posts::models::{Coercion, ExtractedEntities, PostType};

pub const CLASSIFY_SYSTEM_PROMPT: &str = r#"You are a post classifier for a campus social network. Analyze the given content and classify it into one of these THREE types ONLY:
- "event": Posts about events, meetings, conferences, webinars, parties, study groups, workshops (look for dates, times, locations, RSVP mentions)
- "lost_found": Posts about lost or found items on campus (look for "lost", "found", "missing", item descriptions, locations where lost/found)
- "announcement": Official announcements from departments, news, important updates, deadlines, policy changes, administrative notices

Respond with only the classification type in lowercase. If unsure, respond "announcement"."#;

const EVENT_EXTRACTION_PROMPT: &str = r#"Extract structured data from this event post. Return a JSON object with:
{
  "date": "ISO date string if found",
  "location": "event location if mentioned",
  "title": "event title/name if mentioned"
}
If any field is not found, set it to null. Return only the JSON object."#;

const LOST_FOUND_EXTRACTION_PROMPT: &str = r#"Extract structured data from this lost/found post. Return a JSON object with:
{
  "itemStatus": "lost" or "found",
  "itemName": "name/description of the item",
  "location": "where it was lost/found"
}
If any field is not found, set it to null. Return only the JSON object."#;

const ANNOUNCEMENT_EXTRACTION_PROMPT: &str = r#"Extract structured data from this announcement post. Return a JSON object with:
{
  "department": "issuing department if mentioned",
  "deadline": "ISO date string if any deadline mentioned",
  "priority": "high", "medium", or "low" based on urgency indicators
}
If any field is not found, set it to null. Return only the JSON object."#;

pub const GENERATE_SYSTEM_PROMPT: &str = r#"You are a campus social media assistant. Generate engaging posts for a campus feed.
The posts should be:
- Appropriate for a campus community
- Engaging and likely to generate meaningful interactions
- Well-structured with proper formatting
- Include relevant hashtags when appropriate
- Authentic and student/faculty-friendly

Keep posts concise but impactful (100-250 words typically)."#;

// Token caps and temperatures per operation
pub const CLASSIFY_MAX_TOKENS: u32 = 10;
pub const CLASSIFY_TEMPERATURE: f32 = 0.1;
pub const EXTRACT_MAX_TOKENS: u32 = 200;
pub const EXTRACT_TEMPERATURE: f32 = 0.1;
pub const GENERATE_MAX_TOKENS: u32 = 300;
pub const GENERATE_TEMPERATURE: f32 = 0.7;

pub fn extraction_prompt(post_type: PostType) -> &'static str {
    match post_type {
        PostType::Event => EVENT_EXTRACTION_PROMPT,
        PostType::LostFound => LOST_FOUND_EXTRACTION_PROMPT,
        PostType::Announcement => ANNOUNCEMENT_EXTRACTION_PROMPT,
    }
}

pub fn generation_user_prompt(prompt: &str) -> String {
    format!("Generate a campus post about: {}", prompt.trim())
}

/// Placeholder post used when no provider can generate one.
pub fn fallback_post(prompt: &str) -> String {
    format!(
        "{}\n\nWhat do you think? Share your thoughts below! #CampusLife",
        prompt.trim()
    )
}

/// Parse a model's extraction answer, tolerating markdown code fences.
pub fn parse_entities(raw: &str, post_type: PostType) -> Result<ExtractedEntities, ProviderError> {
    let body = openai_client::strip_code_blocks(raw);
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::Parse(format!("entities are not JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ProviderError::Parse("entities are not a JSON object".into()));
    }

    ExtractedEntities::from_json(post_type, value, Coercion::Lenient)
        .map_err(|e| ProviderError::Parse(e.to_string()))
}

/// Trim a generated post; an empty answer is an error so the next tier runs.
pub fn parse_generated(raw: &str) -> Result<String, ProviderError> {
    let text = raw.trim();
    if text.is_empty() {
        Err(ProviderError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}
