//! Keyword rules used when no AI provider answers.
//!
//! Pure functions: no I/O, never fail.

use lazy_static::lazy_static;
use regex::Regex;

use crate::domains::posts::models::{
    AnnouncementEntities, EventEntities, ExtractedEntities, ItemStatus, LostFoundEntities,
    PostType, Priority,
};

lazy_static! {
    // Classification vocabularies. Plain substring matches, lost/found wins ties.
    static ref LOST_FOUND_WORDS: Regex = Regex::new(
        r"(?i)(lost|found|missing|wallet|id card|keys|phone|bag)"
    ).unwrap();

    static ref EVENT_WORDS: Regex = Regex::new(
        r"(?i)(event|workshop|party|meet|seminar|webinar|conference|rsvp|tomorrow|today|\b\d{1,2}(:\d{2})?\s?(am|pm)\b)"
    ).unwrap();

    // Shared date token: ISO, M/D/Y, or a relative day
    static ref DATE: Regex = Regex::new(
        r"(?i)\b(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|today|tomorrow)\b"
    ).unwrap();

    static ref EVENT_LOCATION: Regex = Regex::new(
        r"(?i)\bat\s+([A-Za-z0-9 &,-]+)"
    ).unwrap();

    static ref EVENT_IN_PLACE: Regex = Regex::new(
        r"(?i)\bin\s+([A-Za-z0-9 &,-]+)"
    ).unwrap();

    // A time word at the start of a location phrase or where it runs into one
    static ref WHEN_BREAK: Regex = Regex::new(
        r"(?i)(?:^|\s+)(today|tomorrow|tonight|on\s|from\s|\d{1,2}(:\d{2})?\s?(am|pm)\b|\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2})"
    ).unwrap();

    static ref FOUND_WORD: Regex = Regex::new(r"(?i)\bfound\b").unwrap();
    static ref LOST_WORD: Regex = Regex::new(r"(?i)\blost\b").unwrap();

    static ref LOST_ITEM: Regex = Regex::new(
        r"(?i)\blost\s+(?:my\s+)?([^,.]+)"
    ).unwrap();

    static ref FOUND_ITEM: Regex = Regex::new(
        r"(?i)\bfound\s+(?:(?:a|an|the|someone's|someones)\s+)?([^,.]+)"
    ).unwrap();

    // A place word at the start of an item phrase or where it runs into one
    static ref PLACE_BREAK: Regex = Regex::new(
        r"(?i)(?:^|\s+)(near|at|in|on|by|around|outside|inside)\s"
    ).unwrap();

    static ref NEAR_PLACE: Regex = Regex::new(r"(?i)\bnear\s+([^,.]+)").unwrap();
    static ref AT_PLACE: Regex = Regex::new(r"(?i)\bat\s+([^,.]+)").unwrap();

    static ref FROM_DEPARTMENT: Regex = Regex::new(
        r"(?i)from\s+the\s+([A-Za-z &]+?)\s+department"
    ).unwrap();

    static ref ANY_DEPARTMENT: Regex = Regex::new(
        r"(?i)\b((?:[A-Za-z&]+\s+)?[A-Za-z&]+)\s+department\b"
    ).unwrap();

    static ref DEADLINE: Regex = Regex::new(
        r"(?i)deadline[:\s]+(?:is\s+)?(?:on\s+)?(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{2,4}|tomorrow|today)"
    ).unwrap();

    static ref URGENT: Regex = Regex::new(r"(?i)(urgent|asap|immediately)").unwrap();
}

/// Classify content by vocabulary. Lost/found is checked before event.
pub fn classify(content: &str) -> PostType {
    let text = content.to_lowercase();

    if LOST_FOUND_WORDS.is_match(&text) {
        PostType::LostFound
    } else if EVENT_WORDS.is_match(&text) {
        PostType::Event
    } else {
        PostType::Announcement
    }
}

/// Best-effort field extraction for the given type.
pub fn extract(content: &str, post_type: PostType) -> ExtractedEntities {
    match post_type {
        PostType::Event => ExtractedEntities::Event(extract_event(content)),
        PostType::LostFound => ExtractedEntities::LostFound(extract_lost_found(content)),
        PostType::Announcement => ExtractedEntities::Announcement(extract_announcement(content)),
    }
}

fn extract_event(text: &str) -> EventEntities {
    EventEntities {
        date: DATE.find(text).map(|m| m.as_str().to_string()),
        location: event_location(text),
        title: None,
    }
}

/// The "at ..." phrase up to the first time word. When the phrase opens
/// with the time ("at 5pm in Room 204") the place is the "in ..." after it.
fn event_location(text: &str) -> Option<String> {
    let mut raw = capture(&EVENT_LOCATION, text)?;
    if WHEN_BREAK.find(&raw).is_some_and(|m| m.start() == 0) {
        raw = capture(&EVENT_IN_PLACE, &raw)?;
    }

    let cut = WHEN_BREAK.find(&raw).map(|m| m.start()).unwrap_or(raw.len());
    let location = raw[..cut]
        .trim_end_matches(|c: char| c == ',' || c == '-' || c == '&' || c.is_whitespace());

    (!location.is_empty()).then(|| location.to_string())
}

fn extract_lost_found(text: &str) -> LostFoundEntities {
    let item_status = if FOUND_WORD.is_match(text) {
        Some(ItemStatus::Found)
    } else if LOST_WORD.is_match(text) {
        Some(ItemStatus::Lost)
    } else {
        None
    };

    // The phrase matching the status names the item; the other is a fallback
    let (first, second) = match item_status {
        Some(ItemStatus::Found) => (&*FOUND_ITEM, &*LOST_ITEM),
        _ => (&*LOST_ITEM, &*FOUND_ITEM),
    };
    let item_name = item_phrase(first, text).or_else(|| item_phrase(second, text));

    let location = capture(&NEAR_PLACE, text).or_else(|| capture(&AT_PLACE, text));

    LostFoundEntities {
        item_status,
        item_name,
        location,
    }
}

/// Item named after "lost"/"found", cut before the place. A phrase that is
/// only a place ("lost near the gym") names no item.
fn item_phrase(re: &Regex, text: &str) -> Option<String> {
    let raw = capture(re, text)?;
    let cut = PLACE_BREAK.find(&raw).map(|m| m.start()).unwrap_or(raw.len());
    let name = raw[..cut].trim();

    (!name.is_empty()).then(|| name.to_string())
}

fn extract_announcement(text: &str) -> AnnouncementEntities {
    let department = capture(&FROM_DEPARTMENT, text)
        .or_else(|| capture(&ANY_DEPARTMENT, text))
        .map(|d| strip_article(&d).to_string())
        .filter(|d| !d.is_empty());

    let priority = if URGENT.is_match(text) {
        Priority::High
    } else {
        Priority::Medium
    };

    AnnouncementEntities {
        department,
        deadline: capture(&DEADLINE, text),
        priority: Some(priority),
    }
}

/// First capture group, trimmed; `None` when absent or blank.
fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn strip_article(s: &str) -> &str {
    match s.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("the ") => s[4..].trim(),
        _ => s.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_found_vocabulary() {
        assert_eq!(classify("Found a wallet in the gym"), PostType::LostFound);
        assert_eq!(classify("Anyone seen my KEYS?"), PostType::LostFound);
        assert_eq!(classify("My id card is missing"), PostType::LostFound);
    }

    #[test]
    fn test_event_vocabulary() {
        assert_eq!(classify("Workshop on React at Lab 3 tomorrow 5pm"), PostType::Event);
        assert_eq!(classify("Chess club meets at 7:30 pm"), PostType::Event);
        assert_eq!(classify("Join our webinar on careers"), PostType::Event);
    }

    #[test]
    fn test_lost_found_wins_over_event() {
        assert_eq!(classify("Lost my phone at the party today"), PostType::LostFound);
    }

    #[test]
    fn test_default_is_announcement() {
        assert_eq!(classify("Library hours are changing next week"), PostType::Announcement);
        assert_eq!(classify(""), PostType::Announcement);
    }

    #[test]
    fn test_lost_backpack_scenario() {
        let entities = extract("Lost my blue backpack near the library", PostType::LostFound);

        assert_eq!(
            entities,
            ExtractedEntities::LostFound(LostFoundEntities {
                item_status: Some(ItemStatus::Lost),
                item_name: Some("blue backpack".into()),
                location: Some("the library".into()),
            })
        );
    }

    #[test]
    fn test_found_item_skips_article() {
        match extract("Found a black umbrella at the cafeteria, DM me", PostType::LostFound) {
            ExtractedEntities::LostFound(e) => {
                assert_eq!(e.item_status, Some(ItemStatus::Found));
                assert_eq!(e.item_name.as_deref(), Some("black umbrella"));
                assert_eq!(e.location.as_deref(), Some("the cafeteria"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_event_location_and_date() {
        match extract("Workshop on React at Lab 3 tomorrow 5pm", PostType::Event) {
            ExtractedEntities::Event(e) => {
                assert_eq!(e.location.as_deref(), Some("Lab 3"));
                assert_eq!(e.date.as_deref(), Some("tomorrow"));
                assert_eq!(e.title, None);
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_event_iso_date() {
        match extract("Career fair on 2025-04-12 at Main Hall", PostType::Event) {
            ExtractedEntities::Event(e) => {
                assert_eq!(e.date.as_deref(), Some("2025-04-12"));
                assert_eq!(e.location.as_deref(), Some("Main Hall"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_found_item_ignores_later_lost_phrase() {
        match extract("Found someone's phone, it was lost near the gym", PostType::LostFound) {
            ExtractedEntities::LostFound(e) => {
                assert_eq!(e.item_status, Some(ItemStatus::Found));
                assert_eq!(e.item_name.as_deref(), Some("phone"));
                assert_eq!(e.location.as_deref(), Some("the gym"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_place_only_phrase_is_not_an_item() {
        match extract("Found near the bus stop, someone lost their keys", PostType::LostFound) {
            ExtractedEntities::LostFound(e) => {
                assert_eq!(e.item_status, Some(ItemStatus::Found));
                assert_eq!(e.item_name.as_deref(), Some("their keys"));
                assert_eq!(e.location.as_deref(), Some("the bus stop"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }

        match extract("Something lost near the gym", PostType::LostFound) {
            ExtractedEntities::LostFound(e) => {
                assert_eq!(e.item_status, Some(ItemStatus::Lost));
                assert_eq!(e.item_name, None);
                assert_eq!(e.location.as_deref(), Some("the gym"));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_event_time_right_after_at() {
        match extract("Meet at 5pm in Room 204", PostType::Event) {
            ExtractedEntities::Event(e) => assert_eq!(e.location.as_deref(), Some("Room 204")),
            other => panic!("unexpected variant: {:?}", other),
        }

        match extract("Chess club meets at 7:30 pm", PostType::Event) {
            ExtractedEntities::Event(e) => assert_eq!(e.location, None),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_announcement_fields() {
        let text = "Urgent notice from the Computer Science department: \
                    project deadline on 2025-05-01.";
        match extract(text, PostType::Announcement) {
            ExtractedEntities::Announcement(e) => {
                assert_eq!(e.department.as_deref(), Some("Computer Science"));
                assert_eq!(e.deadline.as_deref(), Some("2025-05-01"));
                assert_eq!(e.priority, Some(Priority::High));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_announcement_department_without_from() {
        match extract("The Physics department has new office hours", PostType::Announcement) {
            ExtractedEntities::Announcement(e) => {
                assert_eq!(e.department.as_deref(), Some("Physics"));
                assert_eq!(e.deadline, None);
                assert_eq!(e.priority, Some(Priority::Medium));
            }
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn test_nothing_recognised_yields_nulls() {
        assert_eq!(
            extract("hello", PostType::Event),
            ExtractedEntities::Event(EventEntities::default())
        );
    }
}
