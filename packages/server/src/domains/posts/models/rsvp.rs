use serde::{Deserialize, Serialize};

/// Which counter an RSVP increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpStatus {
    Going,
    Interested,
    NotGoing,
}

/// Wire vocabulary for RSVP statuses.
///
/// Both vocabularies map the middle answer onto the same `interested` counter;
/// they differ only in the word clients send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RsvpVocabulary {
    /// `going | interested | notGoing`
    #[default]
    Interested,
    /// `going | maybe | notGoing`
    Maybe,
}

impl RsvpVocabulary {
    /// Words accepted under this vocabulary, in counter order.
    pub fn words(&self) -> [&'static str; 3] {
        match self {
            RsvpVocabulary::Interested => ["going", "interested", "notGoing"],
            RsvpVocabulary::Maybe => ["going", "maybe", "notGoing"],
        }
    }

    /// Parse a client-supplied status. Words from the other vocabulary are rejected.
    pub fn parse_status(&self, raw: &str) -> Option<RsvpStatus> {
        let [going, middle, not_going] = self.words();
        match raw.trim() {
            s if s == going => Some(RsvpStatus::Going),
            s if s == middle => Some(RsvpStatus::Interested),
            s if s == not_going => Some(RsvpStatus::NotGoing),
            _ => None,
        }
    }
}

impl std::fmt::Display for RsvpVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RsvpVocabulary::Interested => write!(f, "interested"),
            RsvpVocabulary::Maybe => write!(f, "maybe"),
        }
    }
}

impl std::str::FromStr for RsvpVocabulary {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "interested" => Ok(RsvpVocabulary::Interested),
            "maybe" => Ok(RsvpVocabulary::Maybe),
            other => Err(anyhow::anyhow!("Invalid RSVP vocabulary: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpCounts {
    #[serde(default)]
    pub going: u32,
    #[serde(default)]
    pub interested: u32,
    #[serde(default)]
    pub not_going: u32,
}

impl RsvpCounts {
    /// Add one to exactly the counter for `status`.
    pub fn increment(&mut self, status: RsvpStatus) {
        let counter = match status {
            RsvpStatus::Going => &mut self.going,
            RsvpStatus::Interested => &mut self.interested,
            RsvpStatus::NotGoing => &mut self.not_going,
        };
        *counter = counter.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_touches_one_counter() {
        let mut counts = RsvpCounts {
            going: 2,
            interested: 0,
            not_going: 1,
        };
        counts.increment(RsvpStatus::Going);

        assert_eq!(
            counts,
            RsvpCounts {
                going: 3,
                interested: 0,
                not_going: 1
            }
        );
    }

    #[test]
    fn test_counts_serialize_camel_case() {
        let json = serde_json::to_value(RsvpCounts::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"going": 0, "interested": 0, "notGoing": 0})
        );
    }

    #[test]
    fn test_vocabularies_map_middle_word_to_interested() {
        assert_eq!(
            RsvpVocabulary::Interested.parse_status("interested"),
            Some(RsvpStatus::Interested)
        );
        assert_eq!(
            RsvpVocabulary::Maybe.parse_status("maybe"),
            Some(RsvpStatus::Interested)
        );
    }

    #[test]
    fn test_vocabularies_reject_each_others_word() {
        assert_eq!(RsvpVocabulary::Interested.parse_status("maybe"), None);
        assert_eq!(RsvpVocabulary::Maybe.parse_status("interested"), None);
        assert_eq!(RsvpVocabulary::Maybe.parse_status("notGoing"), Some(RsvpStatus::NotGoing));
        assert_eq!(RsvpVocabulary::Maybe.parse_status("nope"), None);
    }

    #[test]
    fn test_vocabulary_from_str() {
        assert_eq!("Maybe".parse::<RsvpVocabulary>().unwrap(), RsvpVocabulary::Maybe);
        assert!("sometimes".parse::<RsvpVocabulary>().is_err());
    }
}
