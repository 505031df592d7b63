//! Semantic bucket classification for action text.
//!
//! The keyword table is plain data: an ordered list of buckets with their
//! keywords. Classification lower-cases the action and returns the first
//! bucket with a matching keyword substring, falling back to `General`.
//! Extending the table never touches control flow.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseBucketError;

/// Coarse intent category of a predicted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticBucket {
    Wellness,
    Productivity,
    Communication,
    Entertainment,
    Social,
    General,
}

impl SemanticBucket {
    pub const ALL: [SemanticBucket; 6] = [
        SemanticBucket::Wellness,
        SemanticBucket::Productivity,
        SemanticBucket::Communication,
        SemanticBucket::Entertainment,
        SemanticBucket::Social,
        SemanticBucket::General,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SemanticBucket::Wellness => "wellness",
            SemanticBucket::Productivity => "productivity",
            SemanticBucket::Communication => "communication",
            SemanticBucket::Entertainment => "entertainment",
            SemanticBucket::Social => "social",
            SemanticBucket::General => "general",
        }
    }
}

impl fmt::Display for SemanticBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SemanticBucket {
    type Err = ParseBucketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        SemanticBucket::ALL
            .into_iter()
            .find(|b| b.name() == lower)
            .ok_or_else(|| ParseBucketError(s.to_string()))
    }
}

/// Keywords that place an action in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub bucket: SemanticBucket,
    pub keywords: Vec<String>,
}

impl BucketEntry {
    pub fn new(bucket: SemanticBucket, keywords: &[&str]) -> Self {
        Self {
            bucket,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered keyword table; earlier entries win.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketTable {
    entries: Vec<BucketEntry>,
}

impl Default for BucketTable {
    fn default() -> Self {
        Self::new(vec![
            BucketEntry::new(
                SemanticBucket::Wellness,
                &[
                    "meditat", "workout", "exercise", "yoga", "breath", "sleep", "health",
                    "hydrat", "water", "stretch", "walk", "jog", "run",
                ],
            ),
            BucketEntry::new(
                SemanticBucket::Productivity,
                &[
                    "work", "task", "calendar", "plan", "document", "meeting", "focus", "note",
                    "schedule", "review", "todo",
                ],
            ),
            BucketEntry::new(
                SemanticBucket::Communication,
                &["message", "call", "email", "chat", "reply", "text", "contact", "inbox"],
            ),
            BucketEntry::new(
                SemanticBucket::Entertainment,
                &[
                    "music", "video", "watch", "game", "movie", "podcast", "stream", "playlist",
                    "show",
                ],
            ),
            BucketEntry::new(
                SemanticBucket::Social,
                &["social", "friend", "post", "share", "photo", "feed", "family", "story"],
            ),
        ])
    }
}

impl BucketTable {
    pub fn new(entries: Vec<BucketEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BucketEntry] {
        &self.entries
    }

    /// Append keywords to existing buckets; unknown buckets get a new entry at the end.
    pub fn with_extra_keywords(mut self, extra: &BTreeMap<SemanticBucket, Vec<String>>) -> Self {
        for (bucket, keywords) in extra {
            let lowered = keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty());
            match self.entries.iter_mut().find(|e| e.bucket == *bucket) {
                Some(entry) => entry.keywords.extend(lowered),
                None => self.entries.push(BucketEntry {
                    bucket: *bucket,
                    keywords: lowered.collect(),
                }),
            }
        }
        self
    }

    /// Classify an action description.
    pub fn classify(&self, action: &str) -> SemanticBucket {
        let lowered = action.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.matches(&lowered))
            .map(|entry| entry.bucket)
            .unwrap_or(SemanticBucket::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_default_table() {
        let table = BucketTable::default();
        assert_eq!(table.classify("Start meditation"), SemanticBucket::Wellness);
        assert_eq!(table.classify("Check work messages"), SemanticBucket::Productivity);
        assert_eq!(table.classify("Reply to Sam"), SemanticBucket::Communication);
        assert_eq!(table.classify("Watch the new episode"), SemanticBucket::Entertainment);
        assert_eq!(table.classify("Share vacation photos"), SemanticBucket::Social);
        assert_eq!(table.classify("Order groceries"), SemanticBucket::General);
    }

    #[test]
    fn test_classify_ignores_case() {
        let table = BucketTable::default();
        assert_eq!(table.classify("YOGA CLASS"), SemanticBucket::Wellness);
    }

    #[test]
    fn test_extra_keywords_extend_without_reordering() {
        let mut extra = BTreeMap::new();
        extra.insert(SemanticBucket::Social, vec!["Grocer".to_string()]);
        let table = BucketTable::default().with_extra_keywords(&extra);
        assert_eq!(table.classify("Order groceries"), SemanticBucket::Social);
        assert_eq!(table.entries().len(), 5);
    }

    #[test]
    fn test_extra_keywords_for_missing_bucket_append_entry() {
        let mut extra = BTreeMap::new();
        extra.insert(SemanticBucket::General, vec!["misc".to_string()]);
        let table = BucketTable::default().with_extra_keywords(&extra);
        assert_eq!(table.entries().len(), 6);
        assert_eq!(table.entries()[5].bucket, SemanticBucket::General);
    }

    #[test]
    fn test_bucket_parse() {
        assert_eq!("Social".parse::<SemanticBucket>(), Ok(SemanticBucket::Social));
        assert!("gossip".parse::<SemanticBucket>().is_err());
    }
}
