//! Shared primitive IDs, sentinels, and the reading status enum.

use std::{
    fmt,
    hash::{Hash, Hasher},
};

use serde::{Deserialize, Serialize};

/// Stable book identifier, assigned monotonically at creation.
pub type BookId = u64;

/// Sentinel category that means "no category filter".
pub const ALL_CATEGORY: &str = "All";
/// Category assigned to books saved with a blank category.
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Chapter marker assigned to books saved with a blank chapter.
pub const DEFAULT_CHAPTER: &str = "1";
/// Highest accepted rating. Zero means unrated.
pub const MAX_RATING: u8 = 5;

/// Reading status of a book.
///
/// The UI offers a fixed list, but stored data may carry any string, which
/// is kept verbatim in [`Status::Other`]. Equality goes by label, so
/// `Other("Completed")` equals `Completed`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    /// Currently reading.
    #[default]
    Reading,
    /// Finished.
    Completed,
    /// Paused.
    OnHold,
    /// Abandoned.
    Dropped,
    /// Not started yet.
    PlanToRead,
    /// Any status outside the fixed list.
    Other(String),
}

impl Status {
    /// Statuses offered by the UI, in display order.
    pub const KNOWN: [Status; 5] = [
        Status::Reading,
        Status::Completed,
        Status::OnHold,
        Status::Dropped,
        Status::PlanToRead,
    ];

    /// Display and storage label.
    pub fn as_str(&self) -> &str {
        match self {
            Status::Reading => "Reading",
            Status::Completed => "Completed",
            Status::OnHold => "On Hold",
            Status::Dropped => "Dropped",
            Status::PlanToRead => "Plan to Read",
            Status::Other(s) => s,
        }
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "Reading" => Status::Reading,
            "Completed" => Status::Completed,
            "On Hold" => Status::OnHold,
            "Dropped" => Status::Dropped,
            "Plan to Read" => Status::PlanToRead,
            other => Status::Other(other.to_string()),
        }
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::from(value.as_str())
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Status {
    /// Known variant for a known label, otherwise unchanged.
    pub fn canonical(self) -> Self {
        match self {
            Status::Other(label) => Status::from(label),
            known => known,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_parse_back_to_variants() {
        for status in Status::KNOWN {
            assert_eq!(Status::from(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_labels_are_kept_verbatim() {
        let status = Status::from("Re-reading");
        assert_eq!(status, Status::Other("Re-reading".to_string()));
        assert_eq!(String::from(status), "Re-reading");
    }

    #[test]
    fn other_with_known_label_equals_known_variant() {
        let other = Status::Other("Completed".to_string());
        assert_eq!(other, Status::Completed);
        assert_ne!(other, Status::Other("completed".to_string()));
        assert!(matches!(other.canonical(), Status::Completed));
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&Status::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let back: Status = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(back, Status::Completed);
    }
}
