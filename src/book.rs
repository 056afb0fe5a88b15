//! Book domain record and the draft type used to create or replace one.

use serde::{Deserialize, Serialize};

use crate::{
    core::store::StoreError,
    types::{BookId, DEFAULT_CHAPTER, MAX_RATING, Status, UNCATEGORIZED},
};

/// Fully materialized, authoritative book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Stable book identifier.
    pub id: BookId,
    /// Non-empty title.
    pub title: String,
    /// Reading status.
    pub status: Status,
    /// Free-form kind, e.g. "Manga", "Manhwa", "Novel".
    #[serde(rename = "type")]
    pub kind: String,
    /// Free-form progress marker.
    pub chapter: String,
    /// Rating from 0 to 5; 0 means unrated.
    pub rating: u8,
    /// Opaque image reference; empty means no cover.
    pub cover: String,
    /// Category name.
    pub category: String,
}

impl BookRecord {
    /// True when the record carries a cover image reference.
    pub fn has_cover(&self) -> bool {
        !self.cover.is_empty()
    }
}

/// Form input used to create a new [`BookRecord`] or replace an existing one.
///
/// Fields are taken as entered; [`BookDraft::normalize`] applies the
/// save-time defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookDraft {
    /// Title as entered.
    pub title: String,
    /// Selected status.
    pub status: Status,
    /// Kind as entered.
    pub kind: String,
    /// Chapter as entered; blank becomes `"1"`.
    pub chapter: String,
    /// Selected rating.
    pub rating: u8,
    /// Cover reference produced by the image collaborator, or empty.
    pub cover: String,
    /// Category as entered; blank becomes `"Uncategorized"`.
    pub category: String,
}

impl BookDraft {
    /// Draft with only a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates the draft and applies save-time defaults.
    pub fn normalize(self) -> Result<BookDraft, StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        if self.rating > MAX_RATING {
            return Err(StoreError::RatingOutOfRange(self.rating));
        }

        let category = match self.category.trim() {
            "" => UNCATEGORIZED.to_string(),
            c => c.to_string(),
        };
        let chapter = if self.chapter.is_empty() {
            DEFAULT_CHAPTER.to_string()
        } else {
            self.chapter
        };

        Ok(BookDraft {
            title: title.to_string(),
            status: self.status.canonical(),
            kind: self.kind,
            chapter,
            rating: self.rating,
            cover: self.cover,
            category,
        })
    }

    /// Materializes a record under `id`. Expects a normalized draft.
    pub(crate) fn into_record(self, id: BookId) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            status: self.status,
            kind: self.kind,
            chapter: self.chapter,
            rating: self.rating,
            cover: self.cover,
            category: self.category,
        }
    }
}

impl From<&BookRecord> for BookDraft {
    fn from(rec: &BookRecord) -> Self {
        Self {
            title: rec.title.clone(),
            status: rec.status.clone(),
            kind: rec.kind.clone(),
            chapter: rec.chapter.clone(),
            rating: rec.rating,
            cover: rec.cover.clone(),
            category: rec.category.clone(),
        }
    }
}
