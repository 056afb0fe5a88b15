use crate::{book::BookRecord, types::{BookId, DEFAULT_CHAPTER}};

/// Characters of the title shown on a cover placeholder.
pub const PLACEHOLDER_TITLE_CHARS: usize = 15;

/// What the grid renders for one book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookCard {
    pub id: BookId,
    pub title: String,
    /// Cover reference, or `None` when a placeholder is drawn instead.
    pub cover: Option<String>,
    /// Truncated title drawn on the placeholder.
    pub placeholder: Option<String>,
    pub chapter_label: String,
    /// Star badge, shown only for rated books.
    pub rating_badge: Option<u8>,
}

impl BookCard {
    pub fn from_record(rec: &BookRecord) -> Self {
        let (cover, placeholder) = if rec.has_cover() {
            (Some(rec.cover.clone()), None)
        } else {
            let short: String = rec.title.chars().take(PLACEHOLDER_TITLE_CHARS).collect();
            (None, Some(short))
        };
        let chapter = if rec.chapter.is_empty() {
            DEFAULT_CHAPTER
        } else {
            rec.chapter.as_str()
        };

        Self {
            id: rec.id,
            title: rec.title.clone(),
            cover,
            placeholder,
            chapter_label: format!("Ch. {chapter}"),
            rating_badge: (rec.rating > 0).then_some(rec.rating),
        }
    }
}
