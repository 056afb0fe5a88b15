use crate::{
    book::BookRecord,
    core::store::CatalogStore,
    types::ALL_CATEGORY,
};

use super::filter::{FilterState, SortMode};

/// Ordered books to display plus the displayed count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Projection {
    pub books: Vec<BookRecord>,
    pub count: usize,
}

/// Runs the fixed pipeline: category filter, title search, then the sort
/// control (rating sort or status filter).
pub fn project(store: &CatalogStore, filter: &FilterState) -> Projection {
    let books = project_refs(store.books(), filter)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    Projection {
        count: books.len(),
        books,
    }
}

/// Borrowing form of [`project`] over any ordered sequence of books.
pub fn project_refs<'a>(
    books: impl IntoIterator<Item = &'a BookRecord>,
    filter: &FilterState,
) -> Vec<&'a BookRecord> {
    let needle = filter.search.to_lowercase();

    let mut out: Vec<&BookRecord> = books
        .into_iter()
        .filter(|b| filter.category == ALL_CATEGORY || b.category == filter.category)
        .filter(|b| needle.is_empty() || b.title.to_lowercase().contains(&needle))
        .collect();

    match &filter.sort {
        SortMode::None => {}
        // `sort_by` is stable, ties keep catalog order.
        SortMode::Rating => out.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortMode::Status(status) => out.retain(|b| &b.status == status),
    }

    out
}
