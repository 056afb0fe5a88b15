use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    book::{BookDraft, BookRecord},
    category::CategoryRegistry,
    types::{BookId, Status},
};

/// Failures of catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The title was blank after trimming.
    #[error("book title must not be empty")]
    EmptyTitle,
    /// The rating exceeded the five-star scale.
    #[error("rating {0} is out of range 0..=5")]
    RatingOutOfRange(u8),
    /// No book with this id exists.
    #[error("no book with id {0}")]
    MissingBook(BookId),
    /// A snapshot carried the same id twice.
    #[error("book id {0} already exists")]
    AlreadyExists(BookId),
}

/// Serializable image of a [`CatalogStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshotV1 {
    pub next_book_id: BookId,
    pub books: Vec<BookRecord>,
    pub categories: CategoryRegistry,
}

/// Result of a category rename that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRename {
    pub from: String,
    pub to: String,
    pub books_moved: usize,
}

#[derive(Debug)]
pub struct CatalogStore {
    records: HashMap<BookId, BookRecord>,
    order: Vec<BookId>,
    categories: CategoryRegistry,
    next_book_id: BookId,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            categories: CategoryRegistry::new(),
            next_book_id: 1,
        }
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Two sample books in two sample categories, used when nothing is stored.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.categories.ensure("p.mo");
        store.categories.ensure("martial-arts");

        let seed = [
            BookDraft {
                title: "Berserk".to_string(),
                status: Status::Completed,
                kind: "Manga".to_string(),
                chapter: "347".to_string(),
                rating: 5,
                cover: String::new(),
                category: "martial-arts".to_string(),
            },
            BookDraft {
                title: "Steel-Eating Player".to_string(),
                status: Status::Reading,
                kind: "Manhwa".to_string(),
                chapter: "68".to_string(),
                rating: 4,
                cover: String::new(),
                category: "p.mo".to_string(),
            },
        ];
        // Prepending, so the last draft ends up first.
        for draft in seed {
            let id = store.take_next_book_id();
            store.insert_front(draft.into_record(id));
        }
        store
    }

    pub fn from_snapshot(snapshot: CatalogSnapshotV1) -> Result<Self, StoreError> {
        let mut store = Self {
            categories: snapshot.categories,
            next_book_id: snapshot.next_book_id.max(1),
            ..Self::default()
        };

        for rec in snapshot.books {
            if store.records.contains_key(&rec.id) {
                return Err(StoreError::AlreadyExists(rec.id));
            }
            store.next_book_id = store.next_book_id.max(rec.id.saturating_add(1));
            store.categories.ensure(&rec.category);
            store.order.push(rec.id);
            store.records.insert(rec.id, rec);
        }

        Ok(store)
    }

    pub fn export_snapshot(&self) -> CatalogSnapshotV1 {
        CatalogSnapshotV1 {
            next_book_id: self.next_book_id,
            books: self.books().cloned().collect(),
            categories: self.categories.clone(),
        }
    }

    /// Saves a book.
    ///
    /// With `target == None` the book is new and goes to the front; otherwise
    /// the record with that id is overwritten in place. A category not yet in
    /// the registry is appended to it.
    pub fn add_or_replace(
        &mut self,
        draft: BookDraft,
        target: Option<BookId>,
    ) -> Result<BookId, StoreError> {
        let draft = draft.normalize()?;

        let id = match target {
            None => {
                let id = self.take_next_book_id();
                self.insert_front(draft.into_record(id));
                id
            }
            Some(id) => {
                let rec = self.records.get_mut(&id).ok_or(StoreError::MissingBook(id))?;
                *rec = draft.into_record(id);
                id
            }
        };

        let category = self.records[&id].category.clone();
        self.ensure_category(&category);
        Ok(id)
    }

    pub fn remove(&mut self, id: BookId) -> Result<BookRecord, StoreError> {
        let rec = self.records.remove(&id).ok_or(StoreError::MissingBook(id))?;
        if let Some(pos) = self.position(id) {
            self.order.remove(pos);
        }
        Ok(rec)
    }

    /// Registers `name` if missing. Returns true when the registry grew.
    pub fn ensure_category(&mut self, name: &str) -> bool {
        self.categories.ensure(name)
    }

    /// Explicit category creation; `None` means the input was ignored.
    pub fn create_category(&mut self, name: &str) -> Option<String> {
        self.categories.create(name)
    }

    /// Renames a category and repoints every book that used it.
    pub fn rename_category(&mut self, old: &str, new: &str) -> Option<CategoryRename> {
        let to = self.categories.rename(old, new)?;

        let mut books_moved = 0;
        for rec in self.records.values_mut() {
            if rec.category == old {
                rec.category = to.clone();
                books_moved += 1;
            }
        }

        Some(CategoryRename {
            from: old.to_string(),
            to,
            books_moved,
        })
    }

    pub fn get(&self, id: BookId) -> Option<&BookRecord> {
        self.records.get(&id)
    }

    pub fn get_cloned(&self, id: BookId) -> Option<BookRecord> {
        self.get(id).cloned()
    }

    /// Books in catalog order, most recently added first.
    pub fn books(&self) -> impl Iterator<Item = &BookRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn books_cloned(&self) -> Vec<BookRecord> {
        self.books().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ordered_ids(&self) -> &[BookId] {
        &self.order
    }

    /// Id of the book currently shown at `index` in catalog order.
    pub fn id_at(&self, index: usize) -> Option<BookId> {
        self.order.get(index).copied()
    }

    pub fn position(&self, id: BookId) -> Option<usize> {
        self.order.iter().position(|x| *x == id)
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    fn insert_front(&mut self, rec: BookRecord) {
        self.order.insert(0, rec.id);
        self.records.insert(rec.id, rec);
    }

    fn take_next_book_id(&mut self) -> BookId {
        let id = self.next_book_id;
        self.next_book_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_has_two_books_and_three_categories() {
        let store = CatalogStore::seeded();
        let titles: Vec<_> = store.books().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Steel-Eating Player", "Berserk"]);
        assert_eq!(store.categories().names(), ["All", "p.mo", "martial-arts"]);
    }

    #[test]
    fn snapshot_with_duplicate_ids_is_rejected() {
        let mut snapshot = CatalogStore::seeded().export_snapshot();
        let dup = snapshot.books[0].clone();
        snapshot.books.push(dup);
        let err = CatalogStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn snapshot_repairs_missing_categories_and_id_counter() {
        let mut snapshot = CatalogStore::seeded().export_snapshot();
        snapshot.categories = CategoryRegistry::new();
        snapshot.next_book_id = 0;

        let store = CatalogStore::from_snapshot(snapshot).unwrap();
        assert!(store.categories().contains("p.mo"));
        assert!(store.categories().contains("martial-arts"));

        let mut store = store;
        let id = store.add_or_replace(BookDraft::titled("Vagabond"), None).unwrap();
        assert_eq!(id, 3);
    }
}
