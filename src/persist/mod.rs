pub mod memory;
pub mod sqlite;

use serde::{Deserialize, Serialize};

use crate::{
    book::BookRecord,
    category::CategoryRegistry,
    core::store::{CatalogSnapshotV1, CatalogStore, StoreError},
    types::{BookId, MAX_RATING, Status, UNCATEGORIZED},
};

/// Storage key holding the whole catalog.
///
/// The value written is a versioned JSON envelope, not the bare array of
/// books older versions wrote. Bare arrays are still read, but a reader that
/// only understands the array form cannot read what this crate writes.
pub const CATALOG_KEY: &str = "bookTrackerData";
/// Version number for serialized [`CatalogEnvelope`] payloads.
pub const CATALOG_FORMAT_VERSION: u16 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("json: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("unsupported catalog format version {0}")]
    UnsupportedFormat(u16),
    #[error("{0}")]
    Message(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable string key-value store scoped to the application.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
    fn remove(&mut self, _key: &str) -> PersistResult<()> {
        Ok(())
    }
}

/// Versioned wrapper for stable on-disk payload decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogEnvelope {
    format_version: u16,
    snapshot: CatalogSnapshotV1,
}

/// Book shape written before records carried ids. Every field but the title
/// may be missing.
#[derive(Debug, Deserialize)]
struct LegacyBook {
    title: String,
    #[serde(default)]
    status: Status,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    chapter: String,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

impl LegacyBook {
    fn into_record(self, id: BookId) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            status: self.status,
            kind: self.kind,
            chapter: self.chapter,
            rating: self.rating.unwrap_or(0).min(MAX_RATING),
            cover: self.cover.unwrap_or_default(),
            category: self
                .category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        }
    }
}

pub fn encode_catalog(store: &CatalogStore) -> PersistResult<String> {
    let env = CatalogEnvelope {
        format_version: CATALOG_FORMAT_VERSION,
        snapshot: store.export_snapshot(),
    };
    Ok(serde_json::to_string(&env)?)
}

pub fn decode_catalog(payload: &str) -> PersistResult<CatalogStore> {
    if let Ok(env) = serde_json::from_str::<CatalogEnvelope>(payload) {
        if env.format_version != CATALOG_FORMAT_VERSION {
            return Err(PersistError::UnsupportedFormat(env.format_version));
        }
        return Ok(CatalogStore::from_snapshot(env.snapshot)?);
    }

    // Backward-compatible path for a bare array of books without ids.
    let legacy: Vec<LegacyBook> = serde_json::from_str(payload)?;
    let books: Vec<BookRecord> = legacy
        .into_iter()
        .zip(1..)
        .map(|(book, id)| book.into_record(id))
        .collect();
    let categories = CategoryRegistry::derive_from_books(&books);
    let next_book_id = books.len() as BookId + 1;

    Ok(CatalogStore::from_snapshot(CatalogSnapshotV1 {
        next_book_id,
        books,
        categories,
    })?)
}

/// Writes the full catalog under `key`, replacing what was there.
pub fn save_catalog(kv: &mut dyn KvStore, key: &str, store: &CatalogStore) -> PersistResult<()> {
    let payload = encode_catalog(store)?;
    kv.set(key, &payload)
}

/// Reads the catalog stored under `key`.
///
/// Missing, unreadable or malformed data falls back to the seed catalog,
/// which is written back immediately. Never fails.
pub fn load_catalog(kv: &mut dyn KvStore, key: &str) -> CatalogStore {
    let stored = match kv.get(key) {
        Ok(stored) => stored,
        Err(err) => {
            tracing::warn!(key, error = %err, "catalog read failed; using seed catalog");
            None
        }
    };

    if let Some(payload) = stored {
        match decode_catalog(&payload) {
            Ok(store) => {
                tracing::debug!(key, books = store.len(), "catalog loaded");
                return store;
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "stored catalog is malformed; using seed catalog");
            }
        }
    }

    let store = CatalogStore::seeded();
    tracing::info!(key, "seeding catalog with sample books");
    if let Err(err) = save_catalog(kv, key, &store) {
        tracing::error!(key, error = %err, "failed to persist seed catalog");
    }
    store
}
