use std::sync::Arc;

use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

use crate::{
    book::{BookDraft, BookRecord},
    core::store::{CatalogSnapshotV1, CatalogStore, CategoryRename, StoreError},
    persist::{self, CATALOG_KEY, KvStore, PersistError},
    types::BookId,
    view::{
        filter::FilterState,
        projector::{Projection, project},
    },
};

use super::events::{EMPTY_TITLE_MESSAGE, ShelfEvent};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("shelf runtime is not running")]
    ChannelClosed,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_queue_bound: usize,
    pub event_queue_bound: usize,
    pub storage_key: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_queue_bound: 1024,
            storage_key: CATALOG_KEY.to_string(),
        }
    }
}

pub struct ShelfHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<ShelfEvent>,
}

impl Clone for ShelfHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

type SharedKv = Arc<Mutex<Box<dyn KvStore>>>;

enum Command {
    AddOrReplace {
        draft: BookDraft,
        target: Option<BookId>,
        resp: oneshot::Sender<Result<BookId, RuntimeError>>,
    },
    Remove {
        id: BookId,
        resp: oneshot::Sender<Result<BookRecord, RuntimeError>>,
    },
    CreateCategory {
        name: String,
        resp: oneshot::Sender<Result<Option<String>, RuntimeError>>,
    },
    RenameCategory {
        old: String,
        new: String,
        resp: oneshot::Sender<Result<Option<CategoryRename>, RuntimeError>>,
    },
    Get {
        id: BookId,
        resp: oneshot::Sender<Option<BookRecord>>,
    },
    IdAt {
        index: usize,
        resp: oneshot::Sender<Option<BookId>>,
    },
    Categories {
        resp: oneshot::Sender<Vec<String>>,
    },
    Project {
        filter: FilterState,
        resp: oneshot::Sender<Projection>,
    },
    Snapshot {
        resp: oneshot::Sender<CatalogSnapshotV1>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

/// Loads the catalog from `storage` (seeding it when empty) and starts the
/// runtime on top of it.
pub async fn open_shelf(
    storage: Box<dyn KvStore>,
    config: RuntimeConfig,
) -> Result<ShelfHandle, RuntimeError> {
    let key = config.storage_key.clone();
    let (store, storage) = tokio::task::spawn_blocking(move || {
        let mut storage = storage;
        let store = persist::load_catalog(storage.as_mut(), &key);
        (store, storage)
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))?;

    Ok(spawn_shelf(store, Some(storage), config))
}

/// Starts the command loop. Commands run one at a time; every mutation is
/// saved to `storage` before the next command is read.
pub fn spawn_shelf(
    store: CatalogStore,
    storage: Option<Box<dyn KvStore>>,
    config: RuntimeConfig,
) -> ShelfHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound);
    let (events_tx, _) = broadcast::channel::<ShelfEvent>(config.event_queue_bound);

    let storage: Option<SharedKv> = storage.map(|kv| Arc::new(Mutex::new(kv)));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut store = store;

        while let Some(cmd) = cmd_rx.recv().await {
            let done = handle_command(
                cmd,
                &mut store,
                &events_tx_loop,
                storage.as_ref(),
                &config,
            )
            .await;

            if done {
                break;
            }
        }
    });

    ShelfHandle { cmd_tx, events_tx }
}

impl ShelfHandle {
    pub fn subscribe(&self) -> broadcast::Receiver<ShelfEvent> {
        self.events_tx.subscribe()
    }

    /// Adds a new book (`target == None`) or overwrites book `target`.
    pub async fn add_or_replace(
        &self,
        draft: BookDraft,
        target: Option<BookId>,
    ) -> Result<BookId, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::AddOrReplace {
            draft,
            target,
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn add(&self, draft: BookDraft) -> Result<BookId, RuntimeError> {
        self.add_or_replace(draft, None).await
    }

    pub async fn replace(&self, id: BookId, draft: BookDraft) -> Result<BookId, RuntimeError> {
        self.add_or_replace(draft, Some(id)).await
    }

    pub async fn remove(&self, id: BookId) -> Result<BookRecord, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Remove { id, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// `Ok(None)` when the name was blank or already registered.
    pub async fn create_category(
        &self,
        name: impl Into<String>,
    ) -> Result<Option<String>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::CreateCategory {
            name: name.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// `Ok(None)` when the rename was refused.
    pub async fn rename_category(
        &self,
        old: impl Into<String>,
        new: impl Into<String>,
    ) -> Result<Option<CategoryRename>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::RenameCategory {
            old: old.into(),
            new: new.into(),
            resp: tx,
        })
        .await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    pub async fn get(&self, id: BookId) -> Result<Option<BookRecord>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Get { id, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn id_at(&self, index: usize) -> Result<Option<BookId>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::IdAt { index, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn categories(&self) -> Result<Vec<String>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Categories { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn project(&self, filter: FilterState) -> Result<Projection, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Project { filter, resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn snapshot(&self) -> Result<CatalogSnapshotV1, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown { resp: tx }).await?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    async fn send(&self, cmd: Command) -> Result<(), RuntimeError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| RuntimeError::ChannelClosed)
    }
}

async fn handle_command(
    cmd: Command,
    store: &mut CatalogStore,
    events_tx: &broadcast::Sender<ShelfEvent>,
    storage: Option<&SharedKv>,
    config: &RuntimeConfig,
) -> bool {
    match cmd {
        Command::AddOrReplace {
            draft,
            target,
            resp,
        } => {
            tracing::debug!(?target, title = %draft.title, "add_or_replace");
            let categories_before = store.categories().len();
            let res = match store.add_or_replace(draft, target) {
                Ok(id) => {
                    if store.categories().len() > categories_before {
                        if let Some(name) = store.categories().names().last() {
                            let _ = events_tx.send(ShelfEvent::CategoryCreated { name: name.clone() });
                        }
                    }
                    let evt = match target {
                        None => ShelfEvent::BookAdded { id },
                        Some(_) => ShelfEvent::BookUpdated { id },
                    };
                    let _ = events_tx.send(evt);
                    save(store, storage, events_tx, config).await.map(|_| id)
                }
                Err(err) => {
                    if err == StoreError::EmptyTitle {
                        let _ = events_tx.send(ShelfEvent::ValidationFailed {
                            message: EMPTY_TITLE_MESSAGE.to_string(),
                        });
                    }
                    Err(RuntimeError::from(err))
                }
            };
            let _ = resp.send(res);
        }
        Command::Remove { id, resp } => {
            tracing::debug!(id, "remove");
            let res = match store.remove(id) {
                Ok(rec) => {
                    let _ = events_tx.send(ShelfEvent::BookRemoved { id });
                    save(store, storage, events_tx, config).await.map(|_| rec)
                }
                Err(err) => Err(RuntimeError::from(err)),
            };
            let _ = resp.send(res);
        }
        Command::CreateCategory { name, resp } => {
            tracing::debug!(%name, "create_category");
            let res = match store.create_category(&name) {
                Some(name) => {
                    let _ = events_tx.send(ShelfEvent::CategoryCreated { name: name.clone() });
                    save(store, storage, events_tx, config).await.map(|_| Some(name))
                }
                None => Ok(None),
            };
            let _ = resp.send(res);
        }
        Command::RenameCategory { old, new, resp } => {
            tracing::debug!(%old, %new, "rename_category");
            let res = match store.rename_category(&old, &new) {
                Some(rename) => {
                    let _ = events_tx.send(ShelfEvent::CategoryRenamed {
                        from: rename.from.clone(),
                        to: rename.to.clone(),
                        books_moved: rename.books_moved,
                    });
                    save(store, storage, events_tx, config).await.map(|_| Some(rename))
                }
                None => Ok(None),
            };
            let _ = resp.send(res);
        }
        Command::Get { id, resp } => {
            let _ = resp.send(store.get_cloned(id));
        }
        Command::IdAt { index, resp } => {
            let _ = resp.send(store.id_at(index));
        }
        Command::Categories { resp } => {
            let _ = resp.send(store.categories().names().to_vec());
        }
        Command::Project { filter, resp } => {
            let _ = resp.send(project(store, &filter));
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(store.export_snapshot());
        }
        Command::Shutdown { resp } => {
            let _ = resp.send(Ok(()));
            return true;
        }
    }

    false
}

/// Full-replace write of the catalog. A failure leaves the in-memory state
/// as mutated and is returned to the caller.
async fn save(
    store: &CatalogStore,
    storage: Option<&SharedKv>,
    events_tx: &broadcast::Sender<ShelfEvent>,
    config: &RuntimeConfig,
) -> Result<(), RuntimeError> {
    let Some(kv) = storage else {
        return Ok(());
    };

    let payload = persist::encode_catalog(store)?;
    let key = config.storage_key.clone();
    let kv_ref = Arc::clone(kv);
    let res = tokio::task::spawn_blocking(move || {
        let mut kv = kv_ref.blocking_lock();
        kv.set(&key, &payload)
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))
    .and_then(|inner| inner);

    match res {
        Ok(()) => {
            let _ = events_tx.send(ShelfEvent::Saved);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "catalog save failed");
            Err(RuntimeError::from(err))
        }
    }
}
