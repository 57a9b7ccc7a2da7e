use crate::{
    domain::{BoardConfig, CardId, DragResult, Store},
    engine,
    error::Result,
};
use std::sync::Arc;

/// Receives every committed snapshot, e.g. to re-render the board
pub trait SnapshotObserver {
    fn on_commit(&mut self, revision: u64, snapshot: &Arc<Store>);
}

impl<F> SnapshotObserver for F
where
    F: FnMut(u64, &Arc<Store>),
{
    fn on_commit(&mut self, revision: u64, snapshot: &Arc<Store>) {
        self(revision, snapshot)
    }
}

/// Outcome of handling one gesture or form submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// A new snapshot replaced the old one
    Committed { revision: u64 },
    /// The transition produced content equal to the current snapshot
    Unchanged,
}

/// Holder of the single authoritative board snapshot
///
/// All state changes go through [`BoardStore::replace`], which validates the
/// candidate and swaps the whole snapshot at once. Readers hold an
/// `Arc<Store>` and never see a partial update.
pub struct BoardStore {
    current: Arc<Store>,
    revision: u64,
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl BoardStore {
    /// Creates the store with the configured initial boards
    pub fn new(config: &BoardConfig) -> Result<Self> {
        Self::from_store(Store::new(config)?)
    }

    /// Wraps an existing snapshot after checking its invariants
    pub fn from_store(store: Store) -> Result<Self> {
        store.validate()?;
        Ok(Self {
            current: Arc::new(store),
            revision: 0,
            observers: Vec::new(),
        })
    }

    /// Current snapshot; comparing two with `Arc::ptr_eq` detects change
    pub fn snapshot(&self) -> Arc<Store> {
        Arc::clone(&self.current)
    }

    /// Number of commits since creation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&mut self, observer: impl SnapshotObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Validates and commits a whole new snapshot
    pub fn replace(&mut self, next: Store) -> Result<u64> {
        next.validate()?;
        self.current = Arc::new(next);
        self.revision += 1;

        for observer in &mut self.observers {
            observer.on_commit(self.revision, &self.current);
        }
        Ok(self.revision)
    }

    /// Runs a transition against the current snapshot and commits the result
    ///
    /// On error the current snapshot is kept and the error is logged and
    /// returned. A result equal to the current snapshot is not committed.
    pub fn apply<F>(&mut self, operation: &str, transition: F) -> Result<Commit>
    where
        F: FnOnce(&Store) -> Result<Store>,
    {
        let next = match transition(self.current.as_ref()) {
            Ok(next) => next,
            Err(error) => {
                tracing::warn!(operation, %error, "transition rejected, store unchanged");
                return Err(error);
            }
        };

        if next == *self.current {
            return Ok(Commit::Unchanged);
        }

        let revision = self.replace(next).map_err(|error| {
            tracing::warn!(operation, %error, "snapshot failed validation, store unchanged");
            error
        })?;
        tracing::debug!(operation, revision, "snapshot committed");
        Ok(Commit::Committed { revision })
    }

    /// Handles one drag-end report from the pointer layer
    pub fn handle_drag_end(&mut self, event: &DragResult) -> Result<Commit> {
        self.apply("drag_end", |store| engine::apply_drag_result(store, event))
    }

    /// Handles a drag-end report in its JSON wire form
    pub fn handle_drag_end_json(&mut self, json: &str) -> Result<Commit> {
        let event = DragResult::from_json(json).map_err(|error| {
            tracing::warn!(%error, "unreadable drag event");
            error
        })?;
        self.handle_drag_end(&event)
    }

    /// Handles a card form submit for one board
    pub fn handle_add_card(&mut self, board: &str, text: &str) -> Result<Commit> {
        self.apply("add_card", |store| engine::add_card(store, board, text))
    }

    pub fn handle_remove_card(&mut self, id: &CardId) -> Result<Commit> {
        self.apply("remove_card", |store| engine::remove_card(store, id))
    }

    pub fn handle_edit_card(&mut self, id: &CardId, text: &str) -> Result<Commit> {
        self.apply("edit_card", |store| engine::edit_card_text(store, id, text))
    }

    pub fn handle_add_board(&mut self, title: &str) -> Result<Commit> {
        self.apply("add_board", |store| engine::add_board(store, title))
    }

    pub fn handle_remove_board(&mut self, title: &str) -> Result<Commit> {
        self.apply("remove_board", |store| engine::remove_board(store, title))
    }

    pub fn handle_rename_board(&mut self, from: &str, to: &str) -> Result<Commit> {
        self.apply("rename_board", |store| engine::rename_board(store, from, to))
    }
}

impl Default for BoardStore {
    fn default() -> Self {
        Self {
            current: Arc::new(Store::default()),
            revision: 0,
            observers: Vec::new(),
        }
    }
}
