//! # Taskboard Core
//!
//! Ordering rules for a personal task board: named boards, each holding an
//! ordered list of text cards, rearranged by drag-and-drop.
//!
//! Rank is position in a sequence and nothing else. Every change produces a
//! whole new [`Store`] snapshot, which [`BoardStore`] validates and commits
//! in one step. Pointer handling and rendering live outside this crate.

pub mod domain;
pub mod engine;
pub mod error;
pub mod storage;

// Re-export commonly used types
pub use domain::{
    board::{BoardConfig, BoardTitle},
    card::{Card, CardId},
    drag::{ContainerKey, DragLocation, DragResult, DraggedKind},
    store::Store,
};
pub use engine::{add_card, apply_drag_result};
pub use error::{BoardError, Result};
pub use storage::{BoardStore, Commit, SnapshotObserver};
