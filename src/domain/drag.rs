//! Drag-end events as reported by the drag-capture layer.
//!
//! The wire shape mirrors what the pointer layer emits:
//!
//! ```json
//! {
//!   "draggedKind": "CARD",
//!   "source": { "containerKey": "To Do", "index": 0 },
//!   "destination": { "containerKey": "Done", "index": 2 }
//! }
//! ```
//!
//! `destination` is `null` when the gesture was cancelled or dropped
//! outside every drop zone. Board drags use [`BOARD_ORDER_KEY`] as their
//! container key.

use crate::domain::board::BoardTitle;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drop zone id of the board-order sequence
pub const BOARD_ORDER_KEY: &str = "@boards";

/// What kind of entity a gesture dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DraggedKind {
    Board,
    Card,
}

/// Which ordered sequence a drag index refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContainerKey {
    /// The board display order
    BoardOrder,
    /// The card sequence of one board
    Board(BoardTitle),
}

impl ContainerKey {
    pub fn board(title: impl AsRef<str>) -> Result<Self> {
        Ok(Self::Board(BoardTitle::new(title)?))
    }
}

impl TryFrom<String> for ContainerKey {
    type Error = BoardError;

    fn try_from(key: String) -> Result<Self> {
        if key == BOARD_ORDER_KEY {
            Ok(Self::BoardOrder)
        } else {
            Self::board(&key)
        }
    }
}

impl From<ContainerKey> for String {
    fn from(key: ContainerKey) -> Self {
        match key {
            ContainerKey::BoardOrder => BOARD_ORDER_KEY.to_string(),
            ContainerKey::Board(title) => title.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContainerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardOrder => write!(f, "{}", BOARD_ORDER_KEY),
            Self::Board(title) => write!(f, "{}", title),
        }
    }
}

/// A rank inside a named container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragLocation {
    pub container_key: ContainerKey,
    pub index: usize,
}

impl DragLocation {
    pub fn new(container_key: ContainerKey, index: usize) -> Self {
        Self {
            container_key,
            index,
        }
    }
}

/// A completed drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragResult {
    pub dragged_kind: DraggedKind,
    pub source: DragLocation,
    #[serde(default)]
    pub destination: Option<DragLocation>,
}

impl DragResult {
    /// Board drag from one rank of the board order to another
    pub fn board(from: usize, to: usize) -> Self {
        Self {
            dragged_kind: DraggedKind::Board,
            source: DragLocation::new(ContainerKey::BoardOrder, from),
            destination: Some(DragLocation::new(ContainerKey::BoardOrder, to)),
        }
    }

    /// Card drag between (or within) board card sequences
    pub fn card(
        from_board: BoardTitle,
        from: usize,
        to_board: BoardTitle,
        to: usize,
    ) -> Self {
        Self {
            dragged_kind: DraggedKind::Card,
            source: DragLocation::new(ContainerKey::Board(from_board), from),
            destination: Some(DragLocation::new(ContainerKey::Board(to_board), to)),
        }
    }

    /// Same event with the destination dropped, as for a cancelled gesture
    pub fn cancelled(mut self) -> Self {
        self.destination = None;
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
