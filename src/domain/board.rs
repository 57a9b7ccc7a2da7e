use crate::domain::card::CardId;
use crate::domain::drag::BOARD_ORDER_KEY;
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, collections::HashSet, fmt};

/// Human-chosen board title, which doubles as the board's unique key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardTitle(String);

impl BoardTitle {
    /// Creates a title from user input, trimming surrounding whitespace
    ///
    /// Blank titles and the board-order drop zone id are rejected, since
    /// neither could be addressed by a drag event.
    pub fn new(title: impl AsRef<str>) -> Result<Self> {
        let trimmed = title.as_ref().trim();
        if trimmed.is_empty() || trimmed == BOARD_ORDER_KEY {
            return Err(BoardError::InvalidBoardTitle(title.as_ref().to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BoardTitle {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Initial board layout created at process start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    pub boards: Vec<String>,
    #[serde(default = "default_card_prefix")]
    pub card_id_prefix: String,
}

fn default_card_prefix() -> String {
    CardId::DEFAULT_PREFIX.to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            boards: vec![
                "To Do".to_string(),
                "Doing".to_string(),
                "Done".to_string(),
            ],
            card_id_prefix: default_card_prefix(),
        }
    }
}

impl BoardConfig {
    pub fn new(boards: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            boards: boards.into_iter().map(Into::into).collect(),
            card_id_prefix: default_card_prefix(),
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.titles()?;
        Ok(config)
    }

    /// Returns the configured titles in display order
    ///
    /// Fails on blank or duplicate titles, or a prefix that would not
    /// round-trip through `CardId` parsing.
    pub fn titles(&self) -> Result<Vec<BoardTitle>> {
        if !CardId::is_valid_prefix(&self.card_id_prefix) {
            return Err(BoardError::ConfigError(format!(
                "card id prefix must be ASCII letters, got '{}'",
                self.card_id_prefix
            )));
        }

        let mut seen = HashSet::new();
        let mut titles = Vec::with_capacity(self.boards.len());
        for raw in &self.boards {
            let title = BoardTitle::new(raw)
                .map_err(|e| BoardError::ConfigError(e.to_string()))?;
            if !seen.insert(title.clone()) {
                return Err(BoardError::ConfigError(format!(
                    "duplicate board title '{}'",
                    title
                )));
            }
            titles.push(title);
        }
        Ok(titles)
    }
}
