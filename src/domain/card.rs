use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Unique identifier for a card (e.g., CARD1, CARD2, CARD100)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardId(String);

impl CardId {
    pub const DEFAULT_PREFIX: &'static str = "CARD";

    /// Creates a new CardId from a counter using the default prefix
    pub fn new(counter: u64) -> Self {
        Self::with_prefix(Self::DEFAULT_PREFIX, counter)
    }

    /// Creates a new CardId from a counter and an explicit prefix
    pub fn with_prefix(prefix: &str, counter: u64) -> Self {
        Self(format!("{}{}", prefix.to_uppercase(), counter))
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether ids built from `prefix` parse back through `FromStr`
    pub fn is_valid_prefix(prefix: &str) -> bool {
        !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic())
    }
}

impl FromStr for CardId {
    type Err = crate::error::BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        // Alphabetic prefix followed by a decimal counter
        let split = normalized
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(normalized.len());
        let (prefix, counter) = normalized.split_at(split);

        if Self::is_valid_prefix(prefix) && counter.parse::<u64>().is_ok() {
            Ok(Self(normalized))
        } else {
            Err(crate::error::BoardError::InvalidCardId(s.to_string()))
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single text item on a board
///
/// A card carries no position of its own: its rank is its index in the
/// owning board's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card with the given ID and text
    pub fn new(id: CardId, text: String) -> Self {
        Self {
            id,
            text,
            created_at: Utc::now(),
        }
    }

    /// Returns a copy of this card with replaced text, keeping id and creation time
    pub fn with_text(&self, text: String) -> Self {
        Self {
            id: self.id.clone(),
            text,
            created_at: self.created_at,
        }
    }
}

/// Normalizes user-entered card text, rejecting blank input
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
