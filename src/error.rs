use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Card text must not be empty")]
    InvalidInsertion,

    #[error("Malformed drag event: {reason}")]
    MalformedDragEvent { reason: String },

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Board already exists: {0}")]
    DuplicateBoard(String),

    #[error("Invalid board title: '{0}'")]
    InvalidBoardTitle(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid card ID format: {0}")]
    InvalidCardId(String),

    #[error("Store invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BoardError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDragEvent {
            reason: reason.into(),
        }
    }
}
