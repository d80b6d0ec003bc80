use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a valid link")]
    InvalidInput,

    #[error("Nothing selected to download")]
    NothingSelected,

    #[error("A download session is already running")]
    SessionActive,

    #[error("Playlist lookup failed: {0}")]
    Playlist(String),

    #[error("Required tool not found: {0}")]
    ToolMissing(String),
}
