use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Single error type shared by every layer of the workspace.
#[derive(Debug, Error)]
pub enum Error {
    #[error("user not found")]
    UserNotFound,
    #[error("username already taken")]
    UsernameTaken,
    #[error("username must be 3-16 alphanumeric characters")]
    InvalidUsername,
    #[error("photo not found")]
    PhotoNotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("comment must be 1-128 bytes")]
    InvalidContent,
    #[error("relation may not point back at its own subject")]
    SelfReference,
    #[error("already exists")]
    AlreadyExists,
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("image bytes do not match any supported format")]
    Decode,
    #[error("invalid credential")]
    InvalidCredential,
    #[error("viewer is banned by the content owner")]
    Blocked,
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("blob storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("database lock poisoned")]
    LockPoisoned,
}
