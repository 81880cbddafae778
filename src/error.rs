use thiserror::Error;

/// Recoverable join failures. The `Display` text is what the client
/// receives in `{"error": ...}`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinError {
    #[error("Not a string")]
    NotAString,

    #[error("not valid json")]
    NotValidJson,

    #[error("room or name is missing")]
    MissingRoomOrName,

    #[error("room with name {0} was not found")]
    RoomNotFound(String),

    #[error("the name {0} is taken")]
    NameTaken(String),

    #[error("unknown error")]
    Unknown,
}

/// Errors that end a session or the server.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] axum::Error),

    #[error("peer connection is gone")]
    PeerGone,

    #[error("socket closed before client state was received")]
    ClosedBeforeJoin,

    #[error("message is null")]
    NullMessage,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RelayError>;
