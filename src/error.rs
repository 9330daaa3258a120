use thiserror::Error;

pub type DebugResult<T> = Result<T, DebugError>;

#[derive(Error, Debug)]
pub enum DebugError {
    #[error("Please open a workspace")]
    NoWorkspace,
    #[error("Unknown test framework '{0}'")]
    UnknownTestFramework(String),
    #[error("debug session failed to start: {0}")]
    StartRejected(String),
    #[error("debug service stopped before the session terminated")]
    SessionLost,
    #[error("dap protocol error: {0}")]
    Protocol(String),
    #[error("settings: {0}")]
    Settings(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
