use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("unsupported file type {extension:?}, expected one of .csv, .xlsx, .xls")]
    UnsupportedFileType { extension: String },

    #[error("file {path} is {size_mb:.1} MB, limit is {limit_mb} MB")]
    FileTooLarge {
        path: PathBuf,
        size_mb: f64,
        limit_mb: u64,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("api error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request {0:?} was cancelled")]
    Cancelled(String),

    #[error("task {task_id} failed: {reason}")]
    TaskFailed { task_id: String, reason: String },

    #[error("task {task_id} stalled: no progress for {seconds}s")]
    Stalled { task_id: String, seconds: u64 },

    #[error("invalid session transition: {0}")]
    InvalidTransition(&'static str),
}
