use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch {context}: {reason}")]
    Fetch { context: String, reason: String },

    #[error("{service} returned status {status} for {context}")]
    Api {
        service: &'static str,
        context: String,
        status: u16,
    },

    #[error("dedup query failed for {context}: {reason}")]
    Query { context: String, reason: String },

    #[error("failed to write record for {context}: {reason}")]
    Write { context: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
