use thiserror::Error;

#[derive(Debug, Error)]
pub enum QLearnError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot deserialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
    #[error("Unsupported snapshot version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error("Invalid action id in snapshot: {0}")]
    InvalidAction(u8),
}

pub type Result<T> = std::result::Result<T, QLearnError>;
