use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported cache schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}
