#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache format error: {0}")]
    Serde(#[from] serde_json::Error),
}
