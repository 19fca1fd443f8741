#[derive(Debug, thiserror::Error)]
pub enum ExplorerError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("explorer API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("upstream call exceeded {secs}s")]
    Timeout { secs: u64 },
}
