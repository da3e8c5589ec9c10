#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("invalid path expression `{0}`")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, FallbackError>;
