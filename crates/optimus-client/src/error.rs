use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid bridge URL: {0}")]
    InvalidUrl(String),

    #[error("Bridge request failed: {0}")]
    Http(String),

    #[error("Bridge returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Tool {tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid bridge response: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
