use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read payload file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse payload JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Row {0} is not an application row")]
    NotSelectable(usize),
}

pub type Result<T> = std::result::Result<T, Error>;
