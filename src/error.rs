use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolvemarkError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Solver returned HTTP {0}")]
    Status(u16),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Upload rejected: {0}")]
    Upload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
