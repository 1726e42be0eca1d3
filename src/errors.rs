use std::io;

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid history file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("docker {command} failed: {stderr}")]
    Docker { command: String, stderr: String },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LauncherError>;
