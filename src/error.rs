use std::path::PathBuf;

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SnakeError {
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised when validating the game configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Errors that can occur while installing the file logger.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to install logger: {0}")]
    Install(#[from] log::SetLoggerError),
}
