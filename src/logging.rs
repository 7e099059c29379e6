use std::fs::OpenOptions;

use crate::config::LogConfig;
use crate::error::LogError;

/// Installs `env_logger` writing to the configured file. Without a file no
/// logger is installed and every `log` macro is a no-op.
pub fn init(config: &LogConfig) -> Result<bool, LogError> {
    let path = match &config.file {
        Some(path) => path,
        None => return Ok(false),
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogError::Open { path: path.clone(), source })?;

    env_logger::Builder::new()
        .parse_filters(&config.filter)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    log::info!("logging to {}", path.display());
    Ok(true)
}
