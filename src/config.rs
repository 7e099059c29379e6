use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Tuning constants of a session. Built in code; there is no config file.
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Input timeout of one tick at speed factor 1.0.
    pub base_tick: Duration,
    pub countdown_frames: u32,
    pub countdown_frame: Duration,
    /// Smallest playable terminal, border included.
    pub min_rows: u16,
    pub min_cols: u16,
    pub points_per_food: u32,
    /// The speed factor grows by `speed_step` each time the score reaches a
    /// multiple of `speed_threshold`.
    pub speed_threshold: u32,
    pub speed_step: f64,
    /// Random draws tried before food placement falls back to enumerating
    /// the free cells.
    pub food_attempts: u32,
    /// Poll interval while waiting for the terminal to grow.
    pub resize_retry: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            base_tick: Duration::from_millis(100),
            countdown_frames: 3,
            countdown_frame: Duration::from_secs(1),
            min_rows: 10,
            min_cols: 30,
            points_per_food: 10,
            speed_threshold: 50,
            speed_step: 0.2,
            food_attempts: 1_000,
            resize_retry: Duration::from_millis(250),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_tick.is_zero() {
            return Err(ConfigError::Validation("base_tick must be > 0".into()));
        }
        // Border plus a 1x1 playable interior.
        if self.min_rows < 5 || self.min_cols < 5 {
            return Err(ConfigError::Validation(
                "minimum terminal size must be at least 5x5".into(),
            ));
        }
        if self.points_per_food == 0 {
            return Err(ConfigError::Validation("points_per_food must be > 0".into()));
        }
        if self.speed_threshold == 0 {
            return Err(ConfigError::Validation("speed_threshold must be > 0".into()));
        }
        if self.speed_step.is_nan() || self.speed_step < 0.0 {
            return Err(ConfigError::Validation("speed_step must be >= 0".into()));
        }
        if self.food_attempts == 0 {
            return Err(ConfigError::Validation("food_attempts must be > 0".into()));
        }
        Ok(())
    }

    pub fn too_small_notice(&self) -> String {
        format!(
            "Terminal too small. Please resize to at least {}x{}.",
            self.min_cols, self.min_rows
        )
    }
}

pub const LOG_FILTER_VAR: &str = "SNAKE_LOG";
pub const LOG_FILE_VAR: &str = "SNAKE_LOG_FILE";

/// Where and how much to log. Logging is off unless a file is named, since
/// stderr shares the terminal with the game screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig { filter: "info".to_string(), file: None }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var(LOG_FILTER_VAR).ok(),
            std::env::var_os(LOG_FILE_VAR).map(PathBuf::from),
        )
    }

    fn from_vars(filter: Option<String>, file: Option<PathBuf>) -> Self {
        let default = Self::default();
        LogConfig {
            filter: filter.filter(|f| !f.trim().is_empty()).unwrap_or(default.filter),
            file: file.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}
