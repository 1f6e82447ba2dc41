//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SignlangError, SignlangResult};

/// Confidence a top candidate must reach before it is accepted as a symbol.
pub const DEFAULT_ACCEPT_THRESHOLD: f32 = 0.9;

/// Longest accepted reference image interval (one day).
pub const MAX_IMAGE_ROTATION_SECS: u64 = 86_400;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Gesture recognizer settings.
    pub recognizer: RecognizerConfig,

    /// Stream loop settings.
    pub stream: StreamConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Gesture recognizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Path to the gesture recognizer model asset.
    pub model_asset_path: PathBuf,

    /// Maximum number of hands tracked per frame.
    pub num_hands: u32,

    /// Minimum top-candidate confidence for a symbol to be accepted.
    pub accept_threshold: f32,
}

/// Stream loop parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Display refresh rate driving the loop (Hz).
    pub refresh_hz: u32,

    /// Consecutive classification failures tolerated before the loop stops.
    pub max_consecutive_failures: u32,

    /// Interval between reference image changes while running (seconds).
    pub image_rotation_secs: u64,

    /// Optional JSON file with the reference image catalogue.
    pub catalogue_path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "signlang=debug,warn").
    pub level: String,

    /// Level for per-frame stream loop events.
    pub frame_level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recognizer: RecognizerConfig::default(),
            stream: StreamConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            model_asset_path: PathBuf::from("models/sign_language_recognizer_25-04-2023.task"),
            num_hands: 2,
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            max_consecutive_failures: 10,
            image_rotation_secs: 5,
            catalogue_path: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            frame_level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> SignlangResult<Self> {
        if !path.exists() {
            return Err(SignlangError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    /// Reject values the stream engine cannot run with.
    pub fn validate(&self) -> SignlangResult<()> {
        let threshold = self.recognizer.accept_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SignlangError::config(format!(
                "accept_threshold must be within [0, 1], got {threshold}"
            )));
        }
        if self.recognizer.num_hands == 0 {
            return Err(SignlangError::config("num_hands must be at least 1"));
        }
        if self.stream.refresh_hz == 0 {
            return Err(SignlangError::config("refresh_hz must be at least 1"));
        }
        if self.stream.max_consecutive_failures == 0 {
            return Err(SignlangError::config(
                "max_consecutive_failures must be at least 1",
            ));
        }
        if self.stream.image_rotation_secs > MAX_IMAGE_ROTATION_SECS {
            return Err(SignlangError::config(format!(
                "image_rotation_secs must be at most {MAX_IMAGE_ROTATION_SECS}, got {}",
                self.stream.image_rotation_secs
            )));
        }
        crate::logging::build_filter(&self.logging)
            .map_err(|e| SignlangError::config(format!("invalid log level: {e}")))?;
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("signlang").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_recognizer_contract() {
        let config = AppConfig::default();
        assert_eq!(config.recognizer.num_hands, 2);
        assert!((config.recognizer.accept_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.stream.image_rotation_secs, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "stream": { "refresh_hz": 30 } }"#).unwrap();
        assert_eq!(config.stream.refresh_hz, 30);
        assert_eq!(config.stream.max_consecutive_failures, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let mut config = AppConfig::default();
        config.recognizer.accept_threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(SignlangError::Config { .. })
        ));
    }

    #[test]
    fn huge_rotation_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.stream.image_rotation_secs = u64::MAX;
        assert!(matches!(
            config.validate(),
            Err(SignlangError::Config { .. })
        ));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = AppConfig::default();
        config.logging.level = "signlang=shouty".to_string();
        assert!(matches!(
            config.validate(),
            Err(SignlangError::Config { .. })
        ));
    }

    #[test]
    fn load_from_missing_path_reports_file_not_found() {
        let path = std::env::temp_dir().join("signlang_missing_config.json");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(SignlangError::FileNotFound { .. })
        ));
    }

    #[test]
    fn load_from_reads_written_file() {
        let dir = std::env::temp_dir().join("signlang_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.stream.max_consecutive_failures = 3;
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
