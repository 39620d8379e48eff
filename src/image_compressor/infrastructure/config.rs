use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::error::InfrastructureError;
use crate::domain::quality::DEFAULT_QUALITY_PERCENT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quiescence window for slider movements.
    pub debounce_ms: u64,
    pub default_quality: u8,
    pub output_dir: PathBuf,
    /// Run compression on the blocking pool rather than the event task.
    pub background_worker: bool,
    /// `EnvFilter` directives, e.g. `"info"` or `"image_compressor=debug"`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            default_quality: DEFAULT_QUALITY_PERCENT,
            output_dir: PathBuf::from("."),
            background_worker: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self, InfrastructureError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, InfrastructureError> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Filter built from `log_level`; directives that don't parse fall back to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.debounce_window(), Duration::from_millis(100));
        assert_eq!(config.default_quality, 80);
        assert!(config.background_worker);
        assert_eq!(config.env_filter().max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = AppConfig::from_json(r#"{ "debounce_ms": 250, "log_level": "debug" }"#).unwrap();
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.default_quality, 80);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.env_filter().max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AppConfig::from_json("{ not json"),
            Err(InfrastructureError::ConfigError(_))
        ));
    }

    #[test]
    fn test_invalid_log_directive_defaults_to_info() {
        let config = AppConfig::from_json(r#"{ "log_level": "image_compressor=loud" }"#).unwrap();
        assert_eq!(config.env_filter().max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_per_target_directive() {
        let config = AppConfig::from_json(r#"{ "log_level": "warn,image_compressor=trace" }"#).unwrap();
        assert_eq!(config.env_filter().max_level_hint(), Some(LevelFilter::TRACE));
    }
}
