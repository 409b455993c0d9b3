//! Service configuration, read once at startup from a TOML file.

use super::error::InfrastructureError;
use crate::domain::encode_request::{
    DEFAULT_MIN_QUALITY, DEFAULT_QUALITY_STEP, DEFAULT_START_QUALITY, DEFAULT_TARGET_SIZE_BYTES,
};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_PATH_ENV: &str = "PIXEL_SHRINK_CONFIG";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub encode: EncodeDefaults,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct UploadConfig {
    pub max_content_length: usize,
    pub allowed_extensions: Vec<String>,
}

// フォームで省略された値に使うデフォルト
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncodeDefaults {
    pub target_size_kb: u64,
    pub quality: u8,
    pub min_quality: u8,
    pub quality_step: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3300,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_content_length: 50 * 1024 * 1024,
            allowed_extensions: ["webp", "png", "jpg", "jpeg"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl Default for EncodeDefaults {
    fn default() -> Self {
        Self {
            target_size_kb: DEFAULT_TARGET_SIZE_BYTES / 1024,
            quality: DEFAULT_START_QUALITY,
            min_quality: DEFAULT_MIN_QUALITY,
            quality_step: DEFAULT_QUALITY_STEP,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, InfrastructureError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads the file at `path`. A missing file yields `Ok(None)`; an
    /// unreadable or malformed one is an error.
    pub fn load(path: &Path) -> Result<Option<Self>, InfrastructureError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InfrastructureError::IoError(e)),
        }
    }

    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "pixel_shrink.toml".to_string())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3300");
        assert_eq!(config.upload.max_content_length, 52_428_800);
        assert_eq!(config.encode.target_size_kb, 250);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [server]
            port = 8080

            [encode]
            target_size_kb = 100
            quality_step = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.encode.target_size_kb, 100);
        assert_eq!(config.encode.quality, 95);
        assert_eq!(config.encode.quality_step, 3);
        assert_eq!(config.upload.allowed_extensions, vec!["webp", "png", "jpg", "jpeg"]);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = AppConfig::from_toml_str("[server]\nport = \"not a number\"");
        assert!(matches!(result, Err(InfrastructureError::ConfigError(_))));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let result = AppConfig::load(Path::new("/definitely/not/here/pixel_shrink.toml")).unwrap();
        assert!(result.is_none());
    }
}
