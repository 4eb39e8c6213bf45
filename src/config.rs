//! Loader configuration with builder pattern

use std::path::Path;
use std::time::Duration;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use crate::batch::DEFAULT_SEPARATOR;
use crate::retry::RetryPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// WHATWG encoding label used when the script has no BOM
    pub encoding: String,
    /// Sniff and drop a UTF-8/UTF-16 byte-order mark
    pub strip_bom: bool,
    pub batch_separator: String,
    pub save_retry: RetryPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
            strip_bom: true,
            batch_separator: DEFAULT_SEPARATOR.to_string(),
            save_retry: RetryPolicy::default(),
        }
    }
}

impl LoaderConfig {
    pub fn builder() -> LoaderConfigBuilder {
        LoaderConfigBuilder::default()
    }

    /// Read a JSON config file; absent fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Resolve the `encoding` label
    pub fn encoding(&self) -> crate::Result<&'static Encoding> {
        Encoding::for_label(self.encoding.trim().as_bytes())
            .ok_or_else(|| crate::Error::Config(format!("unknown encoding label: {}", self.encoding)))
    }

    /// Same config with another batch separator, validated
    pub fn with_separator(mut self, separator: impl Into<String>) -> crate::Result<Self> {
        self.batch_separator = separator.into();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.encoding()?;
        if self.batch_separator.is_empty() {
            return Err(crate::Error::Config("batch_separator cannot be empty".into()));
        }
        if self.batch_separator.chars().any(char::is_whitespace) {
            return Err(crate::Error::Config("batch_separator cannot contain whitespace".into()));
        }
        self.save_retry.validate()
    }
}

#[derive(Default)]
pub struct LoaderConfigBuilder {
    config: LoaderConfig,
}

impl LoaderConfigBuilder {
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.config.encoding = label.into();
        self
    }

    pub fn strip_bom(mut self, enabled: bool) -> Self {
        self.config.strip_bom = enabled;
        self
    }

    pub fn batch_separator(mut self, separator: impl Into<String>) -> Self {
        self.config.batch_separator = separator.into();
        self
    }

    pub fn save_attempts(mut self, n: u32) -> Self {
        self.config.save_retry.max_attempts = n;
        self
    }

    pub fn save_interval(mut self, interval: Duration) -> Self {
        self.config.save_retry.interval = interval;
        self
    }

    pub fn build(self) -> LoaderConfig {
        self.config
    }

    pub fn build_validated(self) -> crate::Result<LoaderConfig> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_builder() {
        let config = LoaderConfig::builder()
            .encoding("windows-1252")
            .strip_bom(false)
            .batch_separator("END")
            .save_attempts(5)
            .save_interval(Duration::from_millis(10))
            .build();

        assert_eq!(config.encoding().unwrap(), encoding_rs::WINDOWS_1252);
        assert!(!config.strip_bom);
        assert_eq!(config.batch_separator, "END");
        assert_eq!(config.save_retry.max_attempts, 5);
        assert_eq!(config.save_retry.interval, Duration::from_millis(10));
    }

    #[test]
    fn test_config_validation() {
        assert!(LoaderConfig::default().validate().is_ok());
        assert!(LoaderConfig::builder().batch_separator("").build_validated().is_err());
        assert!(LoaderConfig::builder().batch_separator("G O").build_validated().is_err());
        assert!(LoaderConfig::builder().save_attempts(0).build_validated().is_err());
        assert!(LoaderConfig::builder().encoding("klingon").build_validated().is_err());
    }

    #[test]
    fn test_encoding_labels() {
        assert_eq!(LoaderConfig::default().encoding().unwrap(), encoding_rs::UTF_8);
        let config = LoaderConfig::builder().encoding(" UTF-16LE ").build();
        assert_eq!(config.encoding().unwrap(), encoding_rs::UTF_16LE);
        let config = LoaderConfig::builder().encoding("latin1").build();
        assert_eq!(config.encoding().unwrap(), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn test_separator_override_is_validated() {
        assert!(LoaderConfig::default().with_separator("").is_err());
        assert!(LoaderConfig::default().with_separator("  ").is_err());
        let config = LoaderConfig::default().with_separator("END").unwrap();
        assert_eq!(config.batch_separator, "END");
    }

    #[test]
    fn test_config_from_file_with_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batch_separator": "GO2", "save_retry": {{"max_attempts": 7}}}}"#).unwrap();

        let config = LoaderConfig::from_file(file.path()).unwrap();
        assert_eq!(config.encoding, "utf-8");
        assert!(config.strip_bom);
        assert_eq!(config.batch_separator, "GO2");
        assert_eq!(config.save_retry.max_attempts, 7);
        assert_eq!(config.save_retry.interval, Duration::from_millis(500));
    }

    #[test]
    fn test_config_from_file_rejects_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"batch_separator": ""}}"#).unwrap();
        assert!(matches!(LoaderConfig::from_file(file.path()), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_config_serialization() {
        let config = LoaderConfig::builder().batch_separator("END").build();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: LoaderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }
}
