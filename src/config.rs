use crate::cli::Cli;
use crate::error::{PhiloError, Result};
use crate::error_ext::ResultExt;
use crate::export::{ExportFormat, ExportOptions, UnsupportedCharPolicy};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const GLOBAL_CONFIG_FILE: &str = ".philo/config.toml";

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TEMPERATURE: f32 = 0.85;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// API key wrapper that keeps the secret out of debug output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Central configuration for Philo.
///
/// Precedence: command-line flags, then the config file, then defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhiloConfig {
    pub api_key: Option<ApiKey>,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub tag: Option<String>,
    pub format: ExportFormat,
    pub unsupported_chars: UnsupportedCharPolicy,
}

impl Default for PhiloConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            tag: None,
            format: ExportFormat::default(),
            unsupported_chars: UnsupportedCharPolicy::default(),
        }
    }
}

impl PhiloConfig {
    /// Resolves the full configuration for a run.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => match Self::global_path() {
                Some(path) if path.exists() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    fn global_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(GLOBAL_CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: PhiloConfig = toml::from_str(&content).map_err(|e| {
            PhiloError::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(key) = &cli.api_key {
            self.api_key = Some(ApiKey::new(key.clone()));
        }
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(temperature) = cli.temperature {
            self.temperature = temperature;
        }
        if let Some(timeout) = cli.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if cli.tag.is_some() {
            self.tag = cli.tag.clone();
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.substitute_unsupported {
            self.unsupported_chars = UnsupportedCharPolicy::Substitute;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PhiloError::Config(format!(
                "temperature must be between 0 and 2, got {}",
                self.temperature
            )));
        }
        if self.timeout_secs == 0 {
            return Err(PhiloError::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(PhiloError::Config("model must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn api_key(&self) -> Result<&ApiKey> {
        self.api_key.as_ref().context(
            "OPENAI_API_KEY not found. Please set it as an environment variable, use --api-key, or add api_key to ~/.philo/config.toml",
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            unsupported_chars: self.unsupported_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = PhiloConfig::default();
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.temperature, 0.85);
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.format, ExportFormat::Markdown);
        assert_eq!(config.unsupported_chars, UnsupportedCharPolicy::Reject);
        assert!(config.api_key().is_err());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "model = \"gpt-4o\"\nformat = \"pdf\"\nunsupported_chars = \"substitute\"\napi_key = \"sk-file\"\n",
        )
        .unwrap();

        let config = PhiloConfig::load(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.format, ExportFormat::Pdf);
        assert_eq!(config.unsupported_chars, UnsupportedCharPolicy::Substitute);
        assert_eq!(config.api_key().unwrap().expose(), "sk-file");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "modle = \"gpt-4o\"\n").unwrap();

        let err = PhiloConfig::load(&path).unwrap_err();
        assert!(matches!(err, PhiloError::Config(_)));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = PhiloConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PhiloError::Context { .. }));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = \"gpt-4o\"\ntemperature = 0.2\ntag = \"ethics\"\n").unwrap();

        let cli = Cli {
            config: Some(path),
            model: Some("gpt-4.1".to_string()),
            api_key: Some("sk-cli".to_string()),
            substitute_unsupported: true,
            ..Cli::default()
        };

        let config = PhiloConfig::resolve(&cli).unwrap();
        assert_eq!(config.model, "gpt-4.1");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.tag.as_deref(), Some("ethics"));
        assert_eq!(config.api_key().unwrap().expose(), "sk-cli");
        assert_eq!(config.unsupported_chars, UnsupportedCharPolicy::Substitute);
    }

    #[test]
    fn test_validation() {
        let mut config = PhiloConfig::default();
        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = PhiloConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = PhiloConfig {
            api_key: Some(ApiKey::new("sk-secret")),
            ..PhiloConfig::default()
        };
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }
}
