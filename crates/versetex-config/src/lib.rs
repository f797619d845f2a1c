//! Configuration management for versetex.
//!
//! Parses `versetex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Bare `$VAR` is not expanded.
//!
//! Expanded fields:
//! - `api.url`
//! - `api.key`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override passage API endpoint.
    pub api_url: Option<String>,
    /// Override passage API key.
    pub api_key: Option<String>,
    /// Override HTTP timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override default output template.
    pub template: Option<String>,
    /// Override default wrapping directive.
    pub wrapper: Option<String>,
    /// Override quote conversion style.
    pub quotes: Option<QuoteSetting>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "versetex.toml";

/// Default passage query endpoint.
pub const DEFAULT_API_URL: &str = "http://www.esvapi.org/v2/rest/passageQuery";

/// Default API key (the service's anonymous per-IP key).
pub const DEFAULT_API_KEY: &str = "IP";

pub use versetex_core::preprocessor::{DEFAULT_TEMPLATE, DEFAULT_WRAPPER};

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Passage API configuration.
    pub api: ApiConfig,
    /// Default formatting configuration.
    pub format: FormatSettings,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Passage API configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Passage query endpoint.
    pub url: String,
    /// API key sent as the `key` query parameter.
    pub key: String,
    /// HTTP timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_API_URL.to_owned(),
            key: DEFAULT_API_KEY.to_owned(),
            timeout_secs: 30,
        }
    }
}

/// Default formatting applied until a `\setbible` macro changes it.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    /// Output template with `%(passage)s`, `%(citation)s` and
    /// `%(wrapped_citation)s` placeholders.
    pub template: String,
    /// Wrapping directive applied around each paragraph.
    pub wrapper: String,
    /// Quote conversion style.
    pub quotes: QuoteSetting,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_owned(),
            wrapper: DEFAULT_WRAPPER.to_owned(),
            quotes: QuoteSetting::default(),
        }
    }
}

/// Quote conversion style as written in the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteSetting {
    /// Unicode curly quotes.
    #[default]
    Unicode,
    /// LaTeX backtick/apostrophe ligatures.
    Latex,
}

impl QuoteSetting {
    /// Parse a quote style name.
    ///
    /// Returns None if the name is not a known style.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unicode" => Some(Self::Unicode),
            "latex" => Some(Self::Latex),
            _ => None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`api.key`").
        field: String,
        /// Error message (e.g., "${`ESV_KEY`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `versetex.toml` in current directory and parents,
    /// falling back to built-in defaults.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The merged result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the merged configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.api_url {
            self.api.url.clone_from(url);
        }
        if let Some(key) = &settings.api_key {
            self.api.key.clone_from(key);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.api.timeout_secs = timeout_secs;
        }
        if let Some(template) = &settings.template {
            self.format.template.clone_from(template);
        }
        if let Some(wrapper) = &settings.wrapper {
            self.format.wrapper.clone_from(wrapper);
        }
        if let Some(quotes) = settings.quotes {
            self.format.quotes = quotes;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::discover_from(&current)
    }

    /// Search for config file starting at `start` and walking up.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Template syntax is checked by the preprocessor, which owns the
    /// template grammar.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.api.url, "api.url")?;
        require_http_url(&self.api.url, "api.url")?;
        require_non_empty(&self.api.key, "api.key")?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be greater than 0".to_owned(),
            ));
        }

        require_non_empty(&self.format.template, "format.template")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.api.url = expand::expand_env(&self.api.url, "api.url")?;
        self.api.key = expand::expand_env(&self.api.key, "api.key")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.key, "IP");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.format.template, "%(passage)s -- %(wrapped_citation)s (ESV)");
        assert_eq!(config.format.wrapper, "\\textit");
        assert_eq!(config.format.quotes, QuoteSetting::Unicode);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_default_format_matches_preprocessor_defaults() {
        let format = FormatSettings::default();
        let config = versetex_core::FormatConfig::new(&format.template, format.wrapper).unwrap();
        assert_eq!(config, versetex_core::FormatConfig::default());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.format.wrapper, "\\textit");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[api]
url = "https://api.example.com/passage"
key = "secret"
timeout_secs = 5

[format]
template = "%(citation)s: %(passage)s"
wrapper = '\textbf'
quotes = "latex"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.api.url, "https://api.example.com/passage");
        assert_eq!(config.api.key, "secret");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.format.template, "%(citation)s: %(passage)s");
        assert_eq!(config.format.wrapper, "\\textbf");
        assert_eq!(config.format.quotes, QuoteSetting::Latex);
    }

    #[test]
    fn test_parse_unknown_quote_style_fails() {
        let toml = r#"
[format]
quotes = "guillemets"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_quote_setting_parse() {
        assert_eq!(QuoteSetting::parse("unicode"), Some(QuoteSetting::Unicode));
        assert_eq!(QuoteSetting::parse("latex"), Some(QuoteSetting::Latex));
        assert_eq!(QuoteSetting::parse("LaTeX"), None);
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default();
        config.api.url = "ftp://example.com".to_owned();

        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("api.url"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.timeout_secs"));
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let mut config = Config::default();
        config.api.key = String::new();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.key cannot be empty"));
    }

    #[test]
    fn test_validate_allows_empty_wrapper() {
        let mut config = Config::default();
        config.format.wrapper = String::new();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings_api() {
        let mut config = Config::default();
        let overrides = CliSettings {
            api_url: Some("https://esv.example.com".to_owned()),
            timeout_secs: Some(60),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.api.url, "https://esv.example.com");
        assert_eq!(config.api.timeout_secs, 60);
        assert_eq!(config.api.key, "IP"); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_format() {
        let mut config = Config::default();
        let overrides = CliSettings {
            wrapper: Some("\\emph".to_owned()),
            quotes: Some(QuoteSetting::Latex),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.format.wrapper, "\\emph");
        assert_eq!(config.format.quotes, QuoteSetting::Latex);
        assert_eq!(config.format.template, DEFAULT_TEMPLATE); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/versetex.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_explicit_file_with_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[api]\nkey = \"${VERSETEX_TEST_SURELY_UNSET:-fallback}\"\n\n[format]\nwrapper = \"\\\\emph\"\n",
        )
        .unwrap();

        let overrides = CliSettings {
            wrapper: Some("\\textbf".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();

        assert_eq!(config.api.key, "fallback");
        assert_eq!(config.format.wrapper, "\\textbf");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_validates_after_cli_override() {
        let overrides = CliSettings {
            api_url: Some("not-a-url".to_owned()),
            ..Default::default()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let result = Config::load(Some(&path), Some(&overrides));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_discover_from_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("chapters").join("intro");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }
}
