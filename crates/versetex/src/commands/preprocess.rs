//! Document preprocessing command.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Args;
use versetex_config::{CliSettings, Config, QuoteSetting};
use versetex_core::{FormatConfig, Preprocessor, QuoteStyle};
use versetex_esv::EsvClient;

use crate::error::CliError;

/// Arguments for preprocessing a document.
#[derive(Args)]
pub(crate) struct PreprocessArgs {
    /// LaTeX source file to preprocess (`-` reads stdin).
    input: PathBuf,

    /// Path to configuration file (default: auto-discover versetex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Passage query endpoint (overrides config).
    #[arg(long)]
    api_url: Option<String>,

    /// Passage API key (overrides config).
    #[arg(long, env = "VERSETEX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// HTTP timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Default output template, e.g. "%(passage)s -- %(wrapped_citation)s (ESV)" (overrides config).
    #[arg(long)]
    template: Option<String>,

    /// Default paragraph wrapper, e.g. "\textit" (overrides config).
    #[arg(long)]
    wrapper: Option<String>,

    /// Quote style: unicode or latex (overrides config).
    #[arg(long, value_parser = parse_quotes)]
    quotes: Option<QuoteSetting>,

    /// Enable verbose output (log fetched passages to stderr).
    #[arg(short, long)]
    pub verbose: bool,
}

impl PreprocessArgs {
    /// Execute the command.
    ///
    /// The document is written to stdout only after every macro resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, reading, fetching, or formatting fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            api_url: self.api_url,
            api_key: self.api_key,
            timeout_secs: self.timeout,
            template: self.template,
            wrapper: self.wrapper,
            quotes: self.quotes,
        };

        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let document = read_input(&self.input)?;
        let output = build_preprocessor(&config)?.run(&document)?;

        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(output.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(CliError::Write)
    }
}

/// Build a preprocessor backed by the ESV client from configuration.
fn build_preprocessor(config: &Config) -> Result<Preprocessor<EsvClient>, CliError> {
    let client = EsvClient::new(config.api.url.clone())
        .api_key(config.api.key.clone())
        .timeout(Duration::from_secs(config.api.timeout_secs));

    let defaults = FormatConfig::new(&config.format.template, config.format.wrapper.clone())?;

    Ok(Preprocessor::new(client)
        .defaults(defaults)
        .quotes(quote_style(config.format.quotes)))
}

fn quote_style(setting: QuoteSetting) -> QuoteStyle {
    match setting {
        QuoteSetting::Unicode => QuoteStyle::Unicode,
        QuoteSetting::Latex => QuoteStyle::Latex,
    }
}

fn parse_quotes(value: &str) -> Result<QuoteSetting, String> {
    QuoteSetting::parse(value)
        .ok_or_else(|| format!("unknown quote style '{value}' (valid: unicode, latex)"))
}

/// Read the whole input document from a file, or stdin for `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    let read_error = |source| CliError::Read {
        path: path.to_path_buf(),
        source,
    };

    if path == Path::new("-") {
        let mut document = String::new();
        std::io::stdin()
            .read_to_string(&mut document)
            .map_err(read_error)?;
        return Ok(document);
    }

    std::fs::read_to_string(path).map_err(read_error)
}
