//! Document preprocessing pass.
//!
//! [`Preprocessor::run`] walks the invocations left to right. `\setbible`
//! updates the [`FormatConfig`] carried through the pass and is replaced by
//! nothing; `\bible` fetches its passage and formats it with the config in
//! effect at that point. All replacements are applied at the end against the
//! original spans, and nothing is returned unless every invocation resolved.

use crate::format::{FormatError, QuoteStyle, format_passage};
use crate::scanner::{InvocationKind, scan};
use crate::source::{FetchError, PassageSource};
use crate::substitute::Replacements;
use crate::template::{OutputTemplate, TemplateError};

/// Default output template.
pub const DEFAULT_TEMPLATE: &str = "%(passage)s -- %(wrapped_citation)s (ESV)";

/// Default wrapping directive.
pub const DEFAULT_WRAPPER: &str = "\\textit";

/// Output template and wrapping directive in effect for a `\bible` macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatConfig {
    /// How body and citation are combined.
    pub template: OutputTemplate,
    /// Wrapping directive used when a macro doesn't give its own.
    pub wrapper: String,
}

impl FormatConfig {
    /// Build a config from a template string and wrapper.
    pub fn new(template: &str, wrapper: impl Into<String>) -> Result<Self, TemplateError> {
        Ok(Self {
            template: OutputTemplate::parse(template)?,
            wrapper: wrapper.into(),
        })
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            template: OutputTemplate::parse(DEFAULT_TEMPLATE)
                .unwrap_or_else(|_| unreachable!("default template is well-formed")),
            wrapper: DEFAULT_WRAPPER.to_owned(),
        }
    }
}

/// Error aborting a preprocessing run.
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// Passage retrieval failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The fetched passage could not be formatted.
    #[error("Cannot format passage '{passage}': {source}")]
    Format {
        passage: String,
        #[source]
        source: FormatError,
    },
    /// A `\setbible` macro carried an invalid template.
    #[error("Invalid \\setbible template: {0}")]
    Template(#[from] TemplateError),
}

/// Expands `\bible` macros in a document using a [`PassageSource`].
///
/// # Example
///
/// ```ignore
/// use versetex_core::{FormatConfig, Preprocessor, QuoteStyle};
///
/// let preprocessor = Preprocessor::new(source)
///     .defaults(FormatConfig::new("%(citation)s: %(passage)s", "\\emph")?)
///     .quotes(QuoteStyle::Latex);
/// let output = preprocessor.run(&document)?;
/// ```
pub struct Preprocessor<S> {
    source: S,
    defaults: FormatConfig,
    quotes: QuoteStyle,
}

impl<S: PassageSource> Preprocessor<S> {
    /// Create a preprocessor with default formatting.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            defaults: FormatConfig::default(),
            quotes: QuoteStyle::default(),
        }
    }

    /// Set the formatting in effect before any `\setbible` macro.
    #[must_use]
    pub fn defaults(mut self, defaults: FormatConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Set the quote conversion style.
    #[must_use]
    pub fn quotes(mut self, quotes: QuoteStyle) -> Self {
        self.quotes = quotes;
        self
    }

    /// Expand every macro in `document`.
    ///
    /// Stops at the first error; no partial output is produced.
    pub fn run(&self, document: &str) -> Result<String, PreprocessError> {
        let mut config = self.defaults.clone();
        let mut replacements = Replacements::new();
        let mut fetched = 0usize;

        for invocation in scan(document) {
            let content = match invocation.kind {
                InvocationKind::Configure { template, wrapper } => {
                    config = FormatConfig::new(template, wrapper)?;
                    tracing::debug!(template, wrapper, "Updated passage format");
                    String::new()
                }
                InvocationKind::Fetch { passage, wrapper } => {
                    let raw = self.source.fetch(passage)?;
                    fetched += 1;
                    tracing::debug!(passage, bytes = raw.len(), "Fetched passage");

                    let wrapper = wrapper.unwrap_or(config.wrapper.as_str());
                    format_passage(&raw, wrapper, &config.template, self.quotes).map_err(
                        |source| PreprocessError::Format {
                            passage: passage.to_owned(),
                            source,
                        },
                    )?
                }
            };
            replacements.add(invocation.span, content);
        }

        tracing::info!(
            macros = replacements.len(),
            passages = fetched,
            "Preprocessing completed"
        );
        Ok(replacements.apply(document))
    }
}
