//! Scripture macro expansion for LaTeX sources.
//!
//! This crate turns `\bible{...}` macros into typeset passage text:
//! - [`scan`] finds macro invocations and yields typed [`Invocation`] records
//! - [`PassageSource`] abstracts the remote text service
//! - [`format_passage`] applies the typographic transformations
//! - [`Preprocessor`] resolves every invocation and substitutes in one pass
//!
//! # Architecture
//!
//! The crate is organized into modules:
//! - [`scanner`]: macro recognition (`\bible{id}`, `\bible{id}{wrapper}`, `\setbible{template}{wrapper}`)
//! - [`source`]: `PassageSource` trait and fetch errors
//! - [`format`]: poetry indentation, quotes, verse superscripts, paragraph wrapping, citation placement
//! - [`template`]: `%(passage)s` / `%(citation)s` output templates
//! - [`preprocessor`]: the left-to-right pass threading [`FormatConfig`]
//!
//! # Example
//!
//! ```ignore
//! use versetex_core::Preprocessor;
//! use versetex_esv::EsvClient;
//!
//! let preprocessor = Preprocessor::new(EsvClient::new("http://www.esvapi.org/v2/rest/passageQuery"));
//! let output = preprocessor.run(r"\bible{ISA3:1-5}{\textit}")?;
//! ```

pub mod format;
pub mod preprocessor;
pub mod scanner;
pub mod source;
mod substitute;
pub mod template;

pub use format::{FormatError, QuoteStyle, format_passage};
pub use preprocessor::{FormatConfig, PreprocessError, Preprocessor};
pub use scanner::{Invocation, InvocationKind, Invocations, scan};
pub use source::{FetchError, PassageSource};
pub use template::{OutputTemplate, TemplateError};
