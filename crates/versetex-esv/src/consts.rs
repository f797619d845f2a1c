//! Internal constants for the passage query service.

use std::time::Duration;

/// Default HTTP timeout for passage requests (30 seconds).
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Prefix the service puts on bodies describing an invalid passage.
pub(crate) const ERROR_MARKER: &str = "ERROR";

/// Fixed query parameters: plain text with references and verse numbers,
/// everything else switched off.
pub(crate) const QUERY_PARAMS: &[(&str, &str)] = &[
    ("output-format", "plain-text"),
    ("include-passage-references", "true"),
    ("include-first-verse-numbers", "true"),
    ("include-verse-numbers", "true"),
    ("include-footnotes", "false"),
    ("include-short-copyright", "false"),
    ("include-passage-horizontal-lines", "false"),
    ("include-heading-horizontal-lines", "false"),
    ("include-headings", "false"),
    ("include-subheadings", "false"),
    ("include-selahs", "false"),
    ("include-content-type", "false"),
    ("line-length", "0"),
];
