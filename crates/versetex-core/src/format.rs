//! Passage formatting for LaTeX.
//!
//! Raw service text looks like:
//!
//! ```text
//! Psalm 23:1-2
//!   [1] The LORD is my shepherd; I shall not want.
//!     [2] He makes me lie down in green pastures.
//! ```
//!
//! [`format_passage`] applies, in order: poetry indentation, quote
//! conversion, verse superscripts, paragraph wrapping, and citation
//! placement through the output template.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::template::OutputTemplate;

/// Indentation unit inserted for poetry lines.
const INDENT: &str = "\\indent{}";

static POETRY_SMALL_INDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^  (?:(?P<marker>\[(?:\d+:)?\d+\])[ \t]*)?(?P<word>\S+)").unwrap()
});

static POETRY_BIG_INDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^    (?:(?P<marker>\[(?:\d+:)?\d+\])[ \t]*)?(?P<word>\S+)").unwrap()
});

static VERSE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:\d+:)?(\d+)\]").unwrap());

/// Book name (optional numeric prefix), e.g. `1 Corinthians`, `Song of Solomon`.
const BOOK_PATTERN: &str = r"(?:[1-3]\s*)?\p{Lu}[\p{L}.]*(?:\s+(?:of\s+)?\p{Lu}[\p{L}.]*)*";

/// Chapter with optional verse and range, e.g. `3`, `3:1-5`, `1:31-2:3`.
const LOCATION_PATTERN: &str = r"\d+(?::\d+)?(?:[-–]\d+(?::\d+)?)?";

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let reference = format!(r"{BOOK_PATTERN}\s+{LOCATION_PATTERN}");
    let continuation = format!(r"\s*[;,]\s*(?:{BOOK_PATTERN}\s+)?{LOCATION_PATTERN}");
    Regex::new(&format!(r"^\s*(?P<citation>{reference}(?:{continuation})*)\s*$")).unwrap()
});

/// Quote conversion style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteStyle {
    /// Unicode curly quotes (‘ ’ “ ”). Idempotent.
    #[default]
    Unicode,
    /// LaTeX ligatures (`` ` `` `'{}` ``` ``{} ``` `''`).
    Latex,
}

impl QuoteStyle {
    fn open_single(self) -> &'static str {
        match self {
            Self::Unicode => "‘",
            Self::Latex => "`",
        }
    }

    fn close_single(self) -> &'static str {
        match self {
            Self::Unicode => "’",
            Self::Latex => "'{}",
        }
    }

    fn open_double(self) -> &'static str {
        match self {
            Self::Unicode => "“",
            Self::Latex => "``{}",
        }
    }

    fn close_double(self) -> &'static str {
        match self {
            Self::Unicode => "”",
            Self::Latex => "''",
        }
    }
}

/// Error formatting a fetched passage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The first response line does not look like a passage reference.
    #[error("unrecognized citation in response: '{0}'")]
    UnrecognizedCitation(String),
}

/// Format raw passage text for substitution into the document.
///
/// `wrapper` is applied as `wrapper{paragraph}` around each body paragraph.
/// The citation from the first line is validated and placed according to
/// `template`; the default template moves it after the body, framed by
/// `wrapper`.
pub fn format_passage(
    raw: &str,
    wrapper: &str,
    template: &OutputTemplate,
    quotes: QuoteStyle,
) -> Result<String, FormatError> {
    let normalized = raw.replace("\r\n", "\n");
    let indented = indent_poetry(&normalized);
    let quoted = convert_quotes(&indented, quotes);
    let formatted = superscript_verse_numbers(&quoted);

    let mut lines = formatted.lines();
    let citation = detect_citation(lines.next().unwrap_or_default())?;
    let passage = wrap_paragraphs(lines, wrapper);

    Ok(template.render(&passage, citation, wrapper))
}

/// Insert indentation units after the verse marker of indented poetry lines.
///
/// Two leading spaces give one unit, four give two.
pub(crate) fn indent_poetry(text: &str) -> String {
    let small = POETRY_SMALL_INDENT_RE.replace_all(text, |caps: &Captures| indent_line(caps, 1));
    POETRY_BIG_INDENT_RE
        .replace_all(&small, |caps: &Captures| indent_line(caps, 2))
        .into_owned()
}

fn indent_line(caps: &Captures, units: usize) -> String {
    let marker = caps.name("marker").map_or("", |m| m.as_str());
    let word = caps.name("word").map_or("", |m| m.as_str());
    format!("{marker}{}{word}", INDENT.repeat(units))
}

/// Convert straight quotes to directional quotes.
///
/// Single quotes are handled first so apostrophes are decided before double
/// quotes change the surrounding characters. Each rule looks at the
/// neighbours of every quote in its input, so runs of quotes (`a'' b`) are
/// all converted in one call.
pub(crate) fn convert_quotes(text: &str, style: QuoteStyle) -> String {
    let text = replace_quotes(text, '\'', style.open_single(), |prev, next| {
        prev.is_none_or(|c| !c.is_alphabetic())
            && next.is_some_and(|c| !c.is_whitespace() && !matches!(c, '"' | '“' | '”'))
    });
    let text = replace_quotes(&text, '\'', style.close_single(), |prev, _| {
        prev.is_some_and(|c| !c.is_whitespace())
    });
    let text = replace_quotes(&text, '"', style.open_double(), |_, next| {
        next.is_some_and(|c| !c.is_whitespace())
    });
    replace_quotes(&text, '"', style.close_double(), |prev, _| {
        prev.is_some_and(|c| !c.is_whitespace())
    })
}

/// Replace every `quote` whose neighbours satisfy `rule`.
///
/// `rule` receives the characters before and after the quote in `text`.
fn replace_quotes(
    text: &str,
    quote: char,
    replacement: &str,
    rule: impl Fn(Option<char>, Option<char>) -> bool,
) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == quote && rule(prev, chars.peek().copied()) {
            result.push_str(replacement);
        } else {
            result.push(c);
        }
        prev = Some(c);
    }
    result
}

/// Replace `[n]` and `[c:n]` verse markers with a superscript verse number.
pub(crate) fn superscript_verse_numbers(text: &str) -> String {
    VERSE_NUMBER_RE
        .replace_all(text, r"\textnormal{\textsuperscript{${1}}}")
        .into_owned()
}

/// Validate the citation line and return it trimmed.
fn detect_citation(line: &str) -> Result<&str, FormatError> {
    CITATION_RE
        .captures(line)
        .and_then(|caps| caps.name("citation"))
        .map(|m| m.as_str())
        .ok_or_else(|| FormatError::UnrecognizedCitation(line.to_owned()))
}

/// Wrap each non-empty line and join paragraphs with a blank line.
fn wrap_paragraphs<'a>(lines: impl Iterator<Item = &'a str>, wrapper: &str) -> String {
    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| format!("{wrapper}{{{line}}}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
