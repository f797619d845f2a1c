//! Macro recognition.
//!
//! Recognizes three shapes, tried in this order at each position:
//!
//! - `\setbible{template}{wrapper}`
//! - `\bible{passage}{wrapper}`
//! - `\bible{passage}`
//!
//! Arguments are single brace groups and cannot contain `}`.

use std::ops::Range;
use std::sync::LazyLock;

use regex::{CaptureMatches, Captures, Regex};

static MACRO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\\setbible\{(?P<template>[^}]+)\}\{(?P<set_wrapper>[^}]*)\}",
        r"|\\bible\{(?P<wrapped_passage>[^}]+)\}\{(?P<wrapper>[^}]*)\}",
        r"|\\bible\{(?P<passage>[^}]+)\}",
    ))
    .unwrap()
});

/// A macro invocation found in the source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation<'a> {
    /// Byte range of the whole macro in the original document.
    pub span: Range<usize>,
    /// What the macro asks for.
    pub kind: InvocationKind<'a>,
}

/// Parsed macro arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind<'a> {
    /// `\bible{passage}` or `\bible{passage}{wrapper}`.
    Fetch {
        passage: &'a str,
        /// Per-call wrapping directive; `None` uses the current default.
        wrapper: Option<&'a str>,
    },
    /// `\setbible{template}{wrapper}`.
    Configure { template: &'a str, wrapper: &'a str },
}

/// Lazy iterator over the invocations in a document, left to right.
pub struct Invocations<'a> {
    matches: CaptureMatches<'static, 'a>,
}

impl<'a> Iterator for Invocations<'a> {
    type Item = Invocation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.matches.next().map(|caps| to_invocation(&caps))
    }
}

/// Scan a document for macro invocations.
///
/// Matches never overlap and are yielded in document order.
pub fn scan(document: &str) -> Invocations<'_> {
    Invocations {
        matches: MACRO_RE.captures_iter(document),
    }
}

fn to_invocation<'a>(caps: &Captures<'a>) -> Invocation<'a> {
    // Group 0 always participates in a match.
    let whole = caps.get(0).map_or(0..0, |m| m.range());

    let kind = if let Some(template) = caps.name("template") {
        InvocationKind::Configure {
            template: template.as_str(),
            wrapper: caps.name("set_wrapper").map_or("", |m| m.as_str()),
        }
    } else if let Some(passage) = caps.name("wrapped_passage") {
        InvocationKind::Fetch {
            passage: passage.as_str(),
            wrapper: caps.name("wrapper").map(|m| m.as_str()),
        }
    } else {
        InvocationKind::Fetch {
            passage: caps.name("passage").map_or("", |m| m.as_str()),
            wrapper: None,
        }
    };

    Invocation { span: whole, kind }
}
