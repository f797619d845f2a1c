//! Single-pass span substitution.

use std::ops::Range;

/// Collected replacements keyed by their span in the original document.
///
/// Spans are added in document order and never overlap, so applying them
/// never disturbs the offsets of spans still to be processed.
pub(crate) struct Replacements {
    entries: Vec<(Range<usize>, String)>,
}

impl Replacements {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a replacement for a macro span.
    pub(crate) fn add(&mut self, span: Range<usize>, content: String) {
        debug_assert!(
            self.entries
                .last()
                .is_none_or(|(previous, _)| previous.end <= span.start),
            "replacement spans must be ascending and non-overlapping"
        );
        self.entries.push((span, content));
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply all replacements in a single pass.
    ///
    /// Text outside the spans is copied verbatim.
    pub(crate) fn apply(self, source: &str) -> String {
        if self.entries.is_empty() {
            return source.to_owned();
        }

        let mut result = String::with_capacity(source.len());
        let mut cursor = 0;

        for (span, content) in self.entries {
            result.push_str(&source[cursor..span.start]);
            result.push_str(&content);
            cursor = span.end;
        }

        result.push_str(&source[cursor..]);
        result
    }
}
