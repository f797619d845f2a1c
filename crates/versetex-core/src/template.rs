//! Output templates.
//!
//! A template combines the wrapped passage body and its citation, e.g.
//! `%(passage)s -- %(wrapped_citation)s (ESV)`. Placeholders:
//!
//! - `%(passage)s`: the wrapped body paragraphs
//! - `%(citation)s`: the bare citation
//! - `%(wrapped_citation)s`: the citation framed by the wrapping directive
//!
//! `%%` produces a literal percent sign.

/// Error parsing an output template.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// Placeholder name other than `passage`, `citation` or `wrapped_citation`.
    #[error("unknown placeholder '%({name})s' in template '{template}'")]
    UnknownPlaceholder { name: String, template: String },
    /// `%` not followed by `%` or a complete `(name)s` placeholder.
    #[error("malformed placeholder at byte {offset} in template '{template}'")]
    Malformed { offset: usize, template: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Passage,
    Citation,
    WrappedCitation,
}

/// Parsed output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTemplate {
    segments: Vec<Segment>,
}

impl OutputTemplate {
    /// Parse a template string.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut remaining = template;

        while let Some(pos) = remaining.find('%') {
            literal.push_str(&remaining[..pos]);
            let after = &remaining[pos + 1..];
            let offset = template.len() - remaining.len() + pos;

            if let Some(rest) = after.strip_prefix('%') {
                literal.push('%');
                remaining = rest;
                continue;
            }

            let malformed = || TemplateError::Malformed {
                offset,
                template: template.to_owned(),
            };
            let inner = after.strip_prefix('(').ok_or_else(malformed)?;
            let close = inner.find(')').ok_or_else(malformed)?;
            let name = &inner[..close];
            let rest = inner[close + 1..].strip_prefix('s').ok_or_else(malformed)?;

            let segment = match name {
                "passage" => Segment::Passage,
                "citation" => Segment::Citation,
                "wrapped_citation" => Segment::WrappedCitation,
                _ => {
                    return Err(TemplateError::UnknownPlaceholder {
                        name: name.to_owned(),
                        template: template.to_owned(),
                    });
                }
            };
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(segment);
            remaining = rest;
        }

        literal.push_str(remaining);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// Substitute the passage body and citation into the template.
    ///
    /// `wrapper` frames the citation for `%(wrapped_citation)s`.
    #[must_use]
    pub fn render(&self, passage: &str, citation: &str, wrapper: &str) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Passage => output.push_str(passage),
                Segment::Citation => output.push_str(citation),
                Segment::WrappedCitation => {
                    output.push_str(wrapper);
                    output.push('{');
                    output.push_str(citation);
                    output.push('}');
                }
            }
        }
        output
    }
}
