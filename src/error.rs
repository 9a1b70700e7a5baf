//! Error types for document parsing

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("XML error at {span:?}: {message}")]
    Xml { span: Span, message: String },

    /// The document bytes are not valid UTF-8
    #[error("document is not valid UTF-8 (first bad byte at offset {offset})")]
    Encoding { offset: usize },
}

impl ParseError {
    /// Build a parse error from a roxmltree failure, resolving its
    /// row/column position to a byte span in `text`.
    pub(crate) fn from_xml(err: &roxmltree::Error, text: &str) -> Self {
        let pos = err.pos();
        let start = byte_offset(text, pos.row as usize, pos.col as usize);
        let end = text[start..]
            .chars()
            .next()
            .map(|c| start + c.len_utf8())
            .unwrap_or(start);

        ParseError::Xml {
            span: start..end,
            message: err.to_string(),
        }
    }

    /// Byte range the error points at, if any
    pub fn span(&self) -> Span {
        match self {
            ParseError::Xml { span, .. } => span.clone(),
            ParseError::Encoding { offset } => *offset..*offset,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        let span = self.span();
        let message = match self {
            ParseError::Xml { message, .. } => message.clone(),
            ParseError::Encoding { .. } => self.to_string(),
        };

        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(&message)
            .with_label(
                Label::new((filename, span))
                    .with_message(&message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("{}: {}", filename, self),
        }
    }
}

/// Convert a 1-based row/column (columns counted in characters) to a byte
/// offset, clamped to the end of `text`.
fn byte_offset(text: &str, row: usize, col: usize) -> usize {
    let mut offset = 0;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        if index + 1 == row {
            let within = line
                .char_indices()
                .nth(col.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(line.len());
            return offset + within;
        }
        offset += line.len();
    }
    text.len()
}
