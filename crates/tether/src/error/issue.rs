//! A single validation problem found in a graph document.

use std::fmt;

use crate::error::{ErrorCode, Span};

/// One structural problem in a graph document.
///
/// An issue always has an [`ErrorCode`] and a message. Issues raised while
/// parsing JSON also carry the [`Span`] of the offending text; issues found
/// in an already parsed document (such as an out-of-range edge index) point
/// at the node or edge by index in their message instead.
///
/// # Example
///
/// ```
/// # use tether::error::{ErrorCode, Issue};
/// let issue = Issue::new(ErrorCode::E001, "edge 3 references node 9, but the graph has 4 nodes")
///     .with_help("edge indices must be smaller than the number of nodes");
/// assert_eq!(issue.code(), ErrorCode::E001);
/// assert!(issue.span().is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    code: ErrorCode,
    message: String,
    span: Option<Span>,
    help: Option<String>,
}

impl Issue {
    /// Create an issue with a code and a message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: None,
            help: None,
        }
    }

    /// Create an [`ErrorCode::E000`] issue from a `serde_json` error.
    ///
    /// The line/column reported by `serde_json` is converted into a span
    /// into `source`.
    pub fn from_json_error(err: &serde_json::Error, source: &str) -> Self {
        let span = Span::from_line_column(source, err.line(), err.column());
        let help = if err.is_eof() {
            "the document ended early; check for a missing `]` or `}`"
        } else if err.is_data() {
            "expected { \"nodes\": [{ \"name\"?, \"pos\"? }], \"edges\": [{ \"source\", \"target\" }] } with non-negative integer indices"
        } else {
            "the input must be a single JSON graph document"
        };
        Self::new(ErrorCode::E000, err.to_string())
            .with_span(span)
            .with_help(help)
    }

    /// Attach a source span and return the modified issue.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach help text and return the modified issue.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source span, if any.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code, self.message)
    }
}
