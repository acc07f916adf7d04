//! Error adapter for converting TetherError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`tether::error::ValidationError`] contains multiple issues, each
//! issue is rendered independently.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use tether::{
    TetherError,
    error::{Issue, Span},
};

/// Adapter for a single validation issue.
///
/// This adapter wraps a single [`Issue`] and implements [`MietteDiagnostic`]
/// to enable rich error formatting in the CLI.
pub struct IssueAdapter<'a> {
    /// The wrapped issue
    issue: &'a Issue,
    /// Source document for displaying snippets
    src: &'a str,
}

impl<'a> IssueAdapter<'a> {
    /// Create a new issue adapter.
    pub fn new(issue: &'a Issue, src: &'a str) -> Self {
        Self { issue, src }
    }
}

impl fmt::Debug for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssueAdapter")
            .field("issue", &self.issue)
            .finish()
    }
}

impl fmt::Display for IssueAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.issue.message())
    }
}

impl std::error::Error for IssueAdapter<'_> {}

impl MietteDiagnostic for IssueAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("tether::{}", self.issue.code())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.issue
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        if self.src.is_empty() {
            return None;
        }
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.issue.span().filter(|_| !self.src.is_empty())?;
        let label = LabeledSpan::new_primary_with_span(
            Some(self.issue.code().description().to_string()),
            span_to_miette(span),
        );
        Some(Box::new(std::iter::once(label)))
    }
}

/// Adapter for non-validation [`TetherError`] variants.
///
/// This adapter handles errors that don't have rich diagnostic information,
/// such as I/O errors, numeric failures and configuration errors.
pub struct ErrorAdapter<'a>(pub &'a TetherError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TetherError::Io(_) => "tether::io",
            TetherError::Validation { .. } => return None,
            TetherError::Numeric(_) => "tether::numeric",
            TetherError::Config(_) => "tether::config",
            TetherError::Serialize(_) => "tether::serialize",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            TetherError::Numeric(_) => Some(Box::new(
                "lower `simulation.step_size` or set `simulation.max_displacement`",
            )),
            _ => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
///
/// This enum wraps either a single issue or a non-validation error,
/// providing a uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A validation issue, possibly with a location in the input.
    Issue(IssueAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Issue(i) => fmt::Display::fmt(i, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Issue(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Issue(i) => i.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Issue(i) => i.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Issue(i) => i.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a tether [`Span`] to a miette [`SourceSpan`].
fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`TetherError`] into a list of reportable errors.
///
/// For [`TetherError::Validation`], this returns one [`Reportable`] for
/// each issue in the error. For other error variants, this returns a
/// single [`Reportable`].
pub fn to_reportables(err: &TetherError) -> Vec<Reportable<'_>> {
    match err {
        TetherError::Validation { err, src } => err
            .issues()
            .iter()
            .map(|issue| Reportable::Issue(IssueAdapter::new(issue, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}
