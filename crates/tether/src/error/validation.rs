//! The ValidationError type for wrapping document issues.

use std::fmt;

use crate::error::Issue;

/// Error returned when a graph document cannot be laid out.
///
/// Wraps every [`Issue`] found during ingestion so callers see all of them
/// at once rather than fixing one per run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    /// Create a new validation error from issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Get all issues in this error.
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.issues.first() {
            write!(f, "{first}")?;
            if self.issues.len() > 1 {
                write!(f, " (+{} more)", self.issues.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl From<Vec<Issue>> for ValidationError {
    fn from(issues: Vec<Issue>) -> Self {
        Self { issues }
    }
}
