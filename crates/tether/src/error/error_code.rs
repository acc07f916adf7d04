//! Error codes for graph document validation.
//!
//! Every structural problem found while ingesting a document carries one of
//! these codes so callers can match on it and users can search for it.

use std::fmt;

/// Error codes for categorizing validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed document.
    ///
    /// The input is not valid JSON, or does not match the document schema
    /// (missing `source`/`target`, negative index, wrong value type).
    E000,

    /// Edge index out of range.
    ///
    /// An edge references a node index greater than or equal to the number
    /// of nodes.
    E001,

    /// Position dimension mismatch.
    ///
    /// Two nodes carry `pos` vectors of different lengths.
    E002,

    /// Empty position.
    ///
    /// A node carries `pos: []`; positions need at least one component.
    E003,

    /// Velocity dimension mismatch.
    ///
    /// A node carries a `vel` vector whose length differs from the layout
    /// dimension.
    E004,

    /// Invalid edge weight.
    ///
    /// An edge `value` is negative or not finite.
    E005,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E000 => "E000",
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E000 => "malformed document",
            ErrorCode::E001 => "edge index out of range",
            ErrorCode::E002 => "position dimension mismatch",
            ErrorCode::E003 => "empty position",
            ErrorCode::E004 => "velocity dimension mismatch",
            ErrorCode::E005 => "invalid edge weight",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
