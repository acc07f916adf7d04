//! Error types for Tether operations.
//!
//! This module provides the main error type [`TetherError`] which wraps the
//! conditions that can stop a layout step, plus the structured
//! [`ValidationError`] used to report problems in the input document.
//!
//! # Overview
//!
//! - [`ValidationError`] - one or more [`Issue`]s, each with an [`ErrorCode`],
//!   a message, optional help and an optional [`Span`] into the source text.
//! - [`NumericError`] - a force or coordinate became NaN or infinite.
//!
//! # Example
//!
//! ```
//! # use tether::error::{ErrorCode, Issue, ValidationError};
//! let err = ValidationError::new(vec![
//!     Issue::new(ErrorCode::E001, "edge 0 references node 5, but the graph has 2 nodes"),
//!     Issue::new(ErrorCode::E002, "node 1 has a 3-dimensional position, expected 2"),
//! ]);
//! assert_eq!(err.issues().len(), 2);
//! ```

mod error_code;
mod issue;
mod span;
mod validation;

pub use error_code::ErrorCode;
pub use issue::Issue;
pub use span::Span;
pub use validation::ValidationError;

use std::{fmt, io};

use thiserror::Error;

/// The main error type for Tether operations.
///
/// # Diagnostic Variants
///
/// The `Validation` variant contains structured issue information and the
/// source text it was found in, when the document came from text. This
/// allows front ends to point at the offending part of the input.
#[derive(Debug, Error)]
pub enum TetherError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Validation { err: ValidationError, src: String },

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl TetherError {
    /// Create a new `Validation` error with the associated source text.
    pub fn new_validation_error(err: ValidationError, src: impl Into<String>) -> Self {
        Self::Validation {
            err,
            src: src.into(),
        }
    }
}

impl From<ValidationError> for TetherError {
    fn from(err: ValidationError) -> Self {
        Self::new_validation_error(err, String::new())
    }
}

/// Which simulation quantity went non-finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Force,
    Position,
    Velocity,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::Force => "force",
            Quantity::Position => "position",
            Quantity::Velocity => "velocity",
        };
        f.write_str(name)
    }
}

/// A NaN or infinity appeared during a step.
///
/// The step is abandoned; no output document is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("non-finite {quantity} computed for node {node}")]
pub struct NumericError {
    node: usize,
    quantity: Quantity,
}

impl NumericError {
    /// Create a numeric error for the given node.
    pub fn new(node: usize, quantity: Quantity) -> Self {
        Self { node, quantity }
    }

    /// Index of the node whose value went non-finite.
    pub fn node(&self) -> usize {
        self.node
    }

    /// The quantity that went non-finite.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }
}
