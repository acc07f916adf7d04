//! Tether Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Tether layout
//! engine and its command-line front end. It includes:
//!
//! - **Geometry**: N-dimensional vectors and axis-aligned bounds ([`geometry`] module)
//! - **Document**: The serde model of the JSON graph document exchanged at the
//!   process boundary ([`document`] module)

pub mod document;
pub mod geometry;
