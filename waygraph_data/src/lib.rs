//! Traversal graph data model for waygraph.
//!
//! Holds the raw input document as deserialized from JSON, the closed set of
//! location groups, and the validated [`Graph`] the compiler works from.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, build_graph, validate_document};
