//! # Delta
//!
//! A Rust implementation of the Quill Delta format for representing rich text documents and changes.
//! 
//! Deltas are a simple, yet expressive format that can be used to describe contents and changes.
//! The format is JSON based, and is human readable, yet easily parsible by machines. Deltas can
//! describe any rich text document, includes all text and formatting information, without the
//! ambiguity and complexity of HTML.

pub mod attributes;
pub mod config;
pub mod delta;
pub mod diff;
pub mod embed;
pub mod error;
pub mod line_iterator;
pub mod op;
pub mod op_iterator;
pub mod utf16;

pub use attributes::{AttributeMap, AttributeValue};
pub use config::DeltaConfig;
pub use delta::Delta;
pub use embed::{EmbedHandler, EmbedRegistry};
pub use error::DeltaError;
pub use line_iterator::{line_iterator, Line};
pub use op::Op;
pub use op_iterator::OpIterator;

// Re-export for convenience
pub use serde_json::Value as JsonValue;