//! Failure modes for the Delta algebra
//!
//! Every fallible entry point returns `Result<_, DeltaError>`. Construction
//! never mutates the receiver before a failure is known, so a failed call
//! leaves its inputs untouched.

use thiserror::Error;

/// The failure kinds documented for the change-set algebra.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeltaError {
    /// A retain or embed operand was not the mapping an embed requires.
    #[error("expected an embed payload, found {0}")]
    TypeError(String),

    /// Two embed operands being composed/inverted/transformed declare
    /// different embed types.
    #[error("embed type mismatch: `{0}` does not match `{1}`")]
    EmbedTypeMismatch(String, String),

    /// No handler is registered for an embed type being operated on.
    #[error("no embed handler registered for type `{0}`")]
    MissingEmbedHandler(String),

    /// `diff` was called with an operand that isn't a document (insert-only).
    #[error("diff requires both operands to be documents (insert-only deltas)")]
    DocumentRequired,

    /// A slice was requested with a step other than 1.
    #[error("change sets only support unit-step slicing")]
    UnsupportedSliceStep,

    /// A slice was requested with a negative bound.
    #[error("change set slice bounds must be non-negative")]
    NegativeIndex,

    /// `document()` was called on a change set containing non-insert ops.
    #[error("document() requires a change set containing only inserts")]
    MalformedDelta,

    /// The diff collaborator reported a zero-length span, which would stall
    /// the consuming loop forever if treated as progress.
    #[error("diff collaborator reported a zero-length span")]
    EmptyDiffSpan,
}
