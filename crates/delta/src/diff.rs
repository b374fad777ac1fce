//! Character-level diffing, delegated to an external collaborator
//!
//! [`diff_text`] turns two document strings into a sequence of
//! [`DiffOp`] spans that [`crate::delta::Delta::diff`] replays against the
//! original op streams. The actual minimal-edit-distance search is
//! performed by the `similar` crate's Myers implementation over UTF-16
//! code-unit slices, so the span lengths it reports line up with
//! [`crate::op::Op::length`] without a second unit conversion at the call
//! site.

use crate::error::DeltaError;
use crate::utf16;
use similar::{capture_diff_slices, Algorithm, DiffOp as SimilarOp};

/// Types of operations in a text diff.
///
/// - **Equal**: Text that is the same in both versions
/// - **Insert**: Text that appears in the target but not the source
/// - **Delete**: Text that appears in the source but not the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffType {
    /// Text that is unchanged between versions.
    Equal,
    /// Text that needs to be inserted.
    Insert,
    /// Text that needs to be deleted.
    Delete,
}

/// A single span of a text diff.
///
/// Length is measured in UTF-16 code units (see [`crate::utf16`]), matching
/// [`crate::op::Op::length`] so callers can walk an op iterator alongside
/// the diff without a separate unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOp {
    /// The type of diff operation.
    pub operation: DiffType,
    len: usize,
}

impl DiffOp {
    /// Creates a new diff span.
    pub fn new(operation: DiffType, len: usize) -> Self {
        Self { operation, len }
    }

    /// Returns the length of this span, in UTF-16 code units.
    pub fn length(&self) -> usize {
        self.len
    }
}

/// Computes the diff between two document strings.
///
/// `text1` and `text2` are the rendered document strings (the
/// concatenation of a document Delta's insert text, see
/// [`crate::delta::Delta::diff`]); the returned spans describe how to
/// transform `text1` into `text2`.
///
/// # Errors
///
/// Returns [`DeltaError::EmptyDiffSpan`] if the underlying diff engine
/// reports a zero-length span, which would otherwise stall a caller
/// looping on span length.
///
/// # Examples
///
/// ```rust
/// use quillai_delta::diff::{diff_text, DiffType};
///
/// let ops = diff_text("Hello World", "Hello Rust").unwrap();
/// // Results in: Equal(6), Delete(5), Insert(4)
/// ```
pub fn diff_text(text1: &str, text2: &str) -> Result<Vec<DiffOp>, DeltaError> {
    if text1 == text2 {
        return Ok(if text1.is_empty() {
            Vec::new()
        } else {
            vec![DiffOp::new(DiffType::Equal, utf16::len(text1))]
        });
    }

    let units1: Vec<u16> = text1.encode_utf16().collect();
    let units2: Vec<u16> = text2.encode_utf16().collect();

    let mut result = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, &units1, &units2) {
        match op {
            SimilarOp::Equal { len, .. } => {
                if len == 0 {
                    return Err(DeltaError::EmptyDiffSpan);
                }
                result.push(DiffOp::new(DiffType::Equal, len));
            }
            SimilarOp::Delete { old_len, .. } => {
                if old_len == 0 {
                    return Err(DeltaError::EmptyDiffSpan);
                }
                result.push(DiffOp::new(DiffType::Delete, old_len));
            }
            SimilarOp::Insert { new_len, .. } => {
                if new_len == 0 {
                    return Err(DeltaError::EmptyDiffSpan);
                }
                result.push(DiffOp::new(DiffType::Insert, new_len));
            }
            SimilarOp::Replace { old_len, new_len, .. } => {
                if old_len == 0 || new_len == 0 {
                    return Err(DeltaError::EmptyDiffSpan);
                }
                result.push(DiffOp::new(DiffType::Delete, old_len));
                result.push(DiffOp::new(DiffType::Insert, new_len));
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical() {
        let result = diff_text("hello", "hello").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].operation, DiffType::Equal);
        assert_eq!(result[0].length(), 5);
    }

    #[test]
    fn test_diff_empty() {
        let result = diff_text("", "").unwrap();
        assert_eq!(result.len(), 0);

        let result = diff_text("hello", "").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].operation, DiffType::Delete);
        assert_eq!(result[0].length(), 5);

        let result = diff_text("", "hello").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].operation, DiffType::Insert);
        assert_eq!(result[0].length(), 5);
    }

    #[test]
    fn test_diff_replacement_preserves_common_prefix_and_suffix() {
        let result = diff_text("abc", "axc").unwrap();
        assert_eq!(result.first().unwrap().operation, DiffType::Equal);
        assert_eq!(result.last().unwrap().operation, DiffType::Equal);

        let old_len: usize = result
            .iter()
            .filter(|op| op.operation != DiffType::Insert)
            .map(|op| op.length())
            .sum();
        let new_len: usize = result
            .iter()
            .filter(|op| op.operation != DiffType::Delete)
            .map(|op| op.length())
            .sum();
        assert_eq!(old_len, 3);
        assert_eq!(new_len, 3);
    }

    #[test]
    fn test_diff_insertion() {
        let result = diff_text("ac", "abc").unwrap();
        let new_len: usize = result
            .iter()
            .filter(|op| op.operation != DiffType::Delete)
            .map(|op| op.length())
            .sum();
        assert_eq!(new_len, 3);
    }

    #[test]
    fn test_diff_deletion() {
        let result = diff_text("abc", "ac").unwrap();
        let old_len: usize = result
            .iter()
            .filter(|op| op.operation != DiffType::Insert)
            .map(|op| op.length())
            .sum();
        assert_eq!(old_len, 3);
    }

    #[test]
    fn test_diff_counts_utf16_code_units() {
        // U+1F600 is 2 UTF-16 code units.
        let result = diff_text("a", "a\u{1F600}").unwrap();
        let inserted: usize = result
            .iter()
            .filter(|op| op.operation == DiffType::Insert)
            .map(|op| op.length())
            .sum();
        assert_eq!(inserted, 2);
    }
}
