//! Operation iterator for efficient Delta traversal
//!
//! This module provides the [`OpIterator`] struct, which enables efficient
//! traversal and slicing of Delta operations. The iterator is particularly
//! useful for implementing compose, transform, and diff operations where
//! you need to process operations in parallel while potentially splitting
//! them into smaller chunks.
//!
//! # Key Features
//!
//! - **Partial consumption**: Operations can be consumed partially, allowing
//!   precise control over how much of each operation to process
//! - **Peeking**: Look ahead at the next operation without consuming it
//! - **Slicing**: Extract specific portions of text operations
//! - **Infinite retain**: Returns infinite retain when exhausted, simplifying
//!   compose/transform algorithms

use crate::attributes::{AttributeMap, AttributeValue};
use crate::config::DeltaConfig;
use crate::op::Op;
use crate::utf16;

/// An iterator for traversing and slicing Delta operations
///
/// `OpIterator` maintains internal state to track position within operations,
/// allowing partial consumption of operations. This is essential for algorithms
/// like compose and transform that need to process operations in lockstep.
///
/// # Design
///
/// The iterator tracks:
/// - `ops`: The vector of operations to iterate over
/// - `index`: The current operation index
/// - `offset`: The offset within the current operation (for partial consumption)
///
/// When an operation is partially consumed, the iterator remembers the offset
/// and returns the remaining portion on the next call.
///
/// # Examples
///
/// ```rust
/// use quillai_delta::{Op, OpIterator};
///
/// let ops = vec![
///     Op::Insert { text: "Hello World".to_string(), attributes: None },
///     Op::Retain { length: 5, attributes: None },
/// ];
///
/// let mut iter = OpIterator::new(&ops);
///
/// // Consume first 5 characters of the insert
/// let partial = iter.next(Some(5));
/// // Returns: Insert { text: "Hello", attributes: None }
///
/// // Consume the rest
/// let rest = iter.next(None);
/// // Returns: Insert { text: " World", attributes: None }
/// ```
#[derive(Debug, Clone)]
pub struct OpIterator {
    ops: Vec<Op>,
    index: usize,
    offset: usize,
    config: DeltaConfig,
}

impl OpIterator {
    /// Creates a new iterator from a slice of operations, using the default
    /// [`DeltaConfig`].
    ///
    /// # Arguments
    ///
    /// * `ops` - The operations to iterate over
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![
    ///     Op::Insert { text: "Hello".to_string(), attributes: None },
    ///     Op::Delete(5),
    /// ];
    /// let iter = OpIterator::new(&ops);
    /// ```
    pub fn new(ops: &[Op]) -> Self {
        Self::with_config(ops, DeltaConfig::default())
    }

    /// Creates a new iterator using an explicit [`DeltaConfig`].
    pub fn with_config(ops: &[Op], config: DeltaConfig) -> Self {
        Self {
            ops: ops.to_vec(),
            index: 0,
            offset: 0,
            config,
        }
    }

    /// Checks if there are more operations to process
    ///
    /// Returns `false` when all operations have been consumed.
    /// Note that the iterator returns infinite retain operations
    /// when exhausted, so `next()` will always return something.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![Op::Delete(5)];
    /// let mut iter = OpIterator::new(&ops);
    ///
    /// assert!(iter.has_next());
    /// iter.next(None);
    /// assert!(!iter.has_next());
    /// ```
    pub fn has_next(&self) -> bool {
        self.peek_length() < usize::MAX
    }

    /// Consumes and returns the next operation or portion thereof
    ///
    /// If a length is specified and the current operation is longer,
    /// only that length is consumed and the remainder is saved for
    /// the next call. When the iterator is exhausted, it returns
    /// infinite retain operations.
    ///
    /// # Arguments
    ///
    /// * `length` - Optional maximum length to consume. If None, consumes the entire operation.
    ///
    /// # Returns
    ///
    /// The next operation or operation slice. Returns an infinite retain
    /// when no more operations are available.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![Op::Insert { text: "Hello".to_string(), attributes: None }];
    /// let mut iter = OpIterator::new(&ops);
    ///
    /// // Consume only 2 characters
    /// let partial = iter.next(Some(2));
    /// if let Op::Insert { text, .. } = partial {
    ///     assert_eq!(text, "He");
    /// }
    ///
    /// // Consume the rest
    /// let rest = iter.next(None);
    /// if let Op::Insert { text, .. } = rest {
    ///     assert_eq!(text, "llo");
    /// }
    /// ```
    pub fn next(&mut self, length: Option<usize>) -> Op {
        let length = length.unwrap_or(usize::MAX);

        if let Some(next_op) = self.ops.get(self.index) {
            let offset = self.offset;
            let op_length = next_op.length();

            if length >= op_length - offset {
                // Consume the entire operation
                let consumed_length = op_length - offset;
                self.index += 1;
                self.offset = 0;
                self.slice_op(next_op, offset, consumed_length)
            } else {
                // Partially consume the operation
                self.offset += length;
                self.slice_op(next_op, offset, length)
            }
        } else {
            // Return infinite retain when no more operations
            Op::Retain {
                length: usize::MAX,
                attributes: None,
            }
        }
    }

    /// Peeks at the current operation without consuming it
    ///
    /// Returns `None` if the iterator is exhausted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![Op::Delete(5)];
    /// let iter = OpIterator::new(&ops);
    ///
    /// // Peek doesn't consume
    /// assert!(iter.peek().is_some());
    /// assert!(iter.peek().is_some());
    /// ```
    pub fn peek(&self) -> Option<&Op> {
        self.ops.get(self.index)
    }

    /// Returns the remaining length of the current operation
    ///
    /// If the iterator is exhausted, returns `usize::MAX` to indicate
    /// infinite length (used for compose/transform algorithms).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![Op::Insert { text: "Hello".to_string(), attributes: None }];
    /// let mut iter = OpIterator::new(&ops);
    ///
    /// assert_eq!(iter.peek_length(), 5);
    /// iter.next(Some(2));
    /// assert_eq!(iter.peek_length(), 3); // "llo" remaining
    /// ```
    pub fn peek_length(&self) -> usize {
        if let Some(op) = self.ops.get(self.index) {
            op.length() - self.offset
        } else {
            usize::MAX
        }
    }

    /// Returns the type of the current operation as a string
    ///
    /// Returns "retain" if the iterator is exhausted (matching the
    /// behavior of returning infinite retains).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![
    ///     Op::Insert { text: "Hi".to_string(), attributes: None },
    ///     Op::Delete(3),
    /// ];
    /// let mut iter = OpIterator::new(&ops);
    ///
    /// assert_eq!(iter.peek_type(), "insert");
    /// iter.next(None);
    /// assert_eq!(iter.peek_type(), "delete");
    /// iter.next(None);
    /// assert_eq!(iter.peek_type(), "retain"); // exhausted
    /// ```
    pub fn peek_type(&self) -> &'static str {
        if let Some(op) = self.ops.get(self.index) {
            op.op_type()
        } else {
            "retain"
        }
    }

    /// Reports whether the current operation is an insert (text or embed).
    ///
    /// Unlike [`OpIterator::peek_type`], this treats `Insert` and
    /// `InsertEmbed` as the same kind, which is what the compose/transform
    /// algorithms need when deciding whether an operation always wins a
    /// position regardless of what it carries.
    pub fn peek_is_insert(&self) -> bool {
        self.ops.get(self.index).is_some_and(Op::is_insert)
    }

    /// Reports whether the current operation is a delete. `false` once the
    /// iterator is exhausted, matching the infinite-retain convention.
    pub fn peek_is_delete(&self) -> bool {
        self.ops.get(self.index).is_some_and(Op::is_delete)
    }

    /// Returns all remaining operations without moving the cursor.
    ///
    /// If the current operation has been partially consumed, the remaining
    /// portion is included as the first element. The iterator's position is
    /// left exactly as it was found, even though computing the partial first
    /// element requires calling [`OpIterator::next`] internally.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use quillai_delta::{Op, OpIterator};
    ///
    /// let ops = vec![
    ///     Op::Insert { text: "Hello".to_string(), attributes: None },
    ///     Op::Delete(5),
    /// ];
    /// let mut iter = OpIterator::new(&ops);
    ///
    /// // Partially consume first op
    /// iter.next(Some(2));
    ///
    /// let rest = iter.rest();
    /// assert_eq!(rest.len(), 2); // "llo" + Delete(5)
    /// ```
    pub fn rest(&mut self) -> Vec<Op> {
        if !self.has_next() {
            return Vec::new();
        }

        if self.offset == 0 {
            // No partial operation, return the rest directly
            self.ops[self.index..].to_vec()
        } else {
            // There's a partial operation; compute it via `next`, then
            // restore the cursor so `rest` itself stays non-mutating.
            let saved_index = self.index;
            let saved_offset = self.offset;
            let current = self.next(None);
            let mut result = Vec::with_capacity(1 + self.ops.len() - self.index);
            result.push(current);
            result.extend_from_slice(&self.ops[self.index..]);
            self.index = saved_index;
            self.offset = saved_offset;
            result
        }
    }

    /// Slices an operation to extract a specific portion
    ///
    /// This method handles the complexity of extracting a substring from
    /// text operations while preserving attributes. For atomic operations
    /// like embeds, it returns the whole operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation to slice
    /// * `offset` - Starting position within the operation
    /// * `length` - Number of characters to extract
    ///
    /// # Returns
    ///
    /// A new operation containing the specified slice with attributes preserved.
    fn slice_op(&self, op: &Op, offset: usize, length: usize) -> Op {
        match op {
            Op::Insert { text, attributes } => Op::Insert {
                text: utf16::slice(text, offset, length),
                attributes: self.stripped(attributes),
            },
            Op::InsertEmbed { embed, attributes } => {
                // Embeds are atomic, can't be sliced
                Op::InsertEmbed {
                    embed: embed.clone(),
                    attributes: self.stripped(attributes),
                }
            }
            Op::Delete(_) => Op::Delete(length),
            Op::Retain { attributes, .. } => Op::Retain {
                length,
                attributes: self.stripped(attributes),
            },
            Op::RetainEmbed { embed, attributes } => {
                // Embed retains are atomic
                Op::RetainEmbed {
                    embed: embed.clone(),
                    attributes: self.stripped(attributes),
                }
            }
        }
    }

    /// Applies the `strip_legacy_color_attrs` compatibility rule (see
    /// [`DeltaConfig`]) to a cloned copy of `attributes`.
    fn stripped(&self, attributes: &Option<AttributeMap>) -> Option<AttributeMap> {
        let mut attributes = attributes.clone();
        if self.config.strip_legacy_color_attrs {
            if let Some(attrs) = attributes.as_mut() {
                let strip = matches!(
                    attrs.get("color"),
                    Some(AttributeValue::String(v)) if v == "unset" || v == "windowtext"
                );
                if strip {
                    attrs.remove("color");
                }
            }
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_iterator_basic() {
        let ops = vec![
            Op::Insert {
                text: "Hello".to_string(),
                attributes: None,
            },
            Op::Retain {
                length: 3,
                attributes: None,
            },
            Op::Delete(2),
        ];

        let mut iter = OpIterator::new(&ops);

        assert!(iter.has_next());
        assert_eq!(iter.peek_type(), "insert");
        assert_eq!(iter.peek_length(), 5);

        let first = iter.next(None);
        if let Op::Insert { text, .. } = first {
            assert_eq!(text, "Hello");
        } else {
            panic!("Expected insert operation");
        }

        assert_eq!(iter.peek_type(), "retain");
        assert_eq!(iter.peek_length(), 3);

        let second = iter.next(None);
        if let Op::Retain { length, .. } = second {
            assert_eq!(length, 3);
        } else {
            panic!("Expected retain operation");
        }

        assert_eq!(iter.peek_type(), "delete");
        let third = iter.next(None);
        if let Op::Delete(len) = third {
            assert_eq!(len, 2);
        } else {
            panic!("Expected delete operation");
        }

        assert!(!iter.has_next());
    }

    #[test]
    fn test_op_iterator_slicing() {
        let ops = vec![Op::Insert {
            text: "Hello World".to_string(),
            attributes: None,
        }];

        let mut iter = OpIterator::new(&ops);

        // Take first 5 characters
        let first = iter.next(Some(5));
        if let Op::Insert { text, .. } = first {
            assert_eq!(text, "Hello");
        } else {
            panic!("Expected insert operation");
        }

        assert_eq!(iter.peek_length(), 6); // " World" remaining

        // Take the rest
        let second = iter.next(None);
        if let Op::Insert { text, .. } = second {
            assert_eq!(text, " World");
        } else {
            panic!("Expected insert operation");
        }

        assert!(!iter.has_next());
    }

    #[test]
    fn test_op_iterator_rest() {
        let ops = vec![
            Op::Insert {
                text: "Hello".to_string(),
                attributes: None,
            },
            Op::Retain {
                length: 3,
                attributes: None,
            },
        ];

        let mut iter = OpIterator::new(&ops);
        iter.next(None); // Consume first operation

        let rest = iter.rest();
        assert_eq!(rest.len(), 1);
        if let Op::Retain { length, .. } = &rest[0] {
            assert_eq!(*length, 3);
        } else {
            panic!("Expected retain operation");
        }
    }

    #[test]
    fn test_op_iterator_partial_rest() {
        let ops = vec![Op::Insert {
            text: "Hello World".to_string(),
            attributes: None,
        }];

        let mut iter = OpIterator::new(&ops);
        iter.next(Some(5)); // Partially consume "Hello"

        let rest = iter.rest();
        assert_eq!(rest.len(), 1);
        if let Op::Insert { text, .. } = &rest[0] {
            assert_eq!(text, " World");
        } else {
            panic!("Expected insert operation");
        }
    }

    #[test]
    fn test_rest_does_not_move_the_cursor_on_a_partial_op() {
        let ops = vec![
            Op::Insert {
                text: "Hello World".to_string(),
                attributes: None,
            },
            Op::Delete(2),
        ];

        let mut iter = OpIterator::new(&ops);
        iter.next(Some(5)); // Partially consume "Hello"

        let rest = iter.rest();
        assert_eq!(rest.len(), 2);

        // The cursor must still sit where `next` left it, as if `rest` had
        // never run.
        assert_eq!(iter.peek_type(), "insert");
        assert_eq!(iter.peek_length(), 6);
        let remainder = iter.next(None);
        if let Op::Insert { text, .. } = remainder {
            assert_eq!(text, " World");
        } else {
            panic!("Expected insert operation");
        }
        assert_eq!(iter.peek_type(), "delete");
    }

    #[test]
    fn test_legacy_color_stripped_by_default() {
        let mut attrs = std::collections::BTreeMap::new();
        attrs.insert(
            "color".to_string(),
            crate::attributes::AttributeValue::String("unset".to_string()),
        );
        attrs.insert(
            "bold".to_string(),
            crate::attributes::AttributeValue::Boolean(true),
        );

        let ops = vec![Op::Insert {
            text: "Hi".to_string(),
            attributes: Some(attrs),
        }];

        let mut iter = OpIterator::new(&ops);
        let op = iter.next(None);
        let attrs = op.attributes().expect("bold attribute should remain");
        assert!(!attrs.contains_key("color"));
        assert!(attrs.contains_key("bold"));
    }

    #[test]
    fn test_legacy_color_kept_when_disabled() {
        let mut attrs = std::collections::BTreeMap::new();
        attrs.insert(
            "color".to_string(),
            crate::attributes::AttributeValue::String("unset".to_string()),
        );

        let ops = vec![Op::Insert {
            text: "Hi".to_string(),
            attributes: Some(attrs),
        }];

        let config = DeltaConfig {
            strip_legacy_color_attrs: false,
            ..DeltaConfig::default()
        };
        let mut iter = OpIterator::with_config(&ops, config);
        let op = iter.next(None);
        assert!(op.attributes().unwrap().contains_key("color"));
    }

    #[test]
    fn test_peek_is_insert_treats_embeds_as_inserts() {
        use crate::op::EmbedData;

        let ops = vec![
            Op::InsertEmbed {
                embed: EmbedData::new("image".to_string(), serde_json::json!({"url": "x"})),
                attributes: None,
            },
            Op::Delete(2),
        ];
        let mut iter = OpIterator::new(&ops);
        assert!(iter.peek_is_insert());
        assert!(!iter.peek_is_delete());
        iter.next(None);
        assert!(!iter.peek_is_insert());
        assert!(iter.peek_is_delete());
        iter.next(None);
        assert!(!iter.peek_is_insert());
        assert!(!iter.peek_is_delete());
    }

    #[test]
    fn test_slicing_respects_utf16_code_units() {
        // U+1F600 is a surrogate pair (2 code units) in UTF-16.
        let ops = vec![Op::Insert {
            text: "a\u{1F600}b".to_string(),
            attributes: None,
        }];

        let mut iter = OpIterator::new(&ops);
        assert_eq!(iter.peek_length(), 4);

        let first = iter.next(Some(1));
        assert_eq!(first.length(), 1);
        if let Op::Insert { text, .. } = first {
            assert_eq!(text, "a");
        } else {
            panic!("expected insert");
        }

        let rest = iter.next(None);
        if let Op::Insert { text, .. } = rest {
            assert_eq!(text, "\u{1F600}b");
        } else {
            panic!("expected insert");
        }
    }
}

