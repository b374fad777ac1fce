//! Per-line rendering helper
//!
//! Not part of the core algebra: a pure function that walks a document
//! [`Delta`](crate::delta::Delta) and splits it at `\n` boundaries into a
//! sequence of [`Line`]s, the way an editor surface walks a document to
//! render it block by block. The newline character itself carries the
//! line's block-level attributes (e.g. `header`, `list`, `align`), matching
//! how Quill's rich text model attaches block formatting to the trailing
//! newline rather than the line content.

use crate::attributes::AttributeMap;
use crate::delta::Delta;
use crate::op::Op;

/// One line of a document: its content (everything between the previous
/// newline and this one, exclusive), the block-level attributes carried by
/// the newline that ends it, and the document index the line starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The line's content, as a document Delta (insert-only).
    pub delta: Delta,
    /// The block-level attributes carried by the line's closing newline.
    pub attributes: Option<AttributeMap>,
    /// The document index (in code units) the line starts at.
    pub index: usize,
}

/// `true` when `attributes` carries a truthy `code-block` entry.
fn is_code_block(attributes: &Option<AttributeMap>) -> bool {
    attributes
        .as_ref()
        .and_then(|attrs| attrs.get("code-block"))
        .is_some_and(|value| !matches!(value, crate::attributes::AttributeValue::Null | crate::attributes::AttributeValue::Boolean(false)))
}

/// Splits a document Delta into [`Line`]s at `\n` boundaries.
///
/// Every `\n` ends a line, including ones embedded mid-insert. The one
/// exception: a blank line (nothing inserted yet since the previous
/// boundary) whose closing newline carries a `code-block` attribute keeps a
/// literal `"\n"` as its content instead of an empty delta — `<pre>`-style
/// rendering needs that character present to reproduce the blank line,
/// unlike block attributes such as `header` or `list` that don't. A trailing
/// partial line with no closing newline (the document doesn't end in `\n`)
/// is still emitted, with `attributes: None`.
pub fn line_iterator(document: &Delta) -> Vec<Line> {
    if document.ops().is_empty() {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line_ops: Vec<Op> = Vec::new();
    let mut line_start = 0usize;
    let mut index = 0usize;

    for op in document.ops() {
        match op {
            Op::Insert { text, attributes } => {
                let mut rest = text.as_str();
                loop {
                    match rest.find('\n') {
                        None => {
                            if !rest.is_empty() {
                                line_ops.push(Op::Insert {
                                    text: rest.to_string(),
                                    attributes: attributes.clone(),
                                });
                                index += rest.encode_utf16().count();
                            }
                            break;
                        }
                        Some(pos) if pos == 0 && line_ops.is_empty() && is_code_block(attributes) => {
                            lines.push(Line {
                                delta: Delta::new().insert("\n", None),
                                attributes: attributes.clone(),
                                index: line_start,
                            });
                            index += 1;
                            line_start = index;
                            rest = &rest[pos + 1..];
                        }
                        Some(pos) => {
                            let head = &rest[..pos];
                            if !head.is_empty() {
                                line_ops.push(Op::Insert {
                                    text: head.to_string(),
                                    attributes: attributes.clone(),
                                });
                                index += head.encode_utf16().count();
                            }
                            lines.push(Line {
                                delta: Delta::from_ops(std::mem::take(&mut line_ops)),
                                attributes: attributes.clone(),
                                index: line_start,
                            });
                            index += 1;
                            line_start = index;
                            rest = &rest[pos + 1..];
                        }
                    }
                }
            }
            Op::InsertEmbed { .. } => {
                line_ops.push(op.clone());
                index += op.length();
            }
            _ => {
                // Non-insert ops don't occur in a document Delta; ignored
                // defensively rather than treated as a line boundary.
            }
        }
    }

    if !line_ops.is_empty() || lines.is_empty() || line_start < index {
        lines.push(Line {
            delta: Delta::from_ops(line_ops),
            attributes: None,
            index: line_start,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;
    use std::collections::BTreeMap;

    #[test]
    fn splits_plain_lines() {
        let doc = Delta::new().insert("Hello\nWorld\n", None);
        let lines = line_iterator(&doc);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].delta.document().unwrap(), "Hello");
        assert_eq!(lines[1].delta.document().unwrap(), "World");
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 6);
    }

    #[test]
    fn trailing_content_without_newline_is_its_own_line() {
        let doc = Delta::new().insert("Hello\nWorld", None);
        let lines = line_iterator(&doc);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].delta.document().unwrap(), "World");
        assert!(lines[1].attributes.is_none());
    }

    #[test]
    fn newline_carries_block_attributes() {
        let mut header = BTreeMap::new();
        header.insert("header".to_string(), AttributeValue::Number(1));

        let doc = Delta::new()
            .insert("Title", None)
            .insert("\n", Some(header.clone()));
        let lines = line_iterator(&doc);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].delta.document().unwrap(), "Title");
        assert_eq!(lines[0].attributes, Some(header));
    }

    #[test]
    fn embeds_belong_to_their_line() {
        let doc = Delta::new()
            .insert_embed("image".to_string(), serde_json::json!("a.png"), None)
            .insert("\n", None);
        let lines = line_iterator(&doc);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].delta.ops().len(), 1);
    }

    #[test]
    fn empty_document_has_no_lines() {
        let doc = Delta::new();
        assert!(line_iterator(&doc).is_empty());
    }

    #[test]
    fn blank_code_block_line_keeps_a_literal_newline() {
        let mut code_block = BTreeMap::new();
        code_block.insert("code-block".to_string(), AttributeValue::Boolean(true));

        let doc = Delta::new()
            .insert("fn main() {}", None)
            .insert("\n\n}", Some(code_block.clone()));
        let lines = line_iterator(&doc);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].delta.document().unwrap(), "fn main() {}");
        assert_eq!(lines[1].delta.document().unwrap(), "\n");
        assert_eq!(lines[1].attributes, Some(code_block.clone()));
        assert_eq!(lines[2].delta.document().unwrap(), "}");
    }

    #[test]
    fn non_code_block_blank_line_stays_empty() {
        let mut header = BTreeMap::new();
        header.insert("header".to_string(), AttributeValue::Number(1));

        let doc = Delta::new().insert("Title", None).insert("\n\n", Some(header.clone()));
        let lines = line_iterator(&doc);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].delta.document().unwrap(), "Title");
        assert_eq!(lines[1].delta.ops().len(), 0);
        assert_eq!(lines[1].attributes, Some(header));
    }
}
