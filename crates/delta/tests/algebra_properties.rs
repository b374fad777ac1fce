//! The algebra's quantified laws and literal scenarios, exercised end to end
//! through the public `Delta` surface rather than as unit tests alongside
//! each operation.

use quillai_delta::{AttributeMap, AttributeValue, Delta, DeltaConfig, DeltaError, EmbedHandler, EmbedRegistry, Op};
use serde_json::Value as JsonValue;

fn attrs(pairs: &[(&str, AttributeValue)]) -> AttributeMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

/// Panics if `delta` violates any of the three canonical-form invariants:
/// no adjacent mergeable ops, no delete directly before an insert, no
/// trailing bare retain.
fn assert_canonical(delta: &Delta) {
    let ops = delta.ops();
    for window in ops.windows(2) {
        match (&window[0], &window[1]) {
            (Op::Delete(_), Op::Delete(_)) => panic!("adjacent deletes were not merged: {ops:?}"),
            (Op::Insert { attributes: a1, .. }, Op::Insert { attributes: a2, .. }) if a1 == a2 => {
                panic!("adjacent inserts with equal attributes were not merged: {ops:?}")
            }
            (Op::Retain { attributes: a1, .. }, Op::Retain { attributes: a2, .. }) if a1 == a2 => {
                panic!("adjacent retains with equal attributes were not merged: {ops:?}")
            }
            (Op::Delete(_), Op::Insert { .. }) => {
                panic!("delete precedes insert; canonical order requires insert first: {ops:?}")
            }
            _ => {}
        }
    }
    if let Some(Op::Retain { attributes: None, .. }) = ops.last() {
        panic!("trailing bare retain was not chopped: {ops:?}");
    }
}

// --- S1-S6: literal scenarios from the spec -------------------------------

#[test]
fn s1_insert_in_middle() {
    let doc = Delta::new().insert("Hello", None);
    let change = Delta::new().retain(3, None).insert("X", None);
    let result = doc.compose(&change).unwrap();

    assert_canonical(&result);
    assert_eq!(result.document().unwrap(), "HelXlo");
}

#[test]
fn s2_insert_and_delete_reorder_to_the_same_result() {
    let doc = Delta::new().insert("Hello", None);

    let insert_then_delete = Delta::new().retain(3, None).insert("X", None).delete(1);
    let delete_then_insert = Delta::new().retain(3, None).delete(1).insert("X", None);

    let a = doc.compose(&insert_then_delete).unwrap();
    let b = doc.compose(&delete_then_insert).unwrap();

    assert_eq!(a.document().unwrap(), "HelXo");
    assert_eq!(b.document().unwrap(), "HelXo");
}

#[test]
fn s3_attribute_clear_drops_from_merged_insert() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);
    let clear_bold = attrs(&[("bold", AttributeValue::Null)]);

    let doc = Delta::new().insert("A", Some(bold));
    let change = Delta::new().retain(1, Some(clear_bold));
    let result = doc.compose(&change).unwrap();

    assert_canonical(&result);
    assert_eq!(result.ops().len(), 1);
    match &result.ops()[0] {
        Op::Insert { text, attributes } => {
            assert_eq!(text, "A");
            assert!(attributes.is_none());
        }
        other => panic!("expected insert, got {other:?}"),
    }
}

#[test]
fn s4_diff_reports_trailing_delete() {
    let a = Delta::new().insert("AB", None);
    let b = Delta::new().insert("A", None);
    let result = a.diff(&b).unwrap();

    assert_canonical(&result);
    assert_eq!(result.ops().len(), 2);
    assert!(matches!(
        result.ops()[0],
        Op::Retain { length: 1, attributes: None }
    ));
    assert!(matches!(result.ops()[1], Op::Delete(1)));
}

#[test]
fn s5_invert_law_holds_for_combined_attribute_and_embed_free_scenario() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);
    let italic = attrs(&[("italic", AttributeValue::Boolean(true))]);
    let bold_red = attrs(&[
        ("bold", AttributeValue::Boolean(true)),
        ("color", AttributeValue::String("red".to_string())),
    ]);

    let base = Delta::new()
        .insert("123", Some(bold.clone()))
        .insert("456", Some(italic.clone()))
        .insert("789", Some(bold_red.clone()));

    let delta = Delta::new()
        .retain(2, None)
        .delete(2)
        .insert("AB", Some(italic.clone()))
        .retain(
            2,
            Some(attrs(&[
                ("italic", AttributeValue::Null),
                ("bold", AttributeValue::Boolean(true)),
            ])),
        )
        .retain(2, Some(attrs(&[("color", AttributeValue::String("red".to_string()))])))
        .delete(1);

    let inverted = delta.invert(&base).unwrap();
    assert_canonical(&inverted);

    let modified = base.compose(&delta).unwrap();
    let restored = modified.compose(&inverted).unwrap();

    assert_eq!(restored.document().unwrap(), base.document().unwrap());
}

struct DeltaEmbedHandler;

impl DeltaEmbedHandler {
    fn registry() -> EmbedRegistry {
        let mut registry = EmbedRegistry::new();
        registry.register_embed("delta", Box::new(DeltaEmbedHandler));
        registry
    }

    fn parse(value: &JsonValue) -> Delta {
        let ops: Vec<Op> =
            serde_json::from_value(value.clone()).expect("nested delta embed must hold a valid op list");
        Delta::from_ops(ops)
    }

    fn render(delta: &Delta) -> JsonValue {
        serde_json::to_value(delta.ops()).expect("an op list is always serializable")
    }
}

impl EmbedHandler for DeltaEmbedHandler {
    fn compose(&self, a: &JsonValue, b: &JsonValue, _keep_null: bool) -> Result<JsonValue, DeltaError> {
        let composed = Self::parse(a).compose_with(&Self::parse(b), &Self::registry(), &DeltaConfig::default())?;
        Ok(Self::render(&composed))
    }

    fn invert(&self, delta: &JsonValue, base: &JsonValue) -> Result<JsonValue, DeltaError> {
        let inverted =
            Self::parse(delta).invert_with(&Self::parse(base), &Self::registry(), &DeltaConfig::default())?;
        Ok(Self::render(&inverted))
    }

    fn transform(&self, a: &JsonValue, b: &JsonValue, priority: bool) -> Result<JsonValue, DeltaError> {
        let transformed =
            Self::parse(a).transform_with(&Self::parse(b), priority, &Self::registry(), &DeltaConfig::default())?;
        Ok(Self::render(&transformed))
    }
}

#[test]
fn s6_embed_recursion_composes_nested_deltas() {
    let registry = DeltaEmbedHandler::registry();

    let a = Delta::new().insert_embed("delta".to_string(), serde_json::json!([{"insert": "a"}]), None);
    let b = Delta::new().retain_embed("delta".to_string(), serde_json::json!([{"insert": "b"}]), None);

    let composed = a.compose_with(&b, &registry, &DeltaConfig::default()).unwrap();
    assert_canonical(&composed);

    let embed = match &composed.ops()[0] {
        Op::InsertEmbed { embed, .. } => embed,
        other => panic!("expected insert_embed, got {other:?}"),
    };
    assert_eq!(embed.embed_type, "delta");
    assert_eq!(embed.data, serde_json::json!([{"insert": "ba"}]));
}

// --- Quantified laws (§8) --------------------------------------------------

#[test]
fn compose_is_associative_up_to_the_resulting_document() {
    let d = Delta::new().insert("Hello World", None);
    let a = Delta::new().retain(6, None).delete(5).insert("Rust", None);
    let b = Delta::new().retain(10, None).insert("!", None);
    let c = Delta::new().retain(11, None).insert("?", None);

    let left = d.compose(&a).unwrap().compose(&b).unwrap().compose(&c).unwrap();
    let right = d.compose(&a.compose(&b).unwrap().compose(&c).unwrap()).unwrap();

    assert_canonical(&left);
    assert_canonical(&right);
    assert_eq!(left.document().unwrap(), right.document().unwrap());
    assert_eq!(left.document().unwrap(), "Hello Rust!?");
}

#[test]
fn tp1_transform_commutes_for_two_concurrent_inserts() {
    let base = Delta::new().insert("Hello", None);
    let a = Delta::new().retain(5, None).insert(" World", None);
    let b = Delta::new().retain(5, None).insert("!", None);

    let left = base
        .compose(&a)
        .unwrap()
        .compose(&a.transform(&b, false).unwrap())
        .unwrap();
    let right = base
        .compose(&b)
        .unwrap()
        .compose(&b.transform(&a, true).unwrap())
        .unwrap();

    assert_canonical(&left);
    assert_canonical(&right);
    assert_eq!(left.document().unwrap(), right.document().unwrap());
    assert_eq!(left.document().unwrap(), "Hello! World");
}

#[test]
fn inputs_are_left_untouched_by_compose() {
    let a = Delta::new().insert("Hello", None);
    let b = Delta::new().retain(5, None).insert(" World", None);
    let a_before = a.clone();
    let b_before = b.clone();

    let _ = a.compose(&b).unwrap();

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn change_length_plus_base_length_equals_composed_length() {
    let base_doc = Delta::new().insert("Hello World", None);
    let change = Delta::new().retain(6, None).delete(5).insert("Rust!!", None);

    let composed = base_doc.compose(&change).unwrap();

    assert_eq!(
        change.change_length() + base_doc.length() as i64,
        composed.length() as i64
    );
}

// --- Additional scenarios carried over from the reference test corpus -----
// (see the reference implementation's own `test_compose.py`/`test_diff.py`)

#[test]
fn retain_start_optimization_consumes_leading_inserts_whole() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);

    let a = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold.clone()))
        .delete(1);
    let b = Delta::new().retain(3, None).insert("D", None);

    let expected = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold))
        .insert("D", None)
        .delete(1);

    assert_eq!(a.compose(&b).unwrap(), expected);
}

#[test]
fn retain_start_optimization_splits_a_partially_consumed_retain() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);

    let a = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold.clone()))
        .retain(5, None)
        .delete(1);
    let b = Delta::new().retain(4, None).insert("D", None);

    let expected = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold))
        .retain(1, None)
        .insert("D", None)
        .retain(4, None)
        .delete(1);

    assert_eq!(a.compose(&b).unwrap(), expected);
}

#[test]
fn retain_end_optimization_tails_off_into_the_remaining_inserts() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);

    let a = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold.clone()));
    let b = Delta::new().delete(1);

    let expected = Delta::new().insert("B", None).insert("C", Some(bold));

    assert_eq!(a.compose(&b).unwrap(), expected);
}

#[test]
fn retain_end_optimization_join_merges_across_the_deleted_gap() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);

    let a = Delta::new()
        .insert("A", Some(bold.clone()))
        .insert("B", None)
        .insert("C", Some(bold.clone()))
        .insert("D", None)
        .insert("E", Some(bold.clone()))
        .insert("F", None);
    let b = Delta::new().retain(1, None).delete(1);

    let expected = Delta::new()
        .insert("AC", Some(bold.clone()))
        .insert("D", None)
        .insert("E", Some(bold))
        .insert("F", None);

    assert_eq!(a.compose(&b).unwrap(), expected);
}

#[test]
fn diff_handles_mismatched_attribute_boundaries() {
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);
    let italic = attrs(&[("italic", AttributeValue::Boolean(true))]);
    let red = attrs(&[("color", AttributeValue::String("red".to_string()))]);

    let a = Delta::new().insert("12", Some(bold)).insert("34", Some(italic));
    let b = Delta::new().insert("123", Some(red));

    let result = a.diff(&b).unwrap();
    assert_canonical(&result);

    let expected = Delta::new()
        .retain(
            2,
            Some(attrs(&[
                ("bold", AttributeValue::Null),
                ("color", AttributeValue::String("red".to_string())),
            ])),
        )
        .retain(
            1,
            Some(attrs(&[
                ("italic", AttributeValue::Null),
                ("color", AttributeValue::String("red".to_string())),
            ])),
        )
        .delete(1);

    assert_eq!(result, expected);
}

#[test]
fn diff_of_differently_attributed_documents_round_trips_through_compose() {
    let red = attrs(&[("color", AttributeValue::String("red".to_string()))]);
    let blue = attrs(&[("color", AttributeValue::String("blue".to_string()))]);
    let bold = attrs(&[("bold", AttributeValue::Boolean(true))]);
    let italic = attrs(&[("italic", AttributeValue::Boolean(true))]);

    let a = Delta::new().insert("Bad", Some(red)).insert("cat", Some(blue));
    let b = Delta::new().insert("Good", Some(bold)).insert("dog", Some(italic));

    let diff = a.diff(&b).unwrap();
    assert_canonical(&diff);

    let composed = a.compose(&diff).unwrap();
    assert_eq!(composed.document().unwrap(), b.document().unwrap());
}

#[test]
fn diff_does_not_mistake_a_null_embed_render_for_a_matching_string() {
    let a = Delta::new().insert_embed("embed".to_string(), serde_json::json!(1), None);
    let b = Delta::new().insert("\0", None);

    let result = a.diff(&b).unwrap();
    let expected = Delta::new().insert("\0", None).delete(1);

    assert_eq!(result, expected);
}
