//! Cross-cutting configuration for the Delta algebra
//!
//! Most of the library has no configuration surface at all: the canonical
//! form is fixed by the algebra. The one knob that does exist is collected
//! here instead of a stray boolean parameter, and is threaded explicitly
//! through every [`crate::delta::Delta`] method that reads ops via
//! [`crate::op_iterator::OpIterator`] (`compose_with`, `transform_with`,
//! `invert_with`, `diff_with_config`, `slice_with_config`,
//! `transform_position_with_config`) — there is no ambient global state.

/// Tunable behavior shared by [`crate::op_iterator::OpIterator`] and, through
/// it, every [`crate::delta::Delta`] algebraic method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaConfig {
    /// When true (the default), [`crate::op_iterator::OpIterator::next`]
    /// strips a `color` attribute value of `"unset"` or `"windowtext"` from
    /// the op it returns. This mirrors a quirk of an upstream HTML source
    /// that emits those values instead of omitting the attribute; ports that
    /// don't need to interoperate with that source can turn it off.
    pub strip_legacy_color_attrs: bool,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        Self {
            strip_legacy_color_attrs: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::Delta;
    use crate::embed::EmbedRegistry;
    use std::collections::BTreeMap;

    #[test]
    fn default_matches_upstream_behavior() {
        let config = DeltaConfig::default();
        assert!(config.strip_legacy_color_attrs);
    }

    #[test]
    fn compose_with_strips_legacy_color_when_enabled() {
        let mut legacy_color = BTreeMap::new();
        legacy_color.insert(
            "color".to_string(),
            crate::attributes::AttributeValue::String("windowtext".to_string()),
        );

        let base = Delta::new().insert("Hello", Some(legacy_color));
        let change = Delta::new().retain(5, None);

        let stripped = base
            .compose_with(&change, &EmbedRegistry::new(), &DeltaConfig::default())
            .unwrap();
        assert!(matches!(
            &stripped.ops()[0],
            crate::op::Op::Insert { attributes: None, .. }
        ));

        let config = DeltaConfig {
            strip_legacy_color_attrs: false,
        };
        let kept = base.compose_with(&change, &EmbedRegistry::new(), &config).unwrap();
        assert!(matches!(
            &kept.ops()[0],
            crate::op::Op::Insert { attributes: Some(_), .. }
        ));
    }
}
