//! Matchers over fields that can carry several values (repeated headers or
//! query parameters).

use crate::matching::{MatchFlags, MatchStrategy, ParamMatcher};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// One or more single matchers grouped under a set-oriented strategy.
///
/// A matcher holding exactly one value collapses to the flat form
/// `{strategy: value}` when encoded; otherwise it is written in nested-list
/// form `{strategy: [{subStrategy: subValue}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiParamMatcher {
    strategy: MatchStrategy,
    values: Vec<ParamMatcher>,
    flags: MatchFlags,
}

impl MultiParamMatcher {
    pub fn new(strategy: MatchStrategy, values: Vec<ParamMatcher>) -> Self {
        Self {
            strategy,
            values,
            flags: MatchFlags::default(),
        }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn values(&self) -> &[ParamMatcher] {
        &self.values
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    /// Value of the first sub-matcher, if any.
    pub fn first_value(&self) -> Option<&str> {
        self.values.first().map(ParamMatcher::value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether this matcher encodes in flat form.
    pub fn is_single_param(&self) -> bool {
        self.values.len() == 1
    }

    fn strategy_value(&self) -> Value {
        match self.values.as_slice() {
            [only] => self.strategy.wire_value(only.value()),
            values => Value::Array(
                values
                    .iter()
                    .map(|v| {
                        let mut entry = Map::with_capacity(1);
                        entry.insert(v.strategy().key().to_string(), v.wire_value());
                        Value::Object(entry)
                    })
                    .collect(),
            ),
        }
    }
}

/// Promote a single matcher into a one-element multi matcher with the same
/// strategy and flags.
impl From<ParamMatcher> for MultiParamMatcher {
    fn from(single: ParamMatcher) -> Self {
        Self {
            strategy: single.strategy(),
            flags: single.flags(),
            values: vec![single],
        }
    }
}

/// Same as `MultiParamMatcher::from`.
pub fn to_multi_param_matcher(single: ParamMatcher) -> MultiParamMatcher {
    single.into()
}

/// The field must carry each of `values`, in any order, among possibly others.
pub fn including(values: impl IntoIterator<Item = ParamMatcher>) -> MultiParamMatcher {
    MultiParamMatcher::new(MatchStrategy::Includes, values.into_iter().collect())
}

/// The field must carry exactly `values`, no more and no fewer.
pub fn having_exactly(values: impl IntoIterator<Item = ParamMatcher>) -> MultiParamMatcher {
    MultiParamMatcher::new(MatchStrategy::HasExactly, values.into_iter().collect())
}

/// Flags of the multi matcher are written next to the strategy key; inner
/// entries of the nested-list form never carry flags.
impl Serialize for MultiParamMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags: Vec<_> = self.flags.entries().collect();
        let mut map = serializer.serialize_map(Some(1 + flags.len()))?;
        map.serialize_entry(self.strategy.key(), &self.strategy_value())?;
        for (key, value) in flags {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::{absent, contains, equal_to, equal_to_ignore_case, matching};
    use serde_json::json;

    #[test]
    fn test_promotion_keeps_strategy_and_flags() {
        let multi = MultiParamMatcher::from(equal_to_ignore_case("abc"));
        assert_eq!(multi.strategy(), MatchStrategy::EqualTo);
        assert!(multi.flags().case_insensitive);
        assert!(multi.is_single_param());
        assert_eq!(multi.first_value(), Some("abc"));
    }

    #[test]
    fn test_promoted_encoding_matches_single() {
        for single in [equal_to_ignore_case("A"), contains("b"), absent(), matching("c+")] {
            let flat = serde_json::to_value(&single).unwrap();
            let promoted = serde_json::to_value(to_multi_param_matcher(single)).unwrap();
            assert_eq!(flat, promoted);
        }
    }

    #[test]
    fn test_including_two_values_nested() {
        let value = serde_json::to_value(including([equal_to("a"), equal_to("b")])).unwrap();
        assert_eq!(
            value,
            json!({"includes": [{"equalTo": "a"}, {"equalTo": "b"}]})
        );
    }

    #[test]
    fn test_having_exactly_single_value_collapses() {
        let value = serde_json::to_value(having_exactly([equal_to("only")])).unwrap();
        assert_eq!(value, json!({"hasExactly": "only"}));
    }

    #[test]
    fn test_nested_entries_drop_inner_flags() {
        let value = serde_json::to_value(including([
            equal_to_ignore_case("a"),
            contains("b"),
            absent(),
        ]))
        .unwrap();
        assert_eq!(
            value,
            json!({"includes": [{"equalTo": "a"}, {"contains": "b"}, {"absent": true}]})
        );
    }

    #[test]
    fn test_order_is_preserved() {
        let multi = having_exactly([equal_to("3"), equal_to("1"), equal_to("2")]);
        let values: Vec<_> = multi.values().iter().map(|v| v.value()).collect();
        assert_eq!(values, vec!["3", "1", "2"]);
        assert_eq!(multi.len(), 3);
        assert!(!multi.is_single_param());
    }

    #[test]
    fn test_empty_multi_encodes_empty_list() {
        let multi = having_exactly(Vec::new());
        assert!(multi.is_empty());
        assert_eq!(multi.first_value(), None);
        assert_eq!(
            serde_json::to_value(multi).unwrap(),
            json!({"hasExactly": []})
        );
    }
}
