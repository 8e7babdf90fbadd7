//! Matcher value types for request fields and the request target.
//!
//! Every matcher pairs a strategy (serialized as its wire key) with a string
//! value. Structured content such as XML, JSON or regular expressions is
//! carried as opaque text; the stub server is the one that interprets it.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

/// Strategy used to compare a request field with an expected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStrategy {
    EqualTo,
    Matches,
    Contains,
    EqualToXml,
    EqualToJson,
    MatchesXPath,
    MatchesJsonPath,
    Absent,
    DoesNotMatch,
    HasExactly,
    Includes,
}

impl MatchStrategy {
    /// Wire key of this strategy.
    pub fn key(&self) -> &'static str {
        match self {
            MatchStrategy::EqualTo => "equalTo",
            MatchStrategy::Matches => "matches",
            MatchStrategy::Contains => "contains",
            MatchStrategy::EqualToXml => "equalToXml",
            MatchStrategy::EqualToJson => "equalToJson",
            MatchStrategy::MatchesXPath => "matchesXPath",
            MatchStrategy::MatchesJsonPath => "matchesJsonPath",
            MatchStrategy::Absent => "absent",
            MatchStrategy::DoesNotMatch => "doesNotMatch",
            MatchStrategy::HasExactly => "hasExactly",
            MatchStrategy::Includes => "includes",
        }
    }

    /// Wire value for `value` under this strategy.
    ///
    /// `absent` is a sentinel and always encodes as `true`, whatever value the
    /// matcher carries.
    pub(crate) fn wire_value(&self, value: &str) -> Value {
        match self {
            MatchStrategy::Absent => Value::Bool(true),
            _ => Value::String(value.to_string()),
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Strategy used to match the request target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UrlMatchStrategy {
    /// Exact URL including the query string.
    Url,
    /// Exact path.
    UrlPath,
    /// Regular expression over the path.
    UrlPathPattern,
    /// Regular expression over the full URL.
    UrlPattern,
}

impl UrlMatchStrategy {
    /// Wire key of this strategy.
    pub fn key(&self) -> &'static str {
        match self {
            UrlMatchStrategy::Url => "url",
            UrlMatchStrategy::UrlPath => "urlPath",
            UrlMatchStrategy::UrlPathPattern => "urlPathPattern",
            UrlMatchStrategy::UrlPattern => "urlPattern",
        }
    }
}

impl fmt::Display for UrlMatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Less strict comparison modes for `equalToJson`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualFlag {
    IgnoreArrayOrder,
    IgnoreExtraElements,
}

impl EqualFlag {
    /// Wire key of this flag.
    pub fn key(&self) -> &'static str {
        match self {
            EqualFlag::IgnoreArrayOrder => "ignoreArrayOrder",
            EqualFlag::IgnoreExtraElements => "ignoreExtraElements",
        }
    }
}

/// Behavioral flags attached to a matcher.
///
/// Each set flag is written as a boolean sibling of the strategy key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MatchFlags {
    pub case_insensitive: bool,
    pub ignore_array_order: bool,
    pub ignore_extra_elements: bool,
}

impl MatchFlags {
    /// Flags built from a list of JSON equality modes.
    pub fn from_equal_flags(flags: &[EqualFlag]) -> Self {
        let mut out = Self::default();
        for flag in flags {
            out.set(*flag);
        }
        out
    }

    /// Turn on a JSON equality mode.
    pub fn set(&mut self, flag: EqualFlag) {
        match flag {
            EqualFlag::IgnoreArrayOrder => self.ignore_array_order = true,
            EqualFlag::IgnoreExtraElements => self.ignore_extra_elements = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.case_insensitive && !self.ignore_array_order && !self.ignore_extra_elements
    }

    /// Wire keys of the flags that are set, in a fixed order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            ("caseInsensitive", self.case_insensitive),
            (EqualFlag::IgnoreArrayOrder.key(), self.ignore_array_order),
            (EqualFlag::IgnoreExtraElements.key(), self.ignore_extra_elements),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
    }
}

/// Matcher for the request target (path or full URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMatcher {
    strategy: UrlMatchStrategy,
    value: String,
}

impl UrlMatcher {
    pub fn new(strategy: UrlMatchStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
        }
    }

    pub fn strategy(&self) -> UrlMatchStrategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Match the exact URL, query string included.
pub fn url_equal_to(url: impl Into<String>) -> UrlMatcher {
    UrlMatcher::new(UrlMatchStrategy::Url, url)
}

/// Match the exact path, ignoring the query string.
pub fn url_path_equal_to(path: impl Into<String>) -> UrlMatcher {
    UrlMatcher::new(UrlMatchStrategy::UrlPath, path)
}

/// Match the path against a regular expression.
pub fn url_path_matching(pattern: impl Into<String>) -> UrlMatcher {
    UrlMatcher::new(UrlMatchStrategy::UrlPathPattern, pattern)
}

/// Match the full URL against a regular expression.
pub fn url_matching(pattern: impl Into<String>) -> UrlMatcher {
    UrlMatcher::new(UrlMatchStrategy::UrlPattern, pattern)
}

/// Matcher for a single request field value (header, query parameter,
/// cookie or body).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamMatcher {
    strategy: MatchStrategy,
    value: String,
    flags: MatchFlags,
}

impl ParamMatcher {
    pub fn new(strategy: MatchStrategy, value: impl Into<String>) -> Self {
        Self {
            strategy,
            value: value.into(),
            flags: MatchFlags::default(),
        }
    }

    /// Replace the flags of this matcher.
    pub fn with_flags(mut self, flags: MatchFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    /// Wire value of this matcher, without flags.
    pub(crate) fn wire_value(&self) -> Value {
        self.strategy.wire_value(&self.value)
    }
}

/// Flat form: `{strategyKey: value, ...flags}`.
impl Serialize for ParamMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let flags: Vec<_> = self.flags.entries().collect();
        let mut map = serializer.serialize_map(Some(1 + flags.len()))?;
        map.serialize_entry(self.strategy.key(), &self.wire_value())?;
        for (key, value) in flags {
            map.serialize_entry(key, &value)?;
        }
        map.end()
    }
}

pub fn equal_to(value: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::EqualTo, value)
}

/// `equalTo` with `caseInsensitive: true`.
pub fn equal_to_ignore_case(value: impl Into<String>) -> ParamMatcher {
    equal_to(value).with_flags(MatchFlags {
        case_insensitive: true,
        ..MatchFlags::default()
    })
}

/// Regular expression match. The pattern is not compiled or checked.
pub fn matching(pattern: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::Matches, pattern)
}

pub fn contains(value: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::Contains, value)
}

pub fn equal_to_xml(xml: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::EqualToXml, xml)
}

/// JSON equality, optionally relaxed by `flags`.
pub fn equal_to_json(json: impl Into<String>, flags: &[EqualFlag]) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::EqualToJson, json)
        .with_flags(MatchFlags::from_equal_flags(flags))
}

pub fn matching_xpath(xpath: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::MatchesXPath, xpath)
}

pub fn matching_json_path(json_path: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::MatchesJsonPath, json_path)
}

/// Negated regular expression match.
pub fn not_matching(pattern: impl Into<String>) -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::DoesNotMatch, pattern)
}

/// The field must not be present. Encodes as `{"absent": true}`.
pub fn absent() -> ParamMatcher {
    ParamMatcher::new(MatchStrategy::Absent, "")
}
