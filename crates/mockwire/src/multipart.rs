//! Patterns for the parts of a multipart request body.

use crate::matching::{contains, ParamMatcher};
use crate::multi::MultiParamMatcher;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// Whether any part or every part of the body must match the pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MultipartMatchingType {
    #[default]
    Any,
    All,
}

impl MultipartMatchingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MultipartMatchingType::Any => "ANY",
            MultipartMatchingType::All => "ALL",
        }
    }
}

impl fmt::Display for MultipartMatchingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pattern for one part of a multipart body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPattern {
    matching_type: MultipartMatchingType,
    headers: BTreeMap<String, MultiParamMatcher>,
    body_patterns: Vec<ParamMatcher>,
}

impl MultipartPattern {
    /// Empty pattern matching `ANY` part.
    pub fn new() -> Self {
        Self::default()
    }

    /// Match the part by its form field name through `Content-Disposition`.
    pub fn with_name(self, name: &str) -> Self {
        self.with_header(CONTENT_DISPOSITION, contains(format!("name=\"{name}\"")))
    }

    pub fn with_matching_type(mut self, matching_type: MultipartMatchingType) -> Self {
        self.matching_type = matching_type;
        self
    }

    pub fn with_all_matching_type(self) -> Self {
        self.with_matching_type(MultipartMatchingType::All)
    }

    pub fn with_any_matching_type(self) -> Self {
        self.with_matching_type(MultipartMatchingType::Any)
    }

    pub fn with_body_pattern(mut self, matcher: ParamMatcher) -> Self {
        self.body_patterns.push(matcher);
        self
    }

    pub fn with_header(self, header: impl Into<String>, matcher: ParamMatcher) -> Self {
        self.with_headers(header, matcher.into())
    }

    pub fn with_headers(mut self, header: impl Into<String>, matcher: MultiParamMatcher) -> Self {
        self.headers.insert(header.into(), matcher);
        self
    }

    pub fn matching_type(&self) -> MultipartMatchingType {
        self.matching_type
    }

    pub fn headers(&self) -> &BTreeMap<String, MultiParamMatcher> {
        &self.headers
    }

    pub fn body_patterns(&self) -> &[ParamMatcher] {
        &self.body_patterns
    }
}

impl Serialize for MultipartPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("matchingType", self.matching_type.as_str())?;
        if !self.headers.is_empty() {
            map.serialize_entry("headers", &self.headers)?;
        }
        if !self.body_patterns.is_empty() {
            map.serialize_entry("bodyPatterns", &self.body_patterns)?;
        }
        map.end()
    }
}
