//! Request definitions loaded from YAML or JSON files.
//!
//! A definition describes a request the same way the builder does, with each
//! matcher written as a single-key map:
//!
//! ```yaml
//! method: GET
//! url:
//!   urlPath: /things
//! headers:
//!   Accept:
//!     contains: json
//!   X-Ids:
//!     includes:
//!       - equalTo: a
//!       - equalTo: b
//! queryParameters:
//!   id:
//!     equalTo: "42"
//! ```

use crate::error::DefinitionError;
use crate::matching::{self, EqualFlag, ParamMatcher, UrlMatchStrategy, UrlMatcher};
use crate::multi::{having_exactly, including, MultiParamMatcher};
use crate::multipart::{MultipartMatchingType, MultipartPattern};
use crate::request::Request;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Top-level request definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestDefinition {
    pub method: String,
    pub url: UrlDefinition,
    #[serde(default)]
    pub headers: BTreeMap<String, FieldDefinition>,
    #[serde(default, alias = "queryParams")]
    pub query_parameters: BTreeMap<String, FieldDefinition>,
    #[serde(default)]
    pub cookies: BTreeMap<String, MatcherDefinition>,
    #[serde(default)]
    pub body_patterns: Vec<MatcherDefinition>,
    #[serde(default)]
    pub multipart_patterns: Vec<MultipartDefinition>,
    #[serde(default, alias = "basicAuthCredentials")]
    pub basic_auth: Option<BasicAuthDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrlDefinition {
    Url(String),
    UrlPath(String),
    UrlPathPattern(String),
    UrlPattern(String),
}

impl From<UrlDefinition> for UrlMatcher {
    fn from(def: UrlDefinition) -> Self {
        match def {
            UrlDefinition::Url(v) => UrlMatcher::new(UrlMatchStrategy::Url, v),
            UrlDefinition::UrlPath(v) => UrlMatcher::new(UrlMatchStrategy::UrlPath, v),
            UrlDefinition::UrlPathPattern(v) => {
                UrlMatcher::new(UrlMatchStrategy::UrlPathPattern, v)
            }
            UrlDefinition::UrlPattern(v) => UrlMatcher::new(UrlMatchStrategy::UrlPattern, v),
        }
    }
}

/// A single-value matcher.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatcherDefinition {
    EqualTo(String),
    EqualToIgnoreCase(String),
    Matches(String),
    Contains(String),
    EqualToXml(String),
    EqualToJson(JsonEqualityDefinition),
    #[serde(rename = "matchesXPath")]
    MatchesXPath(String),
    MatchesJsonPath(String),
    DoesNotMatch(String),
    /// The flag value is ignored; `absent` always means "not present".
    Absent(bool),
}

impl From<MatcherDefinition> for ParamMatcher {
    fn from(def: MatcherDefinition) -> Self {
        match def {
            MatcherDefinition::EqualTo(v) => matching::equal_to(v),
            MatcherDefinition::EqualToIgnoreCase(v) => matching::equal_to_ignore_case(v),
            MatcherDefinition::Matches(v) => matching::matching(v),
            MatcherDefinition::Contains(v) => matching::contains(v),
            MatcherDefinition::EqualToXml(v) => matching::equal_to_xml(v),
            MatcherDefinition::EqualToJson(def) => {
                let (json, flags) = def.into_parts();
                matching::equal_to_json(json, &flags)
            }
            MatcherDefinition::MatchesXPath(v) => matching::matching_xpath(v),
            MatcherDefinition::MatchesJsonPath(v) => matching::matching_json_path(v),
            MatcherDefinition::DoesNotMatch(v) => matching::not_matching(v),
            MatcherDefinition::Absent(_) => matching::absent(),
        }
    }
}

/// `equalToJson` written either as plain text or with relaxation flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JsonEqualityDefinition {
    Plain(String),
    #[serde(rename_all = "camelCase")]
    Relaxed {
        json: String,
        #[serde(default)]
        ignore_array_order: bool,
        #[serde(default)]
        ignore_extra_elements: bool,
    },
}

impl JsonEqualityDefinition {
    fn into_parts(self) -> (String, Vec<EqualFlag>) {
        match self {
            JsonEqualityDefinition::Plain(json) => (json, Vec::new()),
            JsonEqualityDefinition::Relaxed {
                json,
                ignore_array_order,
                ignore_extra_elements,
            } => {
                let mut flags = Vec::new();
                if ignore_array_order {
                    flags.push(EqualFlag::IgnoreArrayOrder);
                }
                if ignore_extra_elements {
                    flags.push(EqualFlag::IgnoreExtraElements);
                }
                (json, flags)
            }
        }
    }
}

/// Set-oriented matcher over a multi-valued field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MultiMatcherDefinition {
    Includes(Vec<MatcherDefinition>),
    HasExactly(Vec<MatcherDefinition>),
}

/// Header or query parameter matcher: single or multi.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldDefinition {
    Multi(MultiMatcherDefinition),
    Single(MatcherDefinition),
}

impl From<FieldDefinition> for MultiParamMatcher {
    fn from(def: FieldDefinition) -> Self {
        match def {
            FieldDefinition::Single(single) => ParamMatcher::from(single).into(),
            FieldDefinition::Multi(MultiMatcherDefinition::Includes(values)) => {
                including(values.into_iter().map(ParamMatcher::from))
            }
            FieldDefinition::Multi(MultiMatcherDefinition::HasExactly(values)) => {
                having_exactly(values.into_iter().map(ParamMatcher::from))
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MultipartDefinition {
    /// Form field name, matched through `Content-Disposition`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub matching_type: MultipartMatchingType,
    #[serde(default)]
    pub headers: BTreeMap<String, FieldDefinition>,
    #[serde(default)]
    pub body_patterns: Vec<MatcherDefinition>,
}

impl From<MultipartDefinition> for MultipartPattern {
    fn from(def: MultipartDefinition) -> Self {
        let mut pattern = MultipartPattern::new().with_matching_type(def.matching_type);
        if let Some(name) = &def.name {
            pattern = pattern.with_name(name);
        }
        for (header, field) in def.headers {
            pattern = pattern.with_headers(header, field.into());
        }
        for body in def.body_patterns {
            pattern = pattern.with_body_pattern(body.into());
        }
        pattern
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BasicAuthDefinition {
    pub username: String,
    pub password: String,
}

impl RequestDefinition {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DefinitionError> {
        parse_yaml(yaml, None)
    }

    pub fn from_json_str(json: &str) -> Result<Self, DefinitionError> {
        parse_json(json, None)
    }

    /// Build the request through the fluent builder.
    pub fn into_request(self) -> Request {
        let mut request = Request::new(self.method, self.url.into());
        for (header, field) in self.headers {
            request = request.with_headers(header, field.into());
        }
        for (param, field) in self.query_parameters {
            request = request.with_query_params(param, field.into());
        }
        for (cookie, matcher) in self.cookies {
            request = request.with_cookie(cookie, matcher.into());
        }
        for body in self.body_patterns {
            request = request.with_body_pattern(body.into());
        }
        for multipart in self.multipart_patterns {
            request = request.with_multipart_pattern(multipart.into());
        }
        if let Some(auth) = self.basic_auth {
            request = request.with_basic_auth(auth.username, auth.password);
        }
        request
    }
}

/// Load a definition file, choosing the format from its extension.
pub fn load_definition(path: &Path) -> Result<RequestDefinition, DefinitionError> {
    let format = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml") | Some("yml") => Format::Yaml,
        Some("json") => Format::Json,
        _ => return Err(DefinitionError::UnsupportedFormat(path.to_path_buf())),
    };

    let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), bytes = content.len(), "loading request definition");

    match format {
        Format::Yaml => parse_yaml(&content, Some(path)),
        Format::Json => parse_json(&content, Some(path)),
    }
}

enum Format {
    Yaml,
    Json,
}

// serde_yaml only reads externally tagged enums from `!tag` syntax, so the
// document goes through a JSON value to accept the `{variant: value}` form.
fn parse_yaml(yaml: &str, path: Option<&Path>) -> Result<RequestDefinition, DefinitionError> {
    let value: serde_json::Value =
        serde_yaml::from_str(yaml).map_err(|source| DefinitionError::Yaml {
            path: path.map(Path::to_path_buf),
            source,
        })?;
    serde_json::from_value(value).map_err(|source| DefinitionError::Invalid {
        path: path.map(Path::to_path_buf),
        source,
    })
}

fn parse_json(json: &str, path: Option<&Path>) -> Result<RequestDefinition, DefinitionError> {
    serde_json::from_str(json).map_err(|source| DefinitionError::Invalid {
        path: path.map(Path::to_path_buf),
        source,
    })
}
