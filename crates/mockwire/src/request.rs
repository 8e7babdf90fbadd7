//! Request descriptor and its encoding into the stub server's wire format.

use crate::error::EncodeError;
use crate::matching::{ParamMatcher, UrlMatcher};
use crate::multi::MultiParamMatcher;
use crate::multipart::MultipartPattern;
use serde::ser::{Error as _, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Credentials the request must present through HTTP basic auth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BasicAuthCredentials {
    pub username: String,
    pub password: String,
}

/// The part of a stub describing which HTTP requests it matches.
///
/// Built with consuming `with_*` calls; clone a request to derive variants.
///
/// ```
/// use mockwire::{contains, equal_to, url_path_equal_to, Request};
///
/// let request = Request::new("GET", url_path_equal_to("/things"))
///     .with_query_param("id", equal_to("42"))
///     .with_header("Accept", contains("json"));
///
/// let json = request.to_json().unwrap();
/// assert!(!json.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    url_matcher: UrlMatcher,
    headers: BTreeMap<String, MultiParamMatcher>,
    query_params: BTreeMap<String, MultiParamMatcher>,
    cookies: BTreeMap<String, ParamMatcher>,
    body_patterns: Vec<ParamMatcher>,
    multipart_patterns: Vec<MultipartPattern>,
    basic_auth: Option<BasicAuthCredentials>,
}

impl Request {
    /// Minimal request: an HTTP method and a URL matcher.
    pub fn new(method: impl Into<String>, url_matcher: UrlMatcher) -> Self {
        Self {
            method: method.into(),
            url_matcher,
            headers: BTreeMap::new(),
            query_params: BTreeMap::new(),
            cookies: BTreeMap::new(),
            body_patterns: Vec::new(),
            multipart_patterns: Vec::new(),
            basic_auth: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_url_matched(mut self, url_matcher: UrlMatcher) -> Self {
        self.url_matcher = url_matcher;
        self
    }

    /// Append a body pattern.
    pub fn with_body_pattern(mut self, matcher: ParamMatcher) -> Self {
        self.body_patterns.push(matcher);
        self
    }

    /// Append a multipart pattern.
    pub fn with_multipart_pattern(mut self, pattern: MultipartPattern) -> Self {
        self.multipart_patterns.push(pattern);
        self
    }

    /// Set basic auth credentials, replacing any earlier pair.
    pub fn with_basic_auth(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some(BasicAuthCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_query_param(self, param: impl Into<String>, matcher: ParamMatcher) -> Self {
        self.with_query_params(param, matcher.into())
    }

    pub fn with_query_params(
        mut self,
        param: impl Into<String>,
        matcher: MultiParamMatcher,
    ) -> Self {
        self.query_params.insert(param.into(), matcher);
        self
    }

    pub fn with_header(self, header: impl Into<String>, matcher: ParamMatcher) -> Self {
        self.with_headers(header, matcher.into())
    }

    pub fn with_headers(mut self, header: impl Into<String>, matcher: MultiParamMatcher) -> Self {
        self.headers.insert(header.into(), matcher);
        self
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>, matcher: ParamMatcher) -> Self {
        self.cookies.insert(cookie.into(), matcher);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url_matcher(&self) -> &UrlMatcher {
        &self.url_matcher
    }

    pub fn headers(&self) -> &BTreeMap<String, MultiParamMatcher> {
        &self.headers
    }

    pub fn query_params(&self) -> &BTreeMap<String, MultiParamMatcher> {
        &self.query_params
    }

    pub fn cookies(&self) -> &BTreeMap<String, ParamMatcher> {
        &self.cookies
    }

    pub fn body_patterns(&self) -> &[ParamMatcher] {
        &self.body_patterns
    }

    pub fn multipart_patterns(&self) -> &[MultipartPattern] {
        &self.multipart_patterns
    }

    pub fn basic_auth(&self) -> Option<&BasicAuthCredentials> {
        self.basic_auth.as_ref()
    }

    /// Build the wire document.
    ///
    /// Sections are emitted in a fixed order (method, URL, bodyPatterns,
    /// multipartPatterns, headers, cookies, queryParameters,
    /// basicAuthCredentials) and empty sections are left out.
    pub fn to_value(&self) -> Result<Value, EncodeError> {
        debug!(
            method = %self.method,
            url = %self.url_matcher.strategy(),
            headers = self.headers.len(),
            query_params = self.query_params.len(),
            cookies = self.cookies.len(),
            body_patterns = self.body_patterns.len(),
            multipart_patterns = self.multipart_patterns.len(),
            basic_auth = self.basic_auth.is_some(),
            "encoding request"
        );

        let mut doc = Map::new();
        doc.insert("method".to_string(), Value::String(self.method.clone()));
        doc.insert(
            self.url_matcher.strategy().key().to_string(),
            Value::String(self.url_matcher.value().to_string()),
        );

        if !self.body_patterns.is_empty() {
            doc.insert(
                "bodyPatterns".to_string(),
                encode_list("bodyPatterns", &self.body_patterns)?,
            );
        }
        if !self.multipart_patterns.is_empty() {
            doc.insert(
                "multipartPatterns".to_string(),
                encode_list("multipartPatterns", &self.multipart_patterns)?,
            );
        }
        if !self.headers.is_empty() {
            doc.insert("headers".to_string(), encode_named("headers", &self.headers)?);
        }
        if !self.cookies.is_empty() {
            doc.insert("cookies".to_string(), encode_named("cookies", &self.cookies)?);
        }
        if !self.query_params.is_empty() {
            doc.insert(
                "queryParameters".to_string(),
                encode_named("queryParameters", &self.query_params)?,
            );
        }
        if let Some(credentials) = &self.basic_auth {
            let value = serde_json::to_value(credentials)
                .map_err(|e| EncodeError::section("basicAuthCredentials", e))?;
            doc.insert("basicAuthCredentials".to_string(), value);
        }

        Ok(Value::Object(doc))
    }

    /// Wire document as compact JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, EncodeError> {
        Ok(serde_json::to_vec(&self.to_value()?)?)
    }

    /// Wire document as compact JSON text.
    pub fn to_json_string(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string(&self.to_value()?)?)
    }

    /// Wire document as indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String, EncodeError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }
}

impl Serialize for Request {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value()
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

fn encode_list<T: Serialize>(section: &str, items: &[T]) -> Result<Value, EncodeError> {
    trace!(section, count = items.len(), "encoding list section");
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::to_value(item)
                .map_err(|e| EncodeError::section(format!("{section}[{i}]"), e))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn encode_named<T: Serialize>(
    section: &str,
    entries: &BTreeMap<String, T>,
) -> Result<Value, EncodeError> {
    trace!(section, count = entries.len(), "encoding named section");
    let mut out = Map::with_capacity(entries.len());
    for (name, matcher) in entries {
        let value = serde_json::to_value(matcher)
            .map_err(|e| EncodeError::section(format!("{section}.{name}"), e))?;
        out.insert(name.clone(), value);
    }
    Ok(Value::Object(out))
}
