//! Request-matching builders for WireMock-compatible stub servers.
//!
//! This library describes how a stub server should recognise an incoming HTTP
//! request (method, URL, headers, query parameters, cookies, body and
//! multipart patterns, basic auth) and encodes that description into the JSON
//! document the server's admin API expects. Matching itself happens on the
//! server; nothing here validates regular expressions, XPath or JSONPath.
//!
//! # Example
//!
//! ```
//! use mockwire::{contains, equal_to, including, url_equal_to, url_path_equal_to, Request};
//! use serde_json::json;
//!
//! let request = Request::new("GET", url_path_equal_to("/things"))
//!     .with_query_param("id", equal_to("42"))
//!     .with_header("Accept", contains("json"));
//!
//! assert_eq!(
//!     request.to_value().unwrap(),
//!     json!({
//!         "method": "GET",
//!         "urlPath": "/things",
//!         "headers": {"Accept": {"contains": "json"}},
//!         "queryParameters": {"id": {"equalTo": "42"}}
//!     })
//! );
//!
//! let request = Request::new("POST", url_equal_to("/x"))
//!     .with_headers("X-Ids", including([equal_to("a"), equal_to("b")]));
//! assert_eq!(
//!     request.to_value().unwrap()["headers"]["X-Ids"],
//!     json!({"includes": [{"equalTo": "a"}, {"equalTo": "b"}]})
//! );
//! ```

mod definition;
mod error;
mod matching;
mod multi;
mod multipart;
mod request;

pub use error::{DefinitionError, EncodeError};

pub use matching::{
    absent, contains, equal_to, equal_to_ignore_case, equal_to_json, equal_to_xml, matching,
    matching_json_path, matching_xpath, not_matching, url_equal_to, url_matching,
    url_path_equal_to, url_path_matching, EqualFlag, MatchFlags, MatchStrategy, ParamMatcher,
    UrlMatchStrategy, UrlMatcher,
};
pub use multi::{having_exactly, including, to_multi_param_matcher, MultiParamMatcher};
pub use multipart::{MultipartMatchingType, MultipartPattern};
pub use request::{BasicAuthCredentials, Request};

// Definition files (configuration layer used by the CLI)
pub use definition::{
    load_definition, BasicAuthDefinition, FieldDefinition, JsonEqualityDefinition,
    MatcherDefinition, MultiMatcherDefinition, MultipartDefinition, RequestDefinition,
    UrlDefinition,
};
