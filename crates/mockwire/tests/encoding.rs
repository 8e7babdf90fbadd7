//! End-to-end encoding tests for request descriptors.
//!
//! Documents are compared structurally, so key order does not matter here.

use assert_json_diff::assert_json_eq;
use mockwire::{
    absent, contains, equal_to, equal_to_ignore_case, equal_to_json, equal_to_xml, having_exactly,
    including, matching, matching_json_path, matching_xpath, not_matching, url_equal_to,
    url_matching, url_path_equal_to, url_path_matching, EqualFlag, MultipartPattern, Request,
};
use serde_json::{json, Value};

fn encode(request: &Request) -> Value {
    let bytes = request.to_json().expect("request should encode");
    serde_json::from_slice(&bytes).expect("encoded request should be valid JSON")
}

#[test]
fn test_query_and_header_example() {
    let request = Request::new("GET", url_path_equal_to("/things"))
        .with_query_param("id", equal_to("42"))
        .with_header("Accept", contains("json"));

    assert_json_eq!(
        encode(&request),
        json!({
            "method": "GET",
            "urlPath": "/things",
            "headers": {"Accept": {"contains": "json"}},
            "queryParameters": {"id": {"equalTo": "42"}}
        })
    );
}

#[test]
fn test_including_header_example() {
    let request = Request::new("POST", url_equal_to("/x"))
        .with_headers("X-Ids", including([equal_to("a"), equal_to("b")]));

    assert_json_eq!(
        encode(&request)["headers"]["X-Ids"],
        json!({"includes": [{"equalTo": "a"}, {"equalTo": "b"}]})
    );
}

#[test]
fn test_basic_auth_last_write_wins() {
    let request = Request::new("GET", url_equal_to("/secure"))
        .with_basic_auth("first", "one")
        .with_basic_auth("second", "two");

    assert_json_eq!(
        encode(&request),
        json!({
            "method": "GET",
            "url": "/secure",
            "basicAuthCredentials": {"username": "second", "password": "two"}
        })
    );
}

#[test]
fn test_empty_sections_are_omitted() {
    let doc = encode(&Request::new("HEAD", url_matching("/health.*")));
    let object = doc.as_object().unwrap();
    assert_eq!(object.len(), 2);
    for section in [
        "headers",
        "cookies",
        "queryParameters",
        "bodyPatterns",
        "multipartPatterns",
        "basicAuthCredentials",
    ] {
        assert!(!object.contains_key(section), "unexpected section {section}");
    }
}

#[test]
fn test_body_patterns_kept_in_call_order() {
    let request = Request::new("POST", url_path_matching("/api/.*"))
        .with_body_pattern(equal_to_json(
            r#"{"id":1,"tags":["a","b"]}"#,
            &[EqualFlag::IgnoreArrayOrder, EqualFlag::IgnoreExtraElements],
        ))
        .with_body_pattern(matching_json_path("$.tags[?(@ == 'a')]"))
        .with_body_pattern(equal_to_xml("<a/>"))
        .with_body_pattern(matching_xpath("//a"))
        .with_body_pattern(not_matching(".*secret.*"));

    assert_json_eq!(
        encode(&request),
        json!({
            "method": "POST",
            "urlPathPattern": "/api/.*",
            "bodyPatterns": [
                {
                    "equalToJson": "{\"id\":1,\"tags\":[\"a\",\"b\"]}",
                    "ignoreArrayOrder": true,
                    "ignoreExtraElements": true
                },
                {"matchesJsonPath": "$.tags[?(@ == 'a')]"},
                {"equalToXml": "<a/>"},
                {"matchesXPath": "//a"},
                {"doesNotMatch": ".*secret.*"}
            ]
        })
    );
}

#[test]
fn test_multipart_patterns_appended_verbatim() {
    let first = MultipartPattern::new().with_name("file");
    let second = MultipartPattern::new()
        .with_all_matching_type()
        .with_body_pattern(contains("hello"));

    let request = Request::new("POST", url_equal_to("/upload"))
        .with_multipart_pattern(first.clone())
        .with_multipart_pattern(second.clone());

    let doc = encode(&request);
    assert_json_eq!(
        doc["multipartPatterns"],
        json!([
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        ])
    );
}

#[test]
fn test_query_params_use_wire_key_and_dual_shape() {
    let request = Request::new("GET", url_path_equal_to("/search"))
        .with_query_param("q", equal_to_ignore_case("Rust"))
        .with_query_params("tag", having_exactly([equal_to("x"), matching("y.*")]))
        .with_query_param("debug", absent());

    let doc = encode(&request);
    assert!(doc.get("queryParams").is_none());
    assert_json_eq!(
        doc["queryParameters"],
        json!({
            "q": {"equalTo": "Rust", "caseInsensitive": true},
            "tag": {"hasExactly": [{"equalTo": "x"}, {"matches": "y.*"}]},
            "debug": {"absent": true}
        })
    );
}

#[test]
fn test_same_names_replace_previous_matchers() {
    let request = Request::new("GET", url_equal_to("/"))
        .with_header("Accept", equal_to("text/html"))
        .with_header("Accept", contains("json"))
        .with_query_param("page", equal_to("1"))
        .with_query_param("page", equal_to("2"))
        .with_cookie("id", equal_to("old"))
        .with_cookie("id", equal_to("new"));

    assert_json_eq!(
        encode(&request),
        json!({
            "method": "GET",
            "url": "/",
            "headers": {"Accept": {"contains": "json"}},
            "cookies": {"id": {"equalTo": "new"}},
            "queryParameters": {"page": {"equalTo": "2"}}
        })
    );
}

#[test]
fn test_contradictory_matchers_are_accepted() {
    let request = Request::new("GET", url_equal_to("/"))
        .with_headers("X-Empty", having_exactly(Vec::new()))
        .with_header("X-Gone", absent());

    assert_json_eq!(
        encode(&request)["headers"],
        json!({
            "X-Empty": {"hasExactly": []},
            "X-Gone": {"absent": true}
        })
    );
}

#[test]
fn test_encoding_is_deterministic() {
    let request = Request::new("PATCH", url_equal_to("/items/1"))
        .with_header("B", equal_to("2"))
        .with_header("A", equal_to("1"))
        .with_cookie("z", equal_to("z"))
        .with_cookie("a", equal_to("a"));

    let first = request.to_json().unwrap();
    let second = request.clone().to_json().unwrap();
    assert_eq!(first, second);
}
