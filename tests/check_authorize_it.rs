#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use authz_probe::{
	auth::BearerToken,
	check::{AuthorizationRequest, Decision, HttpMethod, ReqwestProbe},
	error::Error,
	url::Url,
};

const ALLOW_BODY: &str = r#"{"decision":"ALLOW","user_id":"u1","reason":"owner","matched_permissions":[{"action":"read","resource":"/transactions","effect":"allow"}]}"#;
const DENY_BODY: &str =
	r#"{"decision":"DENY","user_id":"u1","reason":"not owner","matched_permissions":[]}"#;

fn build_probe(server: &MockServer) -> ReqwestProbe {
	let base = Url::parse(&server.base_url()).expect("Mock base URL should parse successfully.");

	ReqwestProbe::from_base_url(&base).expect("Probe should build against the mock server.")
}

fn request(token: &str) -> AuthorizationRequest {
	AuthorizationRequest::new(BearerToken::new(token), HttpMethod::Get, "/transactions")
}

#[tokio::test]
async fn status_200_yields_allow_and_exactly_one_call() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/authorize")
				.header("content-type", "application/json")
				.json_body(json!({
					"access_token": "abc",
					"method": "GET",
					"path": "/transactions",
				}));
			then.status(200).header("content-type", "application/json").body(ALLOW_BODY);
		})
		.await;
	let probe = build_probe(&server);
	let response =
		probe.check(request("abc")).await.expect("200 with a decision body should succeed.");

	mock.assert_async().await;

	assert_eq!(response.decision, Decision::Allow);
	assert_eq!(response.user_id, "u1");
	assert_eq!(response.reason, "owner");
	assert_eq!(response.matched_permissions.len(), 1);
	assert_eq!(response.matched_permissions[0].resource, "/transactions");
}

#[tokio::test]
async fn status_403_yields_deny_not_an_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(403).header("content-type", "application/json").body(DENY_BODY);
		})
		.await;
	let probe = build_probe(&server);
	let response =
		probe.check(request("abc")).await.expect("403 with a decision body should succeed.");

	mock.assert_async().await;

	assert_eq!(response.decision, Decision::Deny);
	assert_eq!(response.reason, "not owner");
	assert!(response.matched_permissions.is_empty());
}

#[tokio::test]
async fn status_500_surfaces_the_descriptor_message() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"error":{"message":"internal"}}"#);
		})
		.await;
	let probe = build_probe(&server);
	let err = probe.check(request("abc")).await.expect_err("500 should be a request error.");

	mock.assert_async().await;

	assert_eq!(err.to_string(), "Request failed: internal");
	assert!(matches!(err, Error::Request { status: 500, .. }));
}

#[tokio::test]
async fn status_401_with_an_unhelpful_body_synthesizes_the_status_line() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(401).body("nope");
		})
		.await;
	let probe = build_probe(&server);
	let err = probe.check(request("abc")).await.expect_err("401 should be a request error.");

	mock.assert_async().await;

	assert_eq!(err.to_string(), "Request failed: HTTP 401: Unauthorized");
}

#[tokio::test]
async fn malformed_decision_body_is_a_parse_failure() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"decision":"ALLOW""#);
		})
		.await;
	let probe = build_probe(&server);
	let err =
		probe.check(request("abc")).await.expect_err("Malformed decision body should fail.");

	mock.assert_async().await;

	assert!(matches!(err, Error::ResponseParse { status: 200, .. }));
}

#[tokio::test]
async fn empty_token_short_circuits_without_any_network_call() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(200).header("content-type", "application/json").body(ALLOW_BODY);
		})
		.await;
	let probe = build_probe(&server);
	let err = probe.check(request("")).await.expect_err("Empty token should be rejected.");

	assert!(matches!(err, Error::MissingToken));
	assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn repeated_requests_against_unchanged_state_are_idempotent() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize");
			then.status(200).header("content-type", "application/json").body(ALLOW_BODY);
		})
		.await;
	let probe = build_probe(&server);
	let first =
		probe.check(request("abc")).await.expect("First submission should succeed.");
	let second =
		probe.check(request("abc")).await.expect("Second submission should succeed.");

	assert_eq!(first, second);
	assert_eq!(mock.hits_async().await, 2);
}
