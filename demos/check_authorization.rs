//! Drives the probe end to end against a mocked authorization backend: an ALLOW decision, a DENY
//! decision carried on HTTP 403, and a server error surfaced as a request failure.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use authz_probe::{
	auth::BearerToken,
	check::{HttpMethod, ReqwestProbe},
	render,
	session::TesterSession,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize").json_body(json!({
				"access_token": "demo-access-token",
				"method": "GET",
				"path": "/transactions",
			}));
			then.status(200).header("content-type", "application/json").body(
				r#"{"decision":"ALLOW","user_id":"user-123","reason":"owner of /transactions","matched_permissions":[{"action":"read","resource":"/transactions","effect":"allow"}]}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize").json_body(json!({
				"access_token": "demo-access-token",
				"method": "DELETE",
				"path": "/wallets/wallet-789",
			}));
			then.status(403).header("content-type", "application/json").body(
				r#"{"decision":"DENY","user_id":"user-123","reason":"no delete grant on /wallets","matched_permissions":[]}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/authorize").json_body(json!({
				"access_token": "demo-access-token",
				"method": "POST",
				"path": "/accounts",
			}));
			then.status(500)
				.header("content-type", "application/json")
				.body(r#"{"error":{"message":"policy engine unavailable"}}"#);
		})
		.await;

	let probe = ReqwestProbe::from_base_url(&Url::parse(&server.base_url())?)?;
	let session = TesterSession::new();

	// In a real deployment the token comes from `IdentityBroker::exchange_code` after the login
	// redirect returns.
	session.adopt_token(BearerToken::new("demo-access-token"));

	println!("Access token: {}.", render::render_token_panel(session.token().as_ref()));

	let allow = session.submit(&probe, HttpMethod::Get, "/transactions").await?;

	println!("\n{}", render::render_decision(&allow));

	let deny = session.submit(&probe, HttpMethod::Delete, "/wallets/wallet-789").await?;

	println!("\n{}", render::render_decision(&deny));

	if let Err(err) = session.submit(&probe, HttpMethod::Post, "/accounts").await {
		println!("\n{err}");
	}

	Ok(())
}
