//! Walks through a login, a silent token refresh, and a forced logout against a mock backend.
//!
//! 1. Log in; the access token lands in the session and the refresh cookie in the transport jar.
//! 2. Call an endpoint that rejects the first token; the client refreshes once and retries.
//! 3. Let the refresh cookie expire; the next rejected call ends the session.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use planora_session::{
	api::ApiClient,
	config::ClientConfig,
	guard::{self, GuardDecision},
	resource::Resource,
	session::{Session, SessionChange},
	transport::ApiRequest,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.header("set-cookie", "refreshToken=demo-refresh; Path=/; HttpOnly")
				.body(r#"{"token":"T1","email":"ana@planora.io"}"#);
		})
		.await;
	let _stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/trips").header("authorization", "Bearer T1");
			then.status(401);
		})
		.await;
	let mut refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh").header("cookie", "refreshToken=demo-refresh");
			then.status(200).header("content-type", "application/json").body(r#"{"token":"T2"}"#);
		})
		.await;
	let _trips = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/trips").header("authorization", "Bearer T2");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"[{"id":1,"destination":"Lisbon"}]"#);
		})
		.await;
	let config = ClientConfig::builder(Url::parse(&server.base_url())?).build()?;
	let session = Arc::new(Session::new());
	let _subscription = session.subscribe(|change| match change {
		SessionChange::TokenSet => println!("Session stored a new token."),
		SessionChange::Cleared => println!("Session cleared; the user must log in again."),
	});
	let client = ApiClient::new(config, session.clone())?;

	client.login("ana@planora.io", "secret").await?;

	assert_eq!(guard::require_auth(&session), GuardDecision::Allow);

	let trips = client.fetch(ApiRequest::get(Resource::Trips.collection())).await?;

	println!("Trips: {}. Refresh activity: {}.", trips.text(), client.refresh_metrics().snapshot());

	refresh.delete_async().await;

	let _expired = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"Refresh token expired"}"#);
		})
		.await;
	let _revoked = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/bookings");
			then.status(401);
		})
		.await;

	match client.fetch(ApiRequest::get(Resource::Bookings.page(0, Some(10)))).await {
		Ok(response) => println!("Unexpected success: HTTP {}.", response.status()),
		Err(e) if e.is_session_expired() => println!("{e}"),
		Err(e) => return Err(e.into()),
	}

	assert_eq!(guard::require_auth(&session), GuardDecision::RedirectToLogin);

	Ok(())
}
