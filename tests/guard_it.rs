#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use planora_session::{
	api::{ApiClient, ReqwestApiClient},
	auth::{AccessToken, Role},
	config::ClientConfig,
	error::Error,
	guard::{self, GuardDecision},
	session::Session,
	url::Url,
};

const PROFILE: &str = "/api/users/profile";

fn build_client(server: &MockServer) -> (ReqwestApiClient, Arc<Session>) {
	let config = ClientConfig::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully."),
	)
	.build()
	.expect("Client configuration should build for the mock server.");
	let session = Arc::new(Session::new());
	let client = ApiClient::new(config, session.clone())
		.expect("Reqwest transport should build for the mock server.");

	(client, session)
}

#[tokio::test]
async fn missing_token_redirects_without_network() {
	let server = MockServer::start_async().await;
	let (client, _session) = build_client(&server);
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE);
			then.status(200).body(r#"{"id":1,"email":"a@planora.io","role":"ADMIN"}"#);
		})
		.await;
	let decision =
		guard::require_role(&client, Role::Admin).await.expect("Guard should not fail.");

	assert_eq!(decision, GuardDecision::RedirectToLogin);
	assert_eq!(profile.calls_async().await, 0);
}

#[tokio::test]
async fn role_is_decided_by_the_profile_endpoint() {
	let server = MockServer::start_async().await;
	let (client, session) = build_client(&server);
	let profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE).header("authorization", "Bearer T1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"id":1,"email":"ops@planora.io","role":"ADMIN"}"#);
		})
		.await;

	// The token claims SUPER_ADMIN, but only the server's answer counts.
	session.set(AccessToken::new(
		"eyJhbGciOiJub25lIn0.eyJzdWIiOiJvcHNAcGxhbm9yYS5pbyIsInJvbGUiOiJTVVBFUl9BRE1JTiJ9.sig",
	));

	assert_eq!(session.role_hint(), Some(Role::SuperAdmin));

	session.set(AccessToken::new("T1"));

	assert_eq!(
		guard::require_role(&client, Role::Admin).await.expect("Guard should not fail."),
		GuardDecision::Allow
	);
	assert_eq!(
		guard::require_role(&client, Role::User).await.expect("Guard should not fail."),
		GuardDecision::Allow
	);
	assert_eq!(
		guard::require_role(&client, Role::SuperAdmin).await.expect("Guard should not fail."),
		GuardDecision::Forbidden
	);
	assert_eq!(profile.calls_async().await, 3);
}

#[tokio::test]
async fn forbidden_profile_maps_to_forbidden() {
	let server = MockServer::start_async().await;
	let (client, session) = build_client(&server);
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE);
			then.status(403).body("Account disabled");
		})
		.await;

	session.set(AccessToken::new("T1"));

	assert_eq!(
		guard::require_role(&client, Role::User).await.expect("Guard should not fail."),
		GuardDecision::Forbidden
	);
	assert!(session.is_authenticated(), "A 403 must not end the session.");
}

#[tokio::test]
async fn expired_session_redirects_to_login() {
	let server = MockServer::start_async().await;
	let (client, session) = build_client(&server);
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE);
			then.status(401);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(401);
		})
		.await;

	session.set(AccessToken::new("T1"));

	assert_eq!(
		guard::require_role(&client, Role::User).await.expect("Guard should not fail."),
		GuardDecision::RedirectToLogin
	);
	assert!(!session.is_authenticated());
	assert_eq!(guard::require_auth(&session), GuardDecision::RedirectToLogin);

	refresh.assert_async().await;
}

#[tokio::test]
async fn other_failures_are_returned() {
	let server = MockServer::start_async().await;
	let (client, session) = build_client(&server);
	let _profile = server
		.mock_async(|when, then| {
			when.method(GET).path(PROFILE);
			then.status(500).body("Internal error");
		})
		.await;

	session.set(AccessToken::new("T1"));

	let err = guard::require_role(&client, Role::User)
		.await
		.expect_err("Server errors should not be turned into decisions.");

	assert!(matches!(err, Error::Rejected { status: 500, .. }), "Unexpected error: {err:?}.");
}
