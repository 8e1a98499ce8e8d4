#![cfg(feature = "reqwest")]

// std
use std::{env, path::PathBuf, process, sync::Arc};
// crates.io
use httpmock::prelude::*;
// self
use planora_session::{
	api::ApiClient,
	config::ClientConfig,
	session::Session,
	store::{FileStore, TokenStore},
	transport::ApiRequest,
	url::Url,
};

fn snapshot_path(name: &str) -> PathBuf {
	env::temp_dir().join(format!("planora_session_{name}_{}.json", process::id()))
}

fn config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse successfully."),
	)
	.build()
	.expect("Client configuration should build for the mock server.")
}

#[tokio::test]
async fn persisted_session_survives_a_restart_and_logout_erases_it() {
	let server = MockServer::start_async().await;
	let path = snapshot_path("restart");
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"token":"T1","email":"ana@planora.io"}"#);
		})
		.await;
	let trips = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/trips").header("authorization", "Bearer T1");
			then.status(200).body("[]");
		})
		.await;
	let _logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/logout");
			then.status(204);
		})
		.await;

	{
		let store = FileStore::open(&path).expect("File store should open.");
		let session = Arc::new(Session::with_persistence(Arc::new(store)));
		let client = ApiClient::new(config(&server), session)
			.expect("Reqwest transport should build for the mock server.");

		client.login("ana@planora.io", "secret").await.expect("Login should succeed.");
	}

	let store = Arc::new(FileStore::open(&path).expect("File store should reopen."));
	let session = Arc::new(Session::with_persistence(store.clone()));

	assert!(session.is_authenticated(), "The token should be restored from disk.");

	let client = ApiClient::new(config(&server), session.clone())
		.expect("Reqwest transport should build for the mock server.");
	let response =
		client.fetch(ApiRequest::get("/api/trips")).await.expect("Restored token should work.");

	assert_eq!(response.status().as_u16(), 200);

	trips.assert_async().await;

	client.logout().await;

	assert!(!session.is_authenticated());
	assert!(store.load().expect("File store load should succeed.").is_none());
	assert!(!path.exists());
}
