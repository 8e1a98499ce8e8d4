//! Plugs an in-process transport into [`ApiClient`] instead of reqwest.
//!
//! Any type implementing [`HttpTransport`] can carry the client's calls, provided it keeps the
//! refresh credential between calls the way a browser cookie jar would. This one fakes a backend
//! that only accepts the token it issued last.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use futures::future;
use parking_lot::Mutex;
// self
use planora_session::{
	api::ApiClient,
	auth::AccessToken,
	config::ClientConfig,
	http::{HeaderMap, StatusCode},
	session::Session,
	transport::{ApiRequest, ApiResponse, HttpTransport, PreparedRequest, TransportFuture},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let config = ClientConfig::builder(Url::parse("https://api.planora.example")?).build()?;
	let session = Arc::new(Session::new());
	let client: ApiClient<InProcessBackend> =
		ApiClient::with_transport(config, session.clone(), Arc::new(InProcessBackend::default()));

	session.set(AccessToken::new("expired"));

	let responses = future::join_all(
		["/api/trips", "/api/bookings", "/api/transports"]
			.into_iter()
			.map(|path| client.fetch(ApiRequest::get(path))),
	)
	.await;

	for response in responses {
		println!("{}", response?.text());
	}

	println!("Refresh activity: {}.", client.refresh_metrics().snapshot());

	Ok(())
}

#[derive(Default)]
struct InProcessBackend {
	issued: Mutex<u32>,
}
impl InProcessBackend {
	fn current(&self) -> String {
		format!("token-{}", *self.issued.lock())
	}
}
impl HttpTransport for InProcessBackend {
	fn execute(&self, request: PreparedRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			if request.url.path() == "/api/auth/refresh" {
				*self.issued.lock() += 1;

				let body = format!(r#"{{"token":"{}"}}"#, self.current());

				return Ok(ApiResponse::new(StatusCode::OK, HeaderMap::new(), body));
			}

			let (status, body) = if request.bearer_token() == Some(self.current().as_str()) {
				(StatusCode::OK, format!("served {} with {}", request.url.path(), self.current()))
			} else {
				(StatusCode::UNAUTHORIZED, String::new())
			};

			Ok(ApiResponse::new(status, HeaderMap::new(), body))
		})
	}
}
