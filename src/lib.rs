pub mod config;
pub mod error;
pub mod health;
pub mod ingest;
pub mod observability;
pub mod state;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use log::info;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::Settings;
use crate::ingest::Converter;
use crate::state::AppState;

/// Build the HTTP application: multipart upload on `/`, raw body on
/// `/convert` and a liveness check on `/health`.
pub fn router(state: AppState) -> Router {
	let limit = state.max_upload_bytes;
	Router::new()
		.route("/", post(ingest::handler::convert_upload))
		.route("/convert", post(ingest::handler::convert_raw))
		.route("/health", get(health::health))
		.layer(
			ServiceBuilder::new()
				.layer(CatchPanicLayer::new())
				.layer(DefaultBodyLimit::max(limit)),
		)
		.with_state(state)
}

/// Serve the conversion endpoints until Ctrl-C.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
	let options = settings
		.convert_options()
		.context("invalid conversion settings")?;
	let state = AppState::new(Converter::new(options), settings.max_upload_bytes);

	let addr = format!("{}:{}", settings.host, settings.port);
	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("failed to bind {}", addr))?;

	info!(
		"Ratatoskr listening on http://{} (POST /, POST /convert, GET /health)",
		addr
	);

	axum::serve(listener, router(state))
		.with_graceful_shutdown(shutdown_signal())
		.await
		.context("server error")?;

	info!("Ratatoskr stopped");
	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		log::warn!("failed to listen for shutdown signal: {}", e);
		std::future::pending::<()>().await;
	}
}
