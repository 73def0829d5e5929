use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
	pub status: &'static str,
	pub version: &'static str,
}

/// Liveness endpoint. The service holds no external resources, so being able
/// to answer is the whole check.
pub async fn health() -> Json<HealthStatus> {
	Json(HealthStatus {
		status: "ok",
		version: env!("CARGO_PKG_VERSION"),
	})
}
