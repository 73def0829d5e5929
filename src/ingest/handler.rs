use axum::Json;
use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use log::{info, warn};
use serde::Deserialize;

use crate::error::{ConvertError, ErrorBody, ErrorKind};
use crate::ingest::dispatcher::{Converter, CsvOutput};
use crate::state::AppState;

/// Query string of the raw body endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
	pub format: Option<String>,
}

/// Multipart upload endpoint: the `file` field holds the upload, an optional
/// `format` field overrides content detection. Responds with the CSV or a
/// JSON [`ErrorBody`].
pub async fn convert_upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
	let mut file: Option<Bytes> = None;
	let mut format: Option<String> = None;

	loop {
		let field = match multipart.next_field().await {
			Ok(Some(f)) => f,
			Ok(None) => break,
			Err(e) => {
				return error_response(&ConvertError::MissingInput(format!(
					"failed to read multipart body: {}",
					e
				)));
			}
		};

		let name = field.name().unwrap_or_default().to_string();
		match name.as_str() {
			"file" => {
				if let Some(filename) = field.file_name() {
					info!("receiving upload '{}'", filename);
				}
				match field.bytes().await {
					Ok(b) => file = Some(b),
					Err(e) => {
						return error_response(&ConvertError::MissingInput(format!(
							"failed to read file field: {}",
							e
						)));
					}
				}
			}
			"format" => match field.text().await {
				Ok(t) if !t.trim().is_empty() => format = Some(t),
				Ok(_) => {}
				Err(e) => {
					return error_response(&ConvertError::MissingInput(format!(
						"failed to read format field: {}",
						e
					)));
				}
			},
			_ => {}
		}
	}

	let Some(bytes) = file else {
		return error_response(&ConvertError::MissingInput(
			"multipart field 'file' is required".to_string(),
		));
	};

	convert_blocking(state.converter, bytes, format).await
}

/// Raw body endpoint: the request body is the upload, `?format=` is the
/// optional hint.
pub async fn convert_raw(
	State(state): State<AppState>,
	Query(query): Query<ConvertQuery>,
	body: Bytes,
) -> Response {
	if body.is_empty() {
		return error_response(&ConvertError::MissingInput(
			"request body is empty".to_string(),
		));
	}
	convert_blocking(state.converter, body, query.format).await
}

/// The pipeline is synchronous; keep it off the async workers.
async fn convert_blocking(converter: Converter, bytes: Bytes, format: Option<String>) -> Response {
	let result = tokio::task::spawn_blocking(move || match format.as_deref() {
		Some(f) => converter.convert_content_as(&bytes, f),
		None => converter.convert_content(&bytes),
	})
	.await;

	match result {
		Ok(Ok(out)) => csv_response(out),
		Ok(Err(e)) => error_response(&e),
		Err(e) => error_response(&ConvertError::Io(std::io::Error::other(format!(
			"conversion task failed: {}",
			e
		)))),
	}
}

fn csv_response(out: CsvOutput) -> Response {
	info!(
		"converted {} upload: {} rows, {} header rows stripped",
		out.file_type.as_str(),
		out.rows,
		out.stripped_rows
	);
	(
		StatusCode::OK,
		[(header::CONTENT_TYPE, CsvOutput::MEDIA_TYPE)],
		out.body,
	)
		.into_response()
}

/// HTTP status for each failure kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
	match kind {
		ErrorKind::MissingInput | ErrorKind::DataTypeUnknown => StatusCode::BAD_REQUEST,
		ErrorKind::UnknownFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,
		ErrorKind::UnresolvedDelimiter | ErrorKind::EmptySheet | ErrorKind::DecodeFailure => {
			StatusCode::UNPROCESSABLE_ENTITY
		}
		ErrorKind::Io => StatusCode::INTERNAL_SERVER_ERROR,
	}
}

pub fn error_response(err: &ConvertError) -> Response {
	warn!("conversion failed ({}): {}", err.kind().as_str(), err);
	(status_for(err.kind()), Json(ErrorBody::from(err))).into_response()
}
