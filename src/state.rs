use crate::ingest::Converter;

/// Application state passed to handlers via Axum's `State` extractor.
///
/// The converter carries immutable options and is cloned into every request,
/// so handlers share nothing mutable.
#[derive(Clone, Debug)]
pub struct AppState {
	pub converter: Converter,
	pub max_upload_bytes: usize,
}

impl AppState {
	pub fn new(converter: Converter, max_upload_bytes: usize) -> Self {
		Self {
			converter,
			max_upload_bytes,
		}
	}
}
