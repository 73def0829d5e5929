use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a conversion failure. Stable and serializable so
/// boundary layers can branch on it without matching error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
	MissingInput,
	UnknownFormat,
	UnresolvedDelimiter,
	EmptySheet,
	DecodeFailure,
	DataTypeUnknown,
	Io,
}

impl ErrorKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorKind::MissingInput => "missing_input",
			ErrorKind::UnknownFormat => "unknown_format",
			ErrorKind::UnresolvedDelimiter => "unresolved_delimiter",
			ErrorKind::EmptySheet => "empty_sheet",
			ErrorKind::DecodeFailure => "decode_failure",
			ErrorKind::DataTypeUnknown => "data_type_unknown",
			ErrorKind::Io => "io",
		}
	}
}

/// Errors raised anywhere in the conversion pipeline. The first failure aborts
/// the whole conversion and is surfaced unchanged.
#[derive(Debug, Error)]
pub enum ConvertError {
	#[error("missing input: {0}")]
	MissingInput(String),

	#[error("unknown file type (based on file content): {0}")]
	UnknownFormat(String),

	#[error("{}", unresolved_delimiter_message(.found))]
	UnresolvedDelimiter { found: Option<char> },

	#[error("spreadsheet contains no sheets")]
	EmptySheet,

	#[error("failed to decode {format}: {message}")]
	DecodeFailure {
		format: &'static str,
		message: String,
	},

	#[error("data type unknown: {0}")]
	DataTypeUnknown(String),

	#[error("failed to read input: {0}")]
	Io(#[from] std::io::Error),
}

fn unresolved_delimiter_message(found: &Option<char>) -> String {
	match found {
		Some(c) => format!(
			"plain text content, but delimiter {:?} is neither comma nor tab",
			c
		),
		None => "unknown delimiter (based on file content) and no default configured".to_string(),
	}
}

impl ConvertError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			ConvertError::MissingInput(_) => ErrorKind::MissingInput,
			ConvertError::UnknownFormat(_) => ErrorKind::UnknownFormat,
			ConvertError::UnresolvedDelimiter { .. } => ErrorKind::UnresolvedDelimiter,
			ConvertError::EmptySheet => ErrorKind::EmptySheet,
			ConvertError::DecodeFailure { .. } => ErrorKind::DecodeFailure,
			ConvertError::DataTypeUnknown(_) => ErrorKind::DataTypeUnknown,
			ConvertError::Io(_) => ErrorKind::Io,
		}
	}

	/// Wrap an error coming out of one of the underlying decoders.
	pub fn decode(format: &'static str, err: impl std::fmt::Display) -> Self {
		ConvertError::DecodeFailure {
			format,
			message: err.to_string(),
		}
	}
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Structured error returned to callers instead of a CSV body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
	pub message: String,
	pub kind: ErrorKind,
}

impl From<&ConvertError> for ErrorBody {
	fn from(err: &ConvertError) -> Self {
		Self {
			message: err.to_string(),
			kind: err.kind(),
		}
	}
}
