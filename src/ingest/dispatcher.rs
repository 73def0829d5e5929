//! Conversion pipeline: classify, decode to rows, strip header rows,
//! normalize spreadsheet columns and write CSV.
//!
//! Every stage is synchronous and fails fast; the first error aborts the
//! conversion and no partial CSV is produced.

use log::{debug, info};
use serde::Serialize;
use std::io::Cursor;
use std::path::Path;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::ingest::columns::normalize_columns;
use crate::ingest::encoding::decode_text;
use crate::ingest::format_detection::{
	Classification, ContentType, FileType, classify, detect_content_type,
};
use crate::ingest::header::{strip_header_lines, strip_header_rows};
use crate::ingest::lines::LineTerminator;
use crate::ingest::parsers::{parse_delimited, read_first_sheet, read_first_worksheet, write_csv};
use crate::ingest::rows::Row;

/// Decoded rows plus what was inferred about them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	pub file_type: FileType,
	pub delimiter: Option<u8>,
	pub line_terminator: Option<LineTerminator>,
	pub rows: Vec<Row>,
	/// Leading header rows removed before `rows`.
	pub stripped_rows: usize,
}

/// A finished conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvOutput {
	pub body: String,
	pub file_type: FileType,
	pub content_type: ContentType,
	pub rows: usize,
	pub stripped_rows: usize,
}

impl CsvOutput {
	pub const MEDIA_TYPE: &'static str = "text/csv; charset=utf-8";
}

/// Runs uploads through the pipeline with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Converter {
	options: ConvertOptions,
}

impl Converter {
	pub fn new(options: ConvertOptions) -> Self {
		Self { options }
	}

	pub fn options(&self) -> &ConvertOptions {
		&self.options
	}

	pub fn classify(&self, bytes: &[u8]) -> Result<Classification> {
		classify(bytes, &self.options)
	}

	/// Read the file at `path` and convert it.
	pub fn convert_file(&self, path: impl AsRef<Path>) -> Result<CsvOutput> {
		let bytes = read_input(path.as_ref())?;
		self.convert_content(&bytes)
	}

	/// Like [`Converter::convert_file`], but the format is given instead of
	/// detected.
	pub fn convert_file_as(&self, path: impl AsRef<Path>, format: &str) -> Result<CsvOutput> {
		let bytes = read_input(path.as_ref())?;
		self.convert_content_as(&bytes, format)
	}

	/// Convert an in-memory upload, detecting its format from the bytes.
	pub fn convert_content(&self, bytes: &[u8]) -> Result<CsvOutput> {
		let classification = self.classify(bytes)?;
		info!(
			"classified upload as {} ({})",
			classification.file_type.as_str(),
			classification.content_type.mime()
		);
		self.finish(bytes, classification)
	}

	/// Convert an in-memory upload as `format` (`xlsx`, `xml`, `csv`, `tsv`,
	/// ...). An unrecognized format is [`ConvertError::DataTypeUnknown`].
	pub fn convert_content_as(&self, bytes: &[u8], format: &str) -> Result<CsvOutput> {
		let file_type = FileType::from_hint(format)
			.ok_or_else(|| ConvertError::DataTypeUnknown(format.to_string()))?;
		let classification = Classification {
			file_type,
			content_type: detect_content_type(bytes),
			delimiter: file_type.delimiter(),
		};
		info!("converting upload as {}", file_type.as_str());
		self.finish(bytes, classification)
	}

	/// Decode `bytes` according to `classification` and strip header rows.
	/// Spreadsheet rows are also padded to a common width.
	pub fn decode(&self, bytes: &[u8], classification: &Classification) -> Result<Document> {
		match classification.file_type {
			FileType::SpreadsheetXml => {
				let text = decode_text(bytes);
				let rows = read_first_worksheet(&text)?;
				let (rows, stripped_rows) = strip_header_rows(rows);
				Ok(Document {
					file_type: FileType::SpreadsheetXml,
					delimiter: None,
					line_terminator: None,
					rows,
					stripped_rows,
				})
			}
			FileType::SpreadsheetBinary => {
				let rows = read_first_sheet(Cursor::new(bytes))?;
				let (rows, stripped_rows) = strip_header_rows(rows);
				Ok(Document {
					file_type: FileType::SpreadsheetBinary,
					delimiter: None,
					line_terminator: None,
					rows: normalize_columns(rows),
					stripped_rows,
				})
			}
			file_type @ (FileType::Csv | FileType::Tsv) => {
				let delimiter = classification
					.delimiter
					.or(file_type.delimiter())
					.unwrap_or(b',');
				let text = decode_text(bytes);
				let line_terminator = LineTerminator::detect(&text);
				let (body, stripped_rows) = strip_header_lines(&text, delimiter, line_terminator)?;
				let rows = parse_delimited(&body, delimiter)?;
				Ok(Document {
					file_type,
					delimiter: Some(delimiter),
					line_terminator,
					rows,
					stripped_rows,
				})
			}
		}
	}

	fn finish(&self, bytes: &[u8], classification: Classification) -> Result<CsvOutput> {
		let document = self.decode(bytes, &classification)?;
		// SpreadsheetML rows keep their own widths.
		let flexible = document.file_type == FileType::SpreadsheetXml;
		let body = write_csv(&document.rows, flexible)?;
		debug!(
			"wrote {} rows ({} header rows stripped)",
			document.rows.len(),
			document.stripped_rows
		);
		Ok(CsvOutput {
			body,
			file_type: document.file_type,
			content_type: classification.content_type,
			rows: document.rows.len(),
			stripped_rows: document.stripped_rows,
		})
	}
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
	if path.as_os_str().is_empty() {
		return Err(ConvertError::MissingInput("no file path given".to_string()));
	}
	Ok(std::fs::read(path)?)
}
