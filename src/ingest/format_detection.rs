use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::io::{Cursor, Read};
use zip::ZipArchive;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::ingest::encoding::{decode_text, has_utf16_bom};
use crate::ingest::sniffer::determine_delimiter;

/// What the pipeline will treat the upload as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileType {
	SpreadsheetBinary,
	SpreadsheetXml,
	Csv,
	Tsv,
}

impl FileType {
	pub fn as_str(&self) -> &str {
		match self {
			FileType::SpreadsheetBinary => "spreadsheet",
			FileType::SpreadsheetXml => "spreadsheet-xml",
			FileType::Csv => "csv",
			FileType::Tsv => "tsv",
		}
	}

	/// Parse a format hint string into a FileType
	pub fn from_hint(hint: &str) -> Option<Self> {
		match hint.trim().to_lowercase().as_str() {
			"xlsx" | "xls" | "xlsb" | "xlsm" | "ods" | "excel" | "spreadsheet" => {
				Some(FileType::SpreadsheetBinary)
			}
			"xml" | "spreadsheet-xml" | "spreadsheetml" => Some(FileType::SpreadsheetXml),
			"csv" => Some(FileType::Csv),
			"tsv" | "tab" => Some(FileType::Tsv),
			_ => None,
		}
	}

	/// Delimiter of delimited-text types.
	pub fn delimiter(&self) -> Option<u8> {
		match self {
			FileType::Csv => Some(b','),
			FileType::Tsv => Some(b'\t'),
			_ => None,
		}
	}
}

/// Signature-level verdict on the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
	Empty,
	Xls,
	Xlsx,
	Xlsb,
	Ods,
	SpreadsheetXml,
	Xml,
	Html,
	Zip,
	Gzip,
	Pdf,
	PlainText,
	Binary,
}

impl ContentType {
	pub fn mime(&self) -> &'static str {
		match self {
			ContentType::Empty => "application/x-empty",
			ContentType::Xls => "application/vnd.ms-excel",
			ContentType::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
			ContentType::Xlsb => "application/vnd.ms-excel.sheet.binary.macroenabled.12",
			ContentType::Ods => "application/vnd.oasis.opendocument.spreadsheet",
			ContentType::SpreadsheetXml => "application/vnd.ms-excel.spreadsheetml+xml",
			ContentType::Xml => "text/xml",
			ContentType::Html => "text/html",
			ContentType::Zip => "application/zip",
			ContentType::Gzip => "application/gzip",
			ContentType::Pdf => "application/pdf",
			ContentType::PlainText => "text/plain",
			ContentType::Binary => "application/octet-stream",
		}
	}

	pub fn is_spreadsheet(&self) -> bool {
		matches!(
			self,
			ContentType::Xls | ContentType::Xlsx | ContentType::Xlsb | ContentType::Ods
		)
	}
}

/// Result of classifying an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
	pub file_type: FileType,
	pub content_type: ContentType,
	/// Resolved delimiter for delimited text, `None` for spreadsheets.
	#[serde(serialize_with = "serialize_delimiter")]
	pub delimiter: Option<u8>,
}

fn serialize_delimiter<S: serde::Serializer>(
	d: &Option<u8>,
	s: S,
) -> std::result::Result<S::Ok, S::Error> {
	match d {
		Some(b) => s.serialize_some(&(*b as char).to_string()),
		None => s.serialize_none(),
	}
}

const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// Only the start of a text document is inspected for markup.
const MARKUP_PEEK: usize = 4096;

static SPREADSHEET_ML: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"(?i)urn:schemas-microsoft-com:office:spreadsheet|progid\s*=\s*["']Excel\.Sheet["']"#)
		.expect("valid SpreadsheetML pattern")
});

/// Detect the content type of an upload from its bytes. File names and
/// extensions play no part.
pub fn detect_content_type(bytes: &[u8]) -> ContentType {
	if bytes.is_empty() {
		return ContentType::Empty;
	}

	if bytes.starts_with(&CFB_MAGIC) {
		return ContentType::Xls;
	}

	if bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(b"PK\x05\x06") {
		return inspect_zip(bytes);
	}

	if bytes.starts_with(&[0x1f, 0x8b]) {
		return ContentType::Gzip;
	}

	if bytes.starts_with(b"%PDF-") {
		return ContentType::Pdf;
	}

	if !has_utf16_bom(bytes) && bytes.contains(&0) {
		return ContentType::Binary;
	}

	let text = decode_text(bytes);
	if !looks_like_text(&text) {
		return ContentType::Binary;
	}

	let head = text.trim_start();
	if head.starts_with('<') {
		let peek = peek_chars(head, MARKUP_PEEK);
		if SPREADSHEET_ML.is_match(peek) {
			return ContentType::SpreadsheetXml;
		}
		let lower = peek.to_ascii_lowercase();
		if lower.starts_with("<!doctype html") || lower.starts_with("<html") {
			return ContentType::Html;
		}
		if lower.starts_with("<?xml") {
			return ContentType::Xml;
		}
	}

	ContentType::PlainText
}

/// Classify an upload: spreadsheet signatures first, then plain text whose
/// delimiter is resolved by sniffing. Only comma and tab are accepted.
pub fn classify(bytes: &[u8], options: &ConvertOptions) -> Result<Classification> {
	let content_type = detect_content_type(bytes);

	if content_type.is_spreadsheet() {
		return Ok(Classification {
			file_type: FileType::SpreadsheetBinary,
			content_type,
			delimiter: None,
		});
	}

	match content_type {
		ContentType::SpreadsheetXml => Ok(Classification {
			file_type: FileType::SpreadsheetXml,
			content_type,
			delimiter: None,
		}),
		ContentType::PlainText => {
			let text = decode_text(bytes);
			let delimiter = determine_delimiter(&text, options)?;
			let file_type = match delimiter {
				b'\t' => FileType::Tsv,
				b',' => FileType::Csv,
				other => {
					return Err(ConvertError::UnresolvedDelimiter {
						found: Some(other as char),
					});
				}
			};
			Ok(Classification {
				file_type,
				content_type,
				delimiter: Some(delimiter),
			})
		}
		other => Err(ConvertError::UnknownFormat(other.mime().to_string())),
	}
}

/// Tell office containers apart from a plain ZIP by their entries.
fn inspect_zip(bytes: &[u8]) -> ContentType {
	let mut archive = match ZipArchive::new(Cursor::new(bytes)) {
		Ok(a) => a,
		Err(_) => return ContentType::Zip,
	};

	let mut workbook_xml = false;
	let mut workbook_bin = false;
	for name in archive.file_names() {
		match name {
			"xl/workbook.xml" => workbook_xml = true,
			"xl/workbook.bin" => workbook_bin = true,
			_ => {}
		}
	}
	if workbook_xml {
		return ContentType::Xlsx;
	}
	if workbook_bin {
		return ContentType::Xlsb;
	}

	if let Ok(mut entry) = archive.by_name("mimetype") {
		let mut mimetype = String::new();
		if entry.read_to_string(&mut mimetype).is_ok() && mimetype.trim() == ODS_MIMETYPE {
			return ContentType::Ods;
		}
	}

	ContentType::Zip
}

/// Text is anything without control characters other than tab, CR, LF and
/// form feed.
fn looks_like_text(text: &str) -> bool {
	!text
		.chars()
		.any(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r' | '\x0c'))
}

fn peek_chars(text: &str, max_bytes: usize) -> &str {
	if text.len() <= max_bytes {
		return text;
	}
	let mut end = max_bytes;
	while !text.is_char_boundary(end) {
		end -= 1;
	}
	&text[..end]
}
