//! SpreadsheetML 2003 ("XML Spreadsheet") decoding.
//!
//! The format is a single XML document: `Workbook > Worksheet > Table > Row >
//! Cell > Data`. Rows and cells may skip ahead with a 1-based `ss:Index`, and a
//! cell may span extra columns with `ss:MergeAcross`.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ConvertError, Result};
use crate::ingest::rows::Row;

const FORMAT: &str = "spreadsheet-xml";

/// Sheet bounds of Excel 2007 and later. Positions past them are rejected
/// before any padding is allocated.
const MAX_ROWS: usize = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

/// Decode the first `Worksheet` into rows. Cells are placed at their column;
/// skipped columns become empty cells. Rows are not padded.
pub fn read_first_worksheet(xml: &str) -> Result<Vec<Row>> {
	let mut reader = Reader::from_str(xml);
	reader.config_mut().trim_text(false);

	let mut worksheets = 0;
	let mut rows: Vec<Row> = Vec::new();
	let mut row: Option<Row> = None;
	let mut col = 0;
	let mut cell: Option<Cell> = None;
	let mut in_data = false;
	let mut in_comment = false;

	loop {
		match reader.read_event() {
			Ok(Event::Start(e)) => match e.local_name().as_ref() {
				b"Worksheet" => {
					worksheets += 1;
					if worksheets > 1 {
						break;
					}
				}
				b"Row" if worksheets == 1 => {
					skip_to_row(&mut rows, index_attr(&e, MAX_ROWS)?);
					row = Some(Vec::new());
					col = 0;
				}
				b"Cell" if row.is_some() => {
					if let Some(i) = index_attr(&e, MAX_COLUMNS)? {
						col = i - 1;
					}
					cell = Some(Cell {
						text: String::new(),
						merge_across: usize_attr(&e, b"MergeAcross")?.unwrap_or(0),
					});
				}
				b"Comment" if cell.is_some() => in_comment = true,
				b"Data" if cell.is_some() && !in_comment => in_data = true,
				_ => {}
			},
			Ok(Event::Empty(e)) => match e.local_name().as_ref() {
				b"Worksheet" => {
					worksheets += 1;
					if worksheets > 1 {
						break;
					}
				}
				b"Row" if worksheets == 1 => {
					skip_to_row(&mut rows, index_attr(&e, MAX_ROWS)?);
					rows.push(Vec::new());
				}
				b"Cell" if row.is_some() => {
					if let Some(i) = index_attr(&e, MAX_COLUMNS)? {
						col = i - 1;
					}
					col = advance(col, usize_attr(&e, b"MergeAcross")?.unwrap_or(0))?;
				}
				_ => {}
			},
			Ok(Event::Text(t)) if in_data => {
				let text = t.unescape().map_err(|e| ConvertError::decode(FORMAT, e))?;
				if let Some(c) = cell.as_mut() {
					c.text.push_str(&text);
				}
			}
			Ok(Event::CData(t)) if in_data => {
				if let Some(c) = cell.as_mut() {
					c.text.push_str(&String::from_utf8_lossy(&t));
				}
			}
			Ok(Event::End(e)) => match e.local_name().as_ref() {
				b"Data" if !in_comment => in_data = false,
				b"Comment" => in_comment = false,
				b"Cell" => {
					if let (Some(c), Some(r)) = (cell.take(), row.as_mut()) {
						if r.len() < col {
							r.resize(col, String::new());
						}
						r.push(c.text);
						col = advance(col, c.merge_across)?;
					}
				}
				b"Row" => {
					if let Some(r) = row.take() {
						rows.push(r);
					}
				}
				b"Worksheet" => break,
				_ => {}
			},
			Ok(Event::Eof) => break,
			Err(e) => return Err(ConvertError::decode(FORMAT, e)),
			_ => {}
		}
	}

	if worksheets == 0 {
		return Err(ConvertError::EmptySheet);
	}

	Ok(rows)
}

struct Cell {
	text: String,
	merge_across: usize,
}

/// Insert empty rows so the next row lands at 1-based `index`.
fn skip_to_row(rows: &mut Vec<Row>, index: Option<usize>) {
	if let Some(i) = index {
		while rows.len() + 1 < i {
			rows.push(Vec::new());
		}
	}
}

/// `ss:Index`, 1-based and at most `max`.
fn index_attr(e: &BytesStart, max: usize) -> Result<Option<usize>> {
	match usize_attr(e, b"Index")? {
		Some(0) => Err(ConvertError::decode(FORMAT, "ss:Index must be at least 1")),
		Some(i) if i > max => Err(ConvertError::decode(
			FORMAT,
			format!("ss:Index {} is beyond the sheet limit of {}", i, max),
		)),
		other => Ok(other),
	}
}

/// Column after a cell at `col` spanning `merge_across` extra columns.
fn advance(col: usize, merge_across: usize) -> Result<usize> {
	col.checked_add(1)
		.and_then(|c| c.checked_add(merge_across))
		.filter(|&c| c <= MAX_COLUMNS)
		.ok_or_else(|| {
			ConvertError::decode(
				FORMAT,
				format!("cell span ends beyond the sheet limit of {} columns", MAX_COLUMNS),
			)
		})
}

fn usize_attr(e: &BytesStart, name: &[u8]) -> Result<Option<usize>> {
	for attr in e.attributes() {
		let attr = attr.map_err(|err| ConvertError::decode(FORMAT, err))?;
		if attr.key.local_name().as_ref() != name {
			continue;
		}
		let value = attr
			.unescape_value()
			.map_err(|err| ConvertError::decode(FORMAT, err))?;
		return value.trim().parse::<usize>().map(Some).map_err(|_| {
			ConvertError::decode(
				FORMAT,
				format!(
					"attribute {} has non-numeric value {:?}",
					String::from_utf8_lossy(name),
					value
				),
			)
		});
	}
	Ok(None)
}
