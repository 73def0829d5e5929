use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto_from_rs};
use chrono::NaiveTime;
use log::debug;
use std::io::{Read, Seek};

use crate::error::{ConvertError, Result};
use crate::ingest::rows::Row;

/// Decode the first sheet of a workbook (xls, xlsx, xlsb or ods) into rows.
///
/// Trailing empty cells are trimmed from each row, so a row's length is the
/// position of its last filled cell. Leading empty rows and columns are
/// already dropped by the decoder.
pub fn read_first_sheet<R: Read + Seek + Clone>(reader: R) -> Result<Vec<Row>> {
	let mut workbook =
		open_workbook_auto_from_rs(reader).map_err(|e| ConvertError::decode("spreadsheet", e))?;

	let sheet_names = workbook.sheet_names().to_vec();
	let Some(sheet_name) = sheet_names.first() else {
		return Err(ConvertError::EmptySheet);
	};
	if sheet_names.len() > 1 {
		debug!(
			"workbook has {} sheets, converting only '{}'",
			sheet_names.len(),
			sheet_name
		);
	}

	let range = workbook
		.worksheet_range(sheet_name)
		.map_err(|e| ConvertError::decode("spreadsheet", e))?;

	Ok(range.rows().map(row_to_cells).collect())
}

fn row_to_cells(row: &[Data]) -> Row {
	let filled = row
		.iter()
		.rposition(|c| !matches!(c, Data::Empty))
		.map_or(0, |i| i + 1);
	row[..filled].iter().map(cell_to_string).collect()
}

/// Render a cell the way it reads in the sheet.
pub fn cell_to_string(cell: &Data) -> String {
	match cell {
		Data::Empty => String::new(),
		Data::String(s) => s.clone(),
		Data::Int(i) => i.to_string(),
		Data::Float(f) => {
			// Whole numbers are stored as floats; drop the ".0".
			if f.fract() == 0.0 && f.abs() < 1e15 {
				format!("{:.0}", f)
			} else {
				f.to_string()
			}
		}
		Data::Bool(b) => b.to_string(),
		Data::Error(e) => e.to_string(),
		Data::DateTime(dt) => date_time_to_string(dt),
		Data::DateTimeIso(s) => s.clone(),
		Data::DurationIso(s) => s.clone(),
	}
}

/// Date cells come out as ISO 8601: a bare date at midnight, otherwise a
/// date and time. Durations and serials outside chrono's range keep the
/// serial number.
fn date_time_to_string(dt: &ExcelDateTime) -> String {
	if dt.is_duration() {
		return dt.to_string();
	}
	match dt.as_datetime() {
		Some(d) if d.time() == NaiveTime::MIN => d.format("%Y-%m-%d").to_string(),
		Some(d) => d.format("%Y-%m-%dT%H:%M:%S").to_string(),
		None => dt.to_string(),
	}
}
