use crate::error::{ConvertError, Result};

/// One row of cells. An empty string is an empty cell.
pub type Row = Vec<String>;

/// Split a single line into cells.
///
/// Only the comma path understands quoting; every other delimiter is split
/// naively on the delimiter byte, so `a\t"b\tc"` yields three cells. Header
/// detection depends on this behaviour.
pub fn parse_row(line: &str, delimiter: u8) -> Result<Row> {
	if delimiter == b',' {
		parse_quoted(line)
	} else {
		Ok(line.split(delimiter as char).map(str::to_string).collect())
	}
}

fn parse_quoted(line: &str) -> Result<Row> {
	let mut rdr = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.from_reader(line.as_bytes());

	let mut record = csv::StringRecord::new();
	let read = rdr
		.read_record(&mut record)
		.map_err(|e| ConvertError::decode("csv", e))?;
	if read {
		Ok(record.iter().map(str::to_string).collect())
	} else {
		// Empty line: one empty cell, so it counts as blank.
		Ok(vec![String::new()])
	}
}

/// Number of cells holding anything at all.
pub fn filled_cells(row: &[String]) -> usize {
	row.iter().filter(|c| !c.is_empty()).count()
}
