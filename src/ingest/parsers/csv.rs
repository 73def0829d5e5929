use crate::error::{ConvertError, Result};
use crate::ingest::rows::Row;

/// Parse delimited text into rows with full quoting support.
///
/// Parsing is strict: every record must have the same number of fields, so a
/// ragged body is reported instead of silently reshaped. Blank lines are
/// skipped.
pub fn parse_delimited(text: &str, delimiter: u8) -> Result<Vec<Row>> {
	let mut rdr = csv::ReaderBuilder::new()
		.has_headers(false)
		.delimiter(delimiter)
		.from_reader(text.as_bytes());

	let format = if delimiter == b'\t' { "tsv" } else { "csv" };
	let mut out = Vec::new();
	for result in rdr.records() {
		let record = result.map_err(|e| ConvertError::decode(format, e))?;
		out.push(record.iter().map(str::to_string).collect());
	}

	Ok(out)
}

/// Serialize rows as comma separated CSV with `\n` line endings. `flexible`
/// allows rows of different lengths; otherwise a ragged row is an error.
/// A row with no content (no cells, or a single empty cell) is written as an
/// empty line.
pub fn write_csv(rows: &[Row], flexible: bool) -> Result<String> {
	let mut wtr = csv::WriterBuilder::new()
		.flexible(flexible)
		.terminator(csv::Terminator::Any(b'\n'))
		.from_writer(Vec::new());

	for row in rows {
		if row.len() <= 1 && row.first().is_none_or(String::is_empty) {
			// The writer would quote a lone empty field as `""`.
			wtr.flush()?;
			wtr.get_mut().push(b'\n');
			continue;
		}
		wtr.write_record(row)
			.map_err(|e| ConvertError::decode("csv", e))?;
	}

	let bytes = wtr
		.into_inner()
		.map_err(|e| ConvertError::decode("csv", e.error()))?;
	String::from_utf8(bytes).map_err(|e| ConvertError::decode("csv", e))
}
