use crate::ingest::rows::Row;

/// Widest row in the set, 0 when there are no rows.
pub fn max_columns(rows: &[Row]) -> usize {
	rows.iter().map(Vec::len).max().unwrap_or(0)
}

/// Right-pad every row with empty cells up to the widest row so the result is
/// rectangular. Cell and row order are preserved.
pub fn normalize_columns(mut rows: Vec<Row>) -> Vec<Row> {
	let width = max_columns(&rows);
	for row in rows.iter_mut().filter(|r| r.len() < width) {
		row.resize(width, String::new());
	}
	rows
}
