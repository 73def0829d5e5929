//! Detection and removal of leading header/meta rows.
//!
//! Exported reports often open with a title, a date, a few `key,value` lines
//! and only then the real table. The real table is recognised by a sudden
//! jump in the number of filled cells: more than one extra column compared to
//! the rows seen so far.

use log::debug;

use crate::error::Result;
use crate::ingest::lines::{LineTerminator, join_lines, split_lines};
use crate::ingest::rows::{Row, filled_cells, parse_row};

/// Index of the first body row, given the filled-cell count of each row.
///
/// Single forward pass. A row with `next > observed + 1` (and a non-zero
/// `observed`) starts the body. Otherwise a non-zero `next` becomes the new
/// `observed`; blank rows change nothing. Returns 0 when no jump is seen.
pub fn find_body_start<I>(counts: I) -> usize
where
	I: IntoIterator<Item = usize>,
{
	let mut observed = 0;
	for (i, next) in counts.into_iter().enumerate() {
		if observed != 0 && next > observed + 1 {
			return i;
		}
		if next != 0 {
			observed = next;
		}
	}
	0
}

/// Drop leading header rows. Returns the remaining rows and how many were
/// removed.
pub fn strip_header_rows(mut rows: Vec<Row>) -> (Vec<Row>, usize) {
	let start = find_body_start(rows.iter().map(|r| filled_cells(r)));
	if start > 0 {
		debug!("stripping {} leading header rows", start);
		rows.drain(..start);
	}
	(rows, start)
}

/// Text form of [`strip_header_rows`] for delimited content: lines are split
/// on `terminator`, measured with [`parse_row`] and the kept suffix is joined
/// back with the same terminator.
pub fn strip_header_lines(
	text: &str,
	delimiter: u8,
	terminator: Option<LineTerminator>,
) -> Result<(String, usize)> {
	let lines = split_lines(text, terminator);
	let counts = lines
		.iter()
		.map(|l| parse_row(l, delimiter).map(|r| filled_cells(&r)))
		.collect::<Result<Vec<_>>>()?;
	let start = find_body_start(counts);
	if start > 0 {
		debug!("stripping {} leading header lines", start);
	}
	Ok((join_lines(&lines[start..], terminator), start))
}
