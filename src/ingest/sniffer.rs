use csv_nose::{SampleSize, Sniffer};
use log::debug;

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::ingest::lines::{LineTerminator, split_lines};

/// Delimiters a sniffed dialect may resolve to.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

/// The first few lines of a document, used only for sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample<'a> {
	pub lines: Vec<&'a str>,
	pub terminator: Option<LineTerminator>,
}

impl<'a> RawSample<'a> {
	pub fn take(text: &'a str, sample_lines: usize) -> Self {
		let terminator = LineTerminator::detect(text);
		let mut lines = split_lines(text, terminator);
		lines.truncate(sample_lines);
		Self { lines, terminator }
	}
}

/// Guess the delimiter of the sampled lines.
///
/// Blank lines are left out and the rest is handed to the `csv_nose`
/// dialect sniffer. Its verdict is kept only when it is one of
/// [`CANDIDATE_DELIMITERS`] and actually splits the sample into more than one
/// field; anything else counts as no guess.
pub fn guess_delimiter(lines: &[&str]) -> Option<u8> {
	let lines: Vec<&str> = lines
		.iter()
		.copied()
		.filter(|l| !l.trim().is_empty())
		.collect();
	if lines.is_empty() {
		return None;
	}

	let mut sample = lines.join("\n");
	sample.push('\n');

	let mut sniffer = Sniffer::new();
	sniffer.sample_size(SampleSize::Records(lines.len()));
	let metadata = match sniffer.sniff_bytes(sample.as_bytes()) {
		Ok(m) => m,
		Err(e) => {
			debug!("sniffer found no dialect: {}", e);
			return None;
		}
	};

	let delimiter = metadata.dialect.delimiter;
	if metadata.num_fields < 2 || !CANDIDATE_DELIMITERS.contains(&delimiter) {
		debug!(
			"ignoring sniffed delimiter {:?} with {} fields",
			delimiter as char, metadata.num_fields
		);
		return None;
	}
	Some(delimiter)
}

/// Determine the field delimiter of `text` from its first
/// `options.sample_lines` lines, falling back to the configured default.
pub fn determine_delimiter(text: &str, options: &ConvertOptions) -> Result<u8> {
	let sample = RawSample::take(text, options.sample_lines);
	match guess_delimiter(&sample.lines) {
		Some(d) => {
			debug!(
				"sniffed delimiter {:?} from {} sample lines",
				d as char,
				sample.lines.len()
			);
			Ok(d)
		}
		None => match options.default_delimiter {
			Some(d) => {
				debug!("no delimiter found in sample, using default {:?}", d as char);
				Ok(d)
			}
			None => Err(ConvertError::UnresolvedDelimiter { found: None }),
		},
	}
}
