use serde::Serialize;

/// Newline convention of a document. Detected once and applied uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineTerminator {
	#[serde(rename = "\n")]
	Lf,
	#[serde(rename = "\r\n")]
	CrLf,
	#[serde(rename = "\n\r")]
	LfCr,
	#[serde(rename = "\r")]
	Cr,
}

impl LineTerminator {
	/// Two-character sequences come before their one-character prefixes.
	const PRIORITY: [LineTerminator; 4] = [
		LineTerminator::LfCr,
		LineTerminator::CrLf,
		LineTerminator::Lf,
		LineTerminator::Cr,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			LineTerminator::Lf => "\n",
			LineTerminator::CrLf => "\r\n",
			LineTerminator::LfCr => "\n\r",
			LineTerminator::Cr => "\r",
		}
	}

	/// Find the terminator used by `text`: the first newline character in the
	/// text decides, preferring a two-character sequence starting there.
	/// Returns `None` for single-line text.
	pub fn detect(text: &str) -> Option<Self> {
		let start = text.find(['\n', '\r'])?;
		let rest = &text[start..];
		Self::PRIORITY
			.into_iter()
			.find(|t| rest.starts_with(t.as_str()))
	}
}

/// Split text into logical lines. Without a terminator the whole text is one
/// line. Like `str::split`, a trailing terminator yields a trailing empty line.
pub fn split_lines(text: &str, terminator: Option<LineTerminator>) -> Vec<&str> {
	match terminator {
		Some(t) => text.split(t.as_str()).collect(),
		None => vec![text],
	}
}

/// Inverse of [`split_lines`].
pub fn join_lines(lines: &[&str], terminator: Option<LineTerminator>) -> String {
	lines.join(terminator.map_or("\n", |t| t.as_str()))
}
