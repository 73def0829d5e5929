use encoding_rs::{Encoding, WINDOWS_1252};
use std::borrow::Cow;

/// Decode uploaded bytes into text.
///
/// A byte order mark wins (UTF-8, UTF-16 LE/BE) and is dropped. Without one,
/// valid UTF-8 is borrowed as-is and anything else is read as Windows-1252,
/// which is what spreadsheet tools emit for "CSV (Windows)".
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
	if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
		let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
		return text;
	}

	match std::str::from_utf8(bytes) {
		Ok(s) => Cow::Borrowed(s),
		Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
	}
}

/// True when the bytes start with a UTF-16 byte order mark. Such text is full
/// of NUL bytes and must not be judged by its raw bytes.
pub fn has_utf16_bom(bytes: &[u8]) -> bool {
	bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF])
}
