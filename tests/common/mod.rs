//! Common test utilities and helpers for integration tests.
#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

/// Report style export: a title, a date and a blank line before the table.
pub const REPORT_CSV: &str = "Quarterly stock report\nGenerated,2024-03-31\n\nsku,name,qty,price\nA-1,bolt,10,0.25\nA-2,\"nut, hex\",200,0.05\nA-3,washer,75,0.02\n";

/// Build a one-sheet XLSX workbook in memory. Every cell is a shared string
/// except values that parse as numbers; empty strings leave the cell out.
pub fn build_xlsx(rows: &[&[&str]]) -> Vec<u8> {
	let mut strings = Vec::new();
	let mut data = String::new();
	for (r, row) in rows.iter().enumerate() {
		data.push_str(&format!("<row r=\"{}\">", r + 1));
		for (c, value) in row.iter().enumerate() {
			if value.is_empty() {
				continue;
			}
			// Fixtures stay within A..Z.
			let cell = format!("{}{}", (b'A' + c as u8) as char, r + 1);
			if value.parse::<f64>().is_ok() {
				data.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", cell, value));
			} else {
				data.push_str(&format!("<c r=\"{}\" t=\"s\"><v>{}</v></c>", cell, strings.len()));
				strings.push(value.replace('&', "&amp;").replace('<', "&lt;"));
			}
		}
		data.push_str("</row>");
	}

	const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
	const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
	const DOC_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

	let files = vec![
		(
			"[Content_Types].xml",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
<Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>\
</Types>"
			),
		),
		(
			"_rels/.rels",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?><Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{DOC_REL}/officeDocument\" Target=\"xl/workbook.xml\"/></Relationships>"
			),
		),
		(
			"xl/workbook.xml",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?><workbook xmlns=\"{MAIN_NS}\" xmlns:r=\"{DOC_REL}\">\
<sheets><sheet name=\"Stock\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>"
			),
		),
		(
			"xl/_rels/workbook.xml.rels",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?><Relationships xmlns=\"{REL_NS}\">\
<Relationship Id=\"rId1\" Type=\"{DOC_REL}/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"{DOC_REL}/sharedStrings\" Target=\"sharedStrings.xml\"/></Relationships>"
			),
		),
		(
			"xl/sharedStrings.xml",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?><sst xmlns=\"{MAIN_NS}\">{}</sst>",
				strings
					.iter()
					.map(|s| format!("<si><t>{}</t></si>", s))
					.collect::<String>()
			),
		),
		(
			"xl/worksheets/sheet1.xml",
			format!(
				"<?xml version=\"1.0\" encoding=\"UTF-8\"?><worksheet xmlns=\"{MAIN_NS}\"><sheetData>{}</sheetData></worksheet>",
				data
			),
		),
	];

	let mut buf = Vec::new();
	{
		let mut zip = ZipWriter::new(Cursor::new(&mut buf));
		for (name, body) in files {
			zip.start_file(name, SimpleFileOptions::default())
				.expect("start zip entry");
			zip.write_all(body.as_bytes()).expect("write zip entry");
		}
		zip.finish().expect("finish zip");
	}
	buf
}

/// Encode text as UTF-16LE with a byte order mark.
pub fn utf16le(text: &str) -> Vec<u8> {
	let mut bytes = vec![0xFF, 0xFE];
	for unit in text.encode_utf16() {
		bytes.extend_from_slice(&unit.to_le_bytes());
	}
	bytes
}

/// Build a `multipart/form-data` body. Returns the content type header value
/// and the body bytes.
pub fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
	let boundary = "----RATATOSKR_TEST_BOUNDARY";
	let mut body = Vec::new();
	for (name, filename, data) in parts {
		body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
		match filename {
			Some(f) => body.extend_from_slice(
				format!(
					"Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
					name, f
				)
				.as_bytes(),
			),
			None => body.extend_from_slice(
				format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
			),
		}
		body.extend_from_slice(data);
		body.extend_from_slice(b"\r\n");
	}
	body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
	(format!("multipart/form-data; boundary={}", boundary), body)
}
