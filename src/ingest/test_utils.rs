//! Test utilities for ingest module tests.
//!
//! Builders for small spreadsheet documents so tests do not depend on binary
//! fixtures checked into the repository.

#![cfg(test)]

use chrono::NaiveDate;
use std::io::{Cursor, Write};
use zip::write::{SimpleFileOptions, ZipWriter};

fn escape(s: &str) -> String {
	s.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
		.replace('"', "&quot;")
}

fn column_name(mut index: usize) -> String {
	let mut name = Vec::new();
	loop {
		name.push(b'A' + (index % 26) as u8);
		if index < 26 {
			break;
		}
		index = index / 26 - 1;
	}
	name.reverse();
	String::from_utf8(name).expect("ascii column name")
}

/// Days from the 1900 date system epoch, the way Excel stores a date.
fn excel_serial(date: NaiveDate) -> i64 {
	let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("epoch");
	(date - epoch).num_days()
}

/// Build a minimal single-sheet XLSX workbook. Empty strings leave the cell
/// out; cells that parse as numbers are stored as numbers and `YYYY-MM-DD`
/// values are stored as date serials with a date number format.
pub fn build_xlsx(rows: &[&[&str]]) -> Vec<u8> {
	let mut shared: Vec<String> = Vec::new();
	let mut sheet_rows = String::new();
	for (r, row) in rows.iter().enumerate() {
		sheet_rows.push_str(&format!("<row r=\"{}\">", r + 1));
		for (c, value) in row.iter().enumerate() {
			if value.is_empty() {
				continue;
			}
			let cell_ref = format!("{}{}", column_name(c), r + 1);
			if value.parse::<f64>().is_ok() {
				sheet_rows.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", cell_ref, value));
			} else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
				sheet_rows.push_str(&format!(
					"<c r=\"{}\" s=\"1\"><v>{}</v></c>",
					cell_ref,
					excel_serial(date)
				));
			} else {
				let idx = shared.len();
				shared.push(escape(value));
				sheet_rows.push_str(&format!("<c r=\"{}\" t=\"s\"><v>{}</v></c>", cell_ref, idx));
			}
		}
		sheet_rows.push_str("</row>");
	}

	let shared_xml = format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<sst xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" count=\"{n}\" uniqueCount=\"{n}\">{items}</sst>",
		n = shared.len(),
		items = shared
			.iter()
			.map(|s| format!("<si><t>{}</t></si>", s))
			.collect::<String>()
	);

	let sheet_xml = format!(
		"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"><sheetData>{}</sheetData></worksheet>",
		sheet_rows
	);

	// Style 1 is built-in number format 14, a short date.
	let styles_xml = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<styleSheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
<fonts count=\"1\"><font><sz val=\"11\"/><name val=\"Calibri\"/></font></fonts>\
<fills count=\"1\"><fill><patternFill patternType=\"none\"/></fill></fills>\
<borders count=\"1\"><border><left/><right/><top/><bottom/><diagonal/></border></borders>\
<cellStyleXfs count=\"1\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\"/></cellStyleXfs>\
<cellXfs count=\"2\"><xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
<xf numFmtId=\"14\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/></cellXfs>\
</styleSheet>"
		.to_string();

	let parts: [(&str, String); 7] = [
		(
			"[Content_Types].xml",
			"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
<Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
<Default Extension=\"xml\" ContentType=\"application/xml\"/>\
<Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
<Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
<Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>\
<Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
</Types>"
				.to_string(),
		),
		(
			"_rels/.rels",
			"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" Target=\"xl/workbook.xml\"/>\
</Relationships>"
				.to_string(),
		),
		(
			"xl/workbook.xml",
			"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\">\
<sheets><sheet name=\"Sheet1\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>"
				.to_string(),
		),
		(
			"xl/_rels/workbook.xml.rels",
			"<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
<Relationship Id=\"rId2\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings\" Target=\"sharedStrings.xml\"/>\
<Relationship Id=\"rId3\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles\" Target=\"styles.xml\"/>\
</Relationships>"
				.to_string(),
		),
		("xl/sharedStrings.xml", shared_xml),
		("xl/styles.xml", styles_xml),
		("xl/worksheets/sheet1.xml", sheet_xml),
	];

	let mut buf = Vec::new();
	{
		let mut zip = ZipWriter::new(Cursor::new(&mut buf));
		for (name, body) in parts.iter() {
			zip.start_file(*name, SimpleFileOptions::default())
				.expect("start zip entry");
			zip.write_all(body.as_bytes()).expect("write zip entry");
		}
		zip.finish().expect("finish zip");
	}
	buf
}

/// Build a SpreadsheetML 2003 document with one worksheet. Empty strings
/// leave the cell out and push the next cell with `ss:Index`.
pub fn spreadsheet_xml(rows: &[&[&str]]) -> String {
	let mut out = String::from(
		"<?xml version=\"1.0\"?>\n<?mso-application progid=\"Excel.Sheet\"?>\n\
<Workbook xmlns=\"urn:schemas-microsoft-com:office:spreadsheet\" \
xmlns:ss=\"urn:schemas-microsoft-com:office:spreadsheet\">\n\
 <Worksheet ss:Name=\"Sheet1\">\n  <Table>\n",
	);
	for row in rows {
		out.push_str("   <Row>");
		let mut skipped = false;
		for (c, value) in row.iter().enumerate() {
			if value.is_empty() {
				skipped = true;
				continue;
			}
			if skipped {
				out.push_str(&format!("<Cell ss:Index=\"{}\">", c + 1));
				skipped = false;
			} else {
				out.push_str("<Cell>");
			}
			out.push_str(&format!(
				"<Data ss:Type=\"String\">{}</Data></Cell>",
				escape(value)
			));
		}
		out.push_str("</Row>\n");
	}
	out.push_str("  </Table>\n </Worksheet>\n</Workbook>\n");
	out
}

#[test]
fn date_serials() {
	let date = NaiveDate::from_ymd_opt(2015, 4, 1).expect("date");
	assert_eq!(excel_serial(date), 42095);
}

#[test]
fn column_names() {
	assert_eq!(column_name(0), "A");
	assert_eq!(column_name(25), "Z");
	assert_eq!(column_name(26), "AA");
	assert_eq!(column_name(27), "AB");
}
