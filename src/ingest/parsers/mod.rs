pub mod csv;
pub mod spreadsheet_xml;
pub mod xlsx;

pub use self::csv::{parse_delimited, write_csv};
pub use self::spreadsheet_xml::read_first_worksheet;
pub use self::xlsx::{cell_to_string, read_first_sheet};
