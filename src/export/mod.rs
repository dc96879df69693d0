//! Spreadsheet export
//!
//! Independent of the API client: takes data that was already fetched and
//! writes it to an `.xlsx` workbook.
//!
//! ```rust,ignore
//! let mut xls = WorkbookWriter::new("report");
//! xls.add_sheet("sheet1", &table1)?;
//! xls.add_sheet("sheet2", &table2)?;
//! xls.default_formatting("sheet2")?;
//! xls.save()?;
//! ```

pub mod table;
pub mod workbook;

pub use table::{Cell, Row, Table};
pub use workbook::WorkbookWriter;
