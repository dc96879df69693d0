//! Workbook writer
//!
//! Writes one sheet per table and applies the default report styling:
//! frozen header row and index column, green for cells `>= 0.6`, red for
//! cells `< -0.6`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{
    cell_range, Color, ConditionalFormatCell, ConditionalFormatCellRule, Format, Workbook,
    Worksheet, XlsxError,
};
use tracing::{debug, info};

use super::table::{Cell, Table};
use crate::error::{Error, Result};

/// Cells at or above this value are highlighted green
pub const HIGHLIGHT_HIGH: f64 = 0.6;

/// Cells below this value are highlighted red
pub const HIGHLIGHT_LOW: f64 = -0.6;

const GREEN_FILL: u32 = 0xC6EFCE;
const GREEN_FONT: u32 = 0x006100;
const RED_FILL: u32 = 0xFFC7CE;
const RED_FONT: u32 = 0x9C0006;

/// Top-left cell of the scrolling area: row 1 and column A stay in view
const HEADER_PANES: (u32, u16) = (1, 1);

/// Last written row and column of a sheet, zero based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Extent {
    last_row: u32,
    last_col: u16,
}

impl Extent {
    /// Data block below the header and right of the index column
    fn data_range(self) -> Option<(u32, u16, u32, u16)> {
        if self.last_row < 1 || self.last_col < 1 {
            return None;
        }
        Some((1, 1, self.last_row, self.last_col))
    }
}

pub struct WorkbookWriter {
    path: PathBuf,
    workbook: Workbook,
    sheets: HashMap<String, Extent>,
}

impl WorkbookWriter {
    /// New workbook saved to `<filename>.xlsx`
    pub fn new(filename: impl AsRef<Path>) -> Self {
        let mut path = filename.as_ref().as_os_str().to_owned();
        path.push(".xlsx");

        Self {
            path: PathBuf::from(path),
            workbook: Workbook::new(),
            sheets: HashMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Write `table` into a new sheet called `name`
    pub fn add_sheet(&mut self, name: &str, table: &Table) -> Result<()> {
        if self.sheets.contains_key(name) {
            return Err(Error::SheetExists(name.to_string()));
        }

        let mut worksheet = Worksheet::new();
        worksheet.set_name(name)?;
        let extent = write_table(&mut worksheet, table)?;
        self.workbook.push_worksheet(worksheet);

        debug!(
            "Added sheet '{}' ({} rows x {} columns)",
            name,
            table.height(),
            table.width()
        );
        self.sheets.insert(name.to_string(), extent);
        Ok(())
    }

    /// Fill/font format from two RGB values, e.g. `0xFFC7CE`
    pub fn add_cell_format(&self, bg_color: u32, font_color: u32) -> Format {
        cell_format(bg_color, font_color)
    }

    pub fn freeze_top_row(&mut self, name: &str) -> Result<()> {
        self.sheet(name)?.set_freeze_panes(1, 0)?;
        Ok(())
    }

    pub fn freeze_first_column(&mut self, name: &str) -> Result<()> {
        self.sheet(name)?.set_freeze_panes(0, 1)?;
        Ok(())
    }

    /// Freeze header and index, highlight strong positive/negative values
    pub fn default_formatting(&mut self, name: &str) -> Result<()> {
        let extent = *self
            .sheets
            .get(name)
            .ok_or_else(|| Error::UnknownSheet(name.to_string()))?;

        let worksheet = self.sheet(name)?;
        worksheet.set_freeze_panes(HEADER_PANES.0, HEADER_PANES.1)?;

        let Some((first_row, first_col, last_row, last_col)) = extent.data_range() else {
            debug!("Sheet '{}' has no data cells to highlight", name);
            return Ok(());
        };

        for rule in highlight_rules() {
            worksheet.add_conditional_format(first_row, first_col, last_row, last_col, &rule)?;
        }
        debug!(
            "Highlighted {}!{}",
            name,
            cell_range(first_row, first_col, last_row, last_col)
        );

        Ok(())
    }

    /// Write the workbook to disk
    pub fn save(&mut self) -> Result<()> {
        self.workbook.save(&self.path)?;
        info!("Saved workbook {}", self.path.display());
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.save()
    }

    fn sheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        if !self.sheets.contains_key(name) {
            return Err(Error::UnknownSheet(name.to_string()));
        }
        Ok(self.workbook.worksheet_from_name(name)?)
    }
}

/// Green for strong positive values, red for strong negative ones
fn highlight_rules() -> [ConditionalFormatCell; 2] {
    let green = cell_format(GREEN_FILL, GREEN_FONT);
    let red = cell_format(RED_FILL, RED_FONT);

    [
        ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::GreaterThanOrEqualTo(HIGHLIGHT_HIGH))
            .set_format(green),
        ConditionalFormatCell::new()
            .set_rule(ConditionalFormatCellRule::LessThan(HIGHLIGHT_LOW))
            .set_format(red),
    ]
}

fn cell_format(bg_color: u32, font_color: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(bg_color))
        .set_font_color(Color::RGB(font_color))
}

/// Header row first, index labels in column A
fn write_table(worksheet: &mut Worksheet, table: &Table) -> Result<Extent> {
    worksheet.write_string(0, 0, table.index_name.as_str())?;
    for (i, column) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col_num(i + 1)?, column.as_str())?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = row_num(r + 1)?;
        worksheet.write_string(row_num, 0, row.label.as_str())?;

        for (c, cell) in row.cells.iter().enumerate() {
            let col = col_num(c + 1)?;
            match cell {
                Cell::Number(number) => {
                    worksheet.write_number(row_num, col, *number)?;
                }
                Cell::Text(text) => {
                    worksheet.write_string(row_num, col, text.as_str())?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(Extent {
        last_row: row_num(table.height())?,
        last_col: col_num(table.width())?,
    })
}

fn row_num(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| Error::Workbook(XlsxError::RowColumnLimitError))
}

fn col_num(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| Error::Workbook(XlsxError::RowColumnLimitError))
}
