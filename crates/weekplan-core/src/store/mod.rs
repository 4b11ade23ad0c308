//! Tabular store boundary.
//!
//! The household catalogs live in a spreadsheet-like store: named worksheets
//! whose first row is a header. Backends only implement raw row access and
//! the three mutations; header-keyed records, row lookup and column lookup
//! are derived here.
//!
//! Rows and columns are 1-based and count the header row, the way
//! spreadsheet cells are addressed.

pub mod cache;
pub mod credentials;
pub mod memory;
pub mod sheets;
pub mod workbook;

use indexmap::IndexMap;

use crate::error::StoreError;

pub use cache::CachedStore;
pub use memory::MemoryStore;
pub use sheets::{SheetsAuth, SheetsStore};
pub use workbook::WorkbookFile;

/// One data row keyed by header.
pub type Record = IndexMap<String, String>;

/// Spreadsheet-like storage of named worksheets.
pub trait TabularStore {
    /// Names of all worksheets.
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError>;

    /// All rows of a worksheet, header first. Rows may be ragged.
    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError>;

    /// Append a row after the last row.
    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError>;

    /// Delete a row; following rows move up.
    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError>;

    /// Overwrite a single cell.
    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError>;

    /// Header row of a worksheet.
    fn headers(&mut self, sheet: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.rows(sheet)?.into_iter().next().unwrap_or_default())
    }

    /// Data rows keyed by header. Blank rows are skipped, short rows padded
    /// with empty strings.
    fn records(&mut self, sheet: &str) -> Result<Vec<Record>, StoreError> {
        let rows = self.rows(sheet)?;
        Ok(records_from_rows(&rows))
    }

    /// Row number of the first data row whose first cell equals `value`,
    /// ignoring surrounding whitespace.
    fn find_row(&mut self, sheet: &str, value: &str) -> Result<Option<usize>, StoreError> {
        let rows = self.rows(sheet)?;
        let value = value.trim();
        Ok(rows
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, row)| row.first().map(|c| c.trim()) == Some(value))
            .map(|(i, _)| i + 1))
    }

    /// Column number of `header`.
    fn column_index(&mut self, sheet: &str, header: &str) -> Result<usize, StoreError> {
        self.headers(sheet)?
            .iter()
            .position(|h| h.trim() == header)
            .map(|i| i + 1)
            .ok_or_else(|| StoreError::ColumnNotFound {
                sheet: sheet.to_string(),
                column: header.to_string(),
            })
    }

    /// First-column values of every data row, skipping blanks.
    fn first_column(&mut self, sheet: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .rows(sheet)?
            .into_iter()
            .skip(1)
            .filter_map(|row| row.into_iter().next())
            .filter(|v| !v.trim().is_empty())
            .collect())
    }
}

/// Lets a backend chosen at runtime sit behind `Box<dyn TabularStore>`.
impl<T: TabularStore + ?Sized> TabularStore for Box<T> {
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
        (**self).worksheets()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        (**self).rows(sheet)
    }

    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
        (**self).append_row(sheet, values)
    }

    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
        (**self).delete_row(sheet, row)
    }

    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        (**self).update_cell(sheet, row, col, value)
    }
}

pub(crate) fn records_from_rows(rows: &[Vec<String>]) -> Vec<Record> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    data.iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(i, h)| (h.trim().to_string(), row.get(i).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Spreadsheet column letters for a 1-based column number (1 → A, 27 → AA).
pub fn column_letters(mut col: usize) -> String {
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    letters.iter().rev().collect()
}
