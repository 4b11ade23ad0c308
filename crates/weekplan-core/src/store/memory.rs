use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::TabularStore;
use crate::error::StoreError;

/// Workbook held in memory. Worksheet order is insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    sheets: IndexMap<String, Vec<Vec<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by tests and the workbook seed.
    pub fn with_sheet(mut self, name: &str, header: &[&str], rows: &[&[&str]]) -> Self {
        let mut all = vec![owned(header)];
        all.extend(rows.iter().map(|r| owned(r)));
        self.sheets.insert(name.to_string(), all);
        self
    }

    /// Create the worksheet with `header` if it does not exist yet.
    pub fn ensure_worksheet(&mut self, name: &str, header: &[&str]) -> bool {
        if self.sheets.contains_key(name) {
            return false;
        }
        self.sheets.insert(name.to_string(), vec![owned(header)]);
        true
    }

    fn sheet_mut(&mut self, sheet: &str) -> Result<&mut Vec<Vec<String>>, StoreError> {
        self.sheets
            .get_mut(sheet)
            .ok_or_else(|| StoreError::WorksheetNotFound(sheet.to_string()))
    }
}

fn owned(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|s| s.to_string()).collect()
}

impl TabularStore for MemoryStore {
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
        Ok(self.sheets.keys().cloned().collect())
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| StoreError::WorksheetNotFound(sheet.to_string()))
    }

    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
        self.sheet_mut(sheet)?.push(values.to_vec());
        Ok(())
    }

    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
        let rows = self.sheet_mut(sheet)?;
        if row == 0 || row > rows.len() {
            return Err(StoreError::OutOfRange {
                sheet: sheet.to_string(),
                row,
                col: 0,
            });
        }
        rows.remove(row - 1);
        Ok(())
    }

    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        let rows = self.sheet_mut(sheet)?;
        if row == 0 || col == 0 || row > rows.len() {
            return Err(StoreError::OutOfRange {
                sheet: sheet.to_string(),
                row,
                col,
            });
        }
        let cells = &mut rows[row - 1];
        if cells.len() < col {
            cells.resize(col, String::new());
        }
        cells[col - 1] = value.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations() {
        let mut store =
            MemoryStore::new().with_sheet("Eten", &["Gerecht"], &[&["Pasta"], &["Soep"]]);
        store.append_row("Eten", &["Curry".to_string()]).unwrap();
        assert_eq!(
            store.first_column("Eten").unwrap(),
            vec!["Pasta", "Soep", "Curry"]
        );

        store.delete_row("Eten", 2).unwrap();
        assert_eq!(store.first_column("Eten").unwrap(), vec!["Soep", "Curry"]);

        store.update_cell("Eten", 2, 3, "x").unwrap();
        assert_eq!(store.rows("Eten").unwrap()[1], vec!["Soep", "", "x"]);
    }

    #[test]
    fn out_of_range_and_missing_sheet() {
        let mut store = MemoryStore::new().with_sheet("Eten", &["Gerecht"], &[]);
        assert!(matches!(
            store.delete_row("Eten", 2),
            Err(StoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            store.update_cell("Eten", 1, 0, "x"),
            Err(StoreError::OutOfRange { .. })
        ));
        assert!(matches!(
            store.rows("Taken"),
            Err(StoreError::WorksheetNotFound(_))
        ));
    }

    #[test]
    fn ensure_worksheet_keeps_existing_rows() {
        let mut store = MemoryStore::new().with_sheet("Eten", &["Gerecht"], &[&["Pasta"]]);
        assert!(!store.ensure_worksheet("Eten", &["Other"]));
        assert!(store.ensure_worksheet("Taken", &["Taak"]));
        assert_eq!(store.worksheets().unwrap(), vec!["Eten", "Taken"]);
        assert_eq!(store.first_column("Eten").unwrap(), vec!["Pasta"]);
    }
}
