//! Local JSON workbook for offline use.
//!
//! The whole workbook is one JSON object mapping worksheet names to rows.
//! It is read once on open and written in full after every mutation.

use std::path::PathBuf;

use super::{MemoryStore, TabularStore};
use crate::error::StoreError;

pub struct WorkbookFile {
    path: PathBuf,
    book: MemoryStore,
}

impl WorkbookFile {
    /// Open `path`, starting empty when the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let book = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| StoreError::Workbook {
                path: path.clone(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => {
                return Err(StoreError::Workbook {
                    path,
                    message: e.to_string(),
                })
            }
        };
        Ok(Self { path, book })
    }

    /// Add a worksheet with `header` when missing, persisting the change.
    pub fn ensure_worksheet(&mut self, name: &str, header: &[&str]) -> Result<(), StoreError> {
        if self.book.ensure_worksheet(name, header) {
            tracing::info!(sheet = name, "created worksheet");
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), StoreError> {
        let err = |message: String| StoreError::Workbook {
            path: self.path.clone(),
            message,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| err(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(&self.book).map_err(|e| err(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| err(e.to_string()))
    }
}

impl TabularStore for WorkbookFile {
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
        self.book.worksheets()
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.book.rows(sheet)
    }

    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
        self.book.append_row(sheet, values)?;
        self.save()
    }

    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
        self.book.delete_row(sheet, row)?;
        self.save()
    }

    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        self.book.update_cell(sheet, row, col, value)?;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn mutations_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.json");

        let mut book = WorkbookFile::open(&path).unwrap();
        book.ensure_worksheet("Eten", &["Gerecht"]).unwrap();
        book.append_row("Eten", &["Pasta".to_string()]).unwrap();
        book.append_row("Eten", &["Soep".to_string()]).unwrap();
        book.delete_row("Eten", 2).unwrap();

        let mut reopened = WorkbookFile::open(&path).unwrap();
        assert_eq!(reopened.first_column("Eten").unwrap(), vec!["Soep"]);
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let mut book = WorkbookFile::open(dir.path().join("nested/book.json")).unwrap();
        assert!(book.worksheets().unwrap().is_empty());
        book.ensure_worksheet("Taken", &["Taak"]).unwrap();
        assert!(dir.path().join("nested/book.json").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            WorkbookFile::open(&path),
            Err(StoreError::Workbook { .. })
        ));
    }
}
