//! Time-windowed memoization of store reads.
//!
//! Reads are served from [`moka`] caches until they are older than the TTL.
//! Any mutation drops the whole cache, not just the touched worksheet, so a
//! write is always followed by fresh reads.

use std::time::Duration;

use moka::sync::Cache;

use super::TabularStore;
use crate::error::StoreError;

pub struct CachedStore<S> {
    inner: S,
    worksheets: Cache<(), Vec<String>>,
    rows: Cache<String, Vec<Vec<String>>>,
}

impl<S: TabularStore> CachedStore<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            worksheets: Cache::builder().time_to_live(ttl).build(),
            rows: Cache::builder().time_to_live(ttl).build(),
        }
    }

    /// Drop every cached read.
    pub fn invalidate(&mut self) {
        tracing::debug!("store cache invalidated");
        self.worksheets.invalidate_all();
        self.rows.invalidate_all();
    }

    /// The wrapped store; cached reads are dropped since the caller may write.
    pub fn inner_mut(&mut self) -> &mut S {
        self.invalidate();
        &mut self.inner
    }
}

impl<S: TabularStore> TabularStore for CachedStore<S> {
    fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
        if let Some(names) = self.worksheets.get(&()) {
            return Ok(names);
        }
        let names = self.inner.worksheets()?;
        self.worksheets.insert((), names.clone());
        Ok(names)
    }

    fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
        if let Some(rows) = self.rows.get(sheet) {
            tracing::debug!(sheet, "store cache hit");
            return Ok(rows);
        }
        tracing::debug!(sheet, "store cache miss");
        let rows = self.inner.rows(sheet)?;
        self.rows.insert(sheet.to_string(), rows.clone());
        Ok(rows)
    }

    fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
        self.invalidate();
        self.inner.append_row(sheet, values)
    }

    fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
        self.invalidate();
        self.inner.delete_row(sheet, row)
    }

    fn update_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &str,
    ) -> Result<(), StoreError> {
        self.invalidate();
        self.inner.update_cell(sheet, row, col, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts reads reaching the wrapped store.
    struct Counting {
        inner: MemoryStore,
        reads: Rc<Cell<usize>>,
    }

    impl TabularStore for Counting {
        fn worksheets(&mut self) -> Result<Vec<String>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.worksheets()
        }

        fn rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, StoreError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.rows(sheet)
        }

        fn append_row(&mut self, sheet: &str, values: &[String]) -> Result<(), StoreError> {
            self.inner.append_row(sheet, values)
        }

        fn delete_row(&mut self, sheet: &str, row: usize) -> Result<(), StoreError> {
            self.inner.delete_row(sheet, row)
        }

        fn update_cell(
            &mut self,
            sheet: &str,
            row: usize,
            col: usize,
            value: &str,
        ) -> Result<(), StoreError> {
            self.inner.update_cell(sheet, row, col, value)
        }
    }

    fn setup(ttl: Duration) -> (CachedStore<Counting>, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let store = Counting {
            inner: MemoryStore::new()
                .with_sheet("Eten", &["Gerecht"], &[&["Pasta"]])
                .with_sheet("Taken", &["Taak"], &[&["Bed"]]),
            reads: reads.clone(),
        };
        (CachedStore::new(store, ttl), reads)
    }

    #[test]
    fn reads_are_memoized_within_ttl() {
        let (mut cached, reads) = setup(Duration::from_secs(300));
        cached.first_column("Eten").unwrap();
        cached.records("Eten").unwrap();
        cached.rows("Eten").unwrap();
        assert_eq!(reads.get(), 1);
    }

    #[test]
    fn reads_expire_after_ttl() {
        let (mut cached, reads) = setup(Duration::from_millis(50));
        cached.rows("Eten").unwrap();
        cached.rows("Eten").unwrap();
        assert_eq!(reads.get(), 1);

        std::thread::sleep(Duration::from_millis(120));
        cached.rows("Eten").unwrap();
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn any_mutation_invalidates_every_sheet() {
        let (mut cached, reads) = setup(Duration::from_secs(300));
        cached.rows("Eten").unwrap();
        cached.rows("Taken").unwrap();
        cached.worksheets().unwrap();
        assert_eq!(reads.get(), 3);

        cached.append_row("Eten", &["Soep".to_string()]).unwrap();
        assert_eq!(cached.first_column("Eten").unwrap(), vec!["Pasta", "Soep"]);
        cached.rows("Taken").unwrap();
        cached.worksheets().unwrap();
        assert_eq!(reads.get(), 6);
    }

    #[test]
    fn inner_access_drops_cached_reads() {
        let (mut cached, reads) = setup(Duration::from_secs(300));
        cached.rows("Eten").unwrap();
        cached.inner_mut();
        cached.rows("Eten").unwrap();
        assert_eq!(reads.get(), 2);
    }

    #[test]
    fn failed_reads_are_not_cached() {
        let (mut cached, reads) = setup(Duration::from_secs(300));
        assert!(cached.rows("Missing").is_err());
        assert!(cached.rows("Missing").is_err());
        assert_eq!(reads.get(), 2);
    }
}
