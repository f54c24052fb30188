//! In-Memory Store

use crate::{validate_name, StorageError, Store};
use std::collections::HashMap;
use std::sync::Mutex;

/// Store keeping blobs in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, StorageError> {
        self.blobs
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }
}

impl Store for MemoryStore {
    fn put(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        validate_name(name)?;
        self.lock()?.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        self.lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(name.to_string()))
    }

    fn contains(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.lock()?.contains_key(name))
    }

    fn names(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = self.lock()?.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use timeseries::Table;

    #[test]
    fn test_table_round_trip() {
        let store = MemoryStore::new();
        let mut table = Table::new(["a", "b"]);
        let ts = NaiveDate::from_ymd_opt(2014, 5, 1)
            .unwrap()
            .and_hms_opt(0, 10, 0)
            .unwrap();
        table.push_row(ts, vec![Some(1.5), None]).unwrap();

        store.save("scada_data", &table).unwrap();
        let loaded: Table = store.load("scada_data").unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        assert!(!store.contains("ylabels").unwrap());
        assert!(matches!(
            store.load::<Vec<i32>>("ylabels"),
            Err(StorageError::NotFound(name)) if name == "ylabels"
        ));
    }

    #[test]
    fn test_overwrite_and_names() {
        let store = MemoryStore::new();
        store.save("b", &1u32).unwrap();
        store.save("a", &2u32).unwrap();
        store.save("b", &3u32).unwrap();

        assert_eq!(store.names().unwrap(), vec!["a", "b"]);
        assert_eq!(store.load::<u32>("b").unwrap(), 3);
    }
}
