//! In-memory table behind each repository
//!
//! Records are held in an `RwLock<HashMap>` keyed by id. Lock poisoning is
//! reported as a storage error rather than a panic.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{LedgerError, LedgerResult};

pub struct Table<K, V> {
    rows: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Copy,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, HashMap<K, V>>> {
        self.rows
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, HashMap<K, V>>> {
        self.rows
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Replace the whole table, keying rows with `key`
    pub fn replace_all(&self, rows: Vec<V>, key: impl Fn(&V) -> K) -> LedgerResult<()> {
        let mut data = self.write()?;
        data.clear();
        for row in rows {
            data.insert(key(&row), row);
        }
        Ok(())
    }

    pub fn get(&self, id: K) -> LedgerResult<Option<V>> {
        Ok(self.read()?.get(&id).cloned())
    }

    pub fn contains(&self, id: K) -> LedgerResult<bool> {
        Ok(self.read()?.contains_key(&id))
    }

    pub fn all(&self) -> LedgerResult<Vec<V>> {
        Ok(self.read()?.values().cloned().collect())
    }

    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> LedgerResult<Vec<V>> {
        Ok(self
            .read()?
            .values()
            .filter(|v| predicate(v))
            .cloned()
            .collect())
    }

    pub fn find(&self, predicate: impl Fn(&V) -> bool) -> LedgerResult<Option<V>> {
        Ok(self.read()?.values().find(|v| predicate(v)).cloned())
    }

    pub fn any(&self, predicate: impl Fn(&V) -> bool) -> LedgerResult<bool> {
        Ok(self.read()?.values().any(predicate))
    }

    /// Insert or replace, returning the previous row
    pub fn upsert(&self, id: K, row: V) -> LedgerResult<Option<V>> {
        Ok(self.write()?.insert(id, row))
    }

    pub fn remove(&self, id: K) -> LedgerResult<Option<V>> {
        Ok(self.write()?.remove(&id))
    }

    /// Remove and return every row matching `predicate`
    pub fn remove_where(&self, predicate: impl Fn(&V) -> bool) -> LedgerResult<Vec<V>> {
        let mut data = self.write()?;
        let ids: Vec<K> = data
            .iter()
            .filter(|(_, v)| predicate(v))
            .map(|(k, _)| *k)
            .collect();
        Ok(ids.into_iter().filter_map(|id| data.remove(&id)).collect())
    }

    pub fn len(&self) -> LedgerResult<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.read()?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_get_remove() {
        let table: Table<u32, String> = Table::new();
        assert!(table.upsert(1, "one".into()).unwrap().is_none());
        assert_eq!(table.upsert(1, "uno".into()).unwrap().as_deref(), Some("one"));
        assert_eq!(table.get(1).unwrap().as_deref(), Some("uno"));
        assert!(table.contains(1).unwrap());
        assert_eq!(table.remove(1).unwrap().as_deref(), Some("uno"));
        assert!(table.is_empty().unwrap());
    }

    #[test]
    fn test_remove_where() {
        let table: Table<u32, u32> = Table::new();
        table.replace_all((1..=6).collect(), |v| *v).unwrap();

        let mut removed = table.remove_where(|v| v % 2 == 0).unwrap();
        removed.sort();
        assert_eq!(removed, vec![2, 4, 6]);
        assert_eq!(table.len().unwrap(), 3);
        assert!(!table.any(|v| v % 2 == 0).unwrap());
    }
}
