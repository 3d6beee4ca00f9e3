use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    source::KeySource,
    util::{Key, Result, Status, check_ascending, check_finite, compare_keys},
};

/// In-memory table of rows ordered by key
///
/// Rows are kept in a copy-on-write vector. Readers take a cheap `Arc`
/// snapshot; a writer only copies the vector when some snapshot is still
/// alive, so appending to a table nobody is reading stays amortized O(1).
///
/// All mutators take `&self`, so a table can be shared with a registry
/// through an `Arc` and still be extended by its owner. After mutating, the
/// owner is expected to mark the registry dirty.
pub struct RowTable {
    rows: RwLock<Arc<Vec<Key>>>,
}

impl RowTable {
    pub fn new() -> Self {
        RowTable {
            rows: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Build a table from keys that are already sorted.
    pub fn from_keys(keys: Vec<Key>) -> Result<Self> {
        check_ascending(&keys)?;
        Ok(RowTable {
            rows: RwLock::new(Arc::new(keys)),
        })
    }

    /// Append a key after the current last row.
    pub fn append(&self, key: Key) -> Result<()> {
        check_finite(key)?;

        let mut rows = self.rows.write();
        if let Some(&last) = rows.last()
            && key <= last
        {
            return Err(Status::out_of_order(format!(
                "cannot append key {key} after {last}"
            )));
        }
        Arc::make_mut(&mut *rows).push(key);
        Ok(())
    }

    /// Insert a key at its sorted position.
    ///
    /// Returns `Ok(false)` if the key is already present.
    pub fn insert(&self, key: Key) -> Result<bool> {
        check_finite(key)?;

        let mut rows = self.rows.write();
        match rows.binary_search_by(|&probe| compare_keys(probe, key)) {
            Ok(_) => Ok(false),
            Err(pos) => {
                Arc::make_mut(&mut *rows).insert(pos, key);
                Ok(true)
            },
        }
    }

    /// Remove the row with `key`. Returns whether a row was removed.
    pub fn remove(&self, key: Key) -> bool {
        let mut rows = self.rows.write();
        match rows.binary_search_by(|&probe| compare_keys(probe, key)) {
            Ok(pos) => {
                Arc::make_mut(&mut *rows).remove(pos);
                true
            },
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        *self.rows.write() = Arc::new(Vec::new());
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    pub fn first_key(&self) -> Option<Key> {
        self.rows.read().first().copied()
    }

    pub fn last_key(&self) -> Option<Key> {
        self.rows.read().last().copied()
    }
}

impl Default for RowTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KeySource for RowTable {
    fn keys(&self) -> Arc<Vec<Key>> {
        Arc::clone(&self.rows.read())
    }

    fn rows_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let table = RowTable::new();
        table.append(1.0).unwrap();
        table.append(2.5).unwrap();
        table.append(10.0).unwrap();

        assert_eq!(*table.keys(), vec![1.0, 2.5, 10.0]);
        assert_eq!(table.rows_count(), 3);
        assert_eq!(table.first_key(), Some(1.0));
        assert_eq!(table.last_key(), Some(10.0));
    }

    #[test]
    fn test_append_rejects_out_of_order() {
        let table = RowTable::new();
        table.append(5.0).unwrap();

        assert!(table.append(5.0).unwrap_err().is_out_of_order());
        assert!(table.append(4.0).unwrap_err().is_out_of_order());
        assert!(table.append(f64::NAN).unwrap_err().is_invalid_argument());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insert_and_remove() {
        let table = RowTable::from_keys(vec![0.0, 10.0, 20.0]).unwrap();

        assert!(table.insert(15.0).unwrap());
        assert!(!table.insert(10.0).unwrap());
        assert_eq!(*table.keys(), vec![0.0, 10.0, 15.0, 20.0]);

        assert!(table.remove(0.0));
        assert!(!table.remove(0.0));
        assert_eq!(*table.keys(), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_snapshot_is_isolated_from_writes() {
        let table = RowTable::from_keys(vec![1.0, 2.0]).unwrap();
        let snapshot = table.keys();

        table.append(3.0).unwrap();
        table.remove(1.0);

        assert_eq!(*snapshot, vec![1.0, 2.0]);
        assert_eq!(*table.keys(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_from_keys_validates() {
        assert!(RowTable::from_keys(vec![2.0, 1.0]).is_err());
        assert!(RowTable::from_keys(vec![f64::INFINITY]).is_err());

        let table = RowTable::from_keys(vec![]).unwrap();
        assert!(table.is_empty());
        table.clear();
        assert!(table.is_empty());
    }
}
