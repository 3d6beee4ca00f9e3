/// Key sources feeding a [`Registry`](crate::registry::Registry)
///
/// A source is any externally owned table whose rows are ordered by an
/// ascending, unique numeric key. The registry only ever reads a source
/// through a snapshot of its keys; it never mutates or takes ownership of the
/// rows behind it.
///
/// ```text
/// Registry
///     ├─→ Arc<dyn KeySource>  (RowTable, or any owner-defined store)
///     ├─→ Arc<dyn KeySource>
///     └─→ merged Arc<Vec<Key>>
/// ```
///
/// Snapshots are `Arc<Vec<Key>>` so a single-source registry can share the
/// source's rows without copying them.
use std::sync::Arc;

use crate::util::Key;

mod row_table;

pub use row_table::RowTable;

/// Read side of a sorted row store.
pub trait KeySource: Send + Sync {
    /// Snapshot of all row keys, strictly ascending.
    fn keys(&self) -> Arc<Vec<Key>>;

    /// Number of rows in the source.
    ///
    /// Used to decide whether every source is aligned index-for-index with
    /// the merged sequence.
    fn rows_count(&self) -> usize {
        self.keys().len()
    }
}

/// Copies the vector on every snapshot. Use `Arc<Vec<Key>>` to share it.
impl KeySource for Vec<Key> {
    fn keys(&self) -> Arc<Vec<Key>> {
        Arc::new(self.clone())
    }

    fn rows_count(&self) -> usize {
        self.len()
    }
}

impl KeySource for Arc<Vec<Key>> {
    fn keys(&self) -> Arc<Vec<Key>> {
        Arc::clone(self)
    }

    fn rows_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_source_copies_snapshot() {
        let source = vec![1.0, 2.0, 3.0];
        assert!(!Arc::ptr_eq(&source.keys(), &source.keys()));
        assert_eq!(source.rows_count(), 3);
    }

    #[test]
    fn test_shared_vec_source_reuses_snapshot() {
        let source = Arc::new(vec![1.0, 2.0, 3.0]);
        assert!(Arc::ptr_eq(&source.keys(), &source));
        assert_eq!(source.rows_count(), 3);
    }
}
