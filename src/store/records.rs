//! Append-only, in-memory record sequences. One store holds one record kind
//! for the current session; nothing is persisted, so the whole dataset lives
//! and dies with the process. Every function here tries to encapsulate one
//! piece of the store contract so the rest of the codebase can stay focused
//! on UI state management.

/// Ordered collection with newest-first insertion and id allocation.
///
/// Display order and recency order are the same thing: index 0 is always
/// the most recently appended record. Records are never updated or removed,
/// so the views can hold plain slices between renders.
pub struct RecordStore<T> {
    records: Vec<T>,
    next_id: u64,
}

impl<T> RecordStore<T> {
    /// Start an empty store. Ids begin at 1 so 0 never appears in the UI.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }

    /// Hand out the next unique id for a record about to be built. Separate
    /// from [`Self::append`] because the caller constructs the record (and
    /// derives its totals) before handing it over.
    pub fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Prepend a record. Always succeeds: validation happened at the form
    /// layer and the store performs no deduplication of its own.
    pub fn append(&mut self, record: T) {
        self.records.insert(0, record);
        log::debug!("store now holds {} record(s)", self.records.len());
    }

    /// Full sequence, newest first.
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// The most recently appended record, if any.
    pub fn latest(&self) -> Option<&T> {
        self.records.first()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_puts_newest_first() {
        let mut store = RecordStore::new();
        store.append("older");
        store.append("newer");
        assert_eq!(store.records(), ["newer", "older"]);
        assert_eq!(store.latest(), Some(&"newer"));
    }

    #[test]
    fn allocated_ids_are_unique_and_increasing() {
        let mut store: RecordStore<()> = RecordStore::new();
        let first = store.alloc_id();
        let second = store.alloc_id();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn fresh_store_is_empty() {
        let store: RecordStore<u32> = RecordStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.latest().is_none());
    }
}
