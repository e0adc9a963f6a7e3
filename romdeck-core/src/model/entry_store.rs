//! ``src/model/entry_store.rs``
//! ============================================================================
//! # `EntryStore`: Ordered ROM filename list
//!
//! Holds the filenames accepted by the populator in enumeration order. Indices
//! stay valid until the next [`EntryStore::clear_all`].

use compact_str::CompactString;

/// Insertion-ordered list of ROM filenames (no path prefix).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<CompactString>,
}

impl EntryStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Copies `name` and appends it as the last entry.
    pub fn append(&mut self, name: &str) {
        self.entries.push(CompactString::new(name));
    }

    /// Drops every stored entry and releases the backing allocation.
    pub fn clear_all(&mut self) {
        self.entries = Vec::new();
    }

    /// Entry at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(CompactString::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last valid index, if any.
    #[must_use]
    pub fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.entries.iter().map(CompactString::as_str)
    }
}

impl<'a> Extend<&'a str> for EntryStore {
    fn extend<T: IntoIterator<Item = &'a str>>(&mut self, iter: T) {
        for name in iter {
            self.append(name);
        }
    }
}
