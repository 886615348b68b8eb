//! Ordered collections of dispatch entries.

use alloc::{boxed::Box, vec::Vec};

use crate::table::entry::RawEntry;

/// An ordered sequence of dispatch entries, one per interface slot.
///
/// A table is built once per (interface, concrete type) pair by whatever
/// dispatch-table policy is active, from entries supplied by the caller;
/// the table itself neither knows nor cares how entries are synthesized.
/// Its length equals the interface's slot count at build time, and slot
/// `i` of the table holds the entry for slot `i` of the interface.
///
/// Tables are immutable after construction. The two common ownership
/// forms are a leaked `&'static RawTable` (shared by every handle of the
/// same concrete type) and a reference-counted allocation (shared by
/// clones of one handle family).
pub struct RawTable {
    /// The entries, in slot order.
    entries: Box<[RawEntry]>,
}

impl RawTable {
    /// Creates a table from entries in slot order.
    #[inline]
    pub fn new(entries: Vec<RawEntry>) -> Self {
        Self {
            entries: entries.into_boxed_slice(),
        }
    }

    /// Leaks the table, yielding a `'static` reference.
    ///
    /// This is the publication step of the shared-table policy: the table
    /// deliberately lives for the rest of the process, so every handle of
    /// the same concrete type can share it by reference.
    #[inline]
    pub fn leak(self) -> &'static RawTable {
        Box::leak(Box::new(self))
    }

    /// Returns the number of slots in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry at `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range. Dispatch through a handle never
    /// reaches this case: slot indices there are compile-time constants
    /// bounded by the interface's slot count.
    #[inline]
    pub fn entry(&self, slot: usize) -> &RawEntry {
        &self.entries[slot]
    }
}
