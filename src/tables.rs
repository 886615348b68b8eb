//! Dispatch-table policies: who owns a handle's table, and for how long.
//!
//! A [`Poly`](crate::Poly) handle reaches its dispatch entries through a
//! [`TableStrategy`]. Two are provided:
//!
//! - [`SharedTables`] (the default): one table per (interface, concrete
//!   type) pair for the whole process, built on first use and shared by
//!   reference. Copying a handle copies a wide pointer, whatever the
//!   slot count.
//! - [`OwnedTables`]: a reference-counted table per constructed handle
//!   family, with no process-wide state.
//!
//! Strategies store and retrieve entries; they never build them. The
//! entries for a table are synthesized by the handle constructor from the
//! interface's declared operation list and handed in as a builder
//! function.

use alloc::vec::Vec;
use core::any::TypeId;

use erasure_internals::{RawEntry, RawTable};
use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;
use triomphe::Arc;

use crate::{interface::Interface, lock::RegistryLock, registry};

/// Policy governing how dispatch tables are owned and shared.
///
/// # Safety
///
/// Implementations must guarantee, for every table handle returned by
/// [`table`](TableStrategy::table) for a pair `(I, T)`:
///
/// 1. [`entry`](TableStrategy::entry) at slot `i` returns the `i`-th
///    entry of a sequence produced by the `build` function supplied for
///    the same `(I, T)` pair — unmodified, unreordered, and not mixed
///    with entries from any other pair.
/// 2. The entries stay valid for as long as any table handle for the
///    pair exists.
///
/// Dispatch relies on this to pair a slot's compile-time types with the
/// trampoline installed at that slot.
pub unsafe trait TableStrategy: 'static {
    /// The table handle stored in each [`Poly`](crate::Poly).
    ///
    /// Cloning a table handle must be cheap and must yield a handle to
    /// the same entries; this is what keeps handle copies cheap
    /// regardless of how many operations an interface has.
    type Table: Clone;

    /// Returns the dispatch table for the pair `(I, T)`, building it from
    /// the entries `build` produces if the policy does not have one yet.
    fn table<I: Interface, T: 'static>(build: fn() -> Vec<RawEntry>) -> Self::Table;

    /// Returns the entry at `slot`.
    fn entry(table: &Self::Table, slot: usize) -> &RawEntry;
}

/// Map from (interface, concrete type) to its published shared table.
type TableMap = HashMap<(TypeId, TypeId), &'static RawTable, FxBuildHasher>;

/// The process-wide shared-table registry.
static TABLES: RegistryLock<TableMap> =
    RegistryLock::new(TableMap::with_hasher(FxBuildHasher));

/// The default table policy: one `'static` table per (interface,
/// concrete type) pair, lazily built exactly once and shared by every
/// handle of that pair thereafter.
///
/// The table is leaked on publication — a deliberate process-lifetime
/// allocation, one per pair, which is what makes the handle's table field
/// a bare `&'static` reference.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct SharedTables;

// SAFETY: a published table is inserted exactly once per key, built from
// the `build` function supplied for that key, and never modified or
// removed afterwards; `entry` indexes it directly.
unsafe impl TableStrategy for SharedTables {
    type Table = &'static RawTable;

    fn table<I: Interface, T: 'static>(build: fn() -> Vec<RawEntry>) -> Self::Table {
        let key = (TypeId::of::<I>(), TypeId::of::<T>());
        let published = TABLES.read().get().get(&key).copied();
        if let Some(table) = published {
            return table;
        }

        // Built outside the write lock; dropped unused if another thread
        // wins the publication race below.
        let entries = build();
        debug_assert_eq!(entries.len(), registry::slot_count::<I>());

        let mut guard = TABLES.write();
        *guard
            .get_mut()
            .entry(key)
            .or_insert_with(|| RawTable::new(entries).leak())
    }

    #[inline]
    fn entry(table: &Self::Table, slot: usize) -> &RawEntry {
        table.entry(slot)
    }
}

/// Table policy without process-wide state: each handle construction
/// builds its own reference-counted table, shared only by that handle's
/// clones.
///
/// Trades table reuse across independently constructed handles for the
/// absence of global, process-lifetime allocations.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct OwnedTables;

// SAFETY: the table is built from the supplied `build` function and
// frozen inside the `Arc`; `entry` indexes it directly.
unsafe impl TableStrategy for OwnedTables {
    type Table = Arc<RawTable>;

    fn table<I: Interface, T: 'static>(build: fn() -> Vec<RawEntry>) -> Self::Table {
        let entries = build();
        debug_assert_eq!(entries.len(), registry::slot_count::<I>());
        Arc::new(RawTable::new(entries))
    }

    #[inline]
    fn entry(table: &Self::Table, slot: usize) -> &RawEntry {
        table.entry(slot)
    }
}
