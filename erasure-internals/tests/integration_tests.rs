//! Integration tests for the erasure-internals crate.
//!
//! This test suite exercises the raw building blocks together, the way
//! the `erasure` surface crate composes them:
//!
//! ## Dispatch Tests
//! - `test_entry_dispatch_per_type`: One operation dispatched to two
//!   unrelated concrete types through separately built entries
//! - `test_mut_entry_roundtrip`: Mutation through an erased entry is
//!   observable through a subsequent observing dispatch
//! - `test_table_slot_order`: Tables preserve the order entries were
//!   supplied in, across mixed receiver modes
//!
//! ## Storage Tests
//! - `test_boxed_storage_deep_clone`: Cloned heap storage owns an
//!   independent value
//! - `test_inline_storage_deep_clone`: Cloned inline storage owns an
//!   independent value in its own buffer
//! - `test_storage_drop_accounting`: Values are dropped exactly once per
//!   storage, for both flavors
//! - `test_storage_vtable_consistency`: Both storage flavors report the
//!   same type identity for the same concrete type
//!
//! ## Layout Tests
//! - `test_sizes`: `RawBoxed` stays two pointers wide; `RawEntry` stays
//!   two function pointers wide
//! - `test_send_sync`: The raw types do not leak auto traits

use std::{any::TypeId, cell::RefCell, fmt::Write as _, ptr::NonNull, rc::Rc};

use erasure_internals::{
    ApplyMut, ApplyRef, ByMut, ByRef, Erased, Operation, RawBoxed, RawEntry, RawInline, RawTable,
};

/// 16-byte alignment donor for inline storages in this suite.
#[repr(align(16))]
#[derive(Clone, Copy)]
struct Align16;

// Test operations

/// Renders the value as text.
struct Describe;

impl Operation for Describe {
    type Args = ();
    type Output = String;
    type Receiver = ByRef;
}

/// Appends a suffix to the value's label.
struct Label;

impl Operation for Label {
    type Args = (&'static str,);
    type Output = String;
    type Receiver = ByRef;
}

/// Multiplies the value by a factor.
struct Scale;

impl Operation for Scale {
    type Args = (i64,);
    type Output = ();
    type Receiver = ByMut;
}

// Test concrete types

#[derive(Clone)]
struct Gauge {
    name: String,
    value: i64,
}

impl ApplyRef<Describe> for Gauge {
    fn apply(&self, (): ()) -> String {
        format!("{}={}", self.name, self.value)
    }
}

impl ApplyRef<Label> for Gauge {
    fn apply(&self, (suffix,): (&'static str,)) -> String {
        let mut label = self.name.clone();
        let _ = write!(label, "{suffix}");
        label
    }
}

impl ApplyMut<Scale> for Gauge {
    fn apply_mut(&mut self, (factor,): (i64,)) {
        self.value *= factor;
    }
}

#[derive(Clone)]
struct Toggle(bool);

impl ApplyRef<Describe> for Toggle {
    fn apply(&self, (): ()) -> String {
        if self.0 { "on".to_owned() } else { "off".to_owned() }
    }
}

#[test]
fn test_entry_dispatch_per_type() {
    let gauge_entry = RawEntry::new_ref::<Gauge, Describe>();
    let toggle_entry = RawEntry::new_ref::<Toggle, Describe>();

    let gauge = RawBoxed::new(Gauge {
        name: "speed".to_owned(),
        value: 88,
    });
    let toggle = RawBoxed::new(Toggle(true));

    // SAFETY: each entry is invoked with the storage of the concrete type
    // it was built for, with the operation it was built for.
    let gauge_text = unsafe { gauge_entry.call_ref::<Describe>(gauge.as_ptr(), ()) };
    // SAFETY: as above.
    let toggle_text = unsafe { toggle_entry.call_ref::<Describe>(toggle.as_ptr(), ()) };

    assert_eq!(gauge_text, "speed=88");
    assert_eq!(toggle_text, "on");
}

#[test]
fn test_mut_entry_roundtrip() {
    let scale = RawEntry::new_mut::<Gauge, Scale>();
    let describe = RawEntry::new_ref::<Gauge, Describe>();

    let mut storage = RawBoxed::new(Gauge {
        name: "rpm".to_owned(),
        value: 700,
    });

    // SAFETY: the entry matches the stored type and operation, and
    // `as_mut_ptr` hands out the pointer under exclusive access.
    unsafe { scale.call_mut::<Scale>(storage.as_mut_ptr(), (3,)) };
    // SAFETY: the entry matches the stored type and operation.
    let text = unsafe { describe.call_ref::<Describe>(storage.as_ptr(), ()) };
    assert_eq!(text, "rpm=2100");
}

#[test]
fn test_table_slot_order() {
    let table = RawTable::new(vec![
        RawEntry::new_ref::<Gauge, Describe>(),
        RawEntry::new_mut::<Gauge, Scale>(),
        RawEntry::new_ref::<Gauge, Label>(),
    ]);

    assert_eq!(table.len(), 3);
    assert_eq!(table.entry(0).operation_id(), TypeId::of::<Describe>());
    assert_eq!(table.entry(1).operation_id(), TypeId::of::<Scale>());
    assert_eq!(table.entry(2).operation_id(), TypeId::of::<Label>());

    let storage = RawBoxed::new(Gauge {
        name: "fuel".to_owned(),
        value: 40,
    });
    // SAFETY: slot 2 holds the `(Gauge, Label)` entry installed above.
    let label = unsafe { table.entry(2).call_ref::<Label>(storage.as_ptr(), ("_pct",)) };
    assert_eq!(label, "fuel_pct");
}

#[test]
fn test_boxed_storage_deep_clone() {
    let scale = RawEntry::new_mut::<Gauge, Scale>();
    let describe = RawEntry::new_ref::<Gauge, Describe>();

    let original = RawBoxed::new(Gauge {
        name: "depth".to_owned(),
        value: 10,
    });
    let mut clone = original.clone();
    assert_ne!(original.as_ptr(), clone.as_ptr());

    // SAFETY: entry matches the stored type and operation; exclusive
    // access comes from `as_mut_ptr`.
    unsafe { scale.call_mut::<Scale>(clone.as_mut_ptr(), (5,)) };

    // SAFETY: entry matches the stored type and operation.
    let original_text = unsafe { describe.call_ref::<Describe>(original.as_ptr(), ()) };
    // SAFETY: as above.
    let clone_text = unsafe { describe.call_ref::<Describe>(clone.as_ptr(), ()) };
    assert_eq!(original_text, "depth=10");
    assert_eq!(clone_text, "depth=50");
}

#[test]
fn test_inline_storage_deep_clone() {
    let scale = RawEntry::new_mut::<Gauge, Scale>();
    let describe = RawEntry::new_ref::<Gauge, Describe>();

    let original = RawInline::<40, Align16>::new(Gauge {
        name: "depth".to_owned(),
        value: 10,
    });
    let mut clone = original.clone();
    assert_ne!(original.as_ptr(), clone.as_ptr());

    // SAFETY: entry matches the stored type and operation; exclusive
    // access comes from `as_mut_ptr`.
    unsafe { scale.call_mut::<Scale>(clone.as_mut_ptr(), (5,)) };

    // SAFETY: entry matches the stored type and operation.
    let original_text = unsafe { describe.call_ref::<Describe>(original.as_ptr(), ()) };
    // SAFETY: as above.
    let clone_text = unsafe { describe.call_ref::<Describe>(clone.as_ptr(), ()) };
    assert_eq!(original_text, "depth=10");
    assert_eq!(clone_text, "depth=50");
}

/// Value that records its clones and drops in a shared log.
#[derive(Clone)]
struct Tracked {
    log: Rc<RefCell<Vec<&'static str>>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.borrow_mut().push("drop");
    }
}

#[test]
fn test_storage_drop_accounting() {
    // Boxed flavor
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let storage = RawBoxed::new(Tracked { log: log.clone() });
        let clone = storage.clone();
        assert_eq!(log.borrow().len(), 0);
        drop(storage);
        assert_eq!(*log.borrow(), ["drop"]);
        drop(clone);
    }
    // One drop per storage: the original's and the clone's
    assert_eq!(*log.borrow(), ["drop", "drop"]);

    // Inline flavor
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let storage = RawInline::<16, Align16>::new(Tracked { log: log.clone() });
        let clone = storage.clone();
        assert_eq!(log.borrow().len(), 0);
        drop(storage);
        assert_eq!(*log.borrow(), ["drop"]);
        drop(clone);
    }
    assert_eq!(*log.borrow(), ["drop", "drop"]);
}

#[test]
fn test_storage_vtable_consistency() {
    let boxed = RawBoxed::new(Toggle(false));
    let inline = RawInline::<8, Align16>::new(Toggle(false));

    assert_eq!(boxed.value_type_id(), TypeId::of::<Toggle>());
    assert_eq!(inline.value_type_id(), TypeId::of::<Toggle>());
    assert_eq!(boxed.value_type_name(), inline.value_type_name());
}

#[test]
fn test_sizes() {
    assert_eq!(
        std::mem::size_of::<RawBoxed>(),
        2 * std::mem::size_of::<usize>()
    );
    assert_eq!(
        std::mem::size_of::<RawEntry>(),
        2 * std::mem::size_of::<usize>()
    );
}

#[test]
fn test_send_sync() {
    static_assertions::assert_not_impl_any!(RawBoxed: Send, Sync);
    static_assertions::assert_not_impl_any!(RawInline<16, Align16>: Send, Sync);
    static_assertions::assert_impl_all!(RawEntry: Send, Sync);
    static_assertions::assert_impl_all!(RawTable: Send, Sync);
    static_assertions::assert_impl_all!(NonNull<Erased>: Copy);
}
