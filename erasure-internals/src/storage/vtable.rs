//! Vtable for type-erased value ownership operations.
//!
//! This module contains the [`ValueVtable`] which enables dropping and
//! deep-copying a value after its concrete type `T` has been erased. The
//! vtable stores function pointers that dispatch to the correct typed
//! implementations.
//!
//! This module encapsulates the fields of [`ValueVtable`] so they cannot
//! be accessed directly. This visibility restriction guarantees the safety
//! invariant: **the vtable's function pointers always match the concrete
//! type of the value whose storage carries the vtable**.
//!
//! # Safety Invariant
//!
//! This invariant is maintained because vtables are created as `&'static`
//! references via [`ValueVtable::new`], which pairs all function pointers
//! with a single type `T` at compile time, and because the storage types
//! in this crate never separate a vtable from the value it was created
//! for.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::util::Erased;

/// Vtable for type-erased value ownership operations.
///
/// Contains function pointers for dropping and deep-copying a value
/// without knowing its concrete type at compile time. One vtable exists
/// per concrete type; both storage flavors share it, each using the
/// entries that match its allocation discipline (boxed vs. in place).
///
/// # Safety Invariant
///
/// The fields `drop_boxed`, `drop_in_place`, `clone_boxed` and
/// `clone_into` are guaranteed to point to the functions defined below
/// instantiated with the type `T` that was used to create this
/// [`ValueVtable`].
pub(crate) struct ValueVtable {
    /// Gets the [`TypeId`] of the type that was used to create this
    /// [`ValueVtable`].
    type_id: fn() -> TypeId,
    /// Gets the [`core::any::type_name`] of the type that was used to
    /// create this [`ValueVtable`].
    type_name: fn() -> &'static str,
    /// Drops the `Box<T>` instance behind this pointer.
    drop_boxed: unsafe fn(NonNull<Erased>),
    /// Drops the `T` behind this pointer without freeing its backing
    /// memory.
    drop_in_place: unsafe fn(NonNull<Erased>),
    /// Clones the `T` behind this pointer into a fresh heap allocation.
    clone_boxed: unsafe fn(NonNull<Erased>) -> NonNull<Erased>,
    /// Clones the `T` behind the first pointer into the uninitialized
    /// destination behind the second pointer.
    clone_into: unsafe fn(NonNull<Erased>, NonNull<Erased>),
}

impl ValueVtable {
    /// Creates a new [`ValueVtable`] for the type `T`.
    pub(super) const fn new<T: Clone + 'static>() -> &'static Self {
        const {
            &Self {
                type_id: TypeId::of::<T>,
                type_name: core::any::type_name::<T>,
                drop_boxed: drop_boxed::<T>,
                drop_in_place: drop_in_place::<T>,
                clone_boxed: clone_boxed::<T>,
                clone_into: clone_into::<T>,
            }
        }
    }

    /// Gets the [`TypeId`] of the type that was used to create this
    /// [`ValueVtable`].
    #[inline]
    pub(crate) fn type_id(&self) -> TypeId {
        (self.type_id)()
    }

    /// Gets the [`core::any::type_name`] of the type that was used to
    /// create this [`ValueVtable`].
    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        (self.type_name)()
    }

    /// Drops the `Box<T>` instance behind `ptr`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer comes from `Box<T>` via [`Box::into_raw`], where `T`
    ///    is the type this [`ValueVtable`] was created for.
    /// 2. This method drops and frees the value, so the caller must be
    ///    able to transfer ownership of the pointer and must not use it
    ///    afterwards.
    #[inline]
    pub(super) unsafe fn drop_boxed(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop_boxed` points to the function
        // `drop_boxed::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.drop_boxed)(ptr) }
    }

    /// Drops the `T` behind `ptr` in place, without freeing its backing
    /// memory.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer addresses an initialized `T`, where `T` is the type
    ///    this [`ValueVtable`] was created for, and is valid for writes.
    /// 2. This method ends the value's lifetime, so the caller must not
    ///    read the pointee as a `T` afterwards.
    #[inline]
    pub(super) unsafe fn drop_in_place(&self, ptr: NonNull<Erased>) {
        // SAFETY: We know that `self.drop_in_place` points to the function
        // `drop_in_place::<T>` below. That function's safety requirements
        // are upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.drop_in_place)(ptr) }
    }

    /// Clones the `T` behind `ptr` into a fresh heap allocation and
    /// returns the allocation's pointer.
    ///
    /// The returned pointer satisfies the same invariants as a pointer
    /// produced by `Box::into_raw(Box::new(..))` for the vtable's type.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. The pointer addresses an initialized `T`, where `T` is the type
    ///    this [`ValueVtable`] was created for, and is valid for reads
    ///    while the call runs.
    #[inline]
    pub(super) unsafe fn clone_boxed(&self, ptr: NonNull<Erased>) -> NonNull<Erased> {
        // SAFETY: We know that `self.clone_boxed` points to the function
        // `clone_boxed::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        unsafe { (self.clone_boxed)(ptr) }
    }

    /// Clones the `T` behind `source` into the uninitialized memory behind
    /// `destination`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. `source` addresses an initialized `T`, where `T` is the type
    ///    this [`ValueVtable`] was created for, and is valid for reads
    ///    while the call runs.
    /// 2. `destination` is valid for writes of `T`, sufficiently aligned
    ///    for `T`, and does not overlap `source`.
    #[inline]
    pub(super) unsafe fn clone_into(&self, source: NonNull<Erased>, destination: NonNull<Erased>) {
        // SAFETY: We know that `self.clone_into` points to the function
        // `clone_into::<T>` below. That function's safety requirements are
        // upheld:
        // 1. Guaranteed by the caller
        // 2. Guaranteed by the caller
        unsafe { (self.clone_into)(source, destination) }
    }
}

/// Drops the `Box<T>` instance behind `ptr`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer comes from `Box<T>` via [`Box::into_raw`].
/// 2. The value has not already been dropped, ownership is transferred to
///    this call, and the pointer is not used afterwards.
unsafe fn drop_boxed<T>(ptr: NonNull<Erased>) {
    let ptr: *mut T = ptr.cast::<T>().as_ptr();
    // SAFETY: The pointer came from `Box::into_raw` for this exact `T` and
    // ownership is transferred to us, both guaranteed by the caller.
    let boxed = unsafe { Box::from_raw(ptr) };
    drop(boxed);
}

/// Drops the `T` behind `ptr` in place.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer addresses an initialized `T` and is valid for writes.
/// 2. The pointee is not read as a `T` afterwards.
unsafe fn drop_in_place<T>(ptr: NonNull<Erased>) {
    // SAFETY: The pointer addresses an initialized `T` valid for writes,
    // guaranteed by the caller.
    unsafe { ptr.cast::<T>().drop_in_place() }
}

/// Clones the `T` behind `ptr` into a fresh heap allocation.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. The pointer addresses an initialized `T` valid for reads while the
///    call runs.
unsafe fn clone_boxed<T: Clone>(ptr: NonNull<Erased>) -> NonNull<Erased> {
    // SAFETY: The pointer addresses an initialized `T` valid for reads,
    // guaranteed by the caller.
    let value: &T = unsafe { ptr.cast::<T>().as_ref() };
    let clone: *mut T = Box::into_raw(Box::new(value.clone()));
    // SAFETY: `Box::into_raw` returns a non-null pointer.
    unsafe { NonNull::new_unchecked(clone) }.cast::<Erased>()
}

/// Clones the `T` behind `source` into the uninitialized memory behind
/// `destination`.
///
/// # Safety
///
/// The caller must ensure:
///
/// 1. `source` addresses an initialized `T` valid for reads while the
///    call runs.
/// 2. `destination` is valid for writes of `T`, sufficiently aligned for
///    `T`, and does not overlap `source`.
unsafe fn clone_into<T: Clone>(source: NonNull<Erased>, destination: NonNull<Erased>) {
    // SAFETY: `source` addresses an initialized `T` valid for reads,
    // guaranteed by the caller.
    let value: &T = unsafe { source.cast::<T>().as_ref() };
    // SAFETY: `destination` is valid for writes of `T`, aligned, and does
    // not overlap `source`, guaranteed by the caller.
    unsafe { destination.cast::<T>().write(value.clone()) }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    #[test]
    fn test_value_vtable_identity() {
        // Vtables have static lifetime and are deduplicated per type
        let vtable1 = ValueVtable::new::<i32>();
        let vtable2 = ValueVtable::new::<i32>();
        assert!(core::ptr::eq(vtable1, vtable2));

        let other = ValueVtable::new::<String>();
        assert!(!core::ptr::eq(vtable1, other));
    }

    #[test]
    fn test_value_vtable_type_id() {
        let vtable = ValueVtable::new::<i32>();
        assert_eq!(vtable.type_id(), TypeId::of::<i32>());
        assert!(vtable.type_name().contains("i32"));
    }
}
