//! Heap-owned type-erased value storage.
//!
//! This module encapsulates the `ptr` field of [`RawBoxed`], ensuring it
//! is only visible within this module. This visibility restriction
//! guarantees the safety invariant: **the pointer always comes from
//! `Box<T>` for the exact `T` the paired [`ValueVtable`] was created
//! for**.
//!
//! # Safety Invariant
//!
//! Since the `ptr` and `vtable` fields can only be set together via
//! [`RawBoxed::new`] (which creates the pointer from [`Box::into_raw`]
//! and the vtable from [`ValueVtable::new`] with the same `T`), and
//! cannot be modified afterward, pointer provenance and the
//! vtable-matches-pointee property hold for the value's entire lifetime.
//!
//! The [`Drop`] and [`Clone`] implementations rely on this invariant to
//! safely free and deep-copy the erased value.

use alloc::boxed::Box;
use core::{any::TypeId, ptr::NonNull};

use crate::{storage::vtable::ValueVtable, util::Erased};

/// A heap-owned, type-erased value.
///
/// Owns exactly one live value of exactly one concrete type for its
/// lifetime. The concrete type is erased; the paired [`ValueVtable`]
/// knows how to deep-copy and destroy the value anyway, so [`RawBoxed`]
/// is [`Clone`] (deep copy) and frees the value on drop.
///
/// Two pointers wide: the value pointer and the vtable reference.
pub struct RawBoxed {
    /// Pointer to the heap-allocated value.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as
    /// long as this struct exists:
    ///
    /// 1. The pointer was created from a `Box<T>` using [`Box::into_raw`],
    ///    where `T` is the type `vtable` was created for.
    /// 2. The pointer addresses the same initialized `T` for the entire
    ///    lifetime of this object, except during the execution of the
    ///    [`Drop`] implementation.
    ptr: NonNull<Erased>,
    /// Vtable created for the concrete type behind `ptr`.
    vtable: &'static ValueVtable,
}

impl RawBoxed {
    /// Creates a new [`RawBoxed`] owning a heap allocation of `value`.
    #[inline]
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        let ptr: *mut T = Box::into_raw(Box::new(value));
        // SAFETY: `Box::into_raw` returns a non-null pointer.
        let ptr = unsafe { NonNull::new_unchecked(ptr) };
        Self {
            ptr: ptr.cast::<Erased>(),
            vtable: ValueVtable::new::<T>(),
        }
    }

    /// Returns the address of the held value.
    ///
    /// The pointee is an initialized value of the concrete type this
    /// storage was created with; the pointer is valid for reads for as
    /// long as this storage exists and is not dropped.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<Erased> {
        self.ptr
    }

    /// Returns the address of the held value for mutation.
    ///
    /// Requiring `&mut self` here is what keeps exclusive access to the
    /// pointee tied to exclusive access to the storage.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        self.ptr
    }

    /// Returns the [`TypeId`] of the held value.
    #[inline]
    pub fn value_type_id(&self) -> TypeId {
        self.vtable.type_id()
    }

    /// Returns the [`core::any::type_name`] of the held value.
    #[inline]
    pub fn value_type_name(&self) -> &'static str {
        self.vtable.type_name()
    }
}

impl Clone for RawBoxed {
    #[inline]
    fn clone(&self) -> Self {
        // SAFETY:
        // 1. The pointer addresses an initialized value of the vtable's
        //    type and stays valid for the duration of the call, both
        //    guaranteed by the invariants on `RawBoxed`.
        let ptr = unsafe { self.vtable.clone_boxed(self.ptr) };
        Self {
            ptr,
            vtable: self.vtable,
        }
    }
}

impl Drop for RawBoxed {
    #[inline]
    fn drop(&mut self) {
        // SAFETY:
        // 1. The pointer comes from `Box::into_raw` for the vtable's type,
        //    guaranteed by the invariants on `RawBoxed`.
        // 2. The value has not previously been dropped, we own it, and we
        //    are in the drop function so the pointer is not used
        //    afterwards.
        unsafe { self.vtable.drop_boxed(self.ptr) }
    }
}
