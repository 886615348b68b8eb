//! Fixed-capacity inline type-erased value storage.
//!
//! This module encapsulates the buffer of [`RawInline`], ensuring it is
//! only visible within this module. This visibility restriction
//! guarantees the safety invariant: **the first `size_of::<T>()` bytes of
//! the buffer always hold an initialized `T`, where `T` is the exact type
//! the paired [`ValueVtable`] was created for**.
//!
//! # Safety Invariant
//!
//! The buffer and vtable can only be initialized together via
//! [`RawInline::new`], which writes a `T` into the buffer in place and
//! pairs it with a vtable created for the same `T`. Neither field can be
//! modified afterward, so the vtable-matches-buffer property holds for
//! the value's entire lifetime.
//!
//! # Capacity and Alignment
//!
//! Unlike heap storage, an inline buffer cannot adapt to its contents:
//! the capacity `SIZE` and the alignment donor type `A` fix the layout at
//! declaration time. [`RawInline::new`] therefore rejects, at compile
//! time, any type whose size exceeds `SIZE` or whose alignment exceeds
//! `align_of::<A>()`. The rejection is a post-monomorphization error: it
//! fires when the offending `new` instantiation is actually compiled.

use core::{any::TypeId, mem::MaybeUninit, ptr::NonNull};

use crate::{storage::vtable::ValueVtable, util::Erased};

/// A `SIZE`-byte buffer whose alignment is donated by the type `A`.
///
/// The `_align` field is zero-sized but forces the struct's alignment up
/// to `align_of::<A>()`, so the byte buffer that follows it is suitably
/// aligned for any value the capacity checks admit.
#[repr(C)]
struct RawBuf<const SIZE: usize, A> {
    /// Zero-sized alignment donor.
    _align: [A; 0],
    /// The value's bytes. Only the first `size_of::<T>()` bytes are
    /// initialized, where `T` is the stored concrete type.
    bytes: [MaybeUninit<u8>; SIZE],
}

impl<const SIZE: usize, A> RawBuf<SIZE, A> {
    /// Creates a fully uninitialized buffer.
    #[inline]
    const fn uninit() -> Self {
        Self {
            _align: [],
            bytes: [MaybeUninit::uninit(); SIZE],
        }
    }
}

/// A type-erased value stored in place inside a fixed-capacity buffer.
///
/// Owns exactly one live value of exactly one concrete type for its
/// lifetime, embedded directly in the storage object rather than behind
/// an allocation. The paired [`ValueVtable`] provides the erased in-place
/// clone and destroy operations, so [`RawInline`] is [`Clone`] (deep copy
/// into the new object's own buffer) and drops the value in place.
pub struct RawInline<const SIZE: usize, A: 'static> {
    /// Vtable created for the concrete type held in `buf`.
    vtable: &'static ValueVtable,
    /// Buffer holding the value in place.
    ///
    /// # Safety
    ///
    /// The following safety invariants are guaranteed to be upheld as
    /// long as this struct exists:
    ///
    /// 1. The start of the buffer holds an initialized `T`, where `T` is
    ///    the type `vtable` was created for, except during the execution
    ///    of the [`Drop`] implementation.
    /// 2. `size_of::<T>() <= SIZE` and `align_of::<T>() <= align_of::<A>()`.
    buf: RawBuf<SIZE, A>,
    /// Marker suppressing the auto traits: the buffer is just bytes, so
    /// without it the storage would be `Send`/`Sync` regardless of what
    /// value was erased into it.
    _marker: core::marker::PhantomData<*mut Erased>,
}

impl<const SIZE: usize, A: 'static> RawInline<SIZE, A> {
    /// Creates a new [`RawInline`] holding `value` in place.
    ///
    /// Fails to compile when `T` does not fit the buffer: either
    /// `size_of::<T>() > SIZE` or `align_of::<T>() > align_of::<A>()`.
    #[inline]
    pub fn new<T: Clone + 'static>(value: T) -> Self {
        const {
            assert!(
                size_of::<T>() <= SIZE,
                "value type does not fit the inline storage capacity"
            );
            assert!(
                align_of::<T>() <= align_of::<A>(),
                "value type requires stricter alignment than the inline storage provides"
            );
        }
        let mut this = Self {
            vtable: ValueVtable::new::<T>(),
            buf: RawBuf::uninit(),
            _marker: core::marker::PhantomData,
        };
        // SAFETY: The const assertions above guarantee the buffer is large
        // enough and sufficiently aligned for a `T`; the buffer is owned
        // and uninitialized, so it is valid for this write.
        unsafe { this.as_mut_ptr().cast::<T>().write(value) };
        this
    }

    /// Returns the address of the held value.
    ///
    /// The pointee is an initialized value of the concrete type this
    /// storage was created with; the pointer is valid for reads for as
    /// long as this storage exists, is not moved, and is not dropped.
    #[inline]
    pub fn as_ptr(&self) -> NonNull<Erased> {
        NonNull::from(&self.buf.bytes).cast::<Erased>()
    }

    /// Returns the address of the held value for mutation.
    ///
    /// Requiring `&mut self` here is what keeps exclusive access to the
    /// buffer tied to exclusive access to the storage.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        NonNull::from(&mut self.buf.bytes).cast::<Erased>()
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

impl<const SIZE: usize, A: 'static> Clone for RawInline<SIZE, A> {
    #[inline]
    fn clone(&self) -> Self {
        let mut clone = Self {
            vtable: self.vtable,
            buf: RawBuf::uninit(),
            _marker: core::marker::PhantomData,
        };
        // SAFETY:
        // 1. Our buffer holds an initialized value of the vtable's type,
        //    valid for reads, guaranteed by the invariants on `RawInline`.
        // 2. The destination buffer has identical size and alignment, is
        //    uninitialized and exclusively owned by `clone`, and cannot
        //    overlap our buffer.
        unsafe { self.vtable.clone_into(self.as_ptr(), clone.as_mut_ptr()) };
        clone
    }
}

impl<const SIZE: usize, A: 'static> Drop for RawInline<SIZE, A> {
    #[inline]
    fn drop(&mut self) {
        let ptr = self.as_mut_ptr();
        // SAFETY:
        // 1. The buffer holds an initialized value of the vtable's type,
        //    valid for writes, guaranteed by the invariants on `RawInline`.
        // 2. We are in the drop function, so the buffer is not read as the
        //    stored type afterwards.
        unsafe { self.vtable.drop_in_place(ptr) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;

    /// 16-byte alignment donor for the tests.
    #[repr(align(16))]
    #[derive(Clone, Copy)]
    struct Align16;

    #[test]
    fn test_raw_inline_layout() {
        // The buffer lives inside the storage object itself
        assert!(core::mem::size_of::<RawInline<24, Align16>>() >= 24);
        assert_eq!(core::mem::align_of::<RawInline<24, Align16>>(), 16);
    }

    #[test]
    fn test_raw_inline_holds_value() {
        let storage = RawInline::<24, Align16>::new(String::from("inline"));
        assert_eq!(storage.value_type_id(), TypeId::of::<String>());

        // SAFETY: the storage was created over a `String` just above.
        let value: &String = unsafe { storage.as_ptr().cast::<String>().as_ref() };
        assert_eq!(value, "inline");
    }

    #[test]
    fn test_raw_inline_clone_uses_distinct_buffers() {
        let original = RawInline::<24, Align16>::new(String::from("copied"));
        let clone = original.clone();

        assert_ne!(original.as_ptr(), clone.as_ptr());

        // SAFETY: the storage was created over a `String` just above.
        let original_value: &String = unsafe { original.as_ptr().cast::<String>().as_ref() };
        // SAFETY: cloning preserves the concrete type.
        let clone_value: &String = unsafe { clone.as_ptr().cast::<String>().as_ref() };
        assert_eq!(original_value, clone_value);
        assert_ne!(original_value.as_ptr(), clone_value.as_ptr());
    }

    #[test]
    fn test_send_sync() {
        static_assertions::assert_not_impl_any!(RawInline<8, u64>: Send, Sync);
    }
}
