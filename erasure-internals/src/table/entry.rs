//! A single type-erased dispatch entry.
//!
//! This module encapsulates the `fptr` field of [`RawEntry`], ensuring it
//! is only visible within this module. This visibility restriction
//! guarantees the safety invariant: **the erased function pointer was
//! produced from a trampoline whose full signature is determined by the
//! operation the entry was created for**.
//!
//! # Safety Invariant
//!
//! An entry can only be created via [`RawEntry::new_ref`] or
//! [`RawEntry::new_mut`], which erase a monomorphized trampoline
//! `unsafe fn(NonNull<Erased>, O::Args) -> O::Output` together with the
//! [`TypeId`] of `O`. The invocation side re-materializes exactly that
//! signature from its own `O` parameter, so as long as the caller passes
//! the same operation type the entry was created with, the function
//! pointer round-trips through the erased representation unchanged.
//!
//! The receiver mode cannot be confused either: [`RawEntry::call_ref`]
//! only accepts operations whose signature declares [`ByRef`], and only
//! [`RawEntry::new_ref`] can create entries for such operations (and
//! symmetrically for [`ByMut`]).

use core::{any::TypeId, mem, ptr::NonNull};

use crate::{
    ops::{ApplyMut, ApplyRef, ByMut, ByRef, Operation},
    util::Erased,
};

/// The uniform representation of an erased trampoline pointer.
///
/// The signature carried by this type is meaningless; entries are always
/// transmuted back to their real monomorphized signature before being
/// called.
type ErasedFn = unsafe fn();

/// One type-erased dispatch entry: a trampoline that invokes a specific
/// operation on a specific concrete type through an untyped self pointer.
///
/// Entries are the elements of a [`RawTable`](crate::RawTable). They are
/// plain old data (two function pointers wide) and freely copyable.
#[derive(Clone, Copy)]
pub struct RawEntry {
    /// Type-erased trampoline. The real signature is
    /// `unsafe fn(NonNull<Erased>, O::Args) -> O::Output` for the
    /// operation `O` recorded in `operation_id`.
    fptr: ErasedFn,
    /// Gets the [`TypeId`] of the operation this entry was created for.
    operation_id: fn() -> TypeId,
}

impl RawEntry {
    /// Creates an entry dispatching the observing operation `O` to the
    /// [`ApplyRef`] implementation of the concrete type `T`.
    pub fn new_ref<T, O>() -> Self
    where
        T: ApplyRef<O> + 'static,
        O: Operation<Receiver = ByRef>,
    {
        /// Reinterprets the self pointer as a `&T` and applies `O`.
        ///
        /// # Safety
        ///
        /// The caller must ensure that `this` addresses an initialized
        /// `T` that stays live and unaliased by `&mut` for the duration
        /// of the call.
        unsafe fn trampoline<T, O>(this: NonNull<Erased>, arguments: O::Args) -> O::Output
        where
            T: ApplyRef<O> + 'static,
            O: Operation<Receiver = ByRef>,
        {
            // SAFETY: `this` addresses a live, unaliased `T`, guaranteed
            // by the caller.
            let value: &T = unsafe { this.cast::<T>().as_ref() };
            value.apply(arguments)
        }

        let fptr: unsafe fn(NonNull<Erased>, O::Args) -> O::Output = trampoline::<T, O>;
        Self {
            // SAFETY: Changing a function pointer's static type does not
            // change its value; `call_ref` transmutes back to this exact
            // monomorphized signature before invoking it.
            fptr: unsafe { mem::transmute::<unsafe fn(NonNull<Erased>, O::Args) -> O::Output, ErasedFn>(fptr) },
            operation_id: TypeId::of::<O>,
        }
    }

    /// Creates an entry dispatching the mutating operation `O` to the
    /// [`ApplyMut`] implementation of the concrete type `T`.
    pub fn new_mut<T, O>() -> Self
    where
        T: ApplyMut<O> + 'static,
        O: Operation<Receiver = ByMut>,
    {
        /// Reinterprets the self pointer as a `&mut T` and applies `O`.
        ///
        /// # Safety
        ///
        /// The caller must ensure that `this` addresses an initialized
        /// `T` to which it has exclusive access for the duration of the
        /// call.
        unsafe fn trampoline<T, O>(this: NonNull<Erased>, arguments: O::Args) -> O::Output
        where
            T: ApplyMut<O> + 'static,
            O: Operation<Receiver = ByMut>,
        {
            let mut this = this.cast::<T>();
            // SAFETY: `this` addresses a live `T` to which we have
            // exclusive access, guaranteed by the caller.
            let value: &mut T = unsafe { this.as_mut() };
            value.apply_mut(arguments)
        }

        let fptr: unsafe fn(NonNull<Erased>, O::Args) -> O::Output = trampoline::<T, O>;
        Self {
            // SAFETY: Changing a function pointer's static type does not
            // change its value; `call_mut` transmutes back to this exact
            // monomorphized signature before invoking it.
            fptr: unsafe { mem::transmute::<unsafe fn(NonNull<Erased>, O::Args) -> O::Output, ErasedFn>(fptr) },
            operation_id: TypeId::of::<O>,
        }
    }

    /// Returns the [`TypeId`] of the operation this entry was created
    /// for.
    #[inline]
    pub fn operation_id(&self) -> TypeId {
        (self.operation_id)()
    }

    /// Invokes the observing operation `O` on the value behind `this`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This entry was created by [`RawEntry::new_ref`] with the same
    ///    operation type `O`.
    /// 2. `this` addresses an initialized value of the concrete type `T`
    ///    the entry was created with, live and unaliased by `&mut` for
    ///    the duration of the call.
    #[inline]
    pub unsafe fn call_ref<O>(&self, this: NonNull<Erased>, arguments: O::Args) -> O::Output
    where
        O: Operation<Receiver = ByRef>,
    {
        debug_assert_eq!(self.operation_id(), TypeId::of::<O>());
        // SAFETY: The entry was created with the same `O` (guaranteed by
        // the caller), so this transmute restores the trampoline's exact
        // monomorphized signature.
        let fptr = unsafe {
            mem::transmute::<ErasedFn, unsafe fn(NonNull<Erased>, O::Args) -> O::Output>(self.fptr)
        };
        // SAFETY: The trampoline requires `this` to address a live,
        // unaliased `T`, guaranteed by the caller.
        unsafe { fptr(this, arguments) }
    }

    /// Invokes the mutating operation `O` on the value behind `this`.
    ///
    /// # Safety
    ///
    /// The caller must ensure:
    ///
    /// 1. This entry was created by [`RawEntry::new_mut`] with the same
    ///    operation type `O`.
    /// 2. `this` addresses an initialized value of the concrete type `T`
    ///    the entry was created with, to which the caller has exclusive
    ///    access for the duration of the call.
    #[inline]
    pub unsafe fn call_mut<O>(&self, this: NonNull<Erased>, arguments: O::Args) -> O::Output
    where
        O: Operation<Receiver = ByMut>,
    {
        debug_assert_eq!(self.operation_id(), TypeId::of::<O>());
        // SAFETY: The entry was created with the same `O` (guaranteed by
        // the caller), so this transmute restores the trampoline's exact
        // monomorphized signature.
        let fptr = unsafe {
            mem::transmute::<ErasedFn, unsafe fn(NonNull<Erased>, O::Args) -> O::Output>(self.fptr)
        };
        // SAFETY: The trampoline requires exclusive access to the `T`
        // behind `this`, guaranteed by the caller.
        unsafe { fptr(this, arguments) }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{format, string::String};

    use super::*;

    /// Test operation: renders the value as text.
    struct Describe;

    impl Operation for Describe {
        type Args = ();
        type Output = String;
        type Receiver = ByRef;
    }

    /// Test operation: doubles the value.
    struct Double;

    impl Operation for Double {
        type Args = ();
        type Output = ();
        type Receiver = ByMut;
    }

    #[derive(Clone)]
    struct Counter(i32);

    impl ApplyRef<Describe> for Counter {
        fn apply(&self, (): ()) -> String {
            format!("counter({})", self.0)
        }
    }

    impl ApplyMut<Double> for Counter {
        fn apply_mut(&mut self, (): ()) {
            self.0 *= 2;
        }
    }

    #[test]
    fn test_entry_dispatches_to_concrete_impl() {
        let entry = RawEntry::new_ref::<Counter, Describe>();
        let mut value = Counter(21);
        let ptr = NonNull::from(&mut value).cast::<Erased>();

        // SAFETY: the entry was created for `(Counter, Describe)` and
        // `ptr` addresses a live `Counter`.
        let rendered = unsafe { entry.call_ref::<Describe>(ptr, ()) };
        assert_eq!(rendered, "counter(21)");
    }

    #[test]
    fn test_mut_entry_mutates_in_place() {
        let entry = RawEntry::new_mut::<Counter, Double>();
        let mut value = Counter(21);
        let ptr = NonNull::from(&mut value).cast::<Erased>();

        // SAFETY: the entry was created for `(Counter, Double)` and we
        // have exclusive access to the `Counter` behind `ptr`.
        unsafe { entry.call_mut::<Double>(ptr, ()) };
        assert_eq!(value.0, 42);
    }

    #[test]
    fn test_entry_records_operation_id() {
        let describe = RawEntry::new_ref::<Counter, Describe>();
        let double = RawEntry::new_mut::<Counter, Double>();
        assert_eq!(describe.operation_id(), TypeId::of::<Describe>());
        assert_eq!(double.operation_id(), TypeId::of::<Double>());
        assert_ne!(describe.operation_id(), double.operation_id());
    }
}
