//! The free dispatch entry points.
//!
//! `call(operation, &handle, arguments)` resolves the operation to its
//! slot in the handle's interface, fetches the table entry installed at
//! that slot, and invokes it with the erased value's address. The slot
//! index is a compile-time constant and the entry's full signature is
//! fixed by the operation type on both the building and the calling side,
//! so the whole path costs one table index and one indirect call — no
//! lookup, no checking, no allocation.
//!
//! A mismatched invocation is not a runtime case to handle but a build
//! failure: an operation outside the interface has no slot
//! ([`Selects`] is unsatisfied), and a receiver-mode mismatch fails the
//! `Operation<Receiver = ..>` bound.

use erasure_internals::{ByMut, ByRef, Operation};

use crate::{
    interface::Interface,
    poly::Poly,
    slots::Selects,
    storage::Storage,
    tables::TableStrategy,
};

/// Invokes the observing operation `operation` on the value erased
/// behind `poly`.
///
/// For every concrete value `v` satisfying the interface, dispatch is
/// exact: `call(op, &Poly::new(v), args)` returns what `op` applied
/// directly to `v` with `args` would return.
///
/// The `At` parameter is found by inference; callers supply only the
/// operation, the handle, and the argument tuple.
///
/// # Examples
///
/// ```
/// use erasure::prelude::*;
///
/// erasure::operations! {
///     /// Doubles a number and adds an offset.
///     pub Shift(&self, i64) -> i64;
/// }
///
/// erasure::interface! {
///     /// Numbers that can shift.
///     pub Shifting = [Shift];
/// }
///
/// #[derive(Clone)]
/// struct Base(i64);
///
/// impl ApplyRef<Shift> for Base {
///     fn apply(&self, (offset,): (i64,)) -> i64 {
///         self.0 * 2 + offset
///     }
/// }
///
/// let handle: Poly<Shifting> = Poly::new(Base(20));
/// assert_eq!(erasure::call(Shift, &handle, (2,)), 42);
/// ```
pub fn call<I, S, D, O, At>(operation: O, poly: &Poly<I, S, D>, arguments: O::Args) -> O::Output
where
    I: Interface,
    S: Storage,
    D: TableStrategy,
    O: Operation<Receiver = ByRef>,
    I::Operations: Selects<O, At>,
{
    let _ = operation;
    let entry = D::entry(poly.table(), <I::Operations as Selects<O, At>>::SLOT);
    let this = poly.storage().as_ptr();
    // SAFETY:
    // 1. `SLOT` is `O`'s position in `I::Operations`, and the handle's
    //    table holds, at each slot, the entry synthesized from that
    //    slot's operation over the handle's concrete type (guaranteed by
    //    `Poly::new` together with the `TableStrategy` contract), so this
    //    entry was created by `new_ref` with the same `O`.
    // 2. `this` addresses the live value of that same concrete type
    //    (guaranteed by the `Storage` contract), and our shared borrow of
    //    `poly` keeps it unaliased by `&mut` for the duration of the
    //    call.
    unsafe { entry.call_ref::<O>(this, arguments) }
}

/// Invokes the mutating operation `operation` on the value erased behind
/// `poly`.
///
/// Requires exclusive access to the handle, which is what makes handing
/// the erased value to the operation as `&mut` sound.
///
/// # Examples
///
/// ```
/// use erasure::prelude::*;
///
/// erasure::operations! {
///     /// Reads the counter.
///     pub Get(&self) -> u32;
///     /// Advances the counter.
///     pub Bump(&mut self);
/// }
///
/// erasure::interface! {
///     /// Counters.
///     pub Counting = [Get, Bump];
/// }
///
/// #[derive(Clone)]
/// struct Counter(u32);
///
/// impl ApplyRef<Get> for Counter {
///     fn apply(&self, (): ()) -> u32 {
///         self.0
///     }
/// }
///
/// impl ApplyMut<Bump> for Counter {
///     fn apply_mut(&mut self, (): ()) {
///         self.0 += 1;
///     }
/// }
///
/// let mut handle: Poly<Counting> = Poly::new(Counter(41));
/// erasure::call_mut(Bump, &mut handle, ());
/// assert_eq!(erasure::call(Get, &handle, ()), 42);
/// ```
pub fn call_mut<I, S, D, O, At>(
    operation: O,
    poly: &mut Poly<I, S, D>,
    arguments: O::Args,
) -> O::Output
where
    I: Interface,
    S: Storage,
    D: TableStrategy,
    O: Operation<Receiver = ByMut>,
    I::Operations: Selects<O, At>,
{
    let _ = operation;
    let entry = *D::entry(poly.table(), <I::Operations as Selects<O, At>>::SLOT);
    let this = poly.storage_mut().as_mut_ptr();
    // SAFETY:
    // 1. `SLOT` is `O`'s position in `I::Operations`, and the handle's
    //    table holds, at each slot, the entry synthesized from that
    //    slot's operation over the handle's concrete type (guaranteed by
    //    `Poly::new` together with the `TableStrategy` contract), so this
    //    entry was created by `new_mut` with the same `O`.
    // 2. `this` addresses the live value of that same concrete type
    //    (guaranteed by the `Storage` contract), and our exclusive borrow
    //    of `poly` makes the access exclusive for the duration of the
    //    call.
    unsafe { entry.call_mut::<O>(this, arguments) }
}
