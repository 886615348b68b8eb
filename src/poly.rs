//! The polymorphic handle.

use core::{any::type_name, fmt, marker::PhantomData};

use erasure_internals::{ByMut, ByRef, Operation};

use crate::{
    dispatch,
    interface::{Implements, Interface},
    registry,
    slots::{OperationList, Selects},
    storage::{BoxStorage, Storage},
    tables::{SharedTables, TableStrategy},
};

/// A value of some erased concrete type, usable through the operations of
/// the interface `I`.
///
/// `Poly` is an ordinary value type: construct it from any concrete value
/// satisfying the interface, clone it (deep copy), move it, let it drop.
/// The concrete type is gone from the handle's type — two handles built
/// over a `Circle` and a `Square` have the same type and can live in the
/// same collection — but every operation still dispatches to the concrete
/// implementation, through one indirect call.
///
/// The two policy parameters can be swapped without touching call sites:
///
/// - `S`: the [`Storage`] policy — [`BoxStorage`] (default, heap) or
///   [`InlineStorage`](crate::InlineStorage) (in place, fixed capacity).
/// - `D`: the [`TableStrategy`] policy — [`SharedTables`] (default, one
///   table per concrete type process-wide) or
///   [`OwnedTables`](crate::OwnedTables).
///
/// # Examples
///
/// ```
/// use erasure::prelude::*;
///
/// erasure::operations! {
///     /// Renders the value as text.
///     pub Draw(&self) -> String;
/// }
///
/// erasure::interface! {
///     /// Things that can draw themselves.
///     pub Drawable = [Draw];
/// }
///
/// #[derive(Clone)]
/// struct Circle {
///     radius: u32,
/// }
///
/// impl ApplyRef<Draw> for Circle {
///     fn apply(&self, (): ()) -> String {
///         format!("circle({})", self.radius)
///     }
/// }
///
/// let shape: Poly<Drawable> = Poly::new(Circle { radius: 2 });
/// assert_eq!(shape.call(Draw, ()), "circle(2)");
/// ```
///
/// A type that does not provide every operation of the interface cannot
/// be erased behind it:
///
/// ```compile_fail
/// use erasure::prelude::*;
///
/// erasure::operations! {
///     /// Renders the value as text.
///     pub Draw(&self) -> String;
/// }
///
/// erasure::interface! {
///     /// Things that can draw themselves.
///     pub Drawable = [Draw];
/// }
///
/// #[derive(Clone)]
/// struct Silent;
///
/// // `Silent` has no `ApplyRef<Draw>` impl.
/// let shape: Poly<Drawable> = Poly::new(Silent);
/// ```
pub struct Poly<I: Interface, S: Storage = BoxStorage, D: TableStrategy = SharedTables> {
    /// Handle to the dispatch table built for (interface, concrete type).
    table: D::Table,
    /// Owner of the erased value.
    storage: S,
    /// The interface, present only at the type level.
    _interface: PhantomData<fn() -> I>,
}

impl<I: Interface, S: Storage, D: TableStrategy> Poly<I, S, D> {
    /// Erases `value` behind the interface `I`.
    ///
    /// Registers the interface's operation list on first use, obtains the
    /// dispatch table for the (interface, concrete type) pair from the
    /// active table policy — building it if this is the pair's first
    /// handle — and hands the value to the active storage policy.
    ///
    /// The `T: Implements<I>` bound is the whole satisfaction check:
    /// every slot of `I` must be invokable on `T` with the declared
    /// signature, or this call does not compile.
    pub fn new<T: Implements<I>>(value: T) -> Self {
        registry::ensure_registered::<I>();
        let table = D::table::<I, T>(<T as Implements<I>>::dispatch_entries);
        let storage = S::new(value);
        Self {
            table,
            storage,
            _interface: PhantomData,
        }
    }

    /// Returns the number of operations in the interface `I`.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        <I::Operations as OperationList>::LEN
    }

    /// Returns the handle's dispatch table.
    ///
    /// Mostly useful for inspecting table identity: under
    /// [`SharedTables`], two handles over the same concrete type hold
    /// references to the same table.
    #[must_use]
    pub fn table(&self) -> &D::Table {
        &self.table
    }

    /// Returns the storage owning the erased value.
    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the storage owning the erased value, for mutation.
    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Invokes the observing operation `operation` on the erased value.
    ///
    /// Method-call sugar for [`call`](crate::call).
    pub fn call<O, At>(&self, operation: O, arguments: O::Args) -> O::Output
    where
        O: Operation<Receiver = ByRef>,
        I::Operations: Selects<O, At>,
    {
        dispatch::call(operation, self, arguments)
    }

    /// Invokes the mutating operation `operation` on the erased value.
    ///
    /// Method-call sugar for [`call_mut`](crate::call_mut).
    pub fn call_mut<O, At>(&mut self, operation: O, arguments: O::Args) -> O::Output
    where
        O: Operation<Receiver = ByMut>,
        I::Operations: Selects<O, At>,
    {
        dispatch::call_mut(operation, self, arguments)
    }
}

impl<I: Interface, S: Storage, D: TableStrategy> Clone for Poly<I, S, D> {
    /// Copies the handle member-wise: a cheap copy of the table handle
    /// and a deep copy of the stored value.
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            storage: self.storage.clone(),
            _interface: PhantomData,
        }
    }
}

impl<I: Interface, S: Storage, D: TableStrategy> fmt::Debug for Poly<I, S, D> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Poly")
            .field("interface", &type_name::<I>())
            .field("slots", &self.slot_count())
            .finish_non_exhaustive()
    }
}
