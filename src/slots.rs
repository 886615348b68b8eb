//! Type-level operation lists and compile-time slot resolution.
//!
//! An interface's operations form an ordered, author-declared list. That
//! list is a *type*: [`Nil`] is the empty list and [`Cons<O, Rest>`]
//! prepends the operation `O`. An operation's **slot** is its position in
//! the list, and everything that depends on slots — the slot count, the
//! index an operation dispatches through, the entries a dispatch table is
//! built from — is derived from the list at compile time:
//!
//! - [`OperationList`] gives the slot count ([`OperationList::LEN`]),
//!   type-level concatenation for interface extension
//!   ([`OperationList::Concat`]), and the runtime enumeration of slot
//!   signatures used to populate the [registry](crate::registry).
//! - [`Selects<O, At>`] resolves an operation to its slot index as a
//!   `const`. The `At` parameter is a type-level index found by
//!   inference; callers never name it.
//! - [`TableSpec<T>`] is satisfied exactly when the concrete type `T`
//!   provides every operation in the list, and synthesizes the dispatch
//!   entry for each slot.
//!
//! Because the list is declared once per interface and every consumer
//! reads the same list, a slot's signature cannot differ between the
//! table-building side and the dispatching side; there is no registration
//! order to get wrong.

use alloc::vec::Vec;
use core::marker::PhantomData;

use erasure_internals::{ApplyMut, ApplyRef, ByMut, ByRef, Operation, RawEntry, Receiver};

use crate::registry::SlotSignature;

/// The empty operation list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Nil;

/// The operation list with `O` at its head, followed by `Rest`.
///
/// Lists are usually written with the [`slots!`](crate::slots!) macro:
/// `slots![Draw, Scale]` is `Cons<Draw, Cons<Scale, Nil>>`.
pub struct Cons<O, Rest>(PhantomData<(O, Rest)>);

impl<O, Rest> Clone for Cons<O, Rest> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, Rest> Copy for Cons<O, Rest> {}

/// An ordered, build-time-visible list of operations.
///
/// Implemented by [`Nil`] and [`Cons`]; interfaces name one of these
/// lists as their [`Operations`](crate::Interface::Operations).
pub trait OperationList: 'static {
    /// The number of slots in the list.
    const LEN: usize;

    /// The list obtained by appending every slot of `Tail` after every
    /// slot of this list.
    ///
    /// This is the extension primitive: the base interface's slots keep
    /// their positions as a prefix, and the appended slots follow.
    type Concat<Tail: OperationList>: OperationList;

    /// Appends the signature of every slot, in slot order, to `out`.
    fn signatures(out: &mut Vec<SlotSignature>);
}

impl OperationList for Nil {
    const LEN: usize = 0;

    type Concat<Tail: OperationList> = Tail;

    fn signatures(_out: &mut Vec<SlotSignature>) {}
}

impl<O: Operation, Rest: OperationList> OperationList for Cons<O, Rest> {
    const LEN: usize = 1 + Rest::LEN;

    type Concat<Tail: OperationList> = Cons<O, Rest::Concat<Tail>>;

    fn signatures(out: &mut Vec<SlotSignature>) {
        out.push(SlotSignature::of::<O>());
        Rest::signatures(out);
    }
}

/// Type-level index naming the head of a list.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
pub struct Here;

/// Type-level index naming a position inside the tail of a list.
pub struct There<At>(PhantomData<At>);

impl<At> Clone for There<At> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<At> Copy for There<At> {}

/// Resolves the operation `O` to its slot index in the list.
///
/// `At` is the type-level path to the operation's position ([`Here`] or
/// nested [`There`]s); the compiler finds it by inference, so bounds are
/// written `I::Operations: Selects<O, At>` with a free `At` parameter.
/// An interface that does not contain `O` has no `At` satisfying the
/// bound, which is what turns "called an operation the interface does
/// not declare" into a build failure.
pub trait Selects<O: Operation, At>: OperationList {
    /// The operation's slot index.
    const SLOT: usize;
}

impl<O: Operation, Rest: OperationList> Selects<O, Here> for Cons<O, Rest> {
    const SLOT: usize = 0;
}

impl<O: Operation, P: Operation, Rest, At> Selects<O, There<At>> for Cons<P, Rest>
where
    Rest: Selects<O, At>,
{
    const SLOT: usize = 1 + <Rest as Selects<O, At>>::SLOT;
}

/// Builds the dispatch entry for one slot operation over the concrete
/// type `T`.
///
/// Implemented by the two receiver modes: [`ByRef`] requires
/// `T: ApplyRef<O>` and [`ByMut`] requires `T: ApplyMut<O>`. This is the
/// seam where an operation's declared receiver mode picks which
/// application trait the concrete type must provide.
pub trait EntryFor<T, O: Operation>: Receiver {
    /// Synthesizes the erased dispatch entry for `(T, O)`.
    fn entry() -> RawEntry;
}

impl<T, O> EntryFor<T, O> for ByRef
where
    T: ApplyRef<O> + 'static,
    O: Operation<Receiver = ByRef>,
{
    fn entry() -> RawEntry {
        RawEntry::new_ref::<T, O>()
    }
}

impl<T, O> EntryFor<T, O> for ByMut
where
    T: ApplyMut<O> + 'static,
    O: Operation<Receiver = ByMut>,
{
    fn entry() -> RawEntry {
        RawEntry::new_mut::<T, O>()
    }
}

/// The obligation a concrete type `T` must meet to be erased behind an
/// interface whose operation list is `Self`.
///
/// Satisfied exactly when `T` provides every operation in the list with
/// the declared receiver mode. The impl doubles as the table builder:
/// [`collect`](TableSpec::collect) synthesizes one entry per slot, in
/// slot order.
pub trait TableSpec<T>: OperationList {
    /// Appends the dispatch entry of every slot, in slot order, to `out`.
    fn collect(out: &mut Vec<RawEntry>);
}

impl<T> TableSpec<T> for Nil {
    fn collect(_out: &mut Vec<RawEntry>) {}
}

impl<T, O, Rest> TableSpec<T> for Cons<O, Rest>
where
    O: Operation,
    O::Receiver: EntryFor<T, O>,
    Rest: TableSpec<T>,
{
    fn collect(out: &mut Vec<RawEntry>) {
        out.push(<O::Receiver as EntryFor<T, O>>::entry());
        Rest::collect(out);
    }
}
