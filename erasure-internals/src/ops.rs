//! Operation signatures and the traits a concrete type implements to
//! provide them.
//!
//! This module defines the vocabulary shared by the dispatch machinery:
//! an [`Operation`] is a stateless tag type that fixes one operation's
//! signature (argument tuple, output type, and receiver mode), and
//! [`ApplyRef`]/[`ApplyMut`] are the traits a concrete type implements,
//! once per operation, to make itself usable through an erased handle.
//!
//! No registration list appears anywhere in these traits: a concrete type
//! satisfies an interface *structurally*, by having an `ApplyRef` or
//! `ApplyMut` impl for every operation the interface names.

use core::fmt;

/// A stateless tag naming one operation, together with its signature.
///
/// Operation tags are unit types: they carry no data and exist purely so
/// the type system can talk about "which operation" at compile time. The
/// same tag type is used both when declaring an interface slot and when
/// requesting dispatch to it, which is what lets the dispatch entry point
/// fix the argument and output types without any runtime checking.
///
/// The receiver mode ([`ByRef`] or [`ByMut`]) is part of the signature:
/// an operation either observes the erased value or mutates it, and the
/// dispatch entry points require the matching level of access to the
/// handle.
///
/// # Examples
///
/// ```
/// use erasure_internals::{ByRef, Operation};
///
/// /// Renders a value as text.
/// struct Draw;
///
/// impl Operation for Draw {
///     type Args = ();
///     type Output = String;
///     type Receiver = ByRef;
/// }
/// ```
pub trait Operation: 'static {
    /// The operation's argument types, as a tuple.
    ///
    /// An operation taking no arguments beyond the receiver uses `()`;
    /// one taking a single `f64` uses `(f64,)`.
    type Args: 'static;

    /// The operation's output type.
    type Output: 'static;

    /// Whether the operation observes ([`ByRef`]) or mutates ([`ByMut`])
    /// the value it is invoked on.
    type Receiver: Receiver;
}

mod sealed {
    /// Seals [`Receiver`](super::Receiver) so that [`ByRef`](super::ByRef)
    /// and [`ByMut`](super::ByMut) are the only receiver modes.
    pub trait Sealed {}

    impl Sealed for super::ByRef {}
    impl Sealed for super::ByMut {}
}

/// Marker trait for the two receiver modes, [`ByRef`] and [`ByMut`].
///
/// This trait is sealed: the dispatch machinery relies on every operation
/// being exactly one of the two modes, so no other implementations can
/// exist.
pub trait Receiver: sealed::Sealed + 'static {
    /// The runtime rendering of this receiver mode.
    const MODE: ReceiverMode;
}

/// Receiver mode of operations that observe the value through a shared
/// reference.
///
/// Dispatching a `ByRef` operation requires only shared access to the
/// handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ByRef;

/// Receiver mode of operations that mutate the value through an exclusive
/// reference.
///
/// Dispatching a `ByMut` operation requires exclusive access to the
/// handle, which is what makes handing the erased value out as `&mut`
/// sound.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ByMut;

impl Receiver for ByRef {
    const MODE: ReceiverMode = ReceiverMode::Ref;
}

impl Receiver for ByMut {
    const MODE: ReceiverMode = ReceiverMode::Mut;
}

/// Runtime value describing an operation's receiver mode.
///
/// This is the value-level mirror of the [`ByRef`]/[`ByMut`] marker types,
/// used where signatures are inspected at runtime (for example when
/// enumerating an interface's registered slots).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReceiverMode {
    /// The operation observes the value through `&self`.
    Ref,
    /// The operation mutates the value through `&mut self`.
    Mut,
}

impl fmt::Display for ReceiverMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceiverMode::Ref => formatter.write_str("&self"),
            ReceiverMode::Mut => formatter.write_str("&mut self"),
        }
    }
}

/// Provides the observing operation `O` for the implementing type.
///
/// Implementing `ApplyRef<O>` is how a concrete type declares "I support
/// `O`": there is no base type to derive from and no registration step.
/// A type is usable through a handle for some interface exactly when it
/// has an `ApplyRef`/[`ApplyMut`] impl for every operation the interface
/// lists.
///
/// # Examples
///
/// ```
/// use erasure_internals::{ApplyRef, ByRef, Operation};
///
/// /// Renders a value as text.
/// struct Draw;
///
/// impl Operation for Draw {
///     type Args = ();
///     type Output = String;
///     type Receiver = ByRef;
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
/// ```
pub trait ApplyRef<O: Operation<Receiver = ByRef>> {
    /// Invokes the operation on `self` with the given argument tuple.
    fn apply(&self, arguments: O::Args) -> O::Output;
}

/// Provides the mutating operation `O` for the implementing type.
///
/// The mutating counterpart of [`ApplyRef`], for operations whose
/// signature declares [`ByMut`] as the receiver mode.
///
/// # Examples
///
/// ```
/// use erasure_internals::{ApplyMut, ByMut, Operation};
///
/// /// Scales a value by a factor.
/// struct Scale;
///
/// impl Operation for Scale {
///     type Args = (f64,);
///     type Output = ();
///     type Receiver = ByMut;
/// }
///
/// #[derive(Clone)]
/// struct Circle {
///     radius: f64,
/// }
///
/// impl ApplyMut<Scale> for Circle {
///     fn apply_mut(&mut self, (factor,): (f64,)) {
///         self.radius *= factor;
///     }
/// }
/// ```
pub trait ApplyMut<O: Operation<Receiver = ByMut>> {
    /// Invokes the operation on `self` with the given argument tuple.
    fn apply_mut(&mut self, arguments: O::Args) -> O::Output;
}
