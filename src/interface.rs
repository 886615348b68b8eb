//! Interfaces, extension, and the bounds on types that satisfy them.

use alloc::vec::Vec;

use erasure_internals::RawEntry;

use crate::slots::{OperationList, TableSpec};

/// A named set of operations a concrete type must support to be usable
/// through a [`Poly`](crate::Poly) handle.
///
/// An interface is a marker type; its substance is the ordered
/// [`Operations`](Interface::Operations) list. Declaring one by hand is a
/// one-liner, though most code uses the [`interface!`](crate::interface!)
/// macro:
///
/// ```
/// use erasure::{Interface, slots};
/// # erasure::operations! {
/// #     /// Renders the value as text.
/// #     pub Draw(&self) -> String;
/// # }
///
/// /// Things that can draw themselves.
/// pub struct Drawable;
///
/// impl Interface for Drawable {
///     type Operations = slots![Draw];
/// }
/// ```
pub trait Interface: 'static {
    /// The interface's operations, in slot order.
    type Operations: OperationList;
}

/// The operation list of an interface that extends `Base` with the
/// additional operations `Tail`.
///
/// `Base`'s full slot sequence becomes the prefix of the extending
/// interface's list, so every slot of `Base` keeps its index and
/// signature, and the new operations occupy the slots that follow. The
/// prefix property holds at the type level: there is no runtime copy
/// step, and no way to query the extended interface before the extension
/// has "happened".
///
/// ```
/// use erasure::{Extended, Interface, slots};
/// # erasure::operations! {
/// #     /// Renders the value as text.
/// #     pub Draw(&self) -> String;
/// #     /// Computes the covered area.
/// #     pub Area(&self) -> f64;
/// # }
/// # pub struct Drawable;
/// # impl Interface for Drawable {
/// #     type Operations = slots![Draw];
/// # }
///
/// /// Drawable things with a measurable area.
/// pub struct Shape;
///
/// impl Interface for Shape {
///     type Operations = Extended<Drawable, slots![Area]>;
/// }
/// ```
pub type Extended<Base, Tail> =
    <<Base as Interface>::Operations as OperationList>::Concat<Tail>;

/// The bounds every erased value must meet.
///
/// - `Clone` is what lets a handle deep-copy its value without knowing
///   the concrete type (the erased clone is captured at construction).
/// - `Send + Sync` is what lets the handle itself be sent and shared
///   between threads; without it, one non-thread-safe value would poison
///   every handle type.
/// - `'static` rules out borrowed data outliving its source.
///
/// Blanket-implemented; never implemented by hand.
pub trait Erasable: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Erasable for T {}

/// Satisfaction of an interface by a concrete type.
///
/// `T: Implements<I>` holds exactly when `T` is [`Erasable`] and provides
/// every operation `I` declares, with the declared receiver mode. There
/// is nothing to opt into: satisfaction is structural, derived from the
/// [`ApplyRef`](crate::ApplyRef)/[`ApplyMut`](crate::ApplyMut) impls that
/// exist for `T`.
///
/// The trait also carries the dispatch-entry builder the handle
/// constructor hands to the active table policy; user code never calls
/// it.
pub trait Implements<I: Interface>: Erasable {
    /// Builds the dispatch entries for every slot of `I` over `Self`, in
    /// slot order.
    fn dispatch_entries() -> Vec<RawEntry>;
}

impl<I, T> Implements<I> for T
where
    I: Interface,
    T: Erasable,
    I::Operations: TableSpec<T>,
{
    fn dispatch_entries() -> Vec<RawEntry> {
        let mut entries = Vec::with_capacity(<I::Operations as OperationList>::LEN);
        <I::Operations as TableSpec<T>>::collect(&mut entries);
        entries
    }
}
