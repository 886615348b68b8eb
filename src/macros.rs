/// Declares operation tags.
///
/// Each item declares one operation: a unit struct implementing
/// [`Operation`], with the written signature. The receiver decides the
/// mode: `&self` declares an observing operation (provided through
/// [`ApplyRef`]), `&mut self` a mutating one (provided through
/// [`ApplyMut`]). Arguments are written as bare types after the
/// receiver; a missing return type means `()`.
///
/// Doc comments and other attributes attach to the generated struct.
///
/// [`Operation`]: crate::Operation
/// [`ApplyRef`]: crate::ApplyRef
/// [`ApplyMut`]: crate::ApplyMut
///
/// # Examples
///
/// ```
/// erasure::operations! {
///     /// Renders the value as text.
///     pub Draw(&self) -> String;
///     /// Scales the value by a factor.
///     pub Scale(&mut self, f64);
/// }
///
/// use erasure::{ByMut, ByRef, Operation};
///
/// fn receiver_of<O: Operation>() -> &'static str {
///     std::any::type_name::<O::Receiver>()
/// }
///
/// assert_eq!(receiver_of::<Draw>(), std::any::type_name::<ByRef>());
/// assert_eq!(receiver_of::<Scale>(), std::any::type_name::<ByMut>());
/// ```
#[macro_export]
macro_rules! operations {
    () => {};
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident(&self $(, $arg:ty)*) $(-> $output:ty)?;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        $vis struct $name;

        impl $crate::Operation for $name {
            type Args = ($($arg,)*);
            type Output = $crate::__operation_output!($($output)?);
            type Receiver = $crate::ByRef;
        }

        $crate::operations! { $($rest)* }
    };
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident(&mut self $(, $arg:ty)*) $(-> $output:ty)?;
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        $vis struct $name;

        impl $crate::Operation for $name {
            type Args = ($($arg,)*);
            type Output = $crate::__operation_output!($($output)?);
            type Receiver = $crate::ByMut;
        }

        $crate::operations! { $($rest)* }
    };
}

/// Expands to the declared output type of an operation, or `()` when the
/// declaration has none.
#[doc(hidden)]
#[macro_export]
macro_rules! __operation_output {
    () => { () };
    ($output:ty) => { $output };
}

/// Declares interfaces.
///
/// Each item declares one interface: a unit struct implementing
/// [`Interface`] with the bracketed operations as its ordered slot list.
/// The extension form `Sub: Base = [..]` prepends `Base`'s full slot
/// sequence, so `Base`'s operations keep their slots and the new ones
/// follow.
///
/// [`Interface`]: crate::Interface
///
/// # Examples
///
/// ```
/// erasure::operations! {
///     /// Renders the value as text.
///     pub Draw(&self) -> String;
///     /// Computes the covered area.
///     pub Area(&self) -> f64;
/// }
///
/// erasure::interface! {
///     /// Things that can draw themselves.
///     pub Drawable = [Draw];
///     /// Drawable things with a measurable area.
///     pub Shape: Drawable = [Area];
/// }
/// ```
#[macro_export]
macro_rules! interface {
    () => {};
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident = [$($op:ty),* $(,)?];
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        $vis struct $name;

        impl $crate::Interface for $name {
            type Operations = $crate::slots![$($op),*];
        }

        $crate::interface! { $($rest)* }
    };
    (
        $(#[$meta:meta])*
        $vis:vis $name:ident: $base:ty = [$($op:ty),* $(,)?];
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        $vis struct $name;

        impl $crate::Interface for $name {
            type Operations = $crate::Extended<$base, $crate::slots![$($op),*]>;
        }

        $crate::interface! { $($rest)* }
    };
}

/// Writes an operation list type: `slots![Draw, Scale]` is
/// `Cons<Draw, Cons<Scale, Nil>>`.
///
/// Usable anywhere a type is expected; [`interface!`](crate::interface!)
/// uses it internally.
///
/// # Examples
///
/// ```
/// use erasure::slots::OperationList;
///
/// erasure::operations! {
///     /// Renders the value as text.
///     pub Draw(&self) -> String;
///     /// Scales the value by a factor.
///     pub Scale(&mut self, f64);
/// }
///
/// type Ops = erasure::slots![Draw, Scale];
/// assert_eq!(<Ops as OperationList>::LEN, 2);
/// ```
#[macro_export]
macro_rules! slots {
    [] => { $crate::slots::Nil };
    [$head:ty $(,)?] => { $crate::slots::Cons<$head, $crate::slots::Nil> };
    [$head:ty, $($rest:ty),+ $(,)?] => {
        $crate::slots::Cons<$head, $crate::slots![$($rest),+]>
    };
}
