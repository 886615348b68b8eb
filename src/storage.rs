//! Storage policies: where an erased value's bytes live.
//!
//! A [`Poly`](crate::Poly) handle owns its value through a [`Storage`]
//! policy. Two are provided:
//!
//! - [`BoxStorage`] (the default): the value lives in its own heap
//!   allocation. Works for any [`Erasable`] type, no capacity planning.
//! - [`InlineStorage<SIZE, A>`]: the value lives in place inside the
//!   handle, in a `SIZE`-byte buffer aligned like `A`. No allocation,
//!   at the price of a compile-time capacity constraint.
//!
//! Swapping policies changes the handle's type but none of its call
//! sites: dispatch only ever asks the storage for the value's address.

use core::{fmt, ptr::NonNull};

use erasure_internals::{Erased, RawBoxed, RawInline};

use crate::interface::Erasable;

/// Policy governing how and where an erased value's bytes are kept alive.
///
/// A storage owns exactly one live value of exactly one concrete type for
/// its lifetime, deep-copies it on [`Clone`] and destroys it on drop,
/// and exposes its address in erased form.
///
/// # Safety
///
/// Implementations must guarantee, for every storage created by
/// [`new`](Storage::new) with a value of type `T`:
///
/// 1. [`as_ptr`](Storage::as_ptr) and [`as_mut_ptr`](Storage::as_mut_ptr)
///    return the address of an initialized `T` for as long as the
///    storage exists.
/// 2. A [`Clone`] of the storage holds its own independent `T`, reachable
///    only through the clone.
/// 3. The pointer returned by [`as_mut_ptr`](Storage::as_mut_ptr) is not
///    aliased for as long as the caller's exclusive borrow of the
///    storage lasts.
///
/// Dispatch trampolines rely on these guarantees when they reinterpret
/// the erased address as a concrete `&T`/`&mut T`.
pub unsafe trait Storage: Clone + 'static {
    /// Creates a storage owning `value`.
    fn new<T: Erasable>(value: T) -> Self;

    /// Returns the address of the held value.
    fn as_ptr(&self) -> NonNull<Erased>;

    /// Returns the address of the held value for mutation.
    fn as_mut_ptr(&mut self) -> NonNull<Erased>;
}

/// Heap-owned storage: the erased value lives in its own allocation.
///
/// Two pointers wide, cheap to move, no capacity constraint. This is the
/// default storage of [`Poly`](crate::Poly).
#[derive(Clone)]
pub struct BoxStorage {
    /// The raw heap-owned value.
    raw: RawBoxed,
}

// SAFETY: `RawBoxed` hands back the address of the boxed value passed to
// `new` for its whole lifetime, and its `Clone` allocates an independent
// deep copy.
unsafe impl Storage for BoxStorage {
    #[inline]
    fn new<T: Erasable>(value: T) -> Self {
        Self {
            raw: RawBoxed::new(value),
        }
    }

    #[inline]
    fn as_ptr(&self) -> NonNull<Erased> {
        self.raw.as_ptr()
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        self.raw.as_mut_ptr()
    }
}

// SAFETY: every value stored in a `BoxStorage` is bounded by `Erasable`,
// which requires `Send + Sync`.
unsafe impl Send for BoxStorage {}

// SAFETY: as above; shared access exposes the value only as `&T` and
// through `T::clone`.
unsafe impl Sync for BoxStorage {}

impl fmt::Debug for BoxStorage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("BoxStorage")
            .field(&self.raw.value_type_name())
            .finish()
    }
}

/// Inline storage: the erased value lives in place inside the handle.
///
/// The buffer holds `SIZE` bytes at the alignment of the donor type `A`
/// (default [`Align16`], matching typical small-buffer layouts). A value
/// that does not fit — too large, or requiring stricter alignment — is
/// rejected when the offending handle construction is compiled:
///
/// ```compile_fail
/// use erasure::{InlineStorage, Storage};
///
/// // 64 bytes do not fit a 16-byte buffer.
/// let storage = InlineStorage::<16>::new([0u64; 8]);
/// ```
///
/// ```compile_fail
/// use erasure::{Align4, InlineStorage, Storage};
///
/// // u64 needs 8-byte alignment, the buffer only guarantees 4.
/// let storage = InlineStorage::<16, Align4>::new(0u64);
/// ```
pub struct InlineStorage<const SIZE: usize, A: 'static = Align16> {
    /// The raw in-place value.
    raw: RawInline<SIZE, A>,
}

impl<const SIZE: usize, A: 'static> Clone for InlineStorage<SIZE, A> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

// SAFETY: `RawInline` hands back the address of the value constructed in
// its buffer by `new` for its whole lifetime (the buffer lives inside the
// storage object, so the address is stable while the storage is not
// moved, and dispatch only ever uses it for the duration of one borrow).
// Its `Clone` constructs an independent deep copy in the clone's own
// buffer.
unsafe impl<const SIZE: usize, A: 'static> Storage for InlineStorage<SIZE, A> {
    #[inline]
    fn new<T: Erasable>(value: T) -> Self {
        Self {
            raw: RawInline::new(value),
        }
    }

    #[inline]
    fn as_ptr(&self) -> NonNull<Erased> {
        self.raw.as_ptr()
    }

    #[inline]
    fn as_mut_ptr(&mut self) -> NonNull<Erased> {
        self.raw.as_mut_ptr()
    }
}

// SAFETY: every value stored in an `InlineStorage` is bounded by
// `Erasable`, which requires `Send + Sync`; the alignment donor `A` is
// never instantiated.
unsafe impl<const SIZE: usize, A: 'static> Send for InlineStorage<SIZE, A> {}

// SAFETY: as above; shared access exposes the value only as `&T` and
// through `T::clone`.
unsafe impl<const SIZE: usize, A: 'static> Sync for InlineStorage<SIZE, A> {}

impl<const SIZE: usize, A: 'static> fmt::Debug for InlineStorage<SIZE, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("InlineStorage")
            .field(&SIZE)
            .field(&self.raw.value_type_name())
            .finish()
    }
}

/// Declares a zero-sized alignment donor type.
macro_rules! align_marker {
    ($(#[$meta:meta])* $name:ident, $align:literal) => {
        $(#[$meta])*
        #[repr(align($align))]
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash)]
        pub struct $name;
    };
}

align_marker! {
    /// Alignment donor for 1-byte-aligned inline buffers.
    Align1, 1
}
align_marker! {
    /// Alignment donor for 2-byte-aligned inline buffers.
    Align2, 2
}
align_marker! {
    /// Alignment donor for 4-byte-aligned inline buffers.
    Align4, 4
}
align_marker! {
    /// Alignment donor for 8-byte-aligned inline buffers.
    Align8, 8
}
align_marker! {
    /// Alignment donor for 16-byte-aligned inline buffers, the default of
    /// [`InlineStorage`].
    Align16, 16
}
align_marker! {
    /// Alignment donor for 32-byte-aligned inline buffers.
    Align32, 32
}
align_marker! {
    /// Alignment donor for 64-byte-aligned inline buffers.
    Align64, 64
}
