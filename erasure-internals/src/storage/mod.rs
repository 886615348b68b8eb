//! Type-erased ownership of a single value.
//!
//! Two storage flavors exist, sharing one [`ValueVtable`] per concrete
//! type:
//!
//! - [`RawBoxed`]: the value lives in its own heap allocation; the storage
//!   is two pointers wide and cheap to move.
//! - [`RawInline`]: the value lives in place inside a fixed-capacity,
//!   fixed-alignment buffer owned by the storage object; no allocation is
//!   performed, at the price of a compile-time capacity constraint.
//!
//! Both flavors deep-copy on [`Clone`] and destroy their value on drop,
//! through erased function pointers captured at construction time.
//!
//! [`ValueVtable`]: vtable::ValueVtable

mod boxed;
mod inline;
pub(crate) mod vtable;

pub use self::{boxed::RawBoxed, inline::RawInline};
