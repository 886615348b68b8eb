#![no_std]
#![forbid(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::missing_docs_in_private_items,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
#![allow(rustdoc::private_intra_doc_links)]
//! Internal implementation crate for [`erasure`].
//!
//! # Overview
//!
//! This crate contains the low-level, type-erased data structures and
//! unsafe operations that power the [`erasure`] runtime-polymorphism
//! library. It provides the foundation for zero-cost type erasure through
//! vtable-based dispatch over values that share no common trait object.
//!
//! **This crate is an implementation detail.** No semantic versioning
//! guarantees are provided. Users should depend on the [`erasure`] crate,
//! not this one.
//!
//! # Architecture
//!
//! The crate is organized around two concerns:
//!
//! - **[`storage`]**: Type-erased ownership of a single value
//!   - [`RawBoxed`]: Heap-owned value with [`Box`]-based allocation
//!   - [`RawInline`]: Value embedded in a fixed-capacity, fixed-alignment
//!     buffer, with compile-time capacity rejection
//!   - [`ValueVtable`]: Per-concrete-type function pointers for erased
//!     drop and deep-copy
//!
//! - **[`table`]**: Type-erased dispatch
//!   - [`RawEntry`]: One erased trampoline, created only from a typed
//!     monomorphized function
//!   - [`RawTable`]: An ordered, immutable sequence of entries, one per
//!     interface slot
//!
//! - **[`ops`]**: The shared dispatch vocabulary
//!   - [`Operation`]: A stateless tag fixing one operation's signature
//!   - [`ApplyRef`]/[`ApplyMut`]: The traits a concrete type implements
//!     to provide an operation
//!
//! # Safety Strategy
//!
//! Type erasure requires careful handling to maintain Rust's type safety
//! guarantees. When a value of type `T` is erased behind a
//! `NonNull<Erased>`, every function pointer that will ever touch that
//! pointer must have been monomorphized for the same `T` — and every
//! dispatch entry must be re-typed with exactly the operation signature
//! it was created for.
//!
//! This crate maintains safety through:
//!
//! - **Module-based encapsulation**: Safety-critical fields are
//!   module-private, making invariants locally verifiable within a single
//!   file
//! - **Paired construction**: Pointers and vtables (and trampolines and
//!   operation ids) are only ever created together, from the same type
//!   parameters, in a single constructor
//! - **Documented contracts**: Each unsafe method specifies exactly when
//!   it can be safely called
//!
//! See the individual module documentation ([`storage`], [`table`]) for
//! detailed explanations of how these patterns are applied.
//!
//! [`erasure`]: https://docs.rs/erasure/latest/erasure/
//! [`ValueVtable`]: storage::vtable::ValueVtable
//! [`Box`]: alloc::boxed::Box

extern crate alloc;

pub mod ops;
mod storage;
mod table;
mod util;

pub use ops::{ApplyMut, ApplyRef, ByMut, ByRef, Operation, Receiver, ReceiverMode};
pub use storage::{RawBoxed, RawInline};
pub use table::{RawEntry, RawTable};
pub use util::Erased;
