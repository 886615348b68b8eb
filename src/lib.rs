#![cfg_attr(not(doc), no_std)]
#![deny(
    missing_docs,
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    clippy::multiple_unsafe_ops_per_block,
    clippy::as_ptr_cast_mut,
    clippy::ptr_as_ptr,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::broken_intra_doc_links,
    missing_copy_implementations,
    unused_doc_comments
)]
// Make docs.rs generate better docs
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Runtime polymorphism for values of unrelated types.
//!
//! ## Overview
//!
//! This crate lets you treat values of completely unrelated concrete
//! types uniformly, through a handle that exposes only a declared set of
//! operations — an *interface*. Unlike `dyn Trait`, the concrete type
//! does not opt into anything shared: it satisfies an interface
//! structurally, by providing each of the interface's operations. The
//! handle's storage policy (heap vs. fixed-capacity inline buffer) and
//! dispatch-table policy (process-wide shared tables vs. per-handle
//! tables) are both swappable without changing a single call site.
//!
//! ## Quick Example
//!
//! ```
//! use erasure::prelude::*;
//!
//! erasure::operations! {
//!     /// Renders the value as text.
//!     pub Draw(&self) -> String;
//! }
//!
//! erasure::interface! {
//!     /// Things that can draw themselves.
//!     pub Drawable = [Draw];
//! }
//!
//! #[derive(Clone)]
//! struct Circle {
//!     radius: u32,
//! }
//!
//! #[derive(Clone)]
//! struct Square {
//!     side: u32,
//! }
//!
//! impl ApplyRef<Draw> for Circle {
//!     fn apply(&self, (): ()) -> String {
//!         format!("circle({})", self.radius)
//!     }
//! }
//!
//! impl ApplyRef<Draw> for Square {
//!     fn apply(&self, (): ()) -> String {
//!         format!("square({})", self.side)
//!     }
//! }
//!
//! // Circle and Square share no trait, but erase to the same handle type.
//! let shapes: Vec<Poly<Drawable>> = vec![
//!     Poly::new(Circle { radius: 2 }),
//!     Poly::new(Square { side: 3 }),
//! ];
//!
//! let drawn: Vec<String> = shapes.iter().map(|s| call(Draw, s, ())).collect();
//! assert_eq!(drawn, ["circle(2)", "square(3)"]);
//! ```
//!
//! ## Core Concepts
//!
//! - An **operation** is a unit type fixing one operation's signature:
//!   argument tuple, output type, and receiver mode (`&self` or
//!   `&mut self`). Declared with [`operations!`].
//! - An **interface** is a marker type naming an ordered list of
//!   operations; the position of an operation in that list is its
//!   **slot**. Declared with [`interface!`]; one interface can extend
//!   another, inheriting its full slot sequence as a prefix.
//! - A concrete type **satisfies** an interface by implementing
//!   [`ApplyRef`]/[`ApplyMut`] for each of its operations. The
//!   satisfaction check is the [`Implements`] bound on
//!   [`Poly::new`] — a missing operation is a compile error, not a
//!   runtime fault.
//! - A **handle** ([`Poly`]) owns one erased value and a reference to a
//!   **dispatch table** holding one entry per slot. [`call`] and
//!   [`call_mut`] resolve an operation to its slot at compile time and
//!   make one indirect call.
//!
//! There is no runtime error path: every misuse — an unsatisfied
//! operation, an operation outside the interface, a value too big for
//! its inline buffer — fails the build instead.
//!
//! ## Storage and Table Policies
//!
//! [`Poly<I, S, D>`] takes the storage policy `S` ([`BoxStorage`] by
//! default, or [`InlineStorage<SIZE, A>`](InlineStorage) to keep the
//! value in place under a compile-time capacity limit) and the table
//! policy `D` ([`SharedTables`] by default: one table per concrete type
//! for the whole process, built lazily exactly once; or [`OwnedTables`]
//! for reference-counted per-handle tables without global state).
//!
//! ## Inspecting Interfaces
//!
//! The [`registry`] records every interface's declared slots, in order,
//! the first time a handle is constructed for it, and can enumerate them
//! afterwards — useful for diagnostics and tooling. Dispatch itself
//! never consults it.
//!
//! For implementation details, see the [`erasure-internals`] crate.
//!
//! [`erasure-internals`]: erasure_internals
//!
//! ## Crate Features
//!
//! - `std`: use the standard library's `RwLock` for the registries
//!   instead of a spin lock. The crate is `no_std` (with `alloc`) by
//!   default.

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod dispatch;
mod interface;
mod lock;
mod macros;
mod poly;
pub mod prelude;
pub mod registry;
pub mod slots;
mod storage;
mod tables;

pub use erasure_internals::{
    ApplyMut, ApplyRef, ByMut, ByRef, Erased, Operation, RawEntry, RawTable, Receiver,
    ReceiverMode,
};

pub use self::{
    dispatch::{call, call_mut},
    interface::{Erasable, Extended, Implements, Interface},
    poly::Poly,
    storage::{
        Align1, Align2, Align4, Align8, Align16, Align32, Align64, BoxStorage, InlineStorage,
        Storage,
    },
    tables::{OwnedTables, SharedTables, TableStrategy},
};
