//! Commonly used items for convenient importing.
//!
//! The prelude re-exports the types, traits, and macros most code touching
//! erased handles needs, so a single use statement covers the common case.
//!
//! # Usage
//!
//! ```rust
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
//! struct Square {
//!     side: u32,
//! }
//!
//! impl ApplyRef<Draw> for Square {
//!     fn apply(&self, (): ()) -> String {
//!         format!("square({})", self.side)
//!     }
//! }
//!
//! let handle: Poly<Drawable> = Poly::new(Square { side: 3 });
//! assert_eq!(call(Draw, &handle, ()), "square(3)");
//! ```
//!
//! # What's Included
//!
//! - **[`Poly`]**: the polymorphic handle
//! - **[`call`]** and **[`call_mut`]**: the free dispatch entry points
//! - **[`ApplyRef`]** and **[`ApplyMut`]**: the traits concrete types
//!   implement to provide operations
//! - **[`Interface`]**, **[`Operation`]**, **[`Erasable`]**,
//!   **[`Implements`]**: the declaration-side traits
//! - **[`operations!`], [`interface!`], [`slots!`]**: the declaration
//!   macros
//! - The policy types: [`BoxStorage`], [`InlineStorage`],
//!   [`SharedTables`], [`OwnedTables`]
//!
//! [`operations!`]: crate::operations!
//! [`interface!`]: crate::interface!
//! [`slots!`]: crate::slots!

pub use crate::{
    ApplyMut, ApplyRef, BoxStorage, Erasable, Implements, InlineStorage, Interface, Operation,
    OwnedTables, Poly, SharedTables, call, call_mut, interface, operations, slots,
};
