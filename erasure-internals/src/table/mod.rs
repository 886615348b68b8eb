//! Type-erased dispatch entries and the tables that hold them.

mod entry;
mod raw;

pub use self::{entry::RawEntry, raw::RawTable};
