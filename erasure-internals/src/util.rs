//! Internal utility types.

/// Marker type standing in for an erased concrete value type.
///
/// This zero-sized type serves as a placeholder in pointer types when the
/// actual concrete type has been erased. For example, `NonNull<Erased>`
/// is a pointer to a value whose concrete type is unknown at the current
/// scope; the [`ValueVtable`] travelling next to such a pointer carries
/// the operations needed to work with it anyway.
///
/// Using a distinct marker type (rather than `()` or `u8`) makes the
/// intent clearer in type signatures and error messages.
///
/// [`ValueVtable`]: crate::storage::vtable::ValueVtable
#[derive(Clone, Copy)]
pub struct Erased;
