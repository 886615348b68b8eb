//! Integration tests for the erasure surface crate.
//!
//! Exercises the full declared-interface path: operation and interface
//! declaration through the macros, structural satisfaction, handle
//! construction over both storage policies and both table policies,
//! dispatch through the free functions and the method sugar, interface
//! extension, and registry enumeration.

use std::any::TypeId;

use erasure::{
    Align8, BoxStorage, InlineStorage, OwnedTables, Poly, ReceiverMode, Storage, call, call_mut,
    prelude::*, registry,
};

erasure::operations! {
    /// Renders the value as text.
    pub Draw(&self) -> String;
    /// Scales the value by a factor.
    pub Scale(&mut self, f64);
    /// Computes the covered area.
    pub Area(&self) -> f64;
    /// Renders the value with a prefix.
    pub Tag(&self, &'static str) -> String;
}

erasure::interface! {
    /// Things that can draw and rescale themselves.
    pub Drawable = [Draw, Scale];
    /// Drawable things with a measurable area.
    pub Shape: Drawable = [Area];
}

#[derive(Clone, PartialEq, Debug)]
struct Circle {
    radius: f64,
}

impl ApplyRef<Draw> for Circle {
    fn apply(&self, (): ()) -> String {
        format!("circle({})", self.radius)
    }
}

impl ApplyMut<Scale> for Circle {
    fn apply_mut(&mut self, (factor,): (f64,)) {
        self.radius *= factor;
    }
}

impl ApplyRef<Area> for Circle {
    fn apply(&self, (): ()) -> f64 {
        core::f64::consts::PI * self.radius * self.radius
    }
}

#[derive(Clone, PartialEq, Debug)]
struct Square {
    side: f64,
}

impl ApplyRef<Draw> for Square {
    fn apply(&self, (): ()) -> String {
        format!("square({})", self.side)
    }
}

impl ApplyMut<Scale> for Square {
    fn apply_mut(&mut self, (factor,): (f64,)) {
        self.side *= factor;
    }
}

impl ApplyRef<Area> for Square {
    fn apply(&self, (): ()) -> f64 {
        self.side * self.side
    }
}

#[test]
fn test_dispatch_matches_direct_invocation() {
    let circle = Circle { radius: 1.5 };
    let handle: Poly<Drawable> = Poly::new(circle.clone());

    assert_eq!(
        call(Draw, &handle, ()),
        ApplyRef::<Draw>::apply(&circle, ())
    );
}

#[test]
fn test_end_to_end_drawable() {
    let mut circle = Circle { radius: 2.0 };
    let h1: Poly<Drawable> = Poly::new(circle.clone());
    let h2: Poly<Drawable> = Poly::new(Square { side: 3.0 });

    assert_eq!(call(Draw, &h1, ()), "circle(2)");
    assert_eq!(call(Draw, &h2, ()), "square(3)");

    // Method sugar dispatches identically to the free function
    assert_eq!(h1.call(Draw, ()), "circle(2)");

    // Copying the handle, then mutating the original value the handle
    // was built from: no effect, the value was copied at construction.
    let h3 = h1.clone();
    circle.radius = 99.0;
    assert_eq!(call(Draw, &h3, ()), "circle(2)");
}

#[test]
fn test_clone_independence_heap() {
    let original: Poly<Drawable> = Poly::new(Circle { radius: 10.0 });
    let mut clone = original.clone();

    call_mut(Scale, &mut clone, (3.0,));

    assert_eq!(call(Draw, &original, ()), "circle(10)");
    assert_eq!(call(Draw, &clone, ()), "circle(30)");
}

#[test]
fn test_clone_independence_inline() {
    let original: Poly<Drawable, InlineStorage<16, Align8>> =
        Poly::new(Circle { radius: 10.0 });
    let mut clone = original.clone();

    call_mut(Scale, &mut clone, (3.0,));

    assert_eq!(call(Draw, &original, ()), "circle(10)");
    assert_eq!(call(Draw, &clone, ()), "circle(30)");
}

#[test]
fn test_inline_copies_use_distinct_buffers() {
    let original = InlineStorage::<16, Align8>::new(Circle { radius: 1.0 });
    let clone = original.clone();
    assert_ne!(original.as_ptr(), clone.as_ptr());
}

#[test]
fn test_move_preserves_dispatch() {
    let handle: Poly<Drawable> = Poly::new(Square { side: 4.0 });
    let before = call(Draw, &handle, ());

    let moved = handle;
    assert_eq!(call(Draw, &moved, ()), before);
}

#[test]
fn test_shared_table_reuse() {
    let a: Poly<Drawable> = Poly::new(Circle { radius: 1.0 });
    let b: Poly<Drawable> = Poly::new(Circle { radius: 2.0 });
    let c: Poly<Drawable> = Poly::new(Square { side: 1.0 });

    // Same concrete type: both handles reference the one shared table
    assert!(std::ptr::eq(*a.table(), *b.table()));
    // Different concrete types: independently built tables
    assert!(!std::ptr::eq(*a.table(), *c.table()));

    // A clone references the same table as its source
    let a2 = a.clone();
    assert!(std::ptr::eq(*a.table(), *a2.table()));
}

#[test]
fn test_owned_tables() {
    let a: Poly<Drawable, BoxStorage, OwnedTables> = Poly::new(Circle { radius: 5.0 });
    let b = a.clone();

    // Clones share the reference-counted table...
    assert!(std::ptr::eq(&**a.table(), &**b.table()));

    // ...while independent constructions build their own
    let c: Poly<Drawable, BoxStorage, OwnedTables> = Poly::new(Circle { radius: 5.0 });
    assert!(!std::ptr::eq(&**a.table(), &**c.table()));

    // Dispatch is unaffected by the table policy
    assert_eq!(call(Draw, &a, ()), "circle(5)");
    assert_eq!(call(Draw, &c, ()), "circle(5)");
}

#[test]
fn test_interface_extension() {
    let circle: Poly<Shape> = Poly::new(Circle { radius: 2.0 });
    let square: Poly<Shape> = Poly::new(Square { side: 3.0 });

    // Base operations dispatch through the extended interface
    assert_eq!(call(Draw, &circle, ()), "circle(2)");
    // Extension operations follow the base slots
    assert_eq!(call(Area, &square, ()), 9.0);

    // Ensure both interfaces are registered, then compare slot layouts
    let _base: Poly<Drawable> = Poly::new(Circle { radius: 1.0 });
    let base = registry::signatures::<Drawable>();
    let extended = registry::signatures::<Shape>();

    assert_eq!(base.len(), 2);
    assert_eq!(extended.len(), 3);
    // The base interface's full slot sequence is the extension's prefix
    assert_eq!(&extended[..base.len()], &base[..]);
    // The extension's own operations occupy the slots that follow
    assert_eq!(extended[2].operation(), TypeId::of::<Area>());
}

/// Interface used only by the registry tests, so its registration time
/// is under this test's control.
mod labelled {
    erasure::interface! {
        /// Things that render with a prefix.
        pub Labelled = [super::Tag];
    }
}

use labelled::Labelled;

impl ApplyRef<Tag> for Circle {
    fn apply(&self, (prefix,): (&'static str,)) -> String {
        format!("{prefix}: circle({})", self.radius)
    }
}

#[test]
fn test_registry_enumeration() {
    // Nothing is registered before the first handle is constructed
    assert_eq!(registry::slot_count::<Labelled>(), 0);
    assert!(registry::signature::<Labelled>(0).is_none());

    let handle: Poly<Labelled> = Poly::new(Circle { radius: 1.0 });
    assert_eq!(handle.slot_count(), 1);
    assert_eq!(registry::slot_count::<Labelled>(), 1);

    let signature = registry::signature::<Labelled>(0).unwrap();
    assert_eq!(signature.operation(), TypeId::of::<Tag>());
    assert!(signature.operation_name().contains("Tag"));
    assert_eq!(signature.arguments(), TypeId::of::<(&'static str,)>());
    assert_eq!(signature.output(), TypeId::of::<String>());
    assert_eq!(signature.receiver(), ReceiverMode::Ref);

    // The count is the first absent probe
    assert!(registry::signature::<Labelled>(1).is_none());
    assert!(registry::lookup(TypeId::of::<Labelled>(), 1).is_none());

    // Constructing more handles does not re-register or grow the list
    let _more: Poly<Labelled> = Poly::new(Circle { radius: 2.0 });
    assert_eq!(registry::slot_count::<Labelled>(), 1);

    assert_eq!(call(Tag, &handle, ("shape",)), "shape: circle(1)");
}

#[test]
fn test_receiver_modes_registered() {
    let _handle: Poly<Drawable> = Poly::new(Circle { radius: 1.0 });
    let signatures = registry::signatures::<Drawable>();
    assert_eq!(signatures[0].receiver(), ReceiverMode::Ref);
    assert_eq!(signatures[1].receiver(), ReceiverMode::Mut);
}

#[test]
fn test_mixed_concrete_types_in_one_collection() {
    let shapes: Vec<Poly<Drawable>> = vec![
        Poly::new(Circle { radius: 2.0 }),
        Poly::new(Square { side: 3.0 }),
    ];

    let drawn: Vec<String> = shapes.iter().map(|shape| call(Draw, shape, ())).collect();
    assert_eq!(drawn, ["circle(2)", "square(3)"]);
}

#[test]
fn test_mutation_through_method_sugar() {
    let mut handle: Poly<Drawable> = Poly::new(Square { side: 2.0 });
    handle.call_mut(Scale, (4.0,));
    assert_eq!(handle.call(Draw, ()), "square(8)");
}

#[test]
fn test_handle_debug_names_interface() {
    let handle: Poly<Drawable> = Poly::new(Circle { radius: 1.0 });
    let rendered = format!("{handle:?}");
    assert!(rendered.contains("Poly"));
    assert!(rendered.contains("Drawable"));
}

#[test]
fn test_send_sync() {
    static_assertions::assert_impl_all!(Poly<Drawable>: Send, Sync);
    static_assertions::assert_impl_all!(
        Poly<Drawable, InlineStorage<16, Align8>>: Send, Sync
    );
    static_assertions::assert_impl_all!(Poly<Drawable, BoxStorage, OwnedTables>: Send, Sync);
}
