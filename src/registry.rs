//! The operation registry: process-wide, queryable slot signatures.
//!
//! Slot resolution and signature checking happen at compile time, so
//! dispatch never consults this registry. It exists for the things only a
//! runtime structure can provide:
//!
//! - **Enumeration**: [`signatures`] and [`signature`] expose an
//!   interface's declared operations, in slot order, to code that only
//!   has the interface's [`TypeId`] at hand (diagnostics, logging,
//!   tooling).
//! - **Verification**: the shared-table policy checks its freshly built
//!   tables against [`slot_count`], and registration rejects a
//!   conflicting signature at an occupied slot — unreachable when going
//!   through the declared lists, kept as a loud defense.
//!
//! An interface is registered lazily, exactly once, the first time a
//! handle is constructed for it. Registration walks the interface's
//! declared operation list, so the registered order is the declared
//! order; no call-site ordering can influence it.

use alloc::vec::Vec;
use core::any::{TypeId, type_name};

use erasure_internals::{Operation, Receiver, ReceiverMode};
use hashbrown::HashMap;
use rustc_hash::FxBuildHasher;

use crate::{interface::Interface, lock::RegistryLock, slots::OperationList};

/// The signature registered for one interface slot.
///
/// Identifies the operation tag and records the [`TypeId`]s of its
/// argument tuple and output type, plus the receiver mode. Signatures are
/// compared as whole values: two slots agree only if all components
/// agree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SlotSignature {
    /// The operation tag's [`TypeId`].
    operation: TypeId,
    /// The operation tag's type name, for diagnostics.
    operation_name: &'static str,
    /// The [`TypeId`] of the operation's argument tuple.
    arguments: TypeId,
    /// The [`TypeId`] of the operation's output type.
    output: TypeId,
    /// The operation's receiver mode.
    receiver: ReceiverMode,
}

impl SlotSignature {
    /// Captures the signature of the operation `O`.
    #[must_use]
    pub fn of<O: Operation>() -> Self {
        Self {
            operation: TypeId::of::<O>(),
            operation_name: type_name::<O>(),
            arguments: TypeId::of::<O::Args>(),
            output: TypeId::of::<O::Output>(),
            receiver: <O::Receiver as Receiver>::MODE,
        }
    }

    /// Returns the operation tag's [`TypeId`].
    #[inline]
    pub fn operation(&self) -> TypeId {
        self.operation
    }

    /// Returns the operation tag's type name.
    #[inline]
    pub fn operation_name(&self) -> &'static str {
        self.operation_name
    }

    /// Returns the [`TypeId`] of the operation's argument tuple.
    #[inline]
    pub fn arguments(&self) -> TypeId {
        self.arguments
    }

    /// Returns the [`TypeId`] of the operation's output type.
    #[inline]
    pub fn output(&self) -> TypeId {
        self.output
    }

    /// Returns the operation's receiver mode.
    #[inline]
    pub fn receiver(&self) -> ReceiverMode {
        self.receiver
    }
}

/// Map from interface to its slot signatures, stored contiguously from
/// slot 0.
type SignatureMap = HashMap<TypeId, Vec<SlotSignature>, FxBuildHasher>;

/// The process-wide signature registry.
static REGISTRY: RegistryLock<SignatureMap> =
    RegistryLock::new(SignatureMap::with_hasher(FxBuildHasher));

/// Registers the interface `I`'s declared operation list, if it is not
/// registered yet.
///
/// Called on every handle construction; after the first call for a given
/// interface this is a single map probe under the read lock.
pub(crate) fn ensure_registered<I: Interface>() {
    let interface = TypeId::of::<I>();
    if REGISTRY.read().get().contains_key(&interface) {
        return;
    }

    let mut signatures = Vec::with_capacity(<I::Operations as OperationList>::LEN);
    <I::Operations as OperationList>::signatures(&mut signatures);

    // A racing constructor may have registered the interface between the
    // read probe and this write lock; `register` tolerates re-registering
    // identical signatures.
    let mut guard = REGISTRY.write();
    let map = guard.get_mut();
    for (position, signature) in signatures.into_iter().enumerate() {
        register(map, interface, type_name::<I>(), position, signature);
    }
}

/// Registers `signature` at `(interface, position)`.
///
/// Succeeds when the key is vacant or already holds the same signature.
///
/// # Panics
///
/// Panics when a *different* signature is already registered at the key.
/// Registration only ever walks an interface's single declared list, so
/// this is unreachable in correct use; a silent overwrite here would turn
/// a registry bug into misdispatch, which is why the conflict is loud
/// instead.
fn register(
    map: &mut SignatureMap,
    interface: TypeId,
    interface_name: &'static str,
    position: usize,
    signature: SlotSignature,
) {
    let slots = map.entry(interface).or_default();
    match slots.get(position) {
        Some(existing) if *existing == signature => {}
        Some(_) => panic!(
            "conflicting signature registered for slot {position} of interface `{interface_name}`"
        ),
        None => {
            // Slots are stored contiguously, so a vacant position is
            // always the push index.
            debug_assert_eq!(slots.len(), position);
            slots.push(signature);
        }
    }
}

/// Looks up the signature registered at `(interface, slot)`.
///
/// Returns `None` for an unregistered interface, or for a slot at or
/// beyond the interface's slot count.
#[must_use]
pub fn lookup(interface: TypeId, slot: usize) -> Option<SlotSignature> {
    REGISTRY
        .read()
        .get()
        .get(&interface)
        .and_then(|slots| slots.get(slot))
        .copied()
}

/// Looks up the signature registered at `slot` of the interface `I`.
#[must_use]
pub fn signature<I: Interface>(slot: usize) -> Option<SlotSignature> {
    lookup(TypeId::of::<I>(), slot)
}

/// Returns the number of slots registered for the interface `I`.
///
/// Slots are registered contiguously from slot 0, so the count is the
/// first slot at which [`signature`] would return `None`. An interface no
/// handle has been constructed for yet reports 0.
#[must_use]
pub fn slot_count<I: Interface>() -> usize {
    let guard = REGISTRY.read();
    guard
        .get()
        .get(&TypeId::of::<I>())
        .map_or(0, |slots| slots.len())
}

/// Returns every signature registered for the interface `I`, in slot
/// order.
#[must_use]
pub fn signatures<I: Interface>() -> Vec<SlotSignature> {
    REGISTRY
        .read()
        .get()
        .get(&TypeId::of::<I>())
        .cloned()
        .unwrap_or_default()
}
