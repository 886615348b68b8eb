//! The lock guarding the process-wide registries.
//!
//! Uses `std::sync::RwLock` when the `std` feature is enabled and
//! `spin::RwLock` otherwise, behind one interface. Both registries in
//! this crate (slot signatures and shared tables) are written only on the
//! first use of an interface or concrete type; every later access is a
//! read of effectively immutable data, so a read-write lock keeps the
//! common path contention-free.

#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// A read-write lock around registry state with a `const` constructor, so
/// it can live in a `static`.
#[repr(transparent)]
pub(crate) struct RegistryLock<T: 'static + Send + Sync>(impl_::RwLock<T>);

/// Shared guard returned by [`RegistryLock::read`].
#[repr(transparent)]
pub(crate) struct RegistryReadGuard<T: 'static + Send + Sync>(
    impl_::RwLockReadGuard<'static, T>,
);

/// Exclusive guard returned by [`RegistryLock::write`].
#[repr(transparent)]
pub(crate) struct RegistryWriteGuard<T: 'static + Send + Sync>(
    impl_::RwLockWriteGuard<'static, T>,
);

impl<T: 'static + Send + Sync> RegistryLock<T> {
    #[must_use]
    pub(crate) const fn new(value: T) -> Self {
        Self(impl_::RwLock::new(value))
    }

    #[inline]
    pub(crate) fn read(&'static self) -> RegistryReadGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        #[cfg(feature = "std")]
        let guard = self.0.read().expect("Unable to acquire registry lock");

        RegistryReadGuard(guard)
    }

    #[inline]
    pub(crate) fn write(&'static self) -> RegistryWriteGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.write();

        #[cfg(feature = "std")]
        let guard = self.0.write().expect("Unable to acquire registry lock");

        RegistryWriteGuard(guard)
    }
}

impl<T: 'static + Send + Sync> RegistryReadGuard<T> {
    #[inline]
    pub(crate) fn get(&self) -> &T {
        &self.0
    }
}

impl<T: 'static + Send + Sync> RegistryWriteGuard<T> {
    #[inline]
    pub(crate) fn get_mut(&mut self) -> &mut T {
        &mut self.0
    }
}
