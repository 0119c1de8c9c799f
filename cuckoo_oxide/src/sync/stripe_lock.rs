//! Version-stamped stripe lock with optimistic reads
//!
//! Each stripe guards a subset of buckets and supports three access modes:
//!
//! - *Optimistic read*: obtain a version stamp, perform the read without
//!   blocking, then validate that no writer intervened. Invalid reads are
//!   retried under the shared lock.
//! - *Shared read*: blocks writers on the same stripe.
//! - *Exclusive write*: blocks all other accessors of the same stripe.
//!
//! The sequence counter is even while the stripe is write-free and odd while
//! a writer holds it. Writers bump it once on acquire and once on release, so
//! any stamp taken before a write fails validation afterwards.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{fence, AtomicU64, Ordering};

/// A single stripe lock: a sequence stamp plus a reader/writer lock.
#[derive(Debug)]
pub(crate) struct StripeLock {
    sequence: AtomicU64,
    lock: RwLock<()>,
}

impl StripeLock {
    pub(crate) fn new() -> Self {
        StripeLock {
            sequence: AtomicU64::new(0),
            lock: RwLock::new(()),
        }
    }

    /// Returns a version stamp for an optimistic read, or `None` when a
    /// writer currently holds the stripe.
    pub(crate) fn try_optimistic_read(&self) -> Option<u64> {
        let stamp = self.sequence.load(Ordering::Acquire);
        if stamp & 1 == 1 {
            None
        } else {
            Some(stamp)
        }
    }

    /// Returns true when no writer has acquired the stripe since `stamp`
    /// was obtained. The reads performed under the stamp may be used only
    /// if this returns true.
    pub(crate) fn validate(&self, stamp: u64) -> bool {
        fence(Ordering::Acquire);
        self.sequence.load(Ordering::Relaxed) == stamp
    }

    /// Acquires the stripe in shared mode, blocking writers.
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read()
    }

    /// Acquires the stripe exclusively, blocking readers and writers and
    /// invalidating all outstanding optimistic stamps.
    pub(crate) fn write(&self) -> StripeWriteGuard<'_> {
        let guard = self.lock.write();
        self.sequence.fetch_add(1, Ordering::Release);
        StripeWriteGuard {
            sequence: &self.sequence,
            _guard: guard,
        }
    }
}

/// Exclusive guard for one stripe. Releases the stripe and publishes its
/// writes when dropped.
pub(crate) struct StripeWriteGuard<'a> {
    sequence: &'a AtomicU64,
    _guard: RwLockWriteGuard<'a, ()>,
}

impl Drop for StripeWriteGuard<'_> {
    fn drop(&mut self) {
        self.sequence.fetch_add(1, Ordering::Release);
    }
}
