//! Bucketed fingerprint table with stripe locking
//!
//! Partitions a [`PackedBits`] address space into `B` buckets of `E` entries
//! of `F` bits each. Entry value zero means "empty"; stored fingerprints are
//! nonzero and at most `F` bits wide. Each bucket maps to exactly one of `R`
//! stripe locks via `bucket & (R - 1)`, so operations on buckets in distinct
//! stripes never contend.
//!
//! Read operations take the optimistic path first and retry once under the
//! shared lock when a concurrent writer invalidates the stamp. An optimistic
//! scan only ever loops over the fixed `E` entry ranges of one bucket and the
//! storage never reallocates, so a torn read can only yield a wrong value,
//! which the failed validation discards.

use crate::storage::PackedBits;
use crate::sync::StripeLock;
use crossbeam_utils::CachePadded;

#[derive(Debug)]
pub(crate) struct CuckooTable {
    bits: PackedBits,
    buckets: u64,
    entries_per_bucket: u32,
    bits_per_entry: u32,
    locks: Vec<CachePadded<StripeLock>>,
    stripe_mask: u64,
}

impl CuckooTable {
    /// Creates a zeroed table. `buckets` and `stripes` must be powers of two
    /// with `stripes <= buckets`; the builder establishes both.
    pub(crate) fn new(
        buckets: u64,
        entries_per_bucket: u32,
        bits_per_entry: u32,
        stripes: u32,
    ) -> Self {
        debug_assert!(buckets.is_power_of_two());
        debug_assert!(stripes.is_power_of_two() && u64::from(stripes) <= buckets);
        let size = buckets * u64::from(entries_per_bucket) * u64::from(bits_per_entry);
        let mut locks = Vec::with_capacity(stripes as usize);
        locks.resize_with(stripes as usize, || CachePadded::new(StripeLock::new()));
        CuckooTable {
            bits: PackedBits::new(size),
            buckets,
            entries_per_bucket,
            bits_per_entry,
            locks,
            stripe_mask: u64::from(stripes) - 1,
        }
    }

    pub(crate) fn buckets(&self) -> u64 {
        self.buckets
    }

    pub(crate) fn entries_per_bucket(&self) -> u32 {
        self.entries_per_bucket
    }

    pub(crate) fn bits_per_entry(&self) -> u32 {
        self.bits_per_entry
    }

    pub(crate) fn stripes(&self) -> u32 {
        self.locks.len() as u32
    }

    /// Total storage in bits.
    pub(crate) fn storage_bits(&self) -> u64 {
        self.bits.size()
    }

    fn stripe(&self, bucket: u64) -> &StripeLock {
        &self.locks[(bucket & self.stripe_mask) as usize]
    }

    /// Bit range `[from, to)` of entry `entry` in bucket `bucket`.
    fn entry_range(&self, bucket: u64, entry: u32) -> (u64, u64) {
        debug_assert!(bucket < self.buckets);
        debug_assert!(entry < self.entries_per_bucket);
        let index = bucket * u64::from(self.entries_per_bucket) + u64::from(entry);
        let from = index * u64::from(self.bits_per_entry);
        (from, from + u64::from(self.bits_per_entry))
    }

    fn scan_any(&self, bucket: u64, value: u64) -> bool {
        for entry in 0..self.entries_per_bucket {
            let (from, to) = self.entry_range(bucket, entry);
            if self.bits.read(from, to) == value {
                return true;
            }
        }
        false
    }

    fn scan_matches(&self, bucket: u64, value: u64) -> u64 {
        let mut matches = 0;
        for entry in 0..self.entries_per_bucket {
            let (from, to) = self.entry_range(bucket, entry);
            if self.bits.read(from, to) == value {
                matches += 1;
            }
        }
        matches
    }

    /// Returns true when any entry of `bucket` holds `value`.
    pub(crate) fn contains(&self, bucket: u64, value: u64) -> bool {
        let lock = self.stripe(bucket);
        if let Some(stamp) = lock.try_optimistic_read() {
            let found = self.scan_any(bucket, value);
            if lock.validate(stamp) {
                return found;
            }
        }
        let _guard = lock.read();
        self.scan_any(bucket, value)
    }

    /// Tallies the entries of `bucket` holding `value`.
    pub(crate) fn count(&self, bucket: u64, value: u64) -> u64 {
        let lock = self.stripe(bucket);
        if let Some(stamp) = lock.try_optimistic_read() {
            let matches = self.scan_matches(bucket, value);
            if lock.validate(stamp) {
                return matches;
            }
        }
        let _guard = lock.read();
        self.scan_matches(bucket, value)
    }

    /// ORs `value` into the first empty entry of `bucket`. Returns false
    /// without mutation when the bucket is full.
    pub(crate) fn add_if_empty(&self, bucket: u64, value: u64) -> bool {
        let _guard = self.stripe(bucket).write();
        for entry in 0..self.entries_per_bucket {
            let (from, to) = self.entry_range(bucket, entry);
            if self.bits.read(from, to) == 0 {
                self.bits.or(from, to, value);
                return true;
            }
        }
        false
    }

    /// Stores `value` at `(bucket, entry)` and returns the previous value.
    /// When the entry already holds `value`, returns it without mutation.
    pub(crate) fn get_and_set(&self, bucket: u64, entry: u32, value: u64) -> u64 {
        let _guard = self.stripe(bucket).write();
        let (from, to) = self.entry_range(bucket, entry);
        let previous = self.bits.read(from, to);
        if previous == value {
            return previous;
        }
        self.bits.clear(from, to);
        self.bits.or(from, to, value);
        previous
    }

    /// Clears the first entry of `bucket` holding `value`. Returns false
    /// when no entry matches.
    pub(crate) fn remove(&self, bucket: u64, value: u64) -> bool {
        let _guard = self.stripe(bucket).write();
        for entry in 0..self.entries_per_bucket {
            let (from, to) = self.entry_range(bucket, entry);
            if self.bits.read(from, to) == value {
                self.bits.clear(from, to);
                return true;
            }
        }
        false
    }
}
