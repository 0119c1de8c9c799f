//! Cuckoo Filter: concurrent membership testing with deletions (Fan 2014)
//!
//! A cuckoo filter stores a short fingerprint of each item in one of two
//! candidate buckets. Insertions that find both buckets full displace an
//! existing fingerprint to its alternate bucket, cuckoo-hashing style.
//! Unlike a Bloom filter, previously inserted items can be removed.
//!
//! # Algorithm Overview
//!
//! - Each 64-bit item hash is reduced to a nonzero fingerprint of `F` bits
//!   and a primary bucket
//! - The alternate bucket is `bucket XOR (fingerprint * 0x5bd1e995)`, an
//!   involution, so a displaced fingerprint finds its other home without
//!   knowing the original item
//! - Queries check both candidate buckets; deletions clear one matching
//!   fingerprint
//!
//! # Concurrency
//!
//! All operations take `&self`. Buckets are guarded by striped locks; reads
//! are optimistic and fall back to a shared lock when a writer intervenes.
//! Operations on one stripe are linearizable; there is no cross-stripe
//! atomicity (see [`CuckooFilter::contains`]).
//!
//! # Time Complexity
//!
//! - Insert: O(1) amortized, bounded by `max_kicks` displacements
//! - Remove: O(1)
//! - Query: O(1)
//!
//! # References
//!
//! - Fan et al. "Cuckoo Filter: Practically Better Than Bloom" (2014)
//!
//! # Examples
//!
//! ```
//! use cuckoo_oxide::common::hash::item_hash;
//! use cuckoo_oxide::CuckooFilter;
//!
//! let filter = CuckooFilter::builder(1000).build().unwrap();
//!
//! assert!(filter.insert(item_hash(b"key1")));
//! assert!(filter.contains(item_hash(b"key1")));
//! assert!(!filter.contains(item_hash(b"key2")));
//!
//! filter.remove(item_hash(b"key1"));
//! assert!(!filter.contains(item_hash(b"key1")));
//! ```

use crate::filter::CuckooFilterBuilder;
use crate::table::CuckooTable;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Multiplier spreading fingerprints across the bucket space when deriving
/// the alternate bucket (MurmurHash2 mixing constant).
const ALTERNATE_SPREAD: u64 = 0x5bd1e995;

/// Concurrent cuckoo filter over pre-hashed 64-bit items.
///
/// Construct through [`CuckooFilter::builder`]. All operations take `&self`
/// and may be called from any number of threads; share the filter behind an
/// `Arc` or a plain reference.
///
/// # Examples
///
/// ```
/// use cuckoo_oxide::CuckooFilter;
///
/// let filter = CuckooFilter::builder(100).build().unwrap();
/// assert!(filter.insert(0x5eed));
/// assert!(filter.contains(0x5eed));
/// assert_eq!(filter.len(), 1);
/// ```
#[derive(Debug)]
pub struct CuckooFilter {
    table: CuckooTable,
    /// Successful inserts minus successful removes. Updated after the table
    /// mutation it accounts for, so it can transiently lead or lag.
    items: AtomicI64,
    max_kicks: u32,
}

impl CuckooFilter {
    /// Returns a builder for a filter expected to hold `expected_capacity`
    /// items.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuckoo_oxide::CuckooFilter;
    ///
    /// let filter = CuckooFilter::builder(100)
    ///     .with_false_positive_probability(0.01)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.entries_per_bucket(), 2);
    /// ```
    pub fn builder(expected_capacity: u64) -> CuckooFilterBuilder {
        CuckooFilterBuilder::new(expected_capacity)
    }

    pub(crate) fn from_parts(table: CuckooTable, max_kicks: u32) -> Self {
        CuckooFilter {
            table,
            items: AtomicI64::new(0),
            max_kicks,
        }
    }

    /// Inserts an item hash into the filter.
    ///
    /// Returns `false` when the filter is too full to place the fingerprint
    /// after `max_kicks` displacements. That is exhaustion, not an error;
    /// the filter remains usable. After a failed insert the last displaced
    /// fingerprint remains in the table unaccounted, so one unrelated item
    /// may keep answering `contains` with `true`.
    ///
    /// Inserting the same item repeatedly occupies one entry per insert, up
    /// to the combined size of its two candidate buckets.
    pub fn insert(&self, item_hash: u64) -> bool {
        let fingerprint = self.fingerprint_of(item_hash);
        let primary = self.primary_bucket(item_hash);
        if self.table.add_if_empty(primary, fingerprint) {
            self.items.fetch_add(1, Ordering::Relaxed);
            return true;
        }
        let alternate = self.alternate_bucket(primary, fingerprint);
        if self.table.add_if_empty(alternate, fingerprint) {
            self.items.fetch_add(1, Ordering::Relaxed);
            return true;
        }
        self.displace(fingerprint, primary, alternate)
    }

    /// Relocates fingerprints between candidate buckets until the incoming
    /// one finds a home or the kick limit is exhausted.
    fn displace(&self, fingerprint: u64, primary: u64, alternate: u64) -> bool {
        let mut rng = rand::rng();
        let mut fingerprint = fingerprint;
        let mut home = if rng.random::<bool>() { primary } else { alternate };
        for _ in 0..self.max_kicks {
            let entry = rng.random_range(0..self.table.entries_per_bucket());
            // The incoming fingerprint now lives at (home, entry); the
            // evicted one must move to its own alternate bucket.
            fingerprint = self.table.get_and_set(home, entry, fingerprint);
            home = self.alternate_bucket(home, fingerprint);
            if self.table.add_if_empty(home, fingerprint) {
                self.items.fetch_add(1, Ordering::Relaxed);
                return true;
            }
        }
        false
    }

    /// Tests whether an item hash might be in the filter.
    ///
    /// `false` is definite; `true` is probabilistic with the configured
    /// false-positive bound. An insert that returned before this call began
    /// is always observed. A concurrent displacement across two stripes can
    /// momentarily hide an item that was present before the displacing
    /// insert began and is present after it completes.
    pub fn contains(&self, item_hash: u64) -> bool {
        let fingerprint = self.fingerprint_of(item_hash);
        let primary = self.primary_bucket(item_hash);
        if self.table.contains(primary, fingerprint) {
            return true;
        }
        let alternate = self.alternate_bucket(primary, fingerprint);
        self.table.contains(alternate, fingerprint)
    }

    /// Removes one occurrence of an item hash.
    ///
    /// Returns `false` when neither candidate bucket holds the fingerprint.
    /// Removing an item that was never inserted can delete the fingerprint
    /// of a colliding item, introducing a false negative for it.
    pub fn remove(&self, item_hash: u64) -> bool {
        let fingerprint = self.fingerprint_of(item_hash);
        let primary = self.primary_bucket(item_hash);
        if self.table.remove(primary, fingerprint) {
            self.items.fetch_sub(1, Ordering::Relaxed);
            return true;
        }
        let alternate = self.alternate_bucket(primary, fingerprint);
        if self.table.remove(alternate, fingerprint) {
            self.items.fetch_sub(1, Ordering::Relaxed);
            return true;
        }
        false
    }

    /// Counts entries across both candidate buckets holding the item's
    /// fingerprint (duplicate inserts and colliding items both contribute).
    pub fn count(&self, item_hash: u64) -> u64 {
        let fingerprint = self.fingerprint_of(item_hash);
        let primary = self.primary_bucket(item_hash);
        let mut total = self.table.count(primary, fingerprint);
        let alternate = self.alternate_bucket(primary, fingerprint);
        if alternate != primary {
            total += self.table.count(alternate, fingerprint);
        }
        total
    }

    /// Returns the number of items currently accounted in the filter.
    ///
    /// The counter is updated after the table mutation it accounts for, so
    /// under concurrency it can transiently lag individual entries; it is
    /// clamped at zero.
    pub fn len(&self) -> u64 {
        self.items.load(Ordering::Relaxed).max(0) as u64
    }

    /// Returns true when no items are accounted in the filter.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the total number of entry slots (`buckets * entries_per_bucket`).
    pub fn capacity(&self) -> u64 {
        self.table.buckets() * u64::from(self.table.entries_per_bucket())
    }

    /// Returns the fraction of entry slots currently occupied.
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Returns the number of buckets (always a power of two).
    pub fn buckets(&self) -> u64 {
        self.table.buckets()
    }

    /// Returns the number of entries per bucket.
    pub fn entries_per_bucket(&self) -> u32 {
        self.table.entries_per_bucket()
    }

    /// Returns the fingerprint width in bits.
    pub fn bits_per_entry(&self) -> u32 {
        self.table.bits_per_entry()
    }

    /// Returns the number of stripe locks (always a power of two).
    pub fn concurrency_level(&self) -> u32 {
        self.table.stripes()
    }

    /// Returns the maximum number of displacements attempted per insert.
    pub fn max_kicks(&self) -> u32 {
        self.max_kicks
    }

    /// Returns the fingerprint storage size in bytes.
    pub fn memory_usage(&self) -> u64 {
        self.table.storage_bits().div_ceil(8)
    }

    /// Derives a nonzero fingerprint from an item hash by trying successive
    /// `F`-bit windows of the hash and falling back to 1 when every window
    /// is zero.
    fn fingerprint_of(&self, item_hash: u64) -> u64 {
        let bits = self.table.bits_per_entry();
        for window in 0..(64 / bits) {
            let candidate = (item_hash << ((64 - bits * window) % 64)) >> (64 - bits);
            if candidate != 0 {
                return candidate;
            }
        }
        1
    }

    /// Primary candidate bucket of an item hash.
    fn primary_bucket(&self, item_hash: u64) -> u64 {
        self.bucket_index(item_hash >> self.table.bits_per_entry())
    }

    /// The other candidate bucket for `fingerprint` relative to `bucket`.
    /// Applying this twice with the same fingerprint returns the original
    /// bucket, which is what lets a displaced entry find its alternate home.
    fn alternate_bucket(&self, bucket: u64, fingerprint: u64) -> u64 {
        self.bucket_index(bucket ^ fingerprint.wrapping_mul(ALTERNATE_SPREAD))
    }

    /// Folds a 64-bit value into `[0, buckets)`. The sign bit is treated as
    /// noise: negative values (as `i64`) are complemented before masking.
    fn bucket_index(&self, value: u64) -> u64 {
        let folded = if (value as i64) < 0 { !value } else { value };
        folded & (self.table.buckets() - 1)
    }
}
