//! Hash helpers for producing 64-bit item hashes
//!
//! The filter consumes pre-hashed 64-bit items and leaves the choice of hash
//! function to the caller. These helpers cover the common case of hashing a
//! byte string with xxh64.

use xxhash_rust::xxh64::xxh64;

/// Hashes a byte string to a 64-bit item hash with the default seed.
///
/// # Examples
/// ```
/// use cuckoo_oxide::common::hash::item_hash;
///
/// let hash = item_hash(b"user:1234");
/// assert_ne!(hash, item_hash(b"user:1235"));
/// ```
pub fn item_hash(data: &[u8]) -> u64 {
    xxh64(data, 0)
}

/// Hashes a byte string to a 64-bit item hash with an explicit seed.
///
/// Distinct seeds yield independent hash families, useful when several
/// filters must not share false positives.
pub fn item_hash_with_seed(data: &[u8], seed: u64) -> u64 {
    xxh64(data, seed)
}
