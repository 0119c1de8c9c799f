//! Sizing policy and construction for [`CuckooFilter`]
//!
//! The builder turns a target capacity and false-positive probability into
//! the configuration tuple (buckets, entries per bucket, bits per entry,
//! stripe count, kick limit). The derived invariants are what the lookup and
//! displacement algorithms rely on: power-of-two bucket and stripe counts,
//! and a fingerprint width matched to the error rate.

use crate::common::validation::{
    validate_bits_per_entry, validate_capacity, validate_concurrency_level,
    validate_entries_per_bucket, validate_probability,
};
use crate::common::Result;
use crate::filter::CuckooFilter;
use crate::table::CuckooTable;

/// Default false-positive probability when none is requested.
const DEFAULT_FPP: f64 = 0.002;

/// Upper bound on displacements per insert.
const MAX_KICKS_CAP: u64 = 500;

/// Builder for [`CuckooFilter`].
///
/// Only the expected capacity is mandatory; the false-positive probability
/// defaults to 0.002 and everything else is derived. Explicit overrides are
/// validated at [`build`](CuckooFilterBuilder::build).
///
/// # Examples
///
/// ```
/// use cuckoo_oxide::CuckooFilterBuilder;
///
/// let filter = CuckooFilterBuilder::new(100).build().unwrap();
/// assert_eq!(filter.buckets(), 32);
/// assert_eq!(filter.entries_per_bucket(), 4);
/// assert_eq!(filter.bits_per_entry(), 13);
/// assert_eq!(filter.capacity(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct CuckooFilterBuilder {
    expected_capacity: u64,
    false_positive_probability: f64,
    bits_per_entry: Option<u32>,
    entries_per_bucket: Option<u32>,
    concurrency_level: Option<u32>,
}

impl CuckooFilterBuilder {
    /// Starts a builder for a filter expected to hold `expected_capacity`
    /// items.
    pub fn new(expected_capacity: u64) -> Self {
        CuckooFilterBuilder {
            expected_capacity,
            false_positive_probability: DEFAULT_FPP,
            bits_per_entry: None,
            entries_per_bucket: None,
            concurrency_level: None,
        }
    }

    /// Sets the target false-positive probability (exclusive range (0, 1)).
    ///
    /// Tighter probabilities widen fingerprints and deepen buckets.
    #[must_use]
    pub fn with_false_positive_probability(mut self, probability: f64) -> Self {
        self.false_positive_probability = probability;
        self
    }

    /// Overrides the fingerprint width in bits (1-31).
    #[must_use]
    pub fn with_bits_per_entry(mut self, bits: u32) -> Self {
        self.bits_per_entry = Some(bits);
        self
    }

    /// Overrides the number of entries per bucket (1, 2, 4, or 8).
    #[must_use]
    pub fn with_entries_per_bucket(mut self, entries: u32) -> Self {
        self.entries_per_bucket = Some(entries);
        self
    }

    /// Overrides the concurrency level (stripe count). The value is rounded
    /// up to a power of two and clamped to the bucket count; the default is
    /// the number of hardware threads.
    #[must_use]
    pub fn with_concurrency_level(mut self, level: u32) -> Self {
        self.concurrency_level = Some(level);
        self
    }

    /// Validates the configuration and constructs the filter.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameter`](crate::FilterError) when the
    /// capacity is zero or above 2^31 - 1, the probability is outside (0, 1),
    /// an override is out of range, or the derived fingerprint width exceeds
    /// 31 bits (the probability is too small to honor).
    pub fn build(self) -> Result<CuckooFilter> {
        validate_capacity(self.expected_capacity)?;
        validate_probability(self.false_positive_probability, "false_positive_probability")?;
        if let Some(entries) = self.entries_per_bucket {
            validate_entries_per_bucket(entries)?;
        }
        if let Some(bits) = self.bits_per_entry {
            validate_bits_per_entry(bits)?;
        }
        if let Some(level) = self.concurrency_level {
            validate_concurrency_level(level)?;
        }

        let probability = self.false_positive_probability;
        let entries = self
            .entries_per_bucket
            .unwrap_or_else(|| default_entries_per_bucket(probability));
        let load_factor = target_load_factor(entries);
        let bits = match self.bits_per_entry {
            Some(bits) => bits,
            None => {
                let derived = (((1.0 / probability).log2() + 3.0) / load_factor).ceil() as u32;
                validate_bits_per_entry(derived)?;
                derived
            }
        };

        let wanted = (self.expected_capacity as f64 / (f64::from(entries) * load_factor)).ceil();
        let buckets = (wanted as u64).max(1).next_power_of_two();

        let level = self.concurrency_level.unwrap_or_else(|| {
            u32::try_from(num_cpus::get()).unwrap_or(u32::MAX)
        });
        let stripes = stripe_count(level, buckets);
        let max_kicks = buckets.min(MAX_KICKS_CAP) as u32;

        let table = CuckooTable::new(buckets, entries, bits, stripes);
        Ok(CuckooFilter::from_parts(table, max_kicks))
    }
}

/// Entries per bucket for a requested false-positive probability: deeper
/// buckets tolerate higher load but cost extra fingerprint bits.
fn default_entries_per_bucket(probability: f64) -> u32 {
    if probability < 1e-5 {
        8
    } else if probability <= 2e-3 {
        4
    } else {
        2
    }
}

/// Load factor sustainable by the displacement protocol for a bucket depth.
fn target_load_factor(entries: u32) -> f64 {
    match entries {
        8 => 0.98,
        4 => 0.955,
        _ => 0.84,
    }
}

/// Normalizes a requested concurrency level to a power of two no larger
/// than the bucket count, so the stripe mask `bucket & (stripes - 1)` is
/// well defined.
fn stripe_count(level: u32, buckets: u64) -> u32 {
    let rounded = u64::from(level).next_power_of_two();
    rounded.min(buckets) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let filter = CuckooFilterBuilder::new(100).build().unwrap();
        assert_eq!(filter.buckets(), 32);
        assert_eq!(filter.entries_per_bucket(), 4);
        assert_eq!(filter.bits_per_entry(), 13);
        assert_eq!(filter.capacity(), 128);
        assert_eq!(filter.max_kicks(), 32);
    }

    #[test]
    fn test_loose_probability_configuration() {
        let filter = CuckooFilterBuilder::new(100)
            .with_false_positive_probability(0.01)
            .build()
            .unwrap();
        assert_eq!(filter.buckets(), 64);
        assert_eq!(filter.entries_per_bucket(), 2);
        assert_eq!(filter.bits_per_entry(), 12);
    }

    #[test]
    fn test_tight_probability_configuration() {
        let filter = CuckooFilterBuilder::new(100)
            .with_false_positive_probability(1e-6)
            .build()
            .unwrap();
        assert_eq!(filter.buckets(), 16);
        assert_eq!(filter.entries_per_bucket(), 8);
        assert_eq!(filter.bits_per_entry(), 24);
    }

    #[test]
    fn test_invariants_across_capacities() {
        for capacity in [1, 10, 100, 977, 10_000, 1_000_000] {
            let filter = CuckooFilterBuilder::new(capacity).build().unwrap();
            assert!(filter.buckets().is_power_of_two());
            assert!(matches!(filter.entries_per_bucket(), 1 | 2 | 4 | 8));
            assert!((1..=31).contains(&filter.bits_per_entry()));
            let stripes = u64::from(filter.concurrency_level());
            assert!(stripes.is_power_of_two());
            assert!(stripes <= filter.buckets());
        }
    }

    #[test]
    fn test_rejects_zero_capacity() {
        assert!(CuckooFilterBuilder::new(0).build().is_err());
    }

    #[test]
    fn test_rejects_probability_bounds() {
        assert!(CuckooFilterBuilder::new(100)
            .with_false_positive_probability(0.0)
            .build()
            .is_err());
        assert!(CuckooFilterBuilder::new(100)
            .with_false_positive_probability(1.0)
            .build()
            .is_err());
    }

    #[test]
    fn test_rejects_bad_entries_per_bucket() {
        for entries in [0, 5, 16] {
            assert!(CuckooFilterBuilder::new(100)
                .with_entries_per_bucket(entries)
                .build()
                .is_err());
        }
    }

    #[test]
    fn test_rejects_bad_bits_per_entry() {
        for bits in [0, 32] {
            assert!(CuckooFilterBuilder::new(100)
                .with_bits_per_entry(bits)
                .build()
                .is_err());
        }
    }

    #[test]
    fn test_rejects_zero_concurrency() {
        assert!(CuckooFilterBuilder::new(100)
            .with_concurrency_level(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_rejects_underivable_fingerprint_width() {
        // log2(1/p) + 3 comfortably above 31 bits
        assert!(CuckooFilterBuilder::new(100)
            .with_false_positive_probability(1e-12)
            .build()
            .is_err());
    }

    #[test]
    fn test_concurrency_normalized_to_power_of_two() {
        let filter = CuckooFilterBuilder::new(10_000)
            .with_concurrency_level(6)
            .build()
            .unwrap();
        assert_eq!(filter.concurrency_level(), 8);
    }

    #[test]
    fn test_concurrency_clamped_to_buckets() {
        let filter = CuckooFilterBuilder::new(1)
            .with_concurrency_level(64)
            .build()
            .unwrap();
        assert!(u64::from(filter.concurrency_level()) <= filter.buckets());
    }

    #[test]
    fn test_max_kicks_capped() {
        let filter = CuckooFilterBuilder::new(1_000_000).build().unwrap();
        assert_eq!(filter.max_kicks(), 500);
    }

    #[test]
    fn test_explicit_overrides_respected() {
        let filter = CuckooFilterBuilder::new(100)
            .with_entries_per_bucket(8)
            .with_bits_per_entry(7)
            .with_concurrency_level(2)
            .build()
            .unwrap();
        assert_eq!(filter.entries_per_bucket(), 8);
        assert_eq!(filter.bits_per_entry(), 7);
        assert_eq!(filter.concurrency_level(), 2);
    }
}
