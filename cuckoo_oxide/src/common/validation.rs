//! Validation utilities for builder parameter bounds checking

use crate::common::{FilterError, Result};

/// Maximum expected capacity (2^31 - 1, ~2.1 billion items)
pub const MAX_CAPACITY: u64 = (1u64 << 31) - 1;

/// Validate that capacity is positive and within limits
pub fn validate_capacity(capacity: u64) -> Result<()> {
    if capacity == 0 {
        return Err(FilterError::InvalidParameter {
            param: "expected_capacity".to_string(),
            value: capacity.to_string(),
            constraint: "must be greater than 0".to_string(),
        });
    }
    if capacity > MAX_CAPACITY {
        return Err(FilterError::InvalidParameter {
            param: "expected_capacity".to_string(),
            value: capacity.to_string(),
            constraint: format!("must not exceed {}", MAX_CAPACITY),
        });
    }
    Ok(())
}

/// Validate that a value is a valid probability (0.0 < p < 1.0)
pub fn validate_probability(value: f64, param_name: &str) -> Result<()> {
    if !(0.0 < value && value < 1.0) {
        return Err(FilterError::InvalidParameter {
            param: param_name.to_string(),
            value: value.to_string(),
            constraint: "must be in range (0.0, 1.0) (exclusive)".to_string(),
        });
    }
    Ok(())
}

/// Validate the fingerprint width in bits (1-31)
pub fn validate_bits_per_entry(bits: u32) -> Result<()> {
    if !(1..=31).contains(&bits) {
        return Err(FilterError::InvalidParameter {
            param: "bits_per_entry".to_string(),
            value: bits.to_string(),
            constraint: "must be in range [1, 31]".to_string(),
        });
    }
    Ok(())
}

/// Validate the number of entries per bucket (1, 2, 4, or 8)
pub fn validate_entries_per_bucket(entries: u32) -> Result<()> {
    if !matches!(entries, 1 | 2 | 4 | 8) {
        return Err(FilterError::InvalidParameter {
            param: "entries_per_bucket".to_string(),
            value: entries.to_string(),
            constraint: "must be one of {1, 2, 4, 8}".to_string(),
        });
    }
    Ok(())
}

/// Validate the requested concurrency level
pub fn validate_concurrency_level(level: u32) -> Result<()> {
    if level == 0 {
        return Err(FilterError::InvalidParameter {
            param: "concurrency_level".to_string(),
            value: level.to_string(),
            constraint: "must be greater than 0".to_string(),
        });
    }
    Ok(())
}
