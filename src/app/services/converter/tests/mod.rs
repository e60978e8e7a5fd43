//! Test utilities for converter testing

use crate::app::models::{RawSample, RawValue};


/// Number of values in a TE923 raw sample
pub const TE923_VALUE_COUNT: usize = 21;

/// Build a TE923-shaped sample with all values measured as zero, then apply
/// (import index, value) overrides
pub fn te923_sample(timestamp: i64, overrides: &[(usize, RawValue)]) -> RawSample {
    let mut values = vec![RawValue::Measured(0.0); TE923_VALUE_COUNT];
    for (index, value) in overrides {
        values[*index] = *value;
    }
    RawSample::new(timestamp, values)
}
