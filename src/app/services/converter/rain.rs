//! Incremental rain calculation from the absolute tipping-bucket counter

use crate::constants::BUCKET_COUNTS_TO_MM;

/// Successive differences of the absolute counter sequence, scaled from
/// tipping-bucket counts to millimeters.
///
/// `prior_counter` is the counter value immediately preceding the first
/// element, so the result has exactly one increment per input counter. A
/// counter reset between batches shows up as a negative increment; callers
/// are expected to re-baseline the counter before converting across a reset.
pub fn rain_increments(counters: &[f64], prior_counter: f64) -> Vec<f64> {
    let mut previous = prior_counter;
    counters
        .iter()
        .map(|&counter| {
            let increment = BUCKET_COUNTS_TO_MM * (counter - previous);
            previous = counter;
            increment
        })
        .collect()
}
