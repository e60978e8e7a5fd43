//! Unit/shape converter for raw station samples
//!
//! Transforms a chronologically-unordered batch of raw sensor samples into
//! sorted interchange-compatible records for one station: projection onto
//! catalog keys, calendar date/time derivation, unit conversions and the
//! incremental rain calculation.
//!
//! Two data-quality policies are deliberate and lossy:
//! - An invalid or missing reading is substituted with zero instead of
//!   failing the batch.
//! - The rain counter state is never kept inside this module; the caller
//!   supplies the counter value preceding the batch and persists the returned
//!   last value for the next batch.

pub mod rain;

#[cfg(test)]
pub mod tests;

use chrono::{DateTime, Local, NaiveDateTime, Timelike};
use tracing::{debug, warn};

use crate::app::models::{CanonicalRecord, RawSample, RawValue, SensorCatalog, SensorKey};
use crate::constants::{DATE_FORMAT, MS_TO_KMH, TIME_FORMAT, WIND_SECTOR_TO_DEGREES};
use crate::{Error, Result};

/// Result of converting one batch of raw samples
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    /// Interchange-compatible records, sorted ascending by (date, time)
    pub records: Vec<CanonicalRecord>,

    /// Timepoint of the last record, with minute precision
    pub last_time: NaiveDateTime,

    /// Absolute rain counter of the last sample, to be carried forward by
    /// the caller as the next batch's prior value
    pub last_rain_counter: f64,
}

/// Convert a batch of raw samples into sorted interchange records.
///
/// `last_rain_counter` is the absolute tipping-bucket count immediately
/// preceding the first sample of this batch.
pub fn convert_samples(
    samples: &[RawSample],
    last_rain_counter: f64,
    catalog: &SensorCatalog,
) -> Result<ConversionOutcome> {
    if samples.is_empty() {
        return Err(Error::EmptyInput);
    }

    // Project each sample onto the exported catalog keys
    let mut keyed: Vec<(NaiveDateTime, CanonicalRecord)> = Vec::with_capacity(samples.len());
    for sample in samples {
        let local = local_time(sample.timestamp)?;
        let record = project_sample(sample, &local, catalog);
        // Minute precision, matching the interchange time format
        let minute = local.naive_local().with_second(0).unwrap_or(local.naive_local());
        keyed.push((minute, record));
    }

    // Sort ascending by (date, time); stable, so same-minute samples keep
    // their input order
    keyed.sort_by_key(|(stamp, _)| *stamp);

    apply_wind_conversions(&mut keyed);
    let last_counter = apply_rain_increments(&mut keyed, last_rain_counter);

    let last_time = keyed
        .last()
        .map(|(stamp, _)| *stamp)
        .ok_or(Error::EmptyInput)?;

    Ok(ConversionOutcome {
        records: keyed.into_iter().map(|(_, record)| record).collect(),
        last_time,
        last_rain_counter: last_counter,
    })
}

/// Convert an epoch timestamp into station-local calendar time (daylight
/// saving applied by the platform's local time rules)
fn local_time(timestamp: i64) -> Result<DateTime<Local>> {
    let utc = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        Error::configuration(format!("sample timestamp {timestamp} is out of range"))
    })?;
    Ok(utc.with_timezone(&Local))
}

/// Project one raw sample onto the catalog's exported keys.
///
/// Keys without an import index get a zero placeholder; invalid readings are
/// substituted with zero (documented data-quality policy); import-only keys
/// are not part of the result.
fn project_sample(
    sample: &RawSample,
    local: &DateTime<Local>,
    catalog: &SensorCatalog,
) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();
    for descriptor in catalog.iter() {
        if descriptor.export_column.is_none() {
            continue;
        }

        let value = match descriptor.key {
            SensorKey::Date => local.format(DATE_FORMAT).to_string(),
            SensorKey::Time => local.format(TIME_FORMAT).to_string(),
            key => match descriptor.import_index {
                None => "0".to_string(),
                Some(index) => match sample.values.get(index) {
                    Some(RawValue::Measured(value)) => format_value(*value),
                    Some(RawValue::Invalid) => {
                        debug!("invalid reading for sensor '{key}', substituting zero");
                        "0".to_string()
                    }
                    None => {
                        warn!(
                            "import index {index} of sensor '{key}' is beyond the \
                             raw value vector, substituting zero"
                        );
                        "0".to_string()
                    }
                },
            },
        };
        record.insert(descriptor.key, value);
    }
    record
}

/// Wind speeds from m/s to km/h, wind direction from sector index to degrees
fn apply_wind_conversions(keyed: &mut [(NaiveDateTime, CanonicalRecord)]) {
    for (_, record) in keyed.iter_mut() {
        scale_field(record, SensorKey::WindGusts, MS_TO_KMH);
        scale_field(record, SensorKey::WindSpeed, MS_TO_KMH);
        scale_field(record, SensorKey::WindDir, WIND_SECTOR_TO_DEGREES);
    }
}

fn scale_field(record: &mut CanonicalRecord, key: SensorKey, factor: f64) {
    if let Some(value) = record.get(key) {
        let scaled = value.parse::<f64>().unwrap_or(0.0) * factor;
        record.insert(key, format_value(scaled));
    }
}

/// Replace the absolute rain counter of each record with the incremental rain
/// amount since the preceding record. Returns the last absolute counter (or
/// the prior value for catalogs without a rain sensor).
fn apply_rain_increments(
    keyed: &mut [(NaiveDateTime, CanonicalRecord)],
    last_rain_counter: f64,
) -> f64 {
    let counters: Vec<f64> = keyed
        .iter()
        .filter_map(|(_, record)| record.get(SensorKey::RainCounter))
        .map(|value| value.parse::<f64>().unwrap_or(0.0))
        .collect();
    if counters.is_empty() {
        return last_rain_counter;
    }

    let increments = rain::rain_increments(&counters, last_rain_counter);
    for ((_, record), amount) in keyed.iter_mut().zip(increments) {
        record.insert(SensorKey::RainCounter, format_value(amount));
    }

    counters.last().copied().unwrap_or(last_rain_counter)
}

/// String form of a numeric interchange field
pub(crate) fn format_value(value: f64) -> String {
    format!("{value}")
}
