//! Merge engine for interchange files
//!
//! Combines two parsed files of the same station into one deduplicated,
//! re-partitioned set of monthly files. Station identity is verified before
//! anything is written; the rain counter baseline is exempt because stations
//! legitimately reset it.

#[cfg(test)]
pub mod tests;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use crate::app::models::{CanonicalRecord, FileMetadata, SensorCatalog, SensorKey};
use crate::app::services::csv_codec;
use crate::{Error, Result};

/// Merge two interchange files into monthly files under `out_data_folder`.
///
/// Records of the first file come first; overlapping (date, time) pairs are
/// deduplicated with the first occurrence winning (see
/// [`dedup_first_occurrence`]). The output carries the first file's station
/// identity and calibration factor. Returns the names of all written files.
pub fn merge(
    out_data_folder: &Path,
    input_file_a: &Path,
    input_file_b: &Path,
    catalog: &SensorCatalog,
) -> Result<Vec<String>> {
    let file_a = csv_codec::read(input_file_a, catalog)?;
    let file_b = csv_codec::read(input_file_b, catalog)?;

    check_same_station(&file_a.metadata, &file_b.metadata)?;

    let mut merged = file_a.records;
    merged.extend(file_b.records);
    let unique = dedup_first_occurrence(merged);

    info!(
        "Merging {} and {} into {} unique records",
        input_file_a.display(),
        input_file_b.display(),
        unique.len()
    );

    let report = csv_codec::write(
        out_data_folder,
        file_a.metadata.rain_calib_factor,
        &file_a.metadata.station,
        &unique,
        catalog,
    )?;
    Ok(report.file_names)
}

/// Verify that two files were written by the identical station.
///
/// The rain counter baseline is deliberately not compared.
fn check_same_station(a: &FileMetadata, b: &FileMetadata) -> Result<()> {
    if a.rain_calib_factor != b.rain_calib_factor {
        return Err(Error::incompatible_stations("rain calibration factor"));
    }
    if a.station.name != b.station.name {
        return Err(Error::incompatible_stations("station name"));
    }
    if a.station.height != b.station.height {
        return Err(Error::incompatible_stations("station height"));
    }
    if a.station.station_type != b.station.station_type {
        return Err(Error::incompatible_stations("station type"));
    }
    if a.sensor_descriptions != b.sensor_descriptions {
        return Err(Error::incompatible_stations("sensor descriptions"));
    }
    if a.sensor_units != b.sensor_units {
        return Err(Error::incompatible_stations("sensor units"));
    }
    Ok(())
}

/// Deduplicate records by exact (date, time) string match, keeping the first
/// occurrence encountered.
///
/// First-occurrence-wins is the documented merge policy: when both inputs
/// carry the same timepoint with different payloads, the earlier input's
/// payload survives. Callers that want last-write-wins must reorder their
/// inputs.
pub fn dedup_first_occurrence(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen_times = HashSet::new();
    let mut unique = Vec::with_capacity(records.len());

    for record in records {
        let timepoint = format!(
            "{} {}",
            record.get(SensorKey::Date).unwrap_or(""),
            record.get(SensorKey::Time).unwrap_or("")
        );
        if seen_times.insert(timepoint.clone()) {
            unique.push(record);
        } else {
            debug!("dropping duplicate record at {timepoint}");
        }
    }

    unique
}
