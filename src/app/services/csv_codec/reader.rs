//! Interchange file reader
//!
//! Parses a monthly interchange file back into records plus the station
//! metadata carried in its header. The file name is not interpreted; any
//! file with the expected header/column shape is accepted.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use super::header::{SensorMap, parse_settings_line};
use crate::app::adapters::filesystem;
use crate::app::models::{CanonicalRecord, FileMetadata, SensorCatalog, SensorKey};
use crate::{Error, Result};

/// A parsed interchange file: one calendar month of records for one station
#[derive(Debug, Clone)]
pub struct MonthlyFile {
    /// Records in file order, keyed by the resolved column mapping
    pub records: Vec<CanonicalRecord>,

    /// Header metadata of the file
    pub metadata: FileMetadata,
}

/// Read an interchange file.
///
/// Fails with `MalformedFormat` if the header lines, the settings line or
/// the sensor-index line violate the expected shape.
pub fn read(file_path: &Path, catalog: &SensorCatalog) -> Result<MonthlyFile> {
    let content = filesystem::read_latin1(file_path)?;
    let file_label = file_path.display().to_string();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut rows = reader.records();

    // The three header lines plus the sensor-index control line
    let descriptions = next_header_row(&mut rows, &file_label, "sensor description line")?;
    let units = next_header_row(&mut rows, &file_label, "sensor unit line")?;
    let settings_row = next_header_row(&mut rows, &file_label, "settings line")?;
    let index_row = next_header_row(&mut rows, &file_label, "sensor index line")?;

    let index_tokens: Vec<String> = index_row.iter().map(|token| token.to_string()).collect();
    let sensor_map = SensorMap::resolve(&index_tokens, catalog, file_path)?;
    let columns = sensor_map.columns();

    let settings_line = settings_row.iter().collect::<Vec<&str>>().join(",");
    let settings = parse_settings_line(&settings_line, file_path)?;

    // Remaining lines are data rows keyed by the resolved column mapping
    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| {
            Error::malformed_format(&file_label, format!("unreadable data row: {e}"))
        })?;
        records.push(record_from_row(&row, columns));
    }

    debug!(
        "Read {} records for station '{}' from {}",
        records.len(),
        settings.station.name,
        file_label
    );

    Ok(MonthlyFile {
        records,
        metadata: FileMetadata {
            rain_calib_factor: settings.rain_calib_factor,
            rain_counter_base: settings.rain_counter_base,
            station: settings.station,
            sensor_descriptions: keyed_header_fields(columns, &descriptions),
            sensor_units: keyed_header_fields(columns, &units),
        },
    })
}

fn next_header_row(
    rows: &mut csv::StringRecordsIter<'_, &[u8]>,
    file_label: &str,
    expected: &str,
) -> Result<StringRecord> {
    match rows.next() {
        Some(Ok(row)) => Ok(row),
        Some(Err(e)) => Err(Error::malformed_format(
            file_label,
            format!("unreadable {expected}: {e}"),
        )),
        None => Err(Error::malformed_format(
            file_label,
            format!("missing {expected}"),
        )),
    }
}

fn record_from_row(row: &StringRecord, columns: &[SensorKey]) -> CanonicalRecord {
    let mut record = CanonicalRecord::new();
    for (position, key) in columns.iter().enumerate() {
        record.insert(*key, row.get(position).unwrap_or("").to_string());
    }
    record
}

/// Pair each file column's key with the corresponding header-line field
fn keyed_header_fields(
    columns: &[SensorKey],
    header_row: &StringRecord,
) -> Vec<(SensorKey, String)> {
    columns
        .iter()
        .enumerate()
        .map(|(position, key)| (*key, header_row.get(position).unwrap_or("").to_string()))
        .collect()
}
