//! Interchange file writer
//!
//! Persists interchange records as one file per calendar month, named
//! `EXP<MM>_<YY>.csv`. Partitioning groups the records first and then writes
//! each group independently; a file is either written completely or the
//! operation fails without claiming success.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::{Terminator, WriterBuilder};
use tracing::{debug, info};

use super::header::{SensorMap, format_settings_line};
use crate::app::adapters::filesystem;
use crate::app::models::{CanonicalRecord, SensorCatalog, StationInfo};
use crate::constants::{DATA_FILE_EXTENSION, DATA_FILE_TAG, DATE_FORMAT};
use crate::{Error, Result};

/// Summary of a completed write operation
#[derive(Debug, Clone)]
pub struct WriteReport {
    /// Names of all files written, one per calendar month
    pub file_names: Vec<String>,

    /// Number of records written across all files
    pub records_written: usize,

    /// Chronologically first timepoint, `None` for an empty input
    pub first_time: Option<NaiveDateTime>,

    /// Chronologically last timepoint, `None` for an empty input
    pub last_time: Option<NaiveDateTime>,
}

/// Write records as monthly interchange files into `data_folder`.
///
/// The input does not need to be sorted; records are partitioned by the
/// (month, year) of their date field and each partition becomes exactly one
/// file. An empty input writes no files.
pub fn write(
    data_folder: &Path,
    rain_calib_factor: f64,
    station: &StationInfo,
    records: &[CanonicalRecord],
    catalog: &SensorCatalog,
) -> Result<WriteReport> {
    let mut sorted: Vec<(NaiveDateTime, &CanonicalRecord)> = records
        .iter()
        .map(|record| record.timestamp().map(|stamp| (stamp, record)))
        .collect::<Result<_>>()?;
    sorted.sort_by_key(|(stamp, _)| *stamp);

    // Group by month, then process each group independently
    let mut partitions: BTreeMap<(i32, u32), Vec<&CanonicalRecord>> = BTreeMap::new();
    for (stamp, record) in &sorted {
        partitions
            .entry((stamp.year(), stamp.month()))
            .or_default()
            .push(*record);
    }

    let mut file_names = Vec::new();
    for partition in partitions.values() {
        file_names.push(write_partition(
            data_folder,
            rain_calib_factor,
            station,
            partition,
            catalog,
        )?);
    }

    info!(
        "Wrote {} records into {} monthly files",
        sorted.len(),
        file_names.len()
    );

    Ok(WriteReport {
        file_names,
        records_written: sorted.len(),
        first_time: sorted.first().map(|(stamp, _)| *stamp),
        last_time: sorted.last().map(|(stamp, _)| *stamp),
    })
}

/// Write records of one single month as one interchange file.
///
/// Fails with `MixedMonth` if the records span more than one calendar month.
pub fn write_single_month(
    data_folder: &Path,
    rain_calib_factor: f64,
    station: &StationInfo,
    records: &[CanonicalRecord],
    catalog: &SensorCatalog,
) -> Result<String> {
    let refs: Vec<&CanonicalRecord> = records.iter().collect();
    write_partition(data_folder, rain_calib_factor, station, &refs, catalog)
}

fn write_partition(
    data_folder: &Path,
    rain_calib_factor: f64,
    station: &StationInfo,
    records: &[&CanonicalRecord],
    catalog: &SensorCatalog,
) -> Result<String> {
    if records.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut sorted: Vec<(NaiveDateTime, &CanonicalRecord)> = records
        .iter()
        .map(|record| record.timestamp().map(|stamp| (stamp, *record)))
        .collect::<Result<_>>()?;
    sorted.sort_by_key(|(stamp, _)| *stamp);

    // Defensive invariant check: a partition must not span months
    let first = month_of(sorted[0].1)?;
    for (_, record) in &sorted {
        let month = month_of(record)?;
        if month != first {
            return Err(Error::mixed_month(first, month));
        }
    }

    let file_name = format!(
        "{}{:02}_{:02}.{}",
        DATA_FILE_TAG,
        first.0,
        first.1.rem_euclid(100),
        DATA_FILE_EXTENSION
    );
    let path = data_folder.join(&file_name);
    debug!("Writing {} records to {}", sorted.len(), path.display());

    let content = render_file(rain_calib_factor, station, &sorted, catalog)?;
    filesystem::write_latin1(&path, &content)?;

    Ok(file_name)
}

/// (month, year) of a record's date field
fn month_of(record: &CanonicalRecord) -> Result<(u32, i32)> {
    let date = NaiveDate::parse_from_str(record.date()?, DATE_FORMAT).map_err(|e| {
        Error::datetime_parsing(
            format!("invalid record date '{}'", record.date().unwrap_or("")),
            e,
        )
    })?;
    Ok((date.month(), date.year()))
}

/// Render a complete single-month file: three header lines, the sensor-index
/// line and one data row per record, CRLF-terminated throughout
fn render_file(
    rain_calib_factor: f64,
    station: &StationInfo,
    sorted: &[(NaiveDateTime, &CanonicalRecord)],
    catalog: &SensorCatalog,
) -> Result<String> {
    let exported: Vec<_> = catalog
        .iter()
        .filter(|descriptor| descriptor.export_column.is_some())
        .collect();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .flexible(true)
        .from_writer(Vec::new());

    let names: Vec<&str> = exported
        .iter()
        .map(|descriptor| descriptor.display_name.as_str())
        .collect();
    writer.write_record(&names)?;

    let units: Vec<&str> = exported
        .iter()
        .map(|descriptor| descriptor.unit.as_str())
        .collect();
    writer.write_record(&units)?;

    writer.write_record([format_settings_line(rain_calib_factor, station)])?;

    writer.write_record(SensorMap::index_tokens(catalog))?;

    for (_, record) in sorted {
        let mut row = Vec::with_capacity(exported.len());
        for descriptor in &exported {
            let value = record
                .get(descriptor.key)
                .ok_or_else(|| Error::unknown_sensor(descriptor.key.as_str()))?;
            row.push(value);
        }
        writer.write_record(&row)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| Error::io_error(format!("failed to flush file buffer: {e}")))?;
    String::from_utf8(buffer)
        .map_err(|e| Error::io_error(format!("rendered file is not valid UTF-8: {e}")))
}
