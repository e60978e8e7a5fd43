//! Tests for the merge engine

use tempfile::TempDir;

use crate::app::models::{
    CanonicalRecord, ExportColumn, SensorCatalog, SensorDescriptor, SensorKey, StationInfo,
};
use crate::app::services::csv_codec;
use crate::app::services::merger::{dedup_first_occurrence, merge};
use crate::Error;

fn catalog() -> SensorCatalog {
    SensorCatalog::new(vec![
        SensorDescriptor::new(
            SensorKey::Date,
            None,
            Some(ExportColumn::Blank),
            "Datum",
            "",
        ),
        SensorDescriptor::new(
            SensorKey::Time,
            None,
            Some(ExportColumn::Blank),
            "Zeit",
            "",
        ),
        SensorDescriptor::new(
            SensorKey::Temp1,
            Some(0),
            Some(ExportColumn::Indexed(2)),
            "Temp. A. 1",
            "\u{b0}C",
        ),
    ])
    .expect("test catalog is valid")
}

fn record(date: &str, time: &str, temp: &str) -> CanonicalRecord {
    CanonicalRecord::from_pairs(vec![
        (SensorKey::Date, date.to_string()),
        (SensorKey::Time, time.to_string()),
        (SensorKey::Temp1, temp.to_string()),
    ])
}

fn station() -> StationInfo {
    StationInfo::new("ERL", 300, "TE923")
}

/// Write a single-month fixture file and return its path
fn write_fixture(
    dir: &TempDir,
    sub: &str,
    rain_calib_factor: f64,
    station: &StationInfo,
    records: &[CanonicalRecord],
) -> std::path::PathBuf {
    let folder = dir.path().join(sub);
    std::fs::create_dir_all(&folder).unwrap();
    let file_name =
        csv_codec::write_single_month(&folder, rain_calib_factor, station, records, &catalog())
            .unwrap();
    folder.join(file_name)
}

#[test]
fn test_dedup_keeps_first_occurrence() {
    let records = vec![
        record("01.01.2020", "10:00", "21.5"),
        record("01.01.2020", "10:10", "21.7"),
        record("01.01.2020", "10:00", "99.9"),
    ];

    let unique = dedup_first_occurrence(records);

    assert_eq!(unique.len(), 2);
    assert_eq!(unique[0].get(SensorKey::Temp1), Some("21.5"));
}

#[test]
fn test_merge_deduplicates_overlapping_timepoints() {
    let dir = TempDir::new().unwrap();
    let file_a = write_fixture(
        &dir,
        "a",
        1.0,
        &station(),
        &[
            record("01.01.2020", "10:00", "21.5"),
            record("01.01.2020", "10:10", "21.7"),
        ],
    );
    // Same timepoint with a different payload, plus one new record
    let file_b = write_fixture(
        &dir,
        "b",
        1.0,
        &station(),
        &[
            record("01.01.2020", "10:00", "99.9"),
            record("01.01.2020", "10:20", "21.9"),
        ],
    );

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let files = merge(&out, &file_a, &file_b, &catalog()).unwrap();
    assert_eq!(files, vec!["EXP01_20.csv"]);

    let merged = csv_codec::read(&out.join(&files[0]), &catalog()).unwrap();
    assert_eq!(merged.records.len(), 3);
    // First file's payload wins for the overlapping timepoint
    assert_eq!(merged.records[0].get(SensorKey::Temp1), Some("21.5"));
}

#[test]
fn test_merge_repartitions_across_months() {
    let dir = TempDir::new().unwrap();
    let file_a = write_fixture(
        &dir,
        "a",
        1.0,
        &station(),
        &[record("31.01.2020", "23:50", "3.1")],
    );
    let file_b = write_fixture(
        &dir,
        "b",
        1.0,
        &station(),
        &[record("01.02.2020", "00:00", "3.0")],
    );

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let files = merge(&out, &file_a, &file_b, &catalog()).unwrap();

    assert_eq!(files, vec!["EXP01_20.csv", "EXP02_20.csv"]);
}

#[test]
fn test_merge_rejects_different_station_names() {
    let dir = TempDir::new().unwrap();
    let file_a = write_fixture(
        &dir,
        "a",
        1.0,
        &station(),
        &[record("01.01.2020", "10:00", "21.5")],
    );
    let other = StationInfo::new("MUC", 300, "TE923");
    let file_b = write_fixture(
        &dir,
        "b",
        1.0,
        &other,
        &[record("01.01.2020", "10:10", "21.7")],
    );

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let result = merge(&out, &file_a, &file_b, &catalog());

    assert!(matches!(result, Err(Error::IncompatibleStations { .. })));
    // No output files may exist after a rejected merge
    assert!(std::fs::read_dir(&out).unwrap().next().is_none());
}

#[test]
fn test_merge_rejects_different_calibration() {
    let dir = TempDir::new().unwrap();
    let file_a = write_fixture(
        &dir,
        "a",
        1.0,
        &station(),
        &[record("01.01.2020", "10:00", "21.5")],
    );
    let file_b = write_fixture(
        &dir,
        "b",
        1.25,
        &station(),
        &[record("01.01.2020", "10:10", "21.7")],
    );

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let result = merge(&out, &file_a, &file_b, &catalog());

    assert!(matches!(result, Err(Error::IncompatibleStations { .. })));
}

#[test]
fn test_merge_ignores_rain_counter_base_difference() {
    let dir = TempDir::new().unwrap();
    let file_a = write_fixture(
        &dir,
        "a",
        1.0,
        &station(),
        &[record("01.01.2020", "10:00", "21.5")],
    );
    let file_b = write_fixture(
        &dir,
        "b",
        1.0,
        &station(),
        &[record("01.01.2020", "10:10", "21.7")],
    );

    // Rewrite file B's rain baseline; stations legitimately reset it
    let content = crate::app::adapters::filesystem::read_latin1(&file_b).unwrap();
    crate::app::adapters::filesystem::write_latin1(
        &file_b,
        &content.replace("#Regen0=0mm", "#Regen0=250mm"),
    )
    .unwrap();

    let out = dir.path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    let files = merge(&out, &file_a, &file_b, &catalog()).unwrap();
    assert_eq!(files.len(), 1);
}
