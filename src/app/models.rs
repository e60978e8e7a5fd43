//! Data models for interchange-file processing
//!
//! This module contains the core data structures for representing station
//! sensors, raw sensor samples and interchange-compatible records, following
//! the PC-Wetterstation CSV interchange specification.

use crate::constants::DATETIME_FORMAT;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// =============================================================================
// Sensor Keys
// =============================================================================

/// Closed enumeration of every sensor the station and the interchange format
/// know about.
///
/// The string forms match the keys the station firmware reports, so catalogs
/// can be described in JSON station profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SensorKey {
    /// Measurement date (`dd.mm.yyyy`), always the first interchange column
    Date,
    /// Measurement time (`HH:MM`, station-local), always the second column
    Time,
    /// Inside temperature in degree Celsius
    TempInside,
    /// Inside relative humidity in percent
    HumidInside,
    /// Outside temperature channel 1
    Temp1,
    /// Outside humidity channel 1
    Humid1,
    /// Outside temperature channel 2
    Temp2,
    /// Outside humidity channel 2
    Humid2,
    /// Outside temperature channel 3
    Temp3,
    /// Outside humidity channel 3
    Humid3,
    /// Outside temperature channel 4
    Temp4,
    /// Outside humidity channel 4
    Humid4,
    /// Outside temperature channel 5
    Temp5,
    /// Outside humidity channel 5
    Humid5,
    /// Air pressure in hPa
    AirPressure,
    /// UV index
    #[serde(rename = "UV")]
    Uv,
    /// Weather forecast code reported by the station (import-only)
    Forecast,
    /// Storm warning flag reported by the station (import-only)
    StormWarning,
    /// Wind direction (compass sector index in the raw feed, degrees exported)
    WindDir,
    /// Wind speed (m/s in the raw feed, km/h exported)
    WindSpeed,
    /// Wind gust speed (m/s in the raw feed, km/h exported)
    WindGusts,
    /// Wind chill temperature in degree Celsius
    TempWind,
    /// Rain: absolute tipping-bucket counter in the raw feed, incremental
    /// millimeters in the interchange format
    RainCounter,
}

impl SensorKey {
    /// Stable string identifier of the sensor, as used in station profiles
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKey::Date => "date",
            SensorKey::Time => "time",
            SensorKey::TempInside => "tempInside",
            SensorKey::HumidInside => "humidInside",
            SensorKey::Temp1 => "temp1",
            SensorKey::Humid1 => "humid1",
            SensorKey::Temp2 => "temp2",
            SensorKey::Humid2 => "humid2",
            SensorKey::Temp3 => "temp3",
            SensorKey::Humid3 => "humid3",
            SensorKey::Temp4 => "temp4",
            SensorKey::Humid4 => "humid4",
            SensorKey::Temp5 => "temp5",
            SensorKey::Humid5 => "humid5",
            SensorKey::AirPressure => "airPressure",
            SensorKey::Uv => "UV",
            SensorKey::Forecast => "forecast",
            SensorKey::StormWarning => "stormWarning",
            SensorKey::WindDir => "windDir",
            SensorKey::WindSpeed => "windSpeed",
            SensorKey::WindGusts => "windGusts",
            SensorKey::TempWind => "tempWind",
            SensorKey::RainCounter => "rainCounter",
        }
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sensor Descriptors and Catalog
// =============================================================================

/// Position of a sensor in the interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ExportColumn {
    /// Numbered interchange column (the sensor index the consumer displays)
    Indexed(u32),
    /// Exported but unnumbered; by format specification exactly the date and
    /// time columns carry a blank index
    Blank,
}

/// Static description of one physical or logical sensor
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorDescriptor {
    /// Stable identifier, also the catalog map key
    pub key: SensorKey,

    /// Position in the raw value vector, `None` if not sourced from raw input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_index: Option<usize>,

    /// Position in the interchange format, `None` if not exported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_column: Option<ExportColumn>,

    /// Human-readable sensor name shown by the consumer software
    pub display_name: String,

    /// Measurement unit shown by the consumer software
    pub unit: String,
}

impl SensorDescriptor {
    pub fn new(
        key: SensorKey,
        import_index: Option<usize>,
        export_column: Option<ExportColumn>,
        display_name: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            key,
            import_index,
            export_column,
            display_name: display_name.into(),
            unit: unit.into(),
        }
    }
}

/// Ordered mapping from [`SensorKey`] to [`SensorDescriptor`]
///
/// Iteration order is fixed at construction and defines column order for both
/// reading and writing. The catalog is the single source of truth for
/// ordering; records never carry an ordering of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorCatalog {
    entries: Vec<SensorDescriptor>,
}

impl SensorCatalog {
    /// Build a catalog from descriptors, validating the format invariants:
    /// keys must be unique and the first two entries must be the date and
    /// time sensors with a blank export column.
    pub fn new(entries: Vec<SensorDescriptor>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.key) {
                return Err(Error::configuration(format!(
                    "duplicate sensor '{}' in catalog",
                    entry.key
                )));
            }
        }

        let leading: Vec<SensorKey> = entries.iter().take(2).map(|e| e.key).collect();
        if leading != [SensorKey::Date, SensorKey::Time] {
            return Err(Error::configuration(
                "catalog must start with the date and time sensors",
            ));
        }
        for entry in &entries[..2] {
            if entry.export_column != Some(ExportColumn::Blank) {
                return Err(Error::configuration(format!(
                    "sensor '{}' must carry a blank export column",
                    entry.key
                )));
            }
        }

        Ok(Self { entries })
    }

    /// Look up a descriptor by key
    pub fn get(&self, key: SensorKey) -> Result<&SensorDescriptor> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .ok_or_else(|| Error::unknown_sensor(key.as_str()))
    }

    /// Iterate descriptors in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &SensorDescriptor> {
        self.entries.iter()
    }

    /// Keys in canonical order
    pub fn keys(&self) -> impl Iterator<Item = SensorKey> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Ordered list of exported keys (descriptors with an export column),
    /// which is exactly the interchange file's column order
    pub fn exported_keys(&self) -> Vec<SensorKey> {
        self.entries
            .iter()
            .filter(|e| e.export_column.is_some())
            .map(|e| e.key)
            .collect()
    }

    /// Find the key bound to a numbered interchange column
    pub fn key_for_export_index(&self, index: u32) -> Option<SensorKey> {
        self.entries
            .iter()
            .find(|e| e.export_column == Some(ExportColumn::Indexed(index)))
            .map(|e| e.key)
    }

    /// Number of catalogued sensors
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a catalog from a JSON station profile (an array of descriptors)
    pub fn from_profile(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("failed to read station profile {}", path.display()), e)
        })?;
        let entries: Vec<SensorDescriptor> = serde_json::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "invalid station profile {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::new(entries)
    }

    /// Catalog of the TE923 station family, the default station profile.
    ///
    /// Import indices follow the raw feed order of the station reader
    /// (temperature/humidity channel pairs, pressure, UV, forecast, storm
    /// warning, wind block, rain counter); export columns follow the sensor
    /// numbering of the consumer software. Forecast and storm warning are
    /// import-only auxiliary fields.
    pub fn te923() -> Self {
        use ExportColumn::{Blank, Indexed};
        use SensorKey::*;

        let entries = vec![
            SensorDescriptor::new(Date, None, Some(Blank), "Datum", ""),
            SensorDescriptor::new(Time, None, Some(Blank), "Zeit", ""),
            SensorDescriptor::new(TempInside, Some(0), Some(Indexed(1)), "Temp. I.", "\u{b0}C"),
            SensorDescriptor::new(HumidInside, Some(1), Some(Indexed(17)), "Feuchte I.", "%"),
            SensorDescriptor::new(Temp1, Some(2), Some(Indexed(2)), "Temp. A. 1", "\u{b0}C"),
            SensorDescriptor::new(Humid1, Some(3), Some(Indexed(18)), "Feuchte A. 1", "%"),
            SensorDescriptor::new(Temp2, Some(4), Some(Indexed(3)), "Temp. A. 2", "\u{b0}C"),
            SensorDescriptor::new(Humid2, Some(5), Some(Indexed(19)), "Feuchte A. 2", "%"),
            SensorDescriptor::new(Temp3, Some(6), Some(Indexed(4)), "Temp. A. 3", "\u{b0}C"),
            SensorDescriptor::new(Humid3, Some(7), Some(Indexed(20)), "Feuchte A. 3", "%"),
            SensorDescriptor::new(Temp4, Some(8), Some(Indexed(5)), "Temp. A. 4", "\u{b0}C"),
            SensorDescriptor::new(Humid4, Some(9), Some(Indexed(21)), "Feuchte A. 4", "%"),
            SensorDescriptor::new(Temp5, Some(10), Some(Indexed(6)), "Temp. A. 5", "\u{b0}C"),
            SensorDescriptor::new(Humid5, Some(11), Some(Indexed(22)), "Feuchte A. 5", "%"),
            SensorDescriptor::new(AirPressure, Some(12), Some(Indexed(133)), "Luftdruck", "hPa"),
            SensorDescriptor::new(Uv, Some(13), Some(Indexed(9)), "UV", "UV-Index"),
            SensorDescriptor::new(Forecast, Some(14), None, "Vorhersage", ""),
            SensorDescriptor::new(StormWarning, Some(15), None, "Sturmwarnung", ""),
            SensorDescriptor::new(WindDir, Some(16), Some(Indexed(36)), "Richtung", "\u{b0}"),
            SensorDescriptor::new(WindSpeed, Some(17), Some(Indexed(35)), "Wind", "km/h"),
            SensorDescriptor::new(WindGusts, Some(18), Some(Indexed(45)), "Windb\u{f6}en", "km/h"),
            SensorDescriptor::new(TempWind, Some(19), Some(Indexed(44)), "Temp. Wind", "\u{b0}C"),
            SensorDescriptor::new(RainCounter, Some(20), Some(Indexed(34)), "Regen", "mm"),
        ];

        // Statically valid: unique keys, date/time first with blank columns
        Self { entries }
    }
}

// =============================================================================
// Raw Samples
// =============================================================================

/// One decoded reading of a single sensor at one timepoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    /// Successfully measured value
    Measured(f64),
    /// Missing or garbled reading reported by the station
    Invalid,
}

/// One timepoint's readings as delivered by the ingestion collaborator
///
/// `values` is indexed by the catalog's import indices. The timestamp carries
/// station-local calendar semantics (daylight saving applied by the
/// platform's local time rules).
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Measurement time in seconds since the Unix epoch
    pub timestamp: i64,

    /// Sensor readings, indexed by `import_index`
    pub values: Vec<RawValue>,
}

impl RawSample {
    pub fn new(timestamp: i64, values: Vec<RawValue>) -> Self {
        Self { timestamp, values }
    }
}

// =============================================================================
// Canonical Records
// =============================================================================

/// One timepoint's readings in interchange shape: an ordered mapping from
/// sensor key to string-encoded value
///
/// Always contains date and time as the first two keys, in catalog order,
/// with no gaps and no extra keys. Transformations produce new records;
/// records are never mutated in place by the codec.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanonicalRecord {
    fields: Vec<(SensorKey, String)>,
}

impl CanonicalRecord {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Build a record from ordered (key, value) pairs
    pub fn from_pairs(pairs: Vec<(SensorKey, String)>) -> Self {
        Self { fields: pairs }
    }

    /// Value of a sensor, if present
    pub fn get(&self, key: SensorKey) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Append a value, or replace it in place if the key is already present
    pub fn insert(&mut self, key: SensorKey, value: String) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Iterate (key, value) pairs in record order
    pub fn iter(&self) -> impl Iterator<Item = (SensorKey, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Keys in record order
    pub fn keys(&self) -> impl Iterator<Item = SensorKey> + '_ {
        self.fields.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The record's date field (`dd.mm.yyyy`)
    pub fn date(&self) -> Result<&str> {
        self.get(SensorKey::Date)
            .ok_or_else(|| Error::unknown_sensor(SensorKey::Date.as_str()))
    }

    /// The record's time field (`HH:MM`)
    pub fn time(&self) -> Result<&str> {
        self.get(SensorKey::Time)
            .ok_or_else(|| Error::unknown_sensor(SensorKey::Time.as_str()))
    }

    /// Combined timepoint parsed from the date and time fields
    pub fn timestamp(&self) -> Result<NaiveDateTime> {
        let stamp = format!("{} {}", self.date()?, self.time()?);
        NaiveDateTime::parse_from_str(&stamp, DATETIME_FORMAT)
            .map_err(|e| Error::datetime_parsing(format!("invalid record timepoint '{stamp}'"), e))
    }
}

// =============================================================================
// Station Identity and File Metadata
// =============================================================================

/// Identity of the measuring station as written into every interchange file
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationInfo {
    /// Station ID, typically three letters (for example `ERL`)
    pub name: String,

    /// Altitude of the station in meters
    pub height: i32,

    /// Information string on the detailed station type (producer, model)
    pub station_type: String,
}

impl StationInfo {
    pub fn new(name: impl Into<String>, height: i32, station_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            height,
            station_type: station_type.into(),
        }
    }
}

/// Header metadata read back from an interchange file
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetadata {
    /// Calibration factor of the rain sensor (1.000 for the original area)
    pub rain_calib_factor: f64,

    /// Rain counter baseline before the start of the file's data, in mm
    pub rain_counter_base: f64,

    /// Station identity fields
    pub station: StationInfo,

    /// Sensor descriptions in file column order, keyed by catalog key
    pub sensor_descriptions: Vec<(SensorKey, String)>,

    /// Sensor units in file column order, keyed by catalog key
    pub sensor_units: Vec<(SensorKey, String)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_only_catalog() -> Vec<SensorDescriptor> {
        vec![
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
        ]
    }

    #[test]
    fn test_catalog_rejects_duplicate_keys() {
        let mut entries = temp_only_catalog();
        entries.push(entries[2].clone());

        let result = SensorCatalog::new(entries);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_catalog_requires_date_and_time_first() {
        let mut entries = temp_only_catalog();
        entries.swap(0, 2);

        let result = SensorCatalog::new(entries);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_catalog_lookup_and_order() {
        let catalog = SensorCatalog::new(temp_only_catalog()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(SensorKey::Temp1).unwrap().display_name, "Temp. A. 1");
        assert!(matches!(
            catalog.get(SensorKey::Temp2),
            Err(Error::UnknownSensor { .. })
        ));

        let keys: Vec<SensorKey> = catalog.keys().collect();
        assert_eq!(keys, vec![SensorKey::Date, SensorKey::Time, SensorKey::Temp1]);
    }

    #[test]
    fn test_te923_catalog_export_order() {
        let catalog = SensorCatalog::te923();

        let exported = catalog.exported_keys();
        assert_eq!(exported[0], SensorKey::Date);
        assert_eq!(exported[1], SensorKey::Time);
        assert!(!exported.contains(&SensorKey::Forecast));
        assert!(!exported.contains(&SensorKey::StormWarning));

        assert_eq!(catalog.key_for_export_index(34), Some(SensorKey::RainCounter));
        assert_eq!(catalog.key_for_export_index(999), None);
    }

    #[test]
    fn test_record_insert_and_lookup() {
        let mut record = CanonicalRecord::new();
        record.insert(SensorKey::Date, "01.01.2020".to_string());
        record.insert(SensorKey::Time, "10:00".to_string());
        record.insert(SensorKey::Temp1, "21.5".to_string());

        assert_eq!(record.get(SensorKey::Temp1), Some("21.5"));
        assert_eq!(record.len(), 3);

        // Replacing keeps the position
        record.insert(SensorKey::Temp1, "22.0".to_string());
        assert_eq!(record.len(), 3);
        let keys: Vec<SensorKey> = record.keys().collect();
        assert_eq!(keys[2], SensorKey::Temp1);
    }

    #[test]
    fn test_record_timestamp_parsing() {
        let record = CanonicalRecord::from_pairs(vec![
            (SensorKey::Date, "29.02.2020".to_string()),
            (SensorKey::Time, "23:45".to_string()),
        ]);

        let stamp = record.timestamp().unwrap();
        assert_eq!(stamp.format("%d.%m.%Y %H:%M").to_string(), "29.02.2020 23:45");
    }

    #[test]
    fn test_record_timestamp_invalid() {
        let record = CanonicalRecord::from_pairs(vec![
            (SensorKey::Date, "31.02.2020".to_string()),
            (SensorKey::Time, "10:00".to_string()),
        ]);

        assert!(matches!(
            record.timestamp(),
            Err(Error::DateTimeParsing { .. })
        ));
    }

    #[test]
    fn test_sensor_key_serde_names() {
        let json = serde_json::to_string(&SensorKey::Uv).unwrap();
        assert_eq!(json, "\"UV\"");

        let key: SensorKey = serde_json::from_str("\"rainCounter\"").unwrap();
        assert_eq!(key, SensorKey::RainCounter);
    }
}
