//! Settings-line and sensor-index handling for interchange files
//!
//! The third header line concatenates `#<tag>=<value>` segments; the fourth
//! line lists the numbered export index of every column, with the date and
//! time columns carrying a blank index by format specification.

use std::path::Path;

use crate::app::models::{ExportColumn, SensorCatalog, SensorKey, StationInfo};
use crate::constants::settings_tags;
use crate::{Error, Result};

/// Contents of a parsed settings line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSettings {
    /// Calibration factor of the rain sensor
    pub rain_calib_factor: f64,

    /// Rain counter baseline before the file's data, in mm
    pub rain_counter_base: f64,

    /// Station identity fields
    pub station: StationInfo,
}

/// Format the settings line for writing.
///
/// The calibration factor uses a fixed 3-decimal format and the rain
/// baseline marker is fixed at `0mm`; both are required by the consumer.
pub fn format_settings_line(rain_calib_factor: f64, station: &StationInfo) -> String {
    format!(
        "#{}={:.3} #{}=0mm #{}={}/{}m #{}={}",
        settings_tags::CALIBRATE,
        rain_calib_factor,
        settings_tags::RAIN_BASE,
        settings_tags::LOCATION,
        station.name,
        station.height,
        settings_tags::STATION,
        station.station_type
    )
}

/// Parse a settings line into its required fields.
///
/// Every field is required and must match its expected shape (numeric
/// calibration factor, `mm` suffix on the rain baseline, `<name>/<height>m`
/// location); anything else marks the file as incompatible.
pub fn parse_settings_line(line: &str, file: &Path) -> Result<ParsedSettings> {
    let file_label = file.display().to_string();

    let mut rain_calib_factor = None;
    let mut rain_counter_base = None;
    let mut location = None;
    let mut station_type = None;

    for segment in line.split('#') {
        let Some((tag, value)) = segment.split_once('=') else {
            continue;
        };
        let value = value.trim();

        match tag.trim() {
            settings_tags::CALIBRATE => {
                let factor = value.parse::<f64>().map_err(|_| {
                    Error::malformed_format(
                        &file_label,
                        format!("invalid calibration factor '{value}'"),
                    )
                })?;
                rain_calib_factor = Some(factor);
            }
            settings_tags::RAIN_BASE => {
                let millimeters = value.strip_suffix("mm").ok_or_else(|| {
                    Error::malformed_format(
                        &file_label,
                        format!("rain baseline '{value}' is missing the 'mm' suffix"),
                    )
                })?;
                let base = millimeters.parse::<f64>().map_err(|_| {
                    Error::malformed_format(
                        &file_label,
                        format!("invalid rain baseline '{value}'"),
                    )
                })?;
                rain_counter_base = Some(base);
            }
            settings_tags::LOCATION => {
                let (name, height_part) = value.split_once('/').ok_or_else(|| {
                    Error::malformed_format(
                        &file_label,
                        format!("location '{value}' is missing the '/' separator"),
                    )
                })?;
                let meters = height_part.strip_suffix('m').ok_or_else(|| {
                    Error::malformed_format(
                        &file_label,
                        format!("station height '{height_part}' is missing the 'm' suffix"),
                    )
                })?;
                let height = meters.parse::<i32>().map_err(|_| {
                    Error::malformed_format(
                        &file_label,
                        format!("invalid station height '{height_part}'"),
                    )
                })?;
                location = Some((name.to_string(), height));
            }
            settings_tags::STATION => {
                station_type = Some(value.to_string());
            }
            _ => {} // Ignore unknown settings segments
        }
    }

    let rain_calib_factor = rain_calib_factor.ok_or_else(|| {
        Error::malformed_format(&file_label, "settings line is missing '#Calibrate='")
    })?;
    let rain_counter_base = rain_counter_base.ok_or_else(|| {
        Error::malformed_format(&file_label, "settings line is missing '#Regen0='")
    })?;
    let (name, height) = location.ok_or_else(|| {
        Error::malformed_format(&file_label, "settings line is missing '#Location='")
    })?;
    let station_type = station_type.ok_or_else(|| {
        Error::malformed_format(&file_label, "settings line is missing '#Station='")
    })?;

    Ok(ParsedSettings {
        rain_calib_factor,
        rain_counter_base,
        station: StationInfo::new(name, height, station_type),
    })
}

/// Resolved binding of file columns to catalog keys
#[derive(Debug, Clone)]
pub struct SensorMap {
    columns: Vec<SensorKey>,
}

impl SensorMap {
    /// Resolve the sensor-index control line against the catalog.
    ///
    /// Every numbered column is matched to the catalog key carrying that
    /// export index. Exactly two columns must be unmapped and must be the
    /// first two positions; by format specification these are the date and
    /// time columns, bound to the first two catalog keys.
    pub fn resolve(index_tokens: &[String], catalog: &SensorCatalog, file: &Path) -> Result<Self> {
        let matched: Vec<Option<SensorKey>> = index_tokens
            .iter()
            .map(|token| {
                token
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(|index| catalog.key_for_export_index(index))
            })
            .collect();

        let unmapped: Vec<usize> = matched
            .iter()
            .enumerate()
            .filter(|(_, key)| key.is_none())
            .map(|(position, _)| position)
            .collect();
        if unmapped != [0, 1] {
            return Err(Error::malformed_format(
                file.display().to_string(),
                format!(
                    "expected the first two columns to be the only unmapped ones, \
                     found unmapped positions {unmapped:?}"
                ),
            ));
        }

        let leading: Vec<SensorKey> = catalog.keys().take(2).collect();
        let columns = matched
            .into_iter()
            .enumerate()
            .map(|(position, key)| key.unwrap_or_else(|| leading[position]))
            .collect();

        Ok(Self { columns })
    }

    /// File columns in order, as catalog keys
    pub fn columns(&self) -> &[SensorKey] {
        &self.columns
    }

    /// Tokens of the sensor-index line in catalog export order (writer side)
    pub fn index_tokens(catalog: &SensorCatalog) -> Vec<String> {
        catalog
            .iter()
            .filter_map(|descriptor| descriptor.export_column.as_ref())
            .map(|column| match column {
                ExportColumn::Indexed(index) => index.to_string(),
                ExportColumn::Blank => String::new(),
            })
            .collect()
    }
}
