//! Application constants for the PC-Wetterstation processor
//!
//! This module contains the fixed interchange-format tags, date formats
//! and unit-conversion factors used throughout the application.

// =============================================================================
// Interchange File Naming
// =============================================================================

/// Three-letter tag prefixing every interchange data file (`EXP08_26.csv`)
pub const DATA_FILE_TAG: &str = "EXP";

/// File extension of interchange data files
pub const DATA_FILE_EXTENSION: &str = "csv";

// =============================================================================
// Date and Time Formats
// =============================================================================

/// Date format of the interchange format (`31.01.2026`)
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// Time format of the interchange format (`09:30`, station-local time)
pub const TIME_FORMAT: &str = "%H:%M";

/// Combined date/time format used for sorting and partitioning
pub const DATETIME_FORMAT: &str = "%d.%m.%Y %H:%M";

// =============================================================================
// Settings Line Tags
// =============================================================================

/// Settings-line tags as defined by the interchange format specification.
///
/// The third header line concatenates `#<tag>=<value>` segments, e.g.
/// `#Calibrate=1.000 #Regen0=0mm #Location=ERL/300m #Station=TE923`.
pub mod settings_tags {
    /// Rain sensor calibration factor (fixed 3-decimal format)
    pub const CALIBRATE: &str = "Calibrate";

    /// Rain counter baseline in millimeters (requires `mm` suffix)
    pub const RAIN_BASE: &str = "Regen0";

    /// Station name and height, separated by `/` (height requires `m` suffix)
    pub const LOCATION: &str = "Location";

    /// Station type / producer information string
    pub const STATION: &str = "Station";
}

// =============================================================================
// Unit Conversion Factors
// =============================================================================

/// Wind speed conversion from m/s (raw feed) to km/h (interchange format)
pub const MS_TO_KMH: f64 = 3.6;

/// Wind direction conversion from compass sector index (0..15) to degrees
pub const WIND_SECTOR_TO_DEGREES: f64 = 22.5;

/// Rain conversion from tipping bucket counts to millimeters
pub const BUCKET_COUNTS_TO_MM: f64 = 0.68685;
