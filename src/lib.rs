//! PC-Wetterstation Processor Library
//!
//! A Rust library for exchanging weather-station sensor readings with the
//! PC-Wetterstation logging software via its monthly CSV interchange files.
//!
//! This library provides tools for:
//! - Converting raw station samples (metric units, absolute rain counter,
//!   epoch timestamps) into interchange-compatible records
//! - Writing interchange files with the three-line header, sensor-index line
//!   and Latin-1/CRLF framing the consumer expects, one file per month
//! - Parsing interchange files back into records plus station metadata
//! - Merging two files of the same station with timestamp deduplication
//! - Comprehensive error handling with per-file context

pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod converter;
        pub mod csv_codec;
        pub mod merger;
    }
    pub mod adapters {
        pub mod filesystem;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    CanonicalRecord, FileMetadata, RawSample, RawValue, SensorCatalog, SensorDescriptor,
    SensorKey, StationInfo,
};

/// Result type alias for the PC-Wetterstation processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for interchange-file processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Catalog lookup miss, or a record missing a catalogued sensor
    #[error("unknown sensor '{key}'")]
    UnknownSensor { key: String },

    /// Conversion was called with zero samples
    #[error("no samples to convert")]
    EmptyInput,

    /// A monthly partition unexpectedly spans more than one month
    #[error("records span more than one month: {first} vs {second}")]
    MixedMonth { first: String, second: String },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Parsed file violates the interchange header/column-mapping shape
    #[error("file '{file}' is not a compatible interchange file: {reason}")]
    MalformedFormat { file: String, reason: String },

    /// Merge precondition violated: the two files are from different stations
    #[error("files are not from the same station: {field} differs")]
    IncompatibleStations { field: String },

    /// Date/time parsing error
    #[error("date/time parsing error: {message}")]
    DateTimeParsing {
        message: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Configuration error (invalid catalog or station profile)
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Create an unknown-sensor error
    pub fn unknown_sensor(key: impl Into<String>) -> Self {
        Self::UnknownSensor { key: key.into() }
    }

    /// Create a mixed-month error from the two offending (month, year) pairs
    pub fn mixed_month(first: (u32, i32), second: (u32, i32)) -> Self {
        Self::MixedMonth {
            first: format!("{:02}/{}", first.0, first.1),
            second: format!("{:02}/{}", second.0, second.1),
        }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
        }
    }

    /// Create a malformed-format error with file context
    pub fn malformed_format(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedFormat {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create an incompatible-stations error naming the differing field
    pub fn incompatible_stations(field: impl Into<String>) -> Self {
        Self::IncompatibleStations {
            field: field.into(),
        }
    }

    /// Create a date/time parsing error
    pub fn datetime_parsing(message: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::Io {
            message: "CSV processing failed".to_string(),
            source: std::io::Error::other(error),
        }
    }
}

impl From<chrono::ParseError> for Error {
    fn from(error: chrono::ParseError) -> Self {
        Self::DateTimeParsing {
            message: "date/time parsing failed".to_string(),
            source: error,
        }
    }
}
