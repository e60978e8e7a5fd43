//! Test utilities and fixtures for codec testing

use crate::app::models::{
    CanonicalRecord, ExportColumn, SensorCatalog, SensorDescriptor, SensorKey, StationInfo,
};


/// Station identity used across codec tests
pub fn test_station() -> StationInfo {
    StationInfo::new("ERL", 300, "TE923")
}

/// Compact four-column catalog (date, time, one temperature, rain), keeping
/// file fixtures readable
pub fn compact_catalog() -> SensorCatalog {
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
        SensorDescriptor::new(
            SensorKey::RainCounter,
            Some(1),
            Some(ExportColumn::Indexed(34)),
            "Regen",
            "mm",
        ),
    ])
    .expect("test catalog is valid")
}

/// Build a record for the compact catalog
pub fn record(date: &str, time: &str, temp: &str, rain: &str) -> CanonicalRecord {
    CanonicalRecord::from_pairs(vec![
        (SensorKey::Date, date.to_string()),
        (SensorKey::Time, time.to_string()),
        (SensorKey::Temp1, temp.to_string()),
        (SensorKey::RainCounter, rain.to_string()),
    ])
}

/// A complete, valid single-month file body for the compact catalog
pub fn sample_file_content() -> String {
    [
        "Datum,Zeit,Temp. A. 1,Regen",
        ",,\u{b0}C,mm",
        "#Calibrate=1.000 #Regen0=0mm #Location=ERL/300m #Station=TE923",
        ",,2,34",
        "01.01.2020,10:00,21.5,0.5",
        "01.01.2020,10:10,21.7,0",
        "",
    ]
    .join("\r\n")
}
