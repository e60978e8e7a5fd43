//! Filesystem adapter for interchange data files
//!
//! The interchange format predates Unicode: files are encoded in a
//! single-byte legacy charset (Latin-1) with CRLF line endings. This module
//! hosts the byte-level read/write primitives plus discovery and cleanup of
//! interchange files in a data folder.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::DATA_FILE_TAG;
use crate::{Error, Result};

/// Read a file and decode it from Latin-1.
///
/// Latin-1 maps 1:1 onto the first 256 Unicode scalar values, so decoding
/// cannot fail.
pub fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| Error::io(format!("failed to read {}", path.display()), e))?;
    Ok(bytes.iter().map(|&b| b as char).collect())
}

/// Encode a string as Latin-1 and write it to a file.
///
/// Characters outside the Latin-1 range cannot be represented in the
/// interchange encoding and are rejected before anything is written.
pub fn write_latin1(path: &Path, content: &str) -> Result<()> {
    let bytes = encode_latin1(content)?;
    fs::write(path, bytes)
        .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))
}

/// Encode a string as Latin-1 bytes
pub fn encode_latin1(content: &str) -> Result<Vec<u8>> {
    content
        .chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                Ok(code as u8)
            } else {
                Err(Error::io_error(format!(
                    "character '{c}' is not representable in the Latin-1 file encoding"
                )))
            }
        })
        .collect()
}

/// Find all interchange data files in a folder.
///
/// A file counts as an interchange file if its name carries the format tag.
/// Names are returned sorted for deterministic output.
pub fn find_data_files(data_folder: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(data_folder)
        .map_err(|e| Error::io(format!("failed to list {}", data_folder.display()), e))?;

    let mut file_names = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| Error::io(format!("failed to list {}", data_folder.display()), e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.contains(DATA_FILE_TAG) {
            file_names.push(name);
        }
    }

    file_names.sort();
    debug!(
        "Found {} interchange files in {}",
        file_names.len(),
        data_folder.display()
    );
    Ok(file_names)
}

/// Delete the given interchange files from a folder
pub fn delete_data_files(data_folder: &Path, file_names: &[String]) -> Result<()> {
    for file_name in file_names {
        let path: PathBuf = data_folder.join(file_name);
        fs::remove_file(&path)
            .map_err(|e| Error::io(format!("failed to delete {}", path.display()), e))?;
    }
    Ok(())
}
