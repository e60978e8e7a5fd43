//! Command-line argument definitions for the PC-Wetterstation processor
//!
//! This module defines the CLI interface using the clap derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the PC-Wetterstation processor
///
/// Converts, inspects and merges the monthly CSV interchange files used to
/// exchange weather-station data with the PC-Wetterstation software.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pcws-processor",
    version,
    about = "Inspect and merge PC-Wetterstation CSV interchange files",
    long_about = "A tool for working with the monthly CSV interchange files of the \
                  PC-Wetterstation software: inspect a file's station metadata and \
                  sensor layout, merge two files of the same station, and list the \
                  interchange files in a data folder."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a JSON station profile describing the sensor catalog
    ///
    /// If not specified, the built-in TE923 station profile is used.
    #[arg(long = "catalog", value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable verbose (debug-level) logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Available subcommands for the PC-Wetterstation processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Inspect an interchange file and report its station metadata
    Inspect(InspectArgs),
    /// Merge two interchange files of the same station into monthly files
    Merge(MergeArgs),
    /// List the interchange data files in a folder
    List(ListArgs),
}

/// Arguments for the inspect command
#[derive(Debug, Clone, Parser)]
pub struct InspectArgs {
    /// Interchange file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Arguments for the merge command
#[derive(Debug, Clone, Parser)]
pub struct MergeArgs {
    /// First input file; its station identity and calibration factor win
    #[arg(value_name = "FILE_A")]
    pub file_a: PathBuf,

    /// Second input file
    #[arg(value_name = "FILE_B")]
    pub file_b: PathBuf,

    /// Output folder for the merged monthly files
    #[arg(short = 'o', long = "output", value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

/// Arguments for the list command
#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
    /// Folder to search for interchange data files
    #[arg(value_name = "DIR", default_value = ".")]
    pub folder: PathBuf,
}
