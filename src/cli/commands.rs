//! Command implementations for the PC-Wetterstation processor CLI

use colored::Colorize;
use tracing::{debug, info};

use crate::app::adapters::filesystem;
use crate::app::models::SensorCatalog;
use crate::app::services::{csv_codec, merger};
use crate::cli::args::{Args, Commands, InspectArgs, ListArgs, MergeArgs};
use crate::Result;

/// Main command runner: set up logging, resolve the sensor catalog and
/// dispatch to the requested subcommand
pub fn run(args: Args) -> Result<()> {
    setup_logging(args.verbose);
    debug!("Command line arguments: {:?}", args);

    let catalog = match &args.catalog {
        Some(path) => SensorCatalog::from_profile(path)?,
        None => SensorCatalog::te923(),
    };

    match args.command {
        Some(Commands::Inspect(cmd)) => inspect(&cmd, &catalog),
        Some(Commands::Merge(cmd)) => merge(&cmd, &catalog),
        Some(Commands::List(cmd)) => list(&cmd),
        None => Ok(()), // handled by main
    }
}

/// Set up tracing with an env-filter; `--verbose` lowers the default level
fn setup_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

/// Read one interchange file and report its header metadata and record count
fn inspect(cmd: &InspectArgs, catalog: &SensorCatalog) -> Result<()> {
    let file = csv_codec::read(&cmd.file, catalog)?;
    let metadata = &file.metadata;

    println!("{}", cmd.file.display().to_string().bold());
    println!(
        "  Station:      {} ({}m, {})",
        metadata.station.name.green(),
        metadata.station.height,
        metadata.station.station_type
    );
    println!("  Calibration:  {:.3}", metadata.rain_calib_factor);
    println!("  Rain base:    {}mm", metadata.rain_counter_base);
    println!("  Records:      {}", file.records.len());

    if let (Some(first), Some(last)) = (file.records.first(), file.records.last()) {
        println!(
            "  Range:        {} {} .. {} {}",
            first.date()?,
            first.time()?,
            last.date()?,
            last.time()?
        );
    }

    println!("  Sensors:");
    for ((key, description), (_, unit)) in metadata
        .sensor_descriptions
        .iter()
        .zip(&metadata.sensor_units)
    {
        let unit_suffix = if unit.is_empty() {
            String::new()
        } else {
            format!(" [{unit}]")
        };
        println!("    {:<14} {}{}", key.to_string(), description, unit_suffix);
    }

    Ok(())
}

/// Merge two interchange files into monthly files in the output folder
fn merge(cmd: &MergeArgs, catalog: &SensorCatalog) -> Result<()> {
    let file_names = merger::merge(&cmd.output, &cmd.file_a, &cmd.file_b, catalog)?;
    info!("Merge wrote {} files", file_names.len());

    println!("{}", "Merged files:".bold());
    for file_name in &file_names {
        println!("  {}", cmd.output.join(file_name).display());
    }
    Ok(())
}

/// List interchange data files in a folder
fn list(cmd: &ListArgs) -> Result<()> {
    let file_names = filesystem::find_data_files(&cmd.folder)?;
    if file_names.is_empty() {
        println!("No interchange files in {}", cmd.folder.display());
        return Ok(());
    }

    for file_name in &file_names {
        println!("{file_name}");
    }
    Ok(())
}
