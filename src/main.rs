use clap::Parser;
use colored::Colorize;
use pcws_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::run(args).map_err(anyhow::Error::from) {
        // Error occurred - print the chain to stderr and exit with error code
        eprintln!("{}", format!("Error: {error:#}").red());
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("PC-Wetterstation Processor - Weather Data Interchange Tool");
    println!("==========================================================");
    println!();
    println!("Inspect and merge the monthly CSV interchange files used to exchange");
    println!("weather-station data with the PC-Wetterstation software.");
    println!();
    println!("USAGE:");
    println!("    pcws-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    inspect     Report an interchange file's station metadata and sensors");
    println!("    merge       Merge two interchange files of the same station");
    println!("    list        List the interchange data files in a folder");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Inspect a monthly file:");
    println!("    pcws-processor inspect data/EXP01_26.csv");
    println!();
    println!("    # Merge two files into a data folder:");
    println!("    pcws-processor merge EXP01_26.csv backup/EXP01_26.csv --output data/");
    println!();
    println!("    # Use a custom station profile:");
    println!("    pcws-processor inspect --catalog profile.json data/EXP01_26.csv");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pcws-processor <COMMAND> --help");
}
