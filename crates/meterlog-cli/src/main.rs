//! meterlog CLI
//!
//! Command-line interface for meterlog - water and gas meter readings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use meterlog_core::{Category, Config, JsonFileStore, Ledger};

mod commands;
mod logging;
mod output;
mod prompt;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "meterlog")]
#[command(about = "meterlog - Local log of water and gas meter readings")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// Record a meter reading
    Add {
        /// Utility: water (agua) or gas
        category: Category,
        /// Meter index in m³
        #[arg(allow_hyphen_values = true)]
        value: String,
        /// Reading date (defaults to today, YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show reading history with consumption
    #[command(alias = "ls")]
    History,
    /// Delete all readings
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Export readings
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Show store location and reading counts
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ExportCommands {
    /// Write readings as CSV
    Csv {
        /// Output file ('-' for stdout, defaults to csv_file_name in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a printable HTML document and open it for printing
    #[command(alias = "pdf")]
    Print {
        /// Output file (defaults to print_file_name in the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only write the document, don't open it
        #[arg(long)]
        no_open: bool,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, csv_file_name, print_file_name, csv_quoting, open_printable, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let result = run(cli, &output);
    if let Err(e) = &result {
        if let Some(hint) = output::recovery_hint(e) {
            eprintln!("Hint: {}", hint);
        }
    }
    result
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    let config_path = cli.config.as_ref();

    // Config commands work even when the config file is broken
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);

    let mut ledger = Ledger::new(JsonFileStore::from_config(&config));

    match cli.command {
        None | Some(Commands::Tui) => tui::run(&config, &mut ledger),
        Some(Commands::Add {
            category,
            value,
            date,
        }) => commands::reading::add(&mut ledger, category, value, date, output),
        Some(Commands::History) => commands::reading::history(&ledger, output),
        Some(Commands::Clear { yes }) => commands::reading::clear(&mut ledger, yes, output),
        Some(Commands::Export { command }) => {
            handle_export_command(command, &config, &ledger, output)
        }
        Some(Commands::Status) => commands::status::show(&config, &ledger, output),
        Some(Commands::Config { .. }) => unreachable!(), // Handled above
    }
}

fn handle_export_command(
    command: ExportCommands,
    config: &Config,
    ledger: &Ledger<JsonFileStore>,
    output: &Output,
) -> Result<()> {
    match command {
        ExportCommands::Csv { output: path } => commands::export::csv(config, ledger, path, output),
        ExportCommands::Print {
            output: path,
            no_open,
        } => commands::export::print(config, ledger, path, !no_open, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
