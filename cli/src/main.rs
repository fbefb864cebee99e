use std::path::PathBuf;
use std::process::ExitCode;

use chronicle_cli::{commands, logging};
use chronicle_core::{AppConfig, AppConfigExt};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about = "Merge, parse and summarize combat logs")]
struct Cli {
    /// Debug logging for chronicle crates
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this TOML file instead of the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interleave the add-on log and the client log into one ordered log
    Merge {
        a: PathBuf,
        b: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep only CAST lines that carry GUIDs
        #[arg(long)]
        only_raw_casts: bool,
    },
    /// Parse one log, or two logs merged on the fly, and print fight summaries
    Parse {
        a: PathBuf,
        b: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Decode a unit GUID
    Guid { value: String },
    /// Show the active configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = match &cli.config {
        Some(path) => match AppConfig::load_from_path(path) {
            Ok(config) => config,
            Err(error) => {
                tracing::error!(error = %error, "Invalid configuration");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::load(),
    };

    let result = match &cli.command {
        Commands::Merge {
            a,
            b,
            output,
            only_raw_casts,
        } => commands::merge(a, b, output.as_deref(), *only_raw_casts, &config),
        Commands::Parse { a, b, json } => commands::parse(a, b.as_deref(), *json, &config),
        Commands::Guid { value } => commands::guid(value),
        Commands::Config => commands::show_config(&config, cli.config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
