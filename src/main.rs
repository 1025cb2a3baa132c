use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod convert;
mod util;

#[derive(Parser)]
#[command(version, about = "Convert Jupyter notebooks into markdown blog articles")]
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    /// The command to execute
    #[command(subcommand)]
    command: NbpostCommand,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
struct InitArgs {
    /// The directory to write the configuration file to
    path: PathBuf,

    /// Whether to create the directory if it doesn't exist
    #[arg(short, long, default_value = "false")]
    create: bool,
}

#[derive(Parser)]
struct ConvertArgs {
    /// The notebooks to convert
    #[arg(required = true)]
    notebooks: Vec<PathBuf>,

    /// The path to the configuration file (defaults to nbpost.yaml if present)
    #[arg(short, long)]
    config_file: Option<PathBuf>,

    /// Directory to write converted files to (defaults to each notebook's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Export format, overriding the configuration (markdown, notebook)
    #[arg(long)]
    to: Option<String>,

    /// Print the converted document to stdout instead of writing files
    #[arg(long, default_value = "false")]
    stdout: bool,
}

#[derive(Subcommand)]
enum NbpostCommand {
    /// Write a default nbpost.yaml configuration file
    Init(InitArgs),

    /// Convert notebooks to articles
    Convert(ConvertArgs),
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_tracing(args.verbose, args.log_format);

    match args.command {
        NbpostCommand::Init(args) => {
            commands::init::run(&args).await?;
        }
        NbpostCommand::Convert(args) => {
            commands::convert::run(&args).await?;
        }
    }

    Ok(())
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so `convert --stdout` output stays clean. `RUST_LOG`
/// takes precedence over the verbosity flag.
fn init_tracing(verbose: u8, format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match verbose {
        0 => "nbpost=info",
        1 => "nbpost=debug",
        _ => "nbpost=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
