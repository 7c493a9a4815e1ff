use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "minutary")]
#[command(about = "Meeting minutes from caption files", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Generate meeting minutes from a Teams VTT caption file
    Generate(GenerateCliArgs),
    /// Inspect the configuration
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug)]
pub struct GenerateCliArgs {
    /// Path to the .vtt caption file
    pub file: PathBuf,
    /// Meeting duration in seconds, shown in the minutes header
    #[arg(long, default_value = "0")]
    pub duration_seconds: f64,
    /// Override the configured completion model
    #[arg(long)]
    pub model: Option<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the current configuration and where it was loaded from
    Show,
}
