//! Flurry CLI - Headless driver for Flurry particle scenes

mod commands;
mod presets;
mod surface;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{presets as presets_cmd, run};

#[derive(Parser)]
#[command(name = "flurry")]
#[command(about = "Run 2D particle effect scenes headlessly", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scene for a number of frames
    Run {
        /// Path to a scene file
        #[arg(long, conflicts_with = "preset")]
        scene: Option<String>,

        /// Built-in preset to run when no scene file is given
        #[arg(long, default_value = "snow")]
        preset: String,

        /// Number of frames to simulate
        #[arg(long, default_value = "600")]
        frames: u64,

        /// Seed for reproducible runs (overrides the scene's seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Surface width, overriding the scene's [surface] table
        #[arg(long)]
        width: Option<f64>,

        /// Surface height, overriding the scene's [surface] table
        #[arg(long)]
        height: Option<f64>,

        /// Character columns used by --show
        #[arg(long, default_value = "80")]
        cols: usize,

        /// Character rows used by --show
        #[arg(long, default_value = "30")]
        rows: usize,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Print the final frame as a character grid
        #[arg(long)]
        show: bool,

        /// Pace frames at the clock's nominal rate instead of running flat out
        #[arg(long)]
        realtime: bool,
    },

    /// List built-in presets
    Presets,
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Run {
            scene,
            preset,
            frames,
            seed,
            width,
            height,
            cols,
            rows,
            format,
            show,
            realtime,
        } => run::run(run::RunArgs {
            scene,
            preset,
            frames,
            seed,
            width,
            height,
            cols,
            rows,
            format,
            show,
            realtime,
        }),
        Commands::Presets => presets_cmd::run(),
    }
}
