mod cmd;
mod listener;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::output::OutputFormat;

/// gantry - target-graph build runner
#[derive(Parser)]
#[command(name = "gantry")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the project file
  #[arg(short, long, global = true, default_value = "gantry.toml")]
  file: PathBuf,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute targets (the project default when none are named)
  Run {
    /// Targets to execute
    targets: Vec<String>,

    /// Property defines, KEY=VALUE; they win over properties set by tasks
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    defines: Vec<String>,

    /// Continue with later targets after a failure
    #[arg(short, long)]
    keep_going: bool,

    /// Abandon the build when it runs longer than this (e.g. "30s")
    #[arg(long, value_name = "DURATION")]
    timeout: Option<humantime::Duration>,
  },

  /// Show the execution order without running anything
  Plan {
    /// Targets to resolve (the project default when none are named)
    targets: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// List targets with descriptions and dependencies
  List {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::from_default_env()
  };
  tracing_subscriber::fmt().with_env_filter(filter).without_time().init();

  let ok = match cli.command {
    Commands::Run {
      targets,
      defines,
      keep_going,
      timeout,
    } => cmd::cmd_run(
      &cli.file,
      &targets,
      &defines,
      keep_going,
      timeout.map(Into::into),
      cli.verbose,
    )?,
    Commands::Plan { targets, format } => cmd::cmd_plan(&cli.file, &targets, format)?,
    Commands::List { format } => {
      cmd::cmd_list(&cli.file, format)?;
      true
    }
  };

  if !ok {
    std::process::exit(1);
  }
  Ok(())
}
