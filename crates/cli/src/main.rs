mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use partwright_lib::{ProjectContext, Step};

use crate::output::{OutputFormat, print_error};

/// Build a package out of independently described parts
#[derive(Parser)]
#[command(name = "partwright")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Project directory (default: $PARTWRIGHT_PROJECT_DIR, then the current directory)
  #[arg(short = 'C', long = "directory", global = true)]
  directory: Option<PathBuf>,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short = 'o', long, global = true, value_enum, default_value = "text")]
  output: OutputFormat,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Fetch the sources of parts
  Pull {
    /// Parts to pull (default: all)
    parts: Vec<String>,
  },

  /// Build parts, pulling them first if needed
  Build {
    /// Parts to build (default: all)
    parts: Vec<String>,
  },

  /// Copy built parts into the shared stage tree
  Stage {
    /// Parts to stage (default: all)
    parts: Vec<String>,
  },

  /// Copy staged content into the final prime tree
  Prime {
    /// Parts to prime (default: all)
    parts: Vec<String>,
  },

  /// Remove the working directories of parts
  Clean {
    /// Parts to clean (default: all, including the stage and prime trees)
    parts: Vec<String>,
  },

  /// Show how far each part has progressed
  Status,

  /// Print the environment for the primed tree, or a part's build environment
  Env {
    /// Print the build environment of this part instead
    #[arg(long)]
    part: Option<String>,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  match run(cli) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}

fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    let level = if verbose { "debug" } else { "info" };
    EnvFilter::new(format!("partwright_lib={level},partwright_cli={level}"))
  });

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(verbose)
    .without_time()
    .init();
}

fn run(cli: Cli) -> Result<()> {
  let context = ProjectContext::discover(cli.directory.as_deref())?;

  match cli.command {
    Commands::Pull { parts } => cmd::cmd_run(context, Step::Pull, &parts, cli.output),
    Commands::Build { parts } => cmd::cmd_run(context, Step::Build, &parts, cli.output),
    Commands::Stage { parts } => cmd::cmd_run(context, Step::Stage, &parts, cli.output),
    Commands::Prime { parts } => cmd::cmd_run(context, Step::Prime, &parts, cli.output),
    Commands::Clean { parts } => cmd::cmd_clean(context, &parts, cli.output),
    Commands::Status => cmd::cmd_status(context, cli.verbose, cli.output),
    Commands::Env { part } => cmd::cmd_env(context, part.as_deref(), cli.output),
  }
}
