// framelapse-cli/src/main.rs
//
// Entry point for the `framelapse` binary: parses arguments, sets up logging
// and dispatches to the subcommand. Errors are printed in red on stderr and
// the process exits with status 1.

use clap::Parser;
use console::style;
use framelapse_cli::commands::{delete, list, presets};
use framelapse_cli::{Cli, CliResult, Commands, logging, run_convert};
use log::debug;
use std::process;

fn run(cli: Cli) -> CliResult<()> {
    if let Some(path) = logging::init(cli.verbose, cli.log_dir.as_deref())? {
        debug!("Logging to {}", path.display());
    }
    debug!("Run started: {}", chrono::Local::now());

    match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::List(args) => list::run_list(args),
        Commands::Delete(args) => delete::run_delete(args),
        Commands::Presets(args) => presets::run_presets(args),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {e}", style("Error:").for_stderr().red().bold());
        process::exit(1);
    }
}
