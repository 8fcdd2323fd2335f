//! redcap-cube CLI - compile REDCap exports into RDF Data Cubes.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Create { inputs, output } => commands::create::run(inputs.into(), output),
        Commands::Check { inputs, json } => commands::check::run(inputs.into(), json),
        Commands::Query { inputs, sparql } => commands::query::run(inputs.into(), sparql),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
