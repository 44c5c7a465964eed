use clap::Parser;
use colored::*;
use costfold::cli::{Cli, Commands};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // --log-level wins over COSTFOLD_LOG; logs share stderr with warnings
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("COSTFOLD_LOG").ok())
        .unwrap_or_else(|| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<costfold::CostfoldError>() {
            Some(costfold::CostfoldError::Config(_)) => 2,
            Some(costfold::CostfoldError::Io(_)) => 3,
            Some(costfold::CostfoldError::Parse { .. })
            | Some(costfold::CostfoldError::UnsupportedVersion { .. }) => 4,
            Some(costfold::CostfoldError::Render { .. }) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let global = cli.global_options();

    match cli.command {
        Commands::Output(args) => costfold::cli::commands::output::run(args, &global),
        Commands::Report(args) => costfold::cli::commands::report::run(args, &global),
    }
}
