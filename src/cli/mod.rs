pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "costfold",
    version,
    about = "Combine cloud cost estimate files into one report",
    long_about = "Costfold merges cost estimate JSON documents produced for several projects or \
                  files, groups them by a metadata key, and renders the result as a table, JSON, \
                  HTML, or a cost diff."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file with output defaults
    #[arg(long, value_name = "FILE", env = "COSTFOLD_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Combine cost estimate files and render them
    Output(commands::output::OutputArgs),

    /// Deprecated alias for `output`
    #[command(hide = true)]
    Report(commands::report::ReportArgs),
}

/// Settings shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub no_color: bool,
    pub verbose: u8,
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn global_options(&self) -> GlobalOptions {
        GlobalOptions {
            no_color: self.no_color,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_output_requires_path() {
        let result = Cli::try_parse_from(["costfold", "output"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "costfold",
            "output",
            "--path",
            "a.json",
            "--no-color",
            "-vv",
        ])
        .unwrap();
        assert!(cli.no_color);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_report_alias_takes_positional_files() {
        let cli = Cli::try_parse_from(["costfold", "report", "a.json", "b.json", "-o", "json"])
            .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.files, vec!["a.json", "b.json"]);
                assert_eq!(args.output.as_deref(), Some("json"));
            }
            _ => panic!("expected report command"),
        }
    }
}
