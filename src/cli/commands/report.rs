use crate::cli::commands::output::{self, OutputArgs};
use crate::cli::output::deprecated;
use crate::cli::GlobalOptions;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Cost estimate JSON files
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<String>,

    /// Output format (table, json, html, diff)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Older spelling of --format
    #[arg(short = 'o', long = "output", value_name = "FORMAT", hide = true)]
    pub output: Option<String>,

    /// Comma-separated table columns (price, monthlyQuantity, unit, hourlyCost, monthlyCost)
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Show resources the estimator could not price
    #[arg(long)]
    pub show_skipped: bool,
}

impl From<ReportArgs> for OutputArgs {
    fn from(args: ReportArgs) -> Self {
        OutputArgs {
            paths: args.files,
            format: args.format.or(args.output),
            fields: args.fields,
            show_skipped: args.show_skipped,
            group_key: None,
            group_label: None,
            diff_baseline: None,
        }
    }
}

pub fn run(args: ReportArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    deprecated("costfold report", "costfold output --path");
    output::run(args.into(), global)
}
