use crate::cli::output::{info, stdout_supports_color, warning};
use crate::cli::GlobalOptions;
use crate::core::config::{resolve_config, OutputConfig};
use crate::core::fields::project_fields;
use crate::core::{combine, loader};
use crate::report::{fields_format_warning, DiffBaseline, OutputFormat, RenderOptions};
use anyhow::Context;
use clap::Args;
use std::io::Write;

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Cost estimate JSON file; glob patterns are expanded (repeatable)
    #[arg(short = 'p', long = "path", value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<String>,

    /// Output format (table, json, html, diff)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Comma-separated table columns (price, monthlyQuantity, unit, hourlyCost, monthlyCost)
    #[arg(long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Show resources the estimator could not price
    #[arg(long)]
    pub show_skipped: bool,

    /// Metadata key used to group inputs
    #[arg(long, value_name = "KEY")]
    pub group_key: Option<String>,

    /// Heading for the grouping column
    #[arg(long, value_name = "LABEL")]
    pub group_label: Option<String>,

    /// Baseline for the diff format (past, first-group)
    #[arg(long, value_name = "BASELINE")]
    pub diff_baseline: Option<DiffBaseline>,
}

/// Everything a run needs once flags and config file are merged
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutput {
    pub format: OutputFormat,
    pub options: RenderOptions,
    pub fields_requested: bool,
    pub warnings: Vec<String>,
}

/// Merge command-line flags over config file values.
pub fn resolve(
    args: &OutputArgs,
    config: &OutputConfig,
    no_color: bool,
) -> anyhow::Result<ResolvedOutput> {
    let format = OutputFormat::from_name(args.format.as_deref().unwrap_or(&config.format));

    let requested: Option<Vec<String>> = args
        .fields
        .clone()
        .or_else(|| config.fields.clone())
        .map(|list| {
            list.into_iter()
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect()
        });
    let selection = project_fields(requested.as_deref());

    let diff_baseline = match args.diff_baseline {
        Some(baseline) => baseline,
        None => config
            .diff_baseline
            .parse()
            .map_err(|e: String| crate::CostfoldError::Config(e))?,
    };

    let options = RenderOptions {
        no_color: no_color || config.no_color,
        group_key: args.group_key.clone().unwrap_or_else(|| config.group_key.clone()),
        group_label: args
            .group_label
            .clone()
            .unwrap_or_else(|| config.group_label.clone()),
        fields: selection.fields,
        show_skipped: args.show_skipped || config.show_skipped,
        diff_baseline,
    };

    Ok(ResolvedOutput {
        format,
        options,
        fields_requested: requested.is_some(),
        warnings: selection.warnings.into_iter().map(|w| w.0).collect(),
    })
}

pub fn run(args: OutputArgs, global: &GlobalOptions) -> anyhow::Result<()> {
    let config = resolve_config(global.config.as_deref())?;
    let no_color = global.no_color || !stdout_supports_color();
    let resolved = resolve(&args, &config.output, no_color)?;

    for message in &resolved.warnings {
        warning(message);
    }

    let inputs = loader::load_inputs(&args.paths)?;
    info(
        global.verbose,
        &format!("Combining {} cost estimate file(s)", inputs.len()),
    );

    let report = combine(&inputs, &resolved.options);

    if let Some(w) = fields_format_warning(resolved.format, resolved.fields_requested) {
        warning(&w.to_string());
    }

    let rendered = resolved.format.render(&report, &resolved.options)?;

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(&rendered)
        .and_then(|_| handle.write_all(b"\n"))
        .and_then(|_| handle.flush())
        .context("Failed to write report to stdout")?;

    Ok(())
}
