use crate::core::combine::{CombinedReport, FILENAME_KEY};
use crate::core::fields::{Field, Warning};
use crate::CostfoldError;
use std::fmt;
use std::str::FromStr;

pub mod diff;
pub mod format;
pub mod html;
pub mod json;
pub mod table;

/// Output formats for a combined report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Html,
    Diff,
}

impl OutputFormat {
    /// Look up a format by name, falling back to `Table` for anything unknown.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown output format '{}', using table", name);
            OutputFormat::Table
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Html => "html",
            OutputFormat::Diff => "diff",
        }
    }

    /// Render `report` in this format.
    pub fn render(
        &self,
        report: &CombinedReport,
        options: &RenderOptions,
    ) -> Result<Vec<u8>, CostfoldError> {
        let rendered = match self {
            OutputFormat::Table => table::render(report, options),
            OutputFormat::Json => json::render(report, options),
            OutputFormat::Html => html::render(report, options),
            OutputFormat::Diff => diff::render(report, options),
        };

        rendered.map_err(|e| CostfoldError::Render {
            format: self.name(),
            message: format!("{:#}", e),
        })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            "diff" => Ok(OutputFormat::Diff),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// What the diff view compares against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiffBaseline {
    /// Each project's past breakdown, as recorded by the estimator
    #[default]
    Past,
    /// The first group in the report
    FirstGroup,
}

impl FromStr for DiffBaseline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "past" => Ok(DiffBaseline::Past),
            "first-group" | "first" => Ok(DiffBaseline::FirstGroup),
            _ => Err(format!("Unknown diff baseline: {} (expected past or first-group)", s)),
        }
    }
}

/// Settings for one render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub no_color: bool,
    pub group_key: String,
    pub group_label: String,
    pub fields: Vec<Field>,
    pub show_skipped: bool,
    pub diff_baseline: DiffBaseline,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            no_color: false,
            group_key: FILENAME_KEY.to_string(),
            group_label: "File".to_string(),
            fields: Field::defaults(),
            show_skipped: false,
            diff_baseline: DiffBaseline::Past,
        }
    }
}

/// Fields only drive the table layout; say so when they were asked for elsewhere.
pub fn fields_format_warning(format: OutputFormat, fields_requested: bool) -> Option<Warning> {
    (fields_requested && format != OutputFormat::Table).then(|| {
        Warning("fields is only supported for table output format".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::combine::{combine, ReportInput};
    use crate::core::document::Document;
    use test_case::test_case;

    #[test_case("table", OutputFormat::Table)]
    #[test_case("JSON", OutputFormat::Json)]
    #[test_case("html", OutputFormat::Html)]
    #[test_case(" diff ", OutputFormat::Diff)]
    #[test_case("csv", OutputFormat::Table ; "unknown falls back to table")]
    #[test_case("", OutputFormat::Table ; "empty falls back to table")]
    fn test_from_name(name: &str, expected: OutputFormat) {
        assert_eq!(OutputFormat::from_name(name), expected);
    }

    #[test]
    fn test_fields_warning_only_for_non_table() {
        assert!(fields_format_warning(OutputFormat::Table, true).is_none());
        assert!(fields_format_warning(OutputFormat::Json, false).is_none());
        assert!(fields_format_warning(OutputFormat::Html, true).is_some());
    }

    #[test]
    fn test_diff_baseline_parse() {
        assert_eq!("past".parse::<DiffBaseline>(), Ok(DiffBaseline::Past));
        assert_eq!("first-group".parse::<DiffBaseline>(), Ok(DiffBaseline::FirstGroup));
        assert!("median".parse::<DiffBaseline>().is_err());
    }

    #[test]
    fn test_every_format_accepts_empty_report() {
        let options = RenderOptions::default();
        let report = combine(&[], &options);
        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::Html,
            OutputFormat::Diff,
        ] {
            let bytes = format.render(&report, &options).unwrap();
            assert!(!bytes.is_empty(), "{} produced nothing", format);
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let doc: Document = serde_json::from_str(
            r#"{"version": "0.1", "projects": [{"name": "p", "breakdown": {"resources": [
                {"name": "aws_instance.web", "monthlyCost": "12.5", "costComponents": [
                    {"name": "Instance usage", "unit": "hours", "monthlyQuantity": "730", "price": "0.0171", "monthlyCost": "12.5"}
                ]}
            ]}}]}"#,
        )
        .unwrap();
        let inputs = vec![ReportInput::new(doc).with_metadata(FILENAME_KEY, "a.json")];
        let options = RenderOptions {
            no_color: true,
            ..RenderOptions::default()
        };
        let report = combine(&inputs, &options);

        for format in [
            OutputFormat::Table,
            OutputFormat::Json,
            OutputFormat::Html,
            OutputFormat::Diff,
        ] {
            let first = format.render(&report, &options).unwrap();
            let second = format.render(&report, &options).unwrap();
            assert_eq!(first, second, "{} output changed between runs", format);
        }
    }
}
