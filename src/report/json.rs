use crate::core::combine::CombinedReport;
use crate::report::RenderOptions;
use anyhow::Result;

/// Render the combined report as a single cost estimate document.
///
/// The output has the same shape as the inputs, so it can be passed back in
/// with `--path`. Amounts are written as decimal strings exactly as read.
pub fn render(report: &CombinedReport, _options: &RenderOptions) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(&report.to_document())?)
}
