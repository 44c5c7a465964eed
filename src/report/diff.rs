//! Cost difference view
//!
//! Two baselines are supported (see [`DiffBaseline`]): each project's past
//! breakdown, or the first group of the report. Resources are matched by name
//! within the compared sets; unmatched ones are additions or removals.

use crate::core::combine::{CombinedReport, ReportGroup};
use crate::core::cost::Cost;
use crate::core::document::{sum_present, Project, Resource};
use crate::report::format::Money;
use crate::report::{DiffBaseline, RenderOptions};
use anyhow::Result;
use colored::*;
use std::collections::{HashMap, VecDeque};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl ChangeKind {
    fn symbol(&self) -> &'static str {
        match self {
            ChangeKind::Added => "+",
            ChangeKind::Removed => "-",
            ChangeKind::Changed => "~",
            ChangeKind::Unchanged => " ",
        }
    }
}

/// Monthly cost movement of one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceChange {
    pub name: String,
    pub kind: ChangeKind,
    pub old: Option<Cost>,
    pub new: Option<Cost>,
}

impl ResourceChange {
    pub fn delta(&self) -> Cost {
        self.new.unwrap_or(Cost::ZERO) - self.old.unwrap_or(Cost::ZERO)
    }
}

/// Match `new` against `old` by resource name.
///
/// Changes come out in `new` order, followed by removals in `old` order.
/// Repeated names are paired up in order of appearance.
pub fn diff_resources(old: &[Resource], new: &[Resource]) -> Vec<ResourceChange> {
    let mut by_name: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (i, resource) in old.iter().enumerate() {
        by_name.entry(resource.name.as_str()).or_default().push_back(i);
    }
    let mut matched = vec![false; old.len()];
    let mut changes = Vec::with_capacity(new.len());

    for resource in new {
        let previous = by_name
            .get_mut(resource.name.as_str())
            .and_then(VecDeque::pop_front);
        let change = match previous {
            Some(i) => {
                matched[i] = true;
                let kind = if old[i].monthly_cost == resource.monthly_cost {
                    ChangeKind::Unchanged
                } else {
                    ChangeKind::Changed
                };
                ResourceChange {
                    name: resource.name.clone(),
                    kind,
                    old: old[i].monthly_cost,
                    new: resource.monthly_cost,
                }
            }
            None => ResourceChange {
                name: resource.name.clone(),
                kind: ChangeKind::Added,
                old: None,
                new: resource.monthly_cost,
            },
        };
        changes.push(change);
    }

    changes.extend(
        old.iter()
            .zip(matched)
            .filter(|(_, was_matched)| !was_matched)
            .map(|(resource, _)| ResourceChange {
                name: resource.name.clone(),
                kind: ChangeKind::Removed,
                old: resource.monthly_cost,
                new: None,
            }),
    );

    changes
}

/// Render the cost differences using the configured baseline.
pub fn render(report: &CombinedReport, options: &RenderOptions) -> Result<Vec<u8>> {
    let painter = Painter {
        plain: options.no_color,
    };
    let money = Money::new(&report.currency);
    let mut output = String::new();

    if report.projects().next().is_none() {
        writeln!(output, "No projects found in the combined report.")?;
    }

    match options.diff_baseline {
        DiffBaseline::Past => render_against_past(&mut output, report, &painter, &money)?,
        DiffBaseline::FirstGroup => render_against_first_group(&mut output, report, &painter, &money)?,
    }

    writeln!(output)?;
    writeln!(
        output,
        "{}",
        painter.dim("Key: ~ changed, + added, - removed")
    )?;

    Ok(output.into_bytes())
}

fn render_against_past(
    output: &mut String,
    report: &CombinedReport,
    painter: &Painter,
    money: &Money,
) -> Result<()> {
    let mut old_total: Option<Cost> = None;
    let mut new_total: Option<Cost> = None;

    for group in &report.groups {
        writeln!(output, "{}", painter.section(&format!("{}: {}", report.group_label, group.key)))?;
        writeln!(output)?;

        for project in &group.projects {
            let (changes, old, new) = project_changes(project);
            if !project.name.is_empty() {
                writeln!(output, "{} {}", painter.dim("Project:"), project.name)?;
            }
            write_changes(output, &changes, painter, money)?;
            writeln!(
                output,
                "Monthly cost change for {}: {}",
                if project.name.is_empty() { "project" } else { project.name.as_str() },
                movement(old, new, money)
            )?;
            writeln!(output)?;

            old_total = sum_present([old_total, old]);
            new_total = sum_present([new_total, new]);
        }
    }

    writeln!(
        output,
        "{} {}",
        painter.bold("Monthly cost change:"),
        painter.bold(&movement(old_total, new_total, money))
    )?;
    Ok(())
}

/// Changes for one project plus its old and new monthly totals
fn project_changes(project: &Project) -> (Vec<ResourceChange>, Option<Cost>, Option<Cost>) {
    match (&project.past_breakdown, &project.diff) {
        (Some(past), _) => (
            diff_resources(&past.resources, project.resources()),
            past.monthly_cost(),
            project.monthly_cost(),
        ),
        (None, Some(precomputed)) => {
            // The estimator already diffed this project; its resource costs are deltas.
            let changes = precomputed
                .resources
                .iter()
                .map(|r| ResourceChange {
                    name: r.name.clone(),
                    kind: ChangeKind::Changed,
                    old: None,
                    new: r.monthly_cost,
                })
                .collect();
            let new = project.monthly_cost();
            let old = match (new, precomputed.monthly_cost()) {
                (Some(n), Some(d)) => Some(n - d),
                _ => None,
            };
            (changes, old, new)
        }
        (None, None) => (
            diff_resources(&[], project.resources()),
            Some(Cost::ZERO),
            project.monthly_cost(),
        ),
    }
}

fn render_against_first_group(
    output: &mut String,
    report: &CombinedReport,
    painter: &Painter,
    money: &Money,
) -> Result<()> {
    let Some((baseline, rest)) = report.groups.split_first() else {
        return Ok(());
    };

    if rest.is_empty() {
        writeln!(
            output,
            "Only one {} in the report ({}), nothing to compare against.",
            report.group_label.to_lowercase(),
            baseline.key
        )?;
        return Ok(());
    }

    let baseline_resources = group_resources(baseline);
    for group in rest {
        writeln!(
            output,
            "{}",
            painter.section(&format!(
                "{}: {} compared with {}",
                report.group_label, group.key, baseline.key
            ))
        )?;
        writeln!(output)?;

        let changes = diff_resources(&baseline_resources, &group_resources(group));
        write_changes(output, &changes, painter, money)?;
        writeln!(
            output,
            "{} {}",
            painter.bold("Monthly cost change:"),
            painter.bold(&movement(baseline.monthly_cost(), group.monthly_cost(), money))
        )?;
        writeln!(output)?;
    }
    Ok(())
}

fn group_resources(group: &ReportGroup) -> Vec<Resource> {
    group
        .projects
        .iter()
        .flat_map(|p| p.resources().iter().cloned())
        .collect()
}

fn write_changes(
    output: &mut String,
    changes: &[ResourceChange],
    painter: &Painter,
    money: &Money,
) -> Result<()> {
    let visible: Vec<&ResourceChange> = changes
        .iter()
        .filter(|c| c.kind != ChangeKind::Unchanged)
        .collect();

    if visible.is_empty() {
        writeln!(output, "  {}", painter.dim("No resource changes"))?;
        return Ok(());
    }

    for change in visible {
        let line = format!("{} {}", change.kind.symbol(), change.name);
        writeln!(output, "{}", painter.change(change.kind, &line))?;
        let detail = match (change.kind, change.old) {
            (ChangeKind::Changed, Some(_)) => format!(
                "  {} ({} → {})",
                money.delta(change.delta()),
                money.monthly(change.old),
                money.monthly(change.new)
            ),
            _ => format!("  {}", money.delta(change.delta())),
        };
        writeln!(output, "{}", detail)?;
    }
    writeln!(output)?;
    Ok(())
}

fn movement(old: Option<Cost>, new: Option<Cost>, money: &Money) -> String {
    let delta = new.unwrap_or(Cost::ZERO) - old.unwrap_or(Cost::ZERO);
    format!(
        "{} ({} → {})",
        money.delta(delta),
        money.monthly(Some(old.unwrap_or(Cost::ZERO))),
        money.monthly(Some(new.unwrap_or(Cost::ZERO)))
    )
}

struct Painter {
    plain: bool,
}

impl Painter {
    fn paint(&self, text: &str, f: impl Fn(&str) -> ColoredString) -> String {
        if self.plain {
            text.to_string()
        } else {
            f(text).to_string()
        }
    }

    fn section(&self, text: &str) -> String {
        self.paint(text, |t| t.bold().cyan())
    }

    fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    fn dim(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }

    fn change(&self, kind: ChangeKind, text: &str) -> String {
        match kind {
            ChangeKind::Added => self.paint(text, |t| t.green()),
            ChangeKind::Removed => self.paint(text, |t| t.red()),
            ChangeKind::Changed => self.paint(text, |t| t.yellow()),
            ChangeKind::Unchanged => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::combine::{combine, ReportInput, FILENAME_KEY};
    use crate::core::document::Document;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resource(name: &str, monthly: &str) -> Resource {
        serde_json::from_value(json!({"name": name, "monthlyCost": monthly})).unwrap()
    }

    fn input(file: &str, project: serde_json::Value) -> ReportInput {
        let doc: Document =
            serde_json::from_value(json!({"version": "0.1", "projects": [project]})).unwrap();
        ReportInput::new(doc).with_metadata(FILENAME_KEY, file)
    }

    fn render_with(inputs: &[ReportInput], baseline: DiffBaseline) -> String {
        let options = RenderOptions {
            no_color: true,
            diff_baseline: baseline,
            ..RenderOptions::default()
        };
        let report = combine(inputs, &options);
        String::from_utf8(render(&report, &options).unwrap()).unwrap()
    }

    #[test]
    fn test_diff_resources_classifies_changes() {
        let old = vec![resource("a", "10"), resource("b", "5"), resource("c", "1")];
        let new = vec![resource("b", "7"), resource("a", "10"), resource("d", "2")];
        let changes = diff_resources(&old, &new);

        let summary: Vec<(&str, ChangeKind)> =
            changes.iter().map(|c| (c.name.as_str(), c.kind)).collect();
        assert_eq!(
            summary,
            vec![
                ("b", ChangeKind::Changed),
                ("a", ChangeKind::Unchanged),
                ("d", ChangeKind::Added),
                ("c", ChangeKind::Removed),
            ]
        );
        assert_eq!(changes[0].delta().to_string(), "2");
        assert_eq!(changes[3].delta().to_string(), "-1");
    }

    #[test]
    fn test_diff_resources_pairs_duplicate_names_in_order() {
        let old = vec![resource("x", "1"), resource("x", "2")];
        let new = vec![resource("x", "1")];
        let changes = diff_resources(&old, &new);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].kind, ChangeKind::Unchanged);
        assert_eq!(changes[1].kind, ChangeKind::Removed);
        assert_eq!(changes[1].old.unwrap().to_string(), "2");
    }

    #[test]
    fn test_past_baseline() {
        let text = render_with(
            &[input(
                "plan.json",
                json!({
                    "name": "prod",
                    "pastBreakdown": {"resources": [
                        {"name": "aws_instance.web", "monthlyCost": "20"},
                        {"name": "aws_eip.old", "monthlyCost": "3.6"}
                    ], "totalMonthlyCost": "23.6"},
                    "breakdown": {"resources": [
                        {"name": "aws_instance.web", "monthlyCost": "30"},
                        {"name": "aws_nat_gateway.main", "monthlyCost": "32.85"}
                    ], "totalMonthlyCost": "62.85"}
                }),
            )],
            DiffBaseline::Past,
        );

        assert!(text.contains("~ aws_instance.web"));
        assert!(text.contains("+$10.00 ($20.00 → $30.00)"));
        assert!(text.contains("+ aws_nat_gateway.main"));
        assert!(text.contains("- aws_eip.old"));
        assert!(text.contains("Monthly cost change: +$39.25 ($23.60 → $62.85)"));
    }

    #[test]
    fn test_no_past_breakdown_counts_everything_as_added() {
        let text = render_with(
            &[input(
                "new.json",
                json!({"name": "p", "breakdown": {"resources": [
                    {"name": "aws_instance.a", "monthlyCost": "10"}
                ]}}),
            )],
            DiffBaseline::Past,
        );
        assert!(text.contains("+ aws_instance.a"));
        assert!(text.contains("Monthly cost change: +$10.00 ($0.00 → $10.00)"));
    }

    #[test]
    fn test_precomputed_diff_is_used_without_past() {
        let text = render_with(
            &[input(
                "d.json",
                json!({
                    "name": "p",
                    "breakdown": {"resources": [{"name": "aws_instance.a", "monthlyCost": "15"}]},
                    "diff": {"resources": [{"name": "aws_instance.a", "monthlyCost": "5"}]}
                }),
            )],
            DiffBaseline::Past,
        );
        assert!(text.contains("~ aws_instance.a"));
        assert!(text.contains("Monthly cost change: +$5.00 ($10.00 → $15.00)"));
    }

    #[test]
    fn test_first_group_baseline() {
        let project = |cost: &str| {
            json!({"name": "p", "breakdown": {"resources": [
                {"name": "aws_instance.web", "monthlyCost": cost}
            ]}})
        };
        let text = render_with(
            &[
                input("staging.json", project("10")),
                input("prod.json", project("20")),
            ],
            DiffBaseline::FirstGroup,
        );
        assert!(text.contains("File: prod.json compared with staging.json"));
        assert!(text.contains("+$10.00 ($10.00 → $20.00)"));
        assert!(!text.contains("File: staging.json compared"));
    }

    #[test]
    fn test_first_group_with_single_group() {
        let text = render_with(
            &[input("only.json", json!({"name": "p"}))],
            DiffBaseline::FirstGroup,
        );
        assert!(text.contains("nothing to compare against"));
    }

    #[test]
    fn test_empty_report() {
        let text = render_with(&[], DiffBaseline::Past);
        assert!(text.contains("No projects found"));
        assert!(text.contains("Monthly cost change: +$0.00 ($0.00 → $0.00)"));
    }
}
