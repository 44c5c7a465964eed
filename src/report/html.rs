//! Standalone HTML renderer for combined cost reports
//!
//! Everything the page needs is inlined so the file can be attached to a
//! ticket or opened offline. Every field is shown regardless of `--fields`.

use crate::core::combine::{CombinedReport, ReportGroup};
use crate::core::cost::Cost;
use crate::core::document::{Project, Resource};
use crate::core::fields::Field;
use crate::report::format::{format_quantity, Money};
use crate::report::RenderOptions;
use anyhow::Result;
use std::fmt::Write;

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f5f5f5;
        }
        .container {
            background-color: white;
            border-radius: 8px;
            padding: 30px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            border-bottom: 3px solid #3498db;
            padding-bottom: 10px;
            margin-bottom: 20px;
        }
        h2 {
            color: #34495e;
            margin-top: 30px;
            margin-bottom: 15px;
            border-left: 4px solid #3498db;
            padding-left: 10px;
        }
        h3 {
            color: #7f8c8d;
            font-weight: 500;
        }
        .metrics {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 15px;
            margin: 20px 0;
        }
        .metric {
            background-color: #f8f9fa;
            border-radius: 6px;
            padding: 15px;
            border-left: 4px solid #3498db;
        }
        .metric-label {
            font-size: 0.9em;
            color: #7f8c8d;
            margin-bottom: 5px;
        }
        .metric-value {
            font-size: 1.5em;
            font-weight: bold;
            color: #2c3e50;
        }
        table {
            width: 100%;
            border-collapse: collapse;
            margin: 15px 0;
            background-color: white;
        }
        th {
            background-color: #34495e;
            color: white;
            padding: 12px;
            text-align: left;
            font-weight: 600;
        }
        td {
            padding: 10px 12px;
            border-bottom: 1px solid #ecf0f1;
        }
        td.num {
            text-align: right;
            font-variant-numeric: tabular-nums;
        }
        tr.resource td:first-child {
            font-weight: 600;
        }
        tr.skipped td {
            color: #95a5a6;
            font-style: italic;
        }
        tr.total td {
            font-weight: bold;
            border-top: 2px solid #34495e;
        }
        .empty {
            color: #95a5a6;
            font-style: italic;
        }
"#;

/// Render the combined report as a self-contained HTML page.
pub fn render(report: &CombinedReport, _options: &RenderOptions) -> Result<Vec<u8>> {
    let money = Money::new(&report.currency);
    let mut html = String::new();

    writeln!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Cost Estimate Report</title>
    <style>{}    </style>
</head>
<body>
    <div class="container">
        <h1>Cost Estimate Report</h1>"#,
        STYLE
    )?;

    writeln!(html, r#"        <div class="metrics">"#)?;
    metric(
        &mut html,
        "Monthly cost",
        &money.monthly(Some(report.monthly_cost().unwrap_or(Cost::ZERO))),
    )?;
    metric(&mut html, &format!("{}s", report.group_label), &report.groups.len().to_string())?;
    metric(&mut html, "Resources", &report.resource_count().to_string())?;
    if report.summary.unsupported_resources > 0 {
        metric(
            &mut html,
            "Unsupported resources",
            &report.summary.unsupported_resources.to_string(),
        )?;
    }
    writeln!(html, "        </div>")?;

    if report.is_empty() {
        writeln!(html, r#"        <p class="empty">No projects found in the combined report.</p>"#)?;
    }

    for group in &report.groups {
        render_group(&mut html, report, group, &money)?;
    }

    if report.groups.len() > 1 {
        writeln!(html, "        <h2>Summary</h2>")?;
        writeln!(html, "        <table>")?;
        writeln!(
            html,
            "            <tr><th>{}</th><th>{}</th><th>{}</th></tr>",
            escape(&report.group_label),
            Field::HourlyCost.title(),
            Field::MonthlyCost.title()
        )?;
        for group in &report.groups {
            writeln!(
                html,
                r#"            <tr><td>{}</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
                escape(&group.key),
                escape(&money.hourly(group.hourly_cost())),
                escape(&money.monthly(group.monthly_cost()))
            )?;
        }
        writeln!(
            html,
            r#"            <tr class="total"><td>Overall total</td><td class="num">{}</td><td class="num">{}</td></tr>"#,
            escape(&money.hourly(report.hourly_cost())),
            escape(&money.monthly(report.monthly_cost()))
        )?;
        writeln!(html, "        </table>")?;
    }

    writeln!(html, "    </div>\n</body>\n</html>")?;
    Ok(html.into_bytes())
}

fn metric(html: &mut String, label: &str, value: &str) -> Result<()> {
    writeln!(
        html,
        r#"            <div class="metric"><div class="metric-label">{}</div><div class="metric-value">{}</div></div>"#,
        escape(label),
        escape(value)
    )?;
    Ok(())
}

fn render_group(
    html: &mut String,
    report: &CombinedReport,
    group: &ReportGroup,
    money: &Money,
) -> Result<()> {
    writeln!(
        html,
        "        <h2>{}: {}</h2>",
        escape(&report.group_label),
        escape(&group.key)
    )?;
    for project in &group.projects {
        render_project(html, project, money)?;
    }
    Ok(())
}

fn render_project(html: &mut String, project: &Project, money: &Money) -> Result<()> {
    if !project.name.is_empty() {
        writeln!(html, "        <h3>{}</h3>", escape(&project.name))?;
    }
    writeln!(html, "        <table>")?;
    write!(html, "            <tr><th>Name</th>")?;
    for field in Field::ALL {
        write!(html, "<th>{}</th>", field.title())?;
    }
    writeln!(html, "</tr>")?;

    for resource in project.resources() {
        render_resource(html, resource, 0, money)?;
    }

    write!(html, r#"            <tr class="total"><td>Project total</td>"#)?;
    for field in Field::ALL {
        let value = match field {
            Field::HourlyCost => money.hourly(project.hourly_cost()),
            Field::MonthlyCost => money.monthly(project.monthly_cost()),
            _ => String::new(),
        };
        write!(html, r#"<td class="num">{}</td>"#, escape(&value))?;
    }
    writeln!(html, "</tr>")?;
    writeln!(html, "        </table>")?;
    Ok(())
}

fn render_resource(html: &mut String, resource: &Resource, depth: usize, money: &Money) -> Result<()> {
    let class = if resource.is_skipped { "resource skipped" } else { "resource" };
    let name = match (resource.is_skipped, &resource.skip_reason) {
        (true, Some(reason)) => format!("{} (skipped: {})", resource.name, reason),
        (true, None) => format!("{} (skipped)", resource.name),
        _ => resource.name.clone(),
    };
    write!(
        html,
        r#"            <tr class="{}"><td style="padding-left: {}px">{}</td>"#,
        class,
        12 + depth * 20,
        escape(&name)
    )?;
    for field in Field::ALL {
        let value = match field {
            Field::HourlyCost => money.hourly(resource.hourly_cost),
            Field::MonthlyCost => money.monthly(resource.monthly_cost),
            _ => String::new(),
        };
        write!(html, r#"<td class="num">{}</td>"#, escape(&value))?;
    }
    writeln!(html, "</tr>")?;

    for component in &resource.cost_components {
        write!(
            html,
            r#"            <tr><td style="padding-left: {}px">{}</td>"#,
            32 + depth * 20,
            escape(&component.name)
        )?;
        for field in Field::ALL {
            let (value, class) = match field {
                Field::Price => (money.price(component.price), "num"),
                Field::MonthlyQuantity => (
                    component
                        .monthly_quantity
                        .map(format_quantity)
                        .unwrap_or_else(|| "-".to_string()),
                    "num",
                ),
                Field::Unit => (component.unit.clone(), ""),
                Field::HourlyCost => (money.hourly(component.hourly_cost), "num"),
                Field::MonthlyCost => (money.monthly(component.monthly_cost), "num"),
            };
            write!(html, r#"<td class="{}">{}</td>"#, class, escape(&value))?;
        }
        writeln!(html, "</tr>")?;
    }

    for sub in &resource.subresources {
        render_resource(html, sub, depth + 1, money)?;
    }
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
