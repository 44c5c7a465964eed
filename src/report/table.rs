use crate::core::combine::{CombinedReport, ReportGroup};
use crate::core::cost::Cost;
use crate::core::document::{CostComponent, Resource};
use crate::core::fields::Field;
use crate::report::format::{format_quantity, Money};
use crate::report::RenderOptions;
use anyhow::Result;
use colored::*;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color as TableColor, ContentArrangement, Table};
use std::fmt::Write;

/// Render the combined report as one table per group plus an overall total.
pub fn render(report: &CombinedReport, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut output = String::new();
    let style = Style::new(options.no_color);
    let money = Money::new(&report.currency);

    if report.projects().next().is_none() {
        writeln!(&mut output, "{}", style.dim("No projects found in the combined report."))?;
    }

    for group in &report.groups {
        render_group(&mut output, report, group, options, &style, &money)?;
    }

    if report.groups.len() > 1 {
        let mut table = new_table(&style);
        table.set_header(vec![
            style.header(&report.group_label),
            style.header(Field::HourlyCost.title()),
            style.header(Field::MonthlyCost.title()),
        ]);
        for group in &report.groups {
            table.add_row(vec![
                Cell::new(group_name(group)),
                amount_cell(money.hourly(group.hourly_cost())),
                amount_cell(money.monthly(group.monthly_cost())),
            ]);
        }
        writeln!(&mut output, "{}", table)?;
    }

    writeln!(
        &mut output,
        "{} {}",
        style.bold("OVERALL TOTAL"),
        style.bold(&money.monthly(Some(report.monthly_cost().unwrap_or(Cost::ZERO))))
    )?;

    let skipped = report.summary.unsupported_resources;
    if skipped > 0 && !options.show_skipped {
        writeln!(&mut output)?;
        writeln!(
            &mut output,
            "{}",
            style.dim(&format!(
                "{} resource{} skipped as not supported, add --show-skipped to list them.",
                skipped,
                if skipped == 1 { " was" } else { "s were" }
            ))
        )?;
    }

    Ok(output.into_bytes())
}

fn render_group(
    output: &mut String,
    report: &CombinedReport,
    group: &ReportGroup,
    options: &RenderOptions,
    style: &Style,
    money: &Money,
) -> Result<()> {
    writeln!(
        output,
        "{} {}",
        style.section(&format!("{}:", report.group_label)),
        group_name(group)
    )?;
    writeln!(output)?;

    for project in &group.projects {
        if !project.name.is_empty() {
            writeln!(output, "{} {}", style.dim("Project:"), project.name)?;
        }

        let mut table = new_table(style);
        let mut header = vec![style.header("Name")];
        header.extend(options.fields.iter().map(|f| style.header(f.title())));
        table.set_header(header);

        for column in 1..=options.fields.len() {
            if let Some(col) = table.column_mut(column) {
                if options.fields[column - 1] != Field::Unit {
                    col.set_cell_alignment(CellAlignment::Right);
                }
            }
        }

        for resource in project.resources() {
            add_resource_rows(&mut table, resource, "", "", options, style, money);
        }

        let mut total_row = vec![style.bold_cell("Project total")];
        total_row.extend(options.fields.iter().map(|field| match field {
            Field::MonthlyCost => Cell::new(money.monthly(project.monthly_cost())),
            Field::HourlyCost => Cell::new(money.hourly(project.hourly_cost())),
            _ => Cell::new(""),
        }));
        table.add_row(total_row);

        writeln!(output, "{}", table)?;
        writeln!(output)?;
    }

    Ok(())
}

fn add_resource_rows(
    table: &mut Table,
    resource: &Resource,
    prefix: &str,
    child_prefix: &str,
    options: &RenderOptions,
    style: &Style,
    money: &Money,
) {
    let mut row = vec![if resource.is_skipped {
        let reason = resource.skip_reason.as_deref().unwrap_or("not supported");
        style.dim_cell(&format!("{}{} (skipped: {})", prefix, resource.name, reason))
    } else {
        style.bold_cell(&format!("{}{}", prefix, resource.name))
    }];
    row.extend(options.fields.iter().map(|field| match field {
        Field::MonthlyCost => Cell::new(money.monthly(resource.monthly_cost)),
        Field::HourlyCost => Cell::new(money.hourly(resource.hourly_cost)),
        _ => Cell::new(""),
    }));
    table.add_row(row);

    let children = resource.cost_components.len() + resource.subresources.len();

    for (i, component) in resource.cost_components.iter().enumerate() {
        let branch = if i + 1 == children { "└─" } else { "├─" };
        let mut row = vec![Cell::new(format!("{}{} {}", child_prefix, branch, component.name))];
        row.extend(
            options
                .fields
                .iter()
                .map(|field| Cell::new(component_value(component, *field, money))),
        );
        table.add_row(row);
    }

    for (i, sub) in resource.subresources.iter().enumerate() {
        let is_last = resource.cost_components.len() + i + 1 == children;
        let (branch, continuation) = if is_last { ("└─ ", "   ") } else { ("├─ ", "│  ") };
        add_resource_rows(
            table,
            sub,
            &format!("{}{}", child_prefix, branch),
            &format!("{}{}", child_prefix, continuation),
            options,
            style,
            money,
        );
    }
}

fn component_value(component: &CostComponent, field: Field, money: &Money) -> String {
    match field {
        Field::Price => money.price(component.price),
        Field::MonthlyQuantity => component
            .monthly_quantity
            .map(format_quantity)
            .unwrap_or_else(|| "-".to_string()),
        Field::Unit => component.unit.clone(),
        Field::HourlyCost => money.hourly(component.hourly_cost),
        Field::MonthlyCost => money.monthly(component.monthly_cost),
    }
}

fn group_name(group: &ReportGroup) -> String {
    if group.key.is_empty() {
        "-".to_string()
    } else {
        group.key.clone()
    }
}

fn new_table(style: &Style) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Disabled);
    if style.plain {
        table.force_no_tty();
    } else {
        table.enforce_styling();
    }
    table
}

fn amount_cell(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// Colour handling for a single render; nothing here touches global state.
struct Style {
    plain: bool,
}

impl Style {
    fn new(no_color: bool) -> Self {
        Self { plain: no_color }
    }

    fn header(&self, text: &str) -> Cell {
        if self.plain {
            Cell::new(text)
        } else {
            Cell::new(text)
                .add_attribute(Attribute::Bold)
                .fg(TableColor::Cyan)
        }
    }

    fn bold_cell(&self, text: &str) -> Cell {
        if self.plain {
            Cell::new(text)
        } else {
            Cell::new(text).add_attribute(Attribute::Bold)
        }
    }

    fn dim_cell(&self, text: &str) -> Cell {
        if self.plain {
            Cell::new(text)
        } else {
            Cell::new(text).add_attribute(Attribute::Dim)
        }
    }

    fn section(&self, text: &str) -> String {
        if self.plain {
            text.to_string()
        } else {
            text.bold().cyan().to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.plain {
            text.to_string()
        } else {
            text.bold().to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.plain {
            text.to_string()
        } else {
            text.dimmed().to_string()
        }
    }
}
