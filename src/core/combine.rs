//! Combining several cost estimate files into one report
//!
//! Inputs are grouped by one of their metadata values (the file name by
//! default). Groups appear in the order their key was first seen and keep
//! every project and resource in input order; combining is concatenation
//! with group attribution, nothing is re-costed.

use crate::core::cost::Cost;
use crate::core::document::{sum_present, Document, Project, Summary};
use crate::core::version::MAX_OUTPUT_VERSION;
use crate::report::RenderOptions;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Metadata key the loader stamps with the source path
pub const FILENAME_KEY: &str = "filename";

/// One loaded document and where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    pub metadata: BTreeMap<String, String>,
    pub document: Document,
}

impl ReportInput {
    pub fn new(document: Document) -> Self {
        Self {
            metadata: BTreeMap::new(),
            document,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Projects contributed by every input sharing one group key value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    pub key: String,
    pub projects: Vec<Project>,
}

impl ReportGroup {
    fn new(key: String) -> Self {
        Self {
            key,
            projects: Vec::new(),
        }
    }

    pub fn resource_count(&self) -> usize {
        self.projects.iter().map(Project::resource_count).sum()
    }

    pub fn monthly_cost(&self) -> Option<Cost> {
        sum_present(self.projects.iter().map(Project::monthly_cost))
    }

    pub fn hourly_cost(&self) -> Option<Cost> {
        sum_present(self.projects.iter().map(Project::hourly_cost))
    }
}

/// The merged view every renderer consumes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub version: String,
    pub currency: String,
    pub group_key: String,
    pub group_label: String,
    pub groups: Vec<ReportGroup>,
    pub summary: Summary,
}

impl CombinedReport {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn resource_count(&self) -> usize {
        self.groups.iter().map(ReportGroup::resource_count).sum()
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.groups.iter().flat_map(|g| g.projects.iter())
    }

    pub fn monthly_cost(&self) -> Option<Cost> {
        sum_present(self.groups.iter().map(ReportGroup::monthly_cost))
    }

    pub fn hourly_cost(&self) -> Option<Cost> {
        sum_present(self.groups.iter().map(ReportGroup::hourly_cost))
    }

    /// Flatten back into a single document that can be fed to another run.
    ///
    /// Every project is tagged with its group value under the group key so the
    /// attribution survives the round trip.
    pub fn to_document(&self) -> Document {
        let projects = self
            .groups
            .iter()
            .flat_map(|group| {
                group.projects.iter().cloned().map(move |mut project| {
                    project
                        .metadata
                        .insert(self.group_key.clone(), Value::String(group.key.clone()));
                    project
                })
            })
            .collect();

        Document {
            version: self.version.clone(),
            currency: self.currency.clone(),
            projects,
            total_hourly_cost: self.hourly_cost(),
            total_monthly_cost: self.monthly_cost(),
            summary: Some(self.summary.clone()),
            extra: BTreeMap::new(),
        }
    }
}

/// Merge `inputs` into one report, grouped by `options.group_key`.
pub fn combine(inputs: &[ReportInput], options: &RenderOptions) -> CombinedReport {
    let mut groups: IndexMap<String, ReportGroup> = IndexMap::new();
    let mut summary = Summary::default();
    let mut currency: Option<String> = None;

    for input in inputs {
        let key = input
            .metadata
            .get(&options.group_key)
            .cloned()
            .unwrap_or_default();

        match &currency {
            None => currency = Some(input.document.currency.clone()),
            Some(c) if *c != input.document.currency => warn!(
                "{} '{}' uses currency {} but the report is in {}; amounts are not converted",
                options.group_label, key, input.document.currency, c
            ),
            Some(_) => {}
        }

        for project in &input.document.projects {
            let skipped = project
                .resources()
                .iter()
                .filter(|r| r.is_skipped)
                .count();
            summary.unsupported_resources += skipped;
            summary.supported_resources += project.resource_count() - skipped;
        }

        debug!(
            "Adding {} project(s) to group '{}'",
            input.document.projects.len(),
            key
        );

        let group = groups
            .entry(key.clone())
            .or_insert_with(|| ReportGroup::new(key));

        group
            .projects
            .extend(input.document.projects.iter().map(|project| {
                let mut project = project.clone();
                if !options.show_skipped {
                    for breakdown in [
                        &mut project.past_breakdown,
                        &mut project.breakdown,
                        &mut project.diff,
                    ]
                    .into_iter()
                    .flatten()
                    {
                        breakdown.retain_supported();
                    }
                }
                project
            }));
    }

    summary.total_resources = summary.supported_resources + summary.unsupported_resources;

    CombinedReport {
        version: MAX_OUTPUT_VERSION.to_string(),
        currency: currency.unwrap_or_else(|| "USD".to_string()),
        group_key: options.group_key.clone(),
        group_label: options.group_label.clone(),
        groups: groups.into_values().collect(),
        summary,
    }
}
