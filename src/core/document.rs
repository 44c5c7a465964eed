//! Cost estimate document model
//!
//! A document is the JSON written by the cost estimator for one run. The
//! combiner never re-costs anything in here; it only moves projects and
//! resources around, so unknown fields are carried along untouched in the
//! `extra` maps.

use crate::core::cost::Cost;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hourly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_monthly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Document {
    /// Parse a document from raw JSON bytes
    pub fn from_slice(data: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(data)
    }

    /// Number of top-level resources in the current breakdowns
    pub fn resource_count(&self) -> usize {
        self.projects.iter().map(Project::resource_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub metadata: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub past_breakdown: Option<Breakdown>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<Breakdown>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<Breakdown>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Project {
    pub fn resources(&self) -> &[Resource] {
        self.breakdown
            .as_ref()
            .map(|b| b.resources.as_slice())
            .unwrap_or(&[])
    }

    pub fn resource_count(&self) -> usize {
        self.resources().len()
    }

    /// Monthly total, preferring the figure the estimator wrote.
    pub fn monthly_cost(&self) -> Option<Cost> {
        self.breakdown.as_ref().and_then(Breakdown::monthly_cost)
    }

    pub fn hourly_cost(&self) -> Option<Cost> {
        self.breakdown.as_ref().and_then(Breakdown::hourly_cost)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    #[serde(default)]
    pub resources: Vec<Resource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_hourly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_monthly_cost: Option<Cost>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Breakdown {
    pub fn monthly_cost(&self) -> Option<Cost> {
        self.total_monthly_cost
            .or_else(|| sum_present(self.resources.iter().map(|r| r.monthly_cost)))
    }

    pub fn hourly_cost(&self) -> Option<Cost> {
        self.total_hourly_cost
            .or_else(|| sum_present(self.resources.iter().map(|r| r.hourly_cost)))
    }

    /// Remove skipped resources, including skipped subresources.
    pub fn retain_supported(&mut self) {
        retain_supported(&mut self.resources);
    }
}

fn retain_supported(resources: &mut Vec<Resource>) {
    resources.retain(|r| !r.is_skipped);
    for resource in resources.iter_mut() {
        retain_supported(&mut resource.subresources);
    }
}

/// Sum the amounts that are present; `None` if none are.
pub fn sum_present<I>(amounts: I) -> Option<Cost>
where
    I: IntoIterator<Item = Option<Cost>>,
{
    amounts
        .into_iter()
        .flatten()
        .fold(None, |acc, c| Some(acc.unwrap_or(Cost::ZERO) + c))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_skipped: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cost_components: Vec<CostComponent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subresources: Vec<Resource>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostComponent {
    pub name: String,

    #[serde(default)]
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_quantity: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_quantity: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_cost: Option<Cost>,
}

/// Resource counts for a combined run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub total_resources: usize,
    #[serde(default)]
    pub supported_resources: usize,
    #[serde(default)]
    pub unsupported_resources: usize,
}
