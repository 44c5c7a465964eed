//! Output field selection
//!
//! Users pick table columns with `--fields`. The vocabulary is closed, so
//! requests are parsed into [`Field`] and anything unknown is reported as a
//! [`Warning`] and dropped; a bad field list never stops a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A column that a renderer may show for a cost component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Price,
    MonthlyQuantity,
    Unit,
    HourlyCost,
    MonthlyCost,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Price,
        Field::MonthlyQuantity,
        Field::Unit,
        Field::HourlyCost,
        Field::MonthlyCost,
    ];

    pub const DEFAULTS: [Field; 3] = [Field::MonthlyQuantity, Field::Unit, Field::MonthlyCost];

    /// Identifier accepted on the command line
    pub fn id(&self) -> &'static str {
        match self {
            Field::Price => "price",
            Field::MonthlyQuantity => "monthlyQuantity",
            Field::Unit => "unit",
            Field::HourlyCost => "hourlyCost",
            Field::MonthlyCost => "monthlyCost",
        }
    }

    /// Column heading used by the table and HTML renderers
    pub fn title(&self) -> &'static str {
        match self {
            Field::Price => "Price",
            Field::MonthlyQuantity => "Monthly Qty",
            Field::Unit => "Unit",
            Field::HourlyCost => "Hourly Cost",
            Field::MonthlyCost => "Monthly Cost",
        }
    }

    pub fn defaults() -> Vec<Field> {
        Field::DEFAULTS.to_vec()
    }

    fn id_list(fields: &[Field]) -> String {
        fields.iter().map(Field::id).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.id() == s.trim())
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// A non-fatal problem surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning(pub String);

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of validating a field request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub fields: Vec<Field>,
    pub warnings: Vec<Warning>,
}

/// Validate the requested fields against the known vocabulary.
///
/// `None` means the caller did not ask for anything in particular and gets
/// the defaults silently. An explicit empty list, or a list in which nothing
/// is valid, also falls back to the defaults but says so.
pub fn project_fields(requested: Option<&[String]>) -> FieldSelection {
    let Some(requested) = requested else {
        return FieldSelection {
            fields: Field::defaults(),
            warnings: Vec::new(),
        };
    };

    let mut warnings = Vec::new();

    if requested.is_empty() {
        warnings.push(Warning(format!(
            "fields is empty, using defaults: {}",
            Field::id_list(&Field::DEFAULTS)
        )));
        return FieldSelection {
            fields: Field::defaults(),
            warnings,
        };
    }

    let mut fields: Vec<Field> = Vec::with_capacity(requested.len());
    for name in requested {
        match name.parse::<Field>() {
            Ok(field) if !fields.contains(&field) => fields.push(field),
            Ok(_) => {}
            Err(_) => warnings.push(Warning(format!(
                "Invalid field '{}' specified, valid fields are: {}",
                name,
                Field::id_list(&Field::ALL)
            ))),
        }
    }

    if fields.is_empty() {
        warnings.push(Warning(format!(
            "no valid fields specified, using defaults: {}",
            Field::id_list(&Field::DEFAULTS)
        )));
        fields = Field::defaults();
    }

    FieldSelection { fields, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unrequested_uses_defaults_silently() {
        let selection = project_fields(None);
        assert_eq!(selection.fields, Field::defaults());
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_empty_request_warns_and_uses_defaults() {
        let empty: Vec<String> = Vec::new();
        let selection = project_fields(Some(empty.as_slice()));
        assert_eq!(
            selection.fields,
            vec![Field::MonthlyQuantity, Field::Unit, Field::MonthlyCost]
        );
        assert_eq!(selection.warnings.len(), 1);
        assert!(selection.warnings[0].0.starts_with("fields is empty"));
    }

    #[test]
    fn test_invalid_fields_are_dropped_with_warning() {
        let requested = strings(&["hourlyCost", "colour", "price"]);
        let selection = project_fields(Some(requested.as_slice()));
        assert_eq!(selection.fields, vec![Field::HourlyCost, Field::Price]);
        assert_eq!(selection.warnings.len(), 1);
        assert_eq!(
            selection.warnings[0].to_string(),
            "Invalid field 'colour' specified, valid fields are: price, monthlyQuantity, unit, hourlyCost, monthlyCost"
        );
    }

    #[test]
    fn test_all_invalid_collapses_to_defaults() {
        let requested = strings(&["cost", "qty"]);
        let selection = project_fields(Some(requested.as_slice()));
        assert_eq!(selection.fields, Field::defaults());
        assert_eq!(selection.warnings.len(), 3);
    }

    #[test]
    fn test_duplicates_keep_first_position() {
        let requested = strings(&["unit", "price", "unit"]);
        let selection = project_fields(Some(requested.as_slice()));
        assert_eq!(selection.fields, vec![Field::Unit, Field::Price]);
        assert!(selection.warnings.is_empty());
    }

    #[test]
    fn test_field_ids_round_trip_through_from_str() {
        for field in Field::ALL {
            assert_eq!(field.id().parse::<Field>().unwrap(), field);
        }
        assert!("MonthlyCost".parse::<Field>().is_err());
    }

    proptest! {
        #[test]
        fn prop_projection_is_ordered_subset(picks in proptest::collection::vec(0usize..8, 0..10)) {
            let vocabulary = ["price", "monthlyQuantity", "unit", "hourlyCost", "monthlyCost", "bogus", "", "Unit"];
            let requested: Vec<String> = picks.iter().map(|&i| vocabulary[i].to_string()).collect();
            let selection = project_fields(Some(requested.as_slice()));

            prop_assert!(!selection.fields.is_empty());
            let valid: Vec<Field> = requested.iter().filter_map(|s| s.parse().ok()).collect();
            if !valid.is_empty() {
                // relative order follows first occurrence in the request
                let mut expected = Vec::new();
                for f in valid {
                    if !expected.contains(&f) {
                        expected.push(f);
                    }
                }
                prop_assert_eq!(selection.fields, expected);
            } else {
                prop_assert_eq!(selection.fields, Field::defaults());
            }
        }
    }
}
