//! Number and currency formatting shared by the renderers

use crate::core::cost::Cost;

/// Symbol written before amounts in `currency`
pub fn currency_prefix(currency: &str) -> String {
    match currency.to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" | "CNY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{} ", other),
    }
}

/// Currency formatting for the report's declared currency
#[derive(Debug, Clone)]
pub struct Money {
    prefix: String,
}

impl Money {
    pub fn new(currency: &str) -> Self {
        Self {
            prefix: currency_prefix(currency),
        }
    }

    fn format(&self, amount: Option<Cost>, dp: u32) -> String {
        match amount {
            Some(c) => {
                let sign = if c.is_negative() { "-" } else { "" };
                format!(
                    "{}{}{}",
                    sign,
                    self.prefix,
                    group_thousands(&c.abs().round_dp(dp), dp)
                )
            }
            None => "-".to_string(),
        }
    }

    pub fn monthly(&self, amount: Option<Cost>) -> String {
        self.format(amount, 2)
    }

    pub fn hourly(&self, amount: Option<Cost>) -> String {
        self.format(amount, 4)
    }

    /// Unit prices keep every digit the estimator wrote
    pub fn price(&self, amount: Option<Cost>) -> String {
        match amount {
            Some(c) => {
                let sign = if c.is_negative() { "-" } else { "" };
                format!("{}{}{}", sign, self.prefix, c.abs())
            }
            None => "-".to_string(),
        }
    }

    /// Monthly amount with an explicit sign, for deltas
    pub fn delta(&self, amount: Cost) -> String {
        if amount.is_negative() {
            self.monthly(Some(amount))
        } else {
            format!("+{}", self.monthly(Some(amount)))
        }
    }
}

/// Format a quantity with thousands separators and at most four decimals
pub fn format_quantity(quantity: Cost) -> String {
    let rounded = quantity.round_dp(4);
    let text = group_thousands(&rounded.abs(), rounded.scale());
    let text = if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    };
    if rounded.is_negative() {
        format!("-{}", text)
    } else {
        text
    }
}

/// Write a non-negative amount with `dp` decimals and comma-grouped integer digits
fn group_thousands(amount: &Cost, dp: u32) -> String {
    let text = amount.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if dp == 0 {
        return grouped;
    }
    let mut frac = frac_part.to_string();
    while frac.len() < dp as usize {
        frac.push('0');
    }
    format!("{}.{}", grouped, frac)
}
