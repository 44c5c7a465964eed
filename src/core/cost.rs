//! Exact decimal cost amounts
//!
//! Cost estimate files carry prices and totals as decimal strings
//! (`"0.0104"`, `"75.92"`). Parsing them into `f64` would change the digits
//! written back out by the JSON renderer, so amounts are kept as a scaled
//! integer throughout.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

/// Largest number of fractional digits we accept.
const MAX_SCALE: u32 = 28;

/// A decimal amount stored as `units * 10^-scale`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cost {
    units: i128,
    scale: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal amount '{0}'")]
pub struct ParseCostError(pub String);

impl Cost {
    pub const ZERO: Cost = Cost { units: 0, scale: 0 };

    pub fn new(units: i128, scale: u32) -> Self {
        Self { units, scale }
    }

    pub fn is_negative(&self) -> bool {
        self.units < 0
    }

    pub fn abs(self) -> Self {
        Self {
            units: self.units.saturating_abs(),
            scale: self.scale,
        }
    }

    /// Number of fractional digits this amount was written with.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Round half away from zero to `dp` fractional digits.
    pub fn round_dp(&self, dp: u32) -> Self {
        if dp >= self.scale {
            return *self;
        }
        let divisor = 10i128.pow(self.scale - dp);
        let quotient = self.units / divisor;
        let remainder = self.units % divisor;
        let rounded = if remainder.abs() * 2 >= divisor {
            quotient + self.units.signum()
        } else {
            quotient
        };
        Self {
            units: rounded,
            scale: dp,
        }
    }

    fn checked_rescale(&self, scale: u32) -> Option<i128> {
        debug_assert!(scale >= self.scale);
        self.units.checked_mul(10i128.checked_pow(scale - self.scale)?)
    }

    /// Bring both amounts to a common scale.
    ///
    /// The finer scale is used when both fit in `i128` there; otherwise the
    /// finer amount is rounded to the largest scale at which they do. The
    /// coarser of the two scales always fits.
    fn aligned(a: &Cost, b: &Cost) -> (i128, i128, u32) {
        let coarse = a.scale.min(b.scale);
        let fine = a.scale.max(b.scale);
        for scale in (coarse + 1..=fine).rev() {
            let a_units = a.round_dp(scale).checked_rescale(scale);
            let b_units = b.round_dp(scale).checked_rescale(scale);
            if let (Some(x), Some(y)) = (a_units, b_units) {
                return (x, y, scale);
            }
        }
        (a.round_dp(coarse).units, b.round_dp(coarse).units, coarse)
    }
}

impl FromStr for Cost {
    type Err = ParseCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCostError(s.to_string());
        let trimmed = s.trim();

        let (mantissa, exponent) = match trimmed.find(['e', 'E']) {
            Some(idx) => {
                let exp: i32 = trimmed[idx + 1..].parse().map_err(|_| err())?;
                (&trimmed[..idx], exp)
            }
            None => (trimmed, 0),
        };

        let (negative, digits) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, f),
            None => (digits, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return Err(err());
        }

        let mut units: i128 = 0;
        for c in int_part.chars().chain(frac_part.chars()) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(i128::from(c as u8 - b'0')))
                .ok_or_else(err)?;
        }

        let mut scale = frac_part.len() as i64 - i64::from(exponent);
        if scale < 0 {
            units = units
                .checked_mul(10i128.checked_pow((-scale) as u32).ok_or_else(err)?)
                .ok_or_else(err)?;
            scale = 0;
        }
        if scale > i64::from(MAX_SCALE) {
            return Err(err());
        }

        Ok(Self {
            units: if negative { -units } else { units },
            scale: scale as u32,
        })
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();
        if self.scale == 0 {
            return write!(f, "{}{}", sign, magnitude);
        }
        let divisor = 10u128.pow(self.scale);
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            width = self.scale as usize
        )
    }
}

impl PartialEq for Cost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b, _) = Cost::aligned(self, other);
        a.cmp(&b)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        let (a, b, scale) = Cost::aligned(&self, &rhs);
        Cost {
            units: a.saturating_add(b),
            scale,
        }
    }
}

impl Sub for Cost {
    type Output = Cost;

    fn sub(self, rhs: Cost) -> Cost {
        let (a, b, scale) = Cost::aligned(&self, &rhs);
        Cost {
            units: a.saturating_sub(b),
            scale,
        }
    }
}

impl Neg for Cost {
    type Output = Cost;

    fn neg(self) -> Cost {
        Cost {
            units: self.units.saturating_neg(),
            scale: self.scale,
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, |acc, c| acc + c)
    }
}

impl<'a> Sum<&'a Cost> for Cost {
    fn sum<I: Iterator<Item = &'a Cost>>(iter: I) -> Cost {
        iter.copied().sum()
    }
}

impl Serialize for Cost {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct CostVisitor;

impl<'de> Visitor<'de> for CostVisitor {
    type Value = Cost;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Cost, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Cost, E> {
        Ok(Cost::new(i128::from(v), 0))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Cost, E> {
        Ok(Cost::new(i128::from(v), 0))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Cost, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("non-finite amount {}", v)));
        }
        // Display for f64 gives the shortest text that round-trips.
        v.to_string().parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Cost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Cost, D::Error> {
        deserializer.deserialize_any(CostVisitor)
    }
}
