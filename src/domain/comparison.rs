//! Comparison operators used by logic nodes.

use crate::domain::Decimal;
use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};

/// Absolute tolerance for the approximate operators (1e-4).
pub fn approx_tolerance() -> Decimal {
    Decimal::new(RustDecimal::new(1, 4))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOperator {
    #[serde(alias = ">")]
    GreaterThan,
    #[serde(alias = ">=")]
    GreaterOrEqual,
    #[serde(alias = "<")]
    LessThan,
    #[serde(alias = "<=")]
    LessOrEqual,
    #[serde(alias = "==")]
    ApproximatelyEqual,
    #[serde(alias = "!=")]
    ApproximatelyNotEqual,
}

impl ComparisonOperator {
    /// Apply the operator as `actual <op> threshold`.
    pub fn compare(&self, actual: Decimal, threshold: Decimal) -> bool {
        match self {
            ComparisonOperator::GreaterThan => actual > threshold,
            ComparisonOperator::GreaterOrEqual => actual >= threshold,
            ComparisonOperator::LessThan => actual < threshold,
            ComparisonOperator::LessOrEqual => actual <= threshold,
            ComparisonOperator::ApproximatelyEqual => {
                actual.approx_eq(&threshold, approx_tolerance())
            }
            ComparisonOperator::ApproximatelyNotEqual => {
                !actual.approx_eq(&threshold, approx_tolerance())
            }
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOperator::GreaterThan => ">",
            ComparisonOperator::GreaterOrEqual => ">=",
            ComparisonOperator::LessThan => "<",
            ComparisonOperator::LessOrEqual => "<=",
            ComparisonOperator::ApproximatelyEqual => "==",
            ComparisonOperator::ApproximatelyNotEqual => "!=",
        }
    }
}

impl std::fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
