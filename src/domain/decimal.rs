//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Provides canonical parsing from strings, raw on-chain amount conversion and
//! the balance preview formatting used by the projector.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for balance and threshold arithmetic.
///
/// Backed by rust_decimal to avoid floating-point drift. Arithmetic is only
/// exposed in checked or saturating form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(RustDecimal);

impl Decimal {
    /// Largest representable value.
    pub const MAX: Decimal = Decimal(RustDecimal::MAX);

    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// Surrounding whitespace is ignored.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Parse a user-entered amount, treating anything unparseable as zero.
    pub fn parse_or_zero(s: &str) -> Self {
        Self::from_str_canonical(s).unwrap_or_default()
    }

    /// Convert a raw integer on-chain amount using the asset's decimal precision.
    ///
    /// Returns `None` when the value does not fit the 96-bit mantissa or the
    /// precision exceeds the supported scale.
    pub fn from_raw(raw: u128, decimals: u32) -> Option<Self> {
        let raw = i128::try_from(raw).ok()?;
        RustDecimal::try_from_i128_with_scale(raw, decimals)
            .ok()
            .map(|d| Decimal(d.normalize()))
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        let normalized = self.0.normalize();
        format!("{}", normalized)
    }

    /// Format for balance previews: `0.00` for zero, six places below 0.01,
    /// two places otherwise.
    pub fn to_balance_string(&self) -> String {
        if self.is_zero() {
            return "0.00".to_string();
        }
        let places = if self.is_positive() && self.0 < RustDecimal::new(1, 2) {
            6
        } else {
            2
        };
        let rounded = self
            .0
            .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.*}", places as usize, rounded)
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// Absolute value.
    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// `None` on overflow.
    pub fn checked_add(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_add(rhs.0).map(Decimal)
    }

    /// `None` on overflow.
    pub fn checked_sub(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    /// Add, saturating at [`Decimal::MAX`] (or its negation below).
    pub fn saturating_add(self, rhs: Decimal) -> Decimal {
        self.checked_add(rhs).unwrap_or(if rhs.is_negative() {
            Decimal(RustDecimal::MIN)
        } else {
            Decimal::MAX
        })
    }

    /// Subtract, clamping the result at zero.
    ///
    /// An overflowing difference saturates: a positive `rhs` can only push
    /// the result below zero, anything else past [`Decimal::MAX`].
    pub fn sub_floored(self, rhs: Decimal) -> Decimal {
        match self.checked_sub(rhs) {
            Some(diff) if diff.is_negative() => Decimal::zero(),
            Some(diff) => diff,
            None if rhs.is_positive() => Decimal::zero(),
            None => Decimal::MAX,
        }
    }

    /// Whether two values differ by strictly less than `tolerance`.
    ///
    /// A difference too large to represent is never within tolerance.
    pub fn approx_eq(&self, other: &Decimal, tolerance: Decimal) -> bool {
        self.checked_sub(*other)
            .is_some_and(|diff| diff.abs() < tolerance)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl From<u64> for Decimal {
    fn from(value: u64) -> Self {
        Decimal(RustDecimal::from(value))
    }
}
